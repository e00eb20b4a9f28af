//! Immutable view of all channel histories handed to renderers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::channel::Channel;

/// Read-only copy of the three channel buffers at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    cycle: u64,
    taken_at: DateTime<Utc>,
    temperature: Vec<f64>,
    humidity: Vec<f64>,
    air_quality: Vec<f64>,
}

impl TelemetrySnapshot {
    pub fn new(cycle: u64, temperature: Vec<f64>, humidity: Vec<f64>, air_quality: Vec<f64>) -> Self {
        Self {
            cycle,
            taken_at: Utc::now(),
            temperature,
            humidity,
            air_quality,
        }
    }

    /// Cycle number the snapshot was taken on
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    /// Ordered samples of one channel, oldest first
    pub fn series(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::Temperature => &self.temperature,
            Channel::Humidity => &self.humidity,
            Channel::AirQuality => &self.air_quality,
        }
    }

    /// All channels with their samples, in acquisition order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &[f64])> + '_ {
        Channel::ALL
            .into_iter()
            .map(move |channel| (channel, self.series(channel)))
    }

    /// Number of samples per channel
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_series() {
        let snapshot = TelemetrySnapshot::new(4, vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]);
        assert_eq!(snapshot.cycle(), 4);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.series(Channel::Humidity), &[3.0, 4.0]);

        let channels: Vec<Channel> = snapshot.iter().map(|(c, _)| c).collect();
        assert_eq!(channels, Channel::ALL.to_vec());
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = TelemetrySnapshot::new(2, vec![1.5], vec![2.5], vec![3.5]);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"air_quality\":[3.5]"));

        let deserialized: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, snapshot);
    }
}
