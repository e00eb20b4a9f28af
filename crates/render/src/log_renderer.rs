//! Renders snapshots as summary lines in the log

use log::info;
use sensplot_core::Renderer;
use sensplot_types::TelemetrySnapshot;

use crate::stats::SeriesStats;

#[derive(Debug, Default)]
pub struct LogRenderer;

impl LogRenderer {
    pub fn new() -> Self {
        Self
    }

    /// One summary line per channel
    pub fn summarize(snapshot: &TelemetrySnapshot) -> Vec<String> {
        snapshot
            .iter()
            .map(|(channel, series)| match SeriesStats::from_series(series) {
                Some(stats) => format!(
                    "{:<12} latest {:.2} {} (min {:.2}, max {:.2}, {} samples)",
                    channel.label(),
                    stats.latest,
                    channel.unit(),
                    stats.min,
                    stats.max,
                    series.len()
                ),
                None => format!("{:<12} no data", channel.label()),
            })
            .collect()
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: TelemetrySnapshot) {
        info!("Sensor data at cycle {}", snapshot.cycle());
        for line in Self::summarize(&snapshot) {
            info!("  {}", line);
        }
    }
}
