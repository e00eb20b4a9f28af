//! Telemetry channels and per-cycle readings

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three numeric channels exposed by the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Temperature,
    Humidity,
    AirQuality,
}

impl Channel {
    /// All channels in acquisition order
    pub const ALL: [Channel; 3] = [Channel::Temperature, Channel::Humidity, Channel::AirQuality];

    /// Resource name on the sensor, appended to the endpoint
    pub fn resource(&self) -> &'static str {
        match self {
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
            Channel::AirQuality => "airquality",
        }
    }

    /// Label used on plots
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Temperature => "Temperature",
            Channel::Humidity => "Humidity",
            Channel::AirQuality => "Pollution",
        }
    }

    /// Unit reported by the sensor firmware
    pub fn unit(&self) -> &'static str {
        match self {
            Channel::Temperature => "C",
            Channel::Humidity | Channel::AirQuality => "%",
        }
    }

    /// Position of this channel in [`Channel::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Channel::Temperature => 0,
            Channel::Humidity => 1,
            Channel::AirQuality => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

/// The three values accepted from one successful cycle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    pub air_quality: f64,
}

impl Reading {
    pub fn new(temperature: f64, humidity: f64, air_quality: f64) -> Self {
        Self {
            temperature,
            humidity,
            air_quality,
        }
    }

    /// Build a reading from values ordered like [`Channel::ALL`]
    pub fn from_values(values: [f64; 3]) -> Self {
        Self::new(values[0], values[1], values[2])
    }

    /// Value for a single channel
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
            Channel::AirQuality => self.air_quality,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Temperature: {:.2}, Humidity: {:.2}, AirQuality: {:.2}",
            self.temperature, self.humidity, self.air_quality
        )
    }
}
