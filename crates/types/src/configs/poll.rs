//! Poll loop configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scheme prepended to sensor addresses given without one
pub const DEFAULT_SCHEME: &str = "coap";

/// How channel buffers start out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BufferMode {
    /// Pre-filled with zero placeholders, always at full capacity
    #[default]
    SteadyWindow,
    /// Starts empty and grows until full, then slides
    GrowThenSlide,
}

fn default_max_samples() -> usize {
    100
}

fn default_render_period() -> u64 {
    2
}

fn default_sensor_address() -> String {
    "[fd49:88e0:1ed6:2:7982:4d5e:5728:2002]".to_string()
}

fn default_steady_window_mode() -> bool {
    true
}

fn default_cycle_interval_seconds() -> f64 {
    0.5
}

/// Configuration for the sampling loop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollConfig {
    /// History length kept per channel
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
    /// Number of cycles between renders
    #[serde(default = "default_render_period")]
    pub render_period: u64,
    /// Sensor endpoint, with or without a scheme
    #[serde(default = "default_sensor_address")]
    pub sensor_address: String,
    /// Pre-fill buffers with zeros instead of growing them
    #[serde(default = "default_steady_window_mode")]
    pub steady_window_mode: bool,
    #[serde(default = "default_cycle_interval_seconds")]
    pub cycle_interval_seconds: f64,
}

impl PollConfig {
    pub fn buffer_mode(&self) -> BufferMode {
        if self.steady_window_mode {
            BufferMode::SteadyWindow
        } else {
            BufferMode::GrowThenSlide
        }
    }

    /// Delay between cycles, `None` unless it is a representable non-zero duration
    pub fn checked_cycle_interval(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.cycle_interval_seconds)
            .ok()
            .filter(|interval| !interval.is_zero())
    }

    /// Delay between cycles.
    ///
    /// Same as [`checked_cycle_interval`](Self::checked_cycle_interval) for
    /// configs the poll loop accepts; anything else gets the default interval.
    pub fn cycle_interval(&self) -> Duration {
        self.checked_cycle_interval()
            .unwrap_or_else(|| Duration::from_secs_f64(default_cycle_interval_seconds()))
    }

    /// Sensor endpoint including the scheme, without a trailing slash
    pub fn endpoint(&self) -> String {
        let address = self.sensor_address.trim().trim_end_matches('/');
        if address.contains("://") {
            address.to_string()
        } else {
            format!("{}://{}", DEFAULT_SCHEME, address)
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_samples: default_max_samples(),
            render_period: default_render_period(),
            sensor_address: default_sensor_address(),
            steady_window_mode: default_steady_window_mode(),
            cycle_interval_seconds: default_cycle_interval_seconds(),
        }
    }
}
