//! Sensor collaborator configuration types.

use serde::{Deserialize, Serialize};

/// Which sensor client to talk to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// CoAP over UDP
    #[default]
    Coap,
    /// In-process simulated sensor
    Simulated,
}

/// Waveform produced by the simulated sensor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    #[default]
    Sine,
    Sawtooth,
    Triangle,
    Square,
    Constant,
}

fn default_period_secs() -> f64 {
    30.0
}

/// Configuration for the simulated sensor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    #[serde(default)]
    pub waveform: Waveform,
    /// Wave period in seconds
    #[serde(default = "default_period_secs")]
    pub period_secs: f64,
    /// Probability (0.0 - 1.0) that a single request fails
    #[serde(default)]
    pub failure_rate: f64,
    /// Fixed RNG seed, random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::default(),
            period_secs: default_period_secs(),
            failure_rate: 0.0,
            seed: None,
        }
    }
}

fn default_ack_timeout_ms() -> u64 {
    2000
}

fn default_max_retransmit() -> u32 {
    4
}

/// Configuration for the sensor collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorConfig {
    #[serde(default)]
    pub kind: SensorKind,
    /// Wait before retransmitting a confirmable request
    #[serde(default = "default_ack_timeout_ms")]
    pub ack_timeout_ms: u64,
    #[serde(default = "default_max_retransmit")]
    pub max_retransmit: u32,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            kind: SensorKind::default(),
            ack_timeout_ms: default_ack_timeout_ms(),
            max_retransmit: default_max_retransmit(),
            simulation: SimulationConfig::default(),
        }
    }
}
