//! sensplot-types: Shared data types for the sensplot telemetry plotter.
//!
//! This crate contains pure data types (channels, readings, snapshots and
//! serde configuration structs) shared across all sensplot crates. Nothing in
//! here performs I/O.

pub mod channel;
pub mod configs;
pub mod snapshot;

// Re-export commonly used types at the crate root for convenience
pub use channel::{Channel, Reading};
pub use configs::{
    BufferMode, PollConfig, RenderConfig, RenderKind, SensorConfig, SensorKind,
    SimulationConfig, Waveform,
};
pub use snapshot::TelemetrySnapshot;
