//! Serde configuration types consumed at startup

mod poll;
mod render;
mod sensor;

pub use poll::{BufferMode, PollConfig, DEFAULT_SCHEME};
pub use render::{RenderConfig, RenderKind};
pub use sensor::{SensorConfig, SensorKind, SimulationConfig, Waveform};
