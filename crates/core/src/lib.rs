//! sensplot-core: Sampling loop and channel buffers for sensplot.
//!
//! This crate contains the stateful core (ChannelBuffer, SampleAcquirer,
//! PollLoop), the collaborator traits the core talks to (SensorClient,
//! Renderer) and the error taxonomy shared with the collaborator crates.

pub mod constants;
mod acquirer;
mod channel_buffer;
mod client;
mod error;
mod poll_loop;
mod renderer;

pub use acquirer::{channel_uri, decode_payload, AcquisitionResult, SampleAcquirer};
pub use channel_buffer::{ChannelBuffer, TelemetryBuffers};
pub use client::{RequestKind, SensorClient, SensorRequest, SensorResponse};
pub use constants::{COAP_DEFAULT_PORT, WELL_KNOWN_CORE};
pub use error::{AcquisitionError, StartupConfigError, TransportError};
pub use poll_loop::{validate_config, CycleReport, LoopState, LoopStats, PollLoop};
pub use renderer::Renderer;

// Re-export types used in trait signatures for convenience
pub use sensplot_types::{BufferMode, Channel, PollConfig, Reading, TelemetrySnapshot};
