//! Error taxonomy for acquisition and startup

use std::time::Duration;

use sensplot_types::Channel;
use thiserror::Error;

/// Failure reported by a sensor communication collaborator
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid sensor address '{0}'")]
    InvalidAddress(String),

    #[error("could not resolve host '{host}'")]
    Resolve {
        host: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("transport error talking to {uri}")]
    Io {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {uri} timed out after {elapsed:?}")]
    Timeout { uri: String, elapsed: Duration },

    #[error("{uri} rejected the request ({code})")]
    Rejected { uri: String, code: String },

    #[error("malformed response from {uri}: {reason}")]
    Malformed { uri: String, reason: String },
}

/// Why a whole acquisition cycle was discarded
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to fetch {channel}")]
    Transport {
        channel: Channel,
        #[source]
        source: TransportError,
    },

    #[error("failed to decode {channel} payload {payload:?}: {reason}")]
    Decode {
        channel: Channel,
        payload: String,
        reason: String,
    },
}

impl AcquisitionError {
    /// Channel whose fetch ended the cycle
    pub fn channel(&self) -> Channel {
        match self {
            AcquisitionError::Transport { channel, .. } | AcquisitionError::Decode { channel, .. } => {
                *channel
            }
        }
    }
}

/// Configuration that prevents the poll loop from starting
#[derive(Debug, Error, PartialEq)]
pub enum StartupConfigError {
    #[error("max_samples must be at least 1 (got {0})")]
    EmptyHistory(usize),

    #[error("render_period must be at least 1")]
    ZeroRenderPeriod,

    #[error("render_period ({render_period}) exceeds max_samples ({max_samples})")]
    RenderPeriodTooLong { render_period: u64, max_samples: usize },

    #[error("cycle interval must be a positive, representable number of seconds (got {0})")]
    InvalidInterval(f64),
}
