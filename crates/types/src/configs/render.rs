//! Rendering collaborator configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which renderer receives snapshots
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderKind {
    /// Summary lines in the log
    #[default]
    Log,
    /// Snapshot written as JSON
    Json,
    /// Line plots written as PNG
    Png,
}

impl RenderKind {
    /// Output file used when none is configured
    pub fn default_output(&self) -> Option<PathBuf> {
        match self {
            RenderKind::Log => None,
            RenderKind::Json => Some(PathBuf::from("sensordata.json")),
            RenderKind::Png => Some(PathBuf::from("sensordata.png")),
        }
    }
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    700
}

/// Configuration for the rendering collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderConfig {
    #[serde(default)]
    pub kind: RenderKind,
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    /// Image width in pixels (png only)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Image height in pixels (png only)
    #[serde(default = "default_height")]
    pub height: u32,
}

impl RenderConfig {
    /// Configured output path, or the default for the renderer kind
    pub fn resolved_output(&self) -> Option<PathBuf> {
        self.output_path
            .clone()
            .or_else(|| self.kind.default_output())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            kind: RenderKind::default(),
            output_path: None,
            width: default_width(),
            height: default_height(),
        }
    }
}
