//! Writes each snapshot to a JSON file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error};
use sensplot_core::Renderer;
use sensplot_types::TelemetrySnapshot;

/// Replaces `path` with the latest snapshot on every render
pub struct JsonRenderer {
    path: PathBuf,
}

impl JsonRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, snapshot: &TelemetrySnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        // Write next to the target and rename so readers never see a partial file
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&tmp, content).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

impl Renderer for JsonRenderer {
    fn render(&mut self, snapshot: TelemetrySnapshot) {
        match self.write(&snapshot) {
            Ok(()) => debug!(
                "Wrote snapshot for cycle {} to {}",
                snapshot.cycle(),
                self.path.display()
            ),
            Err(e) => error!("Failed to write snapshot: {:#}", e),
        }
    }
}
