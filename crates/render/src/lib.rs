//! sensplot-render: Rendering collaborators for telemetry snapshots.

mod json_renderer;
mod log_renderer;
mod stats;

#[cfg(feature = "png")]
mod graph_renderer;

pub use json_renderer::JsonRenderer;
pub use log_renderer::LogRenderer;
pub use stats::SeriesStats;

#[cfg(feature = "png")]
pub use graph_renderer::GraphRenderer;

use anyhow::{anyhow, Result};
use sensplot_core::Renderer;
use sensplot_types::{RenderConfig, RenderKind};

/// Boxed renderer for dynamic dispatch
pub type BoxedRenderer = Box<dyn Renderer>;

/// Create the renderer selected by `config`
pub fn create_renderer(config: &RenderConfig) -> Result<BoxedRenderer> {
    let output = config.resolved_output();
    match config.kind {
        RenderKind::Log => Ok(Box::new(LogRenderer::new())),
        RenderKind::Json => {
            let path = output.ok_or_else(|| anyhow!("JSON renderer needs an output path"))?;
            Ok(Box::new(JsonRenderer::new(path)))
        }
        #[cfg(feature = "png")]
        RenderKind::Png => {
            let path = output.ok_or_else(|| anyhow!("PNG renderer needs an output path"))?;
            Ok(Box::new(GraphRenderer::new(path, config.width, config.height)))
        }
        #[cfg(not(feature = "png"))]
        RenderKind::Png => Err(anyhow!(
            "PNG rendering is not available, rebuild with the `png` feature"
        )),
    }
}
