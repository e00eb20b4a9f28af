//! Rendering collaborator

use sensplot_types::TelemetrySnapshot;

/// Sink that turns a snapshot of the channel histories into a visual artifact
///
/// Renderers own their failures: the poll loop does not inspect or recover
/// from anything that goes wrong inside `render`.
pub trait Renderer: Send {
    fn render(&mut self, snapshot: TelemetrySnapshot);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, snapshot: TelemetrySnapshot) {
        (**self).render(snapshot)
    }
}
