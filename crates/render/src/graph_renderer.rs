//! Line plots of all three channels written as a PNG image

use std::f64::consts::FRAC_PI_2;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use cairo::{Context, FontSlant, FontWeight, Format, ImageSurface, LineCap, LineJoin};
use log::{debug, error};
use sensplot_core::Renderer;
use sensplot_types::TelemetrySnapshot;

use crate::stats::SeriesStats;

const TITLE: &str = "Sensor data";
const X_LABEL: &str = "samples [#]";
const Y_TICKS: usize = 5;
const VALUE_PADDING_PERCENT: f64 = 5.0;

/// Space reserved around each plot for labels
struct Margin {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

const MARGIN: Margin = Margin {
    left: 90.0,
    right: 30.0,
    top: 36.0,
    bottom: 36.0,
};

/// Renders stacked line plots, one per channel, into `path`
pub struct GraphRenderer {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl GraphRenderer {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width: width.max(200),
            height: height.max(150),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, snapshot: &TelemetrySnapshot) -> Result<()> {
        let surface = ImageSurface::create(Format::ARgb32, self.width as i32, self.height as i32)
            .context("creating image surface")?;
        {
            let cr = Context::new(&surface).context("creating cairo context")?;
            self.draw(&cr, snapshot)?;
        }

        let mut file =
            File::create(&self.path).with_context(|| format!("creating {}", self.path.display()))?;
        surface
            .write_to_png(&mut file)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    fn draw(&self, cr: &Context, snapshot: &TelemetrySnapshot) -> Result<()> {
        let width = self.width as f64;
        let height = self.height as f64;

        cr.set_source_rgb(1.0, 1.0, 1.0);
        cr.paint()?;
        cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Normal);

        let panel_height = height / 3.0;
        for (i, (channel, series)) in snapshot.iter().enumerate() {
            let plot = PlotArea {
                x: MARGIN.left,
                y: i as f64 * panel_height + MARGIN.top,
                width: width - MARGIN.left - MARGIN.right,
                height: panel_height - MARGIN.top - MARGIN.bottom,
            };
            if plot.width <= 0.0 || plot.height <= 0.0 {
                continue;
            }

            if i == 0 {
                draw_centered(cr, TITLE, plot.x + plot.width / 2.0, plot.y - 12.0, 16.0)?;
            }
            if i == 2 {
                draw_centered(cr, X_LABEL, plot.x + plot.width / 2.0, plot.y + plot.height + 30.0, 12.0)?;
            }

            draw_plot(cr, &plot, channel.label(), series)?;
        }
        Ok(())
    }
}

struct PlotArea {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

fn draw_centered(cr: &Context, text: &str, center_x: f64, baseline: f64, size: f64) -> Result<()> {
    cr.save()?;
    cr.set_source_rgb(0.0, 0.0, 0.0);
    cr.set_font_size(size);
    let extents = cr.text_extents(text)?;
    cr.move_to(center_x - extents.width() / 2.0, baseline);
    cr.show_text(text)?;
    cr.restore()?;
    Ok(())
}

fn draw_plot(cr: &Context, plot: &PlotArea, label: &str, series: &[f64]) -> Result<()> {
    let stats = SeriesStats::from_series(series);
    let (min_val, max_val) = stats
        .map(|s| s.axis_range(VALUE_PADDING_PERCENT))
        .unwrap_or((0.0, 1.0));
    let value_range = max_val - min_val;
    let to_y = |value: f64| plot.y + plot.height - (value - min_val) / value_range * plot.height;
    let x_step = if series.len() > 1 {
        plot.width / (series.len() - 1) as f64
    } else {
        0.0
    };

    // Frame and grid
    cr.save()?;
    cr.set_line_width(1.0);
    cr.set_source_rgb(0.85, 0.85, 0.85);
    cr.set_font_size(10.0);
    for i in 0..=Y_TICKS {
        let value = min_val + value_range * i as f64 / Y_TICKS as f64;
        let y = to_y(value);
        cr.move_to(plot.x, y);
        cr.line_to(plot.x + plot.width, y);
        cr.stroke()?;

        let tick = format!("{:.2}", value);
        let extents = cr.text_extents(&tick)?;
        cr.set_source_rgb(0.2, 0.2, 0.2);
        cr.move_to(plot.x - extents.width() - 6.0, y + extents.height() / 2.0);
        cr.show_text(&tick)?;
        cr.set_source_rgb(0.85, 0.85, 0.85);
    }
    cr.set_source_rgb(0.0, 0.0, 0.0);
    cr.rectangle(plot.x, plot.y, plot.width, plot.height);
    cr.stroke()?;
    cr.restore()?;

    // Rotated y label
    cr.save()?;
    cr.set_source_rgb(0.0, 0.0, 0.0);
    cr.set_font_size(12.0);
    let extents = cr.text_extents(label)?;
    cr.translate(plot.x - 70.0, plot.y + plot.height / 2.0 + extents.width() / 2.0);
    cr.rotate(-FRAC_PI_2);
    cr.move_to(0.0, 0.0);
    cr.show_text(label)?;
    cr.restore()?;

    // Series, broken at non-finite samples
    cr.save()?;
    cr.set_source_rgb(0.12, 0.47, 0.71);
    cr.set_line_width(1.5);
    cr.set_line_cap(LineCap::Round);
    cr.set_line_join(LineJoin::Round);
    let mut pen_down = false;
    for (i, value) in series.iter().enumerate() {
        if !value.is_finite() {
            pen_down = false;
            continue;
        }
        let x = plot.x + i as f64 * x_step;
        let y = to_y(*value);
        if pen_down {
            cr.line_to(x, y);
        } else {
            cr.move_to(x, y);
            pen_down = true;
        }
    }
    cr.stroke()?;
    cr.restore()?;
    Ok(())
}

impl Renderer for GraphRenderer {
    fn render(&mut self, snapshot: TelemetrySnapshot) {
        match self.write(&snapshot) {
            Ok(()) => debug!(
                "Plotted cycle {} to {}",
                snapshot.cycle(),
                self.path.display()
            ),
            Err(e) => error!("Failed to plot snapshot: {:#}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_png() {
        let path = std::env::temp_dir().join(format!("sensplot-plot-{}.png", std::process::id()));
        let mut renderer = GraphRenderer::new(&path, 600, 400);

        renderer.render(TelemetrySnapshot::new(
            2,
            vec![20.0, 20.5, 21.0, f64::NAN, 21.5],
            vec![40.0; 5],
            vec![0.0, 0.0, 0.0, 0.0, 12.0],
        ));

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        std::fs::remove_file(&path).unwrap();
    }
}
