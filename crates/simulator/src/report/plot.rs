//! Chart rendering.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::debug;

use super::latex;
use super::ChartSpec;
use crate::error::ReportError;
use crate::stats::ScalarSummary;

const MAX_HISTOGRAM_BINS: usize = 30;

/// A bar height with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBar {
    /// Bar height.
    pub value: f64,
    /// Bottom of the whisker.
    pub lower: f64,
    /// Top of the whisker.
    pub upper: f64,
}

impl From<&ScalarSummary> for ErrorBar {
    fn from(summary: &ScalarSummary) -> Self {
        Self {
            value: summary.mean,
            lower: summary.interval.lower,
            upper: summary.interval.upper,
        }
    }
}

/// Something that can draw the three chart kinds of a report.
pub trait Plotter {
    /// Frequency histogram of per-replication values.
    fn histogram(&mut self, chart: &ChartSpec, values: &[f64]) -> Result<(), ReportError>;

    /// One bar per element, with an interval whisker.
    fn bars_with_error(&mut self, chart: &ChartSpec, bars: &[ErrorBar])
        -> Result<(), ReportError>;

    /// Piecewise-constant trajectory through `(time, value)` points.
    fn step_series(&mut self, chart: &ChartSpec, points: &[(f64, f64)])
        -> Result<(), ReportError>;
}

/// Writes each chart as `<out>/images/generated/<name>.svg` together with a
/// caption snippet under `<out>/figures/`.
#[derive(Debug)]
pub struct SvgPlotter {
    out_dir: PathBuf,
    size: (u32, u32),
    written: Vec<PathBuf>,
}

impl SvgPlotter {
    /// Write under `out_dir` at 800×600 pixels.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            size: (800, 600),
            written: Vec::new(),
        }
    }

    /// Set the image size in pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Root of the output tree.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Images written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn prepare(&self, chart: &ChartSpec) -> Result<PathBuf, ReportError> {
        let path = latex::generated_image_path(&self.out_dir, &chart.name)?;
        latex::write_figure_content(&self.out_dir, &chart.name, &chart.title)?;
        Ok(path)
    }

    fn finish(&mut self, path: PathBuf) {
        debug!(path = %path.display(), "Chart written");
        self.written.push(path);
    }
}

fn render_error<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::Render(err.to_string())
}

/// Widen a degenerate range so the axis stays drawable.
fn padded_range(low: f64, high: f64) -> (f64, f64) {
    if high > low {
        (low, high)
    } else {
        (low - 0.5, high + 0.5)
    }
}

/// Equal-width bins over the sample range as `(start, end, count)`.
fn bin(values: &[f64]) -> Vec<(f64, f64, usize)> {
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (low, high) = padded_range(min, max);
    let bins = ((values.len() as f64).sqrt().ceil() as usize).clamp(1, MAX_HISTOGRAM_BINS);
    let width = (high - low) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let i = (((v - low) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = low + i as f64 * width;
            (start, start + width, count)
        })
        .collect()
}

/// Expand `(t, v)` samples into the corner points of a step plot.
fn step_points(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(points.len() * 2);
    for (i, &(t, v)) in points.iter().enumerate() {
        if i > 0 {
            out.push((t, points[i - 1].1));
        }
        out.push((t, v));
    }
    out
}

impl Plotter for SvgPlotter {
    fn histogram(&mut self, chart: &ChartSpec, values: &[f64]) -> Result<(), ReportError> {
        let path = self.prepare(chart)?;
        let bins = bin(values);
        let (x0, x1) = match (bins.first(), bins.last()) {
            (Some(first), Some(last)) => (first.0, last.1),
            _ => (0.0, 1.0),
        };
        let top = bins.iter().map(|b| b.2).max().unwrap_or(0).max(1) as f64 * 1.1;

        {
            let root = SVGBackend::new(&path, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            let mut ctx = ChartBuilder::on(&root)
                .caption(&chart.title, ("sans-serif", 20))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(x0..x1, 0f64..top)
                .map_err(render_error)?;
            ctx.configure_mesh()
                .x_desc(chart.x_label.as_str())
                .y_desc(chart.y_label.as_str())
                .draw()
                .map_err(render_error)?;
            ctx.draw_series(bins.iter().map(|&(start, end, count)| {
                Rectangle::new([(start, 0.0), (end, count as f64)], BLUE.mix(0.6).filled())
            }))
            .map_err(render_error)?;
            root.present().map_err(render_error)?;
        }

        self.finish(path);
        Ok(())
    }

    fn bars_with_error(
        &mut self,
        chart: &ChartSpec,
        bars: &[ErrorBar],
    ) -> Result<(), ReportError> {
        let path = self.prepare(chart)?;
        let top = bars
            .iter()
            .map(|b| b.upper.max(b.value))
            .fold(0.0f64, f64::max);
        let top = if top > 0.0 { top * 1.1 } else { 1.0 };
        let width = bars.len().max(1) as f64;

        {
            let root = SVGBackend::new(&path, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            let mut ctx = ChartBuilder::on(&root)
                .caption(&chart.title, ("sans-serif", 20))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(-0.5f64..width - 0.5, 0f64..top)
                .map_err(render_error)?;
            ctx.configure_mesh()
                .x_desc(chart.x_label.as_str())
                .y_desc(chart.y_label.as_str())
                .draw()
                .map_err(render_error)?;
            ctx.draw_series(bars.iter().enumerate().map(|(i, bar)| {
                let x = i as f64;
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, bar.value)], BLUE.mix(0.6).filled())
            }))
            .map_err(render_error)?
            .label("mean")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BLUE.filled()));
            ctx.draw_series(bars.iter().enumerate().map(|(i, bar)| {
                let x = i as f64;
                PathElement::new(vec![(x, bar.lower), (x, bar.upper)], RED.stroke_width(2))
            }))
            .map_err(render_error)?
            .label("confidence interval")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], RED));
            ctx.configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(render_error)?;
            root.present().map_err(render_error)?;
        }

        self.finish(path);
        Ok(())
    }

    fn step_series(
        &mut self,
        chart: &ChartSpec,
        points: &[(f64, f64)],
    ) -> Result<(), ReportError> {
        let path = self.prepare(chart)?;
        let steps = step_points(points);
        let (t0, t1) = padded_range(
            steps.first().map_or(0.0, |p| p.0),
            steps.last().map_or(1.0, |p| p.0),
        );
        let low = steps.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let high = steps.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let (y0, y1) = if steps.is_empty() {
            (0.0, 1.0)
        } else {
            padded_range(low.min(0.0), high.max(0.0) * 1.1)
        };

        {
            let root = SVGBackend::new(&path, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            let mut ctx = ChartBuilder::on(&root)
                .caption(&chart.title, ("sans-serif", 20))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(t0..t1, y0..y1)
                .map_err(render_error)?;
            ctx.configure_mesh()
                .x_desc(chart.x_label.as_str())
                .y_desc(chart.y_label.as_str())
                .draw()
                .map_err(render_error)?;
            ctx.draw_series(LineSeries::new(steps, &RED))
                .map_err(render_error)?;
            root.present().map_err(render_error)?;
        }

        self.finish(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(name: &str) -> ChartSpec {
        ChartSpec {
            name: name.to_string(),
            title: "Average delay".to_string(),
            x_label: "min".to_string(),
            y_label: "count".to_string(),
        }
    }

    #[test]
    fn test_bins_cover_every_value() {
        let values = [0.0, 0.5, 1.0, 1.5, 2.0, 2.0, 3.0, 4.0, 4.0];
        let bins = bin(&values);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.iter().map(|b| b.2).sum::<usize>(), values.len());
        assert_eq!(bins[0].0, 0.0);
        assert!((bins[2].1 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_values_get_one_padded_bin() {
        let bins = bin(&[2.0]);
        assert_eq!(bins, vec![(1.5, 2.5, 1)]);
        assert!(bin(&[]).is_empty());
    }

    #[test]
    fn test_step_points_hold_previous_value() {
        let steps = step_points(&[(0.0, 0.0), (1.0, 2.0), (3.0, 1.0)]);
        assert_eq!(
            steps,
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 2.0), (3.0, 2.0), (3.0, 1.0)]
        );
    }

    #[test]
    fn test_svg_plotter_writes_image_and_caption() {
        let dir = tempfile::tempdir().unwrap();
        let mut plotter = SvgPlotter::new(dir.path()).with_size(320, 240);

        plotter
            .histogram(&chart("delay-25_inf"), &[1.0, 2.0, 2.5, 3.0])
            .unwrap();
        plotter
            .bars_with_error(
                &chart("dist-25_inf"),
                &[ErrorBar {
                    value: 0.5,
                    lower: 0.4,
                    upper: 0.6,
                }],
            )
            .unwrap();
        plotter
            .step_series(&chart("queue-25_inf"), &[(0.0, 0.0), (1.0, 1.0)])
            .unwrap();

        assert_eq!(plotter.written().len(), 3);
        let svg = dir.path().join("images/generated/delay-25_inf.svg");
        assert!(std::fs::read_to_string(svg).unwrap().contains("<svg"));
        let caption =
            std::fs::read_to_string(dir.path().join("figures/delay-25_inf-content.tex")).unwrap();
        assert!(caption.contains("\\figurecontent{delay-25_inf}{Average delay}"));
    }
}
