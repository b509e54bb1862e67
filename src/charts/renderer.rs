//! Static Chart Renderer
//! Renders the live price chart to a PNG with the same styling as the
//! interactive view.
//!
//! Layout:
//! 1. Caption: series label centered on top
//! 2. Plot: price line over a day-granularity time axis
//! 3. Legend: upper right, series label with line swatch

use crate::charts::{format_day, ChartInstance};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Invalid image size {0}x{1}")]
    Size(u32, u32),
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}

fn draw_err<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Draw(e.to_string())
}

/// Maximum number of date labels on the X axis.
const MAX_X_LABELS: usize = 12;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `chart` into PNG bytes of the given size.
    pub fn render_to_bytes(
        chart: &ChartInstance,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ExportError> {
        if width == 0 || height == 0 {
            return Err(ExportError::Size(width, height));
        }

        let mut buffer = vec![0u8; (width as usize) * (height as usize) * 3];
        Self::draw(chart, &mut buffer, width, height)?;

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or(ExportError::Size(width, height))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Render `chart` and write the PNG to `path`.
    pub fn render_to_file(
        chart: &ChartInstance,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ExportError> {
        let bytes = Self::render_to_bytes(chart, width, height)?;
        std::fs::write(path, bytes)?;
        log::info!("chart.export path={} width={} height={}", path.display(), width, height);
        Ok(())
    }

    fn draw(
        chart: &ChartInstance,
        buffer: &mut [u8],
        width: u32,
        height: u32,
    ) -> Result<(), ExportError> {
        let style = chart.style();
        let series = chart.series();
        let (x0, x1) = series.x_range();
        let (y0, y1) = series.y_range();
        let [r, g, b, _] = style.color;
        let line_color = RGBColor(r, g, b);

        let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut ctx = ChartBuilder::on(&root)
            .margin(20)
            .caption(style.label, ("sans-serif", 22))
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .x_labels(Self::x_label_count(x0, x1, style.x_unit_days))
            .x_label_formatter(&|d| format_day(*d))
            .y_label_formatter(&|v| format!("{:.2}", v))
            .x_desc("Date")
            .draw()
            .map_err(draw_err)?;

        let stroke = (style.line_width.round() as u32).max(1);
        ctx.draw_series(LineSeries::new(
            series.xy().into_iter().map(|[x, y]| (x, y)),
            line_color.stroke_width(stroke),
        ))
        .map_err(draw_err)?
        .label(style.label)
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], line_color.stroke_width(stroke))
        });

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// One label per `unit_days`, capped so long series stay readable.
    fn x_label_count(x0: f64, x1: f64, unit_days: f64) -> usize {
        let unit = if unit_days > 0.0 { unit_days } else { 1.0 };
        let ticks = ((x1 - x0) / unit).floor() as usize + 1;
        ticks.clamp(2, MAX_X_LABELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{sample_series, ChartManager};

    #[test]
    fn test_x_label_count() {
        assert_eq!(StaticChartRenderer::x_label_count(0.0, 4.0, 1.0), 5);
        assert_eq!(StaticChartRenderer::x_label_count(0.0, 1.0, 1.0), 2);
        assert_eq!(StaticChartRenderer::x_label_count(0.0, 90.0, 1.0), 12);
        assert_eq!(StaticChartRenderer::x_label_count(0.0, 4.0, 0.0), 5);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let mut manager = ChartManager::new("c");
        let chart = manager.render(sample_series()).unwrap();
        assert!(matches!(
            StaticChartRenderer::render_to_bytes(chart, 0, 300),
            Err(ExportError::Size(0, 300))
        ));
    }

    #[test]
    fn test_render_to_bytes_is_png() {
        let mut manager = ChartManager::new("c");
        let chart = manager.render(sample_series()).unwrap();
        let bytes = StaticChartRenderer::render_to_bytes(chart, 400, 300).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_render_to_file_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strategy_chart.png");
        let mut manager = ChartManager::new("c");
        let chart = manager.render(sample_series()).unwrap();

        StaticChartRenderer::render_to_file(chart, &path, 400, 300).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert!(!written.is_empty());
        assert!(written.starts_with(b"\x89PNG"));
    }
}
