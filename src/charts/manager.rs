//! Chart Manager Module
//! Owns the one live chart instance bound to a canvas.
//!
//! A canvas tracks how many instances are bound to it. Instances unbind on
//! drop, and the manager always destroys the previous instance before it
//! builds the next one, so the count never exceeds one.

use crate::charts::PriceSeries;
use crate::page::{Page, PageError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ChartError {
    #[error(transparent)]
    Page(#[from] PageError),
    #[error("Series has no plottable points")]
    EmptySeries,
}

/// RGBA colour, channel values 0-255 (alpha as 0-255 too).
pub type Rgba = [u8; 4];

/// Fixed styling of the price line and its axes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub label: &'static str,
    pub color: Rgba,
    pub line_width: f32,
    pub fill: bool,
    /// X axis is a time scale with one tick per day
    pub x_unit_days: f64,
    pub y_begin_at_zero: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            label: "Price",
            color: [75, 192, 192, 255],
            line_width: 2.0,
            fill: false,
            x_unit_days: 1.0,
            y_begin_at_zero: false,
        }
    }
}

/// Drawing surface a chart instance binds to.
#[derive(Debug, Clone)]
pub struct ChartCanvas {
    id: String,
    bound: Arc<AtomicUsize>,
}

impl ChartCanvas {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            bound: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of chart instances currently bound to this canvas.
    pub fn live_instances(&self) -> usize {
        self.bound.load(Ordering::SeqCst)
    }

    fn bind(&self) -> CanvasBinding {
        self.bound.fetch_add(1, Ordering::SeqCst);
        CanvasBinding {
            bound: self.bound.clone(),
        }
    }
}

struct CanvasBinding {
    bound: Arc<AtomicUsize>,
}

impl Drop for CanvasBinding {
    fn drop(&mut self) {
        self.bound.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A live chart bound to a canvas.
pub struct ChartInstance {
    generation: u64,
    style: ChartStyle,
    series: PriceSeries,
    _binding: CanvasBinding,
}

impl ChartInstance {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    /// Release the canvas.
    pub fn destroy(self) {
        log::debug!("chart.destroy generation={}", self.generation);
    }
}

/// Keeps exactly one live chart per canvas.
pub struct ChartManager {
    canvas: ChartCanvas,
    active: Option<ChartInstance>,
    generation: u64,
}

impl ChartManager {
    pub fn new(canvas_id: &str) -> Self {
        Self {
            canvas: ChartCanvas::new(canvas_id),
            active: None,
            generation: 0,
        }
    }

    pub fn canvas(&self) -> &ChartCanvas {
        &self.canvas
    }

    pub fn active(&self) -> Option<&ChartInstance> {
        self.active.as_ref()
    }

    /// Replace the live chart with one drawing `series`.
    ///
    /// An empty series is rejected and the current chart stays in place.
    pub fn render(&mut self, series: PriceSeries) -> Result<&ChartInstance, ChartError> {
        if series.is_empty() {
            return Err(ChartError::EmptySeries);
        }

        // Destroy and rebuild within one call; no other render can interleave.
        if let Some(previous) = self.active.take() {
            previous.destroy();
        }

        self.generation += 1;
        let instance = ChartInstance {
            generation: self.generation,
            style: ChartStyle::default(),
            series,
            _binding: self.canvas.bind(),
        };
        log::debug!(
            "chart.create canvas={} generation={} points={}",
            self.canvas.id,
            instance.generation,
            instance.series.len()
        );
        Ok(self.active.insert(instance))
    }
}

/// Draw `series` on canvas `canvas_id` and reveal `container_id`.
///
/// Returns the number of plotted points.
pub fn render_chart(
    page: &mut Page,
    canvas_id: &str,
    container_id: &str,
    series: PriceSeries,
) -> Result<usize, ChartError> {
    page.container(container_id)?;
    let points = page.chart_mut(canvas_id)?.render(series)?.series().len();
    page.container_mut(container_id)?.show();
    log::info!("chart.rendered canvas={} points={}", canvas_id, points);
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::sample_series;
    use crate::page::{CHART_CONTAINER, STRATEGY_CHART, STRATEGY_TABLE};

    #[test]
    fn test_rerender_keeps_one_instance() {
        let mut manager = ChartManager::new("c");
        manager.render(sample_series()).unwrap();
        manager.render(sample_series()).unwrap();
        assert_eq!(manager.canvas().live_instances(), 1);
        assert_eq!(manager.active().map(|c| c.generation()), Some(2));
    }

    #[test]
    fn test_dropping_manager_releases_canvas() {
        let mut manager = ChartManager::new("c");
        manager.render(sample_series()).unwrap();
        let canvas = manager.canvas().clone();
        assert_eq!(canvas.live_instances(), 1);
        drop(manager);
        assert_eq!(canvas.live_instances(), 0);
    }

    #[test]
    fn test_empty_series_keeps_previous_chart() {
        let mut manager = ChartManager::new("c");
        manager.render(sample_series()).unwrap();
        assert_eq!(
            manager.render(PriceSeries::default()).err(),
            Some(ChartError::EmptySeries)
        );
        assert_eq!(manager.canvas().live_instances(), 1);
        assert_eq!(manager.active().map(|c| c.series().len()), Some(5));
    }

    #[test]
    fn test_fixed_style() {
        let mut manager = ChartManager::new("c");
        let style = manager.render(sample_series()).unwrap().style().clone();
        assert_eq!(style.label, "Price");
        assert_eq!(style.color, [75, 192, 192, 255]);
        assert_eq!(style.line_width, 2.0);
        assert!(!style.fill);
        assert!(!style.y_begin_at_zero);
    }

    #[test]
    fn test_render_chart_shows_container() {
        let mut page = Page::dashboard();
        assert_eq!(
            render_chart(&mut page, STRATEGY_CHART, CHART_CONTAINER, sample_series()),
            Ok(5)
        );
        assert!(page.container(CHART_CONTAINER).unwrap().is_visible());

        render_chart(&mut page, STRATEGY_CHART, CHART_CONTAINER, sample_series()).unwrap();
        assert_eq!(
            page.chart(STRATEGY_CHART).unwrap().canvas().live_instances(),
            1
        );
    }

    #[test]
    fn test_render_chart_bad_targets() {
        let mut page = Page::dashboard();
        assert!(matches!(
            render_chart(&mut page, STRATEGY_TABLE, CHART_CONTAINER, sample_series()),
            Err(ChartError::Page(PageError::WrongKind { .. }))
        ));
        assert!(!page.container(CHART_CONTAINER).unwrap().is_visible());
        assert!(matches!(
            render_chart(&mut page, STRATEGY_CHART, "nope", sample_series()),
            Err(ChartError::Page(PageError::NotFound(_)))
        ));
        assert_eq!(
            page.chart(STRATEGY_CHART).unwrap().canvas().live_instances(),
            0
        );
    }

    #[test]
    fn test_empty_series_does_not_show_container() {
        let mut page = Page::dashboard();
        assert_eq!(
            render_chart(&mut page, STRATEGY_CHART, CHART_CONTAINER, PriceSeries::default()),
            Err(ChartError::EmptySeries)
        );
        assert!(!page.container(CHART_CONTAINER).unwrap().is_visible());
    }
}
