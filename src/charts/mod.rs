//! Charts module - price series, live chart management and rendering

mod manager;
mod plotter;
mod renderer;
mod series;

pub use manager::{render_chart, ChartCanvas, ChartError, ChartInstance, ChartManager, ChartStyle, Rgba};
pub use plotter::ChartPlotter;
pub use renderer::{ExportError, StaticChartRenderer};
pub use series::{format_day, parse_timestamp, sample_series, PricePoint, PriceSeries};
