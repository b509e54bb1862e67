//! Price Series Module
//! `{timestamp, price}` points extracted from backend records.

use crate::data::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One point of a time-keyed price line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: NaiveDateTime, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// X coordinate in days since the Unix epoch (UTC).
    pub fn day(&self) -> f64 {
        self.timestamp.and_utc().timestamp() as f64 / SECONDS_PER_DAY
    }
}

/// Ordered price points. Order is kept exactly as received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// Extract points from records carrying `timestamp` and `price`.
    /// Records with an unparseable timestamp or non-numeric price are skipped.
    pub fn from_records(records: &[Record]) -> Self {
        let mut points = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let timestamp = record
                .get("timestamp")
                .and_then(Value::as_str)
                .and_then(parse_timestamp);
            let price = record.get("price").and_then(parse_price);
            match (timestamp, price) {
                (Some(timestamp), Some(price)) => points.push(PricePoint { timestamp, price }),
                _ => log::warn!("chart.skip_point index={} record={:?}", i, record),
            }
        }
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `[day, price]` pairs for plotting.
    pub fn xy(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.day(), p.price]).collect()
    }

    /// Day range covered by the series, widened to at least one day.
    pub fn x_range(&self) -> (f64, f64) {
        let (min, max) = min_max(self.points.iter().map(PricePoint::day));
        if max - min < 1.0 {
            let mid = (min + max) / 2.0;
            (mid - 0.5, mid + 0.5)
        } else {
            (min, max)
        }
    }

    /// Auto-scaled price range with 5% padding; never forced to include zero.
    pub fn y_range(&self) -> (f64, f64) {
        let (min, max) = min_max(self.points.iter().map(|p| p.price));
        let span = max - min;
        let pad = if span > 0.0 {
            span * 0.05
        } else {
            (min.abs() * 0.01).max(1.0)
        };
        (min - pad, max + pad)
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        (0.0, 1.0)
    } else {
        (min, max)
    }
}

/// Parse a date or date-time string. Accepts `YYYY-MM-DD`, ISO date-times
/// with `T` or space separators (optionally fractional seconds) and RFC 3339.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn parse_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Format a day coordinate as a short date label, e.g. `Feb 19`.
pub fn format_day(day: f64) -> String {
    DateTime::from_timestamp((day * SECONDS_PER_DAY).round() as i64, 0)
        .map(|dt| dt.format("%b %-d").to_string())
        .unwrap_or_default()
}

/// Five-day BTC sample used to prime the chart on startup.
pub fn sample_series() -> PriceSeries {
    let raw = [
        ("2024-02-19", 52138.49),
        ("2024-02-20", 51764.31),
        ("2024-02-21", 52286.79),
        ("2024-02-22", 51842.76),
        ("2024-02-23", 51319.50),
    ];
    PriceSeries::new(
        raw.iter()
            .filter_map(|(ts, price)| parse_timestamp(ts).map(|t| PricePoint::new(t, *price)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_timestamp_forms() {
        let day = parse_timestamp("2024-02-19").unwrap();
        assert_eq!(day.to_string(), "2024-02-19 00:00:00");
        assert_eq!(
            parse_timestamp("2024-02-19T13:45:00").unwrap().to_string(),
            "2024-02-19 13:45:00"
        );
        assert_eq!(
            parse_timestamp("2024-02-19 13:45:00.250").unwrap().to_string(),
            "2024-02-19 13:45:00.250"
        );
        assert_eq!(
            parse_timestamp("2024-02-19T13:45:00+02:00").unwrap().to_string(),
            "2024-02-19 11:45:00"
        );
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_from_records_skips_invalid_points_and_keeps_order() {
        let records: Vec<Record> = json!([
            {"timestamp": "2024-02-21", "price": 3.0},
            {"timestamp": "not a date", "price": 1.0},
            {"timestamp": "2024-02-19", "price": "2.5"},
            {"timestamp": "2024-02-20"},
        ])
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect();

        let series = PriceSeries::from_records(&records);
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].price, 3.0);
        assert_eq!(series.points()[1].price, 2.5);
    }

    #[test]
    fn test_day_coordinates() {
        let series = sample_series();
        let xy = series.xy();
        assert_eq!(xy.len(), 5);
        assert_eq!(xy[1][0] - xy[0][0], 1.0);
        assert_eq!(format_day(xy[0][0]), "Feb 19");
    }

    #[test]
    fn test_ranges_are_not_zero_based() {
        let series = sample_series();
        let (lo, hi) = series.y_range();
        assert!(lo > 50000.0 && lo < 51319.5);
        assert!(hi > 52286.79);
        let (x0, x1) = series.x_range();
        assert_eq!(x1 - x0, 4.0);
    }

    #[test]
    fn test_single_point_ranges_are_widened() {
        let series = PriceSeries::new(vec![PricePoint::new(
            parse_timestamp("2024-02-19").unwrap(),
            100.0,
        )]);
        let (x0, x1) = series.x_range();
        assert_eq!(x1 - x0, 1.0);
        assert_eq!(series.y_range(), (99.0, 101.0));
    }
}
