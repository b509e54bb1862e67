//! Cell Formatters
//! Optional per-column presentation applied on top of raw stringification.

use crate::data::{display_value, to_fixed};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type FormatFn = dyn Fn(&Value) -> String + Send + Sync;

/// How a column turns a field value into cell text.
#[derive(Clone, Default)]
pub enum CellFormat {
    /// Stringified value, no decoration
    #[default]
    Raw,
    /// String value upper-cased (ticker symbols)
    Uppercase,
    /// `$` prefix, two decimals
    Currency,
    /// Two decimals, `%` suffix
    Percent,
    /// `$` prefix, thousands separators, at most three decimals
    GroupedCurrency,
    /// Caller-supplied formatter
    Custom(Arc<FormatFn>),
}

impl CellFormat {
    pub fn custom(f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        CellFormat::Custom(Arc::new(f))
    }

    /// Format one field. Missing and `null` fields are always empty; a
    /// numeric format on a non-numeric value falls back to the raw text.
    pub fn apply(&self, value: Option<&Value>) -> String {
        let value = match value {
            None | Some(Value::Null) => return String::new(),
            Some(v) => v,
        };

        match self {
            CellFormat::Raw => display_value(Some(value)),
            CellFormat::Uppercase => display_value(Some(value)).to_uppercase(),
            CellFormat::Currency => match value.as_f64() {
                Some(v) => format!("${}", to_fixed(v, 2)),
                None => display_value(Some(value)),
            },
            CellFormat::Percent => match value.as_f64() {
                Some(v) => format!("{}%", to_fixed(v, 2)),
                None => display_value(Some(value)),
            },
            CellFormat::GroupedCurrency => match value.as_f64() {
                Some(v) => format!("${}", group_thousands(v, 3)),
                None => display_value(Some(value)),
            },
            CellFormat::Custom(f) => f(value),
        }
    }
}

impl fmt::Debug for CellFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellFormat::Raw => f.write_str("Raw"),
            CellFormat::Uppercase => f.write_str("Uppercase"),
            CellFormat::Currency => f.write_str("Currency"),
            CellFormat::Percent => f.write_str("Percent"),
            CellFormat::GroupedCurrency => f.write_str("GroupedCurrency"),
            CellFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// en-US style number: comma thousands separators and up to
/// `max_decimals` fraction digits with trailing zeros removed.
pub fn group_thousands(v: f64, max_decimals: usize) -> String {
    if !v.is_finite() {
        return crate::data::format_number(v);
    }

    let fixed = to_fixed(v.abs(), max_decimals);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = v < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
