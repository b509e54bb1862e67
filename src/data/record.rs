//! Record Module
//! Schema-less backend records and their display stringification.

use serde_json::{Map, Value};

/// One data item returned by an endpoint: field name -> display primitive.
pub type Record = Map<String, Value>;

/// Stringify a field for display.
///
/// Missing fields and `null` render as an empty string so partial rows never
/// fail. Numbers without a fractional part drop the trailing `.0`.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                n.as_f64().map(format_number).unwrap_or_else(|| n.to_string())
            }
        }
        Some(other) => other.to_string(),
    }
}

/// Format a float the way the page shows raw numbers: integral values
/// without a fraction, everything else in shortest round-trip form.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        // covers -0.0
        return "0".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e21 {
        // `{:.0}` keeps every integer digit without switching to exponent form
        return format!("{:.0}", v);
    }
    format!("{}", v)
}

/// Fixed-point text with `digits` decimals. Exact binary ties round away
/// from zero and negative zero prints unsigned, as browsers do.
pub fn to_fixed(v: f64, digits: usize) -> String {
    const TAIL: usize = 25;
    if !v.is_finite() {
        return format_number(v);
    }
    if v == 0.0 {
        return format!("{:.*}", digits, 0.0);
    }

    let exact = format!("{:.*}", digits + TAIL, v.abs());
    let (head, tail) = exact.split_at(exact.len() - TAIL);
    if !(tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0')) {
        return format!("{:.*}", digits, v);
    }

    let mut out = round_up_last_digit(head);
    if out.ends_with('.') {
        out.pop();
    }
    if v < 0.0 {
        out.insert(0, '-');
    }
    out
}

/// Add one unit in the last place of a decimal string, carrying left.
fn round_up_last_digit(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for b in bytes.iter_mut().rev() {
        match *b {
            b'.' => continue,
            b'9' => *b = b'0',
            _ => {
                *b += 1;
                return String::from_utf8_lossy(&bytes).into_owned();
            }
        }
    }
    let mut out = String::from("1");
    out.push_str(&String::from_utf8_lossy(&bytes));
    out
}
