//! Result Envelope Module
//! Normalizes the three response shapes the backend produces into one payload.
//!
//! Shapes seen on the wire:
//! 1. Bare array: `[{...}, {...}]`
//! 2. Wrapped: `{"Data": [{...}, {...}]}`
//! 3. Error object: `{"error": "message"}`

use crate::data::Record;
use serde_json::Value;
use thiserror::Error;

/// Key under which wrapped endpoints nest their records.
pub const DATA_KEY: &str = "Data";
/// Key carrying a backend-reported error message.
pub const ERROR_KEY: &str = "error";

#[derive(Error, Debug, PartialEq)]
pub enum EnvelopeError {
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
    #[error("Record {0} is not an object")]
    NonObjectRecord(usize),
}

/// Canonical result of one endpoint call.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Records(Vec<Record>),
    Failed(String),
}

impl Payload {
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            Payload::Records(records) => Some(records),
            Payload::Failed(_) => None,
        }
    }
}

/// Normalize a decoded JSON body into a [`Payload`].
pub fn normalize(value: Value) -> Result<Payload, EnvelopeError> {
    match value {
        Value::Array(items) => collect_records(items).map(Payload::Records),
        Value::Object(mut map) => {
            if let Some(err) = map.get(ERROR_KEY).filter(|v| is_truthy(v)) {
                let message = match err {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                return Ok(Payload::Failed(message));
            }
            match map.remove(DATA_KEY) {
                Some(Value::Array(items)) => collect_records(items).map(Payload::Records),
                Some(other) => Err(EnvelopeError::UnexpectedShape(format!(
                    "'{}' is {}",
                    DATA_KEY,
                    kind(&other)
                ))),
                None => {
                    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    Err(EnvelopeError::UnexpectedShape(format!(
                        "object with keys [{}]",
                        keys.join(", ")
                    )))
                }
            }
        }
        other => Err(EnvelopeError::UnexpectedShape(kind(&other).to_string())),
    }
}

fn collect_records(items: Vec<Value>) -> Result<Vec<Record>, EnvelopeError> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            _ => Err(EnvelopeError::NonObjectRecord(i)),
        })
        .collect()
}

// An empty string, `false`, `0` or `null` error field does not count as an error.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
