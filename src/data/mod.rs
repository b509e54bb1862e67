//! Data module - backend records, envelope normalization and the HTTP client

mod client;
mod envelope;
mod record;

pub use client::{ApiClient, ClientError, Endpoint, Method, Transport};
pub use envelope::{normalize, EnvelopeError, Payload};
pub use record::{display_value, format_number, to_fixed, Record};

#[cfg(test)]
pub use client::testing;
