//! Column Specs
//! Ordered field selection with optional header label and formatter.

use crate::table::CellFormat;

/// One displayed column.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub field: String,
    pub label: Option<String>,
    pub format: CellFormat,
}

impl ColumnSpec {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: None,
            format: CellFormat::Raw,
        }
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn formatted(mut self, format: CellFormat) -> Self {
        self.format = format;
        self
    }

    /// Header text: the explicit label, or one derived from the field name.
    pub fn header(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => header_label(&self.field),
        }
    }
}

/// Raw columns for a list of field names.
pub fn columns(fields: &[&str]) -> Vec<ColumnSpec> {
    fields.iter().map(|f| ColumnSpec::new(*f)).collect()
}

/// Derive a header label from a field name.
///
/// Upper-cases the first character and replaces only the first underscore
/// with a space: `"short_mavg"` -> `"Short mavg"`, `"z_score_x"` -> `"Z score_x"`.
pub fn header_label(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let rest = chars.as_str().replacen('_', " ", 1);
            first.to_uppercase().chain(rest.chars()).collect()
        }
    }
}
