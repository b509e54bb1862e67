//! Page Module
//! In-memory document of named elements the renderers write into.
//!
//! Every element is addressed by the same string ID the dashboard layout
//! uses, so callers name targets exactly as the layout does.

use crate::charts::ChartManager;
use std::collections::BTreeMap;
use thiserror::Error;

pub const CRYPTO_TABLE: &str = "crypto-table";
pub const STOCK_TABLE: &str = "stock-table";
pub const RL_AGENT_TABLE: &str = "rl-agent-table";
pub const STRATEGY_TABLE: &str = "strategy-table";
pub const STRATEGY_RESULTS: &str = "strategy-results";
pub const MARKET_STATUS: &str = "market-status";
pub const CHART_CONTAINER: &str = "chart-container";
pub const STRATEGY_CHART: &str = "strategyChart";

#[derive(Error, Debug, PartialEq)]
pub enum PageError {
    #[error("No element with id '{0}'")]
    NotFound(String),
    #[error("Element '{id}' is not a {expected}")]
    WrongKind { id: String, expected: &'static str },
}

/// A table with distinguishable header and body sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableElement {
    head: Vec<Vec<String>>,
    body: Vec<Vec<String>>,
}

impl TableElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_header_row(&mut self, cells: Vec<String>) {
        self.head.push(cells);
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.body.push(cells);
    }

    pub fn header_rows(&self) -> &[Vec<String>] {
        &self.head
    }

    /// Cells of the first header row, empty if the table has no header.
    pub fn header(&self) -> &[String] {
        self.head.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.body.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Text region used by every action to report backend or client errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusRegion {
    message: Option<StatusMessage>,
}

impl StatusRegion {
    pub fn info(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            kind: StatusKind::Error,
            text: text.into(),
        });
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    /// Displayed text, empty when nothing is shown.
    pub fn text(&self) -> &str {
        self.message.as_ref().map(|m| m.text.as_str()).unwrap_or("")
    }
}

/// Block element whose visibility can be toggled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    visible: bool,
}

impl Container {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

pub enum Element {
    Table(TableElement),
    Status(StatusRegion),
    Container(Container),
    Canvas(ChartManager),
}

impl Element {
    fn kind(&self) -> &'static str {
        match self {
            Element::Table(_) => "table",
            Element::Status(_) => "status region",
            Element::Container(_) => "container",
            Element::Canvas(_) => "canvas",
        }
    }
}

/// The dashboard document.
#[derive(Default)]
pub struct Page {
    elements: BTreeMap<String, Element>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with every element the dashboard layout declares.
    pub fn dashboard() -> Self {
        let mut page = Self::new();
        for id in [CRYPTO_TABLE, STOCK_TABLE, RL_AGENT_TABLE, STRATEGY_TABLE] {
            page.insert(id, Element::Table(TableElement::new()));
        }
        for id in [STRATEGY_RESULTS, MARKET_STATUS] {
            page.insert(id, Element::Status(StatusRegion::default()));
        }
        page.insert(CHART_CONTAINER, Element::Container(Container::default()));
        page.insert(
            STRATEGY_CHART,
            Element::Canvas(ChartManager::new(STRATEGY_CHART)),
        );
        page
    }

    pub fn insert(&mut self, id: &str, element: Element) {
        self.elements.insert(id.to_string(), element);
    }

    fn get(&self, id: &str) -> Result<&Element, PageError> {
        self.elements
            .get(id)
            .ok_or_else(|| PageError::NotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Element, PageError> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| PageError::NotFound(id.to_string()))
    }

    pub fn table(&self, id: &str) -> Result<&TableElement, PageError> {
        match self.get(id)? {
            Element::Table(t) => Ok(t),
            _ => Err(wrong_kind(id, "table")),
        }
    }

    pub fn table_mut(&mut self, id: &str) -> Result<&mut TableElement, PageError> {
        match self.get_mut(id)? {
            Element::Table(t) => Ok(t),
            _ => Err(wrong_kind(id, "table")),
        }
    }

    pub fn status(&self, id: &str) -> Result<&StatusRegion, PageError> {
        match self.get(id)? {
            Element::Status(s) => Ok(s),
            _ => Err(wrong_kind(id, "status region")),
        }
    }

    pub fn status_mut(&mut self, id: &str) -> Result<&mut StatusRegion, PageError> {
        match self.get_mut(id)? {
            Element::Status(s) => Ok(s),
            _ => Err(wrong_kind(id, "status region")),
        }
    }

    pub fn container(&self, id: &str) -> Result<&Container, PageError> {
        match self.get(id)? {
            Element::Container(c) => Ok(c),
            _ => Err(wrong_kind(id, "container")),
        }
    }

    pub fn container_mut(&mut self, id: &str) -> Result<&mut Container, PageError> {
        match self.get_mut(id)? {
            Element::Container(c) => Ok(c),
            _ => Err(wrong_kind(id, "container")),
        }
    }

    pub fn chart(&self, id: &str) -> Result<&ChartManager, PageError> {
        match self.get(id)? {
            Element::Canvas(c) => Ok(c),
            _ => Err(wrong_kind(id, "canvas")),
        }
    }

    pub fn chart_mut(&mut self, id: &str) -> Result<&mut ChartManager, PageError> {
        match self.get_mut(id)? {
            Element::Canvas(c) => Ok(c),
            _ => Err(wrong_kind(id, "canvas")),
        }
    }

    /// IDs and kinds of all elements, in ID order.
    pub fn describe(&self) -> Vec<(&str, &'static str)> {
        self.elements
            .iter()
            .map(|(id, el)| (id.as_str(), el.kind()))
            .collect()
    }
}

fn wrong_kind(id: &str, expected: &'static str) -> PageError {
    PageError::WrongKind {
        id: id.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_declares_layout_ids() {
        let page = Page::dashboard();
        for id in [CRYPTO_TABLE, STOCK_TABLE, RL_AGENT_TABLE, STRATEGY_TABLE] {
            assert!(page.table(id).is_ok(), "{}", id);
        }
        assert!(page.status(STRATEGY_RESULTS).is_ok());
        assert!(page.status(MARKET_STATUS).is_ok());
        assert!(!page.container(CHART_CONTAINER).unwrap().is_visible());
        assert!(page.chart(STRATEGY_CHART).is_ok());
        assert_eq!(page.describe().len(), 8);
    }

    #[test]
    fn test_lookup_errors() {
        let mut page = Page::dashboard();
        assert_eq!(
            page.table("missing").unwrap_err(),
            PageError::NotFound("missing".to_string())
        );
        assert_eq!(
            page.table_mut(STRATEGY_RESULTS).unwrap_err(),
            PageError::WrongKind {
                id: STRATEGY_RESULTS.to_string(),
                expected: "table"
            }
        );
    }

    #[test]
    fn test_status_region() {
        let mut status = StatusRegion::default();
        assert_eq!(status.text(), "");
        status.error("no data");
        assert_eq!(status.text(), "no data");
        assert_eq!(status.message().map(|m| m.kind), Some(StatusKind::Error));
        status.info("3 rows");
        assert_eq!(status.text(), "3 rows");
        assert_eq!(status.message().map(|m| m.kind), Some(StatusKind::Info));
    }

    #[test]
    fn test_table_element_sections() {
        let mut table = TableElement::new();
        assert!(table.header().is_empty());
        table.push_header_row(vec!["A".into()]);
        table.push_row(vec!["1".into()]);
        assert_eq!(table.header(), ["A".to_string()]);
        assert_eq!(table.rows().len(), 1);
        assert!(!table.is_empty());
    }
}
