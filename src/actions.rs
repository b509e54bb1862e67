//! Dashboard Actions
//! Endpoint fetches and how their results land on the page.
//!
//! Every action follows the same pipeline: fetch on a background thread,
//! normalize the response, then on the UI thread either render it or report
//! the error in the action's status region.

use crate::charts::{render_chart, PriceSeries};
use crate::data::{ApiClient, ClientError, Endpoint, Payload};
use crate::page::{
    Page, CHART_CONTAINER, CRYPTO_TABLE, MARKET_STATUS, RL_AGENT_TABLE, STOCK_TABLE,
    STRATEGY_CHART, STRATEGY_RESULTS, STRATEGY_TABLE,
};
use crate::table::{columns, render_table, CellFormat, ColumnSpec};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    FetchCryptos,
    FetchStocks,
    TrainRlAgent,
    EvaluateRlAgent,
    RunTrendFollower,
    RunMeanReversion,
    ShowStrategyResults,
}

/// Where an action's records are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Table(&'static str),
    Chart {
        canvas: &'static str,
        container: &'static str,
    },
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::FetchCryptos,
        Action::FetchStocks,
        Action::TrainRlAgent,
        Action::EvaluateRlAgent,
        Action::RunTrendFollower,
        Action::RunMeanReversion,
        Action::ShowStrategyResults,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::FetchCryptos => "fetch_cryptos",
            Action::FetchStocks => "fetch_stocks",
            Action::TrainRlAgent => "train_rl_agent",
            Action::EvaluateRlAgent => "evaluate_rl_agent",
            Action::RunTrendFollower => "run_trend_follower",
            Action::RunMeanReversion => "run_mean_reversion",
            Action::ShowStrategyResults => "show_strategy_results",
        }
    }

    /// Button text.
    pub fn label(&self) -> &'static str {
        match self {
            Action::FetchCryptos => "Fetch Crypto Data",
            Action::FetchStocks => "Fetch Stock Data",
            Action::TrainRlAgent => "Train RL Agent",
            Action::EvaluateRlAgent => "Evaluate RL Agent",
            Action::RunTrendFollower => "Run Trend Follower",
            Action::RunMeanReversion => "Run Mean Reversion",
            Action::ShowStrategyResults => "Show Strategy Chart",
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Action::FetchCryptos => Endpoint::Cryptos,
            Action::FetchStocks => Endpoint::Stocks,
            Action::TrainRlAgent => Endpoint::TrainRlAgent,
            Action::EvaluateRlAgent => Endpoint::EvaluateRlAgent,
            Action::RunTrendFollower | Action::ShowStrategyResults => Endpoint::TrendFollower,
            Action::RunMeanReversion => Endpoint::MeanReversion,
        }
    }

    pub fn target(&self) -> Target {
        match self {
            Action::FetchCryptos => Target::Table(CRYPTO_TABLE),
            Action::FetchStocks => Target::Table(STOCK_TABLE),
            Action::TrainRlAgent | Action::EvaluateRlAgent => Target::Table(RL_AGENT_TABLE),
            Action::RunTrendFollower | Action::RunMeanReversion => Target::Table(STRATEGY_TABLE),
            Action::ShowStrategyResults => Target::Chart {
                canvas: STRATEGY_CHART,
                container: CHART_CONTAINER,
            },
        }
    }

    /// Status region that reports this action's errors.
    pub fn status_region(&self) -> &'static str {
        match self {
            Action::FetchCryptos
            | Action::FetchStocks
            | Action::TrainRlAgent
            | Action::EvaluateRlAgent => MARKET_STATUS,
            Action::RunTrendFollower
            | Action::RunMeanReversion
            | Action::ShowStrategyResults => STRATEGY_RESULTS,
        }
    }

    /// Displayed columns for table actions; empty for the chart action.
    pub fn columns(&self) -> Vec<ColumnSpec> {
        match self {
            Action::FetchCryptos => vec![
                ColumnSpec::new("symbol")
                    .labelled("Symbol")
                    .formatted(CellFormat::Uppercase),
                ColumnSpec::new("current_price")
                    .labelled("Current Price")
                    .formatted(CellFormat::Currency),
                ColumnSpec::new("24h_change")
                    .labelled("24h Change")
                    .formatted(CellFormat::Percent),
                ColumnSpec::new("market_cap")
                    .labelled("Market Cap")
                    .formatted(CellFormat::GroupedCurrency),
            ],
            Action::FetchStocks => vec![
                ColumnSpec::new("ticker").labelled("Ticker"),
                ColumnSpec::new("current_price")
                    .labelled("Current Price")
                    .formatted(CellFormat::Currency),
                ColumnSpec::new("day_high")
                    .labelled("Day High")
                    .formatted(CellFormat::Currency),
                ColumnSpec::new("day_low")
                    .labelled("Day Low")
                    .formatted(CellFormat::Currency),
            ],
            Action::TrainRlAgent => columns(&["timestamp", "price", "volume"]),
            Action::EvaluateRlAgent | Action::RunTrendFollower => {
                columns(&["timestamp", "price", "volume", "short_mavg", "long_mavg"])
            }
            Action::RunMeanReversion => columns(&[
                "price",
                "mean",
                "std",
                "z_score",
                "signal",
                "positions",
                "buy_signal",
                "sell_signal",
            ]),
            Action::ShowStrategyResults => Vec::new(),
        }
    }
}

/// Finished fetch, ready to be applied on the UI thread.
#[derive(Debug)]
pub struct ActionResult {
    pub action: Action,
    pub outcome: Result<Payload, ClientError>,
}

/// What applying a result did to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Table { id: &'static str, rows: usize },
    Chart { points: usize },
    Reported(String),
}

impl Applied {
    /// Informational text shown in the status region after a render.
    pub fn summary(&self) -> String {
        match self {
            Applied::Table { rows, .. } => format!("{} rows", rows),
            Applied::Chart { points } => format!("Chart rendered ({} points)", points),
            Applied::Reported(message) => message.clone(),
        }
    }
}

/// Fetch the action's endpoint. Blocks the calling thread.
pub fn run(client: &ApiClient, action: Action) -> ActionResult {
    log::info!(
        "action.start name={} url={}",
        action.name(),
        client.url_for(action.endpoint())
    );
    let outcome = client.fetch(action.endpoint());
    match &outcome {
        Ok(Payload::Records(records)) => {
            log::info!("action.response name={} records={}", action.name(), records.len())
        }
        Ok(Payload::Failed(message)) => {
            log::warn!("action.backend_error name={} error={}", action.name(), message)
        }
        Err(e) => log::error!("action.failed name={} error={}", action.name(), e),
    }
    ActionResult { action, outcome }
}

/// Apply a finished fetch to the page.
///
/// Backend-reported errors and client failures go to the action's status
/// region and leave the target untouched. A successful render replaces any
/// stale message with a row or point count.
pub fn apply(page: &mut Page, result: ActionResult) -> Applied {
    let action = result.action;
    let records = match result.outcome {
        Ok(Payload::Records(records)) => records,
        Ok(Payload::Failed(message)) => return report(page, action, message),
        Err(e) => return report(page, action, e.to_string()),
    };

    let applied = match action.target() {
        Target::Table(id) => render_table(page, id, &records, &action.columns())
            .map(|()| Applied::Table {
                id,
                rows: records.len(),
            })
            .map_err(|e| e.to_string()),
        Target::Chart { canvas, container } => {
            render_chart(page, canvas, container, PriceSeries::from_records(&records))
                .map(|points| Applied::Chart { points })
                .map_err(|e| e.to_string())
        }
    };

    match applied {
        Ok(applied) => {
            if let Ok(status) = page.status_mut(action.status_region()) {
                status.info(applied.summary());
            }
            log::info!("action.applied name={} result={:?}", action.name(), applied);
            applied
        }
        Err(message) => report(page, action, message),
    }
}

fn report(page: &mut Page, action: Action, message: String) -> Applied {
    match page.status_mut(action.status_region()) {
        Ok(status) => status.error(message.clone()),
        Err(e) => log::error!("action.report name={} error={}", action.name(), e),
    }
    Applied::Reported(message)
}

/// Runs actions on background threads and hands results back in
/// completion order.
pub struct Dispatcher {
    client: ApiClient,
    tx: Sender<ActionResult>,
    rx: Receiver<ActionResult>,
    in_flight: usize,
}

impl Dispatcher {
    pub fn new(client: ApiClient) -> Self {
        let (tx, rx) = channel();
        Self {
            client,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Requests started but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start `action` on its own thread. Overlapping requests are not
    /// cancelled; whichever completes last is displayed.
    pub fn dispatch(&mut self, action: Action) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("action-{}", action.name()))
            .spawn(move || {
                let _ = tx.send(run(&client, action));
            });
        match spawned {
            Ok(_) => self.in_flight += 1,
            Err(e) => log::error!("action.spawn name={} error={}", action.name(), e),
        }
    }

    /// Apply every result that has arrived, without blocking.
    pub fn drain(&mut self, page: &mut Page) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            applied.push(apply(page, result));
        }
        applied
    }

    /// Block up to `timeout` for the next result and apply it.
    pub fn wait(&mut self, page: &mut Page, timeout: Duration) -> Option<Applied> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(apply(page, result))
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testing::FakeTransport;
    use crate::data::Method;
    use crate::page::StatusKind;
    use serde_json::json;
    use std::sync::Arc;

    fn client(transport: FakeTransport) -> ApiClient {
        ApiClient::new("http://backend.test", Arc::new(transport))
    }

    fn records(value: serde_json::Value) -> Payload {
        crate::data::normalize(value).unwrap()
    }

    fn ok(action: Action, payload: Payload) -> ActionResult {
        ActionResult {
            action,
            outcome: Ok(payload),
        }
    }

    #[test]
    fn test_every_action_targets_existing_elements() {
        let page = Page::dashboard();
        for action in Action::ALL {
            match action.target() {
                Target::Table(id) => {
                    assert!(page.table(id).is_ok(), "{:?}", action);
                    assert!(!action.columns().is_empty(), "{:?}", action);
                }
                Target::Chart { canvas, container } => {
                    assert!(page.chart(canvas).is_ok());
                    assert!(page.container(container).is_ok());
                }
            }
            assert!(page.status(action.status_region()).is_ok(), "{:?}", action);
        }
    }

    #[test]
    fn test_trend_follower_error_reports_without_table_update() {
        let mut page = Page::dashboard();
        apply(
            &mut page,
            ok(
                Action::RunTrendFollower,
                records(json!({"Data": [{"timestamp": "2024-02-19", "price": 1.0}]})),
            ),
        );
        let before = page.table(STRATEGY_TABLE).unwrap().clone();

        let applied = apply(
            &mut page,
            ok(Action::RunTrendFollower, records(json!({"error": "no data"}))),
        );

        assert_eq!(applied, Applied::Reported("no data".to_string()));
        let status = page.status(STRATEGY_RESULTS).unwrap();
        assert_eq!(status.text(), "no data");
        assert_eq!(status.message().map(|m| m.kind), Some(StatusKind::Error));
        assert_eq!(page.table(STRATEGY_TABLE).unwrap(), &before);
    }

    #[test]
    fn test_success_replaces_stale_error() {
        let mut page = Page::dashboard();
        apply(
            &mut page,
            ok(Action::RunMeanReversion, Payload::Failed("boom".to_string())),
        );
        apply(
            &mut page,
            ok(Action::RunMeanReversion, records(json!([{"price": 1.0, "z_score": 0.5}]))),
        );
        let status = page.status(STRATEGY_RESULTS).unwrap();
        assert_eq!(status.text(), "1 rows");
        assert_eq!(status.message().map(|m| m.kind), Some(StatusKind::Info));
        let table = page.table(STRATEGY_TABLE).unwrap();
        assert_eq!(table.header()[3], "Z score");
        assert_eq!(table.rows()[0], ["1", "", "", "0.5", "", "", "", ""]);
    }

    #[test]
    fn test_crypto_table_is_formatted() {
        let mut page = Page::dashboard();
        let applied = apply(
            &mut page,
            ok(
                Action::FetchCryptos,
                records(json!([
                    {"symbol": "btc", "current_price": 52138.494, "24h_change": -1.234, "market_cap": 1023456789}
                ])),
            ),
        );
        assert_eq!(
            applied,
            Applied::Table {
                id: CRYPTO_TABLE,
                rows: 1
            }
        );
        let table = page.table(CRYPTO_TABLE).unwrap();
        assert_eq!(table.header(), ["Symbol", "Current Price", "24h Change", "Market Cap"]);
        assert_eq!(table.rows()[0], ["BTC", "$52138.49", "-1.23%", "$1,023,456,789"]);
    }

    #[test]
    fn test_stock_table_is_formatted() {
        let mut page = Page::dashboard();
        apply(
            &mut page,
            ok(
                Action::FetchStocks,
                records(json!([
                    {"ticker": "AAPL", "current_price": 182.5, "day_high": 184.0, "day_low": 180.123}
                ])),
            ),
        );
        let table = page.table(STOCK_TABLE).unwrap();
        assert_eq!(table.header(), ["Ticker", "Current Price", "Day High", "Day Low"]);
        assert_eq!(table.rows()[0], ["AAPL", "$182.50", "$184.00", "$180.12"]);
    }

    #[test]
    fn test_show_strategy_results_renders_chart() {
        let mut page = Page::dashboard();
        let series = json!([
            {"timestamp": "2024-02-19", "price": 52138.49},
            {"timestamp": "2024-02-20", "price": 51764.31},
            {"timestamp": "2024-02-21", "price": 52286.79},
            {"timestamp": "2024-02-22", "price": 51842.76},
            {"timestamp": "2024-02-23", "price": 51319.50}
        ]);

        let applied = apply(&mut page, ok(Action::ShowStrategyResults, records(series.clone())));
        assert_eq!(applied, Applied::Chart { points: 5 });
        assert!(page.container(CHART_CONTAINER).unwrap().is_visible());
        assert_eq!(
            page.status(STRATEGY_RESULTS).unwrap().text(),
            "Chart rendered (5 points)"
        );

        apply(&mut page, ok(Action::ShowStrategyResults, records(series)));
        let chart = page.chart(STRATEGY_CHART).unwrap();
        assert_eq!(chart.canvas().live_instances(), 1);
        assert_eq!(chart.active().map(|c| c.generation()), Some(2));
    }

    #[test]
    fn test_chart_without_points_is_reported() {
        let mut page = Page::dashboard();
        let applied = apply(
            &mut page,
            ok(Action::ShowStrategyResults, records(json!([{"price": 1.0}]))),
        );
        assert!(matches!(applied, Applied::Reported(_)));
        assert!(!page.container(CHART_CONTAINER).unwrap().is_visible());
        assert!(!page.status(STRATEGY_RESULTS).unwrap().text().is_empty());
    }

    #[test]
    fn test_last_completed_result_wins() {
        let mut page = Page::dashboard();
        apply(
            &mut page,
            ok(Action::TrainRlAgent, records(json!({"Data": [{"price": 1}, {"price": 2}]}))),
        );
        apply(
            &mut page,
            ok(Action::EvaluateRlAgent, records(json!([{"price": 3}]))),
        );
        let table = page.table(RL_AGENT_TABLE).unwrap();
        assert_eq!(table.header().len(), 5);
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0][1], "3");
    }

    #[test]
    fn test_client_error_goes_to_status_region() {
        let mut page = Page::dashboard();
        let result = run(&client(FakeTransport::new()), Action::FetchStocks);
        let applied = apply(&mut page, result);
        match applied {
            Applied::Reported(msg) => assert!(msg.contains("404"), "{}", msg),
            other => panic!("unexpected {:?}", other),
        }
        assert!(page.status(MARKET_STATUS).unwrap().text().contains("404"));
        assert!(page.table(STOCK_TABLE).unwrap().is_empty());
    }

    #[test]
    fn test_dispatcher_round_trip() {
        let transport = FakeTransport::new().route(
            Method::Post,
            "/run_trend_follower",
            200,
            r#"{"Data":[{"timestamp":"2024-02-19","price":10,"volume":5,"short_mavg":9.5,"long_mavg":9}]}"#,
        );
        let mut dispatcher = Dispatcher::new(client(transport));
        let mut page = Page::dashboard();

        dispatcher.dispatch(Action::RunTrendFollower);
        assert_eq!(dispatcher.in_flight(), 1);

        let applied = dispatcher.wait(&mut page, Duration::from_secs(10));
        assert_eq!(
            applied,
            Some(Applied::Table {
                id: STRATEGY_TABLE,
                rows: 1
            })
        );
        assert_eq!(dispatcher.in_flight(), 0);
        assert_eq!(
            page.table(STRATEGY_TABLE).unwrap().rows()[0],
            ["2024-02-19", "10", "5", "9.5", "9"]
        );
        assert!(dispatcher.drain(&mut page).is_empty());
    }
}
