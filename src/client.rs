//! Blocking IEX client: symbol screening plus one method per endpoint.

use std::collections::HashSet;

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{Context, Result};
use crate::fetch::decode::{nested_records_from_str, raw_table_from_str, records_from_str};
use crate::fetch::request::{
    chart_url, earnings_url, financials_url, last_trade_url, news_url, symbols_url, tops_url,
};
use crate::fetch::{ChartRange, HttpTransport, Transport};
use crate::records::{Earnings, FinancialReport, NewsItem, PriceBar, QuoteTrade, SymbolRecord, Trade};
use crate::table::{RawTable, SymbolTable};

pub const INVALID_SYMBOLS_NOTICE: &str = "These stock(s) are invalid!";

/// News items fetched per symbol when the caller does not ask for more.
pub const DEFAULT_NEWS_COUNT: usize = 1;

/// Outcome of a symbol-based request after screening against the reference list.
#[derive(Debug, Clone, PartialEq)]
pub enum Screened<T> {
    /// Every requested symbol was valid.
    Complete(T),
    /// Some symbols were dropped; `rejected` keeps them in input order.
    Partial { table: T, rejected: Vec<String> },
    /// Nothing valid remained, so no data request was made.
    Empty { rejected: Vec<String> },
}

impl<T> Screened<T> {
    fn finish(table: T, rejected: Vec<String>) -> Self {
        if rejected.is_empty() {
            Screened::Complete(table)
        } else {
            Screened::Partial { table, rejected }
        }
    }

    pub fn table(&self) -> Option<&T> {
        match self {
            Screened::Complete(table) | Screened::Partial { table, .. } => Some(table),
            Screened::Empty { .. } => None,
        }
    }

    pub fn into_table(self) -> Option<T> {
        match self {
            Screened::Complete(table) | Screened::Partial { table, .. } => Some(table),
            Screened::Empty { .. } => None,
        }
    }

    pub fn rejected(&self) -> &[String] {
        match self {
            Screened::Complete(_) => &[],
            Screened::Partial { rejected, .. } | Screened::Empty { rejected } => rejected,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Screened::Empty { .. })
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Screened::Partial { .. })
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Screened<U> {
        match self {
            Screened::Complete(table) => Screened::Complete(f(table)),
            Screened::Partial { table, rejected } => Screened::Partial {
                table: f(table),
                rejected,
            },
            Screened::Empty { rejected } => Screened::Empty { rejected },
        }
    }
}

/// Requested symbols split by the reference list, both halves in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screening {
    pub valid: Vec<String>,
    pub rejected: Vec<String>,
}

/// IEX client holding an immutable base URL and the transport used for every GET.
///
/// Each call fetches the reference list first, so validity is always current at
/// the cost of one extra round trip.
#[derive(Debug, Clone)]
pub struct IexClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl IexClient<HttpTransport> {
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::builtin())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }
}

impl<T: Transport> IexClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch `url` and flatten the JSON body into an untyped table.
    pub fn fetch_table(&self, url: &str) -> Result<RawTable> {
        let body = self.transport.get_text(url)?;
        raw_table_from_str(&body, None)
    }

    /// Like [`fetch_table`](Self::fetch_table), but reads the array stored under `nest`.
    pub fn fetch_nested_table(&self, url: &str, nest: &str) -> Result<RawTable> {
        let body = self.transport.get_text(url)?;
        raw_table_from_str(&body, Some(nest))
    }

    /// The provider's full reference list.
    pub fn reference_symbols(&self) -> Result<Vec<SymbolRecord>> {
        self.fetch_records(&symbols_url(&self.config))
    }

    /// Keep the requested symbols present in the reference list, preserving order.
    ///
    /// Unknown symbols are dropped silently; duplicates in the input are kept.
    pub fn valid_securities<S: AsRef<str>>(&self, securities: &[S]) -> Result<Vec<String>> {
        Ok(self.screen(securities)?.valid)
    }

    /// Split the requested symbols into valid and rejected halves.
    pub fn screen<S: AsRef<str>>(&self, securities: &[S]) -> Result<Screening> {
        let reference = self
            .reference_symbols()
            .context("Failed to load the IEX reference symbol list")?;
        let known: HashSet<&str> = reference.iter().map(|r| r.symbol.as_str()).collect();

        let mut screening = Screening::default();
        for symbol in securities.iter().map(|s| s.as_ref()) {
            if known.contains(symbol) {
                screening.valid.push(symbol.to_string());
            } else {
                screening.rejected.push(symbol.to_string());
            }
        }

        if !screening.rejected.is_empty() {
            debug!("Dropping unknown symbols: {}", screening.rejected.join(","));
        }
        Ok(screening)
    }

    /// Latest quote and trade snapshot for every valid symbol, via `tops`.
    pub fn latest_quote_and_trade<S: AsRef<str>>(
        &self,
        securities: &[S],
    ) -> Result<Screened<SymbolTable<QuoteTrade>>> {
        self.screened(securities, |valid| {
            let quotes: Vec<QuoteTrade> = self.fetch_records(&tops_url(&self.config, valid))?;
            let table: SymbolTable<QuoteTrade> = quotes
                .into_iter()
                .map(|quote| (quote.symbol.clone(), quote))
                .collect();
            Ok(table)
        })
    }

    /// Latest trade for every valid symbol, via `tops/last`.
    pub fn latest_trade<S: AsRef<str>>(
        &self,
        securities: &[S],
    ) -> Result<Screened<SymbolTable<Trade>>> {
        self.screened(securities, |valid| {
            let trades: Vec<Trade> = self.fetch_records(&last_trade_url(&self.config, valid))?;
            let table: SymbolTable<Trade> = trades
                .into_iter()
                .map(|trade| (trade.symbol.clone(), trade))
                .collect();
            Ok(table)
        })
    }

    /// The last `count` news items per valid symbol, requested one symbol at a time.
    pub fn latest_news<S: AsRef<str>>(
        &self,
        securities: &[S],
        count: usize,
    ) -> Result<Screened<SymbolTable<NewsItem>>> {
        let count = count.max(1);
        self.per_symbol(securities, |symbol| {
            self.fetch_records(&news_url(&self.config, symbol, count))
        })
    }

    pub fn financials<S: AsRef<str>>(
        &self,
        securities: &[S],
    ) -> Result<Screened<SymbolTable<FinancialReport>>> {
        self.per_symbol(securities, |symbol| {
            self.fetch_nested_records(&financials_url(&self.config, symbol), "financials")
        })
    }

    pub fn earnings<S: AsRef<str>>(
        &self,
        securities: &[S],
    ) -> Result<Screened<SymbolTable<Earnings>>> {
        self.per_symbol(securities, |symbol| {
            self.fetch_nested_records(&earnings_url(&self.config, symbol), "earnings")
        })
    }

    /// Bucketed price bars for every valid symbol.
    pub fn trade_bars<S: AsRef<str>>(
        &self,
        securities: &[S],
        range: ChartRange,
    ) -> Result<Screened<SymbolTable<PriceBar>>> {
        self.per_symbol(securities, |symbol| {
            self.fetch_records(&chart_url(&self.config, symbol, range))
        })
    }

    fn screened<S, R, F>(&self, securities: &[S], fetch: F) -> Result<Screened<R>>
    where
        S: AsRef<str>,
        F: FnOnce(&[String]) -> Result<R>,
    {
        let Screening { valid, rejected } = self.screen(securities)?;

        if valid.is_empty() {
            warn!("{INVALID_SYMBOLS_NOTICE} {}", rejected.join(","));
            return Ok(Screened::Empty { rejected });
        }

        let table = fetch(&valid)?;
        Ok(Screened::finish(table, rejected))
    }

    fn per_symbol<S, R, F>(&self, securities: &[S], fetch: F) -> Result<Screened<SymbolTable<R>>>
    where
        S: AsRef<str>,
        F: Fn(&str) -> Result<Vec<R>>,
    {
        self.screened(securities, |valid| {
            let mut table = SymbolTable::new();
            for symbol in valid {
                let records = fetch(symbol.as_str())?;
                debug!("{symbol}: {} rows", records.len());
                table.extend(records.into_iter().map(|record| (symbol.clone(), record)));
            }
            Ok(table)
        })
    }

    fn fetch_records<R: DeserializeOwned>(&self, url: &str) -> Result<Vec<R>> {
        let body = self.transport.get_text(url)?;
        records_from_str(&body)
    }

    fn fetch_nested_records<R: DeserializeOwned>(&self, url: &str, key: &str) -> Result<Vec<R>> {
        let body = self.transport.get_text(url)?;
        nested_records_from_str(&body, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const BASE: &str = "http://iex.test/1.0/";
    const REFERENCE: &str =
        r#"[{"symbol":"AAPL","isEnabled":true},{"symbol":"IBM","isEnabled":true},{"symbol":"MSFT"}]"#;

    /// Serves canned bodies by URL and records every request.
    #[derive(Default)]
    struct FakeTransport {
        routes: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeTransport {
        fn with_reference() -> Self {
            Self::default().route("ref-data/symbols", REFERENCE)
        }

        fn route(mut self, path: &str, body: &str) -> Self {
            self.routes.insert(format!("{BASE}{path}"), body.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Transport for FakeTransport {
        fn get_text(&self, url: &str) -> Result<String> {
            self.calls.borrow_mut().push(url.to_string());
            self.routes
                .get(url)
                .cloned()
                .ok_or_else(|| AppError::message(format!("connection refused: {url}")))
        }
    }

    fn client(transport: &FakeTransport) -> IexClient<&FakeTransport> {
        IexClient::with_transport(ClientConfig::with_base_url(BASE).unwrap(), transport)
    }

    #[test]
    fn valid_securities_preserves_order_and_duplicates() {
        let transport = FakeTransport::with_reference();
        let valid = client(&transport)
            .valid_securities(&["MSFT", "BAD", "AAPL", "MSFT", "aapl"])
            .unwrap();

        assert_eq!(valid, vec!["MSFT", "AAPL", "MSFT"]);
    }

    #[test]
    fn valid_securities_of_empty_input_only_reads_reference_list() {
        let transport = FakeTransport::with_reference();
        let valid = client(&transport).valid_securities::<&str>(&[]).unwrap();

        assert!(valid.is_empty());
        assert_eq!(transport.calls(), vec![format!("{BASE}ref-data/symbols")]);
    }

    #[test]
    fn screen_reports_rejected_symbols_in_order() {
        let transport = FakeTransport::with_reference();
        let screening = client(&transport).screen(&["ZZZ", "IBM", "QQQ"]).unwrap();

        assert_eq!(screening.valid, vec!["IBM"]);
        assert_eq!(screening.rejected, vec!["ZZZ", "QQQ"]);
    }

    #[test]
    fn reference_list_failure_propagates() {
        let transport = FakeTransport::default();
        let err = client(&transport)
            .valid_securities(&["AAPL"])
            .expect_err("reference list is unreachable");

        assert!(err.to_string().contains("reference symbol list"));
    }

    #[test]
    fn malformed_reference_list_is_a_parse_error() {
        let transport = FakeTransport::default().route("ref-data/symbols", "not json");
        let err = client(&transport)
            .valid_securities(&["AAPL"])
            .expect_err("body is not JSON");

        assert!(err.is_parse(), "unexpected error: {err}");
    }

    #[test]
    fn quote_and_trade_converts_timestamps_and_indexes_by_symbol() {
        let transport = FakeTransport::with_reference().route(
            "tops?symbols=AAPL",
            r#"[{"symbol":"AAPL","lastSaleTime":1000,"lastUpdated":2000,"price":150.0}]"#,
        );

        let result = client(&transport).latest_quote_and_trade(&["AAPL"]).unwrap();
        let Screened::Complete(table) = result else {
            panic!("expected a complete result");
        };

        assert_eq!(table.len(), 1);
        let quote = table.get("AAPL").expect("row for AAPL");
        assert_eq!(quote.last_sale_time, Some(Utc.timestamp_opt(1, 0).unwrap()));
        assert_eq!(quote.last_updated, Some(Utc.timestamp_opt(2, 0).unwrap()));
        assert_eq!(quote.extra.get("price"), Some(&serde_json::json!(150.0)));
    }

    #[test]
    fn all_invalid_symbols_skip_the_data_request() {
        let transport = FakeTransport::with_reference();
        let result = client(&transport)
            .latest_quote_and_trade(&["BAD", "WORSE"])
            .unwrap();

        assert!(result.is_empty());
        assert!(result.table().is_none());
        assert_eq!(result.rejected(), &["BAD", "WORSE"]);
        assert_eq!(transport.calls(), vec![format!("{BASE}ref-data/symbols")]);
    }

    #[test]
    fn latest_trade_queries_only_valid_symbols() {
        let transport = FakeTransport::with_reference().route(
            "tops/last?symbols=AAPL",
            r#"[{"symbol":"AAPL","price":150.5,"size":10,"time":1500}]"#,
        );

        let result = client(&transport).latest_trade(&["AAPL", "BAD"]).unwrap();

        assert_eq!(
            transport.calls(),
            vec![
                format!("{BASE}ref-data/symbols"),
                format!("{BASE}tops/last?symbols=AAPL"),
            ]
        );
        assert!(result.is_partial());
        assert_eq!(result.rejected(), &["BAD"]);

        let table = result.into_table().unwrap();
        let trade = table.get("AAPL").unwrap();
        assert_eq!(trade.time, Some(Utc.timestamp_millis_opt(1500).unwrap()));
    }

    #[test]
    fn many_symbols_are_comma_joined_into_one_request() {
        // Ten thousand copies of a valid symbol; the URL length is left to the provider.
        let symbols = vec!["IBM"; 10_000];
        let path = format!("tops?symbols={}", symbols.join(","));
        let transport = FakeTransport::with_reference().route(&path, "[]");

        let result = client(&transport).latest_quote_and_trade(&symbols).unwrap();

        assert_eq!(transport.calls().len(), 2);
        assert!(transport.calls()[1].len() > 40_000);
        assert!(result.table().unwrap().is_empty());
    }

    #[test]
    fn data_request_failure_propagates() {
        let transport = FakeTransport::with_reference();
        let err = client(&transport)
            .latest_trade(&["IBM"])
            .expect_err("tops/last is unreachable");

        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn malformed_data_body_is_a_parse_error() {
        let transport =
            FakeTransport::with_reference().route("tops?symbols=IBM", r#"[{"symbol":"IBM","#);
        let err = client(&transport)
            .latest_quote_and_trade(&["IBM"])
            .expect_err("truncated body");

        assert!(err.is_parse());
    }

    #[test]
    fn news_is_fetched_per_symbol_and_tagged() {
        let transport = FakeTransport::with_reference()
            .route(
                "stock/IBM/news/last/2",
                r#"[{"datetime":"2018-06-01T10:00:00-04:00","headline":"IBM one"},{"datetime":"2018-06-01T09:00:00-04:00","headline":"IBM two"}]"#,
            )
            .route(
                "stock/AAPL/news/last/2",
                r#"[{"datetime":"2018-06-01T11:00:00-04:00","headline":"AAPL one"}]"#,
            );

        let result = client(&transport)
            .latest_news(&["IBM", "AAPL"], 2)
            .unwrap();
        let table = result.into_table().unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.symbols(), vec!["IBM", "AAPL"]);
        assert_eq!(table.rows_for("IBM").count(), 2);
        assert_eq!(
            table.get("AAPL").unwrap().time,
            Some(Utc.with_ymd_and_hms(2018, 6, 1, 15, 0, 0).unwrap())
        );
    }

    #[test]
    fn news_count_is_at_least_one() {
        let transport = FakeTransport::with_reference().route("stock/IBM/news/last/1", "[]");
        let result = client(&transport).latest_news(&["IBM"], 0).unwrap();

        assert!(result.table().unwrap().is_empty());
        assert_eq!(transport.calls()[1], format!("{BASE}stock/IBM/news/last/1"));
    }

    #[test]
    fn financials_and_earnings_unwrap_nested_arrays() {
        let transport = FakeTransport::with_reference()
            .route(
                "stock/AAPL/financials",
                r#"{"symbol":"AAPL","financials":[{"reportDate":"2017-03-31","netIncome":11029000000},{"reportDate":"2016-12-31"}]}"#,
            )
            .route(
                "stock/AAPL/earnings",
                r#"{"symbol":"AAPL","earnings":[{"actualEPS":2.1,"fiscalPeriod":"Q2 2017"}]}"#,
            );
        let client = client(&transport);

        let financials = client.financials(&["AAPL"]).unwrap().into_table().unwrap();
        assert_eq!(financials.len(), 2);
        assert_eq!(
            financials.get("AAPL").unwrap().net_income,
            Some(11_029_000_000.0)
        );

        let earnings = client.earnings(&["AAPL"]).unwrap().into_table().unwrap();
        assert_eq!(earnings.len(), 1);
        assert_eq!(
            earnings.get("AAPL").unwrap().fiscal_period.as_deref(),
            Some("Q2 2017")
        );
    }

    #[test]
    fn trade_bars_use_requested_range() {
        let transport = FakeTransport::with_reference().route(
            "stock/MSFT/chart/6m",
            r#"[{"date":"2018-01-02","close":85.95},{"date":"2018-01-03","close":86.35}]"#,
        );

        let table = client(&transport)
            .trade_bars(&["MSFT"], ChartRange::SixMonths)
            .unwrap()
            .into_table()
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows_for("MSFT").last().unwrap().close, Some(86.35));
    }

    #[test]
    fn fetch_table_flattens_any_payload() {
        let transport = FakeTransport::default().route(
            "tops",
            r#"[{"symbol":"AAPL","bidPrice":1.0},{"symbol":"IBM","askPrice":2.0}]"#,
        );
        let table = client(&transport).fetch_table(&format!("{BASE}tops")).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.columns().len(), 3);
    }

    #[test]
    fn screened_map_keeps_rejections() {
        let partial = Screened::finish(2, vec!["BAD".to_string()]).map(|n| n * 10);
        assert_eq!(partial.table(), Some(&20));
        assert_eq!(partial.rejected(), &["BAD"]);

        let complete = Screened::finish("t", Vec::new());
        assert!(matches!(complete, Screened::Complete("t")));
        assert!(complete.rejected().is_empty());
    }

    fn reference_body(symbols: &[String]) -> String {
        let rows: Vec<serde_json::Value> = symbols
            .iter()
            .map(|symbol| serde_json::json!({ "symbol": symbol, "isEnabled": true }))
            .collect();
        serde_json::Value::Array(rows).to_string()
    }

    /// A reference list plus requests mixing listed, lowercased and unknown symbols.
    fn reference_and_requests() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
        prop::collection::vec("[A-Z]{1,4}", 1..12).prop_flat_map(|reference| {
            let request = prop_oneof![
                prop::sample::select(reference.clone()),
                prop::sample::select(reference.clone()).prop_map(|s| s.to_lowercase()),
                "[A-Z]{1,5}",
            ];
            (Just(reference), prop::collection::vec(request, 0..24))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
        #[test]
        fn valid_securities_is_the_listed_subsequence((reference, requested) in reference_and_requests()) {
            let transport = FakeTransport::default().route("ref-data/symbols", &reference_body(&reference));
            let iex = client(&transport);

            let valid = iex.valid_securities(&requested).unwrap();
            let expected: Vec<String> = requested
                .iter()
                .filter(|symbol| reference.contains(*symbol))
                .cloned()
                .collect();
            prop_assert_eq!(&valid, &expected);

            let screening = iex.screen(&requested).unwrap();
            prop_assert_eq!(screening.valid.len() + screening.rejected.len(), requested.len());
            prop_assert!(screening.rejected.iter().all(|symbol| !reference.contains(symbol)));
        }
    }
}
