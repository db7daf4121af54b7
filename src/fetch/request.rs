use std::fmt;
use std::str::FromStr;

use crate::config::ClientConfig;
use crate::error::AppError;

pub const SYMBOLS_PATH: &str = "ref-data/symbols";
pub const TOPS_PATH: &str = "tops";
pub const LAST_TRADE_PATH: &str = "tops/last";

/// Bucket sizes accepted by the chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartRange {
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    YearToDate,
    TwoYears,
    FiveYears,
}

impl ChartRange {
    pub const ALL: [ChartRange; 7] = [
        ChartRange::OneMonth,
        ChartRange::ThreeMonths,
        ChartRange::SixMonths,
        ChartRange::OneYear,
        ChartRange::YearToDate,
        ChartRange::TwoYears,
        ChartRange::FiveYears,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartRange::OneMonth => "1m",
            ChartRange::ThreeMonths => "3m",
            ChartRange::SixMonths => "6m",
            ChartRange::OneYear => "1y",
            ChartRange::YearToDate => "ytd",
            ChartRange::TwoYears => "2y",
            ChartRange::FiveYears => "5y",
        }
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartRange {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        ChartRange::ALL
            .into_iter()
            .find(|range| range.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| AppError::InvalidChartRange(value.to_string()))
    }
}

/// Symbols are joined verbatim; no case folding or escaping is applied.
pub fn join_symbols<S: AsRef<str>>(symbols: &[S]) -> String {
    symbols
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join(",")
}

pub fn symbols_url(config: &ClientConfig) -> String {
    config.endpoint(SYMBOLS_PATH)
}

pub fn tops_url<S: AsRef<str>>(config: &ClientConfig, symbols: &[S]) -> String {
    format!("{}?symbols={}", config.endpoint(TOPS_PATH), join_symbols(symbols))
}

pub fn last_trade_url<S: AsRef<str>>(config: &ClientConfig, symbols: &[S]) -> String {
    format!(
        "{}?symbols={}",
        config.endpoint(LAST_TRADE_PATH),
        join_symbols(symbols)
    )
}

pub fn news_url(config: &ClientConfig, symbol: &str, count: usize) -> String {
    config.endpoint(&format!("stock/{symbol}/news/last/{count}"))
}

pub fn financials_url(config: &ClientConfig, symbol: &str) -> String {
    config.endpoint(&format!("stock/{symbol}/financials"))
}

pub fn earnings_url(config: &ClientConfig, symbol: &str) -> String {
    config.endpoint(&format!("stock/{symbol}/earnings"))
}

pub fn chart_url(config: &ClientConfig, symbol: &str, range: ChartRange) -> String {
    config.endpoint(&format!("stock/{symbol}/chart/{range}"))
}
