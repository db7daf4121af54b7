use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{cell, TableRecord};
use crate::utils::{deserialize_flexible_datetime, format_timestamp};

/// A headline from `stock/{symbol}/news/last/{count}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewsItem {
    #[serde(
        default,
        rename = "datetime",
        deserialize_with = "deserialize_flexible_datetime"
    )]
    pub time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub related: Option<String>,
}

impl NewsItem {
    /// Symbols IEX tagged the story with.
    pub fn related_symbols(&self) -> Vec<&str> {
        self.related
            .as_deref()
            .map(|related| {
                related
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl TableRecord for NewsItem {
    fn columns() -> &'static [&'static str] {
        &["time", "headline", "summary", "source", "url", "related"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format_timestamp(self.time.as_ref()),
            cell(&self.headline),
            cell(&self.summary),
            cell(&self.source),
            cell(&self.url),
            cell(&self.related),
        ]
    }
}

/// One reporting period from `stock/{symbol}/financials`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    #[serde(default)]
    pub report_date: Option<String>,
    #[serde(default)]
    pub gross_profit: Option<f64>,
    #[serde(default)]
    pub cost_of_revenue: Option<f64>,
    #[serde(default)]
    pub operating_revenue: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub operating_income: Option<f64>,
    #[serde(default)]
    pub net_income: Option<f64>,
    #[serde(default)]
    pub research_and_development: Option<f64>,
    #[serde(default)]
    pub operating_expense: Option<f64>,
    #[serde(default)]
    pub current_assets: Option<f64>,
    #[serde(default)]
    pub total_assets: Option<f64>,
    #[serde(default)]
    pub total_liabilities: Option<f64>,
    #[serde(default)]
    pub current_cash: Option<f64>,
    #[serde(default)]
    pub current_debt: Option<f64>,
    #[serde(default)]
    pub total_cash: Option<f64>,
    #[serde(default)]
    pub total_debt: Option<f64>,
    #[serde(default)]
    pub shareholder_equity: Option<f64>,
    #[serde(default)]
    pub cash_change: Option<f64>,
    #[serde(default)]
    pub cash_flow: Option<f64>,
    #[serde(default)]
    pub operating_gains_losses: Option<f64>,
}

impl TableRecord for FinancialReport {
    fn columns() -> &'static [&'static str] {
        &[
            "reportDate",
            "grossProfit",
            "costOfRevenue",
            "operatingRevenue",
            "totalRevenue",
            "operatingIncome",
            "netIncome",
            "researchAndDevelopment",
            "operatingExpense",
            "currentAssets",
            "totalAssets",
            "totalLiabilities",
            "currentCash",
            "currentDebt",
            "totalCash",
            "totalDebt",
            "shareholderEquity",
            "cashChange",
            "cashFlow",
            "operatingGainsLosses",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            cell(&self.report_date),
            cell(&self.gross_profit),
            cell(&self.cost_of_revenue),
            cell(&self.operating_revenue),
            cell(&self.total_revenue),
            cell(&self.operating_income),
            cell(&self.net_income),
            cell(&self.research_and_development),
            cell(&self.operating_expense),
            cell(&self.current_assets),
            cell(&self.total_assets),
            cell(&self.total_liabilities),
            cell(&self.current_cash),
            cell(&self.current_debt),
            cell(&self.total_cash),
            cell(&self.total_debt),
            cell(&self.shareholder_equity),
            cell(&self.cash_change),
            cell(&self.cash_flow),
            cell(&self.operating_gains_losses),
        ]
    }
}

/// One quarter from `stock/{symbol}/earnings`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earnings {
    #[serde(default, rename = "actualEPS")]
    pub actual_eps: Option<f64>,
    #[serde(default, rename = "consensusEPS")]
    pub consensus_eps: Option<f64>,
    #[serde(default, rename = "estimatedEPS")]
    pub estimated_eps: Option<f64>,
    #[serde(default)]
    pub announce_time: Option<String>,
    #[serde(default)]
    pub number_of_estimates: Option<u32>,
    #[serde(default, rename = "EPSSurpriseDollar")]
    pub eps_surprise_dollar: Option<f64>,
    #[serde(default, rename = "EPSReportDate")]
    pub eps_report_date: Option<String>,
    #[serde(default)]
    pub fiscal_period: Option<String>,
    #[serde(default)]
    pub fiscal_end_date: Option<String>,
    #[serde(default)]
    pub year_ago: Option<f64>,
    #[serde(default)]
    pub year_ago_change_percent: Option<f64>,
    #[serde(default)]
    pub estimated_change_percent: Option<f64>,
}

impl TableRecord for Earnings {
    fn columns() -> &'static [&'static str] {
        &[
            "actualEPS",
            "consensusEPS",
            "estimatedEPS",
            "announceTime",
            "numberOfEstimates",
            "EPSSurpriseDollar",
            "EPSReportDate",
            "fiscalPeriod",
            "fiscalEndDate",
            "yearAgo",
            "yearAgoChangePercent",
            "estimatedChangePercent",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            cell(&self.actual_eps),
            cell(&self.consensus_eps),
            cell(&self.estimated_eps),
            cell(&self.announce_time),
            cell(&self.number_of_estimates),
            cell(&self.eps_surprise_dollar),
            cell(&self.eps_report_date),
            cell(&self.fiscal_period),
            cell(&self.fiscal_end_date),
            cell(&self.year_ago),
            cell(&self.year_ago_change_percent),
            cell(&self.estimated_change_percent),
        ]
    }
}

/// A bucketed price bar from `stock/{symbol}/chart/{range}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub unadjusted_volume: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub vwap: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub change_over_time: Option<f64>,
}

impl TableRecord for PriceBar {
    fn columns() -> &'static [&'static str] {
        &[
            "date",
            "open",
            "high",
            "low",
            "close",
            "volume",
            "unadjustedVolume",
            "change",
            "changePercent",
            "vwap",
            "label",
            "changeOverTime",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            cell(&self.date),
            cell(&self.open),
            cell(&self.high),
            cell(&self.low),
            cell(&self.close),
            cell(&self.volume),
            cell(&self.unadjusted_volume),
            cell(&self.change),
            cell(&self.change_percent),
            cell(&self.vwap),
            cell(&self.label),
            cell(&self.change_over_time),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn news_datetime_becomes_time() {
        let sample = r#"{
            "datetime": "2017-06-13T12:44:00-04:00",
            "headline": "Apple unveils new products",
            "source": "CNBC",
            "url": "https://api.iextrading.com/1.0/stock/aapl/article/1",
            "summary": "No summary available.",
            "related": "AAPL, NASDAQ01,STPZ"
        }"#;
        let item: NewsItem = serde_json::from_str(sample).unwrap();

        assert_eq!(
            item.time,
            Some(Utc.with_ymd_and_hms(2017, 6, 13, 16, 44, 0).unwrap())
        );
        assert_eq!(item.related_symbols(), vec!["AAPL", "NASDAQ01", "STPZ"]);
        assert_eq!(item.cells()[0], "2017-06-13T16:44:00.000Z");
    }

    #[test]
    fn earnings_uses_uppercase_eps_keys() {
        let sample = r#"{
            "actualEPS": 2.1,
            "consensusEPS": 2.02,
            "estimatedEPS": 2.02,
            "announceTime": "AMC",
            "numberOfEstimates": 14,
            "EPSSurpriseDollar": 0.08,
            "EPSReportDate": "2017-05-02",
            "fiscalPeriod": "Q2 2017",
            "fiscalEndDate": "2017-03-31",
            "yearAgo": 1.67,
            "yearAgoChangePercent": 0.30,
            "estimatedChangePercent": 0.28,
            "symbolId": 11
        }"#;
        let earnings: Earnings = serde_json::from_str(sample).unwrap();

        assert_eq!(earnings.actual_eps, Some(2.1));
        assert_eq!(earnings.eps_surprise_dollar, Some(0.08));
        assert_eq!(earnings.eps_report_date.as_deref(), Some("2017-05-02"));
        assert_eq!(earnings.number_of_estimates, Some(14));
        assert_eq!(earnings.cells().len(), Earnings::columns().len());
    }

    #[test]
    fn financials_tolerate_missing_fields() {
        let sample = r#"{"reportDate":"2017-03-31","grossProfit":20000000000,"netIncome":null}"#;
        let report: FinancialReport = serde_json::from_str(sample).unwrap();

        assert_eq!(report.report_date.as_deref(), Some("2017-03-31"));
        assert_eq!(report.gross_profit, Some(20_000_000_000.0));
        assert!(report.net_income.is_none());
        assert_eq!(report.cells()[0], "2017-03-31");
    }

    #[test]
    fn price_bar_decodes_chart_row() {
        let sample = r#"{"date":"2017-04-03","open":143.1809,"high":144.0492,"low":143.1809,"close":143.7763,"volume":19985714,"unadjustedVolume":19985714,"change":0.399,"changePercent":0.278,"vwap":143.6056,"label":"Apr 03, 17","changeOverTime":-0.0039}"#;
        let bar: PriceBar = serde_json::from_str(sample).unwrap();

        assert_eq!(bar.date.as_deref(), Some("2017-04-03"));
        assert_eq!(bar.volume, Some(19_985_714.0));
        assert_eq!(bar.label.as_deref(), Some("Apr 03, 17"));
    }
}
