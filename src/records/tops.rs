use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{cell, TableRecord};
use crate::utils::format_timestamp;

/// Latest quote and trade snapshot from the `tops` endpoint.
///
/// `lastSaleTime` and `lastUpdated` arrive as millisecond epochs and are decoded
/// to UTC date-times. Fields IEX adds beyond the named ones land in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTrade {
    pub symbol: String,
    #[serde(default)]
    pub market_percent: Option<f64>,
    #[serde(default)]
    pub bid_size: Option<f64>,
    #[serde(default)]
    pub bid_price: Option<f64>,
    #[serde(default)]
    pub ask_size: Option<f64>,
    #[serde(default)]
    pub ask_price: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub last_sale_price: Option<f64>,
    #[serde(default)]
    pub last_sale_size: Option<f64>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_sale_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub security_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TableRecord for QuoteTrade {
    fn columns() -> &'static [&'static str] {
        &[
            "marketPercent",
            "bidSize",
            "bidPrice",
            "askSize",
            "askPrice",
            "volume",
            "lastSalePrice",
            "lastSaleSize",
            "lastSaleTime",
            "lastUpdated",
            "sector",
            "securityType",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            cell(&self.market_percent),
            cell(&self.bid_size),
            cell(&self.bid_price),
            cell(&self.ask_size),
            cell(&self.ask_price),
            cell(&self.volume),
            cell(&self.last_sale_price),
            cell(&self.last_sale_size),
            format_timestamp(self.last_sale_time.as_ref()),
            format_timestamp(self.last_updated.as_ref()),
            cell(&self.sector),
            cell(&self.security_type),
        ]
    }

    fn extra(&self) -> Option<&Map<String, Value>> {
        Some(&self.extra)
    }
}

/// Latest trade from the `tops/last` endpoint; only `time` needs conversion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trade {
    pub symbol: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TableRecord for Trade {
    fn columns() -> &'static [&'static str] {
        &["price", "size", "time"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            cell(&self.price),
            cell(&self.size),
            format_timestamp(self.time.as_ref()),
        ]
    }

    fn extra(&self) -> Option<&Map<String, Value>> {
        Some(&self.extra)
    }
}
