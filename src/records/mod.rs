//! Typed rows for each IEX endpoint the client reads.

use std::fmt::Display;

use serde_json::{Map, Value};

use crate::fetch::decode::value_to_string;

pub mod reference;
pub mod stock;
pub mod tops;

pub use reference::SymbolRecord;
pub use stock::{Earnings, FinancialReport, NewsItem, PriceBar};
pub use tops::{QuoteTrade, Trade};

/// A record that can be laid out as one table row.
///
/// The symbol is not part of `cells`; tables carry it as the row index.
pub trait TableRecord {
    fn columns() -> &'static [&'static str];

    fn cells(&self) -> Vec<String>;

    /// Upstream fields with no named counterpart, kept so they can still be shown.
    fn extra(&self) -> Option<&Map<String, Value>> {
        None
    }
}

pub(crate) fn cell<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub(crate) fn extra_cell(extra: &Map<String, Value>, key: &str) -> String {
    extra.get(key).map(value_to_string).unwrap_or_default()
}
