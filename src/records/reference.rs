use serde::Deserialize;
use serde_json::Value;

use super::{cell, TableRecord};
use crate::fetch::decode::value_to_string;

/// One entry of the `ref-data/symbols` reference list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRecord {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub iex_id: Option<Value>,
}

impl TableRecord for SymbolRecord {
    fn columns() -> &'static [&'static str] {
        &["name", "date", "isEnabled", "type", "iexId"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            cell(&self.name),
            cell(&self.date),
            cell(&self.is_enabled),
            cell(&self.kind),
            self.iex_id.as_ref().map(value_to_string).unwrap_or_default(),
        ]
    }
}
