use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::table::{flatten_object, RawTable};

use super::FetchResult;

pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Decode a JSON array body into typed records.
pub fn records_from_str<T: DeserializeOwned>(body: &str) -> FetchResult<Vec<T>> {
    Ok(serde_json::from_str(body)?)
}

/// Decode the array stored under `key` in a wrapping object, e.g.
/// `{"symbol":"AAPL","financials":[...]}`.
///
/// A missing key or `null` yields no rows; IEX answers that way for symbols
/// without coverage.
pub fn nested_records_from_str<T: DeserializeOwned>(body: &str, key: &str) -> FetchResult<Vec<T>> {
    let mut root: Value = serde_json::from_str(body)?;
    match root.get_mut(key).map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(nested) => Ok(serde_json::from_value(nested)?),
    }
}

/// Parse a body into an untyped table.
///
/// An array becomes one row per element, a single object becomes one row. With
/// `nest`, the array under that key is used instead of the root. A `null` or
/// scalar in that position is an error.
pub fn raw_table_from_str(body: &str, nest: Option<&str>) -> FetchResult<RawTable> {
    let root: Value = serde_json::from_str(body)?;

    let data = match nest {
        Some(key) => root.get(key).cloned().ok_or_else(|| {
            AppError::message(format!("Missing key `{key}` in response body"))
        })?,
        None => root,
    };

    let rows = match data {
        Value::Array(items) => items
            .iter()
            .map(row_from_value)
            .collect::<FetchResult<Vec<_>>>()?,
        Value::Object(object) => vec![flatten_object(&object)],
        other => {
            return Err(AppError::message(format!(
                "Expected a JSON array or object, found `{other}`"
            )))
        }
    };

    Ok(RawTable::from_rows(rows))
}

fn row_from_value(value: &Value) -> FetchResult<Map<String, Value>> {
    match value {
        Value::Object(object) => Ok(flatten_object(object)),
        // Scalar array items become a single unnamed column.
        other => {
            let mut row = Map::new();
            row.insert("0".to_string(), other.clone());
            Ok(row)
        }
    }
}
