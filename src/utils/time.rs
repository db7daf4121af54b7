use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Convert a millisecond Unix timestamp into a UTC date-time.
pub fn datetime_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// Render an optional timestamp for table output; absent values become an empty cell.
pub fn format_timestamp(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Accepts either an RFC 3339 string or a millisecond epoch number.
///
/// News items have carried both shapes for `datetime`; `null` and a missing
/// field decode to `None`.
pub fn deserialize_flexible_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => DateTime::parse_from_rfc3339(text.trim())
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(|err| D::Error::custom(format!("invalid datetime `{text}`: {err}"))),
        Some(Value::Number(number)) => {
            let millis = number
                .as_i64()
                .ok_or_else(|| D::Error::custom(format!("invalid epoch millis `{number}`")))?;
            datetime_from_millis(millis)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("epoch millis out of range: {millis}")))
        }
        Some(other) => Err(D::Error::custom(format!(
            "expected datetime string or epoch millis, found {other}"
        ))),
    }
}
