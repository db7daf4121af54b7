use serde_json::{Map, Value};

/// Rows indexed by the symbol they were requested for.
///
/// Row order follows the upstream response. Snapshot endpoints yield one row per
/// symbol; per-symbol endpoints (news, financials, earnings, chart) may yield many.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTable<T> {
    rows: Vec<(String, T)>,
}

impl<T> SymbolTable<T> {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn push(&mut self, symbol: impl Into<String>, record: T) {
        self.rows.push((symbol.into(), record));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row indexed under `symbol`.
    pub fn get(&self, symbol: &str) -> Option<&T> {
        self.rows
            .iter()
            .find(|(key, _)| key == symbol)
            .map(|(_, record)| record)
    }

    pub fn rows_for<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a T> + 'a {
        self.rows
            .iter()
            .filter(move |(key, _)| key == symbol)
            .map(|(_, record)| record)
    }

    /// Distinct symbols in first-seen order.
    pub fn symbols(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for (symbol, _) in &self.rows {
            if !seen.contains(&symbol.as_str()) {
                seen.push(symbol);
            }
        }
        seen
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.rows.iter().map(|(symbol, record)| (symbol.as_str(), record))
    }
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(String, T)> for SymbolTable<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<(String, T)> for SymbolTable<T> {
    fn extend<I: IntoIterator<Item = (String, T)>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

impl<T> IntoIterator for SymbolTable<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Untyped table built from an arbitrary JSON payload.
///
/// Nested objects are flattened into dotted keys (`quote.price`); arrays and
/// scalars are kept as values. Columns are the union of row keys in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl RawTable {
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|existing| existing == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Flatten one JSON object the way the raw table expects (dotted keys for nesting).
pub fn flatten_object(object: &Map<String, Value>) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into(&mut flat, None, object);
    flat
}

fn flatten_into(target: &mut Map<String, Value>, prefix: Option<&str>, object: &Map<String, Value>) {
    for (key, value) in object {
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => {
                flatten_into(target, Some(&name), inner);
            }
            other => {
                target.insert(name, other.clone());
            }
        }
    }
}
