use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{Context, Result};
use crate::fetch::decode::value_to_string;
use crate::records::{extra_cell, TableRecord};
use crate::table::{RawTable, SymbolTable};
use crate::utils::{display_width, pad_display};

const COLUMN_GAP: &str = "  ";

/// Header plus string cells, ready to print or export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Grid {
    /// Lay out a symbol table with `symbol` as the leading column.
    ///
    /// Upstream fields without a named counterpart are appended as extra columns,
    /// in first-seen order.
    pub fn from_symbol_table<T: TableRecord>(table: &SymbolTable<T>) -> Self {
        let mut extra_columns: Vec<String> = Vec::new();
        for (_, record) in table.iter() {
            if let Some(extra) = record.extra() {
                for key in extra.keys() {
                    if !extra_columns.contains(key) {
                        extra_columns.push(key.clone());
                    }
                }
            }
        }

        let mut headers = vec!["symbol".to_string()];
        headers.extend(T::columns().iter().map(|c| c.to_string()));
        headers.extend(extra_columns.iter().cloned());

        let rows = table
            .iter()
            .map(|(symbol, record)| {
                let mut row = Vec::with_capacity(headers.len());
                row.push(symbol.to_string());
                row.extend(record.cells());
                for key in &extra_columns {
                    row.push(
                        record
                            .extra()
                            .map(|extra| extra_cell(extra, key))
                            .unwrap_or_default(),
                    );
                }
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn from_raw_table(table: &RawTable) -> Self {
        let headers = table.columns().to_vec();
        let rows = table
            .rows()
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|column| row.get(column).map(value_to_string).unwrap_or_default())
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }

    /// Plain symbol list, one row each.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Self {
        Self {
            headers: vec!["symbol".to_string()],
            rows: symbols.iter().map(|s| vec![s.as_ref().to_string()]).collect(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Left-aligned columns sized to the widest cell, measured in terminal columns.
    pub fn render_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| display_width(h)).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(idx) {
                    *width = (*width).max(display_width(cell));
                }
            }
        }

        let mut out = String::new();
        push_line(&mut out, &self.headers, &widths);
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
        self.write_csv(file)
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let last = cells.len().saturating_sub(1);
    for (idx, cell) in cells.iter().enumerate() {
        if idx == last {
            out.push_str(cell);
        } else {
            let width = widths.get(idx).copied().unwrap_or_default();
            out.push_str(&pad_display(cell, width));
            out.push_str(COLUMN_GAP);
        }
    }
    out.push('\n');
}
