use std::{fs, path::Path};

use serde_json::{Map, Number, Value};

use crate::error::{MasstError, Result};

pub type MatchRecord = Map<String, Value>;

/// Columns that only echo the query back and are not shown with the matches.
const DROPPED_COLUMNS: [&str; 2] = ["Query File", "Query Scan"];

pub fn read_matches(path: &Path) -> Result<Vec<MatchRecord>> {
    let text = fs::read_to_string(path)?;
    parse_matches(&text)
}

pub fn parse_matches(text: &str) -> Result<Vec<MatchRecord>> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else {
        return Ok(Vec::new());
    };

    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
    let mut out = Vec::new();

    for (row, line) in lines.enumerate() {
        let cells: Vec<&str> = line.split('\t').collect();
        if cells.len() > columns.len() {
            return Err(MasstError::Parse(format!(
                "matches row {} has {} fields, header has {}",
                row + 1,
                cells.len(),
                columns.len()
            )));
        }

        let mut record = Map::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if DROPPED_COLUMNS.contains(name) {
                continue;
            }
            let value = cells.get(i).map_or(Value::Null, |c| cell_value(c));
            record.insert((*name).to_string(), value);
        }
        out.push(record);
    }

    Ok(out)
}

fn cell_value(cell: &str) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = cell.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(cell.to_string())
}
