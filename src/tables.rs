use serde_json::Value;
use tracing::{debug, warn};

use crate::error::LoadError;

/// Row 0 is the header row.
pub type RawTable = Vec<Vec<String>>;

/// Every table of an export, in the order the document lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTables {
    tables: Vec<(String, RawTable)>,
}

impl RawTables {
    /// Decodes `{ "Table_1": [["#", "Kanji", ...], ...], ... }`.
    ///
    /// Only the outer shape is strict. Cells that are numbers or booleans are
    /// stringified, `null` becomes empty, and a table that is not a list of
    /// rows decodes as an empty table.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(map) = value else {
            return Err(LoadError::NotAnObject(kind_of(&value)));
        };

        Ok(map
            .into_iter()
            .map(|(name, value)| {
                let table = decode_table(&name, value);
                debug!("Decoded table '{}' with {} rows", name, table.len());
                (name, table)
            })
            .collect())
    }

    /// Replaces a table of the same name in place, otherwise appends.
    pub fn insert(&mut self, name: String, table: RawTable) {
        match self.tables.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = table,
            None => self.tables.push((name, table)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RawTable> {
        self.tables
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, table)| table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawTable)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<(String, RawTable)> for RawTables {
    fn from_iter<I: IntoIterator<Item = (String, RawTable)>>(iter: I) -> Self {
        let mut tables = RawTables::default();
        for (name, table) in iter {
            tables.insert(name, table);
        }
        tables
    }
}

fn decode_table(name: &str, value: Value) -> RawTable {
    let Value::Array(rows) = value else {
        warn!("Table '{}' is {}, not a list of rows; treating it as empty", name, kind_of(&value));
        return RawTable::new();
    };
    rows.into_iter()
        .map(|row| match row {
            Value::Array(cells) => cells.into_iter().map(cell_text).collect(),
            // A lone scalar row is read as a one-cell row.
            Value::Null => Vec::new(),
            other => vec![cell_text(other)],
        })
        .collect()
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
