/// Row Mapping Module
///
/// Converts fetched SQLite rows into ordered column -> text pairs.

use rusqlite::types::ValueRef;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One fetched record: column names paired with text values, in select order.
///
/// SQL `NULL` is kept as `None` so it is not confused with an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    entries: Vec<(String, Option<String>)>,
}

impl Row {
    /// Creates an empty row
    pub fn new() -> Self {
        Row::default()
    }

    /// Maps a SQLite row using the statement's column names
    pub fn from_sqlite(columns: &[String], row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let mut entries = Vec::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            entries.push((name.clone(), text_value(row.get_ref(i)?)));
        }
        Ok(Row { entries })
    }

    /// Appends a column
    pub fn push(&mut self, column: impl Into<String>, value: Option<String>) {
        self.entries.push((column.into(), value));
    }

    /// Value of `column`; `None` when the column is missing or NULL
    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == column)
    }

    /// Whether `column` exists and holds NULL
    pub fn is_null(&self, column: &str) -> bool {
        self.entries
            .iter()
            .any(|(name, value)| name == column && value.is_none())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Coerces a SQLite value to text
fn text_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Some(String::from_utf8_lossy(b).into_owned()),
    }
}
