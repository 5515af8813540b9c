use crate::value::Value;
use serde::Serialize;

///
/// ResultSet
/// Materialized EMF result: the `S` header plus one row per surviving
/// group, in first-sighting order.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultSet {
    header: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    #[must_use]
    pub const fn new(header: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { header, rows }
    }

    //
    // Shape
    //

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of result rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    //
    // Lookup
    //

    /// Values of one output column, by header text.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let position = self.header.iter().position(|column| column == name)?;

        Some(self.rows.iter().map(|row| &row[position]).collect())
    }

    /// Every cell in its natural textual form, as handed to result sinks.
    #[must_use]
    pub fn rendered_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Value::render).collect())
            .collect()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.header, self.rows)
    }
}
