use crate::source::{Record, RowSource, RowStream, Schema, SourceError};

///
/// Relation
///
/// In-memory, re-scannable base relation.
/// Every record is checked against the schema width on insert.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Relation {
    schema: Schema,
    rows: Vec<Record>,
}

impl Relation {
    #[must_use]
    pub const fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Build a relation from column names and row values in one step.
    pub fn from_rows<I, S, R>(columns: I, rows: R) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator,
        R::Item: Into<Record>,
    {
        let mut relation = Self::new(Schema::new(columns)?);
        for row in rows {
            relation.push(row.into())?;
        }

        Ok(relation)
    }

    /// Materialize any source into memory with exactly one scan.
    pub fn buffer(source: &mut dyn RowSource) -> Result<Self, SourceError> {
        let mut relation = Self::new(source.schema().clone());
        for row in source.scan()? {
            relation.push(row?)?;
        }

        Ok(relation)
    }

    pub fn push(&mut self, record: Record) -> Result<(), SourceError> {
        self.rows.push(record.check_arity(&self.schema)?);

        Ok(())
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(in crate::source) const fn from_parts(schema: Schema, rows: Vec<Record>) -> Self {
        Self { schema, rows }
    }
}

impl RowSource for Relation {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn supports_rescan(&self) -> bool {
        true
    }

    fn scan(&mut self) -> Result<RowStream<'_>, SourceError> {
        Ok(Box::new(self.rows.iter().cloned().map(Ok)))
    }
}

///
/// IterSource
///
/// One-shot source over an arbitrary record iterator, such as a cursor
/// over a live store. A second scan fails with `SourceError::Exhausted`.
///

pub struct IterSource<I> {
    schema: Schema,
    rows: Option<I>,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = Result<Record, SourceError>>,
{
    pub fn new(schema: Schema, rows: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            schema,
            rows: Some(rows.into_iter()),
        }
    }
}

impl<I> RowSource for IterSource<I>
where
    I: Iterator<Item = Result<Record, SourceError>>,
{
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn supports_rescan(&self) -> bool {
        false
    }

    fn scan(&mut self) -> Result<RowStream<'_>, SourceError> {
        let rows = self.rows.take().ok_or(SourceError::Exhausted)?;

        Ok(Box::new(rows))
    }
}
