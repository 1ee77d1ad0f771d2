//! INSERT / UPDATE / DELETE payloads.
//!
//! The three entry points (`insert`, `update`, `delete`) switch the statement
//! type and fail with [`SqlError::ReadOnlyViolation`](crate::SqlError) on a
//! read-only builder.

use super::{Builder, StatementType, TableSource};
use crate::error::SqlResult;
use crate::value::Value;

impl Builder {
    /// Start an `INSERT INTO table`.
    pub fn insert(&mut self, table: impl Into<String>) -> SqlResult<&mut Self> {
        self.guard_writable("insert")?;
        self.model.statement = StatementType::Insert;
        self.model.from = vec![TableSource::Table(table.into())];
        Ok(self)
    }

    /// Set the INSERT column list.
    pub fn columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model.insert_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one VALUES row.
    pub fn values(&mut self, row: Vec<Value>) -> &mut Self {
        self.model.insert_values.push(row);
        self
    }

    /// Convenience: set columns and a single row from `(column, value)` pairs.
    pub fn insert_row<I, S, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Value>,
    {
        let (columns, row): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(c, v)| (c.into(), v.into()))
            .unzip();
        self.model.insert_columns = columns;
        self.model.insert_values.push(row);
        self
    }

    /// Start an `UPDATE table`.
    pub fn update(&mut self, table: impl Into<String>) -> SqlResult<&mut Self> {
        self.guard_writable("update")?;
        self.model.statement = StatementType::Update;
        self.model.update_targets = vec![table.into()];
        Ok(self)
    }

    /// Add another UPDATE target (`UPDATE a, b`).
    pub fn update_target(&mut self, table: impl Into<String>) -> &mut Self {
        self.model.update_targets.push(table.into());
        self
    }

    /// `SET column = value`
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.model.update_sets.push((column.into(), value.into()));
        self
    }

    /// Turn the query into a DELETE over its current FROM list.
    pub fn delete(&mut self) -> SqlResult<&mut Self> {
        self.guard_writable("delete")?;
        self.model.statement = StatementType::Delete;
        self.model.delete = true;
        Ok(self)
    }

    /// `DELETE FROM table`
    pub fn delete_from(&mut self, table: impl Into<String>) -> SqlResult<&mut Self> {
        self.guard_writable("delete")?;
        self.model.from = vec![TableSource::Table(table.into())];
        self.delete()
    }
}
