//! WHERE / HAVING / ON condition registration.

use super::{Builder, log_rejected};
use crate::condition::{Condition, ConditionGroup, Operand, Predicate, RawCallback};
use crate::error::{SqlError, SqlResult};
use crate::operator::{Boolean, Operator};
use crate::value::Value;

/// Which condition list a call targets.
#[derive(Clone, Copy)]
enum Target {
    Where,
    Having,
    /// ON list of the most recent join.
    On,
}

impl Builder {
    fn conditions_mut(&mut self, target: Target) -> SqlResult<&mut Vec<Condition>> {
        match target {
            Target::Where => Ok(&mut self.model.wheres),
            Target::Having => Ok(&mut self.model.havings),
            Target::On => match self.model.joins.last_mut() {
                Some(join) => Ok(&mut join.ons),
                None => {
                    let err = SqlError::MissingJoin;
                    log_rejected(&err);
                    Err(err)
                }
            },
        }
    }

    fn push_compare(
        &mut self,
        target: Target,
        lhs: Operand,
        operator: &str,
        value: Value,
        boolean: Boolean,
    ) -> SqlResult<&mut Self> {
        let condition =
            Condition::compare(lhs, operator, value, boolean).inspect_err(log_rejected)?;
        self.conditions_mut(target)?.push(condition);
        Ok(self)
    }

    fn push_known(&mut self, lhs: Operand, operator: Operator, value: Value, boolean: Boolean) {
        self.model.wheres.push(Condition {
            boolean,
            predicate: Predicate::Compare {
                lhs,
                operator,
                value,
            },
        });
    }

    fn push_many(
        &mut self,
        target: Target,
        columns: &[&str],
        operators: &[&str],
        values: Vec<Value>,
    ) -> SqlResult<&mut Self> {
        if columns.len() != operators.len() || columns.len() != values.len() {
            let err = SqlError::BatchLengthMismatch {
                columns: columns.len(),
                operators: operators.len(),
                values: values.len(),
            };
            log_rejected(&err);
            return Err(err);
        }

        // Validate the whole batch before touching the model.
        let mut batch = Vec::with_capacity(columns.len());
        for ((column, operator), value) in columns.iter().zip(operators).zip(values) {
            batch.push(
                Condition::compare(*column, operator, value, Boolean::And)
                    .inspect_err(log_rejected)?,
            );
        }
        self.conditions_mut(target)?.extend(batch);
        Ok(self)
    }

    // ==================== WHERE ====================

    /// `AND column operator value`
    ///
    /// A NULL value rewrites `=` to `IS NULL` and other operators to
    /// `IS NOT NULL`.
    pub fn where_(
        &mut self,
        column: impl Into<Operand>,
        operator: &str,
        value: impl Into<Value>,
    ) -> SqlResult<&mut Self> {
        self.push_compare(
            Target::Where,
            column.into(),
            operator,
            value.into(),
            Boolean::And,
        )
    }

    /// `OR column operator value`
    pub fn or_where(
        &mut self,
        column: impl Into<Operand>,
        operator: &str,
        value: impl Into<Value>,
    ) -> SqlResult<&mut Self> {
        self.push_compare(
            Target::Where,
            column.into(),
            operator,
            value.into(),
            Boolean::Or,
        )
    }

    /// Register several AND conditions from parallel arrays.
    ///
    /// All three slices must have the same length; nothing is added when they
    /// differ or when any operator is unknown.
    pub fn where_many(
        &mut self,
        columns: &[&str],
        operators: &[&str],
        values: Vec<Value>,
    ) -> SqlResult<&mut Self> {
        self.push_many(Target::Where, columns, operators, values)
    }

    /// Compare two columns: `first operator second`.
    pub fn where_column(
        &mut self,
        first: &str,
        operator: &str,
        second: &str,
    ) -> SqlResult<&mut Self> {
        self.push_compare(
            Target::Where,
            Operand::from(first),
            operator,
            Value::column(second),
            Boolean::And,
        )
    }

    /// Compare the output of a callback: `callback() operator value`.
    pub fn where_fn<F>(
        &mut self,
        callback: F,
        operator: &str,
        value: impl Into<Value>,
    ) -> SqlResult<&mut Self>
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        let callback: RawCallback = std::sync::Arc::new(callback);
        self.push_compare(
            Target::Where,
            Operand::Callback(callback),
            operator,
            value.into(),
            Boolean::And,
        )
    }

    /// Compare a sub-query against a value: `(sub) operator value`.
    pub fn where_sub(
        &mut self,
        query: Builder,
        operator: &str,
        value: impl Into<Value>,
    ) -> SqlResult<&mut Self> {
        self.push_compare(
            Target::Where,
            Operand::SubQuery(Box::new(query)),
            operator,
            value.into(),
            Boolean::And,
        )
    }

    pub fn where_null(&mut self, column: &str) -> &mut Self {
        self.push_known(Operand::from(column), Operator::Eq, Value::Null, Boolean::And);
        self
    }

    pub fn or_where_null(&mut self, column: &str) -> &mut Self {
        self.push_known(Operand::from(column), Operator::Eq, Value::Null, Boolean::Or);
        self
    }

    pub fn where_not_null(&mut self, column: &str) -> &mut Self {
        self.push_known(Operand::from(column), Operator::Ne, Value::Null, Boolean::And);
        self
    }

    pub fn or_where_not_null(&mut self, column: &str) -> &mut Self {
        self.push_known(Operand::from(column), Operator::Ne, Value::Null, Boolean::Or);
        self
    }

    /// `column IN (values...)`
    pub fn where_in<I, T>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let list = Value::List(values.into_iter().map(Into::into).collect());
        self.push_known(Operand::from(column), Operator::In, list, Boolean::And);
        self
    }

    /// `column NOT IN (values...)`
    pub fn where_not_in<I, T>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let list = Value::List(values.into_iter().map(Into::into).collect());
        self.push_known(Operand::from(column), Operator::NotIn, list, Boolean::And);
        self
    }

    /// `column IN (sub-query)`
    pub fn where_in_sub(&mut self, column: &str, query: Builder) -> &mut Self {
        self.push_known(
            Operand::from(column),
            Operator::In,
            Value::sub(query),
            Boolean::And,
        );
        self
    }

    /// `column BETWEEN from AND to`
    pub fn where_between(
        &mut self,
        column: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> &mut Self {
        let range = Value::List(vec![from.into(), to.into()]);
        self.push_known(Operand::from(column), Operator::Between, range, Boolean::And);
        self
    }

    /// Add a raw WHERE condition.
    ///
    /// # Safety
    ///
    /// This directly concatenates SQL. The caller must ensure safety.
    pub fn where_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.model.wheres.push(Condition::raw(sql, Boolean::And));
        self
    }

    pub fn or_where_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.model.wheres.push(Condition::raw(sql, Boolean::Or));
        self
    }

    /// AND a parenthesized group built by `build`.
    pub fn where_group<F>(&mut self, build: F) -> SqlResult<&mut Self>
    where
        F: FnOnce(&mut ConditionGroup) -> SqlResult<()>,
    {
        let mut group = ConditionGroup::new();
        build(&mut group).inspect_err(log_rejected)?;
        self.model
            .wheres
            .push(Condition::group(group.into_conditions(), Boolean::And));
        Ok(self)
    }

    /// OR a parenthesized group built by `build`.
    pub fn or_where_group<F>(&mut self, build: F) -> SqlResult<&mut Self>
    where
        F: FnOnce(&mut ConditionGroup) -> SqlResult<()>,
    {
        let mut group = ConditionGroup::new();
        build(&mut group).inspect_err(log_rejected)?;
        self.model
            .wheres
            .push(Condition::group(group.into_conditions(), Boolean::Or));
        Ok(self)
    }

    // ==================== HAVING ====================

    pub fn having(
        &mut self,
        column: impl Into<Operand>,
        operator: &str,
        value: impl Into<Value>,
    ) -> SqlResult<&mut Self> {
        self.push_compare(
            Target::Having,
            column.into(),
            operator,
            value.into(),
            Boolean::And,
        )
    }

    pub fn or_having(
        &mut self,
        column: impl Into<Operand>,
        operator: &str,
        value: impl Into<Value>,
    ) -> SqlResult<&mut Self> {
        self.push_compare(
            Target::Having,
            column.into(),
            operator,
            value.into(),
            Boolean::Or,
        )
    }

    /// Add a raw HAVING condition.
    ///
    /// # Safety
    ///
    /// This directly concatenates SQL. The caller must ensure safety.
    pub fn having_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.model.havings.push(Condition::raw(sql, Boolean::And));
        self
    }

    // ==================== ON ====================

    /// AND another column comparison onto the most recent join.
    pub fn on(&mut self, first: &str, operator: &str, second: &str) -> SqlResult<&mut Self> {
        self.push_compare(
            Target::On,
            Operand::from(first),
            operator,
            Value::column(second),
            Boolean::And,
        )
    }

    /// OR another column comparison onto the most recent join.
    pub fn or_on(&mut self, first: &str, operator: &str, second: &str) -> SqlResult<&mut Self> {
        self.push_compare(
            Target::On,
            Operand::from(first),
            operator,
            Value::column(second),
            Boolean::Or,
        )
    }

    /// AND a literal comparison onto the most recent join: `first operator value`.
    pub fn on_value(
        &mut self,
        first: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> SqlResult<&mut Self> {
        self.push_compare(
            Target::On,
            Operand::from(first),
            operator,
            value.into(),
            Boolean::And,
        )
    }

    /// Register several column comparisons on the most recent join from
    /// parallel arrays (same contract as [`Builder::where_many`]).
    pub fn on_many(
        &mut self,
        firsts: &[&str],
        operators: &[&str],
        seconds: &[&str],
    ) -> SqlResult<&mut Self> {
        let values = seconds.iter().map(|c| Value::column(*c)).collect();
        self.push_many(Target::On, firsts, operators, values)
    }
}
