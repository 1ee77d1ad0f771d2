//! SELECT-side builder calls: columns, sources, joins, grouping, ordering,
//! pagination, unions, locks and random-row selection.

use super::{
    Aggregate, Builder, Direction, Join, JoinKind, LockMode, OrderBucket, SelectItem,
    StatementType, TableSource, Union,
};
use crate::condition::Condition;
use crate::error::SqlResult;
use crate::operator::Boolean;
use crate::value::Value;

impl Builder {
    /// Replace the SELECT list.
    pub fn select<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model.selects = columns
            .into_iter()
            .map(|c| SelectItem::Column(c.into()))
            .collect();
        self
    }

    /// Append one column to the SELECT list.
    pub fn add_select(&mut self, column: impl Into<String>) -> &mut Self {
        self.model.selects.push(SelectItem::Column(column.into()));
        self
    }

    /// Append a raw expression to the SELECT list.
    ///
    /// # Safety
    /// The text is not escaped.
    pub fn select_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.model.selects.push(SelectItem::Raw(sql.into()));
        self
    }

    /// Append `(sub-query) AS alias` to the SELECT list.
    pub fn select_sub(&mut self, query: Builder, alias: impl Into<String>) -> &mut Self {
        self.model.selects.push(SelectItem::SubQuery {
            query: Box::new(query),
            alias: alias.into(),
        });
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.model.distinct = true;
        self
    }

    /// Append a table to the FROM list.
    pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
        self.model.from.push(TableSource::Table(table.into()));
        self
    }

    /// Append `(sub-query) AS alias` to the FROM list.
    pub fn from_sub(&mut self, query: Builder, alias: impl Into<String>) -> &mut Self {
        self.model.from.push(TableSource::SubQuery {
            query: Box::new(query),
            alias: alias.into(),
        });
        self
    }

    // ==================== Joins ====================

    fn push_join(
        &mut self,
        kind: JoinKind,
        table: TableSource,
        first: &str,
        operator: &str,
        second: &str,
    ) -> SqlResult<&mut Self> {
        let on = Condition::compare(first, operator, Value::column(second), Boolean::And)
            .inspect_err(super::log_rejected)?;
        self.model.joins.push(Join {
            kind,
            table,
            ons: vec![on],
        });
        Ok(self)
    }

    /// `INNER JOIN table ON first operator second`
    pub fn join(
        &mut self,
        table: impl Into<String>,
        first: &str,
        operator: &str,
        second: &str,
    ) -> SqlResult<&mut Self> {
        self.push_join(
            JoinKind::Inner,
            TableSource::Table(table.into()),
            first,
            operator,
            second,
        )
    }

    /// `LEFT JOIN table ON first operator second`
    pub fn left_join(
        &mut self,
        table: impl Into<String>,
        first: &str,
        operator: &str,
        second: &str,
    ) -> SqlResult<&mut Self> {
        self.push_join(
            JoinKind::Left,
            TableSource::Table(table.into()),
            first,
            operator,
            second,
        )
    }

    /// `RIGHT JOIN table ON first operator second`
    pub fn right_join(
        &mut self,
        table: impl Into<String>,
        first: &str,
        operator: &str,
        second: &str,
    ) -> SqlResult<&mut Self> {
        self.push_join(
            JoinKind::Right,
            TableSource::Table(table.into()),
            first,
            operator,
            second,
        )
    }

    /// `INNER JOIN (sub-query) AS alias ON first operator second`
    pub fn join_sub(
        &mut self,
        query: Builder,
        alias: impl Into<String>,
        first: &str,
        operator: &str,
        second: &str,
    ) -> SqlResult<&mut Self> {
        let table = TableSource::SubQuery {
            query: Box::new(query),
            alias: alias.into(),
        };
        self.push_join(JoinKind::Inner, table, first, operator, second)
    }

    /// `CROSS JOIN table` (no ON clause).
    pub fn cross_join(&mut self, table: impl Into<String>) -> &mut Self {
        self.model.joins.push(Join {
            kind: JoinKind::Cross,
            table: TableSource::Table(table.into()),
            ons: Vec::new(),
        });
        self
    }

    // ==================== Grouping & ordering ====================

    pub fn group_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model.groups.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add `column` to the bucket for `direction`.
    ///
    /// Columns are grouped per direction: buckets keep the order in which each
    /// direction was first used, so `a ASC, b DESC, c ASC` renders as
    /// `a, c ASC, b DESC`.
    pub fn order_by_direction(
        &mut self,
        column: impl Into<String>,
        direction: Direction,
    ) -> &mut Self {
        let column = column.into();
        match self
            .model
            .orders
            .iter_mut()
            .find(|bucket| bucket.direction == direction)
        {
            Some(bucket) => bucket.columns.push(column),
            None => self.model.orders.push(OrderBucket {
                direction,
                columns: vec![column],
            }),
        }
        self
    }

    pub fn order_by(&mut self, column: impl Into<String>) -> &mut Self {
        self.order_by_direction(column, Direction::Asc)
    }

    pub fn order_by_desc(&mut self, column: impl Into<String>) -> &mut Self {
        self.order_by_direction(column, Direction::Desc)
    }

    // ==================== Pagination ====================

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.model.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.model.offset = Some(offset);
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(&mut self, page: u64, per_page: u64) -> &mut Self {
        let page = page.max(1);
        let size = per_page.max(1);
        self.model.limit = Some(size);
        self.model.offset = Some((page - 1).saturating_mul(size));
        self
    }

    // ==================== Aggregates ====================

    /// `SELECT function(columns) AS aggregate`, replacing the SELECT list.
    pub fn aggregate<I, S>(&mut self, function: impl Into<String>, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            columns.push("*".to_string());
        }
        self.model.aggregate = Some(Aggregate {
            function: function.into().to_ascii_uppercase(),
            columns,
        });
        self
    }

    /// `SELECT COUNT(*) AS aggregate`
    pub fn count(&mut self) -> &mut Self {
        self.aggregate("count", ["*"])
    }

    // ==================== Unions & locks ====================

    pub fn union(&mut self, query: Builder) -> &mut Self {
        self.model.unions.push(Union {
            query: Box::new(query),
            all: false,
        });
        self
    }

    pub fn union_all(&mut self, query: Builder) -> &mut Self {
        self.model.unions.push(Union {
            query: Box::new(query),
            all: true,
        });
        self
    }

    pub fn lock_for_update(&mut self) -> &mut Self {
        self.model.lock = Some(LockMode::Update);
        self
    }

    pub fn shared_lock(&mut self) -> &mut Self {
        self.model.lock = Some(LockMode::Shared);
        self
    }

    // ==================== Random rows ====================

    /// Turn the query into a RANDOM statement returning `count` rows.
    pub fn random(&mut self, count: u64) -> &mut Self {
        self.model.statement = StatementType::Random;
        self.model.limit = Some(count);
        self
    }

    /// Switch back to a plain SELECT.
    pub fn as_select(&mut self) -> &mut Self {
        self.model.statement = StatementType::Select;
        self
    }
}
