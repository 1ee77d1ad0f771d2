//! Fluent query builder.
//!
//! A [`Builder`] owns a [`QueryModel`] and mutates it in place through chained
//! calls. Compilation borrows the model read-only, so calling
//! [`Builder::to_sql`] twice on an unchanged builder yields identical SQL.
//!
//! ## Design
//!
//! - Calls that can be wrong (operators, batched arrays, mutations on a
//!   read-only builder) return `SqlResult<&mut Self>` and fail immediately.
//! - Everything else returns `&mut Self`.
//! - The attached [`Grammar`] is only a default: any grammar can compile any
//!   builder via [`Grammar::compile`].
//!
//! # Example
//! ```
//! use sqlgram::{Builder, Dialect};
//!
//! let mut qb = Builder::for_dialect(Dialect::MySql);
//! qb.table_prefix("app_")
//!     .select(["id", "name"])
//!     .from("users")
//!     .where_("active", "=", true)?
//!     .limit(10);
//! assert_eq!(
//!     qb.to_sql()?,
//!     "SELECT `id`, `name` FROM `app_users` WHERE `active` = 1 LIMIT 10"
//! );
//! # Ok::<(), sqlgram::SqlError>(())
//! ```

pub mod mutation;
pub mod select;
pub mod where_builder;

use crate::condition::Condition;
use crate::error::{SqlError, SqlResult};
use crate::grammar::{Dialect, Grammar};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Statement kind; selects the clause pipeline the grammar runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatementType {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
    /// A SELECT that returns random rows.
    Random,
}

impl StatementType {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementType::Select => "select",
            StatementType::Insert => "insert",
            StatementType::Update => "update",
            StatementType::Delete => "delete",
            StatementType::Random => "random",
        }
    }
}

impl FromStr for StatementType {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "select" => Ok(StatementType::Select),
            "insert" => Ok(StatementType::Insert),
            "update" => Ok(StatementType::Update),
            "delete" => Ok(StatementType::Delete),
            "random" => Ok(StatementType::Random),
            _ => Err(SqlError::UnsupportedQueryType(s.to_string())),
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the SELECT list.
#[derive(Debug, Clone)]
pub enum SelectItem {
    Column(String),
    Raw(String),
    SubQuery { query: Box<Builder>, alias: String },
}

/// One entry of the FROM list (or a JOIN target).
#[derive(Debug, Clone)]
pub enum TableSource {
    Table(String),
    SubQuery { query: Box<Builder>, alias: String },
}

impl TableSource {
    /// Name other clauses use to refer to this source.
    pub fn reference_name(&self) -> Option<String> {
        match self {
            TableSource::Table(name) => crate::ident::Ident::parse(name)
                .reference_name()
                .map(str::to_string),
            TableSource::SubQuery { alias, .. } => Some(alias.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// A join target together with its ON conditions.
#[derive(Debug, Clone)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableSource,
    pub ons: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// ORDER BY columns sharing one direction, in first-use order.
#[derive(Debug, Clone)]
pub struct OrderBucket {
    pub direction: Direction,
    pub columns: Vec<String>,
}

/// `SELECT FN(cols) AS aggregate`
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub function: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Union {
    pub query: Box<Builder>,
    pub all: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Update,
    Shared,
}

/// The declarative query model a [`Builder`] accumulates.
#[derive(Debug, Clone, Default)]
pub struct QueryModel {
    pub statement: StatementType,
    pub distinct: bool,
    pub aggregate: Option<Aggregate>,
    pub selects: Vec<SelectItem>,
    pub from: Vec<TableSource>,
    pub joins: Vec<Join>,
    pub wheres: Vec<Condition>,
    pub groups: Vec<String>,
    pub havings: Vec<Condition>,
    pub orders: Vec<OrderBucket>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub unions: Vec<Union>,
    pub lock: Option<LockMode>,
    pub insert_columns: Vec<String>,
    pub insert_values: Vec<Vec<Value>>,
    pub update_targets: Vec<String>,
    pub update_sets: Vec<(String, Value)>,
    pub delete: bool,
    pub table_prefix: String,
    /// Named auxiliary parameters (`:name` -> value).
    pub bindings: Vec<(String, Value)>,
}

/// Output of a compilation: SQL plus the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    /// Positional values, in placeholder order. Empty for inline compilation.
    pub bindings: Vec<Value>,
    /// Named bindings registered through [`Builder::bind`].
    pub named: Vec<(String, Value)>,
}

/// Mutable, fluent query builder.
#[derive(Debug, Clone)]
pub struct Builder {
    pub(crate) model: QueryModel,
    grammar: Arc<Grammar>,
    read_only: bool,
    placeholders: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(Arc::new(Grammar::default()))
    }
}

impl Builder {
    /// Create a builder bound to `grammar`.
    pub fn new(grammar: Arc<Grammar>) -> Self {
        Self {
            model: QueryModel::default(),
            grammar,
            read_only: false,
            placeholders: false,
        }
    }

    /// Create a builder with the preset grammar for `dialect`.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::new(Arc::new(Grammar::new(dialect)))
    }

    /// Create a builder that refuses INSERT/UPDATE/DELETE.
    pub fn read_only(grammar: Arc<Grammar>) -> Self {
        let mut builder = Self::new(grammar);
        builder.read_only = true;
        builder
    }

    /// Fresh builder sharing this one's grammar, prefix and binding style.
    ///
    /// Use it for sub-queries.
    pub fn new_query(&self) -> Self {
        let mut builder = Self::new(Arc::clone(&self.grammar));
        builder.model.table_prefix = self.model.table_prefix.clone();
        builder.placeholders = self.placeholders;
        builder.read_only = self.read_only;
        builder
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    pub fn model(&self) -> &QueryModel {
        &self.model
    }

    pub fn statement_type(&self) -> StatementType {
        self.model.statement
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn uses_placeholders(&self) -> bool {
        self.placeholders
    }

    /// Prefix prepended to table names and qualified columns.
    pub fn table_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.model.table_prefix = prefix.into();
        self
    }

    /// Mark the builder read-only (or writable again).
    pub fn set_read_only(&mut self, read_only: bool) -> &mut Self {
        self.read_only = read_only;
        self
    }

    /// Bind values through placeholders instead of inlining literals.
    pub fn use_placeholders(&mut self, enabled: bool) -> &mut Self {
        self.placeholders = enabled;
        self
    }

    /// Register a named parameter referenced by a `:name` string value.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.model.bindings.push((name.into(), value.into()));
        self
    }

    /// Compile with the attached grammar.
    pub fn to_sql(&self) -> SqlResult<String> {
        self.grammar.compile(self)
    }

    /// Compile with the attached grammar, returning bindings as well.
    pub fn build(&self) -> SqlResult<CompiledQuery> {
        self.grammar.compile_query(self)
    }

    pub(crate) fn guard_writable(&self, action: &'static str) -> SqlResult<()> {
        if self.read_only {
            let err = SqlError::ReadOnlyViolation(action);
            log_rejected(&err);
            return Err(err);
        }
        Ok(())
    }
}

/// Record a rejected builder call before the error is returned.
pub(crate) fn log_rejected(err: &SqlError) {
    #[cfg(feature = "tracing")]
    tracing::warn!(target: "sqlgram.builder", error = %err, "rejected builder call");
    #[cfg(not(feature = "tracing"))]
    let _ = err;
}

#[cfg(test)]
mod tests;
