//! Grammar: compiles a [`Builder`]'s query model into SQL text.
//!
//! A [`Grammar`] is immutable once constructed. It holds a [`DialectConfig`]
//! and a table mapping each [`StatementType`] to its ordered clause list.
//! Compilation walks that list, drops empty fragments, and joins the rest with
//! single spaces. All per-compilation state (collected bindings, placeholder
//! counter) lives in a local [`Compilation`], so one grammar can be shared
//! across threads.

mod clauses;
pub mod dialect;
mod expr;
mod values;

pub use dialect::{
    Dialect, DialectConfig, EscapeStyle, LimitStyle, LockStyle, PlaceholderStyle, RandomStrategy,
};

use crate::builder::{Builder, CompiledQuery, QueryModel, StatementType};
use crate::error::{SqlError, SqlResult};
use crate::ident::Ident;
use crate::value::Value;
use std::collections::HashMap;

/// One clause compiler in a statement pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    Aggregate,
    Selects,
    From,
    Joins,
    Wheres,
    Groups,
    Havings,
    Orders,
    Limit,
    Offset,
    Unions,
    Lock,
    Into,
    Inserts,
    Values,
    Updates,
    Sets,
    Deletes,
}

/// SELECT pipeline. GROUP BY precedes HAVING so the output is valid SQL;
/// use [`Grammar::with_pipeline`] for a different order.
const SELECT_CLAUSES: &[Clause] = &[
    Clause::Aggregate,
    Clause::Selects,
    Clause::From,
    Clause::Joins,
    Clause::Wheres,
    Clause::Groups,
    Clause::Havings,
    Clause::Orders,
    Clause::Limit,
    Clause::Offset,
    Clause::Unions,
    Clause::Lock,
];

fn default_pipelines() -> HashMap<StatementType, Vec<Clause>> {
    HashMap::from([
        (StatementType::Select, SELECT_CLAUSES.to_vec()),
        (StatementType::Random, SELECT_CLAUSES.to_vec()),
        (
            StatementType::Insert,
            vec![Clause::Into, Clause::Inserts, Clause::Values],
        ),
        (
            StatementType::Update,
            vec![Clause::Updates, Clause::Sets, Clause::Wheres],
        ),
        (
            StatementType::Delete,
            vec![Clause::Deletes, Clause::From, Clause::Wheres],
        ),
    ])
}

/// Per-call compilation state.
pub(crate) struct Compilation {
    placeholders: bool,
    bindings: Vec<Value>,
}

impl Compilation {
    fn new(placeholders: bool) -> Self {
        Self {
            placeholders,
            bindings: Vec::new(),
        }
    }
}

/// Dialect-aware SQL compiler.
#[derive(Debug, Clone)]
pub struct Grammar {
    config: DialectConfig,
    pipelines: HashMap<StatementType, Vec<Clause>>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new(Dialect::Ansi)
    }
}

impl Grammar {
    /// Grammar with the preset configuration for `dialect`.
    pub fn new(dialect: Dialect) -> Self {
        Self::with_config(dialect.config())
    }

    /// Grammar with a custom dialect configuration.
    pub fn with_config(config: DialectConfig) -> Self {
        Self {
            config,
            pipelines: default_pipelines(),
        }
    }

    /// Grammar for a dialect identifier such as `"mysql"` or `"sqlsrv"`.
    pub fn from_name(name: &str) -> SqlResult<Self> {
        Ok(Self::new(Dialect::from_name(name)?))
    }

    pub fn config(&self) -> &DialectConfig {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    /// Clause list run for `statement`, if any.
    pub fn pipeline(&self, statement: StatementType) -> Option<&[Clause]> {
        self.pipelines.get(&statement).map(Vec::as_slice)
    }

    /// Replace the clause list for `statement`.
    pub fn with_pipeline(mut self, statement: StatementType, clauses: Vec<Clause>) -> Self {
        self.pipelines.insert(statement, clauses);
        self
    }

    /// Remove support for `statement`; compiling it then fails with
    /// [`SqlError::UnsupportedQueryType`].
    pub fn without_pipeline(mut self, statement: StatementType) -> Self {
        self.pipelines.remove(&statement);
        self
    }

    /// Compile `query` to SQL, inlining literal values (or emitting
    /// placeholders if the builder asked for them).
    pub fn compile(&self, query: &Builder) -> SqlResult<String> {
        self.compile_query(query).map(|compiled| compiled.sql)
    }

    /// Compile `query` to SQL plus its bindings.
    pub fn compile_query(&self, query: &Builder) -> SqlResult<CompiledQuery> {
        let mut ctx = Compilation::new(query.uses_placeholders());
        let sql = self.compile_model(query.model(), &mut ctx)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlgram.sql",
            dialect = %self.config.dialect,
            statement = %query.statement_type(),
            binding_count = ctx.bindings.len(),
            sql = %truncate_sql(&sql, 200),
            "compiled query"
        );

        Ok(CompiledQuery {
            sql,
            bindings: ctx.bindings,
            named: query.model().bindings.clone(),
        })
    }

    /// Compile a single value as an inline literal.
    pub fn compile_value(&self, value: &Value, table_prefix: &str) -> SqlResult<String> {
        let mut ctx = Compilation::new(false);
        self.value(value, table_prefix, &mut ctx)
    }

    /// Quote a column reference; only qualified names receive `table_prefix`.
    pub fn compile_identifier(&self, name: &str, table_prefix: &str) -> String {
        Ident::parse(name).column_sql(self.config.quote, table_prefix)
    }

    /// Quote a table reference, applying `table_prefix` to the table name.
    pub fn compile_table(&self, name: &str, table_prefix: &str) -> String {
        Ident::parse(name).table_sql(self.config.quote, table_prefix)
    }

    /// Compile a model, sharing `ctx` with any enclosing query.
    pub(crate) fn compile_model(
        &self,
        model: &QueryModel,
        ctx: &mut Compilation,
    ) -> SqlResult<String> {
        let clauses = self
            .pipelines
            .get(&model.statement)
            .ok_or_else(|| SqlError::UnsupportedQueryType(model.statement.to_string()))?;

        if model.statement == StatementType::Random
            && self.config.random == RandomStrategy::RowNum
        {
            return self.compile_random_rownum(model, clauses, ctx);
        }

        self.compile_clauses(model, clauses, ctx)
    }

    fn compile_clauses(
        &self,
        model: &QueryModel,
        clauses: &[Clause],
        ctx: &mut Compilation,
    ) -> SqlResult<String> {
        let mut parts: Vec<String> = Vec::with_capacity(clauses.len());
        for clause in clauses {
            let fragment = self.compile_clause(*clause, model, ctx)?;
            let fragment = fragment.trim();
            if !fragment.is_empty() {
                parts.push(fragment.to_string());
            }
        }
        Ok(parts.join(" "))
    }

    /// `SELECT * FROM (<select ordered randomly>) WHERE ROWNUM <= n [lock]`
    ///
    /// The lock clause stays outside the derived table.
    fn compile_random_rownum(
        &self,
        model: &QueryModel,
        clauses: &[Clause],
        ctx: &mut Compilation,
    ) -> SqlResult<String> {
        let inner_clauses: Vec<Clause> = clauses
            .iter()
            .copied()
            .filter(|c| !matches!(c, Clause::Limit | Clause::Offset | Clause::Lock))
            .collect();
        let inner = self.compile_clauses(model, &inner_clauses, ctx)?;
        let mut sql = match model.limit {
            Some(n) => format!("SELECT * FROM ({inner}) WHERE ROWNUM <= {n}"),
            None => inner,
        };

        if clauses.contains(&Clause::Lock) {
            let lock = self.compile_clause(Clause::Lock, model, ctx)?;
            let lock = lock.trim();
            if !lock.is_empty() {
                sql.push(' ');
                sql.push_str(lock);
            }
        }
        Ok(sql)
    }
}

/// Truncate `sql` to at most `max` bytes on a char boundary.
#[cfg(feature = "tracing")]
fn truncate_sql(sql: &str, max: usize) -> std::borrow::Cow<'_, str> {
    if sql.len() <= max {
        return std::borrow::Cow::Borrowed(sql);
    }
    let mut end = max;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    std::borrow::Cow::Owned(format!("{}...", &sql[..end]))
}
