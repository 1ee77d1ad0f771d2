//! Per-clause compilers.
//!
//! Every compiler returns an empty string when its slice of the model is
//! unset; the pipeline drops those fragments.

use super::{Clause, Compilation, Grammar, LimitStyle, LockStyle, RandomStrategy};
use crate::builder::{
    Aggregate, Join, JoinKind, LockMode, QueryModel, SelectItem, StatementType, TableSource,
};
use crate::error::{SqlError, SqlResult};
use crate::ident::Ident;

impl Grammar {
    pub(super) fn compile_clause(
        &self,
        clause: Clause,
        model: &QueryModel,
        ctx: &mut Compilation,
    ) -> SqlResult<String> {
        match clause {
            Clause::Aggregate => Ok(self.compile_aggregate(model)),
            Clause::Selects => self.compile_selects(model, ctx),
            Clause::From => self.compile_from(model, ctx),
            Clause::Joins => self.compile_joins(model, ctx),
            Clause::Wheres => self.conditions(&model.wheres, model, ctx, "WHERE", None),
            Clause::Groups => Ok(self.compile_groups(model)),
            Clause::Havings => self.conditions(&model.havings, model, ctx, "HAVING", None),
            Clause::Orders => Ok(self.compile_orders(model)),
            Clause::Limit => Ok(self.compile_limit(model)),
            Clause::Offset => Ok(self.compile_offset(model)),
            Clause::Unions => self.compile_unions(model, ctx),
            Clause::Lock => Ok(self.compile_lock(model)),
            Clause::Into => Ok(self.compile_into(model)),
            Clause::Inserts => Ok(self.compile_insert_columns(model)),
            Clause::Values => self.compile_insert_values(model, ctx),
            Clause::Updates => Ok(self.compile_update_targets(model)),
            Clause::Sets => self.compile_sets(model, ctx),
            Clause::Deletes => Ok("DELETE".to_string()),
        }
    }

    fn column(&self, name: &str, model: &QueryModel) -> String {
        Ident::parse(name).column_sql(self.config.quote, &model.table_prefix)
    }

    fn table(&self, name: &str, model: &QueryModel) -> String {
        Ident::parse(name).table_sql(self.config.quote, &model.table_prefix)
    }

    fn columns(&self, names: &[String], model: &QueryModel) -> String {
        names
            .iter()
            .map(|name| self.column(name, model))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn is_random(&self, model: &QueryModel) -> bool {
        model.statement == StatementType::Random
    }

    /// Whether this query's row count is carried by `TOP`/`FETCH FIRST` in
    /// the random-row layout, leaving LIMIT/OFFSET empty.
    fn random_top_fetch(&self, model: &QueryModel) -> bool {
        self.is_random(model) && self.config.random == RandomStrategy::TopFetchFirst
    }

    /// Row count rendered as `SELECT TOP n`, if any.
    fn top(&self, model: &QueryModel) -> Option<u64> {
        if self.random_top_fetch(model) {
            return model.limit;
        }
        match self.config.limit {
            LimitStyle::TopOrOffsetFetch if model.offset.is_none() => model.limit,
            _ => None,
        }
    }

    // ==================== SELECT ====================

    fn compile_aggregate(&self, model: &QueryModel) -> String {
        let Some(Aggregate { function, columns }) = &model.aggregate else {
            return String::new();
        };
        let top = self
            .top(model)
            .map(|n| format!("TOP {n} "))
            .unwrap_or_default();
        let distinct = if model.distinct { "DISTINCT " } else { "" };
        let alias = self.config.quote.quote("aggregate");
        format!(
            "SELECT {top}{function}({distinct}{}) AS {alias}",
            self.columns(columns, model)
        )
    }

    fn compile_selects(&self, model: &QueryModel, ctx: &mut Compilation) -> SqlResult<String> {
        if model.aggregate.is_some() {
            return Ok(String::new());
        }

        let mut sql = String::from("SELECT");
        if model.distinct {
            sql.push_str(" DISTINCT");
        }
        if let Some(n) = self.top(model) {
            sql.push_str(&format!(" TOP {n}"));
        }

        if model.selects.is_empty() {
            sql.push_str(" *");
            return Ok(sql);
        }

        let mut items = Vec::with_capacity(model.selects.len());
        for item in &model.selects {
            items.push(match item {
                SelectItem::Column(name) => self.column(name, model),
                SelectItem::Raw(raw) => raw.clone(),
                SelectItem::SubQuery { query, alias } => {
                    let inner = self.compile_model(query.model(), ctx)?;
                    format!("({inner}) AS {}", self.config.quote.quote(alias))
                }
            });
        }
        sql.push(' ');
        sql.push_str(&items.join(", "));
        Ok(sql)
    }

    fn table_source(
        &self,
        source: &TableSource,
        model: &QueryModel,
        ctx: &mut Compilation,
    ) -> SqlResult<String> {
        match source {
            TableSource::Table(name) => Ok(self.table(name, model)),
            TableSource::SubQuery { query, alias } => {
                let inner = self.compile_model(query.model(), ctx)?;
                let alias = self
                    .config
                    .quote
                    .quote(&format!("{}{alias}", model.table_prefix));
                Ok(format!("({inner}) AS {alias}"))
            }
        }
    }

    fn compile_from(&self, model: &QueryModel, ctx: &mut Compilation) -> SqlResult<String> {
        if model.from.is_empty() {
            return Ok(String::new());
        }

        let mut sources = Vec::with_capacity(model.from.len());
        for source in &model.from {
            sources.push(self.table_source(source, model, ctx)?);
        }

        if let (LockStyle::TableHint, Some(lock), Some(first)) =
            (&self.config.lock, model.lock, sources.first_mut())
        {
            first.push_str(match lock {
                LockMode::Update => " WITH (UPDLOCK, ROWLOCK)",
                LockMode::Shared => " WITH (HOLDLOCK, ROWLOCK)",
            });
        }

        Ok(format!("FROM {}", sources.join(", ")))
    }

    fn compile_joins(&self, model: &QueryModel, ctx: &mut Compilation) -> SqlResult<String> {
        // Bare ON columns are qualified only when FROM names a single source.
        let qualifier = match model.from.as_slice() {
            [only] => only.reference_name(),
            _ => None,
        };

        let mut joins = Vec::with_capacity(model.joins.len());
        for Join { kind, table, ons } in &model.joins {
            let mut sql = format!("{} {}", kind.as_sql(), self.table_source(table, model, ctx)?);
            if *kind != JoinKind::Cross {
                let on = self.conditions(ons, model, ctx, "ON", qualifier.as_deref())?;
                if !on.is_empty() {
                    sql.push(' ');
                    sql.push_str(&on);
                }
            }
            joins.push(sql);
        }
        Ok(joins.join(" "))
    }

    fn compile_groups(&self, model: &QueryModel) -> String {
        if model.groups.is_empty() {
            return String::new();
        }
        format!("GROUP BY {}", self.columns(&model.groups, model))
    }

    fn compile_orders(&self, model: &QueryModel) -> String {
        if self.is_random(model) {
            return match &self.config.random {
                RandomStrategy::OrderByFunction(function) => format!("ORDER BY {function}"),
                RandomStrategy::TopFetchFirst => match model.limit {
                    Some(n) => format!("ORDER BY IDX FETCH FIRST {n} ROWS ONLY"),
                    None => "ORDER BY IDX".to_string(),
                },
                RandomStrategy::RowNum => "ORDER BY DBMS_RANDOM.VALUE".to_string(),
            };
        }

        if model.orders.is_empty() {
            // OFFSET ... FETCH needs an ORDER BY on SQL Server.
            if self.config.limit == LimitStyle::TopOrOffsetFetch && model.offset.is_some() {
                return "ORDER BY (SELECT 0)".to_string();
            }
            return String::new();
        }

        let buckets: Vec<String> = model
            .orders
            .iter()
            .map(|bucket| {
                format!(
                    "{} {}",
                    self.columns(&bucket.columns, model),
                    bucket.direction.as_sql()
                )
            })
            .collect();
        format!("ORDER BY {}", buckets.join(", "))
    }

    fn compile_limit(&self, model: &QueryModel) -> String {
        if self.random_top_fetch(model) {
            return String::new();
        }
        match (self.config.limit, model.limit) {
            (LimitStyle::LimitOffset, Some(n)) => format!("LIMIT {n}"),
            _ => String::new(),
        }
    }

    fn compile_offset(&self, model: &QueryModel) -> String {
        if self.random_top_fetch(model) {
            return String::new();
        }
        match (self.config.limit, model.offset, model.limit) {
            (LimitStyle::LimitOffset, Some(m), _) => format!("OFFSET {m}"),
            (LimitStyle::LimitOffset, None, _) => String::new(),
            (_, Some(m), Some(n)) => format!("OFFSET {m} ROWS FETCH NEXT {n} ROWS ONLY"),
            (_, Some(m), None) => format!("OFFSET {m} ROWS"),
            (LimitStyle::OffsetFetch, None, Some(n)) => format!("FETCH FIRST {n} ROWS ONLY"),
            // TOP carries a bare limit.
            (_, None, _) => String::new(),
        }
    }

    fn compile_unions(&self, model: &QueryModel, ctx: &mut Compilation) -> SqlResult<String> {
        let mut parts = Vec::with_capacity(model.unions.len());
        for union in &model.unions {
            let keyword = if union.all { "UNION ALL" } else { "UNION" };
            let inner = self.compile_model(union.query.model(), ctx)?;
            parts.push(format!("{keyword} {inner}"));
        }
        Ok(parts.join(" "))
    }

    fn compile_lock(&self, model: &QueryModel) -> String {
        match (&self.config.lock, model.lock) {
            (LockStyle::Suffix { update, .. }, Some(LockMode::Update)) => update.clone(),
            (LockStyle::Suffix { shared, .. }, Some(LockMode::Shared)) => shared.clone(),
            _ => String::new(),
        }
    }

    // ==================== INSERT / UPDATE ====================

    fn compile_into(&self, model: &QueryModel) -> String {
        match model.from.first() {
            Some(TableSource::Table(name)) => format!("INSERT INTO {}", self.table(name, model)),
            _ => "INSERT INTO".to_string(),
        }
    }

    fn compile_insert_columns(&self, model: &QueryModel) -> String {
        if model.insert_columns.is_empty() {
            return String::new();
        }
        format!("({})", self.columns(&model.insert_columns, model))
    }

    fn compile_insert_values(
        &self,
        model: &QueryModel,
        ctx: &mut Compilation,
    ) -> SqlResult<String> {
        let mut rows = Vec::with_capacity(model.insert_values.len());
        for row in model.insert_values.iter().filter(|row| !row.is_empty()) {
            let mut values = Vec::with_capacity(row.len());
            for value in row {
                values.push(self.value(value, &model.table_prefix, ctx)?);
            }
            rows.push(format!("({})", values.join(", ")));
        }
        if rows.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("VALUES {}", rows.join(", ")))
    }

    fn compile_update_targets(&self, model: &QueryModel) -> String {
        if model.update_targets.is_empty() {
            return String::new();
        }
        let targets: Vec<String> = model
            .update_targets
            .iter()
            .map(|name| self.table(name, model))
            .collect();
        format!("UPDATE {}", targets.join(", "))
    }

    fn compile_sets(&self, model: &QueryModel, ctx: &mut Compilation) -> SqlResult<String> {
        if model.update_sets.is_empty() {
            return Err(SqlError::EmptyUpdate);
        }
        let mut sets = Vec::with_capacity(model.update_sets.len());
        for (column, value) in &model.update_sets {
            let value = self.value(value, &model.table_prefix, ctx)?;
            sets.push(format!("{} = {value}", self.column(column, model)));
        }
        Ok(format!("SET {}", sets.join(", ")))
    }
}
