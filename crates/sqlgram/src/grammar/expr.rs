//! Condition-list compiler shared by WHERE, HAVING and ON.

use super::{Compilation, Grammar};
use crate::builder::QueryModel;
use crate::condition::{Condition, Operand, Predicate};
use crate::error::SqlResult;
use crate::ident::{Ident, IdentPart};
use crate::operator::Operator;
use crate::value::Value;

impl Grammar {
    /// Compile `conditions` behind `keyword` (`WHERE`, `HAVING`, `ON`).
    ///
    /// Returns an empty string for an empty list. `qualify_with` names the
    /// table used to qualify bare left-hand columns (ON clauses only).
    pub(crate) fn conditions(
        &self,
        conditions: &[Condition],
        model: &QueryModel,
        ctx: &mut Compilation,
        keyword: &str,
        qualify_with: Option<&str>,
    ) -> SqlResult<String> {
        let body = self.condition_body(conditions, model, ctx, qualify_with)?;
        if body.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{keyword} {body}"))
    }

    fn condition_body(
        &self,
        conditions: &[Condition],
        model: &QueryModel,
        ctx: &mut Compilation,
        qualify_with: Option<&str>,
    ) -> SqlResult<String> {
        let mut out = String::new();
        for condition in conditions {
            let fragment = self.condition(condition, model, ctx, qualify_with)?;
            if fragment.is_empty() {
                continue;
            }
            // The first emitted condition drops its connector.
            if !out.is_empty() {
                out.push(' ');
                out.push_str(condition.boolean.as_sql());
                out.push(' ');
            }
            out.push_str(&fragment);
        }
        Ok(out)
    }

    fn condition(
        &self,
        condition: &Condition,
        model: &QueryModel,
        ctx: &mut Compilation,
        qualify_with: Option<&str>,
    ) -> SqlResult<String> {
        match &condition.predicate {
            Predicate::Raw(sql) => Ok(sql.clone()),
            Predicate::Group(inner) => {
                let body = self.condition_body(inner, model, ctx, qualify_with)?;
                if body.is_empty() {
                    return Ok(body);
                }
                Ok(format!("({body})"))
            }
            Predicate::Compare {
                lhs,
                operator,
                value,
            } => {
                if let Some(constant) = empty_list_constant(*operator, value) {
                    return Ok(constant.to_string());
                }
                let lhs = self.operand(lhs, model, ctx, qualify_with)?;
                let rhs = self.comparison(*operator, value, model, ctx)?;
                Ok(format!("{lhs} {rhs}"))
            }
        }
    }

    fn operand(
        &self,
        operand: &Operand,
        model: &QueryModel,
        ctx: &mut Compilation,
        qualify_with: Option<&str>,
    ) -> SqlResult<String> {
        match operand {
            Operand::Column(name) => {
                let mut ident = Ident::parse(name);
                if let Some(table) = qualify_with
                    && !ident.is_qualified()
                {
                    ident.parts.insert(0, IdentPart::Name(table.to_string()));
                }
                Ok(ident.column_sql(self.config.quote, &model.table_prefix))
            }
            Operand::Raw(sql) => Ok(sql.clone()),
            Operand::Callback(callback) => Ok(callback()),
            Operand::SubQuery(query) => {
                let sql = self.compile_model(query.model(), ctx)?;
                Ok(format!("({sql})"))
            }
        }
    }

    fn comparison(
        &self,
        operator: Operator,
        value: &Value,
        model: &QueryModel,
        ctx: &mut Compilation,
    ) -> SqlResult<String> {
        match value {
            Value::Null if operator.is_equality() => Ok("IS NULL".to_string()),
            Value::Null => Ok("IS NOT NULL".to_string()),
            Value::List(items) if operator.is_range() && items.len() == 2 => {
                let from = self.value(&items[0], &model.table_prefix, ctx)?;
                let to = self.value(&items[1], &model.table_prefix, ctx)?;
                Ok(format!("{} {from} AND {to}", operator.to_sql()))
            }
            _ => {
                let rhs = self.value(value, &model.table_prefix, ctx)?;
                Ok(format!("{} {rhs}", operator.to_sql()))
            }
        }
    }
}

/// `IN ()` matches nothing and `NOT IN ()` matches everything.
fn empty_list_constant(operator: Operator, value: &Value) -> Option<&'static str> {
    match (operator, value) {
        (Operator::In, Value::List(items)) if items.is_empty() => Some("1 = 0"),
        (Operator::NotIn, Value::List(items)) if items.is_empty() => Some("1 = 1"),
        _ => None,
    }
}
