//! Condition tuples for WHERE / ON / HAVING.
//!
//! A [`Condition`] is one `{column, operator, value, boolean}` entry. The
//! operator is resolved against the allow-list when the condition is built, so
//! an invalid operator never reaches the grammar.

use crate::builder::Builder;
use crate::error::{SqlError, SqlResult};
use crate::operator::{Boolean, Operator};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Callback producing a raw SQL fragment for the left-hand side.
pub type RawCallback = Arc<dyn Fn() -> String + Send + Sync>;

/// Left-hand side of a comparison.
#[derive(Clone)]
pub enum Operand {
    /// Column reference; prefixed only when qualified.
    Column(String),
    /// Raw SQL, emitted verbatim.
    Raw(String),
    /// Invoked at compile time; its output is emitted verbatim.
    Callback(RawCallback),
    /// Parenthesized sub-query.
    SubQuery(Box<Builder>),
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column(c) => f.debug_tuple("Column").field(c).finish(),
            Operand::Raw(r) => f.debug_tuple("Raw").field(r).finish(),
            Operand::Callback(_) => f.write_str("Callback(..)"),
            Operand::SubQuery(q) => f.debug_tuple("SubQuery").field(q).finish(),
        }
    }
}

impl From<&str> for Operand {
    fn from(c: &str) -> Self {
        Operand::Column(c.to_string())
    }
}

impl From<String> for Operand {
    fn from(c: String) -> Self {
        Operand::Column(c)
    }
}

impl From<Builder> for Operand {
    fn from(q: Builder) -> Self {
        Operand::SubQuery(Box::new(q))
    }
}

/// What a condition tests.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `lhs OP value`
    Compare {
        lhs: Operand,
        operator: Operator,
        value: Value,
    },
    /// Parenthesized nested condition list.
    Group(Vec<Condition>),
    /// Raw SQL condition.
    Raw(String),
}

/// A condition together with the connector that joins it to its predecessor.
#[derive(Debug, Clone)]
pub struct Condition {
    pub boolean: Boolean,
    pub predicate: Predicate,
}

impl Condition {
    /// Build a comparison, validating `operator`.
    pub fn compare(
        lhs: impl Into<Operand>,
        operator: &str,
        value: impl Into<Value>,
        boolean: Boolean,
    ) -> SqlResult<Self> {
        let operator = Operator::parse(operator)?;
        let value = value.into();
        check_shape(operator, &value)?;
        Ok(Self {
            boolean,
            predicate: Predicate::Compare {
                lhs: lhs.into(),
                operator,
                value,
            },
        })
    }

    /// Nested group.
    pub fn group(conditions: Vec<Condition>, boolean: Boolean) -> Self {
        Self {
            boolean,
            predicate: Predicate::Group(conditions),
        }
    }

    /// Raw SQL condition.
    ///
    /// # Safety
    /// Be careful with SQL injection when using raw conditions.
    pub fn raw(sql: impl Into<String>, boolean: Boolean) -> Self {
        Self {
            boolean,
            predicate: Predicate::Raw(sql.into()),
        }
    }
}

/// Range and membership operators only accept values they can render.
///
/// NULL is always accepted: it is rewritten to `IS [NOT] NULL`.
fn check_shape(operator: Operator, value: &Value) -> SqlResult<()> {
    let accepted = match value {
        Value::Null => true,
        _ if operator.is_range() => matches!(value, Value::List(items) if items.len() == 2),
        _ if matches!(operator, Operator::In | Operator::NotIn) => {
            matches!(value, Value::List(_) | Value::SubQuery(_) | Value::Raw(_))
        }
        _ => true,
    };
    if accepted {
        return Ok(());
    }
    let got = match value {
        Value::List(items) => format!("list of {}", items.len()),
        other => other.type_name().to_string(),
    };
    Err(SqlError::unsupported_value(format!(
        "{} expects {}, got {got}",
        operator.to_sql(),
        if operator.is_range() {
            "a two-element list"
        } else {
            "a list or sub-query"
        }
    )))
}

/// Accumulates conditions for a nested group.
///
/// Handed to the closure of [`Builder::where_group`] and friends.
#[derive(Debug, Default, Clone)]
pub struct ConditionGroup {
    pub(crate) conditions: Vec<Condition>,
}

impl ConditionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// AND comparison.
    pub fn where_(
        &mut self,
        column: impl Into<Operand>,
        operator: &str,
        value: impl Into<Value>,
    ) -> SqlResult<&mut Self> {
        self.conditions
            .push(Condition::compare(column, operator, value, Boolean::And)?);
        Ok(self)
    }

    /// OR comparison.
    pub fn or_where(
        &mut self,
        column: impl Into<Operand>,
        operator: &str,
        value: impl Into<Value>,
    ) -> SqlResult<&mut Self> {
        self.conditions
            .push(Condition::compare(column, operator, value, Boolean::Or)?);
        Ok(self)
    }

    /// AND nested group.
    pub fn where_group<F>(&mut self, build: F) -> SqlResult<&mut Self>
    where
        F: FnOnce(&mut ConditionGroup) -> SqlResult<()>,
    {
        let mut inner = ConditionGroup::new();
        build(&mut inner)?;
        self.conditions
            .push(Condition::group(inner.conditions, Boolean::And));
        Ok(self)
    }

    /// OR nested group.
    pub fn or_where_group<F>(&mut self, build: F) -> SqlResult<&mut Self>
    where
        F: FnOnce(&mut ConditionGroup) -> SqlResult<()>,
    {
        let mut inner = ConditionGroup::new();
        build(&mut inner)?;
        self.conditions
            .push(Condition::group(inner.conditions, Boolean::Or));
        Ok(self)
    }

    /// Raw AND condition.
    pub fn where_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.conditions.push(Condition::raw(sql, Boolean::And));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn into_conditions(self) -> Vec<Condition> {
        self.conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_validates_operator() {
        assert!(Condition::compare("x", "frobnicate", 1, Boolean::And).is_err());
        let cond = Condition::compare("x", ">=", 1, Boolean::Or).unwrap();
        assert_eq!(cond.boolean, Boolean::Or);
        assert!(matches!(
            cond.predicate,
            Predicate::Compare {
                operator: Operator::Gte,
                ..
            }
        ));
    }

    #[test]
    fn test_range_operators_need_two_bounds() {
        for value in [Value::from(vec![1, 2, 3]), Value::from(5), Value::from(vec![1])] {
            let err = Condition::compare("x", "between", value, Boolean::And).unwrap_err();
            assert!(err.is_unsupported_value());
        }
        assert!(Condition::compare("x", "not between", 5, Boolean::And).is_err());
        assert!(Condition::compare("x", "between", vec![1, 9], Boolean::And).is_ok());
        assert!(Condition::compare("x", "between", Value::Null, Boolean::And).is_ok());
    }

    #[test]
    fn test_membership_operators_need_a_list() {
        let err = Condition::compare("x", "in", 5, Boolean::And).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported value type: IN expects a list or sub-query, got int"
        );
        assert!(Condition::compare("x", "not in", "a", Boolean::And).is_err());
        assert!(Condition::compare("x", "in", vec![1, 2], Boolean::And).is_ok());
        assert!(Condition::compare("x", "in", Builder::default(), Boolean::And).is_ok());
        assert!(Condition::compare("x", "in", Value::raw("(1, 2)"), Boolean::And).is_ok());
    }

    #[test]
    fn test_group_collects_nested_conditions() {
        let mut group = ConditionGroup::new();
        group
            .where_("a", "=", 1)
            .unwrap()
            .or_where_group(|g| {
                g.where_("b", "<", 2)?.or_where("c", ">", 3)?;
                Ok(())
            })
            .unwrap();
        let conditions = group.into_conditions();
        assert_eq!(conditions.len(), 2);
        match &conditions[1].predicate {
            Predicate::Group(inner) => assert_eq!(inner.len(), 2),
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn test_callback_operand_debug_is_opaque() {
        let op = Operand::Callback(Arc::new(|| "LOWER(name)".to_string()));
        assert_eq!(format!("{op:?}"), "Callback(..)");
    }
}
