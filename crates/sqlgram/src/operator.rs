//! Comparison operator allow-list.
//!
//! Every `where`/`on`/`having` call resolves its operator through
//! [`Operator::parse`], so a typo fails at the call site instead of leaking
//! into the generated SQL.

use crate::error::{SqlError, SqlResult};
use std::fmt;
use std::str::FromStr;

/// A comparison operator accepted in condition tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Lt,
    Gt,
    Lte,
    Gte,
    /// `<>`
    NotEqAnsi,
    /// `!=`
    Ne,
    /// MySQL null-safe equality `<=>`
    NullSafeEq,
    Like,
    LikeBinary,
    NotLike,
    Ilike,
    NotIlike,
    Between,
    NotBetween,
    In,
    NotIn,
    Is,
    IsNot,
    Rlike,
    NotRlike,
    Regexp,
    NotRegexp,
    SimilarTo,
    NotSimilarTo,
    /// PostgreSQL regex match `~`
    RegexMatch,
    /// `~*`
    RegexMatchInsensitive,
    /// `!~`
    RegexNotMatch,
    /// `!~*`
    RegexNotMatchInsensitive,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
}

const ALL: &[Operator] = &[
    Operator::Eq,
    Operator::Lt,
    Operator::Gt,
    Operator::Lte,
    Operator::Gte,
    Operator::NotEqAnsi,
    Operator::Ne,
    Operator::NullSafeEq,
    Operator::Like,
    Operator::LikeBinary,
    Operator::NotLike,
    Operator::Ilike,
    Operator::NotIlike,
    Operator::Between,
    Operator::NotBetween,
    Operator::In,
    Operator::NotIn,
    Operator::Is,
    Operator::IsNot,
    Operator::Rlike,
    Operator::NotRlike,
    Operator::Regexp,
    Operator::NotRegexp,
    Operator::SimilarTo,
    Operator::NotSimilarTo,
    Operator::RegexMatch,
    Operator::RegexMatchInsensitive,
    Operator::RegexNotMatch,
    Operator::RegexNotMatchInsensitive,
    Operator::BitAnd,
    Operator::BitOr,
    Operator::BitXor,
    Operator::ShiftLeft,
    Operator::ShiftRight,
];

impl Operator {
    /// Resolve an operator string against the allow-list.
    ///
    /// Matching is case-insensitive and tolerant of surrounding/repeated
    /// whitespace (`"NOT   like"` is `not like`).
    pub fn parse(op: &str) -> SqlResult<Self> {
        let normalized = op
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();

        ALL.iter()
            .copied()
            .find(|candidate| candidate.as_str() == normalized)
            .ok_or_else(|| SqlError::unknown_operator(op))
    }

    /// Lowercase canonical spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Lte => "<=",
            Operator::Gte => ">=",
            Operator::NotEqAnsi => "<>",
            Operator::Ne => "!=",
            Operator::NullSafeEq => "<=>",
            Operator::Like => "like",
            Operator::LikeBinary => "like binary",
            Operator::NotLike => "not like",
            Operator::Ilike => "ilike",
            Operator::NotIlike => "not ilike",
            Operator::Between => "between",
            Operator::NotBetween => "not between",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::Rlike => "rlike",
            Operator::NotRlike => "not rlike",
            Operator::Regexp => "regexp",
            Operator::NotRegexp => "not regexp",
            Operator::SimilarTo => "similar to",
            Operator::NotSimilarTo => "not similar to",
            Operator::RegexMatch => "~",
            Operator::RegexMatchInsensitive => "~*",
            Operator::RegexNotMatch => "!~",
            Operator::RegexNotMatchInsensitive => "!~*",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::ShiftLeft => "<<",
            Operator::ShiftRight => ">>",
        }
    }

    /// Uppercased spelling as emitted into SQL.
    pub fn to_sql(self) -> String {
        self.as_str().to_ascii_uppercase()
    }

    /// Operators that compare for equality; a NULL operand rewrites them to `IS`.
    pub fn is_equality(self) -> bool {
        matches!(self, Operator::Eq | Operator::Is | Operator::NullSafeEq)
    }

    /// Operators whose right-hand side is a two-element range.
    pub fn is_range(self) -> bool {
        matches!(self, Operator::Between | Operator::NotBetween)
    }
}

impl FromStr for Operator {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean connector joining a condition to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boolean {
    #[default]
    And,
    Or,
}

impl Boolean {
    pub fn as_sql(self) -> &'static str {
        match self {
            Boolean::And => "AND",
            Boolean::Or => "OR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_operators() {
        assert_eq!(Operator::parse("=").unwrap(), Operator::Eq);
        assert_eq!(Operator::parse("LIKE").unwrap(), Operator::Like);
        assert_eq!(Operator::parse("  not   like ").unwrap(), Operator::NotLike);
        assert_eq!(Operator::parse("<>").unwrap(), Operator::NotEqAnsi);
        assert_eq!(Operator::parse("!~*").unwrap(), Operator::RegexNotMatchInsensitive);
        assert_eq!("in".parse::<Operator>().unwrap(), Operator::In);
    }

    #[test]
    fn test_parse_rejects_unknown_operator() {
        let err = Operator::parse("frobnicate").unwrap_err();
        assert!(err.is_unknown_operator());
        assert!(Operator::parse("==").is_err());
        assert!(Operator::parse("").is_err());
    }

    #[test]
    fn test_to_sql_uppercases() {
        assert_eq!(Operator::NotBetween.to_sql(), "NOT BETWEEN");
        assert_eq!(Operator::Gte.to_sql(), ">=");
    }

    #[test]
    fn test_every_operator_round_trips_through_parse() {
        for op in ALL {
            assert_eq!(Operator::parse(op.as_str()).unwrap(), *op);
        }
    }
}
