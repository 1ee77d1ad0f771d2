//! Dialect configuration.
//!
//! One [`Grammar`](super::Grammar) type serves every engine; the differences
//! live in a [`DialectConfig`] value (quoting, escaping, placeholders, row
//! limiting, random-row selection, locking).

use crate::error::{SqlError, SqlResult};
use crate::ident::IdentQuote;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Ansi,
    MySql,
    Postgres,
    Sqlite,
    SqlServer,
    Oracle,
}

impl Dialect {
    /// Resolve a dialect identifier (`"mysql"`, `"pgsql"`, `"sqlite"`, `"sqlsrv"`, ...).
    pub fn from_name(name: &str) -> SqlResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ansi" | "default" => Ok(Dialect::Ansi),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "pgsql" | "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "sqlsrv" | "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            "oracle" | "oci" => Ok(Dialect::Oracle),
            _ => Err(SqlError::UnknownDialect(name.to_string())),
        }
    }

    /// Canonical short name.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Ansi => "ansi",
            Dialect::MySql => "mysql",
            Dialect::Postgres => "pgsql",
            Dialect::Sqlite => "sqlite",
            Dialect::SqlServer => "sqlsrv",
            Dialect::Oracle => "oracle",
        }
    }

    /// Preset configuration for this dialect.
    pub fn config(self) -> DialectConfig {
        let base = DialectConfig {
            dialect: self,
            quote: IdentQuote::Double,
            escape: EscapeStyle::Doubling,
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            placeholder: PlaceholderStyle::Question,
            random: RandomStrategy::OrderByFunction("RANDOM()".to_string()),
            limit: LimitStyle::LimitOffset,
            lock: LockStyle::Suffix {
                update: "FOR UPDATE".to_string(),
                shared: "FOR SHARE".to_string(),
            },
        };

        match self {
            Dialect::Ansi => base,
            Dialect::MySql => DialectConfig {
                quote: IdentQuote::Backtick,
                escape: EscapeStyle::Backslash,
                random: RandomStrategy::OrderByFunction("RAND()".to_string()),
                lock: LockStyle::Suffix {
                    update: "FOR UPDATE".to_string(),
                    shared: "LOCK IN SHARE MODE".to_string(),
                },
                ..base
            },
            Dialect::Postgres => DialectConfig {
                placeholder: PlaceholderStyle::Dollar,
                ..base
            },
            Dialect::Sqlite => DialectConfig {
                lock: LockStyle::Unsupported,
                ..base
            },
            Dialect::SqlServer => DialectConfig {
                quote: IdentQuote::Bracket,
                datetime_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                placeholder: PlaceholderStyle::AtP,
                random: RandomStrategy::TopFetchFirst,
                limit: LimitStyle::TopOrOffsetFetch,
                lock: LockStyle::TableHint,
                ..base
            },
            Dialect::Oracle => DialectConfig {
                placeholder: PlaceholderStyle::Colon,
                random: RandomStrategy::RowNum,
                limit: LimitStyle::OffsetFetch,
                lock: LockStyle::Suffix {
                    update: "FOR UPDATE".to_string(),
                    shared: String::new(),
                },
                ..base
            },
        }
    }
}

impl FromStr for Dialect {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How quotes inside string literals are escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeStyle {
    /// `'` becomes `''`.
    Doubling,
    /// `\` becomes `\\` and `'` becomes `\'` (MySQL).
    Backslash,
}

/// Placeholder syntax used when values are bound instead of inlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?`
    Question,
    /// `$1`, `$2`, ...
    Dollar,
    /// `@p1`, `@p2`, ...
    AtP,
    /// `:1`, `:2`, ...
    Colon,
}

impl PlaceholderStyle {
    /// Render the placeholder for the 1-based parameter `index`.
    pub fn render(self, index: usize) -> String {
        match self {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Dollar => format!("${index}"),
            PlaceholderStyle::AtP => format!("@p{index}"),
            PlaceholderStyle::Colon => format!(":{index}"),
        }
    }
}

/// How `RANDOM` statements pick rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomStrategy {
    /// `ORDER BY <function>` followed by the dialect's normal row limit.
    OrderByFunction(String),
    /// `SELECT TOP n ... ORDER BY IDX FETCH FIRST n ROWS ONLY`.
    ///
    /// Reproduces the legacy SQL Server output byte for byte, including the
    /// redundant `TOP`/`FETCH FIRST` pairing. Configure
    /// `OrderByFunction("NEWID()")` to opt out.
    TopFetchFirst,
    /// `SELECT * FROM (... ORDER BY DBMS_RANDOM.VALUE) WHERE ROWNUM <= n`.
    RowNum,
}

/// How `limit`/`offset` are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStyle {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `SELECT TOP n` without an offset, `OFFSET m ROWS FETCH NEXT n ROWS ONLY` with one.
    TopOrOffsetFetch,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY` / `FETCH FIRST n ROWS ONLY`.
    OffsetFetch,
}

/// How pessimistic locks are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockStyle {
    /// Trailing clause. An empty string means the mode is not available.
    Suffix { update: String, shared: String },
    /// SQL Server table hints after the first `FROM` table.
    TableHint,
    /// Locks are silently omitted (SQLite).
    Unsupported,
}

/// Everything that varies between dialects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectConfig {
    pub dialect: Dialect,
    pub quote: IdentQuote,
    pub escape: EscapeStyle,
    /// `chrono` format string for datetime literals.
    pub datetime_format: String,
    /// `chrono` format string for date literals.
    pub date_format: String,
    pub placeholder: PlaceholderStyle,
    pub random: RandomStrategy,
    pub limit: LimitStyle,
    pub lock: LockStyle,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Dialect::Ansi.config()
    }
}

impl DialectConfig {
    /// Preset for `dialect`.
    pub fn new(dialect: Dialect) -> Self {
        dialect.config()
    }

    pub fn with_quote(mut self, quote: IdentQuote) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_escape(mut self, escape: EscapeStyle) -> Self {
        self.escape = escape;
        self
    }

    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: PlaceholderStyle) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn with_random(mut self, random: RandomStrategy) -> Self {
        self.random = random;
        self
    }

    pub fn with_limit(mut self, limit: LimitStyle) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_lock(mut self, lock: LockStyle) -> Self {
        self.lock = lock;
        self
    }
}
