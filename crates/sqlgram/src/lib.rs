//! # sqlgram
//!
//! A fluent SQL query builder with per-dialect grammars.
//!
//! ## Features
//!
//! - **Builder / Grammar split**: a [`Builder`] only records what the query
//!   says; a [`Grammar`] decides how it is spelled for one database
//! - **Dialects**: ANSI, MySQL, PostgreSQL, SQLite, SQL Server and Oracle via
//!   a composable [`DialectConfig`]
//! - **Safe defaults**: operators come from an allow-list, read-only builders
//!   refuse INSERT/UPDATE/DELETE
//! - **Inline or bound values**: literals are inlined by default; opt into
//!   placeholders to get `?`/`$n`/`@pN` plus an ordered binding list
//! - **Thread-safe compilation**: a grammar holds no per-call state and can be
//!   shared behind an `Arc`
//!
//! ## Quick start
//!
//! ```
//! use sqlgram::{Builder, Dialect, Value};
//!
//! let mut qb = Builder::for_dialect(Dialect::Postgres);
//! qb.select(["id", "email"])
//!     .from("users")
//!     .where_("status", "=", "active")?
//!     .where_null("deleted_at")
//!     .order_by_desc("created_at")
//!     .limit(20)
//!     .use_placeholders(true);
//!
//! let compiled = qb.build()?;
//! assert_eq!(
//!     compiled.sql,
//!     r#"SELECT "id", "email" FROM "users" WHERE "status" = $1 AND "deleted_at" IS NULL ORDER BY "created_at" DESC LIMIT 20"#
//! );
//! assert_eq!(compiled.bindings, vec![Value::from("active")]);
//! # Ok::<(), sqlgram::SqlError>(())
//! ```

pub mod builder;
pub mod condition;
pub mod config;
pub mod error;
pub mod grammar;
pub mod ident;
pub mod operator;
pub mod value;

pub use builder::{Builder, CompiledQuery, Direction, StatementType};
pub use condition::{Condition, ConditionGroup, Operand};
pub use config::QueryConfig;
pub use error::{SqlError, SqlResult};
pub use grammar::{Clause, Dialect, DialectConfig, Grammar, RandomStrategy};
pub use ident::IdentQuote;
pub use operator::{Boolean, Operator};
pub use value::Value;
