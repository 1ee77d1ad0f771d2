//! File-based builder configuration.
//!
//! ```toml
//! dialect = "mysql"
//! table_prefix = "app_"
//! placeholders = true
//! read_only = false
//!
//! # Optional random-row override.
//! random = { order_by_function = "RAND()" }
//! ```

use crate::builder::Builder;
use crate::error::{SqlError, SqlResult};
use crate::grammar::{Dialect, DialectConfig, Grammar, RandomStrategy};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

fn default_dialect() -> String {
    Dialect::Ansi.name().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Dialect identifier, resolved through [`Dialect::from_name`].
    #[serde(default = "default_dialect")]
    pub dialect: String,
    #[serde(default)]
    pub table_prefix: String,
    /// Emit placeholders and collect bindings instead of inlining literals.
    #[serde(default)]
    pub placeholders: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub random: Option<RandomStrategy>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            table_prefix: String::new(),
            placeholders: false,
            read_only: false,
            random: None,
        }
    }
}

impl QueryConfig {
    pub fn from_toml_str(raw: &str) -> SqlResult<Self> {
        let config: QueryConfig = toml::from_str(raw)?;
        config.dialect()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> SqlResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SqlError::config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&raw).map_err(|e| {
            SqlError::config(format!(
                "failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    pub fn dialect(&self) -> SqlResult<Dialect> {
        Dialect::from_name(&self.dialect)
    }

    /// Dialect preset with the configured overrides applied.
    pub fn dialect_config(&self) -> SqlResult<DialectConfig> {
        let mut config = self.dialect()?.config();
        if let Some(random) = &self.random {
            config = config.with_random(random.clone());
        }
        Ok(config)
    }

    pub fn grammar(&self) -> SqlResult<Grammar> {
        Ok(Grammar::with_config(self.dialect_config()?))
    }

    /// Fresh builder carrying the configured grammar, prefix and flags.
    pub fn builder(&self) -> SqlResult<Builder> {
        let mut builder = Builder::new(Arc::new(self.grammar()?));
        builder
            .table_prefix(self.table_prefix.clone())
            .use_placeholders(self.placeholders)
            .set_read_only(self.read_only);
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_ansi() {
        let config = QueryConfig::from_toml_str("").unwrap();
        assert_eq!(config, QueryConfig::default());
        assert_eq!(config.dialect().unwrap(), Dialect::Ansi);
    }

    #[test]
    fn test_parses_full_file() {
        let config = QueryConfig::from_toml_str(
            r#"
dialect = "sqlsrv"
table_prefix = "app_"
placeholders = true
read_only = true
random = { order_by_function = "NEWID()" }
"#,
        )
        .unwrap();

        assert_eq!(config.dialect().unwrap(), Dialect::SqlServer);
        assert_eq!(
            config.dialect_config().unwrap().random,
            RandomStrategy::OrderByFunction("NEWID()".to_string())
        );

        let qb = config.builder().unwrap();
        assert!(qb.is_read_only());
        assert!(qb.uses_placeholders());
        assert_eq!(qb.model().table_prefix, "app_");
    }

    #[test]
    fn test_unit_random_strategy() {
        let config = QueryConfig::from_toml_str(
            r#"
dialect = "oracle"
random = "row_num"
"#,
        )
        .unwrap();
        assert_eq!(config.grammar().unwrap().config().random, RandomStrategy::RowNum);
    }

    #[test]
    fn test_rejects_unknown_dialect() {
        let err = QueryConfig::from_toml_str(r#"dialect = "db2""#).unwrap_err();
        assert!(matches!(err, SqlError::UnknownDialect(_)));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = QueryConfig::from_toml_str(r#"prefix = "x""#).unwrap_err();
        assert!(matches!(err, SqlError::Config(_)));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = QueryConfig::load("/definitely/not/here/sqlgram.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
