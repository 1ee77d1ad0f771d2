use super::{Compilation, EscapeStyle, Grammar};
use crate::error::{SqlError, SqlResult};
use crate::ident::Ident;
use crate::value::Value;
use std::fmt::Write;

/// Named-placeholder sentinel: strings starting with it are emitted verbatim.
const PLACEHOLDER_SENTINEL: char = ':';

/// Fractional digits kept when rendering floats.
const FLOAT_PRECISION: usize = 5;

impl Grammar {
    /// Compile one value to SQL.
    pub(crate) fn value(
        &self,
        value: &Value,
        prefix: &str,
        ctx: &mut Compilation,
    ) -> SqlResult<String> {
        match value {
            Value::String(s) if s.starts_with(PLACEHOLDER_SENTINEL) => Ok(s.clone()),
            Value::String(s) => Ok(self.literal(value, ctx, || self.quote_string(s))),
            Value::Int(i) => Ok(self.literal(value, ctx, || i.to_string())),
            Value::Bool(b) => {
                let text = if *b { "1" } else { "0" };
                Ok(self.literal(value, ctx, || text.to_string()))
            }
            Value::Float(f) => {
                let text = format_float(*f)?;
                Ok(self.literal(value, ctx, || text))
            }
            Value::Null => Ok("NULL".to_string()),
            Value::List(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    parts.push(self.value(item, prefix, ctx)?);
                }
                Ok(format!("({})", parts.join(", ")))
            }
            Value::Date(d) => {
                let text = self.format_temporal(d.format(&self.config.date_format))?;
                Ok(self.literal(value, ctx, || self.quote_string(&text)))
            }
            Value::DateTime(dt) => {
                let text = self.format_temporal(dt.format(&self.config.datetime_format))?;
                Ok(self.literal(value, ctx, || self.quote_string(&text)))
            }
            Value::Column(name) => {
                Ok(Ident::parse(name).column_sql(self.config.quote, prefix))
            }
            Value::SubQuery(query) => {
                let sql = self.compile_model(query.model(), ctx)?;
                Ok(format!("({})", strip_terminator(&sql)))
            }
            Value::Json(json) => {
                if json.is_null() {
                    return Err(SqlError::unsupported_value("JSON encoder produced null"));
                }
                let text = json.to_string();
                Ok(self.literal(value, ctx, || self.quote_string(&text)))
            }
            Value::Raw(sql) => Ok(sql.clone()),
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(d) => Ok(self.literal(value, ctx, || d.normalize().to_string())),
        }
    }

    /// Either inline the literal or bind it and emit a placeholder.
    fn literal<F>(&self, value: &Value, ctx: &mut Compilation, inline: F) -> String
    where
        F: FnOnce() -> String,
    {
        if ctx.placeholders {
            ctx.bindings.push(value.clone());
            self.config.placeholder.render(ctx.bindings.len())
        } else {
            inline()
        }
    }

    /// Quote a string literal using the dialect's escape style.
    pub(crate) fn quote_string(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('\'');
        for ch in s.chars() {
            match (self.config.escape, ch) {
                (EscapeStyle::Backslash, '\'') => out.push_str("\\'"),
                (EscapeStyle::Backslash, '\\') => out.push_str("\\\\"),
                (EscapeStyle::Doubling, '\'') => out.push_str("''"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
        out
    }

    fn format_temporal(&self, formatted: impl std::fmt::Display) -> SqlResult<String> {
        let mut out = String::new();
        write!(out, "{formatted}").map_err(|_| {
            SqlError::config(format!(
                "invalid date/time format for {} dialect",
                self.config.dialect
            ))
        })?;
        Ok(out)
    }
}

/// Fixed 5-digit rendering with trailing zeros and a trailing point removed.
pub(crate) fn format_float(f: f64) -> SqlResult<String> {
    if !f.is_finite() {
        return Err(SqlError::unsupported_value(format!("non-finite float {f}")));
    }
    let fixed = format!("{:.*}", FLOAT_PRECISION, f);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    Ok(match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    })
}

fn strip_terminator(sql: &str) -> &str {
    sql.trim_end().trim_end_matches(';').trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Dialect;

    fn inline(grammar: &Grammar, value: Value) -> String {
        grammar.compile_value(&value, "").unwrap()
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(format_float(1.5).unwrap(), "1.5");
        assert_eq!(format_float(1.50000).unwrap(), "1.5");
        assert_eq!(format_float(3.0).unwrap(), "3");
        assert_eq!(format_float(0.123456789).unwrap(), "0.12346");
        assert_eq!(format_float(-2.25).unwrap(), "-2.25");
        assert_eq!(format_float(-0.000001).unwrap(), "0");
        assert!(format_float(f64::NAN).unwrap_err().is_unsupported_value());
        assert!(format_float(f64::INFINITY).is_err());
    }

    #[test]
    fn test_string_escaping_per_dialect() {
        let ansi = Grammar::new(Dialect::Ansi);
        assert_eq!(inline(&ansi, "O'Brien".into()), "'O''Brien'");
        assert_eq!(inline(&ansi, r"a\b".into()), r"'a\b'");

        let mysql = Grammar::new(Dialect::MySql);
        assert_eq!(inline(&mysql, "O'Brien".into()), r"'O\'Brien'");
        assert_eq!(inline(&mysql, r"a\b".into()), r"'a\\b'");
    }

    #[test]
    fn test_placeholder_sentinel_is_verbatim() {
        let g = Grammar::new(Dialect::MySql);
        assert_eq!(inline(&g, ":user_id".into()), ":user_id");
    }

    #[test]
    fn test_scalar_literals() {
        let g = Grammar::default();
        assert_eq!(inline(&g, 42.into()), "42");
        assert_eq!(inline(&g, true.into()), "1");
        assert_eq!(inline(&g, false.into()), "0");
        assert_eq!(inline(&g, Value::Null), "NULL");
        assert_eq!(inline(&g, vec![1, 2, 3].into()), "(1, 2, 3)");
        assert_eq!(inline(&g, Value::raw("NOW()")), "NOW()");
    }

    #[test]
    fn test_temporal_literals_use_dialect_format() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(8, 5, 1, 250)
            .unwrap();
        assert_eq!(
            inline(&Grammar::new(Dialect::MySql), dt.into()),
            "'2024-03-09 08:05:01'"
        );
        assert_eq!(
            inline(&Grammar::new(Dialect::SqlServer), dt.into()),
            "'2024-03-09 08:05:01.250'"
        );
        assert_eq!(
            inline(&Grammar::default(), dt.date().into()),
            "'2024-03-09'"
        );
    }

    #[test]
    fn test_column_values_are_identifiers() {
        let g = Grammar::new(Dialect::MySql);
        assert_eq!(
            g.compile_value(&Value::column("users.id"), "app_").unwrap(),
            "`app_users`.`id`"
        );
        assert_eq!(g.compile_value(&Value::column("id"), "app_").unwrap(), "`id`");
    }

    #[test]
    fn test_json_values_are_quoted() {
        let g = Grammar::new(Dialect::Postgres);
        let v = Value::json(&serde_json::json!({"k": "it's"})).unwrap();
        assert_eq!(inline(&g, v), r#"'{"k":"it''s"}'"#);
        assert!(
            g.compile_value(&Value::Json(serde_json::Value::Null), "")
                .unwrap_err()
                .is_unsupported_value()
        );
    }

    #[test]
    fn test_strip_terminator_removes_trailing_semicolons() {
        assert_eq!(strip_terminator("SELECT 1; "), "SELECT 1");
        assert_eq!(strip_terminator("SELECT 1"), "SELECT 1");
    }
}
