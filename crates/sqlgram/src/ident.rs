//! System identifier handling.
//!
//! [`Ident`] is a parsed table or column reference: dotted parts, an optional
//! `*` wildcard tail and an optional `AS` alias. Rendering applies the dialect's
//! [`IdentQuote`] and the builder's table prefix.
//!
//! The prefix rule is asymmetric:
//!
//! - Table references get the prefix on the table segment (and on the alias).
//! - Qualified columns (`users.id`) get the prefix on the qualifying segment.
//! - Bare columns (`id`) are never prefixed.
//!
//! # Example
//! ```
//! use sqlgram::ident::{Ident, IdentQuote};
//!
//! let col = Ident::parse("users.id");
//! assert_eq!(col.column_sql(IdentQuote::Backtick, "app_"), "`app_users`.`id`");
//!
//! let bare = Ident::parse("id");
//! assert_eq!(bare.column_sql(IdentQuote::Backtick, "app_"), "`id`");
//! ```

use serde::{Deserialize, Serialize};

/// Identifier quoting style of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentQuote {
    /// No quoting: identifiers are emitted as written.
    None,
    /// ANSI double quotes, `"` escaped as `""`.
    #[default]
    Double,
    /// MySQL backticks, `` ` `` escaped as ``` `` ```.
    Backtick,
    /// SQL Server brackets, `]` escaped as `]]`.
    Bracket,
}

impl IdentQuote {
    /// Write `name` quoted into `out`.
    pub fn write(self, out: &mut String, name: &str) {
        let (open, close) = match self {
            IdentQuote::None => {
                out.push_str(name);
                return;
            }
            IdentQuote::Double => ('"', '"'),
            IdentQuote::Backtick => ('`', '`'),
            IdentQuote::Bracket => ('[', ']'),
        };
        out.push(open);
        for ch in name.chars() {
            if ch == close {
                out.push(close);
            }
            out.push(ch);
        }
        out.push(close);
    }

    /// Quote `name` into a new string.
    pub fn quote(self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        self.write(&mut out, name);
        out
    }
}

/// A part of a dotted identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// A named segment, stored unquoted.
    Name(String),
    /// The `*` wildcard.
    Wildcard,
}

/// A table or column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
    pub alias: Option<String>,
}

impl Ident {
    /// Parse a reference such as `users`, `users.id`, `users.*`,
    /// `"Weird.Name".id` or `users as u`.
    ///
    /// Parsing never fails: any already-quoted segment (`"..."`, `` `...` ``,
    /// `[...]`) is unwrapped so it can be re-quoted for the target dialect.
    pub fn parse(s: &str) -> Self {
        let (body, alias) = split_alias(s.trim());

        let mut parts = Vec::new();
        let mut chars = body.chars().peekable();
        let mut current = String::new();
        let mut quoted = false;

        while let Some(c) = chars.next() {
            match c {
                '"' | '`' | '[' if current.is_empty() && !quoted => {
                    let close = if c == '[' { ']' } else { c };
                    quoted = true;
                    while let Some(inner) = chars.next() {
                        if inner == close {
                            // Doubled closing char is an escaped literal.
                            if chars.peek() == Some(&close) {
                                chars.next();
                                current.push(close);
                            } else {
                                break;
                            }
                        } else {
                            current.push(inner);
                        }
                    }
                }
                '.' => {
                    parts.push(finish_part(std::mem::take(&mut current), quoted));
                    quoted = false;
                }
                _ => current.push(c),
            }
        }
        parts.push(finish_part(current, quoted));

        Self {
            parts,
            alias: alias.map(unquote_alias),
        }
    }

    /// Whether the reference carries a table/schema qualifier.
    pub fn is_qualified(&self) -> bool {
        self.parts.len() > 1
    }

    /// Render as a column reference.
    pub fn column_sql(&self, quote: IdentQuote, prefix: &str) -> String {
        let mut out = String::new();
        self.write_column(&mut out, quote, prefix);
        out
    }

    /// Render as a table reference.
    pub fn table_sql(&self, quote: IdentQuote, prefix: &str) -> String {
        let mut out = String::new();
        self.write_table(&mut out, quote, prefix);
        out
    }

    pub(crate) fn write_column(&self, out: &mut String, quote: IdentQuote, prefix: &str) {
        // The qualifier is the segment right before the column name.
        let qualifier = self.parts.len().checked_sub(2);
        self.write_parts(out, quote, prefix, qualifier);
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            quote.write(out, alias);
        }
    }

    pub(crate) fn write_table(&self, out: &mut String, quote: IdentQuote, prefix: &str) {
        let table = self.parts.len().checked_sub(1);
        self.write_parts(out, quote, prefix, table);
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            quote.write(out, &format!("{prefix}{alias}"));
        }
    }

    fn write_parts(
        &self,
        out: &mut String,
        quote: IdentQuote,
        prefix: &str,
        prefixed: Option<usize>,
    ) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Wildcard => out.push('*'),
                IdentPart::Name(name) if Some(i) == prefixed && !prefix.is_empty() => {
                    quote.write(out, &format!("{prefix}{name}"));
                }
                IdentPart::Name(name) => quote.write(out, name),
            }
        }
    }

    /// Name used to refer to this table from other clauses (alias, else table).
    pub fn reference_name(&self) -> Option<&str> {
        if let Some(alias) = &self.alias {
            return Some(alias);
        }
        match self.parts.last() {
            Some(IdentPart::Name(name)) => Some(name),
            _ => None,
        }
    }
}

fn finish_part(name: String, quoted: bool) -> IdentPart {
    if !quoted && name.trim() == "*" {
        IdentPart::Wildcard
    } else if quoted {
        IdentPart::Name(name)
    } else {
        IdentPart::Name(name.trim().to_string())
    }
}

/// Strip one layer of identifier quotes from an alias.
fn unquote_alias(alias: &str) -> String {
    let close = match alias.chars().next() {
        Some('"') => '"',
        Some('`') => '`',
        Some('[') => ']',
        _ => return alias.to_string(),
    };
    if alias.len() < 2 || !alias.ends_with(close) {
        return alias.to_string();
    }
    let doubled: String = [close, close].iter().collect();
    alias[1..alias.len() - 1].replace(&doubled, &close.to_string())
}

/// Split `expr as alias` (case-insensitive) into its halves.
///
/// Only the last ` as ` outside a quoted segment counts.
fn split_alias(s: &str) -> (&str, Option<&str>) {
    let bytes = s.as_bytes();
    let mut close: Option<u8> = None;
    let mut split = None;

    for (i, &b) in bytes.iter().enumerate() {
        match close {
            Some(c) if b == c => close = None,
            Some(_) => {}
            None => match b {
                b'"' | b'`' => close = Some(b),
                b'[' => close = Some(b']'),
                b' ' if bytes
                    .get(i..i + 4)
                    .is_some_and(|w| w.eq_ignore_ascii_case(b" as ")) =>
                {
                    split = Some(i);
                }
                _ => {}
            },
        }
    }

    match split {
        Some(pos) => {
            let alias = s[pos + 4..].trim();
            if alias.is_empty() {
                (s, None)
            } else {
                (s[..pos].trim_end(), Some(alias))
            }
        }
        None => (s, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_simple() {
        let ident = Ident::parse("users");
        assert_eq!(ident.table_sql(IdentQuote::Backtick, ""), "`users`");
        assert!(!ident.is_qualified());
    }

    #[test]
    fn test_ident_bare_column_is_never_prefixed() {
        let ident = Ident::parse("active");
        assert_eq!(ident.column_sql(IdentQuote::Backtick, "app_"), "`active`");
    }

    #[test]
    fn test_ident_qualified_column_prefixes_the_qualifier() {
        let ident = Ident::parse("users.id");
        assert_eq!(ident.column_sql(IdentQuote::Backtick, "app_"), "`app_users`.`id`");
    }

    #[test]
    fn test_ident_three_parts_prefixes_table_segment() {
        let ident = Ident::parse("main.users.id");
        assert_eq!(
            ident.column_sql(IdentQuote::Double, "app_"),
            r#""main"."app_users"."id""#
        );
        let table = Ident::parse("main.users");
        assert_eq!(table.table_sql(IdentQuote::Double, "app_"), r#""main"."app_users""#);
    }

    #[test]
    fn test_ident_wildcard() {
        let ident = Ident::parse("users.*");
        assert_eq!(ident.column_sql(IdentQuote::Bracket, "app_"), "[app_users].*");
        assert_eq!(Ident::parse("*").column_sql(IdentQuote::Bracket, ""), "*");
    }

    #[test]
    fn test_ident_alias() {
        let col = Ident::parse("users.name AS display");
        assert_eq!(
            col.column_sql(IdentQuote::Backtick, "app_"),
            "`app_users`.`name` AS `display`"
        );

        let table = Ident::parse("users as u");
        assert_eq!(table.table_sql(IdentQuote::Backtick, "app_"), "`app_users` AS `app_u`");
        assert_eq!(table.reference_name(), Some("u"));
    }

    #[test]
    fn test_ident_requotes_existing_quotes() {
        let ident = Ident::parse(r#""Weird.Name".id"#);
        assert_eq!(ident.parts.len(), 2);
        assert_eq!(ident.column_sql(IdentQuote::Bracket, ""), "[Weird.Name].[id]");

        let ident = Ident::parse("`has``tick`");
        assert_eq!(ident.column_sql(IdentQuote::Backtick, ""), "`has``tick`");
    }

    #[test]
    fn test_ident_alias_inside_quotes_is_part_of_the_name() {
        let ident = Ident::parse("`weird as name`");
        assert_eq!(ident.alias, None);
        assert_eq!(ident.column_sql(IdentQuote::Backtick, ""), "`weird as name`");

        let ident = Ident::parse(r#""odd as col" AS "nice""#);
        assert_eq!(ident.alias.as_deref(), Some("nice"));
        assert_eq!(
            ident.column_sql(IdentQuote::Bracket, ""),
            "[odd as col] AS [nice]"
        );

        let ident = Ident::parse("[t as x].id as y");
        assert_eq!(ident.column_sql(IdentQuote::Double, ""), r#""t as x"."id" AS "y""#);
    }

    #[test]
    fn test_quote_escapes_closing_char() {
        assert_eq!(IdentQuote::Bracket.quote("a]b"), "[a]]b]");
        assert_eq!(IdentQuote::Double.quote("a\"b"), "\"a\"\"b\"");
        assert_eq!(IdentQuote::None.quote("plain"), "plain");
    }
}
