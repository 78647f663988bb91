//! SQL backend descriptions.
//!
//! A [`Dialect`] is immutable, process-wide data describing how a backend
//! spells identifiers, placeholders, keywords and literals:
//!
//! - identifiers are wrapped in the dialect's quote pair (`` `x` `` for MySQL,
//!   `[x]` for SQL Server); an embedded closing quote is doubled
//! - named parameters use the dialect's prefix (`:name` / `@name`)
//! - positional parameters use the dialect's placeholder (`?`)
//! - keywords pass through an optional translation table
//! - string literals are escaped per [`StringEscape`]
//!
//! # Example
//! ```ignore
//! use sqlxx::dialect::{MYSQL, SQL_SERVER};
//!
//! assert_eq!(MYSQL.quote("user"), "`user`");
//! assert_eq!(SQL_SERVER.quote("user"), "[user]");
//! assert_eq!(SQL_SERVER.keyword("TRUE"), "1");
//! ```

use crate::error::{SqlxError, SqlxResult};
use crate::naming;
use crate::value;
use chrono::NaiveDateTime;
use std::fmt::Display;

/// How a dialect spells LIMIT/OFFSET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    OffsetFetch,
}

/// How a dialect escapes characters inside a single-quoted string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEscape {
    /// MySQL-style backslash escapes (`\'`, `\\`, `\n`, ...).
    Backslash,
    /// Standard SQL: a quote is doubled (`''`), nothing else is special.
    DoubledQuote,
}

/// Static description of a SQL backend.
#[derive(Debug, PartialEq, Eq)]
pub struct Dialect {
    /// Driver name (`mysql`, `mssql`).
    pub name: &'static str,
    /// Whether `:name`-style parameters may be emitted at all.
    pub supports_named_params: bool,
    /// Prefix of named parameters.
    pub named_prefix: char,
    /// Positional parameter placeholder.
    pub placeholder: &'static str,
    /// Opening identifier quote.
    pub open_quote: char,
    /// Closing identifier quote.
    pub close_quote: char,
    /// `chrono` format string for timestamp literals, quotes included.
    pub date_format: &'static str,
    /// Keyword translation table (`from`, `to`).
    pub keywords: &'static [(&'static str, &'static str)],
    /// Escaping rule for string literals.
    pub string_escape: StringEscape,
    /// LIMIT/OFFSET spelling.
    pub pagination: Pagination,
}

/// MySQL: backtick quoting, `:name` parameters.
pub static MYSQL: Dialect = Dialect {
    name: "mysql",
    supports_named_params: true,
    named_prefix: ':',
    placeholder: "?",
    open_quote: '`',
    close_quote: '`',
    date_format: "'%Y-%m-%d %H:%M:%S'",
    keywords: &[],
    string_escape: StringEscape::Backslash,
    pagination: Pagination::LimitOffset,
};

/// SQL Server: bracket quoting, `@name` parameters, no boolean literals.
pub static SQL_SERVER: Dialect = Dialect {
    name: "mssql",
    supports_named_params: true,
    named_prefix: '@',
    placeholder: "?",
    open_quote: '[',
    close_quote: ']',
    date_format: "'%Y-%m-%d %H:%M:%S'",
    keywords: &[("TRUE", "1"), ("FALSE", "0")],
    string_escape: StringEscape::DoubledQuote,
    pagination: Pagination::OffsetFetch,
};

/// The dialect used when none is configured.
pub static DEFAULT: &Dialect = &MYSQL;

impl Dialect {
    /// Look up a dialect by driver name (case-insensitive).
    pub fn by_name(name: &str) -> SqlxResult<&'static Dialect> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(&MYSQL),
            "mssql" | "sqlserver" | "sql_server" => Ok(&SQL_SERVER),
            _ => Err(SqlxError::UnknownDialect(name.to_string())),
        }
    }

    /// Quote an identifier (or anything displayable) for this dialect.
    pub fn quote(&self, name: impl Display) -> String {
        let name = name.to_string();
        let mut out = String::with_capacity(name.len() + 2);
        self.write_quoted(&mut out, &name);
        out
    }

    pub(crate) fn write_quoted(&self, out: &mut String, name: &str) {
        out.push(self.open_quote);
        for ch in name.chars() {
            if ch == self.close_quote {
                out.push(ch);
            }
            out.push(ch);
        }
        out.push(self.close_quote);
    }

    /// Quote and escape a string literal for this dialect.
    pub fn string_literal(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        self.write_string(&mut out, s);
        out
    }

    pub(crate) fn write_string(&self, out: &mut String, s: &str) {
        out.push('\'');
        match self.string_escape {
            StringEscape::Backslash => value::escape_into(out, s),
            StringEscape::DoubledQuote => {
                for ch in s.chars() {
                    if ch == '\'' {
                        out.push(ch);
                    }
                    out.push(ch);
                }
            }
        }
        out.push('\'');
    }

    /// Translate a keyword; words without a translation are returned as-is.
    pub fn keyword<'a>(&self, word: &'a str) -> &'a str {
        self.keywords
            .iter()
            .find(|(from, _)| *from == word)
            .map(|(_, to)| *to)
            .unwrap_or(word)
    }

    /// A translated keyword surrounded by single spaces.
    pub fn keyword_with_space(&self, word: &str) -> String {
        format!(" {} ", self.keyword(word))
    }

    /// The column name derived from a field name.
    pub fn column_name(&self, field: &str) -> String {
        naming::to_snake(field)
    }

    /// Format a timestamp literal.
    pub fn format_timestamp(&self, ts: &NaiveDateTime) -> String {
        ts.format(self.date_format).to_string()
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn quotes_per_dialect() {
        assert_eq!(MYSQL.quote("id"), "`id`");
        assert_eq!(SQL_SERVER.quote("id"), "[id]");
        assert_eq!(MYSQL.quote(42), "`42`");
    }

    #[test]
    fn doubles_embedded_close_quote() {
        assert_eq!(MYSQL.quote("we`ird"), "`we``ird`");
        assert_eq!(SQL_SERVER.quote("a]b"), "[a]]b]");
    }

    #[test]
    fn translates_keywords() {
        assert_eq!(MYSQL.keyword("TRUE"), "TRUE");
        assert_eq!(SQL_SERVER.keyword("TRUE"), "1");
        assert_eq!(SQL_SERVER.keyword("FALSE"), "0");
        assert_eq!(SQL_SERVER.keyword("SELECT"), "SELECT");
        assert_eq!(MYSQL.keyword_with_space("AND"), " AND ");
    }

    #[test]
    fn looks_up_by_name() {
        assert_eq!(Dialect::by_name("mysql").unwrap().name, "mysql");
        assert_eq!(Dialect::by_name("MSSQL").unwrap().name, "mssql");
        assert_eq!(Dialect::by_name("sqlserver").unwrap().name, "mssql");
        assert!(matches!(
            Dialect::by_name("oracle"),
            Err(SqlxError::UnknownDialect(_))
        ));
    }

    #[test]
    fn formats_timestamps() {
        let ts = NaiveDate::from_ymd_opt(2023, 7, 12)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(MYSQL.format_timestamp(&ts), "'2023-07-12 08:30:00'");
    }

    #[test]
    fn escapes_string_literals_per_dialect() {
        assert_eq!(MYSQL.string_literal("it's"), "'it\\'s'");
        assert_eq!(MYSQL.string_literal("a\\b"), "'a\\\\b'");
        assert_eq!(SQL_SERVER.string_literal("it's"), "'it''s'");
        assert_eq!(SQL_SERVER.string_literal("a\\b"), "'a\\b'");
        assert_eq!(
            SQL_SERVER.string_literal("x' OR 1=1 --"),
            "'x'' OR 1=1 --'"
        );
    }

    #[test]
    fn derives_column_names() {
        assert_eq!(MYSQL.column_name("TenantID"), "tenant_id");
    }
}
