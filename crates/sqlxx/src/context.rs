//! The handle that ties a dialect, a parameter style and SQL logging together.
//!
//! There is no process-wide default: build a [`Context`] and pass it to
//! whatever renders statements.
//!
//! ```ignore
//! use sqlxx::{Context, ContextConfig, dialect::MYSQL, render::ParamStyle};
//!
//! let ctx = Context::new(&MYSQL).with_style(ParamStyle::Named);
//!
//! // or from configuration
//! let config: ContextConfig = toml::from_str(r#"driver = "mssql""#)?;
//! let ctx = Context::from_config(&config)?;
//! ```

use crate::dialect::{self, Dialect};
use crate::error::SqlxResult;
use crate::expr::{Expr, Filters};
use crate::mapper::Mapper;
use crate::meta::Record;
use crate::render::{ParamStyle, Rendered, render};
use serde::{Deserialize, Serialize};

/// Default number of SQL characters written to the log.
pub const DEFAULT_MAX_SQL_LOG_LEN: usize = 200;

/// Serializable form of a [`Context`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Label used in log events.
    pub name: String,
    /// Driver name resolved with [`Dialect::by_name`].
    pub driver: String,
    /// Render with named parameters instead of positional ones.
    pub named: bool,
    /// Truncate logged SQL to this many characters. `None` logs it whole.
    pub max_sql_log_len: Option<usize>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            driver: dialect::DEFAULT.name.to_string(),
            named: false,
            max_sql_log_len: Some(DEFAULT_MAX_SQL_LOG_LEN),
        }
    }
}

/// Rendering context.
#[derive(Debug, Clone)]
pub struct Context {
    name: String,
    dialect: &'static Dialect,
    style: ParamStyle,
    max_sql_log_len: Option<usize>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(dialect::DEFAULT)
    }
}

impl Context {
    /// A positional-style context for `dialect`.
    pub fn new(dialect: &'static Dialect) -> Self {
        Self {
            name: "default".to_string(),
            dialect,
            style: ParamStyle::Positional,
            max_sql_log_len: Some(DEFAULT_MAX_SQL_LOG_LEN),
        }
    }

    pub fn from_config(config: &ContextConfig) -> SqlxResult<Self> {
        let dialect = Dialect::by_name(&config.driver)?;
        let style = if config.named {
            ParamStyle::Named
        } else {
            ParamStyle::Positional
        };
        Ok(Self {
            name: config.name.clone(),
            dialect,
            style,
            max_sql_log_len: config.max_sql_log_len,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_style(mut self, style: ParamStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the maximum logged SQL length (in chars).
    pub fn with_max_sql_log_len(mut self, len: usize) -> Self {
        self.max_sql_log_len = Some(len);
        self
    }

    /// Log SQL without truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_log_len = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    pub fn style(&self) -> ParamStyle {
        self.style
    }

    pub fn config(&self) -> ContextConfig {
        ContextConfig {
            name: self.name.clone(),
            driver: self.dialect.name.to_string(),
            named: self.style == ParamStyle::Named,
            max_sql_log_len: self.max_sql_log_len,
        }
    }

    /// Render with this context's dialect and style.
    pub fn render(&self, expr: &Expr) -> SqlxResult<Rendered> {
        self.render_as(expr, self.style)
    }

    /// Render with an explicit parameter style.
    pub fn render_as(&self, expr: &Expr, style: ParamStyle) -> SqlxResult<Rendered> {
        let rendered = render(expr, self.dialect, style)?;
        self.log(&rendered);
        Ok(rendered)
    }

    /// Apply `filters` to a clone of `expr`, then render it.
    pub fn render_filtered(&self, expr: &Expr, filters: &Filters) -> SqlxResult<Rendered> {
        self.render(&filters.apply(expr))
    }

    /// A statement builder for `T` bound to this context.
    pub fn mapper<T: Record>(&self) -> Mapper<'_, T> {
        Mapper::new(self)
    }

    fn log(&self, rendered: &Rendered) {
        tracing::debug!(
            target: "sqlxx.sql",
            context = %self.name,
            dialect = %self.dialect,
            style = %rendered.style(),
            arg_count = rendered.args.len(),
            sql = %self.truncate_sql(&rendered.sql),
        );
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_log_len {
            Some(max) if sql.chars().count() > max => {
                let cut: String = sql.chars().take(max).collect();
                format!("{cut}...")
            }
            _ => sql.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SQL_SERVER;
    use crate::error::SqlxError;
    use crate::expr::{all, name, select, use_limit, var};

    #[test]
    fn builder_defaults() {
        let ctx = Context::default();
        assert_eq!(ctx.dialect().name, "mysql");
        assert_eq!(ctx.style(), ParamStyle::Positional);
        assert_eq!(ctx.config(), ContextConfig::default());
    }

    #[test]
    fn from_config_resolves_driver() {
        let config = ContextConfig {
            driver: "sqlserver".into(),
            named: true,
            ..ContextConfig::default()
        };
        let ctx = Context::from_config(&config).unwrap();
        assert_eq!(ctx.dialect(), &SQL_SERVER);
        assert_eq!(ctx.style(), ParamStyle::Named);

        let bad = ContextConfig {
            driver: "oracle".into(),
            ..ContextConfig::default()
        };
        assert!(matches!(
            Context::from_config(&bad),
            Err(SqlxError::UnknownDialect(d)) if d == "oracle"
        ));
    }

    #[test]
    fn config_from_json_fills_defaults() {
        let config: ContextConfig = serde_json::from_str(r#"{"driver":"mssql"}"#).unwrap();
        assert_eq!(config.name, "default");
        assert_eq!(config.max_sql_log_len, Some(DEFAULT_MAX_SQL_LOG_LEN));
        assert!(!config.named);
    }

    #[test]
    fn renders_with_filters() {
        let ctx = Context::new(&SQL_SERVER).with_style(ParamStyle::Named);
        let stmt: Expr = select([all()])
            .from(name("user"))
            .where_expr(name("id").eq(var("id", 1)))
            .into();
        let filters = Filters::new().select(use_limit(5));
        let out = ctx.render_filtered(&stmt, &filters).unwrap();
        assert_eq!(
            out.sql,
            "SELECT * FROM [user] WHERE [id]=@id OFFSET @offset ROWS FETCH NEXT @limit ROWS ONLY"
        );
        assert_eq!(out.args.len(), 3);
    }

    #[test]
    fn truncates_logged_sql_on_char_boundary() {
        let ctx = Context::default().with_max_sql_log_len(3);
        assert_eq!(ctx.truncate_sql("SELECT"), "SEL...");
        assert_eq!(ctx.truncate_sql("中文字符"), "中文字...");
        assert_eq!(ctx.clone().no_truncate().truncate_sql("SELECT"), "SELECT");
    }
}
