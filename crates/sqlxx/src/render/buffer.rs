use super::{Args, ParamStyle, Rendered};
use crate::dialect::{Dialect, Pagination};
use crate::error::{SqlxError, SqlxResult};
use crate::expr::{BinaryExpr, BinaryOp, Delete, Expr, Insert, ListExpr, ListSep, Select, Update};
use crate::value::Value;

/// Append-only SQL writer for a single render call.
///
/// Owns the text and exactly one argument collection, chosen by the
/// parameter style. Not meant to be reused after [`Buffer::finish`].
#[derive(Debug)]
pub struct Buffer<'d> {
    dialect: &'d Dialect,
    style: ParamStyle,
    sql: String,
    args: Args,
}

impl<'d> Buffer<'d> {
    pub fn new(dialect: &'d Dialect, style: ParamStyle) -> SqlxResult<Self> {
        if style == ParamStyle::Named && !dialect.supports_named_params {
            return Err(SqlxError::UnsupportedStyle {
                dialect: dialect.name,
            });
        }
        Ok(Self {
            dialect,
            style,
            sql: String::with_capacity(128),
            args: Args::new(style),
        })
    }

    pub fn dialect(&self) -> &'d Dialect {
        self.dialect
    }

    pub fn style(&self) -> ParamStyle {
        self.style
    }

    /// SQL written so far.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn finish(self) -> Rendered {
        Rendered {
            sql: self.sql,
            args: self.args,
        }
    }

    pub fn push_str(&mut self, s: &str) -> &mut Self {
        self.sql.push_str(s);
        self
    }

    /// Append a keyword, translated by the dialect.
    pub fn push_keyword(&mut self, word: &str) -> &mut Self {
        self.sql.push_str(self.dialect.keyword(word));
        self
    }

    /// Append ` KEYWORD `.
    pub fn push_keyword_with_space(&mut self, word: &str) -> &mut Self {
        self.sql.push(' ');
        self.push_keyword(word);
        self.sql.push(' ');
        self
    }

    pub fn push_quoted(&mut self, name: &str) -> &mut Self {
        self.dialect.write_quoted(&mut self.sql, name);
        self
    }

    /// Append a placeholder for `value` and record the argument.
    pub fn push_bound(&mut self, name: Option<&str>, value: &Value) -> SqlxResult<()> {
        match &mut self.args {
            Args::Positional(args) => {
                args.push(value.clone());
                self.sql.push_str(self.dialect.placeholder);
            }
            Args::Named(args) => {
                let name = name.ok_or(SqlxError::UnnamedParameter)?;
                match args.get(name) {
                    Some(existing) if existing != value => {
                        return Err(SqlxError::ConflictingParameter {
                            name: name.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        args.insert(name.to_string(), value.clone());
                    }
                }
                self.sql.push(self.dialect.named_prefix);
                self.sql.push_str(name);
            }
        }
        Ok(())
    }

    pub fn write_expr(&mut self, expr: &Expr) -> SqlxResult<()> {
        match expr {
            Expr::Identifier { qualifiers, name } => {
                for qualifier in qualifiers.iter().filter(|q| !q.is_empty()) {
                    self.push_quoted(qualifier).push_str(".");
                }
                self.push_quoted(name);
            }
            Expr::Constant(value) => value.write_literal(&mut self.sql, self.dialect),
            Expr::Raw(value) => value.write_raw(&mut self.sql, self.dialect),
            Expr::Bound { name, value } => self.push_bound(name.as_deref(), value)?,
            Expr::Binary(binary) => self.write_binary(binary)?,
            Expr::Unary { op, operand } => {
                if operand.is_empty_condition() {
                    return Err(SqlxError::invalid_query(format!(
                        "{} over an empty condition",
                        op.as_str()
                    )));
                }
                self.push_keyword(op.as_str()).push_str(" ");
                if needs_group(operand) {
                    self.push_str("( ");
                    self.write_expr(operand)?;
                    self.push_str(" )");
                } else {
                    self.write_expr(operand)?;
                }
            }
            Expr::List(list) => self.write_list(list)?,
            Expr::Function { name, args } => {
                self.push_keyword(name).push_str("(");
                self.write_joined(args, ",")?;
                self.push_str(")");
            }
            Expr::Between {
                operand,
                start,
                end,
            } => {
                self.write_expr(operand)?;
                self.push_keyword_with_space("BETWEEN");
                self.write_expr(start)?;
                self.push_keyword_with_space("AND");
                self.write_expr(end)?;
            }
            Expr::Alias { expr, alias } => {
                self.write_expr(expr)?;
                self.push_keyword_with_space("AS").push_quoted(alias);
            }
            Expr::Paren(inner) => {
                self.push_str("( ");
                self.write_expr(inner)?;
                self.push_str(" )");
            }
            Expr::Select(select) => self.write_select(select)?,
            Expr::Insert(insert) => self.write_insert(insert)?,
            Expr::Update(update) => self.write_update(update)?,
            Expr::Delete(delete) => self.write_delete(delete)?,
        }
        Ok(())
    }

    fn write_joined(&mut self, items: &[Expr], sep: &str) -> SqlxResult<()> {
        for (idx, item) in items.iter().enumerate() {
            if idx > 0 {
                self.push_str(sep);
            }
            self.write_expr(item)?;
        }
        Ok(())
    }

    fn write_binary(&mut self, binary: &BinaryExpr) -> SqlxResult<()> {
        // An empty set matches nothing.
        if matches!(binary.op, BinaryOp::In | BinaryOp::NotIn) && is_empty_set(&binary.right) {
            let always = if binary.op == BinaryOp::In { "1=0" } else { "1=1" };
            self.push_str(always);
            return Ok(());
        }
        self.write_expr(&binary.left)?;
        if binary.op.is_keyword() {
            self.push_keyword_with_space(binary.op.as_str());
        } else {
            self.push_str(binary.op.as_str());
        }
        self.write_expr(&binary.right)
    }

    fn write_list(&mut self, list: &ListExpr) -> SqlxResult<()> {
        if let Some(prefix) = &list.prefix {
            self.write_expr(prefix)?;
            self.push_str(" ");
        }
        for (idx, item) in list.rendered_items().enumerate() {
            if idx > 0 {
                match list.sep {
                    ListSep::And => self.push_keyword_with_space("AND"),
                    ListSep::Or => self.push_keyword_with_space("OR"),
                    ListSep::Comma => self.push_str(","),
                    ListSep::Space => self.push_str(" "),
                };
            }
            // AND inside OR (and vice versa) keeps its grouping.
            match item {
                Expr::List(inner)
                    if list.sep.is_logical()
                        && inner.sep.is_logical()
                        && inner.sep != list.sep
                        && inner.rendered_items().nth(1).is_some() =>
                {
                    self.push_str("( ");
                    self.write_list(inner)?;
                    self.push_str(" )");
                }
                _ => self.write_expr(item)?,
            }
        }
        if let Some(suffix) = &list.suffix {
            self.push_str(" ");
            self.write_expr(suffix)?;
        }
        Ok(())
    }

    /// Writes ` KEYWORD expr`; an empty condition writes nothing.
    fn write_clause(&mut self, keyword: &str, expr: Option<&Expr>) -> SqlxResult<()> {
        if let Some(expr) = expr.filter(|e| !e.is_empty_condition()) {
            self.push_keyword_with_space(keyword);
            self.write_expr(expr)?;
        }
        Ok(())
    }

    /// WHERE of an UPDATE or DELETE; an empty condition is `InvalidQuery`.
    fn write_guarded_where(&mut self, verb: &str, expr: Option<&Expr>) -> SqlxResult<()> {
        if expr.is_some_and(Expr::is_empty_condition) {
            return Err(SqlxError::invalid_query(format!(
                "{verb} has an empty WHERE condition"
            )));
        }
        self.write_clause("WHERE", expr)
    }

    fn write_select(&mut self, select: &Select) -> SqlxResult<()> {
        let from = select
            .from
            .as_ref()
            .ok_or_else(|| SqlxError::invalid_query("SELECT requires a FROM target"))?;

        self.push_keyword("SELECT").push_str(" ");
        if select.columns.is_empty() {
            self.push_str("*");
        } else {
            self.write_joined(&select.columns, ",")?;
        }
        self.push_keyword_with_space("FROM");
        self.write_expr(from)?;
        self.write_clause("WHERE", select.where_expr.as_ref())?;
        if let Some(group_by) = &select.group_by {
            self.push_keyword_with_space("GROUP BY");
            self.write_expr(group_by)?;
        }
        self.write_clause("HAVING", select.having.as_ref())?;
        if !select.order_by.is_empty() {
            self.push_keyword_with_space("ORDER BY");
            self.write_joined(&select.order_by, ",")?;
        }
        self.write_pagination(select.limit, select.offset)
    }

    fn write_pagination(&mut self, limit: Option<u64>, offset: Option<u64>) -> SqlxResult<()> {
        match self.dialect.pagination {
            Pagination::LimitOffset => {
                if let Some(limit) = limit {
                    self.push_keyword_with_space("LIMIT");
                    self.push_bound(Some("limit"), &Value::UInt(limit))?;
                }
                if let Some(offset) = offset {
                    self.push_keyword_with_space("OFFSET");
                    self.push_bound(Some("offset"), &Value::UInt(offset))?;
                }
            }
            Pagination::OffsetFetch => {
                if limit.is_none() && offset.is_none() {
                    return Ok(());
                }
                self.push_keyword_with_space("OFFSET");
                self.push_bound(Some("offset"), &Value::UInt(offset.unwrap_or(0)))?;
                self.push_str(" ").push_keyword("ROWS");
                if let Some(limit) = limit {
                    self.push_keyword_with_space("FETCH NEXT");
                    self.push_bound(Some("limit"), &Value::UInt(limit))?;
                    self.push_str(" ").push_keyword("ROWS ONLY");
                }
            }
        }
        Ok(())
    }

    fn write_insert(&mut self, insert: &Insert) -> SqlxResult<()> {
        if insert.columns.is_empty() {
            return Err(SqlxError::invalid_query("INSERT requires at least one value"));
        }
        if insert.columns.len() != insert.values.len() {
            return Err(SqlxError::invalid_query(format!(
                "INSERT has {} columns but {} values",
                insert.columns.len(),
                insert.values.len()
            )));
        }
        self.push_keyword("INSERT INTO").push_str(" ");
        self.write_expr(&insert.table)?;
        self.push_str(" ( ");
        self.write_joined(&insert.columns, ",")?;
        self.push_str(" )");
        self.push_keyword_with_space("VALUES");
        self.push_str("( ");
        self.write_joined(&insert.values, ",")?;
        self.push_str(" )");
        Ok(())
    }

    fn write_update(&mut self, update: &Update) -> SqlxResult<()> {
        if update.set.is_empty() {
            return Err(SqlxError::invalid_query("UPDATE requires at least one SET"));
        }
        self.push_keyword("UPDATE").push_str(" ");
        self.write_expr(&update.table)?;
        self.push_keyword_with_space("SET");
        self.write_joined(&update.set, ", ")?;
        self.write_guarded_where("UPDATE", update.where_expr.as_ref())
    }

    fn write_delete(&mut self, delete: &Delete) -> SqlxResult<()> {
        self.push_keyword("DELETE FROM").push_str(" ");
        self.write_expr(&delete.table)?;
        self.write_guarded_where("DELETE", delete.where_expr.as_ref())
    }
}

/// Operands of NOT / EXISTS that must be parenthesized.
fn needs_group(operand: &Expr) -> bool {
    match operand {
        Expr::List(list) => list.sep.is_logical() && list.rendered_items().nth(1).is_some(),
        other => other.is_statement(),
    }
}

fn is_empty_set(expr: &Expr) -> bool {
    match expr {
        Expr::Paren(inner) => is_empty_set(inner),
        Expr::List(list) => {
            list.sep == ListSep::Comma
                && list.items.is_empty()
                && list.prefix.is_none()
                && list.suffix.is_none()
        }
        _ => false,
    }
}
