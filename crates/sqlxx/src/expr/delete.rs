use super::Expr;

/// DELETE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Delete {
    pub table: Expr,
    pub where_expr: Option<Expr>,
}

pub fn delete_from(table: impl Into<Expr>) -> Delete {
    Delete {
        table: table.into(),
        where_expr: None,
    }
}

impl Delete {
    pub fn where_expr(mut self, expr: impl Into<Expr>) -> Self {
        self.where_expr = Some(expr.into());
        self
    }
}

impl From<Delete> for Expr {
    fn from(d: Delete) -> Self {
        Expr::Delete(Box::new(d))
    }
}
