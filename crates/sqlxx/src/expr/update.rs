use super::{BinaryExpr, Expr};

/// UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Update {
    pub table: Expr,
    pub set: Vec<Expr>,
    pub where_expr: Option<Expr>,
}

pub fn update(table: impl Into<Expr>) -> Update {
    Update {
        table: table.into(),
        set: Vec::new(),
        where_expr: None,
    }
}

impl Update {
    /// Replace the SET assignments.
    pub fn set(mut self, pairs: impl IntoIterator<Item = BinaryExpr>) -> Self {
        self.set = pairs.into_iter().map(Expr::Binary).collect();
        self
    }

    /// Append one assignment.
    pub fn push_set(&mut self, pair: BinaryExpr) -> &mut Self {
        self.set.push(Expr::Binary(pair));
        self
    }

    pub fn where_expr(mut self, expr: impl Into<Expr>) -> Self {
        self.where_expr = Some(expr.into());
        self
    }
}

impl From<Update> for Expr {
    fn from(u: Update) -> Self {
        Expr::Update(Box::new(u))
    }
}
