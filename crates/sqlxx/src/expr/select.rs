use super::{Direction, Expr, count, sorts};

/// SELECT statement.
///
/// An empty column list renders as `*`. `limit` and `offset` are rendered as
/// bound values named `limit` and `offset`.
#[derive(Debug, Clone, PartialEq, Default)]
#[must_use]
pub struct Select {
    pub columns: Vec<Expr>,
    pub from: Option<Expr>,
    pub where_expr: Option<Expr>,
    pub group_by: Option<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<Expr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub with_count: bool,
}

/// Start a SELECT over the given columns.
pub fn select(columns: impl IntoIterator<Item = Expr>) -> Select {
    Select {
        columns: columns.into_iter().collect(),
        ..Select::default()
    }
}

impl Select {
    /// Replace the projected columns.
    pub fn columns(mut self, columns: impl IntoIterator<Item = Expr>) -> Self {
        self.columns = columns.into_iter().collect();
        self
    }

    pub fn from(mut self, from: impl Into<Expr>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn where_expr(mut self, expr: impl Into<Expr>) -> Self {
        self.where_expr = Some(expr.into());
        self
    }

    pub fn group_by(mut self, expr: impl Into<Expr>) -> Self {
        self.group_by = Some(expr.into());
        self
    }

    pub fn having(mut self, expr: impl Into<Expr>) -> Self {
        self.having = Some(expr.into());
        self
    }

    /// ORDER BY the given items, comma separated. Use [`super::asc`] /
    /// [`super::desc`] to attach a direction.
    pub fn order_by(mut self, items: impl IntoIterator<Item = Expr>) -> Self {
        self.order_by = items.into_iter().collect();
        self
    }

    /// ORDER BY several columns in one direction.
    pub fn sort(mut self, direction: Direction, columns: impl IntoIterator<Item = Expr>) -> Self {
        self.order_by = vec![sorts(direction, columns)];
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Mark this query as needing a companion count query.
    pub fn with_count(mut self) -> Self {
        self.with_count = true;
        self
    }

    pub fn without_count(mut self) -> Self {
        self.with_count = false;
        self
    }

    /// Whether a companion count query was requested.
    pub fn use_count(&self) -> bool {
        self.with_count
    }

    /// The row-count variant: same FROM/WHERE/GROUP BY/HAVING, `COUNT(1)`
    /// projection, no ORDER BY or pagination.
    pub fn build_count(&self) -> Select {
        Select {
            columns: vec![count()],
            from: self.from.clone(),
            where_expr: self.where_expr.clone(),
            group_by: self.group_by.clone(),
            having: self.having.clone(),
            ..Select::default()
        }
    }
}

impl From<Select> for Expr {
    fn from(s: Select) -> Self {
        Expr::Select(Box::new(s))
    }
}
