use super::{BinaryExpr, Expr};

/// INSERT statement with parallel column and value lists.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Insert {
    pub table: Expr,
    pub columns: Vec<Expr>,
    pub values: Vec<Expr>,
}

/// `INSERT INTO table ( cols ) VALUES ( vals )` from `column = value` pairs.
///
/// The left side of each pair becomes a column, the right side its value.
pub fn insert_into(table: impl Into<Expr>, pairs: impl IntoIterator<Item = BinaryExpr>) -> Insert {
    Insert::new(table).values(pairs)
}

impl Insert {
    pub fn new(table: impl Into<Expr>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Replace the column/value pairs.
    pub fn values(mut self, pairs: impl IntoIterator<Item = BinaryExpr>) -> Self {
        let (columns, values) = pairs
            .into_iter()
            .map(|pair| (*pair.left, *pair.right))
            .unzip();
        self.columns = columns;
        self.values = values;
        self
    }

    /// Append one column with its value.
    pub fn push(&mut self, column: impl Into<Expr>, value: impl Into<Expr>) -> &mut Self {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }
}

impl From<Insert> for Expr {
    fn from(i: Insert) -> Self {
        Expr::Insert(Box::new(i))
    }
}
