//! Helpers for hand-written SQL templates.
//!
//! Each helper produces a SQL fragment for a dialect. The template engine
//! itself is left to the application; these functions are what it calls.
//!
//! ```ignore
//! use sqlxx::{dialect::MYSQL, template};
//!
//! let cond = serde_json::json!({"name": "gn%", "age": 18});
//! assert_eq!(
//!     template::where_clause(&MYSQL, &cond)?,
//!     " WHERE `age`=18 AND `name` LIKE 'gn%' "
//! );
//! ```

use crate::dialect::Dialect;
use crate::error::{SqlxError, SqlxResult};
use crate::expr::filter::is_fuzzy;
use crate::expr::simple::example_map;
use crate::meta::Column;
use crate::naming;
use crate::value::Value;
use serde::Serialize;

/// ` WHERE col=value AND ... ` with inlined literals.
///
/// Accepts a map or record; NULL fields are skipped and keys are visited in
/// sorted order. Strings containing `% ? .` are compared with `LIKE`.
pub fn where_clause<E: Serialize + ?Sized>(dialect: &Dialect, example: &E) -> SqlxResult<String> {
    where_with(dialect, example, "AND", false)
}

/// Like [`where_clause`], but each value is a named placeholder (`:col`).
pub fn named_where<E: Serialize + ?Sized>(dialect: &Dialect, example: &E) -> SqlxResult<String> {
    where_with(dialect, example, "AND", true)
}

/// Like [`where_clause`], joining conditions with OR.
pub fn where_or<E: Serialize + ?Sized>(dialect: &Dialect, example: &E) -> SqlxResult<String> {
    where_with(dialect, example, "OR", false)
}

fn where_with<E: Serialize + ?Sized>(
    dialect: &Dialect,
    example: &E,
    joiner: &str,
    named: bool,
) -> SqlxResult<String> {
    let fields = example_map(example)?;
    if fields.is_empty() {
        return Ok(String::new());
    }
    let mut sql = String::new();
    let mut sep = dialect.keyword_with_space("WHERE");
    for (column, value) in &fields {
        sql.push_str(&sep);
        dialect.write_quoted(&mut sql, column);
        if is_fuzzy(value) {
            sql.push_str(&dialect.keyword_with_space("LIKE"));
        } else {
            sql.push('=');
        }
        if named {
            sql.push(dialect.named_prefix);
            sql.push_str(column);
        } else {
            value.write_literal(&mut sql, dialect);
        }
        sep = dialect.keyword_with_space(joiner);
    }
    sql.push(' ');
    Ok(sql)
}

/// Quoted, comma-joined columns, without ignored and primary-key columns.
pub fn columns(dialect: &Dialect, cols: &[Column]) -> String {
    join(cols.iter().filter(|c| c.is_value_column()), ",", |c| {
        dialect.quote(&c.column_name)
    })
}

/// Quoted, comma-joined columns, primary key included.
pub fn all_columns(dialect: &Dialect, cols: &[Column]) -> String {
    join(cols.iter().filter(|c| !c.ignored), ",", |c| {
        dialect.quote(&c.column_name)
    })
}

/// Named placeholders (`:col,:col`) for [`columns`].
pub fn args(dialect: &Dialect, cols: &[Column]) -> String {
    join(cols.iter().filter(|c| c.is_value_column()), ",", |c| {
        format!("{}{}", dialect.named_prefix, c.column_name)
    })
}

/// Assignments (`` `col`=:col ``) for [`columns`].
pub fn set_args(dialect: &Dialect, cols: &[Column]) -> String {
    join(cols.iter().filter(|c| c.is_value_column()), ",", |c| {
        format!(
            "{}={}{}",
            dialect.quote(&c.column_name),
            dialect.named_prefix,
            c.column_name
        )
    })
}

/// ` ORDER BY col dir,col dir ` from (column, direction) pairs.
///
/// Directions must be `asc` or `desc` (any case). Empty input renders
/// nothing.
pub fn order_by<K, D>(dialect: &Dialect, order: impl IntoIterator<Item = (K, D)>) -> SqlxResult<String>
where
    K: AsRef<str>,
    D: AsRef<str>,
{
    let mut sql = String::new();
    let mut sep = dialect.keyword_with_space("ORDER BY");
    for (column, direction) in order {
        let direction = match direction.as_ref().trim().to_ascii_uppercase().as_str() {
            "ASC" => "ASC",
            "DESC" => "DESC",
            other => {
                return Err(SqlxError::validation(format!(
                    "invalid sort direction '{other}'"
                )));
            }
        };
        sql.push_str(&sep);
        dialect.write_quoted(&mut sql, &naming::to_snake(column.as_ref()));
        sql.push(' ');
        sql.push_str(dialect.keyword(direction));
        sep = ",".to_string();
    }
    if !sql.is_empty() {
        sql.push(' ');
    }
    Ok(sql)
}

/// Comma-joined literals.
pub fn list(dialect: &Dialect, values: &[Value]) -> String {
    join(values.iter(), ",", |v| v.to_literal(dialect))
}

/// One literal.
pub fn v(dialect: &Dialect, value: impl Into<Value>) -> String {
    value.into().to_literal(dialect)
}

/// One quoted identifier.
pub fn n(dialect: &Dialect, name: &str) -> String {
    dialect.quote(name)
}

fn join<T>(items: impl Iterator<Item = T>, sep: &str, f: impl Fn(T) -> String) -> String {
    items.map(f).collect::<Vec<_>>().join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MYSQL, SQL_SERVER};
    use crate::meta::Markers;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn cols() -> Vec<Column> {
        vec![
            Column::new("id"),
            Column::new("name"),
            Column::new("age"),
            Column::from_field("cache", Markers::parse("_").unwrap()),
        ]
    }

    #[test]
    fn where_from_map() {
        let cond = json!({"name": "gn%", "age": 18, "gone": null});
        assert_eq!(
            where_clause(&MYSQL, &cond).unwrap(),
            " WHERE `age`=18 AND `name` LIKE 'gn%' "
        );
        assert_eq!(
            named_where(&MYSQL, &cond).unwrap(),
            " WHERE `age`=:age AND `name` LIKE :name "
        );
        assert_eq!(
            where_or(&MYSQL, &cond).unwrap(),
            " WHERE `age`=18 OR `name` LIKE 'gn%' "
        );
    }

    #[test]
    fn where_from_record() {
        #[derive(Serialize)]
        struct Q {
            #[serde(rename = "UserName")]
            user_name: &'static str,
            active: bool,
        }
        assert_eq!(
            where_clause(&SQL_SERVER, &Q { user_name: "o'k", active: true }).unwrap(),
            " WHERE [active]=1 AND [user_name]='o''k' "
        );
    }

    #[test]
    fn inlined_strings_cannot_close_the_literal() {
        let cond = json!({"name": "x' OR 1=1 --"});
        assert_eq!(
            where_clause(&SQL_SERVER, &cond).unwrap(),
            " WHERE [name]='x'' OR 1=1 --' "
        );
        assert_eq!(
            where_clause(&MYSQL, &cond).unwrap(),
            " WHERE `name`='x\\' OR 1=1 --' "
        );
    }

    #[test]
    fn empty_where_renders_nothing() {
        assert_eq!(where_clause(&MYSQL, &json!({})).unwrap(), "");
        assert_eq!(where_clause(&MYSQL, &BTreeMap::<String, i32>::new()).unwrap(), "");
    }

    #[test]
    fn column_lists() {
        let cols = cols();
        assert_eq!(columns(&MYSQL, &cols), "`name`,`age`");
        assert_eq!(all_columns(&MYSQL, &cols), "`id`,`name`,`age`");
        assert_eq!(args(&MYSQL, &cols), ":name,:age");
        assert_eq!(set_args(&MYSQL, &cols), "`name`=:name,`age`=:age");
        assert_eq!(args(&SQL_SERVER, &cols), "@name,@age");
    }

    #[test]
    fn order_by_validates_direction() {
        assert_eq!(
            order_by(&MYSQL, [("CreatedAt", "desc"), ("id", "ASC")]).unwrap(),
            " ORDER BY `created_at` DESC,`id` ASC "
        );
        assert_eq!(order_by(&MYSQL, Vec::<(&str, &str)>::new()).unwrap(), "");
        assert!(order_by(&MYSQL, [("id", "asc; drop table x")]).is_err());
    }

    #[test]
    fn literals_and_names() {
        assert_eq!(
            list(&MYSQL, &[Value::from(1), Value::from("a"), Value::Null]),
            "1,'a',NULL"
        );
        assert_eq!(v(&MYSQL, "it's"), "'it\\'s'");
        assert_eq!(v(&SQL_SERVER, false), "0");
        assert_eq!(n(&SQL_SERVER, "order"), "[order]");
    }
}
