use super::*;
use crate::dialect::{Dialect, MYSQL, SQL_SERVER};
use crate::error::SqlxError;
use crate::render::{Args, ParamStyle, render};
use crate::value::Value;
use chrono::NaiveDate;

fn sql(expr: impl Into<Expr>, dialect: &Dialect, style: ParamStyle) -> String {
    render(&expr.into(), dialect, style).unwrap().sql
}

fn positional(expr: impl Into<Expr>) -> String {
    sql(expr, &MYSQL, ParamStyle::Positional)
}

fn named(expr: impl Into<Expr>) -> String {
    sql(expr, &MYSQL, ParamStyle::Named)
}

// ==================== Leaf nodes ====================

#[test]
fn between_raw_bounds() {
    assert_eq!(positional(between(name("id"), raw(1), raw(10))), "`id` BETWEEN 1 AND 10");
}

#[test]
fn in_list_named_and_positional() {
    assert_eq!(
        named(in_list(name("id"), "id", [1, 2, 3])),
        "`id` IN ( :id_0,:id_1,:id_2 )"
    );
    assert_eq!(
        positional(in_list(name("id"), "", [1, 2, 3])),
        "`id` IN ( ?,?,? )"
    );
    assert_eq!(
        positional(not_in(name("id"), "id", [Value::from(1), Value::Null])),
        "`id` NOT IN ( ?,NULL )"
    );
}

#[test]
fn empty_in_lists_are_constant_predicates() {
    assert_eq!(named(in_list(name("id"), "id", Vec::<i64>::new())), "1=0");
    assert_eq!(positional(not_in(name("id"), "id", Vec::<i64>::new())), "1=1");

    let stmt = select([all()])
        .from(name("t"))
        .where_expr(and([
            name("a").eq(1).into(),
            in_list(name("id"), "", Vec::<i64>::new()).into(),
        ]));
    assert_eq!(positional(stmt), "SELECT * FROM `t` WHERE `a`=1 AND 1=0");
}

#[test]
fn in_values_accepts_subqueries() {
    let sub = select([name("user_id")]).from(name("member"));
    assert_eq!(
        positional(in_values(name("id"), [sub.into()])),
        "`id` IN ( SELECT `user_id` FROM `member` )"
    );
}

#[test]
fn null_right_side_becomes_is() {
    assert_eq!(positional(name("deleted_at").eq(null())), "`deleted_at` IS NULL");
    assert_eq!(positional(name("deleted_at").ne(None::<i32>)), "`deleted_at` IS NOT NULL");
}

#[test]
fn plain_values_become_constants() {
    assert_eq!(positional(name("name").eq("it's")), "`name`='it\\'s'");
    assert_eq!(positional(name("age").ge(18)), "`age`>=18");
    assert_eq!(positional(name("score").lt(2.5)), "`score`<2.5");
    assert_eq!(positional(name("name").like("a%")), "`name` LIKE 'a%'");
    assert_eq!(
        positional(not_like(name("name"), "a%")),
        "`name` NOT LIKE 'a%'"
    );
}

#[test]
fn constants_per_dialect() {
    let ts = NaiveDate::from_ymd_opt(2023, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();
    assert_eq!(positional(constant(ts)), "'2023-01-02 03:04:05'");
    assert_eq!(positional(constant(true)), "TRUE");
    assert_eq!(sql(constant(true), &SQL_SERVER, ParamStyle::Positional), "1");
    assert_eq!(positional(constant(b"raw".to_vec())), "'raw'");
    assert_eq!(positional(raw(b"raw".to_vec())), "raw");
}

#[test]
fn functions_aliases_and_unary() {
    assert_eq!(positional(count()), "COUNT(1)");
    assert_eq!(positional(count_all()), "COUNT(*)");
    assert_eq!(
        positional(func("COALESCE", [name("a"), constant(0)]).alias("total")),
        "COALESCE(`a`,0) AS `total`"
    );
    assert_eq!(
        positional(not(paren(name("a").eq(1)))),
        "NOT ( `a`=1 )"
    );
    let sub = select([raw(1)]).from(name("t"));
    assert_eq!(positional(exists(paren(sub))), "EXISTS ( SELECT 1 FROM `t` )");
}

#[test]
fn unary_operands_keep_grouping() {
    let cond = or([
        not(and([name("a").eq(1).into(), name("b").eq(2).into()])),
        name("c").eq(3).into(),
    ]);
    assert_eq!(positional(cond), "NOT ( `a`=1 AND `b`=2 ) OR `c`=3");

    assert_eq!(positional(not(and([name("a").eq(1).into()]))), "NOT `a`=1");
    assert_eq!(positional(not(name("a").eq(1))), "NOT `a`=1");

    let sub = select([raw(1)]).from(name("t"));
    assert_eq!(positional(exists(sub)), "EXISTS ( SELECT 1 FROM `t` )");

    let err = render(&not(and(Vec::new())), &MYSQL, ParamStyle::Positional).unwrap_err();
    assert!(err.is_invalid_query());
}

#[test]
fn qualified_names() {
    assert_eq!(positional(qualified(["u"], "id")), "`u`.`id`");
    assert_eq!(
        sql(qualified(["dbo", "user"], "id"), &SQL_SERVER, ParamStyle::Positional),
        "[dbo].[user].[id]"
    );
}

#[test]
fn nested_logic_keeps_grouping() {
    let cond = and([
        name("user_id").eq(3).into(),
        or([name("id").eq(1).into(), name("name").eq("test").into()]),
    ]);
    assert_eq!(
        positional(cond),
        "`user_id`=3 AND ( `id`=1 OR `name`='test' )"
    );

    // a single-item group needs no parentheses
    let cond = or([and([name("a").eq(1).into()]), name("b").eq(2).into()]);
    assert_eq!(positional(cond), "`a`=1 OR `b`=2");
}

// ==================== SELECT ====================

#[test]
fn select_shapes() {
    assert_eq!(positional(select([all()]).from(name("table"))), "SELECT * FROM `table`");
    assert_eq!(
        positional(
            select([name("c1"), name("c2")])
                .from(name("table"))
                .where_expr(eq(name("id"), raw(1)))
        ),
        "SELECT `c1`,`c2` FROM `table` WHERE `id`=1"
    );
    assert_eq!(
        positional(
            select([all()])
                .from(name("table"))
                .where_expr(eq(name("id"), raw(1)))
                .group_by(name("id"))
                .order_by([asc(name("id")), desc(name("name"))])
        ),
        "SELECT * FROM `table` WHERE `id`=1 GROUP BY `id` ORDER BY `id` ASC,`name` DESC"
    );
    assert_eq!(
        positional(
            select([all()])
                .from(name("table"))
                .where_expr(and([
                    eq(name("id"), constant(1)).into(),
                    eq(name("name"), constant("test")).into(),
                ]))
        ),
        "SELECT * FROM `table` WHERE `id`=1 AND `name`='test'"
    );
}

#[test]
fn select_having_and_sorts() {
    let stmt = select([name("dept"), count_all().alias("n")])
        .from(name("emp"))
        .group_by(name("dept"))
        .having(gt(count_all(), 5))
        .sort(Direction::Desc, [name("dept"), name("n")]);
    assert_eq!(
        positional(stmt),
        "SELECT `dept`,COUNT(*) AS `n` FROM `emp` GROUP BY `dept` HAVING COUNT(*)>5 ORDER BY `dept` DESC,`n` DESC"
    );
}

#[test]
fn empty_conditions_drop_their_clause() {
    assert_eq!(
        positional(select([all()]).from(name("t")).where_expr(and(Vec::new()))),
        "SELECT * FROM `t`"
    );
    assert_eq!(
        positional(
            select([name("dept")])
                .from(name("emp"))
                .where_expr(or([and(Vec::new()), or(Vec::new())]))
                .group_by(name("dept"))
                .having(and(Vec::new()))
        ),
        "SELECT `dept` FROM `emp` GROUP BY `dept`"
    );

    // empty members vanish from a non-empty list
    let cond = and([
        name("a").eq(1).into(),
        or(Vec::new()),
        or([name("b").eq(2).into(), and(Vec::new())]),
    ]);
    assert_eq!(
        positional(select([all()]).from(name("t")).where_expr(cond)),
        "SELECT * FROM `t` WHERE `a`=1 AND `b`=2"
    );
}

#[test]
fn empty_conditions_reject_writes() {
    let stmt: Expr = update(name("t"))
        .set([name("a").eq(var("a", 1))])
        .where_expr(and(Vec::new()))
        .into();
    let err = render(&stmt, &MYSQL, ParamStyle::Named).unwrap_err();
    assert!(err.is_invalid_query());

    let stmt: Expr = delete_from(name("t")).where_expr(or(Vec::new())).into();
    let err = render(&stmt, &SQL_SERVER, ParamStyle::Positional).unwrap_err();
    assert!(err.to_string().contains("DELETE has an empty WHERE condition"));
}

#[test]
fn empty_columns_render_star() {
    assert_eq!(positional(select(Vec::new()).from(name("t"))), "SELECT * FROM `t`");
}

#[test]
fn pagination_is_bound() {
    let stmt: Expr = select([all()]).from(name("t")).limit(10).offset(20).into();
    let out = render(&stmt, &MYSQL, ParamStyle::Named).unwrap();
    assert_eq!(out.sql, "SELECT * FROM `t` LIMIT :limit OFFSET :offset");
    assert_eq!(out.args.get("limit"), Some(&Value::UInt(10)));
    assert_eq!(out.args.get("offset"), Some(&Value::UInt(20)));

    let out = render(&stmt, &SQL_SERVER, ParamStyle::Positional).unwrap();
    assert_eq!(
        out.sql,
        "SELECT * FROM [t] OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
    );
    assert_eq!(
        out.args,
        Args::Positional(vec![Value::UInt(20), Value::UInt(10)])
    );
}

#[test]
fn count_variant_drops_order_and_limit() {
    let stmt = select([name("a")])
        .from(name("t"))
        .where_expr(name("a").eq(var("a", 1)))
        .order_by([desc(name("a"))])
        .limit(5)
        .with_count();
    assert!(stmt.use_count());
    assert_eq!(
        named(stmt.build_count()),
        "SELECT COUNT(1) FROM `t` WHERE `a`=:a"
    );
}

#[test]
fn select_without_from_is_invalid() {
    let err = render(&select([all()]).into(), &MYSQL, ParamStyle::Positional).unwrap_err();
    assert!(err.is_invalid_query());
}

// ==================== INSERT / UPDATE / DELETE ====================

#[test]
fn insert_constants_and_named_values() {
    assert_eq!(
        positional(insert_into(
            name("user"),
            [name("name").eq(constant("gnodux")), name("age").eq(constant(18))]
        )),
        "INSERT INTO `user` ( `name`,`age` ) VALUES ( 'gnodux',18 )"
    );
    assert_eq!(
        named(insert_into(
            name("user"),
            [name("name").eq(var("name", "gnodux")), name("age").eq(var("age", 18))]
        )),
        "INSERT INTO `user` ( `name`,`age` ) VALUES ( :name,:age )"
    );
}

#[test]
fn insert_requires_values() {
    let err = render(&insert_into(name("user"), Vec::new()).into(), &MYSQL, ParamStyle::Named)
        .unwrap_err();
    assert!(err.is_invalid_query());

    let mut insert = Insert::new(name("user"));
    insert.push(name("a"), var("a", 1));
    insert.columns.push(name("b"));
    let err = render(&insert.into(), &MYSQL, ParamStyle::Named).unwrap_err();
    assert!(err.to_string().contains("2 columns but 1 values"));
}

#[test]
fn update_with_and_without_where() {
    let base = update(name("table")).set([
        name("name").eq(var("name", "gnodux")),
        name("age").eq(var("age", 18)),
    ]);
    assert_eq!(
        named(base.clone()),
        "UPDATE `table` SET `name`=:name, `age`=:age"
    );
    assert_eq!(
        named(base.where_expr(name("id").eq(var("id", 1)))),
        "UPDATE `table` SET `name`=:name, `age`=:age WHERE `id`=:id"
    );
}

#[test]
fn update_without_set_is_invalid() {
    let err = render(&update(name("t")).into(), &MYSQL, ParamStyle::Named).unwrap_err();
    assert!(matches!(err, SqlxError::InvalidQuery(_)));
}

#[test]
fn delete_with_in_list() {
    assert_eq!(
        positional(delete_from(name("table")).where_expr(in_list(name("id"), "id", [1, 2, 3]))),
        "DELETE FROM `table` WHERE `id` IN ( ?,?,? )"
    );
    assert_eq!(positional(delete_from(name("table"))), "DELETE FROM `table`");
}

// ==================== Rendering properties ====================

fn sample() -> Expr {
    select([name("id"), name("name")])
        .from(name("user"))
        .where_expr(and([
            name("tenant_id").eq(var("tenant_id", 7)).into(),
            in_list(name("id"), "id", [1, 2]).into(),
            between(name("age"), var("age_min", 18), var("age_max", 30)),
        ]))
        .limit(10)
        .into()
}

#[test]
fn named_and_positional_agree_modulo_placeholders() {
    let tree = sample();
    let named = render(&tree, &MYSQL, ParamStyle::Named).unwrap();
    let positional = render(&tree, &MYSQL, ParamStyle::Positional).unwrap();

    let mut stripped = named.sql.clone();
    for key in named.args.as_named().unwrap().keys() {
        stripped = stripped.replace(&format!(":{key}"), "?");
    }
    assert_eq!(stripped, positional.sql);
    assert_eq!(named.args.len(), 6);
    assert_eq!(positional.args.len(), 6);
}

#[test]
fn rendering_does_not_mutate_the_tree() {
    let tree = sample();
    let before = tree.clone();
    let first = render(&tree, &MYSQL, ParamStyle::Positional).unwrap();
    let second = render(&tree, &MYSQL, ParamStyle::Positional).unwrap();
    assert_eq!(tree, before);
    assert_eq!(first, second);
}

#[test]
fn auto_fuzzy_rewrites_only_patterns() {
    let fuzzy = |value: &str| {
        let stmt: Expr = select([all()])
            .from(name("user"))
            .where_expr(name("name").eq(var("name", value)))
            .into();
        Filters::new().select(auto_fuzzy()).apply(&stmt)
    };
    assert_eq!(
        positional(fuzzy("abc%")),
        "SELECT * FROM `user` WHERE `name` LIKE ?"
    );
    assert_eq!(positional(fuzzy("abc")), "SELECT * FROM `user` WHERE `name`=?");
}

#[test]
fn filters_compose_on_statements() {
    let stmt: Expr = select([all()]).from(name("user")).into();
    let filters: Filters = [
        use_condition(and([name("a").eq(1).into(), name("b").eq(2).into()])),
        all_to_or(),
        use_sort(Direction::Desc, [name("id")]),
        use_limits(10, 0),
        with_count(),
    ]
    .into_iter()
    .collect();
    let out = filters.apply(&stmt);
    assert_eq!(
        positional(out.clone()),
        "SELECT * FROM `user` WHERE `a`=1 OR `b`=2 ORDER BY `id` DESC LIMIT ? OFFSET ?"
    );
    assert!(matches!(&out, Expr::Select(s) if s.use_count()));

    let upd: Expr = update(name("user")).into();
    let out = Filters::new()
        .select(set([name("a").eq(var("a", 1))]))
        .select(use_condition(name("id").eq(var("id", 2))))
        .apply(&upd);
    assert_eq!(named(out), "UPDATE `user` SET `a`=:a WHERE `id`=:id");

    let del: Expr = delete_from(name("user")).into();
    let out = Filters::new()
        .select(delete_fn(|d| d.where_expr = Some(name("id").eq(1).into())))
        .apply(&del);
    assert_eq!(positional(out), "DELETE FROM `user` WHERE `id`=1");
}
