use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlxx::dialect::{MYSQL, SQL_SERVER};
use sqlxx::expr::{Expr, Filters, and, auto_fuzzy, in_list, name, select, use_limits, var};
use sqlxx::render::{ParamStyle, render};

/// SELECT col0, col1, ... FROM t WHERE col0 = :col0 AND col1 = :col1 ...
fn build_select(n: usize) -> Expr {
    let columns = (0..n).map(|i| name(format!("col{i}")));
    let conditions = (0..n).map(|i| -> Expr {
        let col = format!("col{i}");
        name(col.clone()).eq(var(col, i as i64)).into()
    });
    select(columns)
        .from(name("t"))
        .where_expr(and(conditions))
        .limit(10)
        .into()
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/select");

    for n in [1, 5, 10, 50, 100] {
        let stmt = build_select(n);
        group.bench_with_input(BenchmarkId::new("positional", n), &stmt, |b, stmt| {
            b.iter(|| black_box(render(stmt, &MYSQL, ParamStyle::Positional)));
        });
        group.bench_with_input(BenchmarkId::new("named", n), &stmt, |b, stmt| {
            b.iter(|| black_box(render(stmt, &SQL_SERVER, ParamStyle::Named)));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let stmt = build_select(n);
                black_box(render(&stmt, &MYSQL, ParamStyle::Named))
            });
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/in_list");

    for n in [5, 20, 100, 500] {
        let ids: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &ids, |b, ids| {
            b.iter(|| {
                let stmt: Expr = select([name("id")])
                    .from(name("t"))
                    .where_expr(in_list(name("id"), "id", ids.iter().copied()))
                    .into();
                black_box(render(&stmt, &MYSQL, ParamStyle::Named))
            });
        });
    }

    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/filters");
    let filters = Filters::new().select(auto_fuzzy()).select(use_limits(20, 40));

    for n in [1, 10, 50] {
        let stmt = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(render(&filters.apply(stmt), &MYSQL, ParamStyle::Positional)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render,
    bench_build_and_render,
    bench_in_list,
    bench_filters
);
criterion_main!(benches);
