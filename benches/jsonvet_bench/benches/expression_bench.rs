//! Expression parsing and evaluation benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jsonvet::expression::ConditionLookup;
use jsonvet::prelude::*;
use std::collections::HashSet;

const SIMPLE: &str = "foo && !bar";
const COMPLEX: &str =
    "(foo&&'bar') || (\"foo\"&& baz) || (bar && baz) && !(foo && bar && baz) ^^ ~vip";

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("expression_parse");

    group.bench_function("simple", |b| b.iter(|| Expression::parse(black_box(SIMPLE))));
    group.bench_function("complex", |b| {
        b.iter(|| Expression::parse(black_box(COMPLEX)))
    });

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("expression_evaluate");
    let value = json!({"foo": 1, "bar": null, "baz": "x"});
    let conditions: HashSet<String> = HashSet::from(["vip".to_string()]);
    let lookup: &dyn ConditionLookup = &conditions;

    let simple = Expression::must_parse(SIMPLE);
    group.bench_function("simple", |b| {
        b.iter(|| simple.evaluate(black_box(&value), &[], lookup))
    });

    let complex = Expression::must_parse(COMPLEX);
    group.bench_function("complex", |b| {
        b.iter(|| complex.evaluate(black_box(&value), &[], lookup))
    });

    let root = json!({"order": {"promo": "X"}, "line": {}});
    let ancestors = [&root, &root["order"]];
    let reaching = Expression::must_parse(".promo && /.order.promo");
    group.bench_function("ancestors", |b| {
        b.iter(|| reaching.evaluate(black_box(&root["line"]), &ancestors, lookup))
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_evaluate);
criterion_main!(benches);
