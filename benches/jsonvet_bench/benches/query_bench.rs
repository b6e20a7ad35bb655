//! Query string decoding benchmarks
//!
//! Compares parsing alone against parse + typed decode + validation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jsonvet::prelude::*;
use jsonvet::decode_query;

fn listing_schema() -> Schema {
    Schema::new(
        Validator::new()
            .property("page", PropertyDescriptor::integer().constraint(Rule::gte(1)))
            .property("limit", PropertyDescriptor::integer().constraint(Rule::between(1, 100)))
            .property("sort", PropertyDescriptor::string())
            .property("active", PropertyDescriptor::boolean())
            .property(
                "ids",
                PropertyDescriptor::array().constraint(Rule::array_of(JsonType::Integer)),
            ),
    )
    .unwrap()
}

const QUERY: &str = "page=2&limit=50&sort=name&active&ids=1&ids=2&ids=3&ids=4";

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let schema = listing_schema();

    group.bench_function("parse", |b| b.iter(|| QueryParams::parse(black_box(QUERY))));

    let params = QueryParams::parse(QUERY).unwrap();
    group.bench_function("decode", |b| {
        b.iter(|| decode_query(black_box(&params), &schema))
    });

    group.bench_function("decode_and_validate", |b| {
        b.iter(|| {
            let params = QueryParams::parse(black_box(QUERY)).unwrap();
            let value = decode_query(&params, &schema).unwrap();
            schema.validate(&value)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_query);
criterion_main!(benches);
