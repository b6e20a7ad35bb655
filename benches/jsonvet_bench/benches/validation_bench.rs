//! Schema validation benchmarks
//!
//! Measures the engine on flat objects, nested arrays and conditional schemas.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jsonvet::prelude::*;

fn person_schema() -> Schema {
    Schema::new(
        Validator::new()
            .property(
                "name",
                PropertyDescriptor::string()
                    .mandatory()
                    .not_null()
                    .constraint(Rule::length(1, 255)),
            )
            .property(
                "email",
                PropertyDescriptor::string().mandatory().constraint(Rule::Email),
            )
            .property(
                "age",
                PropertyDescriptor::integer().constraint(Rule::between(0, 150)),
            )
            .property(
                "tags",
                PropertyDescriptor::array().constraint(Rule::array_of(JsonType::String)),
            ),
    )
    .unwrap()
}

fn order_schema() -> Schema {
    let mut builder = SchemaBuilder::new();
    let line = builder.add(
        Validator::new()
            .allow_array()
            .property("sku", PropertyDescriptor::string().mandatory())
            .property("qty", PropertyDescriptor::integer().mandatory().constraint(Rule::gte(1)))
            .property(
                "discount",
                PropertyDescriptor::number().unwanted_with(Expression::must_parse("!.promo")),
            ),
    );
    let root = builder.add(
        Validator::new()
            .constraint(SetConditionProperty::new("kind"))
            .property("kind", PropertyDescriptor::string().mandatory())
            .property("promo", PropertyDescriptor::string())
            .property("address", PropertyDescriptor::object().when(["delivery"]))
            .property("lines", PropertyDescriptor::array().mandatory().validator(line)),
    );
    builder.build(root).unwrap()
}

fn order(lines: usize) -> Value {
    let lines: Vec<Value> = (0..lines)
        .map(|i| json!({"sku": format!("SKU-{i}"), "qty": i + 1, "discount": 5}))
        .collect();
    json!({"kind": "delivery", "promo": "SPRING", "address": {}, "lines": lines})
}

/// Benchmark flat object validation
fn bench_flat_objects(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat_object");
    let schema = person_schema();

    let valid = json!({
        "name": "Bilbo",
        "email": "bilbo@example.com",
        "age": 111,
        "tags": ["hobbit", "burglar"]
    });
    group.bench_function("valid", |b| {
        b.iter(|| schema.validate(black_box(&valid)))
    });

    let invalid = json!({"name": "", "age": -1, "tags": [1], "extra": true});
    group.bench_function("invalid", |b| {
        b.iter(|| schema.validate(black_box(&invalid)))
    });

    group.finish();
}

/// Benchmark nested arrays with conditions and expressions
fn bench_nested_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_order");
    let schema = order_schema();

    for lines in [1, 10, 100] {
        let input = order(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &input, |b, input| {
            b.iter(|| schema.validate(black_box(input)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flat_objects, bench_nested_orders);
criterion_main!(benches);
