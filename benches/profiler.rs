// Separate binary from `simple` so it can be run alone under a profiler
// (`cargo flamegraph --bench profiler`) without the noise of the other
// benchmark group's setup.
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use treerx::document::tree::{document, element, text};
use treerx::{document_process, parse_pattern, Config};

fn wide_document(siblings: usize) -> treerx::document::tree::TreeNode {
    let rows: Vec<_> = (0..siblings)
        .map(|i| {
            element(
                "item",
                &[("sku", Some(if i % 3 == 0 { "A100" } else { "B200" }))],
                vec![text("some descriptive content about this item")],
            )
        })
        .collect();
    document(rows)
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut c = c.benchmark_group("treerx-profile");
    c.measurement_time(Duration::from_secs(15)).sample_size(30);

    let doc = wide_document(5000);
    let sku_pattern = parse_pattern(r#"item <sku="A[0-9]+">"#, &Config::default()).unwrap();
    c.bench_function("attribute regex over 5000 flat siblings", |b| {
        b.iter(|| black_box(document_process(&sku_pattern, &doc).len()))
    });

    let content_pattern =
        parse_pattern(r#"item -> text:"some.*item""#, &Config::default()).unwrap();
    c.bench_function("content regex over 5000 flat siblings", |b| {
        b.iter(|| black_box(document_process(&content_pattern, &doc).len()))
    });

    let alt_pattern = parse_pattern("item|row|cell|section|article", &Config::default()).unwrap();
    c.bench_function("5-way alternation over 5000 flat siblings", |b| {
        b.iter(|| black_box(document_process(&alt_pattern, &doc).len()))
    });

    c.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
