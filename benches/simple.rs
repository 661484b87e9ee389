use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use treerx::document::tree::{document, element, text};
use treerx::{document_process, parse_pattern, Config};

/// Builds a document with `width` siblings at each of `depth` nesting
/// levels, each carrying a couple of attributes and a text child.
fn synthetic_document(depth: usize, width: usize) -> treerx::document::tree::TreeNode {
    fn build(depth: usize, width: usize, row_index: usize) -> Vec<treerx::document::tree::TreeNode> {
        if depth == 0 {
            return Vec::new();
        }
        (0..width)
            .map(|i| {
                let children = build(depth - 1, width, i);
                let mut kids = vec![text("leaf text content")];
                kids.extend(children);
                element(
                    "row",
                    &[
                        ("id", Some("row-id")),
                        ("class", Some(if (row_index + i) % 2 == 0 { "even" } else { "odd" })),
                    ],
                    kids,
                )
            })
            .collect()
    }
    document(build(depth, width, 0))
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut c = c.benchmark_group("treerx");
    c.measurement_time(Duration::from_secs(10)).sample_size(50);

    c.bench_function("compile simple symbol pattern", |b| {
        b.iter(|| black_box(parse_pattern("row", &Config::default()).unwrap()))
    });

    c.bench_function("compile pattern with attrs and content regex", |b| {
        b.iter(|| {
            black_box(
                parse_pattern(
                    r#"row <class="even"> -> text:"leaf.*content""#,
                    &Config::default(),
                )
                .unwrap(),
            )
        })
    });

    let doc = synthetic_document(4, 6);
    let bare = parse_pattern("row", &Config::default()).unwrap();
    c.bench_function("simulate bare symbol over synthetic tree", |b| {
        b.iter(|| black_box(document_process(&bare, &doc).len()))
    });

    let with_attrs = parse_pattern(r#"row <class="even">"#, &Config::default()).unwrap();
    c.bench_function("simulate attribute-restricted pattern", |b| {
        b.iter(|| black_box(document_process(&with_attrs, &doc).len()))
    });

    let with_children = parse_pattern(r#"row -> text:"leaf.*content" row*"#, &Config::default()).unwrap();
    c.bench_function("simulate pattern with child binding", |b| {
        b.iter(|| black_box(document_process(&with_children, &doc).len()))
    });

    c.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
