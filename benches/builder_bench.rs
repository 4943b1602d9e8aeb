#![allow(clippy::expect_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xmlsmith::serial::{serialize, serialize_with_options};
use xmlsmith::{CharDataOptions, Document, ElementOptions, FormatOptions};

// ---------------------------------------------------------------------------
// Document generators
// ---------------------------------------------------------------------------

/// Builds a catalog with `count` book records, each with an attribute and
/// three text-only children.
fn build_catalog(validation: bool, count: usize) -> Document {
    let mut doc = Document::with_validation(validation);
    let catalog = doc
        .element(doc.root(), "catalog")
        .expect("failed to add catalog");
    for i in 0..count {
        let book = doc.element(catalog, "book").expect("failed to add book");
        doc.attribute(book, ("id", format!("bk{i}")))
            .expect("failed to add id");
        for (name, value) in [
            ("title", format!("Title {i}")),
            ("author", format!("Author & Co {i}")),
            ("price", format!("{}.99", 10 + i)),
        ] {
            let field = doc.element(book, name).expect("failed to add field");
            doc.char_data(field, value).expect("failed to add text");
        }
    }
    doc
}

/// Builds a chain of `depth` nested elements.
fn build_nested(depth: usize) -> Document {
    let mut doc = Document::new();
    let mut parent = doc.root();
    for _ in 0..depth {
        parent = doc.element(parent, "level").expect("failed to nest");
    }
    doc.char_data(parent, "leaf").expect("failed to add leaf");
    doc
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_build_strict(c: &mut Criterion) {
    c.bench_function("build_strict_1000", |b| {
        b.iter(|| build_catalog(true, black_box(1000)));
    });
}

fn bench_build_permissive(c: &mut Criterion) {
    c.bench_function("build_permissive_1000", |b| {
        b.iter(|| build_catalog(false, black_box(1000)));
    });
}

fn bench_build_with_replacement(c: &mut Criterion) {
    c.bench_function("build_replace_invalid_1000", |b| {
        b.iter(|| {
            let mut doc = Document::new();
            let root = doc
                .element(doc.root(), "root")
                .expect("failed to add root");
            for _ in 0..1000 {
                let item = doc
                    .element(
                        root,
                        ElementOptions::new("bad name\u{1}")
                            .replace_invalid_chars_in_name(true),
                    )
                    .expect("failed to add item");
                doc.char_data(
                    item,
                    CharDataOptions::new(black_box("text\u{0}with\u{FFFE}junk"))
                        .replace_invalid_chars_in_char_data(true),
                )
                .expect("failed to add text");
            }
            doc
        });
    });
}

fn bench_serialize_pretty(c: &mut Criterion) {
    let doc = build_catalog(true, 1000);
    c.bench_function("serialize_pretty_1000", |b| {
        b.iter(|| serialize(black_box(&doc)));
    });
}

fn bench_serialize_compact(c: &mut Criterion) {
    let doc = build_catalog(true, 1000);
    let opts = FormatOptions::default().pretty(false).double_quotes(true);
    c.bench_function("serialize_compact_1000", |b| {
        b.iter(|| serialize_with_options(black_box(&doc), &opts));
    });
}

fn bench_serialize_nested(c: &mut Criterion) {
    let doc = build_nested(200);
    c.bench_function("serialize_nested_200", |b| {
        b.iter(|| serialize(black_box(&doc)));
    });
}

criterion_group!(
    building,
    bench_build_strict,
    bench_build_permissive,
    bench_build_with_replacement,
);

criterion_group!(
    serialization,
    bench_serialize_pretty,
    bench_serialize_compact,
    bench_serialize_nested,
);

criterion_main!(building, serialization);
