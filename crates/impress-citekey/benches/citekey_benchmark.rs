//! Key generation benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use impress_citekey::{
    expand, BibEntry, CiteKeyGenerator, DuplicateKeyTracker, EntryType, KeyGeneratorConfig, Pattern,
};

fn generate_many_entries(count: usize) -> Vec<BibEntry> {
    (0..count)
        .map(|i| {
            BibEntry::new(EntryType::Article)
                .with_field("author", format!("Author{} Smith and Jane Doe and others", i % 20))
                .with_field("title", format!("On the Theory of Paper Number {}", i % 100))
                .with_field("year", format!("{}", 2000 + i % 25))
                .with_field("pages", "101--117")
        })
        .collect()
}

fn sample_entry() -> BibEntry {
    BibEntry::new(EntryType::InProceedings)
        .with_field(
            "author",
            r#"Wil M. P. van der Aalst and Johann K{\"o}ning and Ana Garc{\'\i}a"#,
        )
        .with_field(
            "title",
            "The Difference Between Graph-Based and Block-Structured \
             Business Process Modelling Languages",
        )
        .with_field("year", "2012")
        .with_field("pages", "L213--226")
}

// === Pattern Benchmarks ===

fn bench_pattern_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_parse");
    group.bench_function("simple", |b| b.iter(|| Pattern::parse(black_box("[auth][year]"))));
    group.bench_function("modifiers", |b| {
        b.iter(|| {
            Pattern::parse(black_box(
                "[auth:upper:truncate5]_[shorttitle:abbr]_[journal:([booktitle:abbr])]",
            ))
        })
    });
    group.finish();
}

fn bench_expand_markers(c: &mut Criterion) {
    let entry = sample_entry();
    let mut group = c.benchmark_group("expand_markers");
    let patterns = [
        "[auth][year]",
        "[authIni4]",
        "[authorsAlpha]",
        "[shorttitle]",
        "[camel]",
        "[firstpage]",
    ];
    for pattern in patterns {
        group.bench_with_input(BenchmarkId::from_parameter(pattern), &pattern, |b, pattern| {
            b.iter(|| expand(black_box(pattern), &entry, None, ','))
        });
    }
    group.finish();
}

// === Generation Benchmarks ===

fn bench_generate_all(c: &mut Criterion) {
    let generator = CiteKeyGenerator::new(KeyGeneratorConfig::default()).unwrap();
    let mut group = c.benchmark_group("generate_all");
    for count in [100, 1000] {
        let entries = generate_many_entries(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &entries, |b, entries| {
            b.iter(|| {
                let mut entries = entries.clone();
                let mut tracker = DuplicateKeyTracker::new();
                generator.generate_all(&mut entries, &mut tracker, |_, _| {})
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pattern_parse, bench_expand_markers, bench_generate_all);
criterion_main!(benches);
