//! Benchmarks for the HTML tokenizer and tree builder.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lumen_browser::html::tokenizer::Tokenizer;
use lumen_browser::html::tree_builder::TreeBuilder;

/// Generate a synthetic HTML document of approximately `target_bytes` size.
fn generate_html(target_bytes: usize) -> String {
    let header = "<html><head><title>Benchmark</title></head><body>\n";
    let footer = "</body></html>";

    let section = "<div><h2>Section &amp; Notes</h2>\
        <p>Lorem ipsum dolor sit amet, <b>consectetur</b> adipiscing elit. \
        Sed do <a href=\"/next\">eiusmod tempor</a> incididunt ut labore.</p>\
        <ul><li>Item one</li><li>Item two<li>Item three</ul>\
        <blockquote>Quoted &lt;text&gt;</blockquote></div>\n";

    let mut html = String::with_capacity(target_bytes + 256);
    html.push_str(header);
    while html.len() + footer.len() < target_bytes {
        html.push_str(section);
    }
    html.push_str(footer);
    html
}

fn bench_tokenizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_tokenizer");

    for size in [10_000, 50_000, 100_000] {
        let html = generate_html(size);
        let label = format!("{size}B");

        group.bench_with_input(BenchmarkId::new("tokenize", &label), &html, |b, html| {
            b.iter(|| Tokenizer::new(html).tokenize());
        });
    }

    group.finish();
}

fn bench_tree_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_tree_builder");

    for size in [10_000, 50_000, 100_000] {
        let html = generate_html(size);
        let label = format!("{size}B");

        // Tokenize up front so only tree building is measured.
        let tokens = Tokenizer::new(&html).tokenize();

        group.bench_with_input(BenchmarkId::new("build", &label), &tokens, |b, tokens| {
            b.iter(|| TreeBuilder::build(tokens.clone()));
        });
    }

    group.finish();
}

fn bench_full_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_full_parse");

    for size in [10_000, 100_000] {
        let html = generate_html(size);
        let label = format!("{size}B");

        group.bench_with_input(BenchmarkId::new("parse", &label), &html, |b, html| {
            b.iter(|| lumen_browser::html::parse(html));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenizer, bench_tree_builder, bench_full_parse);
criterion_main!(benches);
