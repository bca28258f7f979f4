//! Benchmarks for the layout engine.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lumen_browser::html;
use lumen_browser::layout::{LayoutParams, layout};
use lumen_types::bitmap_font::BitmapTextMetrics;

/// Generate HTML with `n` paragraphs of wrapping text.
fn generate_paragraphs(n: usize) -> String {
    let mut html = String::from("<html><body>\n");
    for i in 0..n {
        html.push_str(&format!(
            "<p>Paragraph {i} has <i>enough</i> words to wrap across more than one line \
             in a narrow window, with a <a href=\"/p{i}\">link</a> in the middle.</p>\n",
        ));
    }
    html.push_str("</body></html>");
    html
}

/// Generate HTML with an NxN table.
fn generate_table(rows: usize, cols: usize) -> String {
    let mut html = String::from("<html><body><table>\n");
    for r in 0..rows {
        html.push_str("<tr>");
        for c in 0..cols {
            html.push_str(&format!("<td>R{r}C{c}</td>"));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table></body></html>");
    html
}

fn bench_paragraphs(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_paragraphs");
    let metrics = BitmapTextMetrics::new();
    let params = LayoutParams::default();

    for n in [100, 500, 1000] {
        let root = html::parse(&generate_paragraphs(n));

        group.bench_with_input(BenchmarkId::new("layout", n), &root, |b, root| {
            b.iter(|| layout(root, &metrics, &params));
        });
    }

    group.finish();
}

fn bench_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_tables");
    let metrics = BitmapTextMetrics::new();
    let params = LayoutParams::default();

    for (rows, cols) in [(10, 5), (50, 10), (200, 4)] {
        let root = html::parse(&generate_table(rows, cols));
        let label = format!("{rows}x{cols}");

        group.bench_with_input(BenchmarkId::new("layout", &label), &root, |b, root| {
            b.iter(|| layout(root, &metrics, &params));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_paragraphs, bench_tables);
criterion_main!(benches);
