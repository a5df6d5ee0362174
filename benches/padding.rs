//! Benchmarks for the per-update guide work
//!
//! Every cursor move runs a retraction plan, a padding plan and a decoration
//! build over the window, so these need to stay cheap on large files.
//!
//! Run with: cargo bench padding

use crosshair::guide::{
    build_decorations, find_tab_in_window, plan_padding, plan_retraction, GuideStyle, LineWindow,
};
use crosshair::host::{CursorPosition, Document, DocumentId, Host, MemoryHost};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

/// Alternating short and long lines so half the window needs padding
fn make_host(lines: usize) -> (MemoryHost, DocumentId) {
    let mut text = String::new();
    for i in 0..lines {
        if i % 2 == 0 {
            text.push_str("fn x() {}\n");
        } else {
            text.push_str("    let value = compute(alpha, beta, gamma);\n");
        }
    }
    let mut host = MemoryHost::new();
    let doc = host.open(Document::with_text(&text));
    (host, doc)
}

#[divan::bench(args = [1_000, 10_000, 100_000])]
fn plan_padding_mid_document(bencher: divan::Bencher, lines: usize) {
    let (host, doc) = make_host(lines);
    let cursor = CursorPosition::new(lines / 2, 40);
    let window = LineWindow::around(cursor.line, lines, 10);

    bencher.bench_local(|| plan_padding(divan::black_box(&host), doc, cursor, window));
}

#[divan::bench(args = [5, 10, 50])]
fn plan_retraction_window(bencher: divan::Bencher, size: usize) {
    let (mut host, doc) = make_host(10_000);
    let cursor = CursorPosition::new(5_000, 40);
    let window = LineWindow::around(cursor.line, 10_000, size);
    let plan = plan_padding(&host, doc, cursor, window);
    host.apply_edits(doc, &plan.edits).unwrap();

    bencher.bench_local(|| plan_retraction(divan::black_box(&host), doc, &plan.spans));
}

#[divan::bench(args = [5, 10, 50])]
fn build_decorations_window(bencher: divan::Bencher, size: usize) {
    let (host, doc) = make_host(10_000);
    let cursor = CursorPosition::new(5_000, 40);
    let window = LineWindow::around(cursor.line, 10_000, size);
    let style = GuideStyle::default();

    bencher.bench_local(|| {
        build_decorations(divan::black_box(&host), doc, cursor, window, &style)
    });
}

#[divan::bench]
fn find_tab_no_match(bencher: divan::Bencher) {
    let (host, doc) = make_host(10_000);
    let window = LineWindow::around(5_000, 10_000, 50);

    bencher.bench_local(|| find_tab_in_window(divan::black_box(&host), doc, window));
}
