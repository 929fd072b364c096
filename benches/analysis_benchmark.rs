//! Benchmarks for outline inference.
//!
//! Run with: cargo bench
//!
//! Analysis benchmarks work on synthetic spans; the extraction benchmark
//! uses a generated PDF.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pdf_outline::analysis::{self, collect, normalize, OutlineAnalyzer};
use pdf_outline::{SpanDocument, TextSpan};

/// Creates a minimal synthetic PDF with one heading and body lines per page.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut content = String::new();

    content.push_str("%PDF-1.4\n");
    content.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", i * 2 + 5)).collect();
    content.push_str(&format!(
        "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> >>\nendobj\n",
        kids.join(" "),
        page_count
    ));
    content.push_str(
        "3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n",
    );
    content.push_str(
        "4 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>\nendobj\n",
    );

    let mut next_obj = 5;
    for i in 0..page_count {
        let page_obj = next_obj;
        let content_obj = next_obj + 1;
        next_obj += 2;

        content.push_str(&format!(
            "{} 0 obj\n<< /Type /Page /Parent 2 0 R /Contents {} 0 R >>\nendobj\n",
            page_obj, content_obj
        ));

        let mut text = format!("BT /F2 18 Tf 72 720 Td ({}. Section Overview) Tj ET\n", i + 1);
        for line in 0..30 {
            text.push_str(&format!(
                "BT /F1 11 Tf 72 {} Td (measurements from the field campaign line {}) Tj ET\n",
                690 - line * 14,
                line
            ));
        }
        content.push_str(&format!(
            "{} 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
            content_obj,
            text.len(),
            text
        ));
    }

    let xref_offset = content.len();
    content.push_str(&format!("xref\n0 {}\n", next_obj));
    content.push_str("0000000000 65535 f \n");
    for _ in 1..next_obj {
        content.push_str("0000000000 00000 n \n");
    }
    content.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        next_obj, xref_offset
    ));

    content.into_bytes()
}

/// Spans of a document with a three-level hierarchy on every page.
fn synthetic_document(page_count: u32) -> SpanDocument {
    let mut spans = Vec::new();
    for page in 1..=page_count {
        spans.push(TextSpan::new(
            format!("{}. Chapter Results", page),
            page,
            72.0,
            60.0,
            20.0,
            "Helvetica-Bold",
        ));
        spans.push(TextSpan::new(
            format!("{}.1 Detailed Findings", page),
            page,
            72.0,
            120.0,
            15.0,
            "Helvetica-Bold",
        ));
        for line in 0..40 {
            spans.push(TextSpan::new(
                "  the  survey  recorded   several observations of note\u{2022} ",
                page,
                72.0,
                150.0 + line as f32 * 14.0,
                11.0,
                "Times-Roman",
            ));
        }
    }
    SpanDocument::new(spans).with_page_count(page_count)
}

fn bench_normalize(c: &mut Criterion) {
    let raw = "  \u{2022} Ünïcödé   heading\twith   extra   spacing \u{00a7} ";
    c.bench_function("normalize", |b| {
        b.iter(|| normalize(black_box(raw)));
    });
}

fn bench_statistics(c: &mut Criterion) {
    let doc = synthetic_document(50);
    let spans = OutlineAnalyzer::normalize_spans(&doc.spans);
    c.bench_function("collect_statistics_50_pages", |b| {
        b.iter(|| collect(black_box(&spans)));
    });
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for page_count in [1u32, 10, 100] {
        let doc = synthetic_document(page_count);
        group.bench_with_input(BenchmarkId::from_parameter(page_count), &doc, |b, doc| {
            b.iter(|| analysis::analyze(black_box(doc)));
        });
    }

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_outline");

    for page_count in [1, 5, 10] {
        let data = create_test_pdf(page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            // Synthetic xref offsets are placeholders, so only timing matters here
            b.iter(|| pdf_outline::outline_from_bytes(black_box(&data)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_normalize,
    bench_statistics,
    bench_analyze,
    bench_extract,
);
criterion_main!(benches);
