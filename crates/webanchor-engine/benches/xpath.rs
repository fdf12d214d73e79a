use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use webanchor_engine::anchoring::xpath::{evaluate_simple_xpath, evaluate_xpath, xpath_from_node};
use webanchor_engine::{Document, Dom};
mod common;

fn bench_xpath_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("xpath");
    group.sample_size(10);

    for depth in [5, 20, 80] {
        let doc = Document::parse(&common::generate_nested(depth));
        let Some(root) = doc.element_by_id("parent-container") else {
            continue;
        };
        let Some(deepest) = doc.text_nodes(root).last().and_then(|t| doc.parent(t)) else {
            continue;
        };
        let Ok(xpath) = xpath_from_node(&doc, deepest, root) else {
            continue;
        };

        group.bench_with_input(BenchmarkId::new("simple", depth), &xpath, |b, xpath| {
            b.iter(|| std::hint::black_box(evaluate_simple_xpath(&doc, xpath, root)));
        });

        let relative = format!(".{xpath}");
        group.bench_with_input(BenchmarkId::new("evaluator", depth), &relative, |b, xpath| {
            b.iter(|| std::hint::black_box(evaluate_xpath(&doc, xpath, root)));
        });

        group.bench_with_input(BenchmarkId::new("from_node", depth), &deepest, |b, &node| {
            b.iter(|| std::hint::black_box(xpath_from_node(&doc, node, root)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_xpath_resolution);
criterion_main!(benches);
