use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use xmlenum::{render, Aggregator, Reader};

const SIMPLE_XML: &str = "<catalog><item><name>A</name></item><item><price>9</price></item></catalog>";

fn catalog(items: usize) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<catalog>\n");
    for i in 0..items {
        out.push_str(&format!(
            "  <item id=\"{i}\"><name>Item {i}</name><price currency=\"EUR\">{i}.50</price>\
             <tags><tag>a</tag><tag>b</tag></tags></item>\n"
        ));
    }
    out.push_str("</catalog>\n");
    out
}

fn bench_reader(c: &mut Criterion) {
    let doc = catalog(1_000);
    c.bench_function("xmlenum_reader_1k_items", |b| {
        b.iter(|| Reader::new(black_box(doc.as_bytes())).count())
    });
}

fn bench_aggregate(c: &mut Criterion) {
    c.bench_function("xmlenum_aggregate_simple", |b| {
        b.iter(|| {
            let mut agg = Aggregator::new("catalog");
            agg.feed_bytes(black_box(SIMPLE_XML.as_bytes()))
        })
    });

    let doc = catalog(1_000);
    c.bench_function("xmlenum_aggregate_1k_items", |b| {
        b.iter(|| {
            let mut agg = Aggregator::new("catalog");
            agg.feed_bytes(black_box(doc.as_bytes()))
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let mut agg = Aggregator::new("catalog");
    let _ = agg.feed_bytes(catalog(10).as_bytes());
    c.bench_function("xmlenum_render", |b| b.iter(|| render(black_box(agg.tree()))));
}

criterion_group!(benches, bench_reader, bench_aggregate, bench_render);
criterion_main!(benches);
