use criterion::{black_box, criterion_group, criterion_main, Criterion};
use khmer_converter::normalizer::reorder;
use khmer_converter::visual::legacy_reorder;
use khmer_converter::{FontCatalog, KhmerConverter};
use std::path::Path;
use std::sync::Arc;

fn benchmark_conversion(c: &mut Criterion) {
    let catalog_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/test-fontdata.xml");
    if !catalog_path.exists() {
        eprintln!("Skipping benchmark: catalog not found.");
        return;
    }

    let catalog = FontCatalog::load(&catalog_path).expect("Failed to load catalog");
    let converter = KhmerConverter::new(Arc::new(catalog));

    let text = "ក្រដាសប្រដាល់កណ្ដាល បង្គោល ខាងលើ សៀវភៅ គេប្រឡែងគ្នា ប្រឹក្សាធម្មនុញ្ញ";
    let visual = legacy_reorder(text);
    let legacy = converter
        .encode_to_legacy(text, "abc")
        .expect("Failed to encode sample");

    c.bench_function("reorder_sentence", |b| {
        b.iter(|| reorder(black_box(&visual)))
    });

    c.bench_function("legacy_reorder_sentence", |b| {
        b.iter(|| legacy_reorder(black_box(text)))
    });

    c.bench_function("decode_sentence", |b| {
        b.iter(|| converter.decode_from_legacy(black_box(&legacy), "abc"))
    });

    c.bench_function("encode_sentence", |b| {
        b.iter(|| converter.encode_to_legacy(black_box(text), "abc"))
    });
}

criterion_group!(benches, benchmark_conversion);
criterion_main!(benches);
