use criterion::{black_box, criterion_group, criterion_main, Criterion};

use translit_engine::{build_mapping, BuildConfig, CharFrequency, Strategy, Transliterator};

fn bench_engine() -> Transliterator {
    // Tibetan block, tsheg first, roughly the shape of a trained ranking.
    let mut chars = vec!['་', '།'];
    chars.extend('\u{0F40}'..='\u{0F6C}');
    let ranking: Vec<CharFrequency> = chars
        .iter()
        .enumerate()
        .map(|(i, &character)| CharFrequency {
            character,
            count: 10_000 / (i as u64 + 1),
        })
        .collect();

    let config = BuildConfig::default();
    let table = build_mapping(&ranking, Strategy::Basic, &config, None).expect("bench table");
    Transliterator::new(table)
}

fn sample_text() -> String {
    "བོད་སྐད་ནི་བོད་ཀྱི་སྐད་ཡིག་ཡིན། mixed ASCII 123 "
        .repeat(100)
}

fn bench_to_latin(c: &mut Criterion) {
    let engine = bench_engine();
    let text = sample_text();

    c.bench_function("to_latin", |b| {
        b.iter(|| engine.to_latin(black_box(&text)).unwrap())
    });
}

fn bench_from_latin(c: &mut Criterion) {
    let engine = bench_engine();
    let latin = engine.to_latin(&sample_text()).unwrap();

    c.bench_function("from_latin", |b| {
        b.iter(|| engine.from_latin(black_box(&latin)).unwrap())
    });
}

criterion_group!(benches, bench_to_latin, bench_from_latin);
criterion_main!(benches);
