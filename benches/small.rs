use criterion::{Criterion, criterion_group, criterion_main};

pub fn criterion_benchmark(c: &mut Criterion) {
    use std::sync::Arc;

    use bibtex_unicode::{CharacterRecord, Parser, UnicodeMapping};

    let dataset = std::fs::read_to_string("assets/unicode_sample.json").unwrap();
    let records: Vec<CharacterRecord> = serde_json::from_str(&dataset).unwrap();
    let mapping = Arc::new(UnicodeMapping::from_records(records));

    let sample = std::fs::read_to_string("assets/sample.bib").unwrap();
    let input = sample.repeat(200);

    let parser = Parser::new(Arc::clone(&mapping));
    let plain = Parser::new(UnicodeMapping::empty());

    c.bench_function("sample parse", |b| b.iter(|| parser.parse(&input)));

    c.bench_function("sample parse without mapping", |b| {
        b.iter(|| plain.parse(&input))
    });

    c.bench_function("mapping build", |b| {
        b.iter(|| {
            let records: Vec<CharacterRecord> = serde_json::from_str(&dataset).unwrap();
            UnicodeMapping::from_records(records)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
