use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use radix_pattern::{PatternOptions, RadixMap};

fn random_words(count: usize, max_len: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(1..=max_len);
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect()
        })
        .collect()
}

/// Words that share prefixes and suffixes, like identifiers in a vocabulary.
fn related_words() -> Vec<String> {
    let stems = ["read", "write", "load", "store", "parse", "format"];
    let ends = ["", "er", "ers", "ing", "s", "able"];
    let mut words = Vec::new();
    for prefix in &["", "re", "pre", "un"] {
        for stem in &stems {
            for end in &ends {
                words.push(format!("{}{}{}", prefix, stem, end));
            }
        }
    }
    words
}

fn make_map(words: &[String]) -> RadixMap<usize> {
    let mut map = RadixMap::new();
    for (i, word) in words.iter().enumerate() {
        map.insert(word, i);
    }
    map
}

fn map_insert(c: &mut Criterion) {
    let words = random_words(1000, 16);
    c.bench_function("map insert 1000", |b| b.iter(|| make_map(black_box(&words))));
}

fn map_get(c: &mut Criterion) {
    let words = random_words(1000, 16);
    let map = make_map(&words);
    c.bench_function("map get 1000", |b| {
        b.iter(|| {
            words
                .iter()
                .filter(|w| map.get(black_box(w)).is_some())
                .count()
        })
    });
}

fn map_remove(c: &mut Criterion) {
    let words = random_words(1000, 16);
    c.bench_function("map remove 1000", |b| {
        b.iter_batched(
            || make_map(&words),
            |mut map| {
                for w in &words {
                    map.remove(w);
                }
                map
            },
            BatchSize::SmallInput,
        )
    });
}

fn map_prefix_iter(c: &mut Criterion) {
    let words = related_words();
    let map = make_map(&words);
    c.bench_function("map keys under prefix", |b| {
        b.iter(|| map.keys(black_box("re")).count())
    });
}

fn map_pattern(c: &mut Criterion) {
    let words = related_words();
    c.bench_function("map compact pattern", |b| {
        b.iter_batched(
            || make_map(&words),
            |map| map.pattern().len(),
            BatchSize::SmallInput,
        )
    });

    let map = make_map(&words);
    let options = PatternOptions::new().anchored(true);
    c.bench_function("map compile pattern", |b| {
        b.iter(|| map.to_pattern(black_box(&options)).is_ok())
    });
}

criterion_group!(
    benches,
    map_insert,
    map_get,
    map_remove,
    map_prefix_iter,
    map_pattern
);
criterion_main!(benches);
