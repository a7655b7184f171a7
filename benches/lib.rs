use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::{hint::black_box, time::Duration};

use diagscan::{Config, DiagScanner, SubstitutionMatrix, scan_subjects, scan_subjects_parallel};

fn random_seq(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.random_range(0..20u8)).collect()
}

/// Copy of `query` with roughly `rate` percent of residues substituted
fn mutate(rng: &mut StdRng, query: &[u8], rate: u32) -> Vec<u8> {
    query
        .iter()
        .map(|&letter| {
            if rng.random_range(0..100) < rate {
                rng.random_range(0..20u8)
            } else {
                letter
            }
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let matrix = SubstitutionMatrix::blosum62();
    let query = random_seq(&mut rng, 300);

    let unrelated = random_seq(&mut rng, 300);
    let related = mutate(&mut rng, &query, 30);

    for fast in [false, true] {
        let config = Config {
            fast,
            ..Config::default()
        };
        let mut scanner = DiagScanner::new(&query, &matrix, &config).unwrap();
        let mode = if fast { "fast" } else { "linked" };

        c.bench_function(&format!("scan unrelated ({mode})"), |b| {
            b.iter(|| black_box(scanner.scan_all(black_box(&unrelated)).unwrap()))
        });
        c.bench_function(&format!("scan related ({mode})"), |b| {
            b.iter(|| black_box(scanner.scan_all(black_box(&related)).unwrap()))
        });
    }

    c.bench_function("scan band", |b| {
        let mut scanner = DiagScanner::new(&query, &matrix, &Config::default()).unwrap();
        b.iter(|| black_box(scanner.scan(black_box(&related), -32..32).unwrap()))
    });

    let subjects: Vec<Vec<u8>> = (0..2000)
        .map(|i| {
            if i % 10 == 0 {
                mutate(&mut rng, &query, 40)
            } else {
                random_seq(&mut rng, 300)
            }
        })
        .collect();
    let config = Config::default();

    c.bench_function("batch", |b| {
        b.iter(|| scan_subjects(&query, black_box(&subjects), &matrix, &config).unwrap())
    });
    c.bench_function("batch parallel", |b| {
        b.iter(|| {
            scan_subjects_parallel(&query, black_box(&subjects), &matrix, &config, 8).unwrap()
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_millis(200))
        .measurement_time(Duration::from_secs(2));
    targets = criterion_benchmark
}
criterion_main!(benches);
