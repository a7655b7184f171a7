use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::DiagonalSegment;
use crate::scan::{ScalarScanner, VectorScanner, score_diagonal_segments};

type Tuple = (i32, i32, i32, i32, Option<usize>);

fn tuples(nodes: &[DiagonalNode]) -> Vec<Tuple> {
    nodes
        .iter()
        .map(|n| {
            let s = n.segment;
            (s.i, s.j, s.len, s.score, n.link_idx)
        })
        .collect()
}

fn run(query: &[u8], subject: &[u8], matrix: &SubstitutionMatrix, config: &Config) -> Vec<DiagonalNode> {
    let profile = ScoreProfile::new(query, matrix);
    scan_diags(
        query,
        subject,
        &profile,
        matrix,
        1 - subject.len() as i32..query.len() as i32,
        config,
        &VectorScanner::new(),
    )
}

fn uniform() -> SubstitutionMatrix {
    SubstitutionMatrix::uniform(25, 5, -4).unwrap()
}

/// Letters 0..24 never repeat in the query, and letter 24 never matches it
const FILLER: u8 = 24;

/// Query of distinct letters, and the subject with a 4 residue insertion after position
/// 12 whose last three residues repeat query positions 11..14
fn insertion() -> (Vec<u8>, Vec<u8>) {
    let query: Vec<u8> = (0..24).collect();
    let mut subject = query[..12].to_vec();
    subject.extend([FILLER, 11, 12, 13]);
    subject.extend(&query[12..]);
    (query, subject)
}

#[test]
fn test_single_run() {
    let query: Vec<u8> = (0..10).collect();
    let nodes = run(&query, &query, &uniform(), &Config::default());
    assert_eq!(tuples(&nodes), vec![(0, 0, 10, 50, None)]);
    assert_eq!(nodes[0].segment.diag(), 0);
}

#[test]
fn test_identical_residues() {
    let query = vec![3u8; 10];
    let nodes = run(&query, &query, &uniform(), &Config::default());
    let main: Vec<Tuple> = tuples(&nodes)
        .into_iter()
        .filter(|&(i, j, ..)| i == j)
        .collect();
    assert_eq!(main, vec![(0, 0, 10, 50, None)]);
}

#[test]
fn test_runs_split_by_reset() {
    let query: Vec<u8> = (0..19).collect();
    let mut subject = query[..5].to_vec();
    subject.extend([FILLER; 8]);
    subject.extend(&query[13..]);

    let mut nodes = tuples(&run(&query, &subject, &uniform(), &Config::default()));
    nodes.sort();
    assert_eq!(nodes, vec![(0, 0, 5, 25, None), (13, 13, 6, 30, None)]);

    // same segments as the exact scalar recomputation of the diagonal
    let mut scalar = vec![];
    score_diagonal_segments(&query, &subject, (0, 0), 19, &uniform(), &mut scalar);
    let mut scalar = tuples(&scalar);
    scalar.sort();
    assert_eq!(nodes, scalar);
}

#[test]
fn test_end_scan_finds_shifted_fragment() {
    let (query, subject) = insertion();
    let nodes = run(&query, &subject, &uniform(), &Config::default());
    assert_eq!(
        tuples(&nodes),
        vec![
            (0, 0, 12, 60, None),
            (12, 16, 12, 60, None),
            // diagonal -2, between the two segments, found probing around the first one
            (11, 13, 3, 15, Some(0)),
        ]
    );
}

#[test]
fn test_vicinity_scan_finds_bridging_fragment() {
    let (query, subject) = insertion();
    // opening a gap costs as much as a primary segment, so the end scan never runs
    let config = Config {
        gap_open: 18,
        ..Config::default()
    };
    let nodes = run(&query, &subject, &uniform(), &config);
    assert_eq!(
        tuples(&nodes),
        vec![
            (0, 0, 12, 60, None),
            (12, 16, 12, 60, None),
            (11, 13, 3, 15, Some(1)),
        ]
    );
}

#[test]
fn test_fast_mode_skips_linking() {
    let (query, subject) = insertion();
    let config = Config {
        fast: true,
        ..Config::default()
    };
    let nodes = run(&query, &subject, &uniform(), &config);
    // band order, unsorted
    assert_eq!(
        tuples(&nodes),
        vec![(12, 16, 12, 60, None), (0, 0, 12, 60, None)]
    );
}

#[test]
fn test_saturated_diagonal_uses_scalar_fallback() {
    let matrix = SubstitutionMatrix::uniform(25, 11, -4).unwrap();
    let query: Vec<u8> = (0..25).collect();
    let nodes = run(&query, &query, &matrix, &Config::default());
    // the byte accumulator tops out at 251, the exact score is 25 * 11
    assert_eq!(tuples(&nodes), vec![(0, 0, 25, 275, None)]);
}

#[test]
fn test_get_diag_marks_active() {
    let query: Vec<u8> = (0..10).collect();
    let matrix = uniform();
    let profile = ScoreProfile::new(&query, &matrix);

    for fast in [false, true] {
        let config = Config {
            fast,
            ..Config::default()
        };
        let geometry = BandGeometry::new(10, 10, -9, 10, config.block_len).unwrap();
        let mut session = ScanSession::new(&config, geometry);
        session.scan(&ScalarScanner, &profile, &query);

        let o = geometry.offset(0);
        let mut diags = vec![];
        session.get_diag(o, 0, 10, 19, &mut diags);
        assert_eq!(tuples(&diags), vec![(0, 0, 10, 50, None)]);
        assert_eq!(session.is_active(o, 0), !fast);

        // already extracted blocks are never reported twice, unless nothing is tracked
        session.get_diag(o, 0, 10, 13, &mut diags);
        assert_eq!(diags.len(), if fast { 2 } else { 1 });
    }
}

#[test]
fn test_block_peaks() {
    let query: Vec<u8> = (0..17).collect();
    let mut subject = query[..8].to_vec();
    subject.extend([FILLER; 5]);
    subject.extend(&query[13..]);

    let matrix = uniform();
    let profile = ScoreProfile::new(&query, &matrix);
    let geometry = BandGeometry::new(17, 17, -16, 17, 16).unwrap();
    let mut session = ScanSession::new(&Config::default(), geometry);
    session.scan(&VectorScanner::new(), &profile, &subject);

    // raw scores on the main diagonal: 5..40, dip to 20, rise back to 40
    let o = geometry.offset(0);
    let mut diags = vec![];
    let stop = session.get_block_peaks(o, 0, 19, &mut diags);
    assert_eq!(stop, Some(17));
    assert_eq!(
        tuples(&diags),
        vec![(0, 0, 8, 40, None), (13, 13, 4, 20, None)]
    );

    // off-diagonal blocks are empty
    assert_eq!(session.get_block_peaks(geometry.offset(3), 0, 19, &mut diags), None);
}

#[test]
fn test_empty_band() {
    let query: Vec<u8> = (0..10).collect();
    let matrix = uniform();
    let profile = ScoreProfile::new(&query, &matrix);
    let nodes = scan_diags(
        &query,
        &query,
        &profile,
        &matrix,
        20..30,
        &Config::default(),
        &VectorScanner::new(),
    );
    assert!(nodes.is_empty());
}

/// Matches where `pattern` is set, mismatches elsewhere, as `(matching, count)` stretches
fn stretches(pattern: &[(bool, usize)]) -> Vec<bool> {
    pattern
        .iter()
        .flat_map(|&(matching, count)| std::iter::repeat_n(matching, count))
        .collect()
}

/// Segments of the main diagonal of a pair matching exactly where `pattern` is set, from
/// block reconstruction in fast mode and from the exact scalar scan, both sorted
fn main_diagonal(pattern: &[bool]) -> (Vec<Tuple>, Vec<Tuple>) {
    let query: Vec<u8> = (0..pattern.len()).map(|c| (c % 24) as u8).collect();
    let subject: Vec<u8> = query
        .iter()
        .zip(pattern)
        .map(|(&q, &matching)| if matching { q } else { FILLER })
        .collect();
    let config = Config {
        fast: true,
        ..Config::default()
    };

    let mut block: Vec<Tuple> = tuples(&run(&query, &subject, &uniform(), &config))
        .into_iter()
        .filter(|&(i, j, ..)| i == j)
        .collect();
    block.sort();

    let mut scalar = vec![];
    score_diagonal_segments(
        &query,
        &subject,
        (0, 0),
        config.min_diag_score,
        &uniform(),
        &mut scalar,
    );
    let mut scalar = tuples(&scalar);
    scalar.sort();
    (block, scalar)
}

#[test]
fn test_reconstruction_matches_scalar_on_separated_runs() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut identical = 0;

    for _ in 0..300 {
        // one run per block, climbing to 5k and falling back to zero before the block ends
        let mut pattern = vec![];
        let mut peaks = vec![];
        for _ in 0..rng.random_range(1..8) {
            let k = rng.random_range(0..=7usize);
            let fall = (5 * k).div_ceil(4);
            let lead = rng.random_range(0..=16 - k - fall);
            pattern.extend(stretches(&[(false, lead), (true, k), (false, 16 - lead - k)]));
            peaks.push(5 * k as i32);
        }
        let (block, scalar) = main_diagonal(&pattern);

        // a run is recovered when its block reaches the cutoff and tops the block before
        let rising = |b: usize| peaks[b] >= 19 && (b == 0 || peaks[b] > peaks[b - 1]);
        let expected: Vec<Tuple> = scalar
            .iter()
            .copied()
            .filter(|&(_, j, ..)| rising(j as usize / 16))
            .collect();
        assert_eq!(block, expected, "block peaks {peaks:?}");

        if (0..peaks.len()).all(|b| peaks[b] < 19 || rising(b)) {
            assert_eq!(block, scalar, "block peaks {peaks:?}");
            identical += 1;
        }
    }
    assert!(identical > 0);
}

#[test]
fn test_reconstruction_skips_non_rising_block() {
    // peaks of 40 in block 0 and 30 in block 1, separated by a reset
    let pattern = stretches(&[(true, 8), (false, 12), (true, 6), (false, 10)]);
    let (block, scalar) = main_diagonal(&pattern);
    assert_eq!(scalar, vec![(0, 0, 8, 40, None), (20, 20, 6, 30, None)]);
    assert_eq!(block, vec![(0, 0, 8, 40, None)]);
}

#[test]
fn test_reconstruction_splits_run_without_reset() {
    // 50 in block 0, dip to 2 in block 1, 66 in block 2, never touching zero in between
    let pattern = stretches(&[
        (true, 10),
        (false, 12),
        (true, 6),
        (false, 4),
        (true, 10),
        (false, 22),
    ]);
    let (block, scalar) = main_diagonal(&pattern);
    assert_eq!(scalar, vec![(0, 0, 42, 66, None)]);
    // the second range starts its search past the first one and settles on the dip
    assert_eq!(block, vec![(0, 0, 10, 50, None), (22, 22, 20, 64, None)]);
}

#[test]
fn test_reconstruction_reports_best_block_below_cutoff() {
    // 50 in block 0, hovering between 10 and 22 in block 1, a peak of 26 in block 2
    let mut pattern = stretches(&[(true, 10), (false, 10)]);
    for _ in 0..6 {
        pattern.extend([true, false]);
    }
    pattern.extend(stretches(&[(true, 2), (false, 14)]));
    let (block, scalar) = main_diagonal(&pattern);
    assert_eq!(scalar, vec![(0, 0, 10, 50, None)]);
    // 26 - 10 misses the cutoff, but 26 is the best block maximum of its range
    assert_eq!(block, vec![(0, 0, 10, 50, None), (20, 20, 14, 16, None)]);
}

/// Random query, and a subject derived from it by substitutions, indels and flanks
fn related_pair(rng: &mut StdRng) -> (Vec<u8>, Vec<u8>) {
    let query: Vec<u8> = (0..rng.random_range(20..160))
        .map(|_| rng.random_range(0..20u8))
        .collect();

    let mut subject: Vec<u8> = (0..rng.random_range(0..30))
        .map(|_| rng.random_range(0..20u8))
        .collect();
    for &letter in &query {
        match rng.random_range(0..100) {
            0..25 => subject.push(rng.random_range(0..20u8)),
            25..29 => {}
            29..33 => subject.extend([letter, rng.random_range(0..20u8)]),
            _ => subject.push(letter),
        }
    }
    subject.extend((0..rng.random_range(0..30)).map(|_| rng.random_range(0..20u8)));
    (query, subject)
}

/// Primary segments scoring below the cutoff were reported for ending on the best block
/// maximum of their range, so their last cell holds the maximum of its block. Saturated
/// diagonals are recomputed exactly and skipped.
fn check_below_cutoff(
    query: &[u8],
    subject: &[u8],
    matrix: &SubstitutionMatrix,
    config: &Config,
    nodes: &[DiagonalNode],
) {
    let geometry = BandGeometry::new(
        query.len(),
        subject.len(),
        1 - subject.len() as i32,
        query.len() as i32,
        config.block_len,
    )
    .unwrap();
    let mut session = ScanSession::new(config, geometry);
    session.scan(&VectorScanner::new(), &ScoreProfile::new(query, matrix), subject);
    let grids = session.grids();
    let saturation = u8::MAX as i32 - matrix.bias();

    for node in nodes {
        let s = node.segment;
        if node.link_idx.is_some() || s.score >= config.min_diag_score {
            continue;
        }
        let o = geometry.offset(s.diag()) as usize;
        if grids.sv_max[o] as i32 >= saturation {
            continue;
        }
        let col = (s.subject_end() - 1 - geometry.j_begin) as usize;
        let block = col / config.block_len as usize;
        assert_eq!(
            grids.score_buf.get(o, col),
            grids.local_max.get(o, block),
            "{s} does not end on its block maximum"
        );
    }
}

#[test]
fn test_segment_invariants() {
    let mut rng = StdRng::seed_from_u64(19);
    let matrix = SubstitutionMatrix::blosum62();

    for fast in [false, true] {
        let config = Config {
            fast,
            ..Config::default()
        };
        for _ in 0..60 {
            let (query, subject) = related_pair(&mut rng);
            if subject.is_empty() {
                continue;
            }
            let nodes = run(&query, &subject, &matrix, &config);

            let mut by_diag: BTreeMap<i32, Vec<DiagonalSegment>> = BTreeMap::new();
            for node in &nodes {
                let s = node.segment;
                assert!(s.len > 0 && s.score > 0, "{s}");
                assert!(s.i >= 0 && s.query_end() <= query.len() as i32, "{s}");
                assert!(s.j >= 0 && s.subject_end() <= subject.len() as i32, "{s}");
                by_diag.entry(s.diag()).or_default().push(s);
            }
            check_below_cutoff(&query, &subject, &matrix, &config, &nodes);

            for segments in by_diag.values_mut() {
                segments.sort_by_key(|s| s.j);
                for pair in segments.windows(2) {
                    assert!(
                        pair[0].subject_end() <= pair[1].j,
                        "{} overlaps {}",
                        pair[0],
                        pair[1]
                    );
                }
            }

            // identical results from a fresh run
            assert_eq!(nodes, run(&query, &subject, &matrix, &config));
        }
    }
}

#[test]
fn test_scanners_give_same_segments() {
    let mut rng = StdRng::seed_from_u64(7);
    let matrix = SubstitutionMatrix::blosum62();
    let config = Config::default();

    for _ in 0..20 {
        let (query, subject) = related_pair(&mut rng);
        if subject.is_empty() {
            continue;
        }
        let profile = ScoreProfile::new(&query, &matrix);
        let band = 1 - subject.len() as i32..query.len() as i32;
        let vector = scan_diags(
            &query,
            &subject,
            &profile,
            &matrix,
            band.clone(),
            &config,
            &VectorScanner::new(),
        );
        let scalar = scan_diags(
            &query,
            &subject,
            &profile,
            &matrix,
            band,
            &config,
            &ScalarScanner,
        );
        assert_eq!(vector, scalar);
    }
}
