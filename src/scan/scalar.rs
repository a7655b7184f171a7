use super::BandScanner;
use crate::band::{BandGeometry, BandGrids};
use crate::r#const::{LANES, XDROP};
use crate::score::{ScoreProfile, SubstitutionMatrix};
use crate::{DiagonalNode, DiagonalSegment};

/// Populates the band grids one diagonal at a time with plain byte arithmetic.
///
/// Every diagonal covers the same columns as its lane group does in the vectorized
/// scanner, so the grids come out identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarScanner;

impl BandScanner for ScalarScanner {
    fn scan(
        &self,
        profile: &ScoreProfile,
        subject: &[u8],
        geometry: &BandGeometry,
        grids: &mut BandGrids,
    ) {
        let (j, j_end, bl) = (geometry.j_begin, geometry.j_end, geometry.block_len);
        let bias = profile.bias();

        for o in 0..geometry.band() {
            let group = o - o % LANES;
            let i2 = geometry.i_begin + group as i32;
            let j2_begin = (-(i2 - j + LANES as i32 - 1)).max(j);
            let j2_end = (geometry.query_len - (i2 - j)).min(j_end);
            // query position of this diagonal at column j
            let i = geometry.i_begin + o as i32 - j;

            let (mut v, mut max, mut global_max) = (0u8, 0u8, 0u8);
            let mut col = j2_begin - j;
            for j2 in j2_begin..j2_end {
                let score = profile.get(subject[j2 as usize], i + j2);
                v = v.saturating_add(score).saturating_sub(bias);
                max = max.max(v);
                grids.score_buf.set(o, col as usize, v);

                if col % bl == bl - 1 {
                    global_max = global_max.max(max);
                    grids.local_max.set(o, (col / bl) as usize, max);
                    max = 0;
                }
                col += 1;
            }

            if j2_begin < j2_end && col % bl != 0 {
                global_max = global_max.max(max);
                grids.local_max.set(o, (col / bl) as usize, max);
            }
            grids.sv_max[o] = global_max;
        }
    }
}

/// Best-scoring run of a diagonal window, where `query` and `subject` start at `origin`
pub fn score_diagonal(
    query: &[u8],
    subject: &[u8],
    origin: (i32, i32),
    matrix: &SubstitutionMatrix,
) -> DiagonalSegment {
    let (mut score, mut max_score, mut begin, mut end, mut start) = (0, 0, 0, 0, 0);
    for (i, (&q, &s)) in query.iter().zip(subject).enumerate() {
        let i = i as i32;
        score += matrix.score(q, s);
        if score <= 0 {
            score = 0;
            start = i + 1;
        }
        if score > max_score {
            max_score = score;
            begin = start;
            end = i + 1;
        }
    }
    DiagonalSegment::new(origin.0 + begin, origin.1 + begin, end - begin, max_score)
}

/// Emits every run of a diagonal window scoring at least `cutoff`.
///
/// When a run closes, the stretch between its end and the reset point is scanned again,
/// so a weaker run hiding behind a stronger one is still found.
pub fn score_diagonal_segments(
    query: &[u8],
    subject: &[u8],
    origin: (i32, i32),
    cutoff: i32,
    matrix: &SubstitutionMatrix,
    diags: &mut Vec<DiagonalNode>,
) {
    let len = query.len().min(subject.len());
    let (mut score, mut max_score, mut begin, mut end, mut start) = (0, 0, 0usize, 0usize, 0usize);

    let emit = |begin: usize, end: usize, max_score: i32, reset: usize, diags: &mut Vec<DiagonalNode>| {
        diags.push(
            DiagonalSegment::new(
                origin.0 + begin as i32,
                origin.1 + begin as i32,
                (end - begin) as i32,
                max_score,
            )
            .into(),
        );
        score_diagonal_segments(
            &query[end..reset],
            &subject[end..reset],
            (origin.0 + end as i32, origin.1 + end as i32),
            cutoff,
            matrix,
            diags,
        );
    };

    for i in 0..len {
        score += matrix.score(query[i], subject[i]);
        if score <= 0 {
            if max_score >= cutoff {
                emit(begin, end, max_score, i, diags);
                max_score = 0;
            }
            score = 0;
            start = i + 1;
        } else if score > max_score {
            max_score = score;
            begin = start;
            end = i + 1;
        }
    }

    if max_score >= cutoff {
        emit(begin, end, max_score, len, diags);
    }
}

/// Emits every run of a diagonal window scoring at least `cutoff`, closing a run as soon
/// as the score falls more than `XDROP` below its maximum
pub fn score_diagonal_xdrop(
    query: &[u8],
    subject: &[u8],
    origin: (i32, i32),
    cutoff: i32,
    matrix: &SubstitutionMatrix,
    diags: &mut Vec<DiagonalNode>,
) {
    let (mut score, mut max_score, mut begin, mut end) = (0, 0, 0, 0);
    let segment = |begin: i32, end: i32, max_score: i32| -> DiagonalNode {
        DiagonalSegment::new(origin.0 + begin, origin.1 + begin, end - begin, max_score).into()
    };

    for (i, (&q, &s)) in query.iter().zip(subject).enumerate() {
        let i = i as i32;
        score += matrix.score(q, s);
        if score <= 0 || max_score - score > XDROP {
            if max_score >= cutoff {
                diags.push(segment(begin, end, max_score));
            }
            score = 0;
            max_score = 0;
            begin = i + 1;
        } else if score > max_score {
            max_score = score;
            end = i + 1;
        }
    }

    if max_score >= cutoff {
        diags.push(segment(begin, end, max_score));
    }
}
