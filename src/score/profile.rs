use super::SubstitutionMatrix;
use crate::r#const::{LANES, PROFILE_PADDING};

/// Biased substitution scores of every letter against every query position.
///
/// Row `letter` holds `score(query[i], letter) + bias` at position `i`, surrounded by
/// `PROFILE_PADDING` zero bytes on both sides. A zero byte behaves like a score of `-bias`
/// in the scanner, which is how lanes outside the query decay to zero.
#[derive(Debug, Clone)]
pub struct ScoreProfile {
    data: Vec<u8>,
    row_len: usize,
    query_len: usize,
    bias: u8,
}

impl ScoreProfile {
    pub fn new(query: &[u8], matrix: &SubstitutionMatrix) -> Self {
        let row_len = query.len() + 2 * PROFILE_PADDING;
        let mut data = vec![0u8; row_len * matrix.size()];

        let bias = matrix.bias();
        for (letter, row) in data.chunks_exact_mut(row_len).enumerate() {
            for (cell, &q) in row[PROFILE_PADDING..].iter_mut().zip(query) {
                *cell = (matrix.score(q, letter as u8) + bias) as u8;
            }
        }

        Self {
            data,
            row_len,
            query_len: query.len(),
            bias: bias as u8,
        }
    }

    #[inline(always)]
    pub fn bias(&self) -> u8 {
        self.bias
    }

    /// Biased scores of `letter` against the `LANES` query positions starting at `i`,
    /// where `i` lies in `[-LANES, query_len]`
    #[inline(always)]
    pub fn lanes(&self, letter: u8, i: i32) -> &[u8] {
        debug_assert!(i >= -(LANES as i32) && i <= self.query_len as i32);
        let start = letter as usize * self.row_len + (i + PROFILE_PADDING as i32) as usize;
        &self.data[start..start + LANES]
    }

    /// Biased score of `letter` against query position `i`, zero in the padding
    #[inline(always)]
    pub fn get(&self, letter: u8, i: i32) -> u8 {
        let pad = PROFILE_PADDING as i32;
        if i < -pad || i >= self.query_len as i32 + pad {
            return 0;
        }
        self.data[letter as usize * self.row_len + (i + pad) as usize]
    }
}
