use crate::error::{Error, Result};

/// Letters of the amino acid alphabet, in the order used by the score tables
pub const AMINO_ACIDS: &[u8; 25] = b"ARNDCQEGHILKMFPSTWYVBJZX*";
/// Letter index of the unknown residue `X`
pub const MASK_LETTER: u8 = 23;

#[rustfmt::skip]
static BLOSUM62: [i8; 25 * 25] = [
    //     A,  R,  N,  D,  C,  Q,  E,  G,  H,  I,  L,  K,  M,  F,  P,  S,  T,  W,  Y,  V,  B,  J,  Z,  X,  *
    /*A*/  4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1, -1, -1, -4,
    /*R*/ -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1, -2,  0, -1, -4,
    /*N*/ -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  4, -3,  0, -1, -4,
    /*D*/ -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4, -3,  1, -1, -4,
    /*C*/  0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -1, -3, -1, -4,
    /*Q*/ -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0, -2,  4, -1, -4,
    /*E*/ -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1, -3,  4, -1, -4,
    /*G*/  0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -4, -2, -1, -4,
    /*H*/ -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0, -3,  0, -1, -4,
    /*I*/ -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3,  3, -3, -1, -4,
    /*L*/ -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4,  3, -3, -1, -4,
    /*K*/ -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0, -3,  1, -1, -4,
    /*M*/ -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3,  2, -1, -1, -4,
    /*F*/ -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3,  0, -3, -1, -4,
    /*P*/ -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -3, -1, -1, -4,
    /*S*/  1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0, -2,  0, -1, -4,
    /*T*/  0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1, -1, -1, -4,
    /*W*/ -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -2, -2, -1, -4,
    /*Y*/ -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -1, -2, -1, -4,
    /*V*/  0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3,  2, -2, -1, -4,
    /*B*/ -2, -1,  4,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4, -3,  0, -1, -4,
    /*J*/ -1, -2, -3, -3, -1, -2, -3, -4, -3,  3,  3, -3,  2,  0, -3, -2, -1, -2, -1,  2, -3,  3, -3, -1, -4,
    /*Z*/ -1,  0,  0,  1, -3,  4,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -2, -2, -2,  0, -3,  4, -1, -4,
    /*X*/ -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -4,
    /***/ -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1,
];

/// Square table of substitution scores over letter indices.
///
/// The bias is the negated minimum entry (floored at zero). Adding it to every score makes
/// all entries representable as unsigned bytes, which is what the vectorized scanner
/// accumulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionMatrix {
    size: usize,
    scores: Vec<i8>,
    bias: i32,
}

impl SubstitutionMatrix {
    pub fn new(size: usize, scores: Vec<i8>) -> Result<Self> {
        if size == 0 || scores.len() != size * size {
            return Err(Error::MatrixShape {
                size,
                len: scores.len(),
            });
        }

        let min = scores.iter().copied().min().unwrap_or(0) as i32;
        let max = scores.iter().copied().max().unwrap_or(0) as i32;
        let bias = (-min).max(0);
        // a biased score of 255 saturates the accumulator in one step
        if max + bias >= u8::MAX as i32 {
            return Err(Error::MatrixRange { min, max });
        }

        Ok(Self { size, scores, bias })
    }

    pub fn blosum62() -> Self {
        Self {
            size: AMINO_ACIDS.len(),
            scores: BLOSUM62.to_vec(),
            bias: 4,
        }
    }

    /// Scores `match_score` for identical letters and `mismatch_score` otherwise
    pub fn uniform(size: usize, match_score: i8, mismatch_score: i8) -> Result<Self> {
        let scores = (0..size * size)
            .map(|idx| {
                if idx / size == idx % size {
                    match_score
                } else {
                    mismatch_score
                }
            })
            .collect();
        Self::new(size, scores)
    }

    #[inline(always)]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        self.scores[a as usize * self.size + b as usize] as i32
    }

    #[inline(always)]
    pub fn bias(&self) -> i32 {
        self.bias
    }

    /// Number of letters in the alphabet
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Fails on the first letter of `sequence` outside the alphabet
    pub fn check_letters(&self, sequence: &[u8]) -> Result<()> {
        match sequence.iter().find(|&&letter| letter as usize >= self.size) {
            Some(&letter) => Err(Error::InvalidLetter {
                letter,
                size: self.size,
            }),
            None => Ok(()),
        }
    }
}

/// Maps amino acid text to letter indices. Unknown letters map to `X`.
pub fn encode(sequence: &[u8]) -> Vec<u8> {
    sequence
        .iter()
        .map(|c| {
            AMINO_ACIDS
                .iter()
                .position(|a| *a == c.to_ascii_uppercase())
                .map_or(MASK_LETTER, |idx| idx as u8)
        })
        .collect()
}
