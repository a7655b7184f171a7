use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("block length {0} must be positive and divide the lane width")]
    InvalidBlockLen(i32),

    #[error("invalid thresholds: min_low_score={min_low_score}, min_diag_score={min_diag_score}")]
    InvalidThreshold {
        min_diag_score: i32,
        min_low_score: i32,
    },

    #[error("invalid gap penalties: open={open}, extend={extend}")]
    InvalidGapPenalty { open: i32, extend: i32 },

    #[error("maximum linking distance must not be negative, got {0}")]
    InvalidMaxDist(i32),

    #[error("substitution table has {len} entries, expected {size}x{size}")]
    MatrixShape { size: usize, len: usize },

    #[error("substitution scores span {min}..={max}, which does not fit a biased byte")]
    MatrixRange { min: i32, max: i32 },

    #[error("letter {letter} is outside the {size} letter alphabet")]
    InvalidLetter { letter: u8, size: usize },

    #[error("output write failed: {0}")]
    Io(#[from] std::io::Error),
}
