//! Diagscan finds the ungapped diagonal segments that seed gapped protein alignments. A band
//! of diagonals is scored 16 at a time with saturating byte arithmetic, keeping the raw
//! running score of every cell and the maximum of every block of 16 columns. Segment
//! boundaries are then recovered from the block maxima without rescanning, diagonals whose
//! score saturates the byte accumulator are recomputed exactly, and a linking pass looks
//! for weak fragments on neighbouring diagonals that bridge small insertions and deletions.
//!
//! # Example: scanning one subject
//!
//! ```rust
//! use diagscan::{Config, DiagScanner, SubstitutionMatrix, encode};
//!
//! let query = encode(b"MKTAYIAKQRQISFVKSHFSRQ");
//! let subject = encode(b"GGMKTAYIAKQRQISFVKSHFSRQGG");
//!
//! let mut scanner = DiagScanner::new(&query, &SubstitutionMatrix::blosum62(), &Config::default())?;
//! let nodes = scanner.scan_all(&subject)?;
//!
//! assert!(nodes.iter().any(|node| node.segment.diag() == -2));
//! # Ok::<(), diagscan::Error>(())
//! ```
//!
//! # Example: scanning many subjects
//!
//! ```rust
//! use diagscan::{Config, SubstitutionMatrix, encode, scan_subjects_parallel};
//!
//! let query = encode(b"MKTAYIAKQRQISFVKSHFSRQ");
//! let subjects = [encode(b"MKTAYIAKQRQ"), encode(b"PPPPPPPP"), encode(b"ISFVKSHFSRQ")];
//!
//! let hits = scan_subjects_parallel(&query, &subjects, &SubstitutionMatrix::blosum62(), &Config::default(), 4)?;
//! assert_eq!(hits.len(), 2);
//! # Ok::<(), diagscan::Error>(())
//! ```

use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod band;
mod batch;
mod r#const;
mod error;
pub mod output;
pub mod reconstruct;
pub mod scan;
mod scanner;
pub mod score;
pub mod session;
mod simd;
pub mod window;

pub use batch::{SubjectHits, scan_subjects, scan_subjects_parallel, write_subjects_parallel};
pub use error::{Error, Result};
pub use scanner::DiagScanner;
pub use score::{ScoreProfile, SubstitutionMatrix, encode};

use r#const::*;

/// Ungapped run of residue pairs on one diagonal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiagonalSegment {
    /// Query start position
    pub i: i32,
    /// Subject start position
    pub j: i32,
    pub len: i32,
    pub score: i32,
}

impl DiagonalSegment {
    pub fn new(i: i32, j: i32, len: i32, score: i32) -> Self {
        Self { i, j, len, score }
    }

    /// Query position minus subject position
    #[inline(always)]
    pub fn diag(&self) -> i32 {
        self.i - self.j
    }

    #[inline(always)]
    pub fn query_end(&self) -> i32 {
        self.i + self.len
    }

    #[inline(always)]
    pub fn subject_end(&self) -> i32 {
        self.j + self.len
    }
}

impl fmt::Display for DiagonalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "i={} j={} d={} len={} score={}",
            self.i,
            self.j,
            self.diag(),
            self.len,
            self.score
        )
    }
}

/// Segment found by a band scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiagonalNode {
    pub segment: DiagonalSegment,
    /// For fragments found by the linking pass, index of the node whose probe found them
    pub link_idx: Option<usize>,
}

impl From<DiagonalSegment> for DiagonalNode {
    fn from(segment: DiagonalSegment) -> Self {
        Self {
            segment,
            link_idx: None,
        }
    }
}

impl PartialOrd for DiagonalNode {
    fn partial_cmp(&self, other: &DiagonalNode) -> Option<Ordering> {
        Some(std::cmp::Ord::cmp(self, other))
    }
}
/// Orders by subject end, then diagonal
impl Ord for DiagonalNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segment
            .subject_end()
            .cmp(&other.segment.subject_end())
            .then_with(|| self.segment.diag().cmp(&other.segment.diag()))
            .then_with(|| self.segment.i.cmp(&other.segment.i))
            .then_with(|| self.segment.len.cmp(&other.segment.len))
            .then_with(|| self.segment.score.cmp(&other.segment.score))
            .then_with(|| self.link_idx.cmp(&other.link_idx))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Minimum score of a segment found by the primary pass over the band. Segments
    /// reaching it also anchor the linking pass.
    pub min_diag_score: i32,
    /// Minimum score of the weak fragments found between two anchored segments, and of the
    /// segments recomputed by the scalar fallback outside of fast mode
    pub min_low_score: i32,
    /// Number of columns summarized by one block maximum. Must divide 16.
    pub block_len: i32,
    /// Gap open penalty. Together with the extend penalty, bounds how far from an anchored
    /// segment the end scan looks for shifted continuations.
    pub gap_open: i32,
    /// Gap extend penalty, must be positive
    pub gap_extend: i32,
    /// Maximum subject distance and diagonal distance between two segments for the
    /// linking pass to search for fragments between them
    pub max_dist: i32,
    /// Skip the linking pass and the bookkeeping it needs
    pub fast: bool,
    /// Sort batch results by best score (descending)
    pub sort: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_diag_score: MIN_DIAG_SCORE,
            min_low_score: MIN_LOW_SCORE,
            block_len: BLOCK_LEN,
            gap_open: GAP_OPEN,
            gap_extend: GAP_EXTEND,
            max_dist: MAX_DIST,
            fast: false,
            sort: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.block_len <= 0 || LANES as i32 % self.block_len != 0 {
            return Err(Error::InvalidBlockLen(self.block_len));
        }
        if self.min_low_score <= 0
            || self.min_low_score > self.min_diag_score
            || self.min_diag_score >= u8::MAX as i32
        {
            return Err(Error::InvalidThreshold {
                min_diag_score: self.min_diag_score,
                min_low_score: self.min_low_score,
            });
        }
        if self.gap_open < 0 || self.gap_extend <= 0 {
            return Err(Error::InvalidGapPenalty {
                open: self.gap_open,
                extend: self.gap_extend,
            });
        }
        if self.max_dist < 0 {
            return Err(Error::InvalidMaxDist(self.max_dist));
        }
        Ok(())
    }
}
