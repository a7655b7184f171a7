//! Band scanners populate the raw score grid, the block maximum grid and the per-diagonal
//! maxima of a band. The scalar fallbacks recompute single diagonals exactly when the byte
//! accumulator of the vectorized scanner saturates.

use crate::band::{BandGeometry, BandGrids};
use crate::score::ScoreProfile;
#[cfg(target_arch = "x86_64")]
use crate::simd::SSEVector;
use crate::simd::{PortableVector, Vector};

mod scalar;
mod vector;

pub use scalar::{ScalarScanner, score_diagonal, score_diagonal_segments, score_diagonal_xdrop};

pub trait BandScanner {
    /// Fills `grids`, which must be sized for `geometry` and zeroed
    fn scan(
        &self,
        profile: &ScoreProfile,
        subject: &[u8],
        geometry: &BandGeometry,
        grids: &mut BandGrids,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorScanner {
    #[cfg(target_arch = "x86_64")]
    SSE,
    Portable,
}

impl VectorScanner {
    pub fn new() -> Self {
        #[cfg(target_arch = "x86_64")]
        if SSEVector::is_available() {
            return Self::SSE;
        }
        Self::Portable
    }
}

impl Default for VectorScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl BandScanner for VectorScanner {
    fn scan(
        &self,
        profile: &ScoreProfile,
        subject: &[u8],
        geometry: &BandGeometry,
        grids: &mut BandGrids,
    ) {
        match self {
            #[cfg(target_arch = "x86_64")]
            Self::SSE => unsafe { scan_sse(profile, subject, geometry, grids) },
            Self::Portable => unsafe {
                vector::scan_cols::<PortableVector>(profile, subject, geometry, grids)
            },
        }
    }
}

/// # Safety
///
/// Caller must ensure that the target feature `sse2` is available
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn scan_sse(
    profile: &ScoreProfile,
    subject: &[u8],
    geometry: &BandGeometry,
    grids: &mut BandGrids,
) {
    unsafe { vector::scan_cols::<SSEVector>(profile, subject, geometry, grids) }
}
