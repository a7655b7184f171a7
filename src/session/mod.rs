//! One band scan: the grids of the band, the active mask guarding them, and the passes that
//! turn them into segments.

use std::ops::Range;

use log::debug;

use crate::band::{BandGeometry, BandGrids};
use crate::reconstruct::{ColumnRange, PeakWindow, get_diag_range, get_peak_segments};
use crate::scan::{BandScanner, score_diagonal_xdrop};
use crate::score::{ScoreProfile, SubstitutionMatrix};
use crate::{Config, DiagonalNode};

mod active;
mod linker;

pub use active::ActiveMask;

/// Scans the diagonals `band` of `query` against `subject` and returns every segment found,
/// primary segments first, followed by the fragments found by the linking pass.
///
/// `profile` must be built from `query` and `matrix`, and every letter must lie below
/// `matrix.size()`. Empty sequences or a band missing both sequences produce no segments.
pub fn scan_diags<S: BandScanner>(
    query: &[u8],
    subject: &[u8],
    profile: &ScoreProfile,
    matrix: &SubstitutionMatrix,
    band: Range<i32>,
    config: &Config,
    scanner: &S,
) -> Vec<DiagonalNode> {
    scan_diags_reusing(&mut None, query, subject, profile, matrix, band, config, scanner)
}

/// Same as [`scan_diags`], running in the buffers of `session` and leaving them there for
/// the next call. The grids grow to the largest band seen and are zeroed before each scan.
#[allow(clippy::too_many_arguments)]
pub fn scan_diags_reusing<S: BandScanner>(
    session: &mut Option<ScanSession>,
    query: &[u8],
    subject: &[u8],
    profile: &ScoreProfile,
    matrix: &SubstitutionMatrix,
    band: Range<i32>,
    config: &Config,
    scanner: &S,
) -> Vec<DiagonalNode> {
    let Some(geometry) = BandGeometry::new(
        query.len(),
        subject.len(),
        band.start,
        band.end,
        config.block_len,
    ) else {
        return vec![];
    };

    let session = session.get_or_insert_with(|| ScanSession::empty(config, geometry));
    session.reset(config, geometry);
    session.scan(scanner, profile, subject);

    let mut diags = vec![];
    let fallback = session.score_band(query, subject, matrix, &mut diags);
    let primary = diags.len();
    if !config.fast {
        session.link(&mut diags);
    }

    debug!(
        "scanned diagonals {}..{}: {} segments, {} linked fragments, {} scalar fallbacks",
        geometry.d_begin,
        geometry.d_end,
        primary,
        diags.len() - primary,
        fallback
    );
    diags
}

/// Grids and bookkeeping of one band scan. [`Self::reset`] prepares the same buffers for
/// the next band.
#[derive(Debug, Clone)]
pub struct ScanSession {
    config: Config,
    geometry: BandGeometry,
    grids: BandGrids,
    active: ActiveMask,
}

impl ScanSession {
    pub fn new(config: &Config, geometry: BandGeometry) -> Self {
        let mut session = Self::empty(config, geometry);
        session.reset(config, geometry);
        session
    }

    fn empty(config: &Config, geometry: BandGeometry) -> Self {
        Self {
            config: config.clone(),
            geometry,
            grids: BandGrids::default(),
            active: ActiveMask::default(),
        }
    }

    /// Reshapes and zeroes the grids and the active mask for `geometry`
    pub fn reset(&mut self, config: &Config, geometry: BandGeometry) {
        self.config.clone_from(config);
        self.geometry = geometry;
        self.grids.init(&geometry);
        self.active.init(geometry.band(), geometry.blocks(), !config.fast);
    }

    pub fn grids(&self) -> &BandGrids {
        &self.grids
    }

    pub fn is_active(&self, o: i32, block: i32) -> bool {
        self.active.is_active(o, block)
    }

    pub fn scan<S: BandScanner>(&mut self, scanner: &S, profile: &ScoreProfile, subject: &[u8]) {
        scanner.scan(profile, subject, &self.geometry, &mut self.grids);
    }

    /// Reconstructs every diagonal whose maximum reaches the primary threshold. Diagonals
    /// that saturated the byte accumulator are recomputed by the scalar fallback and marked
    /// active as a whole. Returns the number of such diagonals.
    pub fn score_band(
        &mut self,
        query: &[u8],
        subject: &[u8],
        matrix: &SubstitutionMatrix,
        diags: &mut Vec<DiagonalNode>,
    ) -> usize {
        let geometry = self.geometry;
        let saturation = u8::MAX as i32 - matrix.bias();
        let cutoff = if self.config.fast {
            self.config.min_diag_score
        } else {
            self.config.min_low_score
        };

        let mut fallback = 0;
        for o in 0..geometry.band() as i32 {
            let max = self.grids.sv_max[o as usize] as i32;
            if max < self.config.min_diag_score {
                continue;
            }

            if max >= saturation {
                let s = (geometry.i_begin + o).min(0);
                let (i0, j0) = (geometry.i_begin + o - s, geometry.j_begin - s);
                score_diagonal_xdrop(
                    &query[i0 as usize..],
                    &subject[j0 as usize..],
                    (i0, j0),
                    cutoff,
                    matrix,
                    diags,
                );
                self.active.set_active(o, 0, geometry.blocks() as i32);
                fallback += 1;
            } else {
                self.get_diag(
                    o,
                    geometry.j_begin,
                    geometry.j_end,
                    self.config.min_diag_score,
                    diags,
                );
            }
        }
        fallback
    }

    /// Extracts the segments of diagonal offset `o` overlapping subject columns
    /// `[j_begin, j_end)` that reach `cutoff`, skipping blocks already active and marking
    /// the blocks of every extracted range active.
    pub fn get_diag(
        &mut self,
        o: i32,
        j_begin: i32,
        j_end: i32,
        cutoff: i32,
        diags: &mut Vec<DiagonalNode>,
    ) {
        let Self {
            geometry,
            grids,
            active,
            ..
        } = self;
        let bl = geometry.block_len;
        let j = geometry.j_begin;
        let origin = (geometry.i_begin + o, j);
        let (j0, j1) = (geometry.dj0(o), geometry.dj1(o));
        let (b0, b1) = ((j0 - j) / bl, (j1 - j + bl - 1) / bl);
        let d = grids.local_max.diag(o as usize);
        let raw = grids.score_buf.diag(o as usize);

        let columns = |begin: i32, last: i32, best: i32| ColumnRange {
            begin: (begin * bl).max(j0 - j),
            last: (last * bl).max(j0 - j),
            end: ((best + 1) * bl).min(j1 - j),
            d0: j0 - j,
        };
        let qualifies = |active: &ActiveMask, p: i32| {
            let max_score = d.at(p) as i32;
            !active.is_active(o, p)
                && max_score >= cutoff
                && (p == 0 || max_score > d.at(p - 1) as i32)
        };

        let mut p = ((j_begin - j) / bl).max(b0);
        let p_end = ((j_end - j + bl - 1) / bl).min(b1);
        let mut last = p;
        while last > b0 && !active.is_active(o, last - 1) {
            last -= 1;
        }

        let (mut begin, mut best, mut best_score) = (None, -1, -1);
        while p < p_end {
            if qualifies(active, p) {
                begin.get_or_insert(p);
                best = p;
                best_score = d.at(p) as i32;
            } else if let Some(range_begin) = begin.take() {
                let range = columns(range_begin, last, best);
                if let Some(z) = get_diag_range(origin, &raw, range, bl, cutoff, best_score, diags)
                {
                    active.set_active(o, z / bl, best + 1);
                    last = best + 1;
                }
                best = -1;
            }
            if active.is_active(o, p) {
                last = p + 1;
            }
            p += 1;
        }

        if let Some(range_begin) = begin {
            if best == p_end - 1 {
                // the run of rising blocks may continue past the requested columns
                while best < b1 && qualifies(active, best) {
                    best += 1;
                }
                best -= 1;
                best_score = d.at(best) as i32;
            }
            let range = columns(range_begin, last, best);
            if let Some(z) = get_diag_range(origin, &raw, range, bl, cutoff, best_score, diags) {
                active.set_active(o, z / bl, best + 1);
            }
        }
    }

    /// Emits the segment ending at the peak of block `block` of diagonal offset `o`,
    /// followed by the later rises above the low-water mark reaching `cutoff`. Returns the
    /// column where the forward scan stopped, or `None` for an empty block.
    pub fn get_block_peaks(
        &self,
        o: i32,
        block: i32,
        cutoff: i32,
        diags: &mut Vec<DiagonalNode>,
    ) -> Option<i32> {
        let geometry = &self.geometry;
        let bl = geometry.block_len;
        let max_score = self.grids.local_max.get(o as usize, block as usize);
        if max_score == 0 {
            return None;
        }

        let limit = geometry.dj1(o) - geometry.j_begin;
        let window = PeakWindow {
            begin: block * bl,
            end: ((block + 1) * bl).min(limit),
            limit,
            max_score,
            extend: true,
        };
        get_peak_segments(
            (geometry.i_begin + o, geometry.j_begin),
            &self.grids.score_buf.diag(o as usize),
            window,
            cutoff,
            diags,
        )
    }
}

#[cfg(test)]
mod tests;
