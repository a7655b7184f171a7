//! Recovers exact segment boundaries from a diagonal's raw running scores, using the block
//! maxima to decide where to look.
//!
//! Raw scores only drop to zero on a local reset, so a segment ends at the column holding
//! the maximum and starts right after the closest preceding zero (or minimum, when no reset
//! happened since the last extracted segment). Its score is the difference of the two.

use log::trace;

use crate::band::Diag;
use crate::{DiagonalNode, DiagonalSegment};

/// Columns found by [`get_zero_index`] while scanning a window backward
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroIndex {
    /// Closest zero preceding the peak
    pub z0: Option<i32>,
    /// Rightmost zero following the peak
    pub z1: Option<i32>,
    /// Rightmost column holding the maximum
    pub peak: Option<i32>,
}

/// Scans `[begin, end)` backward for the rightmost column equal to `max_score` and the
/// zeros around it
pub fn get_zero_index(d: &Diag<'_, u8>, begin: i32, end: i32, max_score: u8) -> ZeroIndex {
    let mut index = ZeroIndex::default();
    for i in (begin..end).rev() {
        let value = d.at(i);
        if value == 0 && index.z1.is_none() {
            index.z1 = Some(i);
        } else if value == max_score {
            index.peak = Some(i);
            index.z0 = (begin..i).rev().find(|&k| d.at(k) == 0);
            break;
        }
    }
    index
}

/// Window of one diagonal searched by [`get_peak_segments`]
#[derive(Debug, Clone, Copy)]
pub struct PeakWindow {
    /// Block window holding the peak
    pub begin: i32,
    pub end: i32,
    /// Column bound of the forward scan past the peak
    pub limit: i32,
    /// Block maximum of the window
    pub max_score: u8,
    /// Move the peak forward while the raw score stays positive and rises
    pub extend: bool,
}

/// Emits the segment ending at the peak of a block window, then follows the diagonal
/// forward from the peak tracking a low-water mark and emits every later rise above it
/// reaching `cutoff`. Returns the column where the forward scan stopped, or `None` when
/// the window does not contain `max_score`.
pub fn get_peak_segments(
    origin: (i32, i32),
    d: &Diag<'_, u8>,
    window: PeakWindow,
    cutoff: i32,
    diags: &mut Vec<DiagonalNode>,
) -> Option<i32> {
    let index = get_zero_index(d, window.begin, window.end, window.max_score);
    let mut p = index.peak?;
    let zero = index.z0.unwrap_or(window.begin - 1);

    let mut max_score = window.max_score;
    if window.extend {
        let mut q = p + 1;
        while q < window.limit && d.at(q) > 0 {
            if d.at(q) > max_score {
                max_score = d.at(q);
                p = q;
            }
            q += 1;
        }
    }

    let floor = if zero >= 0 { d.at(zero) as i32 } else { 0 };
    push(
        diags,
        origin,
        zero + 1,
        p - zero,
        max_score as i32 - floor,
    );

    let (mut low, mut low_pos) = (max_score as i32, p);
    let (mut high, mut high_pos) = (0, p);
    p += 1;
    while p < window.limit && d.at(p) > 0 {
        let value = d.at(p) as i32;
        if value < low {
            if high >= cutoff {
                push(diags, origin, low_pos + 1, high_pos - low_pos, high);
            }
            high = 0;
            high_pos = p;
            low = value;
            low_pos = p;
        }
        if value - low > high {
            high = value - low;
            high_pos = p;
        }
        p += 1;
    }
    if high >= cutoff {
        push(diags, origin, low_pos + 1, high_pos - low_pos, high);
    }

    Some(p)
}

/// Column of the first maximum in `[begin, end)`
pub fn get_max_idx(d: &Diag<'_, u8>, begin: i32, end: i32) -> i32 {
    debug_assert!(begin >= 0 && begin < end);
    let (mut idx, mut max) = (begin, d.at(begin));
    for i in begin + 1..end {
        if d.at(i) > max {
            idx = i;
            max = d.at(i);
        }
    }
    idx
}

/// Scans `[begin, end)` backward for the closest zero, falling back to the rightmost
/// minimum. When `begin` does not lie past the diagonal start `d0`, the fallback is the
/// virtual zero at `d0 - 1` instead.
pub fn get_low_idx(d: &Diag<'_, u8>, begin: i32, end: i32, d0: i32) -> i32 {
    let (mut low, mut idx) = (u8::MAX, end);
    for i in (begin..end).rev() {
        let value = d.at(i);
        if value == 0 {
            return i;
        } else if value < low {
            low = value;
            idx = i;
        }
    }
    if begin > d0 { idx } else { d0 - 1 }
}

/// Column range of one diagonal handed to [`get_diag_range`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    pub begin: i32,
    /// Lower bound of the backward search for a segment start
    pub last: i32,
    pub end: i32,
    /// First column of the diagonal
    pub d0: i32,
}

/// Extracts segments from `[begin, end)` right to left: the maximum of the final block
/// ends a segment, the low point found by [`get_low_idx`] starts it, and the range shrinks
/// to the low point. A segment is emitted when it reaches `cutoff`, or when its maximum is
/// `best_score` and its score is positive. Returns the start column of the leftmost
/// emitted segment.
pub fn get_diag_range(
    origin: (i32, i32),
    d: &Diag<'_, u8>,
    range: ColumnRange,
    block_len: i32,
    cutoff: i32,
    best_score: i32,
    diags: &mut Vec<DiagonalNode>,
) -> Option<i32> {
    debug_assert!(range.end >= range.begin && range.begin >= 0);
    let mut z = None;
    let mut end = range.end;
    while end > range.begin {
        let rem = end % block_len;
        let block_begin = end - if rem == 0 { block_len } else { rem };
        let p1 = get_max_idx(d, range.begin.max(block_begin), end);
        let p0 = get_low_idx(d, range.last, p1, range.d0);
        debug_assert!(p1 >= p0 && p1 < end);

        let max = d.at(p1) as i32;
        let score = max - if p0 >= range.d0 { d.at(p0) as i32 } else { 0 };
        if score >= cutoff || (max == best_score && score > 0) {
            push(diags, origin, p0 + 1, p1 - p0, score);
            z = Some(p0 + 1);
        }
        end = p0;
    }
    debug_assert!(z.is_none_or(|z| z >= range.last));
    z
}

fn push(diags: &mut Vec<DiagonalNode>, origin: (i32, i32), col: i32, len: i32, score: i32) {
    let segment = DiagonalSegment::new(origin.0 + col, origin.1 + col, len, score);
    debug_assert!(segment.len > 0 && segment.i >= 0 && segment.j >= 0, "{segment}");
    trace!("segment {segment}");
    diags.push(segment.into());
}
