/// Number of diagonals scored together by one vector register
pub const LANES: usize = 16;

/// Zero bytes added on both sides of every profile row, so that any lane group may read
/// `LANES` consecutive query positions starting anywhere in `[-LANES, qlen]`
pub const PROFILE_PADDING: usize = LANES;

// Tuned thresholds
pub const MIN_DIAG_SCORE: i32 = 19;
pub const MIN_LOW_SCORE: i32 = 13;
pub const BLOCK_LEN: i32 = 16;
pub const GAP_OPEN: i32 = 11;
pub const GAP_EXTEND: i32 = 1;
pub const MAX_DIST: i32 = 60;

/// Margin below the best score at which the scalar fallback closes a segment
pub const XDROP: i32 = 10;
/// Columns probed before the start and after the end of a segment by the end scan
pub const END_SCAN_LEN: i32 = 20;
/// Diagonals probed past the earlier segment, in the opposite direction of the shift
pub const REVERSE_DIAGS: i32 = 2;
