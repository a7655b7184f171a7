use crate::r#const::LANES;

/// Dense grid over `(diagonal offset, column)`.
///
/// Storage is column-major so that the cells of consecutive diagonals at one column are
/// contiguous, which lets a lane group load and store a whole column with one vector op.
#[derive(Debug, Clone, Default)]
pub struct Band<T> {
    data: Vec<T>,
    diags: usize,
    cols: usize,
}

impl<T: Copy + Default> Band<T> {
    pub fn new(diags: usize, cols: usize) -> Self {
        let mut band = Self {
            data: vec![],
            diags: 0,
            cols: 0,
        };
        band.init(diags, cols);
        band
    }

    /// Resizes the grid if needed and resets every cell
    pub fn init(&mut self, diags: usize, cols: usize) {
        self.diags = diags;
        self.cols = cols;
        self.data.clear();
        self.data.resize(diags * cols, T::default());
    }

    #[inline(always)]
    pub fn diags(&self) -> usize {
        self.diags
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn get(&self, o: usize, col: usize) -> T {
        debug_assert!(o < self.diags && col < self.cols, "({o}, {col}) out of band");
        self.data[col * self.diags + o]
    }

    #[inline(always)]
    pub fn set(&mut self, o: usize, col: usize, value: T) {
        debug_assert!(o < self.diags && col < self.cols, "({o}, {col}) out of band");
        self.data[col * self.diags + o] = value;
    }

    /// Sets columns `[begin, end)` of diagonal `o`
    pub fn fill(&mut self, o: usize, begin: usize, end: usize, value: T) {
        for col in begin..end {
            self.set(o, col, value);
        }
    }

    /// The `LANES` cells of diagonals `o..o + LANES` at `col`
    #[inline(always)]
    pub fn lanes_mut(&mut self, o: usize, col: usize) -> &mut [T] {
        debug_assert!(o + LANES <= self.diags && col < self.cols);
        let start = col * self.diags + o;
        &mut self.data[start..start + LANES]
    }

    pub fn diag(&self, o: usize) -> Diag<'_, T> {
        assert!(o < self.diags, "diagonal offset {o} out of band");
        Diag { band: self, o }
    }
}

/// Read-only view of one diagonal, indexed by column
#[derive(Debug, Clone, Copy)]
pub struct Diag<'a, T> {
    band: &'a Band<T>,
    o: usize,
}

impl<T: Copy + Default> Diag<'_, T> {
    #[inline(always)]
    pub fn at(&self, col: i32) -> T {
        debug_assert!(col >= 0, "negative column {col}");
        self.band.get(self.o, col as usize)
    }
}

/// Position of a band of diagonals relative to the query and subject.
///
/// Diagonal offset `o` is diagonal `d_begin + o`. Column `c` of the band grids is subject
/// position `j_begin + c`, where diagonal offset `o` meets query position
/// `i_begin + o + c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandGeometry {
    pub d_begin: i32,
    pub d_end: i32,
    pub i_begin: i32,
    pub j_begin: i32,
    pub j_end: i32,
    pub query_len: i32,
    pub subject_len: i32,
    pub block_len: i32,
}

impl BandGeometry {
    /// Clamps `[d_begin, d_end)` to the diagonals that touch both sequences and widens
    /// the band to a multiple of the lane width. Returns `None` when nothing is left to
    /// scan.
    pub fn new(
        query_len: usize,
        subject_len: usize,
        d_begin: i32,
        d_end: i32,
        block_len: i32,
    ) -> Option<Self> {
        if query_len == 0 || subject_len == 0 {
            return None;
        }
        let (query_len, subject_len) = (query_len as i32, subject_len as i32);

        let d_begin = d_begin.max(-(subject_len - 1));
        let d_end = d_end.min(query_len);
        if d_begin >= d_end {
            return None;
        }

        let lanes = LANES as i32;
        let d_end = d_begin + (d_end - d_begin + lanes - 1) / lanes * lanes;
        let band = d_end - d_begin;
        let i_begin = (d_end - 1).max(0) - band + 1;
        let j_begin = i_begin - d_begin;
        let j_end = (query_len - d_begin).min(subject_len);

        Some(Self {
            d_begin,
            d_end,
            i_begin,
            j_begin,
            j_end,
            query_len,
            subject_len,
            block_len,
        })
    }

    #[inline(always)]
    pub fn band(&self) -> usize {
        (self.d_end - self.d_begin) as usize
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        (self.j_end - self.j_begin) as usize
    }

    #[inline(always)]
    pub fn blocks(&self) -> usize {
        self.cols().div_ceil(self.block_len as usize)
    }

    #[inline(always)]
    pub fn diagonal(&self, o: i32) -> i32 {
        self.d_begin + o
    }

    #[inline(always)]
    pub fn offset(&self, diagonal: i32) -> i32 {
        diagonal - self.d_begin
    }

    #[inline(always)]
    pub fn contains(&self, diagonal: i32) -> bool {
        diagonal >= self.d_begin && diagonal < self.d_end
    }

    /// First subject position of diagonal offset `o`
    #[inline(always)]
    pub fn dj0(&self, o: i32) -> i32 {
        (-(self.d_begin + o)).max(0)
    }

    /// One past the last subject position of diagonal offset `o`
    #[inline(always)]
    pub fn dj1(&self, o: i32) -> i32 {
        (self.query_len - (self.d_begin + o)).min(self.subject_len)
    }
}

/// Grids populated by a band scanner
#[derive(Debug, Clone, Default)]
pub struct BandGrids {
    /// Raw biased running score per cell
    pub score_buf: Band<u8>,
    /// Running score maximum per block of `block_len` columns
    pub local_max: Band<u8>,
    /// Maximum over the whole diagonal
    pub sv_max: Vec<u8>,
}

impl BandGrids {
    pub fn new(geometry: &BandGeometry) -> Self {
        let mut grids = Self::default();
        grids.init(geometry);
        grids
    }

    /// Shapes the grids for `geometry` and zeroes them, keeping the allocations
    pub fn init(&mut self, geometry: &BandGeometry) {
        self.score_buf.init(geometry.band(), geometry.cols());
        self.local_max.init(geometry.band(), geometry.blocks());
        self.sv_max.clear();
        self.sv_max.resize(geometry.band(), 0);
    }
}
