//! Elevation matrix.

/// Row-major matrix of elevation values.
///
/// Row 0 is the northern edge of the terrain and column 0 its western edge.
/// Dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Elevation values in row-major order.
    data: Vec<f64>,
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
}

impl Grid {
    /// Allocate a zero-filled grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Build a grid from row-major values.
    ///
    /// Returns `None` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        (rows.checked_mul(cols) == Some(data.len())).then_some(Self { data, rows, cols })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the value at `(row, col)`, or `None` if out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.index(row, col).map(|idx| self.data[idx])
    }

    /// Set the value at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of range.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let idx = self.index(row, col).unwrap_or_else(|| {
            panic!(
                "cell ({}, {}) out of range for {}x{} grid",
                row, col, self.rows, self.cols
            )
        });
        self.data[idx] = value;
    }

    /// One row of values, west to east.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Iterate over rows, north to south.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.cols.max(1))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Multiply every cell by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.data {
            *value *= factor;
        }
    }

    /// Minimum and maximum cell values, or `None` for an empty grid.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        if self.data.is_empty() {
            return None;
        }
        let min = self.data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// Rescale values linearly to [0, 1].
    ///
    /// A constant grid becomes all zeros.
    pub fn normalize(&mut self) {
        let Some((min, max)) = self.min_max() else {
            return;
        };
        let range = max - min;
        if range > 0.0 {
            for value in &mut self.data {
                *value = (*value - min) / range;
            }
        } else {
            self.data.fill(0.0);
        }
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}
