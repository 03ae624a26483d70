use std::ops::{Index, IndexMut};

/// Row-major 2D buffer addressed by `(row, col)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane2<T> {
    values: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Plane2<T> {
    pub fn new(rows: usize, cols: usize, values: Vec<T>) -> Self {
        assert_eq!(
            values.len(),
            rows * cols,
            "values length must equal rows * cols"
        );
        Self { values, rows, cols }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            Some(&self.values[row * self.cols + col])
        } else {
            None
        }
    }

    #[inline]
    pub fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    /// Inverse of [`Plane2::offset`].
    #[inline]
    pub fn coords(&self, offset: usize) -> (usize, usize) {
        debug_assert!(offset < self.values.len());
        (offset / self.cols, offset % self.cols)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    #[inline]
    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.values[start..start + self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics; a zero-column plane has no rows worth yielding
        self.values.chunks(self.cols.max(1))
    }
}

impl<T: Clone> Plane2<T> {
    pub fn new_filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            values: vec![value; rows * cols],
            rows,
            cols,
        }
    }
}

impl<T: Default + Clone> Plane2<T> {
    pub fn new_default(rows: usize, cols: usize) -> Self {
        Self::new_filled(rows, cols, T::default())
    }
}

impl<T> Index<(usize, usize)> for Plane2<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        debug_assert!(col < self.cols, "col {} out of range {}", col, self.cols);
        &self.values[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Plane2<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        debug_assert!(col < self.cols, "col {} out of range {}", col, self.cols);
        &mut self.values[row * self.cols + col]
    }
}
