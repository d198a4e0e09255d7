//! Square sample grids extracted from landscape images
//!
//! A `Grid` is the only input shape the statistic accepts: an N×N matrix of
//! finite values with N of at least two. Every constructor validates these
//! conditions, so downstream code can index without re-checking.

use ndarray::{Array2, ArrayD, Ix2};
use num_traits::AsPrimitive;

use crate::io::configuration::{MAX_LATTICE_SIDE, MIN_LATTICE_SIDE};
use crate::io::error::{MoranError, Result, invalid_input};

/// Validated square matrix of channel intensities
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    values: Array2<f64>,
}

impl Grid {
    /// Wrap a two-dimensional array after checking the grid contract
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The array is not square (`InvalidInput`)
    /// - The side is smaller than two (`InvalidDimension`)
    /// - Any cell is NaN or infinite (`InvalidInput`)
    pub fn new(values: Array2<f64>) -> Result<Self> {
        let (rows, cols) = values.dim();
        if rows != cols {
            return Err(invalid_input(&format!(
                "grid must be square, got {rows}x{cols}"
            )));
        }

        if rows < MIN_LATTICE_SIDE {
            return Err(MoranError::InvalidDimension {
                side: rows,
                min: MIN_LATTICE_SIDE,
                max: MAX_LATTICE_SIDE,
            });
        }

        if let Some(((row, col), value)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid_input(&format!(
                "cell ({row}, {col}) holds non-finite value {value}"
            )));
        }

        Ok(Self { values })
    }

    /// Convert raw channel samples of any primitive numeric type
    ///
    /// # Errors
    ///
    /// Same conditions as [`Grid::new`]
    pub fn from_samples<T>(samples: &Array2<T>) -> Result<Self>
    where
        T: AsPrimitive<f64>,
    {
        Self::new(samples.mapv(|sample| sample.as_()))
    }

    /// Accept an array of unknown dimensionality, rejecting anything but 2-D
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the array is not two-dimensional, otherwise
    /// the same conditions as [`Grid::new`]
    pub fn from_dyn(values: ArrayD<f64>) -> Result<Self> {
        let ndim = values.ndim();
        let values = values
            .into_dimensionality::<Ix2>()
            .map_err(|e| invalid_input(&format!("expected a 2-d array, got {ndim}-d ({e})")))?;
        Self::new(values)
    }

    /// Build a grid from nested rows
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if rows differ in length, otherwise the same
    /// conditions as [`Grid::new`]
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());

        let mut flat = Vec::with_capacity(height * width);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(invalid_input(&format!(
                    "row {index} has {} cells, expected {width}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }

        let values = Array2::from_shape_vec((height, width), flat)
            .map_err(|e| invalid_input(&e.to_string()))?;
        Self::new(values)
    }

    /// Side length N of the N×N grid
    pub fn side(&self) -> usize {
        self.values.nrows()
    }

    /// Number of cells (N²)
    pub fn cell_count(&self) -> usize {
        self.values.len()
    }

    /// Underlying matrix
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Value at (`row`, `col`), if in range
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get([row, col]).copied()
    }

    /// Cell values flattened in row-major order, aligned with lattice indexing
    pub fn row_major(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Arithmetic mean of all cells
    pub fn mean(&self) -> f64 {
        self.values.sum() / self.cell_count() as f64
    }
}
