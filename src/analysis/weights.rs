//! Contiguity weights for square lattices
//!
//! Cells are addressed in row-major order (`index = row * side + col`), the same
//! order in which [`crate::spatial::Grid::row_major`] flattens a grid. Neighbor
//! lists are kept sorted so membership tests can binary search.

use crate::io::configuration::{MAX_LATTICE_SIDE, MIN_LATTICE_SIDE};
use crate::io::error::{MoranError, Result};
use serde::Serialize;

const ROOK_OFFSETS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

const QUEEN_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Neighbor relation between lattice cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Contiguity {
    /// Cells sharing an edge (up to four neighbors)
    #[default]
    Rook,
    /// Cells sharing an edge or a corner (up to eight neighbors)
    Queen,
}

impl Contiguity {
    const fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Self::Rook => &ROOK_OFFSETS,
            Self::Queen => &QUEEN_OFFSETS,
        }
    }
}

/// Scaling applied to each cell's outgoing weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WeightTransform {
    /// Every link weighs one
    #[default]
    Binary,
    /// Each cell's weights sum to one
    #[value(name = "row")]
    RowStandardized,
}

/// Spatial weights of an N×N lattice
///
/// Immutable once built and shared read-only between every grid of the same
/// side length. Links are stored in compressed rows: the neighbors of cell `i`
/// occupy `indices[offsets[i]..offsets[i + 1]]`, with their weights at the same
/// positions of `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeWeights {
    side: usize,
    contiguity: Contiguity,
    transform: WeightTransform,
    offsets: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f64>,
    s0: f64,
    s1: f64,
    s2: f64,
}

impl LatticeWeights {
    /// Binary rook weights for a lattice of side `side`
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` if `side` is below 2 or above the supported maximum
    pub fn new(side: usize) -> Result<Self> {
        Self::with_options(side, Contiguity::Rook, WeightTransform::Binary)
    }

    /// Weights for a lattice of side `side` with explicit contiguity and transform
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` if `side` is below 2 or above the supported maximum
    pub fn with_options(
        side: usize,
        contiguity: Contiguity,
        transform: WeightTransform,
    ) -> Result<Self> {
        if !(MIN_LATTICE_SIDE..=MAX_LATTICE_SIDE).contains(&side) {
            return Err(MoranError::InvalidDimension {
                side,
                min: MIN_LATTICE_SIDE,
                max: MAX_LATTICE_SIDE,
            });
        }

        let (offsets, indices) = build_links(side, contiguity);

        // Every cell of a lattice with side >= 2 has at least two neighbors
        let mut values = Vec::with_capacity(indices.len());
        for span in offsets.windows(2) {
            let &[start, end] = span else {
                continue;
            };
            let cardinality = end - start;
            let weight = match transform {
                WeightTransform::Binary => 1.0,
                WeightTransform::RowStandardized => 1.0 / cardinality as f64,
            };
            values.extend(std::iter::repeat_n(weight, cardinality));
        }

        let mut lattice = Self {
            side,
            contiguity,
            transform,
            offsets,
            indices,
            values,
            s0: 0.0,
            s1: 0.0,
            s2: 0.0,
        };
        lattice.compute_sums();
        Ok(lattice)
    }

    fn compute_sums(&mut self) {
        let mut s0 = 0.0_f64;
        let mut s1 = 0.0_f64;
        let mut incoming = vec![0.0_f64; self.cell_count()];

        for (i, j, w_ij) in self.pairs() {
            s0 += w_ij;
            let w_ji = self.weight(j, i);
            s1 += (w_ij + w_ji).powi(2);
            if let Some(total) = incoming.get_mut(j) {
                *total += w_ij;
            }
        }

        let s2 = incoming
            .iter()
            .enumerate()
            .map(|(i, &in_sum)| (self.weights(i).iter().sum::<f64>() + in_sum).powi(2))
            .sum::<f64>();

        self.s0 = s0;
        self.s1 = 0.5 * s1;
        self.s2 = s2;
    }

    // Link positions of `index`, empty when out of range
    fn span(&self, index: usize) -> std::ops::Range<usize> {
        match (self.offsets.get(index), self.offsets.get(index + 1)) {
            (Some(&start), Some(&end)) => start..end,
            _ => 0..0,
        }
    }

    /// Side length N
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Number of cells (N²)
    pub const fn cell_count(&self) -> usize {
        self.side * self.side
    }

    /// Neighbor relation used to build the lattice
    pub const fn contiguity(&self) -> Contiguity {
        self.contiguity
    }

    /// Weight scaling applied at construction
    pub const fn transform(&self) -> WeightTransform {
        self.transform
    }

    /// Sorted neighbor indices of `index`, empty when out of range
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.indices.get(self.span(index)).unwrap_or_default()
    }

    /// Weights aligned with [`LatticeWeights::neighbors`]
    pub fn weights(&self, index: usize) -> &[f64] {
        self.values.get(self.span(index)).unwrap_or_default()
    }

    /// Number of neighbors of `index`
    pub fn cardinality(&self, index: usize) -> usize {
        self.span(index).len()
    }

    /// Whether `a` and `b` are linked
    pub fn is_neighbor(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Weight of the link from `from` to `to`, zero when they are not linked
    pub fn weight(&self, from: usize, to: usize) -> f64 {
        self.neighbors(from)
            .binary_search(&to)
            .ok()
            .and_then(|position| self.weights(from).get(position).copied())
            .unwrap_or(0.0)
    }

    /// Row-major index of (`row`, `col`)
    pub const fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.side && col < self.side {
            Some(row * self.side + col)
        } else {
            None
        }
    }

    /// (`row`, `col`) of a row-major index
    pub const fn position(&self, index: usize) -> Option<(usize, usize)> {
        if index < self.cell_count() {
            Some((index / self.side, index % self.side))
        } else {
            None
        }
    }

    /// Sum of all weights (S0)
    pub const fn total_weight(&self) -> f64 {
        self.s0
    }

    /// Half the sum of squared symmetric link weights (S1)
    pub const fn s1(&self) -> f64 {
        self.s1
    }

    /// Sum over cells of squared outgoing plus incoming weight (S2)
    pub const fn s2(&self) -> f64 {
        self.s2
    }

    /// Number of ordered neighbor pairs
    pub fn link_count(&self) -> usize {
        self.indices.len()
    }

    /// Every ordered link as (`from`, `to`, `weight`)
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.cell_count()).flat_map(move |i| {
            self.neighbors(i)
                .iter()
                .zip(self.weights(i))
                .map(move |(&j, &w_ij)| (i, j, w_ij))
        })
    }

    /// Weighted sum of neighbor values for every cell
    ///
    /// Cells beyond the end of `values` contribute zero.
    pub fn lag(&self, values: &[f64]) -> Vec<f64> {
        (0..self.cell_count())
            .map(|i| {
                self.neighbors(i)
                    .iter()
                    .zip(self.weights(i))
                    .map(|(&j, &w_ij)| w_ij * values.get(j).copied().unwrap_or(0.0))
                    .sum()
            })
            .collect()
    }
}

// Row offsets and flattened neighbor indices in row-major cell order
fn build_links(side: usize, contiguity: Contiguity) -> (Vec<usize>, Vec<usize>) {
    let offsets_table = contiguity.offsets();
    let cells = side * side;
    let mut offsets = Vec::with_capacity(cells + 1);
    let mut indices = Vec::with_capacity(cells * offsets_table.len());
    offsets.push(0);

    for row in 0..side {
        for col in 0..side {
            indices.extend(offsets_table.iter().filter_map(|&(dr, dc)| {
                let r = row.checked_add_signed(dr)?;
                let c = col.checked_add_signed(dc)?;
                (r < side && c < side).then_some(r * side + c)
            }));
            offsets.push(indices.len());
        }
    }

    (offsets, indices)
}
