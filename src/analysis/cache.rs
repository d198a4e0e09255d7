use crate::analysis::weights::{Contiguity, LatticeWeights, WeightTransform};
use crate::io::error::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Key identifying one lattice weights structure
///
/// Weights are a pure function of these three values, so equal keys always
/// map to interchangeable structures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct WeightsKey {
    /// Lattice side length
    pub side: usize,
    /// Neighbor relation
    pub contiguity: Contiguity,
    /// Weight scaling
    pub transform: WeightTransform,
}

/// Memoization cache for lattice weights
///
/// Stores previously built weights so that every batch of the same side
/// length shares one immutable instance.
#[derive(Default)]
pub struct WeightsCache {
    /// Key to shared weights mapping
    lattices: HashMap<WeightsKey, Arc<LatticeWeights>>,

    /// Cache performance statistics
    pub stats: CacheStats,
}

/// Performance metrics for cache effectiveness
#[derive(Default, Debug)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

impl WeightsCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve cached weights or build and store new ones
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` if `side` is out of range; failed builds are
    /// not cached
    pub fn get_or_build(
        &mut self,
        side: usize,
        contiguity: Contiguity,
        transform: WeightTransform,
    ) -> Result<Arc<LatticeWeights>> {
        use std::collections::hash_map::Entry;

        let key = WeightsKey {
            side,
            contiguity,
            transform,
        };

        match self.lattices.entry(key) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                Ok(Arc::clone(entry.get()))
            }
            Entry::Vacant(entry) => {
                let weights = Arc::new(LatticeWeights::with_options(side, contiguity, transform)?);
                self.stats.misses += 1;
                Ok(Arc::clone(entry.insert(weights)))
            }
        }
    }

    /// Number of distinct weights held
    pub fn len(&self) -> usize {
        self.lattices.len()
    }

    /// Whether no weights have been built yet
    pub fn is_empty(&self) -> bool {
        self.lattices.is_empty()
    }
}
