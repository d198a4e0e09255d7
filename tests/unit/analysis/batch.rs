//! Tests for order-preserving batch evaluation

#[cfg(test)]
mod tests {
    use moranscape::analysis::batch::{
        BatchOptions, analyze_grids, check_uniform_side, moran_batch, summarize_batch,
    };
    use moranscape::analysis::weights::{Contiguity, WeightTransform};
    use moranscape::{Grid, LatticeWeights, MoranError, moran_i};
    use ndarray::Array2;

    fn sample_grids(side: usize, count: usize) -> Vec<Grid> {
        (0..count)
            .map(|k| {
                Grid::new(Array2::from_shape_fn((side, side), |(r, c)| {
                    ((r * (k + 1) + c * (k + 2)) % 7) as f64
                }))
                .unwrap()
            })
            .collect()
    }

    // Tests that sequential and parallel evaluation agree value for value and in order
    // Verified by collecting parallel results through an unordered channel
    #[test]
    fn test_parallel_matches_sequential_order() {
        let weights = LatticeWeights::new(9).unwrap();
        let grids = sample_grids(9, 24);

        let sequential = moran_batch(&grids, &weights, false).unwrap();
        let parallel = moran_batch(&grids, &weights, true).unwrap();

        assert_eq!(sequential.len(), grids.len());
        assert_eq!(sequential, parallel);
        for (grid, value) in grids.iter().zip(&sequential) {
            assert!((moran_i(grid, &weights).unwrap() - value).abs() < f64::EPSILON);
        }
    }

    // Tests that one grid of a different side aborts the batch
    // Verified by skipping the uniform side check
    #[test]
    fn test_mixed_sides_abort() {
        let weights = LatticeWeights::new(6).unwrap();
        let mut grids = sample_grids(6, 3);
        grids.extend(sample_grids(5, 1));

        assert!(matches!(
            moran_batch(&grids, &weights, true),
            Err(MoranError::DimensionMismatch {
                expected: 6,
                found: 5
            })
        ));
        assert!(check_uniform_side(&grids[..3], 6).is_ok());
    }

    // Tests that analyze_grids sizes weights from the first grid
    // Verified by sizing weights from the last grid
    #[test]
    fn test_analyze_grids_uses_first_side() {
        let grids = sample_grids(7, 4);
        let values =
            analyze_grids(&grids, Contiguity::Rook, WeightTransform::Binary, false).unwrap();
        assert_eq!(values.len(), 4);

        let mut mixed = sample_grids(7, 2);
        mixed.extend(sample_grids(8, 1));
        assert!(matches!(
            analyze_grids(&mixed, Contiguity::Rook, WeightTransform::Binary, false),
            Err(MoranError::DimensionMismatch {
                expected: 7,
                found: 8
            })
        ));
    }

    // Tests that an empty batch yields an empty result
    // Verified by indexing the first grid unconditionally
    #[test]
    fn test_empty_batch() {
        let values = analyze_grids(&[], Contiguity::Queen, WeightTransform::Binary, true).unwrap();
        assert!(values.is_empty());
    }

    // Tests that a degenerate grid fails the whole batch
    // Verified by filtering out failing grids
    #[test]
    fn test_degenerate_grid_aborts() {
        let weights = LatticeWeights::new(4).unwrap();
        let mut grids = sample_grids(4, 2);
        grids.push(Grid::new(Array2::zeros((4, 4))).unwrap());

        assert!(matches!(
            moran_batch(&grids, &weights, false),
            Err(MoranError::DegenerateInput { .. })
        ));
    }

    // Tests that grid k of a batch is permuted with seed + k in both modes
    // Verified by reusing the base seed for every grid
    #[test]
    fn test_summarize_batch_offsets_seeds() {
        let weights = LatticeWeights::new(5).unwrap();
        let grids = sample_grids(5, 3);
        let options = BatchOptions {
            parallel: false,
            permutations: 19,
            seed: 100,
        };

        let sequential = summarize_batch(&grids, &weights, options).unwrap();
        let parallel = summarize_batch(
            &grids,
            &weights,
            BatchOptions {
                parallel: true,
                ..options
            },
        )
        .unwrap();

        assert_eq!(sequential, parallel);
        let seeds: Vec<u64> = sequential
            .iter()
            .filter_map(|moran| moran.permutation.map(|p| p.seed))
            .collect();
        assert_eq!(seeds, vec![100, 101, 102]);
    }

    // Tests that the default options skip permutations
    // Verified by defaulting to a nonzero permutation count
    #[test]
    fn test_default_options_skip_permutations() {
        let weights = LatticeWeights::new(5).unwrap();
        let results = summarize_batch(&sample_grids(5, 2), &weights, BatchOptions::default()).unwrap();

        assert!(results.iter().all(|moran| moran.permutation.is_none()));
        assert!(results.iter().all(|moran| moran.normal.is_some()));
    }
}
