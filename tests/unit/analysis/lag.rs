//! Tests for the all-pairs inverse-distance spatial lag

#[cfg(test)]
mod tests {
    use flowlisa::AnalysisError;
    use flowlisa::analysis::lag::{compute_spatial_lag, compute_spatial_lag_with_progress};
    use flowlisa::spatial::{DistanceMatrix, FlowRecord, FlowTable};

    fn three_region_matrix() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 1.0],
            vec![2.0, 1.0, 0.0],
        ])
        .unwrap()
    }

    fn seed_flows() -> FlowTable {
        FlowTable::new(vec![
            FlowRecord::new(1, 2, 1.0).unwrap(),
            FlowRecord::new(2, 3, -1.0).unwrap(),
            FlowRecord::new(1, 3, 2.0).unwrap(),
        ])
        .unwrap()
    }

    // Tests lag values of the three-flow fixture against hand-computed sums
    // Verified by dropping the destination term from the combined distance
    #[test]
    fn test_seed_fixture_lags() {
        let lag = compute_spatial_lag(&seed_flows(), &three_region_matrix()).unwrap();

        // lag_0 = -1/(1+1) + 2/(0+1), lag_1 = 1/(1+1) + 2/(1+0), lag_2 = 1/(0+1) - 1/(1+0)
        let expected = [1.5, 2.5, 0.0];
        for (actual, expected) in lag.values.iter().zip(expected) {
            assert!(
                (actual - expected).abs() < 1e-12,
                "Expected lag {expected}, got {actual}"
            );
        }
        assert_eq!(lag.len(), 3);
    }

    // Tests that zero combined distance pairs are skipped and counted
    // Verified by counting skipped pairs as neighbors
    #[test]
    fn test_zero_distance_pairs_are_skipped_and_counted() {
        let lag = compute_spatial_lag(&seed_flows(), &three_region_matrix()).unwrap();

        // Each flow only has zero combined distance to itself
        assert_eq!(lag.skipped_pairs, 3);
        assert_eq!(lag.neighbor_counts, vec![2, 2, 2]);
        assert_eq!(
            lag.skipped_pairs + lag.neighbor_counts.iter().sum::<usize>(),
            9
        );
    }

    // Tests that a flow is compared with itself when its self-distance is nonzero
    // Verified by excluding j == i from the inner loop
    #[test]
    fn test_self_pair_contributes_when_self_distance_nonzero() {
        let matrix = DistanceMatrix::from_rows(vec![vec![2.0]]).unwrap();
        let flows = FlowTable::new(vec![FlowRecord::new(1, 1, 3.0).unwrap()]).unwrap();

        let lag = compute_spatial_lag(&flows, &matrix).unwrap();

        assert!((lag.values[0] - 0.75).abs() < 1e-12);
        assert_eq!(lag.neighbor_counts, vec![1]);
        assert_eq!(lag.skipped_pairs, 0);
    }

    // Tests duplicate OD pairs act as separate observations
    // Verified by deduplicating flows before the pass
    #[test]
    fn test_duplicate_flows_both_contribute() {
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let flows = FlowTable::new(vec![
            FlowRecord::new(1, 2, 1.0).unwrap(),
            FlowRecord::new(2, 1, 4.0).unwrap(),
            FlowRecord::new(2, 1, 4.0).unwrap(),
        ])
        .unwrap();

        let lag = compute_spatial_lag(&flows, &matrix).unwrap();

        // Flow 0 sees both copies of (2,1) at combined distance 2
        assert!((lag.values[0] - 4.0).abs() < 1e-12);
        // The duplicates see each other at distance 0 and flow 0 at distance 2
        assert!((lag.values[1] - 0.5).abs() < 1e-12);
        assert!((lag.values[2] - 0.5).abs() < 1e-12);
    }

    // Tests lag defaults to exactly zero when every pair is skipped
    // Verified by initializing the accumulator to NaN
    #[test]
    fn test_isolated_flow_has_zero_lag() {
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 0.0], vec![0.0, 0.0]]).unwrap();
        let flows = FlowTable::new(vec![
            FlowRecord::new(1, 2, 5.0).unwrap(),
            FlowRecord::new(2, 1, -3.0).unwrap(),
        ])
        .unwrap();

        let lag = compute_spatial_lag(&flows, &matrix).unwrap();

        assert_eq!(lag.values, vec![0.0, 0.0]);
        assert_eq!(lag.skipped_pairs, 4);
    }

    // Tests asymmetric matrices are looked up in flow direction order
    // Verified by transposing the origin lookup
    #[test]
    fn test_asymmetric_matrix_uses_row_then_column() {
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![3.0, 0.0]]).unwrap();
        let flows = FlowTable::new(vec![
            FlowRecord::new(1, 1, 1.0).unwrap(),
            FlowRecord::new(2, 2, 1.0).unwrap(),
        ])
        .unwrap();

        let lag = compute_spatial_lag(&flows, &matrix).unwrap();

        // Flow 0 looks up d(1,2) twice, flow 1 looks up d(2,1) twice
        assert!((lag.values[0] - 0.5).abs() < 1e-12);
        assert!((lag.values[1] - 1.0 / 6.0).abs() < 1e-12);
    }

    // Tests out-of-domain regions fail before any row is computed
    // Verified by resolving endpoints lazily inside the loop
    #[test]
    fn test_region_outside_matrix_fails_fast() {
        let flows = FlowTable::new(vec![
            FlowRecord::new(1, 2, 1.0).unwrap(),
            FlowRecord::new(4, 1, 1.0).unwrap(),
        ])
        .unwrap();
        let mut rows_reported = 0;

        let result =
            compute_spatial_lag_with_progress(&flows, &three_region_matrix(), |rows| {
                rows_reported = rows;
            });

        assert!(matches!(
            result,
            Err(AnalysisError::RegionOutOfDomain {
                region: 4,
                region_count: 3
            })
        ));
        assert_eq!(rows_reported, 0);
    }

    // Tests the progress callback sees every finished row
    // Verified by reporting the row index instead of the finished count
    #[test]
    fn test_progress_callback_reports_each_row() {
        let mut reported = Vec::new();

        compute_spatial_lag_with_progress(&seed_flows(), &three_region_matrix(), |rows| {
            reported.push(rows);
        })
        .unwrap();

        assert_eq!(reported, vec![1, 2, 3]);
    }

    // Tests an empty flow table yields an empty lag
    // Verified by requiring at least one flow
    #[test]
    fn test_empty_flow_table() {
        let lag = compute_spatial_lag(&FlowTable::default(), &three_region_matrix()).unwrap();

        assert!(lag.is_empty());
        assert_eq!(lag.skipped_pairs, 0);
    }
}
