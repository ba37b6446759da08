//! Tests for region identifiers and distance matrix validation

#[cfg(test)]
mod tests {
    use flowlisa::AnalysisError;
    use flowlisa::spatial::{DistanceMatrix, RegionId};
    use ndarray::{Array2, array};

    // Tests 1-based identifiers map onto 0-based matrix rows
    // Verified by removing the offset in matrix_offset
    #[test]
    fn test_region_ids_are_one_based() {
        let matrix = DistanceMatrix::new(array![[0.0, 1.0], [4.0, 0.0]]).unwrap();
        let first = RegionId::new(1).unwrap();
        let second = RegionId::new(2).unwrap();

        assert_eq!(matrix.resolve(first).unwrap().get(), 0);
        assert_eq!(matrix.resolve(second).unwrap().get(), 1);
        assert!((matrix.distance(first, second).unwrap() - 1.0).abs() < f64::EPSILON);
        assert!((matrix.distance(second, first).unwrap() - 4.0).abs() < f64::EPSILON);
    }

    // Tests region 0 is rejected at construction
    // Verified by allowing zero and underflowing the offset
    #[test]
    fn test_region_zero_is_invalid() {
        assert!(matches!(
            RegionId::new(0),
            Err(AnalysisError::InvalidSourceData { .. })
        ));
    }

    // Tests lookups outside the matrix fail instead of returning zero
    // Verified by clamping the offset to the last row
    #[test]
    fn test_out_of_domain_lookup() {
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0]]).unwrap();
        let outside = RegionId::new(2).unwrap();

        let result = matrix.distance(RegionId::new(1).unwrap(), outside);

        assert!(matches!(
            result,
            Err(AnalysisError::RegionOutOfDomain {
                region: 2,
                region_count: 1
            })
        ));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("1..=1"));
    }

    // Tests shape and value validation
    // Verified by skipping the squareness check
    #[test]
    fn test_matrix_validation() {
        assert!(DistanceMatrix::new(Array2::zeros((2, 3))).is_err());
        assert!(DistanceMatrix::new(Array2::zeros((0, 0))).is_err());
        assert!(DistanceMatrix::new(array![[0.0, -1.0], [1.0, 0.0]]).is_err());
        assert!(DistanceMatrix::new(array![[0.0, f64::INFINITY], [1.0, 0.0]]).is_err());
        assert!(DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]).is_err());

        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 2.5], vec![2.5, 0.0]]).unwrap();
        assert_eq!(matrix.region_count(), 2);
        assert_eq!(matrix.values().dim(), (2, 2));
    }

    // Tests an index resolved against a larger matrix reads as NaN
    // Verified by defaulting missing entries to zero
    #[test]
    fn test_foreign_index_reads_nan() {
        let large = DistanceMatrix::from_rows(vec![vec![0.0; 3]; 3]).unwrap();
        let small = DistanceMatrix::from_rows(vec![vec![0.0]]).unwrap();
        let index = large.resolve(RegionId::new(3).unwrap()).unwrap();

        assert!(small.proximity(index, index).is_nan());
    }
}
