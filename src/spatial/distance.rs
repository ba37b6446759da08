//! Region identifiers and the region-to-region distance matrix

use crate::io::error::{AnalysisError, Result, invalid_source};
use ndarray::Array2;
use std::fmt;

/// 1-based identifier of an administrative region
///
/// Row and column `k` of a [`DistanceMatrix`] belong to region `k + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u32);

impl RegionId {
    /// Wrap a raw 1-based identifier
    ///
    /// # Errors
    ///
    /// Returns an invalid source data error for the reserved identifier 0
    pub fn new(raw: u32) -> Result<Self> {
        if raw == 0 {
            return Err(invalid_source(&"region identifiers are 1-based, got 0"));
        }
        Ok(Self(raw))
    }

    /// Raw identifier value
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Zero-based matrix row for this region, before domain validation
    const fn matrix_offset(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Row or column of a [`DistanceMatrix`] already checked against its domain
///
/// Only [`DistanceMatrix::resolve`] hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixIndex(usize);

impl MatrixIndex {
    /// Zero-based position in the matrix
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Square matrix of non-negative distances between regions
///
/// Symmetry is not assumed: `distance(a, b)` and `distance(b, a)` are looked
/// up independently.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    values: Array2<f64>,
}

impl DistanceMatrix {
    /// Wrap a square array of distances
    ///
    /// # Errors
    ///
    /// Returns an invalid source data error if the array is empty, not square,
    /// or holds negative or non-finite entries
    pub fn new(values: Array2<f64>) -> Result<Self> {
        let (rows, cols) = values.dim();
        if rows == 0 {
            return Err(invalid_source(&"distance matrix is empty"));
        }
        if rows != cols {
            return Err(invalid_source(&format!(
                "distance matrix must be square, got {rows}x{cols}"
            )));
        }
        if let Some(((row, col), value)) = values
            .indexed_iter()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(invalid_source(&format!(
                "distance between regions {} and {} is {value}; distances must be finite and non-negative",
                row + 1,
                col + 1
            )));
        }
        Ok(Self { values })
    }

    /// Build a matrix from row vectors
    ///
    /// # Errors
    ///
    /// Returns an invalid source data error if rows differ in length or the
    /// result fails the checks of [`Self::new`]
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(invalid_source(&format!(
                "distance matrix row {} has {} entries, expected {n}",
                row + 1,
                values.len()
            )));
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let values = Array2::from_shape_vec((n, n), flat)
            .map_err(|e| invalid_source(&format!("distance matrix shape: {e}")))?;
        Self::new(values)
    }

    /// Number of regions covered by the matrix
    pub fn region_count(&self) -> usize {
        self.values.nrows()
    }

    /// Validate a region against the matrix domain
    ///
    /// # Errors
    ///
    /// Returns `RegionOutOfDomain` if the region has no row in the matrix
    pub fn resolve(&self, region: RegionId) -> Result<MatrixIndex> {
        let offset = region.matrix_offset();
        if offset < self.region_count() {
            Ok(MatrixIndex(offset))
        } else {
            Err(AnalysisError::RegionOutOfDomain {
                region: region.get(),
                region_count: self.region_count(),
            })
        }
    }

    /// Distance from region `a` to region `b`
    ///
    /// # Errors
    ///
    /// Returns `RegionOutOfDomain` if either region has no row in the matrix
    pub fn distance(&self, a: RegionId, b: RegionId) -> Result<f64> {
        let row = self.resolve(a)?;
        let col = self.resolve(b)?;
        Ok(self.proximity(row, col))
    }

    /// Distance between two resolved indices
    ///
    /// Indices from another matrix may fall outside this one; such lookups
    /// yield `NaN` rather than a plausible distance.
    pub fn proximity(&self, a: MatrixIndex, b: MatrixIndex) -> f64 {
        self.values.get([a.0, b.0]).copied().unwrap_or(f64::NAN)
    }

    /// Underlying distance array
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }
}
