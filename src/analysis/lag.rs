//! Inverse-distance spatial lag over all pairs of flows
//!
//! Flow `j` contributes `Z_j / (d(O_i, O_j) + d(D_i, D_j))` to the lag of
//! flow `i`. Every `j` is visited, `j == i` included; pairs whose combined
//! distance is zero are skipped and counted.

use crate::io::error::Result;
use crate::spatial::distance::{DistanceMatrix, MatrixIndex};
use crate::spatial::flows::FlowTable;

/// Spatial lag of every flow plus bookkeeping for skipped pairs
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialLag {
    /// Lag per flow, in flow table order
    pub values: Vec<f64>,
    /// Number of pairs that contributed to each lag
    pub neighbor_counts: Vec<usize>,
    /// Pairs dropped because their combined distance was zero
    pub skipped_pairs: usize,
}

impl SpatialLag {
    /// Number of flows covered
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no flow is covered
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolved endpoints of one flow
#[derive(Debug, Clone, Copy)]
struct Endpoints {
    origin: MatrixIndex,
    destination: MatrixIndex,
    intensity: f64,
}

/// Compute the spatial lag of every flow
///
/// # Errors
///
/// Returns `RegionOutOfDomain` if any flow references a region outside the
/// matrix; nothing is computed in that case
pub fn compute_spatial_lag(flows: &FlowTable, matrix: &DistanceMatrix) -> Result<SpatialLag> {
    compute_spatial_lag_with_progress(flows, matrix, |_| {})
}

/// Compute the spatial lag of every flow, reporting each finished row
///
/// `on_row` receives the number of rows completed so far.
///
/// # Errors
///
/// Returns `RegionOutOfDomain` if any flow references a region outside the
/// matrix; nothing is computed in that case
pub fn compute_spatial_lag_with_progress(
    flows: &FlowTable,
    matrix: &DistanceMatrix,
    mut on_row: impl FnMut(usize),
) -> Result<SpatialLag> {
    let endpoints = resolve_endpoints(flows, matrix)?;
    let n = endpoints.len();

    let mut values = Vec::with_capacity(n);
    let mut neighbor_counts = Vec::with_capacity(n);
    let mut skipped_pairs = 0_usize;

    for (row, flow_i) in endpoints.iter().enumerate() {
        let mut lag = 0.0;
        let mut neighbors = 0_usize;

        for flow_j in &endpoints {
            let proximity_o = matrix.proximity(flow_i.origin, flow_j.origin);
            let proximity_d = matrix.proximity(flow_i.destination, flow_j.destination);
            let combined = proximity_o + proximity_d;

            if combined == 0.0 {
                skipped_pairs += 1;
                continue;
            }

            lag += flow_j.intensity / combined;
            neighbors += 1;
        }

        values.push(lag);
        neighbor_counts.push(neighbors);
        on_row(row + 1);
    }

    log::debug!(
        "Spatial lag over {n} flows: {} contributing pairs, {skipped_pairs} skipped",
        neighbor_counts.iter().sum::<usize>()
    );

    Ok(SpatialLag {
        values,
        neighbor_counts,
        skipped_pairs,
    })
}

fn resolve_endpoints(flows: &FlowTable, matrix: &DistanceMatrix) -> Result<Vec<Endpoints>> {
    flows
        .iter()
        .map(|flow| -> Result<Endpoints> {
            Ok(Endpoints {
                origin: matrix.resolve(flow.origin)?,
                destination: matrix.resolve(flow.destination)?,
                intensity: flow.intensity,
            })
        })
        .collect()
}
