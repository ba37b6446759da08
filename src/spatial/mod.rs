//! Spatial inputs of the flow analysis
//!
//! This module contains:
//! - Region identifiers and the region distance matrix
//! - Origin-destination flow records and their table

/// Region identifiers and distance lookups
pub mod distance;
/// Flow records and the ordered flow table
pub mod flows;

pub use distance::{DistanceMatrix, RegionId};
pub use flows::{FlowRecord, FlowTable};
