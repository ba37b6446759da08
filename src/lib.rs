//! Flow-LISA clustering of origin-destination flows and Coulter supply-demand inequity
//!
//! Flows between regions are weighted by the inverse of their combined
//! origin and destination distances to form a spatial lag, scored against
//! their own intensity, and labelled HH/HL/LH/LL or NS. A separate pipeline
//! compares housing supply with demand shares per region.

#![forbid(unsafe_code)]

/// Spatial lag, Flow-LISA classification and equity indices
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Descriptive statistics shared by the analyses
pub mod math;
/// Region distance matrix and flow table
pub mod spatial;

pub use analysis::lisa::{FlowLisa, LisaConfig, run_flow_lisa};
pub use io::error::{AnalysisError, Result};
