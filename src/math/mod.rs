//! Mathematical utilities for the analyses

/// Mean, sample standard deviation, z-scores and shares
pub mod moments;
