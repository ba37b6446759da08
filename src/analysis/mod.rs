//! Flow clustering and supply-demand equity statistics

/// Coulter's inequity index and adjustment coefficient
pub mod equity;
/// Inverse-distance spatial lag over flow pairs
pub mod lag;
/// Flow-LISA scoring, quadrant labelling and significance filtering
pub mod lisa;
