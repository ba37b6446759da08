//! Flow-LISA scores, quadrant labels and significance filtering
//!
//! Each flow gets a local association score `(Z_i * lag_i) / Z_i^2`, the
//! score is z-scored over all flows (sample standard deviation), and the
//! flow is labelled by the signs of `(Z_i, lag_i)`. Flows whose z-score lies
//! strictly inside `(-threshold, threshold)` are relabelled `NS`.

use crate::analysis::lag::{SpatialLag, compute_spatial_lag_with_progress};
use crate::io::configuration::{
    ASSOCIATION_ZSCORE_COLUMN, LAG_COLUMN, LOCAL_ASSOCIATION_COLUMN, NOT_SIGNIFICANT_LABEL,
    QUADRANT_COLUMN, QUADRANT_FILTERED_COLUMN, SIGNIFICANCE_THRESHOLD,
};
use crate::io::error::{AnalysisError, Result, invalid_parameter, invalid_source};
use crate::io::table::Table;
use crate::math::moments::Moments;
use crate::spatial::distance::DistanceMatrix;
use crate::spatial::flows::FlowTable;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Quadrant of the Flow-LISA scatter, by sign of intensity and lag
///
/// Zero counts as non-negative on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Intensity ≥ 0, lag ≥ 0
    HighHigh,
    /// Intensity ≥ 0, lag < 0
    HighLow,
    /// Intensity < 0, lag ≥ 0
    LowHigh,
    /// Intensity < 0, lag < 0
    LowLow,
}

impl Quadrant {
    /// Classify a flow by the signs of its intensity and lag
    pub fn classify(intensity: f64, lag: f64) -> Self {
        match (intensity >= 0.0, lag >= 0.0) {
            (true, true) => Self::HighHigh,
            (true, false) => Self::HighLow,
            (false, true) => Self::LowHigh,
            (false, false) => Self::LowLow,
        }
    }

    /// Two-letter label
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighHigh => "HH",
            Self::HighLow => "HL",
            Self::LowHigh => "LH",
            Self::LowLow => "LL",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Quadrant label after significance filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterLabel {
    /// Significant flow, keeps its quadrant
    Cluster(Quadrant),
    /// Z-score inside the threshold, or undefined
    NotSignificant,
}

impl ClusterLabel {
    /// Keep the quadrant when `zscore <= -threshold` or `zscore >= threshold`
    ///
    /// Both bounds are inclusive. A `NaN` z-score is never significant.
    pub fn from_significance(quadrant: Quadrant, zscore: f64, threshold: f64) -> Self {
        if zscore <= -threshold || zscore >= threshold {
            Self::Cluster(quadrant)
        } else {
            Self::NotSignificant
        }
    }

    /// Quadrant label or `NS`
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cluster(quadrant) => quadrant.label(),
            Self::NotSignificant => NOT_SIGNIFICANT_LABEL,
        }
    }

    /// Whether the flow passed the significance filter
    pub const fn is_significant(self) -> bool {
        matches!(self, Self::Cluster(_))
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Handling of flows with zero intensity, where `(Z * lag) / Z^2` is `0 / 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroIntensityPolicy {
    /// Score is `NaN`, left out of the moments and labelled `NS`
    #[default]
    Propagate,
    /// Score is `0.0` and takes part in the moments
    Zero,
    /// Fail with [`AnalysisError::ZeroIntensity`]
    Reject,
}

impl FromStr for ZeroIntensityPolicy {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "propagate" | "nan" => Ok(Self::Propagate),
            "zero" => Ok(Self::Zero),
            "reject" | "error" => Ok(Self::Reject),
            _ => Err(invalid_parameter(
                "zero_intensity",
                &s,
                &"expected one of: propagate, zero, reject",
            )),
        }
    }
}

/// Numeric settings for a Flow-LISA run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LisaConfig {
    significance_threshold: f64,
    zero_intensity: ZeroIntensityPolicy,
}

impl Default for LisaConfig {
    fn default() -> Self {
        Self {
            significance_threshold: SIGNIFICANCE_THRESHOLD,
            zero_intensity: ZeroIntensityPolicy::default(),
        }
    }
}

impl LisaConfig {
    /// Create a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error unless the threshold is finite and positive
    pub fn new(significance_threshold: f64, zero_intensity: ZeroIntensityPolicy) -> Result<Self> {
        if !significance_threshold.is_finite() || significance_threshold <= 0.0 {
            return Err(invalid_parameter(
                "significance_threshold",
                &significance_threshold,
                &"must be finite and positive",
            ));
        }
        Ok(Self {
            significance_threshold,
            zero_intensity,
        })
    }

    /// Absolute z-score at or beyond which a flow is significant
    pub const fn significance_threshold(&self) -> f64 {
        self.significance_threshold
    }

    /// Handling of zero-intensity flows
    pub const fn zero_intensity(&self) -> ZeroIntensityPolicy {
        self.zero_intensity
    }
}

/// Local association score `(Z * lag) / Z^2` of one flow
///
/// # Errors
///
/// Returns `ZeroIntensity` for a zero intensity under [`ZeroIntensityPolicy::Reject`]
pub fn local_association(
    intensity: f64,
    lag: f64,
    policy: ZeroIntensityPolicy,
    flow_index: usize,
) -> Result<f64> {
    if intensity != 0.0 {
        return Ok((intensity * lag) / intensity.powi(2));
    }
    match policy {
        ZeroIntensityPolicy::Propagate => Ok(f64::NAN),
        ZeroIntensityPolicy::Zero => Ok(0.0),
        ZeroIntensityPolicy::Reject => Err(AnalysisError::ZeroIntensity { flow_index }),
    }
}

/// Derived Flow-LISA fields of one flow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowLisaRecord {
    /// Spatial lag
    pub lag: f64,
    /// Local association score
    pub local_association: f64,
    /// Z-score of the local association score
    pub association_zscore: f64,
    /// Unfiltered quadrant
    pub quadrant: Quadrant,
    /// Quadrant after significance filtering
    pub label: ClusterLabel,
}

/// Number of flows per label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LabelCounts {
    /// Significant high-high flows
    #[serde(rename = "HH")]
    pub high_high: usize,
    /// Significant high-low flows
    #[serde(rename = "HL")]
    pub high_low: usize,
    /// Significant low-high flows
    #[serde(rename = "LH")]
    pub low_high: usize,
    /// Significant low-low flows
    #[serde(rename = "LL")]
    pub low_low: usize,
    /// Non-significant flows
    #[serde(rename = "NS")]
    pub not_significant: usize,
}

impl LabelCounts {
    fn record(&mut self, label: ClusterLabel) {
        let slot = match label {
            ClusterLabel::Cluster(Quadrant::HighHigh) => &mut self.high_high,
            ClusterLabel::Cluster(Quadrant::HighLow) => &mut self.high_low,
            ClusterLabel::Cluster(Quadrant::LowHigh) => &mut self.low_high,
            ClusterLabel::Cluster(Quadrant::LowLow) => &mut self.low_low,
            ClusterLabel::NotSignificant => &mut self.not_significant,
        };
        *slot += 1;
    }

    /// Number of flows that passed the significance filter
    pub const fn significant(&self) -> usize {
        self.high_high + self.high_low + self.low_high + self.low_low
    }
}

/// Annotated result of a Flow-LISA run, one record per input flow
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLisa {
    /// Derived fields in flow table order
    pub records: Vec<FlowLisaRecord>,
    /// Pairs skipped by the lag pass for zero combined distance
    pub skipped_pairs: usize,
    /// Mean of the finite local association scores
    pub mean: f64,
    /// Sample standard deviation of the finite local association scores
    pub std_dev: f64,
}

/// Serializable overview of a Flow-LISA run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LisaSummary {
    /// Intensity column the run was driven by
    pub intensity_column: String,
    /// Number of flows
    pub flows: usize,
    /// Pairs skipped for zero combined distance
    pub skipped_pairs: usize,
    /// Mean local association score
    pub mean: f64,
    /// Sample standard deviation of the local association score
    pub std_dev: f64,
    /// Significance threshold used
    pub significance_threshold: f64,
    /// Flows per label
    pub label_counts: LabelCounts,
}

impl FlowLisa {
    /// Count flows per filtered label
    pub fn label_counts(&self) -> LabelCounts {
        let mut counts = LabelCounts::default();
        for record in &self.records {
            counts.record(record.label);
        }
        counts
    }

    /// Overview for reporting
    pub fn summary(&self, intensity_column: &str, config: &LisaConfig) -> LisaSummary {
        LisaSummary {
            intensity_column: intensity_column.to_string(),
            flows: self.records.len(),
            skipped_pairs: self.skipped_pairs,
            mean: self.mean,
            std_dev: self.std_dev,
            significance_threshold: config.significance_threshold,
            label_counts: self.label_counts(),
        }
    }

    /// Append the derived columns to the table the flows were read from
    ///
    /// Column names get a `<prefix>_` in front when a prefix is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the table row count differs from the flow count
    /// or an output column name is already taken
    pub fn annotate(&self, table: &mut Table, prefix: Option<&str>) -> Result<()> {
        let name = |column: &str| prefix.map_or_else(|| column.to_string(), |p| format!("{p}_{column}"));

        let lags: Vec<f64> = self.records.iter().map(|r| r.lag).collect();
        let scores: Vec<f64> = self.records.iter().map(|r| r.local_association).collect();
        let zscores: Vec<f64> = self.records.iter().map(|r| r.association_zscore).collect();

        table.push_float_column(&name(LAG_COLUMN), &lags)?;
        table.push_float_column(&name(LOCAL_ASSOCIATION_COLUMN), &scores)?;
        table.push_float_column(&name(ASSOCIATION_ZSCORE_COLUMN), &zscores)?;
        table.push_column(
            &name(QUADRANT_COLUMN),
            self.records.iter().map(|r| r.quadrant.to_string()).collect(),
        )?;
        table.push_column(
            &name(QUADRANT_FILTERED_COLUMN),
            self.records.iter().map(|r| r.label.to_string()).collect(),
        )
    }
}

/// Score, standardize and label flows given their spatial lag
///
/// # Errors
///
/// Returns an error if the lag doesn't cover every flow, a zero intensity
/// is rejected by the configuration, or the scores have no spread
pub fn classify(flows: &FlowTable, lag: &SpatialLag, config: &LisaConfig) -> Result<FlowLisa> {
    if lag.len() != flows.len() {
        return Err(invalid_source(&format!(
            "spatial lag covers {} flows, table has {}",
            lag.len(),
            flows.len()
        )));
    }

    let scores = flows
        .iter()
        .zip(&lag.values)
        .enumerate()
        .map(|(i, (flow, &lag_i))| {
            local_association(flow.intensity, lag_i, config.zero_intensity, i)
        })
        .collect::<Result<Vec<f64>>>()?;

    let undefined = scores.iter().filter(|s| !s.is_finite()).count();
    if undefined > 0 {
        log::warn!(
            "{undefined} flows have a zero or vanishing intensity; their association is undefined and labelled NS"
        );
    }

    let moments = Moments::of_finite(&scores);
    let (mean, std_dev) = moments.nondegenerate()?;
    log::debug!(
        "Local association over {} finite scores: mean {mean}, sd {std_dev}",
        moments.count
    );

    let records = flows
        .iter()
        .zip(&lag.values)
        .zip(scores)
        .map(|((flow, &lag_i), score)| {
            // Scores left out of the moments are never standardized
            let association_zscore = if score.is_finite() {
                (score - mean) / std_dev
            } else {
                f64::NAN
            };
            let quadrant = Quadrant::classify(flow.intensity, lag_i);
            FlowLisaRecord {
                lag: lag_i,
                local_association: score,
                association_zscore,
                quadrant,
                label: ClusterLabel::from_significance(
                    quadrant,
                    association_zscore,
                    config.significance_threshold,
                ),
            }
        })
        .collect();

    Ok(FlowLisa {
        records,
        skipped_pairs: lag.skipped_pairs,
        mean,
        std_dev,
    })
}

/// Run the full Flow-LISA pipeline: spatial lag, scores, labels
///
/// # Errors
///
/// Returns an error if a flow references a region outside the matrix or
/// classification fails (see [`classify`])
pub fn run_flow_lisa(
    flows: &FlowTable,
    matrix: &DistanceMatrix,
    config: &LisaConfig,
) -> Result<FlowLisa> {
    run_flow_lisa_with_progress(flows, matrix, config, |_| {})
}

/// Run the full Flow-LISA pipeline, reporting lag rows as they finish
///
/// # Errors
///
/// Same conditions as [`run_flow_lisa`]
pub fn run_flow_lisa_with_progress(
    flows: &FlowTable,
    matrix: &DistanceMatrix,
    config: &LisaConfig,
    on_row: impl FnMut(usize),
) -> Result<FlowLisa> {
    let lag = compute_spatial_lag_with_progress(flows, matrix, on_row)?;
    let lisa = classify(flows, &lag, config)?;

    let counts = lisa.label_counts();
    log::info!(
        "Flow-LISA over {} flows: {} significant (HH {}, HL {}, LH {}, LL {}), {} NS",
        flows.len(),
        counts.significant(),
        counts.high_high,
        counts.high_low,
        counts.low_high,
        counts.low_low,
        counts.not_significant
    );
    Ok(lisa)
}
