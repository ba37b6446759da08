//! Analysis constants and runtime configuration defaults

// Two-tailed 99% critical value of the standard normal distribution
/// Absolute z-score at or beyond which a flow is significant
pub const SIGNIFICANCE_THRESHOLD: f64 = 2.58;

/// Label for flows whose association z-score is inside the threshold
pub const NOT_SIGNIFICANT_LABEL: &str = "NS";

// Default flow table column names
/// Origin region identifier column
pub const DEFAULT_ORIGIN_COLUMN: &str = "origin_id";
/// Destination region identifier column
pub const DEFAULT_DESTINATION_COLUMN: &str = "destination_id";
/// Standardized intensity column
pub const DEFAULT_INTENSITY_COLUMN: &str = "standardized_intensity";

// Annotated flow table output columns
/// Spatial lag output column
pub const LAG_COLUMN: &str = "lag";
/// Local association score output column
pub const LOCAL_ASSOCIATION_COLUMN: &str = "local_association";
/// Association z-score output column
pub const ASSOCIATION_ZSCORE_COLUMN: &str = "association_zscore";
/// Unfiltered quadrant output column
pub const QUADRANT_COLUMN: &str = "quadrant";
/// Significance-filtered quadrant output column
pub const QUADRANT_FILTERED_COLUMN: &str = "quadrant_filtered";

// Region aggregate table column names
/// Region identifier column
pub const REGION_ID_COLUMN: &str = "region_id";
/// Housing unit count column
pub const UNIT_COUNT_COLUMN: &str = "unit_count";
/// Total floor area column
pub const FLOOR_AREA_COLUMN: &str = "floor_area";
/// Short-term population share column
pub const POP_SHARE_COLUMN: &str = "pop_share";
/// Medium-term population share column
pub const MPOP_SHARE_COLUMN: &str = "mpop_share";
/// Card spending share column
pub const PAY_SHARE_COLUMN: &str = "pay_share";

// Output settings
/// Suffix added to annotated flow table filenames
pub const LISA_OUTPUT_SUFFIX: &str = "_lisa";
/// Suffix added to equity table filenames
pub const EQUITY_OUTPUT_SUFFIX: &str = "_coulter";
/// Suffix added to the inequity index summary filename
pub const EQUITY_INDEX_SUFFIX: &str = "_coulter_index";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
/// Rows between progress bar redraws during the lag pass
pub const PROGRESS_UPDATE_INTERVAL: usize = 64;
