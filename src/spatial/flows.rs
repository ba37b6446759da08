//! Origin-destination flow records and their ordered table

use crate::io::configuration::{
    DEFAULT_DESTINATION_COLUMN, DEFAULT_INTENSITY_COLUMN, DEFAULT_ORIGIN_COLUMN,
};
use crate::io::error::{Result, invalid_source};
use crate::io::table::Table;
use crate::spatial::distance::RegionId;

/// One observed flow between two regions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowRecord {
    /// Region the flow starts in
    pub origin: RegionId,
    /// Region the flow ends in
    pub destination: RegionId,
    /// Standardized (z-scored) flow magnitude
    pub intensity: f64,
}

impl FlowRecord {
    /// Create a flow from raw 1-based region identifiers
    ///
    /// # Errors
    ///
    /// Returns an invalid source data error if either identifier is 0
    pub fn new(origin: u32, destination: u32, intensity: f64) -> Result<Self> {
        Ok(Self {
            origin: RegionId::new(origin)?,
            destination: RegionId::new(destination)?,
            intensity,
        })
    }
}

/// Names of the columns a [`FlowTable`] is extracted from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowColumns {
    /// Origin region identifier column
    pub origin: String,
    /// Destination region identifier column
    pub destination: String,
    /// Intensity column driving the analysis
    pub intensity: String,
}

impl Default for FlowColumns {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN_COLUMN.to_string(),
            destination: DEFAULT_DESTINATION_COLUMN.to_string(),
            intensity: DEFAULT_INTENSITY_COLUMN.to_string(),
        }
    }
}

impl FlowColumns {
    /// Same origin and destination columns, different intensity column
    pub fn with_intensity(&self, intensity: &str) -> Self {
        Self {
            intensity: intensity.to_string(),
            ..self.clone()
        }
    }
}

/// Ordered flows; row `i` of any derived output belongs to flow `i`
///
/// Duplicate origin-destination pairs are kept as separate observations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowTable {
    records: Vec<FlowRecord>,
}

impl FlowTable {
    /// Wrap flow records, keeping their order
    ///
    /// # Errors
    ///
    /// Returns an invalid source data error if an intensity is not finite
    pub fn new(records: Vec<FlowRecord>) -> Result<Self> {
        if let Some((row, record)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| !r.intensity.is_finite())
        {
            return Err(invalid_source(&format!(
                "flow {row} ({} -> {}) has non-finite intensity {}",
                record.origin, record.destination, record.intensity
            )));
        }
        Ok(Self { records })
    }

    /// Extract flows from a loaded table
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing, a cell doesn't parse, or a
    /// record fails the checks of [`FlowRecord::new`] and [`Self::new`]
    pub fn from_table(table: &Table, columns: &FlowColumns) -> Result<Self> {
        let origins = table.parse_column::<u32>(&columns.origin)?;
        let destinations = table.parse_column::<u32>(&columns.destination)?;
        let intensities = table.parse_column::<f64>(&columns.intensity)?;

        let records = origins
            .into_iter()
            .zip(destinations)
            .zip(intensities)
            .map(|((origin, destination), intensity)| {
                FlowRecord::new(origin, destination, intensity)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(records)
    }

    /// Same flows with replaced intensities
    ///
    /// # Errors
    ///
    /// Returns an invalid source data error if the lengths differ or a new
    /// intensity is not finite
    pub fn with_intensities(&self, intensities: &[f64]) -> Result<Self> {
        if intensities.len() != self.records.len() {
            return Err(invalid_source(&format!(
                "{} intensities for {} flows",
                intensities.len(),
                self.records.len()
            )));
        }
        let records = self
            .records
            .iter()
            .zip(intensities)
            .map(|(record, &intensity)| FlowRecord {
                intensity,
                ..*record
            })
            .collect();
        Self::new(records)
    }

    /// Number of flows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no flows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flows in input order
    pub fn records(&self) -> &[FlowRecord] {
        &self.records
    }

    /// Iterate flows in input order
    pub fn iter(&self) -> std::slice::Iter<'_, FlowRecord> {
        self.records.iter()
    }

    /// Intensity column in input order
    pub fn intensities(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.intensity).collect()
    }
}

impl<'a> IntoIterator for &'a FlowTable {
    type Item = &'a FlowRecord;
    type IntoIter = std::slice::Iter<'a, FlowRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
