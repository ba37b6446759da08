//! Coulter's Inequity Index and Adjustment Coefficient
//!
//! Supply (housing units or floor area) is compared with a demand share per
//! region. The index is one scalar per supply/demand pair; the coefficient is
//! a signed per-region gap, positive where a region is oversupplied.

use crate::io::configuration::{
    FLOOR_AREA_COLUMN, MPOP_SHARE_COLUMN, PAY_SHARE_COLUMN, POP_SHARE_COLUMN, REGION_ID_COLUMN,
    UNIT_COUNT_COLUMN,
};
use crate::io::error::{Result, computation_error, invalid_source};
use crate::io::table::Table;
use crate::math::moments::shares;
use serde::Serialize;
use std::fmt;

/// Supply side of the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyMeasure {
    /// Number of housing units
    UnitCount,
    /// Total floor area
    FloorArea,
}

impl SupplyMeasure {
    /// Both supply measures in reporting order
    pub const ALL: [Self; 2] = [Self::UnitCount, Self::FloorArea];

    /// Input column holding this measure
    pub const fn column(self) -> &'static str {
        match self {
            Self::UnitCount => UNIT_COUNT_COLUMN,
            Self::FloorArea => FLOOR_AREA_COLUMN,
        }
    }

    /// Short tag used in output column names
    pub const fn tag(self) -> &'static str {
        match self {
            Self::UnitCount => "count",
            Self::FloorArea => "size",
        }
    }

    fn value(self, aggregate: &RegionAggregate) -> f64 {
        match self {
            Self::UnitCount => aggregate.unit_count,
            Self::FloorArea => aggregate.floor_area,
        }
    }
}

/// Demand side of the comparison, as a share of the citywide total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandMeasure {
    /// Short-term population mobility
    Population,
    /// Medium-term population mobility
    MediumTermPopulation,
    /// Card spending
    Spending,
}

impl DemandMeasure {
    /// All demand measures in reporting order
    pub const ALL: [Self; 3] = [Self::Population, Self::MediumTermPopulation, Self::Spending];

    /// Input column holding this share
    pub const fn column(self) -> &'static str {
        match self {
            Self::Population => POP_SHARE_COLUMN,
            Self::MediumTermPopulation => MPOP_SHARE_COLUMN,
            Self::Spending => PAY_SHARE_COLUMN,
        }
    }

    /// Short tag used in output column names
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Population => "pop",
            Self::MediumTermPopulation => "mpop",
            Self::Spending => "pay",
        }
    }

    fn share(self, aggregate: &RegionAggregate) -> f64 {
        match self {
            Self::Population => aggregate.pop_share,
            Self::MediumTermPopulation => aggregate.mpop_share,
            Self::Spending => aggregate.pay_share,
        }
    }
}

impl fmt::Display for SupplyMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl fmt::Display for DemandMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Supply and demand aggregates of one region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionAggregate {
    /// Region identifier, carried through untouched
    pub region_id: String,
    /// Number of housing units
    pub unit_count: f64,
    /// Total floor area
    pub floor_area: f64,
    /// Share of short-term population mobility
    pub pop_share: f64,
    /// Share of medium-term population mobility
    pub mpop_share: f64,
    /// Share of card spending
    pub pay_share: f64,
}

impl RegionAggregate {
    /// Read aggregates from a loaded table, one per row
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or a cell isn't a finite number
    pub fn from_table(table: &Table) -> Result<Vec<Self>> {
        let region_ids = table.parse_column::<String>(REGION_ID_COLUMN)?;
        let unit_counts = finite_column(table, UNIT_COUNT_COLUMN)?;
        let floor_areas = finite_column(table, FLOOR_AREA_COLUMN)?;
        let pop_shares = finite_column(table, POP_SHARE_COLUMN)?;
        let mpop_shares = finite_column(table, MPOP_SHARE_COLUMN)?;
        let pay_shares = finite_column(table, PAY_SHARE_COLUMN)?;

        Ok((0..table.len())
            .filter_map(|i| {
                Some(Self {
                    region_id: region_ids.get(i)?.clone(),
                    unit_count: *unit_counts.get(i)?,
                    floor_area: *floor_areas.get(i)?,
                    pop_share: *pop_shares.get(i)?,
                    mpop_share: *mpop_shares.get(i)?,
                    pay_share: *pay_shares.get(i)?,
                })
            })
            .collect())
    }
}

fn finite_column(table: &Table, column: &str) -> Result<Vec<f64>> {
    let values = table.parse_column::<f64>(column)?;
    if let Some(row) = values.iter().position(|v| !v.is_finite()) {
        return Err(invalid_source(&format!(
            "column '{column}' has a non-finite value at row {row}"
        )));
    }
    Ok(values)
}

/// Replace each demand column by its share of the column total
///
/// # Errors
///
/// Returns a computation error if a demand column sums to zero
pub fn normalize_demand(aggregates: &[RegionAggregate]) -> Result<Vec<RegionAggregate>> {
    let column = |demand: DemandMeasure| -> Result<Vec<f64>> {
        let values: Vec<f64> = aggregates.iter().map(|a| demand.share(a)).collect();
        shares(&values)
    };
    let pop = column(DemandMeasure::Population)?;
    let mpop = column(DemandMeasure::MediumTermPopulation)?;
    let pay = column(DemandMeasure::Spending)?;

    Ok(aggregates
        .iter()
        .zip(pop)
        .zip(mpop)
        .zip(pay)
        .map(|(((aggregate, pop_share), mpop_share), pay_share)| RegionAggregate {
            pop_share,
            mpop_share,
            pay_share,
            ..aggregate.clone()
        })
        .collect())
}

fn supply_total(aggregates: &[RegionAggregate], supply: SupplyMeasure) -> Result<f64> {
    if aggregates.is_empty() {
        return Err(invalid_source(&"region aggregate table is empty"));
    }
    let total = aggregates.iter().map(|a| supply.value(a)).sum::<f64>();
    if total == 0.0 || !total.is_finite() {
        return Err(computation_error(
            "supply share",
            &format!("total {supply} is {total}"),
        ));
    }
    Ok(total)
}

/// Share of total supply held by each region, `S_i / ΣS`
///
/// # Errors
///
/// Returns an error if the table is empty or total supply is zero
pub fn supply_shares(aggregates: &[RegionAggregate], supply: SupplyMeasure) -> Result<Vec<f64>> {
    let total = supply_total(aggregates, supply)?;
    Ok(aggregates.iter().map(|a| supply.value(a) / total).collect())
}

/// Coulter's Inequity Index for one supply/demand pair
///
/// `100 * sqrt(Σ(s_i - P_i)^2) / sqrt(ΣP_i^2 - 2 * min(P_i^2) + 1)`
///
/// # Errors
///
/// Returns an error if the table is empty, total supply is zero, or the
/// normalizing denominator vanishes
pub fn inequity_index(
    aggregates: &[RegionAggregate],
    supply: SupplyMeasure,
    demand: DemandMeasure,
) -> Result<f64> {
    let supply_share = supply_shares(aggregates, supply)?;

    let divergence = aggregates
        .iter()
        .zip(&supply_share)
        .map(|(a, s)| (s - demand.share(a)).powi(2))
        .sum::<f64>();

    let squared_demand: Vec<f64> = aggregates
        .iter()
        .map(|a| demand.share(a).powi(2))
        .collect();
    let min_squared = squared_demand.iter().copied().fold(f64::INFINITY, f64::min);
    let normalizer = 2.0f64.mul_add(-min_squared, squared_demand.iter().sum::<f64>()) + 1.0;

    if normalizer <= 0.0 || !normalizer.is_finite() {
        return Err(computation_error(
            "inequity index",
            &format!("normalizer for {supply} vs {demand} is {normalizer}"),
        ));
    }

    Ok(100.0 * divergence.sqrt() / normalizer.sqrt())
}

/// Coulter's Adjustment Coefficient per region, `S_i - P_i * ΣS`
///
/// Positive values mark oversupply relative to the demand share.
///
/// # Errors
///
/// Returns an error if the table is empty or total supply is zero
pub fn adjustment_coefficients(
    aggregates: &[RegionAggregate],
    supply: SupplyMeasure,
    demand: DemandMeasure,
) -> Result<Vec<f64>> {
    let total = supply_total(aggregates, supply)?;
    Ok(aggregates
        .iter()
        .map(|a| demand.share(a).mul_add(-total, supply.value(a)))
        .collect())
}

/// Inequity index of one supply/demand pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InequityEntry {
    /// Supply measure
    pub supply: SupplyMeasure,
    /// Demand measure
    pub demand: DemandMeasure,
    /// Coulter's Inequity Index
    pub index: f64,
}

/// Adjustment coefficients of one supply/demand pair
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientColumn {
    /// Supply measure
    pub supply: SupplyMeasure,
    /// Demand measure
    pub demand: DemandMeasure,
    /// Coefficient per region, in table order
    pub values: Vec<f64>,
}

impl CoefficientColumn {
    /// Output column name, e.g. `pop_ci_count`
    pub fn column_name(&self) -> String {
        format!("{}_ci_{}", self.demand.tag(), self.supply.tag())
    }
}

/// Both Coulter measures for every supply/demand pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityReport {
    /// Inequity index per pair, demand-major order
    pub indices: Vec<InequityEntry>,
    /// Adjustment coefficients per pair, same order as `indices`
    #[serde(skip)]
    pub coefficients: Vec<CoefficientColumn>,
}

impl EquityReport {
    /// Compute all six supply/demand combinations
    ///
    /// # Errors
    ///
    /// Returns the first error of [`inequity_index`] or [`adjustment_coefficients`]
    pub fn compute(aggregates: &[RegionAggregate]) -> Result<Self> {
        let mut indices = Vec::with_capacity(6);
        let mut coefficients = Vec::with_capacity(6);

        for demand in DemandMeasure::ALL {
            for supply in SupplyMeasure::ALL {
                let index = inequity_index(aggregates, supply, demand)?;
                log::info!("Coulter inequity index {supply} vs {demand}: {index:.5}");
                indices.push(InequityEntry {
                    supply,
                    demand,
                    index,
                });
                coefficients.push(CoefficientColumn {
                    supply,
                    demand,
                    values: adjustment_coefficients(aggregates, supply, demand)?,
                });
            }
        }

        Ok(Self {
            indices,
            coefficients,
        })
    }

    /// Index of one pair
    pub fn index(&self, supply: SupplyMeasure, demand: DemandMeasure) -> Option<f64> {
        self.indices
            .iter()
            .find(|e| e.supply == supply && e.demand == demand)
            .map(|e| e.index)
    }

    /// Append the six coefficient columns to the aggregate table
    ///
    /// # Errors
    ///
    /// Returns an error if the table row count differs from the region
    /// count or a column name is already taken
    pub fn annotate(&self, table: &mut Table) -> Result<()> {
        for column in &self.coefficients {
            table.push_float_column(&column.column_name(), &column.values)?;
        }
        Ok(())
    }
}
