use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::busbar::BusbarLayout;
use crate::error::{LayoutError, Result};

/// Series counts above this are flagged
pub const MAX_SERIES_WARN: u32 = 100;
/// Parallel counts above this are flagged
pub const MAX_PARALLEL_WARN: u32 = 50;
/// Total cell counts above this are flagged
pub const MAX_CELLS_WARN: u32 = 1000;

/// Catalog entry for a commercial cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellModel {
    pub id: &'static str,
    pub name: &'static str,
    pub nominal_voltage_v: f64,
    pub capacity_ah: f64,
    pub max_current_a: f64,
    pub chemistry: &'static str,
}

pub const CELL_CATALOG: &[CellModel] = &[
    CellModel {
        id: "samsung-21700-50e",
        name: "Samsung 21700-50E",
        nominal_voltage_v: 3.7,
        capacity_ah: 5.0,
        max_current_a: 9.8,
        chemistry: "Li-ion NMC",
    },
    CellModel {
        id: "panasonic-18650-3400",
        name: "Panasonic 18650-3400",
        nominal_voltage_v: 3.7,
        capacity_ah: 3.4,
        max_current_a: 6.8,
        chemistry: "Li-ion NCA",
    },
    CellModel {
        id: "lg-21700-m50",
        name: "LG 21700-M50",
        nominal_voltage_v: 3.7,
        capacity_ah: 5.0,
        max_current_a: 7.3,
        chemistry: "Li-ion NMC",
    },
    CellModel {
        id: "tesla-4680",
        name: "Tesla 4680",
        nominal_voltage_v: 3.7,
        capacity_ah: 9.0,
        max_current_a: 12.0,
        chemistry: "Li-ion NMC",
    },
];

/// Find a catalog cell by id (case-insensitive)
pub fn find_cell_model(id: &str) -> Option<&'static CellModel> {
    CELL_CATALOG
        .iter()
        .find(|m| m.id.eq_ignore_ascii_case(id.trim()))
}

/// Advisory pack-architecture warning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElectricalWarning {
    HighSeriesCount { series: u32, limit: u32 },
    HighParallelCount { parallel: u32, limit: u32 },
    HighCellCount { cells: u32, limit: u32 },
}

impl std::fmt::Display for ElectricalWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElectricalWarning::HighSeriesCount { series, limit } => {
                write!(f, "{series} cells in series exceeds {limit}")
            }
            ElectricalWarning::HighParallelCount { parallel, limit } => {
                write!(f, "{parallel} cells in parallel exceeds {limit}")
            }
            ElectricalWarning::HighCellCount { cells, limit } => {
                write!(f, "{cells} cells in total exceeds {limit}")
            }
        }
    }
}

/// Nominal pack ratings for an S/P architecture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectricalSummary {
    pub cell_model: String,
    pub series: u32,
    pub parallel: u32,
    pub total_voltage_v: f64,
    pub total_capacity_ah: f64,
    pub total_energy_kwh: f64,
    pub max_current_a: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ElectricalWarning>,
}

impl ElectricalSummary {
    pub fn compute(model: &CellModel, series: u32, parallel: u32) -> Result<Self> {
        if series == 0 || parallel == 0 {
            return Err(LayoutError::InvalidOptions(format!(
                "series and parallel counts must be positive, got {series}s{parallel}p"
            )));
        }

        let s = f64::from(series);
        let p = f64::from(parallel);

        let mut warnings = Vec::new();
        if series > MAX_SERIES_WARN {
            warnings.push(ElectricalWarning::HighSeriesCount {
                series,
                limit: MAX_SERIES_WARN,
            });
        }
        if parallel > MAX_PARALLEL_WARN {
            warnings.push(ElectricalWarning::HighParallelCount {
                parallel,
                limit: MAX_PARALLEL_WARN,
            });
        }
        let cells = series.saturating_mul(parallel);
        if cells > MAX_CELLS_WARN {
            warnings.push(ElectricalWarning::HighCellCount {
                cells,
                limit: MAX_CELLS_WARN,
            });
        }
        for warning in &warnings {
            warn!(%warning, cell_model = model.id, "pack architecture warning");
        }

        Ok(Self {
            cell_model: model.id.to_string(),
            series,
            parallel,
            total_voltage_v: model.nominal_voltage_v * s,
            total_capacity_ah: model.capacity_ah * p,
            total_energy_kwh: model.nominal_voltage_v * model.capacity_ah * s * p / 1000.0,
            max_current_a: model.max_current_a * p,
            warnings,
        })
    }

    /// Ratings for the S/P counts of a busbar topology
    pub fn for_busbar(model: &CellModel, busbar: &BusbarLayout) -> Result<Self> {
        Self::compute(model, busbar.series_count, busbar.parallel_count)
    }
}
