use serde::{Deserialize, Serialize};

use super::{PlacedCell, ResolvedLayer};

/// Overall pack envelope (m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3d {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

impl BoundingBox3d {
    pub fn span_x(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn span_y(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn span_z(&self) -> f64 {
        self.zmax - self.zmin
    }

    pub fn volume(&self) -> f64 {
        self.span_x() * self.span_y() * self.span_z()
    }
}

/// Pack-level aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackMeta {
    pub bbox: BoundingBox3d,
    pub volume_m3: f64,
    pub weight_kg: f64,
    pub cell_count: usize,
    pub layers: Vec<ResolvedLayer>,
}

/// Advisory limit breach. Never blocks generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintWarning {
    WeightExceeded { weight_kg: f64, limit_kg: f64 },
    VolumeExceeded { volume_m3: f64, limit_m3: f64 },
}

impl std::fmt::Display for ConstraintWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintWarning::WeightExceeded { weight_kg, limit_kg } => {
                write!(f, "pack weight {weight_kg:.3}kg exceeds limit {limit_kg:.3}kg")
            }
            ConstraintWarning::VolumeExceeded { volume_m3, limit_m3 } => {
                write!(f, "pack volume {volume_m3:.6}m³ exceeds limit {limit_m3:.6}m³")
            }
        }
    }
}

/// Output of one generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackResult {
    pub cells: Vec<PlacedCell>,
    pub meta: PackMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ConstraintWarning>,
}

impl PackResult {
    /// Look up a cell by its 1-based global index
    pub fn cell(&self, global_index: u32) -> Option<&PlacedCell> {
        let idx = (global_index as usize).checked_sub(1)?;
        self.cells.get(idx)
    }

    pub fn layer_cells(&self, layer_index: usize) -> impl Iterator<Item = &PlacedCell> {
        self.cells
            .iter()
            .filter(move |c| c.layer_index == layer_index)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
