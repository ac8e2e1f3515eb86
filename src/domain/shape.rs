use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::{LayoutError, Result};

/// Millimetres per metre; every caller-facing length is in mm.
pub const MM_PER_M: f64 = 1000.0;

/// Convert a caller-supplied millimetre value to metres
pub fn mm_to_m(mm: f64) -> f64 {
    mm / MM_PER_M
}

/// Cell form factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FormFactor {
    Cylindrical,
    Prismatic,
}

/// Cell geometry as entered by the caller, in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form_factor", rename_all = "snake_case")]
pub enum CellShape {
    Cylindrical {
        radius_mm: f64,
        height_mm: f64,
    },
    Prismatic {
        length_mm: f64,
        width_mm: f64,
        height_mm: f64,
    },
}

impl CellShape {
    pub fn form_factor(&self) -> FormFactor {
        match self {
            CellShape::Cylindrical { .. } => FormFactor::Cylindrical,
            CellShape::Prismatic { .. } => FormFactor::Prismatic,
        }
    }

    /// Check every dimension is a positive finite number and convert to metres
    pub fn resolve(&self) -> Result<CellDims> {
        match *self {
            CellShape::Cylindrical {
                radius_mm,
                height_mm,
            } => {
                positive("radius", radius_mm)?;
                positive("height", height_mm)?;
                Ok(CellDims::Cylindrical {
                    radius: mm_to_m(radius_mm),
                    height: mm_to_m(height_mm),
                })
            }
            CellShape::Prismatic {
                length_mm,
                width_mm,
                height_mm,
            } => {
                positive("length", length_mm)?;
                positive("width", width_mm)?;
                positive("height", height_mm)?;
                Ok(CellDims::Prismatic {
                    length: mm_to_m(length_mm),
                    width: mm_to_m(width_mm),
                    height: mm_to_m(height_mm),
                })
            }
        }
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LayoutError::InvalidDimensions(format!(
            "{name} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

/// Resolved cell geometry in metres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form_factor", rename_all = "snake_case")]
pub enum CellDims {
    Cylindrical { radius: f64, height: f64 },
    Prismatic { length: f64, width: f64, height: f64 },
}

impl CellDims {
    pub fn form_factor(&self) -> FormFactor {
        match self {
            CellDims::Cylindrical { .. } => FormFactor::Cylindrical,
            CellDims::Prismatic { .. } => FormFactor::Prismatic,
        }
    }

    pub fn height(&self) -> f64 {
        match *self {
            CellDims::Cylindrical { height, .. } | CellDims::Prismatic { height, .. } => height,
        }
    }

    /// Footprint half-extents along x and y
    pub fn half_extents(&self) -> (f64, f64) {
        match *self {
            CellDims::Cylindrical { radius, .. } => (radius, radius),
            CellDims::Prismatic { length, width, .. } => (length / 2.0, width / 2.0),
        }
    }
}
