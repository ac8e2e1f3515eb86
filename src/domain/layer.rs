use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::FormFactor;

/// In-plane tiling pattern of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GridType {
    Rectangular,
    BrickRowStagger,
    HexFlat,
    HexPointy,
}

impl GridType {
    pub fn is_hex(&self) -> bool {
        matches!(self, GridType::HexFlat | GridType::HexPointy)
    }

    /// Hex tilings only make sense for round footprints
    pub fn allowed_for(&self, form_factor: FormFactor) -> bool {
        match form_factor {
            FormFactor::Cylindrical => true,
            FormFactor::Prismatic => !self.is_hex(),
        }
    }
}

/// How a layer's z centre is determined
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ZPlacement {
    /// z = (layer_index - 1) * global z pitch
    #[default]
    IndexPitch,
    /// Caller-supplied centre in millimetres
    Explicit { z_center_mm: f64 },
}

/// One stacked layer as entered by the caller (lengths in mm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub grid_type: GridType,
    pub n_rows: u32,
    pub n_cols: u32,
    pub pitch_x_mm: f64,
    pub pitch_y_mm: f64,
    #[serde(default)]
    pub z: ZPlacement,
}

impl LayerSpec {
    /// Rectangular layer with explicit z, the most common case in tests and fixtures
    pub fn rectangular(n_rows: u32, n_cols: u32, pitch_mm: f64, z_center_mm: f64) -> Self {
        Self {
            grid_type: GridType::Rectangular,
            n_rows,
            n_cols,
            pitch_x_mm: pitch_mm,
            pitch_y_mm: pitch_mm,
            z: ZPlacement::Explicit { z_center_mm },
        }
    }

    pub fn with_grid(mut self, grid_type: GridType) -> Self {
        self.grid_type = grid_type;
        self
    }

    pub fn with_z(mut self, z: ZPlacement) -> Self {
        self.z = z;
        self
    }

    pub fn cell_count(&self) -> usize {
        self.n_rows as usize * self.n_cols as usize
    }
}

/// A validated layer in metres, with its normalised z centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLayer {
    /// 1-based position in the stack
    pub layer_index: usize,
    pub grid_type: GridType,
    pub n_rows: u32,
    pub n_cols: u32,
    pub pitch_x: f64,
    pub pitch_y: f64,
    pub z: ZPlacement,
    /// Centre height after shifting the first layer to z = 0
    pub z_center: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_type_strings() {
        assert_eq!(GridType::BrickRowStagger.to_string(), "brick_row_stagger");
        assert_eq!("hex_pointy".parse::<GridType>().unwrap(), GridType::HexPointy);
        assert_eq!("HEX_FLAT".parse::<GridType>().unwrap(), GridType::HexFlat);
        assert!("triangular".parse::<GridType>().is_err());
    }

    #[test]
    fn test_hex_only_for_cylindrical() {
        assert!(GridType::HexFlat.allowed_for(FormFactor::Cylindrical));
        assert!(!GridType::HexFlat.allowed_for(FormFactor::Prismatic));
        assert!(!GridType::HexPointy.allowed_for(FormFactor::Prismatic));
        assert!(GridType::BrickRowStagger.allowed_for(FormFactor::Prismatic));
        assert!(GridType::Rectangular.allowed_for(FormFactor::Prismatic));
    }

    #[test]
    fn test_layer_spec_deserializes_with_default_z() {
        let layer: LayerSpec = serde_json::from_str(
            r#"{"grid_type":"hex_flat","n_rows":3,"n_cols":4,"pitch_x_mm":22.0,"pitch_y_mm":19.0}"#,
        )
        .unwrap();
        assert_eq!(layer.grid_type, GridType::HexFlat);
        assert_eq!(layer.z, ZPlacement::IndexPitch);
        assert_eq!(layer.cell_count(), 12);
    }

    #[test]
    fn test_explicit_z_deserializes() {
        let z: ZPlacement =
            serde_json::from_str(r#"{"mode":"explicit","z_center_mm":80.0}"#).unwrap();
        assert_eq!(z, ZPlacement::Explicit { z_center_mm: 80.0 });
    }
}
