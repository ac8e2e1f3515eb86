//! # Form Input
//!
//! The pack builder UI submits every numeric field as the text the user typed.
//! This module coerces those strings into a typed [`PackRequest`]. Blank or
//! non-numeric values are validation failures, never silent defaults.

use serde::{Deserialize, Serialize};

use crate::busbar::ConnectionType;
use crate::domain::{CellShape, FormFactor, GeneratorOptions, GridType, LayerSpec, ZPlacement};
use crate::error::{LayoutError, Result};
use crate::request::PackRequest;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeForm {
    pub form_factor: String,
    pub radius: String,
    pub length: String,
    pub width: String,
    pub height: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerForm {
    pub grid_type: String,
    pub n_rows: String,
    pub n_cols: String,
    pub pitch_x: String,
    pub pitch_y: String,
    /// `index_pitch` (default when blank) or `explicit`
    pub z_mode: String,
    pub z_center: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsForm {
    pub allow_overlap: bool,
    pub compute_neighbors: bool,
    pub label_schema: String,
    pub z_pitch: String,
    pub max_weight: String,
    pub max_volume: String,
    pub unit_cell_mass: String,
}

impl Default for OptionsForm {
    fn default() -> Self {
        Self {
            allow_overlap: false,
            compute_neighbors: true,
            label_schema: String::new(),
            z_pitch: String::new(),
            max_weight: String::new(),
            max_volume: String::new(),
            unit_cell_mass: String::new(),
        }
    }
}

/// Raw pack builder submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackForm {
    pub shape: ShapeForm,
    pub layers: Vec<LayerForm>,
    pub options: OptionsForm,
    pub connection: String,
    pub cell_model: String,
}

enum Field {
    Blank,
    NotANumber,
    Number(f64),
}

fn number(raw: &str) -> Field {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Field::Blank;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Field::Number(v),
        _ => Field::NotANumber,
    }
}

fn non_blank(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl ShapeForm {
    fn dimension(&self, name: &str, raw: &str) -> Result<f64> {
        match number(raw) {
            Field::Number(v) => Ok(v),
            Field::Blank => Err(LayoutError::InvalidDimensions(format!("{name} is required"))),
            Field::NotANumber => Err(LayoutError::InvalidDimensions(format!(
                "{name} must be a number, got '{}'",
                raw.trim()
            ))),
        }
    }

    pub fn parse(&self) -> Result<CellShape> {
        let form_factor: FormFactor = self.form_factor.trim().parse().map_err(|_| {
            LayoutError::InvalidDimensions(format!(
                "unknown form factor '{}'",
                self.form_factor.trim()
            ))
        })?;

        Ok(match form_factor {
            FormFactor::Cylindrical => CellShape::Cylindrical {
                radius_mm: self.dimension("radius", &self.radius)?,
                height_mm: self.dimension("height", &self.height)?,
            },
            FormFactor::Prismatic => CellShape::Prismatic {
                length_mm: self.dimension("length", &self.length)?,
                width_mm: self.dimension("width", &self.width)?,
                height_mm: self.dimension("height", &self.height)?,
            },
        })
    }
}

impl LayerForm {
    fn count(layer_no: usize, name: &str, raw: &str) -> Result<u32> {
        match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(LayoutError::layer_err(
                layer_no,
                format!("{name} must be a positive integer, got '{}'", raw.trim()),
            )),
        }
    }

    fn length(layer_no: usize, name: &str, raw: &str) -> Result<f64> {
        match number(raw) {
            Field::Number(v) => Ok(v),
            Field::Blank => Err(LayoutError::layer_err(layer_no, format!("{name} is required"))),
            Field::NotANumber => Err(LayoutError::layer_err(
                layer_no,
                format!("{name} must be a number, got '{}'", raw.trim()),
            )),
        }
    }

    /// Parse this layer; `layer_no` is 1-based
    pub fn parse(&self, layer_no: usize) -> Result<LayerSpec> {
        let grid_type: GridType = self.grid_type.trim().parse().map_err(|_| {
            LayoutError::layer_err(
                layer_no,
                format!("unknown grid type '{}'", self.grid_type.trim()),
            )
        })?;

        let z = match non_blank(&self.z_mode).map(str::to_ascii_lowercase).as_deref() {
            None | Some("index_pitch") => ZPlacement::IndexPitch,
            Some("explicit") => ZPlacement::Explicit {
                z_center_mm: Self::length(layer_no, "z_center", &self.z_center)?,
            },
            Some(other) => {
                return Err(LayoutError::layer_err(
                    layer_no,
                    format!("unknown z mode '{other}'"),
                ))
            }
        };

        Ok(LayerSpec {
            grid_type,
            n_rows: Self::count(layer_no, "rows", &self.n_rows)?,
            n_cols: Self::count(layer_no, "columns", &self.n_cols)?,
            pitch_x_mm: Self::length(layer_no, "pitch_x", &self.pitch_x)?,
            pitch_y_mm: Self::length(layer_no, "pitch_y", &self.pitch_y)?,
            z,
        })
    }
}

impl OptionsForm {
    fn limit(name: &str, raw: &str) -> Result<Option<f64>> {
        match number(raw) {
            Field::Blank => Ok(None),
            Field::Number(v) => Ok(Some(v)),
            Field::NotANumber => Err(LayoutError::InvalidOptions(format!(
                "{name} must be a number, got '{}'",
                raw.trim()
            ))),
        }
    }

    /// Parse options; `layers` decides whether a z pitch is required
    pub fn parse(&self, layers: &[LayerSpec]) -> Result<GeneratorOptions> {
        let index_layer = layers
            .iter()
            .position(|l| matches!(l.z, ZPlacement::IndexPitch));

        let z_pitch_mm = match (number(&self.z_pitch), index_layer) {
            (Field::Number(v), _) => Some(v),
            (Field::Blank, _) => None,
            (Field::NotANumber, Some(idx)) => {
                return Err(LayoutError::MissingZPitch { layer: idx + 1 })
            }
            (Field::NotANumber, None) => {
                return Err(LayoutError::InvalidOptions(format!(
                    "z_pitch must be a number, got '{}'",
                    self.z_pitch.trim()
                )))
            }
        };

        let unit_cell_mass_kg = Self::limit("unit_cell_mass", &self.unit_cell_mass)?
            .ok_or_else(|| LayoutError::InvalidOptions("unit_cell_mass is required".to_string()))?;

        Ok(GeneratorOptions {
            allow_overlap: self.allow_overlap,
            compute_neighbors: self.compute_neighbors,
            label_schema: non_blank(&self.label_schema).map(str::to_string),
            z_pitch_mm,
            max_weight_kg: Self::limit("max_weight", &self.max_weight)?,
            max_volume_m3: Self::limit("max_volume", &self.max_volume)?,
            unit_cell_mass_kg,
        })
    }
}

impl PackForm {
    /// Coerce the submission into a typed request
    pub fn into_request(self) -> Result<PackRequest> {
        let shape = self.shape.parse()?;
        if self.layers.is_empty() {
            return Err(LayoutError::NoLayers);
        }
        let layers = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| layer.parse(i + 1))
            .collect::<Result<Vec<_>>>()?;
        let options = self.options.parse(&layers)?;

        let connection = non_blank(&self.connection)
            .map(|raw| {
                raw.parse::<ConnectionType>().map_err(|_| {
                    LayoutError::InvalidOptions(format!("unknown connection type '{raw}'"))
                })
            })
            .transpose()?;

        Ok(PackRequest {
            shape,
            layers,
            options: Some(options.into()),
            connection,
            cell_model: non_blank(&self.cell_model).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> PackForm {
        PackForm {
            shape: ShapeForm {
                form_factor: "cylindrical".to_string(),
                radius: "10.5".to_string(),
                height: " 70 ".to_string(),
                ..Default::default()
            },
            layers: vec![LayerForm {
                grid_type: "rectangular".to_string(),
                n_rows: "2".to_string(),
                n_cols: "2".to_string(),
                pitch_x: "25".to_string(),
                pitch_y: "25".to_string(),
                z_mode: "explicit".to_string(),
                z_center: "0".to_string(),
            }],
            options: OptionsForm {
                unit_cell_mass: "0.07".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form() {
        let req = form().into_request().unwrap();
        assert_eq!(
            req.shape,
            CellShape::Cylindrical {
                radius_mm: 10.5,
                height_mm: 70.0
            }
        );
        assert_eq!(req.layers[0], LayerSpec::rectangular(2, 2, 25.0, 0.0));
        let options = req.options.unwrap();
        assert_eq!(options.unit_cell_mass_kg, Some(0.07));
        assert_eq!(options.max_weight_kg, None);
        assert!(req.connection.is_none());
    }

    #[test]
    fn test_blank_radius() {
        let mut f = form();
        f.shape.radius = "  ".to_string();
        assert!(matches!(
            f.into_request(),
            Err(LayoutError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_non_numeric_pitch() {
        let mut f = form();
        f.layers[0].pitch_y = "25mm".to_string();
        let err = f.into_request().unwrap_err();
        assert_eq!(err.kind(), "InvalidLayer");
        assert_eq!(err.layer(), Some(1));
    }

    #[test]
    fn test_fractional_rows_rejected() {
        let mut f = form();
        f.layers[0].n_rows = "2.5".to_string();
        assert!(f.into_request().is_err());
    }

    #[test]
    fn test_index_pitch_needs_numeric_z_pitch() {
        let mut f = form();
        f.layers[0].z_mode = String::new();
        f.options.z_pitch = "abc".to_string();
        assert_eq!(
            f.into_request().unwrap_err(),
            LayoutError::MissingZPitch { layer: 1 }
        );

        let mut f = form();
        f.layers[0].z_mode = "index_pitch".to_string();
        f.options.z_pitch = "75".to_string();
        let req = f.into_request().unwrap();
        assert_eq!(req.options.unwrap().z_pitch_mm, Some(75.0));
    }

    #[test]
    fn test_unit_mass_required() {
        let mut f = form();
        f.options.unit_cell_mass = String::new();
        assert_eq!(f.into_request().unwrap_err().kind(), "InvalidOptions");
    }

    #[test]
    fn test_unknown_grid_and_form_factor() {
        let mut f = form();
        f.layers[0].grid_type = "diamond".to_string();
        assert_eq!(f.into_request().unwrap_err().kind(), "InvalidLayer");

        let mut f = form();
        f.shape.form_factor = "pouch".to_string();
        assert_eq!(f.into_request().unwrap_err().kind(), "InvalidDimensions");
    }

    #[test]
    fn test_connection_and_model() {
        let mut f = form();
        f.connection = "row_series_column_parallel".to_string();
        f.cell_model = "tesla-4680".to_string();
        let req = f.into_request().unwrap();
        assert_eq!(req.connection, Some(ConnectionType::RowSeriesColumnParallel));
        assert_eq!(req.cell_model.as_deref(), Some("tesla-4680"));
    }

    #[test]
    fn test_form_deserializes_from_ui_json() {
        let json = r#"{
            "shape": {"form_factor": "prismatic", "length": "100", "width": "30", "height": "90"},
            "layers": [{"grid_type": "rectangular", "n_rows": "1", "n_cols": "3",
                        "pitch_x": "100", "pitch_y": "30", "z_mode": "explicit", "z_center": "45"}],
            "options": {"unit_cell_mass": "0.9", "max_weight": "2"}
        }"#;
        let f: PackForm = serde_json::from_str(json).unwrap();
        let req = f.into_request().unwrap();
        let report = req.generate(&GeneratorOptions::default()).unwrap();
        assert_eq!(report.layout.cells.len(), 3);
        assert_eq!(report.layout.warnings.len(), 1);
    }
}
