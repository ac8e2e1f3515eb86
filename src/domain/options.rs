use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default cell label; placeholders are `{layer}`, `{row}`, `{col}` and `{index}`
pub const DEFAULT_LABEL_SCHEMA: &str = "R{row}C{col}L{layer}";

fn default_true() -> bool {
    true
}

/// Global generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeneratorOptions {
    /// Skip the minimum-spacing check
    #[serde(default)]
    pub allow_overlap: bool,

    #[serde(default = "default_true")]
    pub compute_neighbors: bool,

    #[serde(default)]
    pub label_schema: Option<String>,

    /// Global layer pitch for `index_pitch` layers (mm)
    #[serde(default)]
    pub z_pitch_mm: Option<f64>,

    /// Advisory pack weight limit (kg)
    #[serde(default)]
    #[validate(range(exclusive_min = 0.0))]
    pub max_weight_kg: Option<f64>,

    /// Advisory pack volume limit (m³)
    #[serde(default)]
    #[validate(range(exclusive_min = 0.0))]
    pub max_volume_m3: Option<f64>,

    /// Mass of a single cell (kg)
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub unit_cell_mass_kg: f64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            allow_overlap: false,
            compute_neighbors: true,
            label_schema: None,
            z_pitch_mm: None,
            max_weight_kg: None,
            max_volume_m3: None,
            unit_cell_mass_kg: 0.0,
        }
    }
}

impl GeneratorOptions {
    pub fn with_z_pitch(mut self, z_pitch_mm: f64) -> Self {
        self.z_pitch_mm = Some(z_pitch_mm);
        self
    }

    pub fn with_overlap_allowed(mut self, allow: bool) -> Self {
        self.allow_overlap = allow;
        self
    }

    pub fn with_label_schema(mut self, schema: impl Into<String>) -> Self {
        self.label_schema = Some(schema.into());
        self
    }

    pub fn with_unit_mass(mut self, kg: f64) -> Self {
        self.unit_cell_mass_kg = kg;
        self
    }

    pub fn with_limits(mut self, max_weight_kg: Option<f64>, max_volume_m3: Option<f64>) -> Self {
        self.max_weight_kg = max_weight_kg;
        self.max_volume_m3 = max_volume_m3;
        self
    }

    pub fn label_schema(&self) -> &str {
        self.label_schema
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_LABEL_SCHEMA)
    }
}

/// Request-side options; any field left out is taken from the configured defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsOverrides {
    pub allow_overlap: Option<bool>,
    pub compute_neighbors: Option<bool>,
    pub label_schema: Option<String>,
    pub z_pitch_mm: Option<f64>,
    pub max_weight_kg: Option<f64>,
    pub max_volume_m3: Option<f64>,
    pub unit_cell_mass_kg: Option<f64>,
}

impl OptionsOverrides {
    /// Fill the gaps from `defaults`, field by field
    pub fn resolve(&self, defaults: &GeneratorOptions) -> GeneratorOptions {
        GeneratorOptions {
            allow_overlap: self.allow_overlap.unwrap_or(defaults.allow_overlap),
            compute_neighbors: self.compute_neighbors.unwrap_or(defaults.compute_neighbors),
            label_schema: self
                .label_schema
                .clone()
                .or_else(|| defaults.label_schema.clone()),
            z_pitch_mm: self.z_pitch_mm.or(defaults.z_pitch_mm),
            max_weight_kg: self.max_weight_kg.or(defaults.max_weight_kg),
            max_volume_m3: self.max_volume_m3.or(defaults.max_volume_m3),
            unit_cell_mass_kg: self.unit_cell_mass_kg.unwrap_or(defaults.unit_cell_mass_kg),
        }
    }
}

impl From<GeneratorOptions> for OptionsOverrides {
    fn from(options: GeneratorOptions) -> Self {
        Self {
            allow_overlap: Some(options.allow_overlap),
            compute_neighbors: Some(options.compute_neighbors),
            label_schema: options.label_schema,
            z_pitch_mm: options.z_pitch_mm,
            max_weight_kg: options.max_weight_kg,
            max_volume_m3: options.max_volume_m3,
            unit_cell_mass_kg: Some(options.unit_cell_mass_kg),
        }
    }
}
