use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::GeneratorOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig { pub path: PathBuf }

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Write the report here instead of stdout
    #[serde(default)]
    pub path: Option<PathBuf>,
    pub pretty: bool,
}

/// Generator options used when a request carries none
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    pub allow_overlap: bool,
    pub compute_neighbors: bool,
    pub unit_cell_mass_kg: f64,
    #[serde(default)]
    pub label_schema: Option<String>,
    #[serde(default)]
    pub z_pitch_mm: Option<f64>,
}

impl DefaultsConfig {
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            allow_overlap: self.allow_overlap,
            compute_neighbors: self.compute_neighbors,
            label_schema: self.label_schema.clone(),
            z_pitch_mm: self.z_pitch_mm,
            unit_cell_mass_kg: self.unit_cell_mass_kg,
            ..GeneratorOptions::default()
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("PACK__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }
}
