use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::busbar::{self, BusbarLayout, ConnectionType};
use crate::domain::{CellShape, GeneratorOptions, LayerSpec, OptionsOverrides, PackResult};
use crate::electrical::{find_cell_model, ElectricalSummary};
use crate::error::{LayoutError, Result};
use crate::layout::LayoutGenerator;

/// Everything needed to lay out (and optionally wire) a pack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackRequest {
    pub shape: CellShape,
    pub layers: Vec<LayerSpec>,
    /// Missing fields fall back to the configured defaults
    #[serde(default)]
    pub options: Option<OptionsOverrides>,
    #[serde(default)]
    pub connection: Option<ConnectionType>,
    /// Catalog id; needs `connection` to derive S/P counts
    #[serde(default)]
    pub cell_model: Option<String>,
}

/// Generation output plus the optional wiring and ratings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackReport {
    pub layout: PackResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<BusbarLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electrical: Option<ElectricalSummary>,
}

impl PackRequest {
    pub fn new(shape: CellShape, layers: Vec<LayerSpec>, options: GeneratorOptions) -> Self {
        Self {
            shape,
            layers,
            options: Some(options.into()),
            connection: None,
            cell_model: None,
        }
    }

    pub fn with_connection(mut self, connection: ConnectionType) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn with_cell_model(mut self, id: impl Into<String>) -> Self {
        self.cell_model = Some(id.into());
        self
    }

    /// Read a request from a `.json` or `.toml` file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading pack request {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let request = match ext.as_deref() {
            Some("json") => serde_json::from_str(&raw)
                .with_context(|| format!("parsing {} as JSON", path.display()))?,
            Some("toml") => toml::from_str(&raw)
                .with_context(|| format!("parsing {} as TOML", path.display()))?,
            other => bail!("unsupported pack request format: {:?}", other),
        };
        Ok(request)
    }

    /// Run the generator, then the busbar topology and ratings when requested
    pub fn generate(&self, defaults: &GeneratorOptions) -> Result<PackReport> {
        let options = self.options.clone().unwrap_or_default().resolve(defaults);
        let layout = LayoutGenerator::new(options).generate(&self.shape, &self.layers)?;

        let connections = self
            .connection
            .map(|kind| busbar::connect(&layout, kind))
            .transpose()?;

        let electrical = match (&self.cell_model, &connections) {
            (Some(id), Some(busbar)) => {
                let model = find_cell_model(id).ok_or_else(|| {
                    LayoutError::InvalidOptions(format!("unknown cell model '{id}'"))
                })?;
                Some(ElectricalSummary::for_busbar(model, busbar)?)
            }
            (Some(id), None) => {
                debug!(cell_model = %id, "no connection type given, skipping electrical summary");
                None
            }
            _ => None,
        };

        Ok(PackReport {
            layout,
            connections,
            electrical,
        })
    }
}
