//! # Busbar Topology
//!
//! Assigns every placed cell to a parallel group and links each cell to the
//! cell it feeds in series. Groups are numbered from 1, layer by layer, and
//! consecutive layers are chained: the last group of one layer feeds the
//! first group of the next, cell by cell.
//!
//! - `row_series_column_parallel`: each row of a layer is one parallel group
//! - `row_parallel_column_series`: each column of a layer is one parallel group

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::debug;

use crate::domain::{PackResult, ResolvedLayer};
use crate::error::{LayoutError, Result};
use crate::layout::neighbors::global_index_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConnectionType {
    RowSeriesColumnParallel,
    RowParallelColumnSeries,
}

impl ConnectionType {
    /// (groups, cells per group) contributed by one layer
    fn group_shape(&self, layer: &ResolvedLayer) -> (u32, u32) {
        match self {
            ConnectionType::RowSeriesColumnParallel => (layer.n_rows, layer.n_cols),
            ConnectionType::RowParallelColumnSeries => (layer.n_cols, layer.n_rows),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellConnection {
    pub global_index: u32,
    pub parallel_group: u32,
    /// Cell this one feeds in series; `None` at the pack's output terminal
    pub next_series: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusbarLayout {
    pub kind: ConnectionType,
    pub cells: Vec<CellConnection>,
    /// Number of parallel groups in series
    pub series_count: u32,
    /// Cells per parallel group
    pub parallel_count: u32,
}

impl BusbarLayout {
    pub fn connection(&self, global_index: u32) -> Option<&CellConnection> {
        let idx = (global_index as usize).checked_sub(1)?;
        self.cells.get(idx)
    }

    /// Members of a parallel group, in global index order
    pub fn group_members(&self, group: u32) -> Vec<u32> {
        self.cells
            .iter()
            .filter(|c| c.parallel_group == group)
            .map(|c| c.global_index)
            .collect()
    }
}

/// Derive the series/parallel topology of a generated pack
pub fn connect(result: &PackResult, kind: ConnectionType) -> Result<BusbarLayout> {
    let layers = &result.meta.layers;
    let first = layers.first().ok_or(LayoutError::NoLayers)?;
    let (_, parallel_count) = kind.group_shape(first);

    let mut cells = Vec::with_capacity(result.cells.len());
    let mut group_offset = 0;
    let mut layer_start = 1;

    for (i, layer) in layers.iter().enumerate() {
        let (groups, group_size) = kind.group_shape(layer);
        if group_size != parallel_count {
            return Err(LayoutError::IncompatibleLayers {
                layer: layer.layer_index,
                reason: format!(
                    "parallel groups hold {group_size} cells but layer 1 groups hold {parallel_count}"
                ),
            });
        }
        let next_layer_start = layer_start + layer.n_rows * layer.n_cols;
        let next_layer = layers.get(i + 1);

        for row in 1..=layer.n_rows {
            for col in 1..=layer.n_cols {
                let global_index = global_index_of(layer_start, layer.n_cols, row, col);
                let (parallel_group, next_series) = match kind {
                    ConnectionType::RowSeriesColumnParallel => {
                        let next = if row < layer.n_rows {
                            Some(global_index_of(layer_start, layer.n_cols, row + 1, col))
                        } else {
                            next_layer.map(|n| global_index_of(next_layer_start, n.n_cols, 1, col))
                        };
                        (group_offset + row, next)
                    }
                    ConnectionType::RowParallelColumnSeries => {
                        let next = if col < layer.n_cols {
                            Some(global_index_of(layer_start, layer.n_cols, row, col + 1))
                        } else {
                            next_layer.map(|n| global_index_of(next_layer_start, n.n_cols, row, 1))
                        };
                        (group_offset + col, next)
                    }
                };
                cells.push(CellConnection {
                    global_index,
                    parallel_group,
                    next_series,
                });
            }
        }

        group_offset += groups;
        layer_start = next_layer_start;
    }

    debug!(
        kind = %kind,
        series = group_offset,
        parallel = parallel_count,
        "connected pack busbars"
    );

    Ok(BusbarLayout {
        kind,
        cells,
        series_count: group_offset,
        parallel_count,
    })
}
