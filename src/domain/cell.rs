use serde::{Deserialize, Serialize};

use super::CellDims;

/// Axis-aligned footprint of a cell in the pack frame (m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox2d {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl BBox2d {
    pub fn around(x: f64, y: f64, half_x: f64, half_y: f64) -> Self {
        Self {
            xmin: x - half_x,
            xmax: x + half_x,
            ymin: y - half_y,
            ymax: y + half_y,
        }
    }
}

/// Where a cell sits within its own layer grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    Corner,
    Edge,
    Center,
}

impl CellClass {
    pub fn classify(row: u32, col: u32, n_rows: u32, n_cols: u32) -> Self {
        let on_row_edge = row == 1 || row == n_rows;
        let on_col_edge = col == 1 || col == n_cols;
        match (on_row_edge, on_col_edge) {
            (true, true) => CellClass::Corner,
            (true, false) | (false, true) => CellClass::Edge,
            (false, false) => CellClass::Center,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedCell {
    /// 1-based, contiguous in layer, row, column order
    pub global_index: u32,
    pub layer_index: usize,
    pub row_index: u32,
    pub col_index: u32,
    /// Centre [x, y, z] in metres
    pub position: [f64; 3],
    pub dims: CellDims,
    pub bbox_2d: BBox2d,
    pub neighbors_same_layer: Vec<u32>,
    pub label: String,
    pub class: CellClass,
}

impl PlacedCell {
    pub fn z(&self) -> f64 {
        self.position[2]
    }
}
