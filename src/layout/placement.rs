use crate::domain::{mm_to_m, GridType, LayerSpec, ZPlacement};

/// In-plane centre of the cell at 1-based (row, col)
pub fn cell_xy(grid: GridType, row: u32, col: u32, pitch_x: f64, pitch_y: f64) -> (f64, f64) {
    let x = f64::from(col - 1) * pitch_x;
    let y = f64::from(row - 1) * pitch_y;
    match grid {
        GridType::Rectangular => (x, y),
        GridType::BrickRowStagger | GridType::HexFlat => {
            let shift = if row % 2 == 0 { 0.5 * pitch_x } else { 0.0 };
            (x + shift, y)
        }
        GridType::HexPointy => {
            let shift = if col % 2 == 1 { 0.5 * pitch_y } else { 0.0 };
            (x, y + shift)
        }
    }
}

/// Raw z centre of a layer (m) before normalisation
pub fn raw_layer_z(layer_no: usize, spec: &LayerSpec, z_pitch: Option<f64>) -> f64 {
    match spec.z {
        ZPlacement::Explicit { z_center_mm } => mm_to_m(z_center_mm),
        // z pitch presence is checked during validation
        ZPlacement::IndexPitch => (layer_no - 1) as f64 * z_pitch.unwrap_or(0.0),
    }
}

/// Layer z centres shifted so the first layer sits at z = 0
pub fn normalized_layer_z(layers: &[LayerSpec], z_pitch: Option<f64>) -> Vec<f64> {
    let raw: Vec<f64> = layers
        .iter()
        .enumerate()
        .map(|(i, spec)| raw_layer_z(i + 1, spec, z_pitch))
        .collect();
    let base = raw.first().copied().unwrap_or(0.0);
    raw.into_iter().map(|z| z - base).collect()
}
