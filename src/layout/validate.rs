//! Input checks run before any cell is placed.
//!
//! The overlap test is a nearest-neighbour proxy: it compares the smallest
//! centre-to-centre spacing a grid can produce against the cell footprint.
//! For regular grids of convex, uniformly spaced cells that spacing is the
//! binding constraint, so a full footprint intersection test is not needed.
//!
//! On row-staggered grids the half-shifted diagonal `hypot(px/2, py)` is never
//! shorter than `py`, so those grids reduce to the rectangular rule; the same
//! holds for `hex_pointy` with the axes swapped. The diagonal term is kept so
//! the rule reads the same for every grid, not because it ever binds.
//!
//! The whole stack is capped at [`MAX_CELLS`] so a bad request fails with an
//! error instead of exhausting memory.

use crate::domain::{mm_to_m, CellDims, GridType, LayerSpec, ZPlacement};
use crate::error::{LayoutError, Result};

/// Resolve the global z pitch (m) if any layer needs it
pub fn resolve_z_pitch(layers: &[LayerSpec], z_pitch_mm: Option<f64>) -> Result<Option<f64>> {
    let first_index_layer = layers
        .iter()
        .position(|l| matches!(l.z, ZPlacement::IndexPitch));

    match (first_index_layer, z_pitch_mm) {
        (None, _) => Ok(None),
        (Some(_), Some(pitch)) if pitch.is_finite() && pitch > 0.0 => Ok(Some(mm_to_m(pitch))),
        (Some(idx), _) => Err(LayoutError::MissingZPitch { layer: idx + 1 }),
    }
}

/// Check counts, pitches, z values and grid/form-factor compatibility for one layer
pub fn check_layer(layer_no: usize, spec: &LayerSpec, dims: &CellDims) -> Result<()> {
    if spec.n_rows == 0 {
        return Err(LayoutError::layer_err(layer_no, "rows must be a positive integer"));
    }
    if spec.n_cols == 0 {
        return Err(LayoutError::layer_err(layer_no, "columns must be a positive integer"));
    }
    if !spec.pitch_x_mm.is_finite() || spec.pitch_x_mm <= 0.0 {
        return Err(LayoutError::layer_err(
            layer_no,
            format!("pitch_x must be positive, got {}", spec.pitch_x_mm),
        ));
    }
    if !spec.pitch_y_mm.is_finite() || spec.pitch_y_mm <= 0.0 {
        return Err(LayoutError::layer_err(
            layer_no,
            format!("pitch_y must be positive, got {}", spec.pitch_y_mm),
        ));
    }
    if let ZPlacement::Explicit { z_center_mm } = spec.z {
        if !z_center_mm.is_finite() {
            return Err(LayoutError::layer_err(
                layer_no,
                format!("z_center must be a number, got {z_center_mm}"),
            ));
        }
    }
    if !spec.grid_type.allowed_for(dims.form_factor()) {
        return Err(LayoutError::layer_err(
            layer_no,
            format!(
                "grid type {} is not supported for {} cells",
                spec.grid_type,
                dims.form_factor()
            ),
        ));
    }
    Ok(())
}

/// Upper bound on the number of cells across all layers
pub const MAX_CELLS: u64 = 1_000_000;

/// Reject stacks whose cumulative cell count exceeds [`MAX_CELLS`], naming the
/// layer that crosses the limit
pub fn check_cell_total(layers: &[LayerSpec]) -> Result<()> {
    let mut total: u64 = 0;
    for (i, spec) in layers.iter().enumerate() {
        total = u64::from(spec.n_rows)
            .checked_mul(u64::from(spec.n_cols))
            .and_then(|count| total.checked_add(count))
            .filter(|&sum| sum <= MAX_CELLS)
            .ok_or_else(|| {
                LayoutError::layer_err(
                    i + 1,
                    format!(
                        "{}x{} cells would exceed the pack limit of {MAX_CELLS} cells",
                        spec.n_rows, spec.n_cols
                    ),
                )
            })?;
    }
    Ok(())
}

/// Smallest centre-to-centre distance a grid produces for the given pitches (m)
pub fn nearest_spacing(grid: GridType, pitch_x: f64, pitch_y: f64) -> f64 {
    match grid {
        GridType::Rectangular => pitch_x.min(pitch_y),
        GridType::BrickRowStagger | GridType::HexFlat => {
            // Adjacent rows are shifted by half a column pitch.
            let diag = (0.5 * pitch_x).hypot(pitch_y);
            pitch_x.min(pitch_y).min(diag)
        }
        GridType::HexPointy => {
            // Adjacent columns are shifted by half a row pitch.
            let diag = pitch_x.hypot(0.5 * pitch_y);
            pitch_x.min(pitch_y).min(diag)
        }
    }
}

/// Reject pitches that would let neighbouring footprints intersect
pub fn check_spacing(
    layer_no: usize,
    grid: GridType,
    pitch_x: f64,
    pitch_y: f64,
    dims: &CellDims,
) -> Result<()> {
    match *dims {
        CellDims::Prismatic { length, width, .. } => {
            if pitch_x < length {
                return Err(LayoutError::OverlapDetected {
                    layer: layer_no,
                    grid,
                    nearest_m: pitch_x,
                    required_m: length,
                });
            }
            if pitch_y < width {
                return Err(LayoutError::OverlapDetected {
                    layer: layer_no,
                    grid,
                    nearest_m: pitch_y,
                    required_m: width,
                });
            }
        }
        CellDims::Cylindrical { radius, .. } => {
            let nearest = nearest_spacing(grid, pitch_x, pitch_y);
            let diameter = 2.0 * radius;
            if nearest < diameter {
                return Err(LayoutError::OverlapDetected {
                    layer: layer_no,
                    grid,
                    nearest_m: nearest,
                    required_m: diameter,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cylinder() -> CellDims {
        CellDims::Cylindrical {
            radius: 0.0105,
            height: 0.07,
        }
    }

    #[test]
    fn test_z_pitch_not_needed_for_explicit_layers() {
        let layers = vec![LayerSpec::rectangular(2, 2, 25.0, 0.0)];
        assert_eq!(resolve_z_pitch(&layers, None).unwrap(), None);
    }

    #[test]
    fn test_missing_z_pitch_reports_first_index_layer() {
        let layers = vec![
            LayerSpec::rectangular(2, 2, 25.0, 0.0),
            LayerSpec::rectangular(2, 2, 25.0, 0.0).with_z(ZPlacement::IndexPitch),
        ];
        assert_eq!(
            resolve_z_pitch(&layers, None),
            Err(LayoutError::MissingZPitch { layer: 2 })
        );
        assert_eq!(
            resolve_z_pitch(&layers, Some(0.0)),
            Err(LayoutError::MissingZPitch { layer: 2 })
        );
        assert_eq!(resolve_z_pitch(&layers, Some(80.0)).unwrap(), Some(0.08));
    }

    #[test]
    fn test_zero_rows_rejected() {
        let mut layer = LayerSpec::rectangular(2, 2, 25.0, 0.0);
        layer.n_rows = 0;
        let err = check_layer(1, &layer, &cylinder()).unwrap_err();
        assert_eq!(err.kind(), "InvalidLayer");
        assert_eq!(err.layer(), Some(1));
    }

    #[test]
    fn test_hex_rejected_for_prismatic() {
        let prism = CellDims::Prismatic {
            length: 0.1,
            width: 0.03,
            height: 0.09,
        };
        let layer = LayerSpec::rectangular(2, 2, 120.0, 0.0).with_grid(GridType::HexPointy);
        assert!(matches!(
            check_layer(3, &layer, &prism),
            Err(LayoutError::InvalidLayer { layer: 3, .. })
        ));
    }

    #[test]
    fn test_rectangular_spacing_uses_smaller_pitch() {
        assert!(check_spacing(1, GridType::Rectangular, 0.025, 0.022, &cylinder()).is_ok());
        let err = check_spacing(1, GridType::Rectangular, 0.025, 0.020, &cylinder()).unwrap_err();
        assert_eq!(err.kind(), "OverlapDetected");
    }

    #[test]
    fn test_staggered_spacing_includes_diagonal() {
        // diag = hypot(0.0125, 0.022) > 0.022, so the row pitch binds
        let nearest = nearest_spacing(GridType::HexFlat, 0.025, 0.022);
        assert!((nearest - 0.022).abs() < 1e-12);

        let pointy = nearest_spacing(GridType::HexPointy, 0.022, 0.025);
        assert!((pointy - 0.022).abs() < 1e-12);
    }

    #[test]
    fn test_row_stagger_matches_rectangular_rule() {
        for &(px, py) in &[(0.01, 0.05), (0.05, 0.01), (0.021, 0.021), (0.002, 0.03)] {
            let rect = nearest_spacing(GridType::Rectangular, px, py);
            assert_eq!(nearest_spacing(GridType::BrickRowStagger, px, py), rect);
            assert_eq!(nearest_spacing(GridType::HexFlat, px, py), rect);
            assert_eq!(nearest_spacing(GridType::HexPointy, px, py), rect);
        }
    }

    #[test]
    fn test_cell_total_names_crossing_layer() {
        let layers = vec![
            LayerSpec::rectangular(500, 1000, 25.0, 0.0),
            LayerSpec::rectangular(500, 1000, 25.0, 80.0),
            LayerSpec::rectangular(1, 1, 25.0, 160.0),
        ];
        assert!(check_cell_total(&layers[..2]).is_ok());
        assert!(matches!(
            check_cell_total(&layers),
            Err(LayoutError::InvalidLayer { layer: 3, .. })
        ));

        let huge = [LayerSpec::rectangular(u32::MAX, u32::MAX, 25.0, 0.0)];
        assert!(matches!(
            check_cell_total(&huge),
            Err(LayoutError::InvalidLayer { layer: 1, .. })
        ));
    }

    #[test]
    fn test_prismatic_spacing_per_axis() {
        let prism = CellDims::Prismatic {
            length: 0.1,
            width: 0.03,
            height: 0.09,
        };
        assert!(check_spacing(1, GridType::Rectangular, 0.1, 0.03, &prism).is_ok());
        assert!(check_spacing(1, GridType::Rectangular, 0.099, 0.03, &prism).is_err());
        assert!(check_spacing(1, GridType::BrickRowStagger, 0.1, 0.029, &prism).is_err());
    }
}
