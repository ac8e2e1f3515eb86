use tracing::debug;
use validator::Validate;

use super::{aggregate, label, neighbors, placement, validate};
use crate::domain::{
    mm_to_m, BBox2d, CellClass, CellShape, GeneratorOptions, LayerSpec, PackMeta, PackResult,
    PlacedCell, ResolvedLayer,
};
use crate::error::{LayoutError, Result};

/// Pack Layout Generator
///
/// Turns a cell shape and a stack of layer grids into placed cells with
/// positions, footprints, neighbour links and pack-level aggregates.
///
/// Generation steps:
/// 1. Resolve the cell shape to metres
/// 2. Validate options, the layer list and the global z pitch
/// 3. Validate every layer (counts, pitches, grid type, spacing)
/// 4. Place cells layer by layer, row by row, column by column
/// 5. Link same-layer neighbours
/// 6. Aggregate the pack bounding box, volume and weight
///
/// Holds no state between calls; each call recomputes everything.
#[derive(Debug, Clone, Default)]
pub struct LayoutGenerator {
    options: GeneratorOptions,
}

impl LayoutGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Generate a pack layout, or fail without a partial result
    pub fn generate(&self, shape: &CellShape, layers: &[LayerSpec]) -> Result<PackResult> {
        let options = &self.options;

        // Step 1: cell geometry
        let dims = shape.resolve()?;

        // Step 2: global inputs
        options.validate()?;
        if !options.unit_cell_mass_kg.is_finite() {
            return Err(LayoutError::InvalidOptions(
                "unit_cell_mass_kg must be a finite number".to_string(),
            ));
        }
        if layers.is_empty() {
            return Err(LayoutError::NoLayers);
        }
        let z_pitch = validate::resolve_z_pitch(layers, options.z_pitch_mm)?;

        // Step 3: per-layer checks
        for (i, spec) in layers.iter().enumerate() {
            let layer_no = i + 1;
            validate::check_layer(layer_no, spec, &dims)?;
            if !options.allow_overlap {
                validate::check_spacing(
                    layer_no,
                    spec.grid_type,
                    mm_to_m(spec.pitch_x_mm),
                    mm_to_m(spec.pitch_y_mm),
                    &dims,
                )?;
            }
        }
        validate::check_cell_total(layers)?;

        // Step 4: placement
        let layer_z = placement::normalized_layer_z(layers, z_pitch);
        let (half_x, half_y) = dims.half_extents();
        let schema = options.label_schema();
        let total: usize = layers.iter().map(LayerSpec::cell_count).sum();

        let mut cells = Vec::with_capacity(total);
        let mut resolved = Vec::with_capacity(layers.len());
        let mut next_index: u32 = 1;

        for (i, spec) in layers.iter().enumerate() {
            let layer_no = i + 1;
            let layer = ResolvedLayer {
                layer_index: layer_no,
                grid_type: spec.grid_type,
                n_rows: spec.n_rows,
                n_cols: spec.n_cols,
                pitch_x: mm_to_m(spec.pitch_x_mm),
                pitch_y: mm_to_m(spec.pitch_y_mm),
                z: spec.z,
                z_center: layer_z[i],
            };
            let layer_start = next_index;

            for row in 1..=layer.n_rows {
                for col in 1..=layer.n_cols {
                    let (x, y) =
                        placement::cell_xy(layer.grid_type, row, col, layer.pitch_x, layer.pitch_y);

                    // Step 5: neighbours
                    let neighbors_same_layer = if options.compute_neighbors {
                        neighbors::neighbor_positions(
                            layer.grid_type,
                            row,
                            col,
                            layer.n_rows,
                            layer.n_cols,
                        )
                        .into_iter()
                        .map(|(r, c)| neighbors::global_index_of(layer_start, layer.n_cols, r, c))
                        .collect()
                    } else {
                        Vec::new()
                    };

                    cells.push(PlacedCell {
                        global_index: next_index,
                        layer_index: layer_no,
                        row_index: row,
                        col_index: col,
                        position: [x, y, layer.z_center],
                        dims,
                        bbox_2d: BBox2d::around(x, y, half_x, half_y),
                        neighbors_same_layer,
                        label: label::render_label(schema, layer_no, row, col, next_index),
                        class: CellClass::classify(row, col, layer.n_rows, layer.n_cols),
                    });
                    next_index += 1;
                }
            }

            debug!(
                layer = layer_no,
                grid = %layer.grid_type,
                rows = layer.n_rows,
                cols = layer.n_cols,
                z_center = layer.z_center,
                "placed layer"
            );
            resolved.push(layer);
        }

        // Step 6: aggregates
        let bbox = aggregate::pack_bbox(&cells);
        let volume_m3 = bbox.volume();
        let weight_kg = cells.len() as f64 * options.unit_cell_mass_kg;
        let warnings = aggregate::check_limits(weight_kg, volume_m3, options);

        debug!(
            cells = cells.len(),
            layers = resolved.len(),
            volume_m3,
            weight_kg,
            "generated pack layout"
        );

        Ok(PackResult {
            meta: PackMeta {
                bbox,
                volume_m3,
                weight_kg,
                cell_count: cells.len(),
                layers: resolved,
            },
            cells,
            warnings,
        })
    }
}

/// Generate with the given options; see [`LayoutGenerator::generate`]
pub fn generate(
    shape: &CellShape,
    layers: &[LayerSpec],
    options: &GeneratorOptions,
) -> Result<PackResult> {
    LayoutGenerator::new(options.clone()).generate(shape, layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellClass, ConstraintWarning, GridType, ZPlacement};

    fn cylinder() -> CellShape {
        CellShape::Cylindrical {
            radius_mm: 10.5,
            height_mm: 70.0,
        }
    }

    fn prism() -> CellShape {
        CellShape::Prismatic {
            length_mm: 100.0,
            width_mm: 30.0,
            height_mm: 90.0,
        }
    }

    #[test]
    fn test_two_by_two_scenario() {
        let layers = vec![LayerSpec::rectangular(2, 2, 25.0, 0.0)];
        let result = generate(&cylinder(), &layers, &GeneratorOptions::default()).unwrap();

        assert_eq!(result.cells.len(), 4);
        let positions: Vec<[f64; 3]> = result.cells.iter().map(|c| c.position).collect();
        assert_eq!(
            positions,
            vec![
                [0.0, 0.0, 0.0],
                [0.025, 0.0, 0.0],
                [0.0, 0.025, 0.0],
                [0.025, 0.025, 0.0]
            ]
        );
        for (i, cell) in result.cells.iter().enumerate() {
            assert_eq!(cell.global_index, i as u32 + 1);
            assert_eq!(cell.neighbors_same_layer.len(), 2);
            assert_eq!(cell.class, CellClass::Corner);
        }

        let bbox = result.meta.bbox;
        assert!((bbox.xmin + 0.0105).abs() < 1e-12);
        assert!((bbox.xmax - 0.0355).abs() < 1e-12);
        assert!((bbox.ymin + 0.0105).abs() < 1e-12);
        assert!((bbox.ymax - 0.0355).abs() < 1e-12);
        assert!((bbox.zmin + 0.035).abs() < 1e-12);
        assert!((bbox.zmax - 0.035).abs() < 1e-12);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_layers_rejected() {
        let err = generate(&cylinder(), &[], &GeneratorOptions::default()).unwrap_err();
        assert_eq!(err, LayoutError::NoLayers);
    }

    #[test]
    fn test_shape_checked_before_layers() {
        let bad = CellShape::Cylindrical {
            radius_mm: -1.0,
            height_mm: 70.0,
        };
        let err = generate(&bad, &[], &GeneratorOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "InvalidDimensions");
    }

    #[test]
    fn test_index_pitch_without_z_pitch() {
        let layers = vec![LayerSpec::rectangular(2, 2, 25.0, 0.0).with_z(ZPlacement::IndexPitch)];
        let err = generate(&cylinder(), &layers, &GeneratorOptions::default()).unwrap_err();
        assert_eq!(err, LayoutError::MissingZPitch { layer: 1 });
    }

    #[test]
    fn test_overlap_rejected_unless_allowed() {
        let layers = vec![LayerSpec::rectangular(2, 3, 90.0, 0.0)];
        let strict = generate(&prism(), &layers, &GeneratorOptions::default());
        assert!(matches!(
            strict,
            Err(LayoutError::OverlapDetected { layer: 1, .. })
        ));

        let relaxed = GeneratorOptions::default().with_overlap_allowed(true);
        let result = generate(&prism(), &layers, &relaxed).unwrap();
        assert_eq!(result.cells.len(), 6);
    }

    #[test]
    fn test_neighbors_disabled() {
        let options = GeneratorOptions {
            compute_neighbors: false,
            ..Default::default()
        };
        let layers = vec![LayerSpec::rectangular(3, 3, 25.0, 0.0)];
        let result = generate(&cylinder(), &layers, &options).unwrap();
        assert!(result.cells.iter().all(|c| c.neighbors_same_layer.is_empty()));
    }

    #[test]
    fn test_neighbors_stay_in_layer() {
        let layers = vec![
            LayerSpec::rectangular(2, 2, 25.0, 0.0),
            LayerSpec::rectangular(2, 2, 25.0, 75.0),
        ];
        let result = generate(&cylinder(), &layers, &GeneratorOptions::default()).unwrap();
        for cell in result.layer_cells(2) {
            for n in &cell.neighbors_same_layer {
                assert!((5..=8).contains(n), "neighbor {n} outside layer 2");
            }
        }
    }

    #[test]
    fn test_stacked_layers_z_and_weight() {
        let layers = vec![
            LayerSpec::rectangular(1, 2, 25.0, 0.0).with_z(ZPlacement::IndexPitch),
            LayerSpec::rectangular(1, 2, 25.0, 0.0).with_z(ZPlacement::IndexPitch),
        ];
        let options = GeneratorOptions::default()
            .with_z_pitch(80.0)
            .with_unit_mass(0.07)
            .with_limits(Some(0.2), None);
        let result = generate(&cylinder(), &layers, &options).unwrap();

        assert_eq!(result.cells[2].z(), 0.08);
        assert!((result.meta.weight_kg - 0.28).abs() < 1e-12);
        assert!((result.meta.bbox.zmax - 0.115).abs() < 1e-12);
        assert_eq!(result.meta.layers.len(), 2);
        assert!(matches!(
            result.warnings.as_slice(),
            [ConstraintWarning::WeightExceeded { .. }]
        ));
    }

    #[test]
    fn test_hex_grid_with_prismatic_rejected() {
        let layers = vec![LayerSpec::rectangular(2, 2, 120.0, 0.0).with_grid(GridType::HexFlat)];
        let err = generate(&prism(), &layers, &GeneratorOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "InvalidLayer");
    }

    #[test]
    fn test_oversized_layer_fails_cleanly() {
        let layers = vec![LayerSpec::rectangular(200_000, 200_000, 25.0, 0.0)];
        let err = generate(&cylinder(), &layers, &GeneratorOptions::default()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidLayer { layer: 1, .. }));
    }

    #[test]
    fn test_generator_is_repeatable() {
        let generator = LayoutGenerator::new(GeneratorOptions::default());
        let layers = vec![LayerSpec::rectangular(3, 4, 22.0, 10.0).with_grid(GridType::HexFlat)];
        let first = generator.generate(&cylinder(), &layers).unwrap();
        let second = generator.generate(&cylinder(), &layers).unwrap();
        assert_eq!(first.cells, second.cells);
    }
}
