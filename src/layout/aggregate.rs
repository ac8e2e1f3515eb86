use itertools::{Itertools, MinMaxResult};
use tracing::warn;

use crate::domain::{BoundingBox3d, ConstraintWarning, GeneratorOptions, PlacedCell};

/// Envelope of every cell footprint, with z extended by half the cell height
pub fn pack_bbox(cells: &[PlacedCell]) -> BoundingBox3d {
    let (xmin, xmax) = span(cells.iter().flat_map(|c| [c.bbox_2d.xmin, c.bbox_2d.xmax]));
    let (ymin, ymax) = span(cells.iter().flat_map(|c| [c.bbox_2d.ymin, c.bbox_2d.ymax]));
    let (zmin, zmax) = span(cells.iter().flat_map(|c| {
        let half = c.dims.height() / 2.0;
        [c.z() - half, c.z() + half]
    }));
    BoundingBox3d {
        xmin,
        xmax,
        ymin,
        ymax,
        zmin,
        zmax,
    }
}

fn span(values: impl Iterator<Item = f64>) -> (f64, f64) {
    match values.minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => (0.0, 0.0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    }
}

/// Compare aggregates against the optional advisory limits
pub fn check_limits(
    weight_kg: f64,
    volume_m3: f64,
    options: &GeneratorOptions,
) -> Vec<ConstraintWarning> {
    let mut warnings = Vec::new();

    if let Some(limit_kg) = options.max_weight_kg {
        if weight_kg > limit_kg {
            warnings.push(ConstraintWarning::WeightExceeded {
                weight_kg,
                limit_kg,
            });
        }
    }
    if let Some(limit_m3) = options.max_volume_m3 {
        if volume_m3 > limit_m3 {
            warnings.push(ConstraintWarning::VolumeExceeded {
                volume_m3,
                limit_m3,
            });
        }
    }

    for warning in &warnings {
        warn!(%warning, "pack constraint exceeded");
    }
    warnings
}
