// ─────────────────────────────────────────────────────────────────────
// AMR Snapshot Analysis — Field Cleaning
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Removal of double-counted cells from a patch field.
//!
//! `cr0amr` is true where a cell is not refined by a finer patch, `solapst`
//! is true where a cell is kept after resolving overlaps between siblings.
//! Discarded cells are set to exactly 0.0.

use amr_types::error::AmrResult;
use amr_types::state::Field;
use ndarray::{Array3, Zip};

use crate::hierarchy::PatchHierarchy;

fn keep_where(values: &Array3<f64>, keep: &Array3<bool>) -> Array3<f64> {
    Zip::from(values)
        .and(keep)
        .map_collect(|&v, &k| if k { v } else { 0.0 })
}

fn keep_where_both(values: &Array3<f64>, a: &Array3<bool>, b: &Array3<bool>) -> Array3<f64> {
    Zip::from(values)
        .and(a)
        .and(b)
        .map_collect(|&v, &ka, &kb| if ka && kb { v } else { 0.0 })
}

/// Clean `field` of refined and overlapping cells, up to `up_to_level`
/// (`None` = all levels).
///
/// - base grid: `field · cr0amr`;
/// - levels 1 ..< L: `field · cr0amr · solapst`;
/// - level L: `field · solapst`, keeping data under finer patches that are not processed;
/// - levels > L: all zero, so the output stays aligned with the hierarchy.
///
/// with `L = min(up_to_level, max_level)`.
pub fn clean_field(
    field: &[Array3<f64>],
    cr0amr: &[Array3<bool>],
    solapst: &[Array3<bool>],
    hierarchy: &PatchHierarchy,
    up_to_level: Option<usize>,
) -> AmrResult<Field> {
    hierarchy.check_field("field", field)?;
    hierarchy.check_field("cr0amr", cr0amr)?;
    hierarchy.check_field("solapst", solapst)?;

    let last = up_to_level
        .unwrap_or(usize::MAX)
        .min(hierarchy.max_level());
    let levels = hierarchy.levels();

    let cleaned = field
        .iter()
        .enumerate()
        .map(|(ipatch, values)| {
            let level = levels[ipatch];
            if ipatch == 0 {
                keep_where(values, &cr0amr[0])
            } else if level < last {
                keep_where_both(values, &cr0amr[ipatch], &solapst[ipatch])
            } else if level == last {
                keep_where(values, &solapst[ipatch])
            } else {
                Array3::zeros(values.raw_dim())
            }
        })
        .collect();
    Ok(cleaned)
}
