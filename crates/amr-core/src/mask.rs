// ─────────────────────────────────────────────────────────────────────
// AMR Snapshot Analysis — Sphere Mask
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use amr_types::error::AmrResult;
use amr_types::state::{MaskField, PositionFields};
use ndarray::{Array3, Zip};

/// Cells of one patch whose centre lies strictly inside the sphere.
pub fn mask_sphere_patch(
    r: f64,
    center: [f64; 3],
    x: &Array3<f64>,
    y: &Array3<f64>,
    z: &Array3<f64>,
) -> Array3<bool> {
    let r2 = r * r;
    let [cx, cy, cz] = center;
    Zip::from(x)
        .and(y)
        .and(z)
        .map_collect(|&px, &py, &pz| {
            let dx = px - cx;
            let dy = py - cy;
            let dz = pz - cz;
            dx * dx + dy * dy + dz * dz < r2
        })
}

/// Per-patch selection of cells with `|x - center|² < r²`.
pub fn mask_sphere(
    r: f64,
    center: [f64; 3],
    positions: &PositionFields,
) -> AmrResult<MaskField> {
    positions.check_consistent()?;
    Ok(positions
        .x
        .iter()
        .zip(positions.y.iter())
        .zip(positions.z.iter())
        .map(|((x, y), z)| mask_sphere_patch(r, center, x, y, z))
        .collect())
}
