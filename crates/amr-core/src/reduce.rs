// ─────────────────────────────────────────────────────────────────────
// AMR Snapshot Analysis — Reductions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Volume-weighted sums over the patch hierarchy.
//!
//! Inputs must already be cleaned of refinements and overlaps; nothing here
//! cleans them again.

use amr_math::bins::{bin_centers, bin_edges};
use amr_types::config::ProfileConfig;
use amr_types::error::AmrResult;
use amr_types::state::{Domain, MaskField, PositionFields, RadialProfile};
use ndarray::{Array1, Array3, Zip};

use crate::hierarchy::PatchHierarchy;
use crate::mask::mask_sphere;

/// Cell volume of every patch, `(side / nmax / 2^level)³`.
pub fn cell_volumes(hierarchy: &PatchHierarchy, domain: &Domain) -> Vec<f64> {
    hierarchy
        .levels()
        .iter()
        .map(|&level| domain.cell_volume(level))
        .collect()
}

fn check_positions(hierarchy: &PatchHierarchy, positions: &PositionFields) -> AmrResult<()> {
    hierarchy.check_field("positions.x", &positions.x)?;
    hierarchy.check_field("positions.y", &positions.y)?;
    hierarchy.check_field("positions.z", &positions.z)
}

/// `Σ field · volume` over the selected cells.
fn masked_volume_sum(field: &[Array3<f64>], mask: &MaskField, volumes: &[f64]) -> f64 {
    field
        .iter()
        .zip(mask.iter())
        .zip(volumes.iter())
        .map(|((values, selected), &volume)| {
            let sum = Zip::from(values)
                .and(selected)
                .fold(0.0, |acc, &v, &m| if m { acc + v } else { acc });
            sum * volume
        })
        .sum()
}

/// Mass enclosed by the sphere of radius `r` around `center`.
pub fn mass_inside(
    r: f64,
    center: [f64; 3],
    density: &[Array3<f64>],
    positions: &PositionFields,
    hierarchy: &PatchHierarchy,
    domain: &Domain,
) -> AmrResult<f64> {
    hierarchy.check_field("density", density)?;
    check_positions(hierarchy, positions)?;

    let volumes = cell_volumes(hierarchy, domain);
    let mask = mask_sphere(r, center, positions)?;
    Ok(masked_volume_sum(density, &mask, &volumes))
}

/// Volume-weighted mean of `field` in concentric shells around `center`.
///
/// Each shell is the symmetric difference between the spheres at two
/// consecutive boundaries. The innermost inner sphere is empty when
/// `rmin == 0`. Shells that contain no cell get NaN.
pub fn radial_profile_vw(
    field: &[Array3<f64>],
    center: [f64; 3],
    binning: &ProfileConfig,
    positions: &PositionFields,
    hierarchy: &PatchHierarchy,
    domain: &Domain,
) -> AmrResult<RadialProfile> {
    let edges = bin_edges(binning.rmin, binning.rmax, binning.nbins, binning.logbins)?;
    hierarchy.check_field("field", field)?;
    check_positions(hierarchy, positions)?;

    let centers = bin_centers(&edges);
    let volumes = cell_volumes(hierarchy, domain);

    let mut inner: MaskField = if binning.rmin > 0.0 {
        mask_sphere(binning.rmin, center, positions)?
    } else {
        field
            .iter()
            .map(|values| Array3::from_elem(values.raw_dim(), false))
            .collect()
    };

    let mut profile = Array1::zeros(binning.nbins);
    for (ibin, &r_out) in edges.iter().skip(1).enumerate() {
        log::debug!("radial profile: outer radius {r_out:.4}");
        let outer = mask_sphere(r_out, center, positions)?;

        let mut weighted = 0.0;
        let mut weight = 0.0;
        for ipatch in 0..field.len() {
            let volume = volumes[ipatch];
            let (sum_f, count) = Zip::from(&field[ipatch])
                .and(&inner[ipatch])
                .and(&outer[ipatch])
                .fold((0.0, 0usize), |(s, c), &v, &a, &b| {
                    if a ^ b {
                        (s + v, c + 1)
                    } else {
                        (s, c)
                    }
                });
            weighted += sum_f * volume;
            weight += count as f64 * volume;
        }

        profile[ibin] = if weight > 0.0 {
            weighted / weight
        } else {
            f64::NAN
        };
        inner = outer;
    }

    Ok(RadialProfile {
        bin_edges: edges,
        bin_centers: centers,
        profile,
    })
}
