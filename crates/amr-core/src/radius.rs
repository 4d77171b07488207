// ─────────────────────────────────────────────────────────────────────
// AMR Snapshot Analysis — Overdensity Radius
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! r_Delta: the radius enclosing a mean density of Delta times the background.
//!
//! Root of `g(r) = M(<r) - (4π/3) r³ ρ_B Delta` on `[rmin, rmax]` by Brent's
//! method. A bracket without a sign change is an expected outcome for some
//! objects and yields NaN; every other failure is an error.

use std::f64::consts::PI;

use amr_math::roots::{brent, BrentConfig};
use amr_types::config::{CosmologyParams, RadiusSearchConfig};
use amr_types::error::{AmrError, AmrResult};
use amr_types::state::{Domain, PositionFields};
use ndarray::Array3;

use crate::hierarchy::PatchHierarchy;
use crate::reduce::mass_inside;

/// `g(r)` for a given background density.
#[allow(clippy::too_many_arguments)]
pub fn r_delta_residual(
    r: f64,
    delta: f64,
    background_density: f64,
    center: [f64; 3],
    density: &[Array3<f64>],
    positions: &PositionFields,
    hierarchy: &PatchHierarchy,
    domain: &Domain,
) -> AmrResult<f64> {
    log::debug!("r_Delta: evaluating at r={r:.3}");
    let mass = mass_inside(r, center, density, positions, hierarchy, domain)?;
    Ok(mass - 4.0 * PI / 3.0 * r.powi(3) * background_density * delta)
}

/// Find r_Delta around `center` at `redshift`.
///
/// `rho_background(h, omega_m, z)` supplies the background density in the
/// units of `density`. Returns `Ok(NaN)` when `g(rmin)` and `g(rmax)` share sign.
#[allow(clippy::too_many_arguments)]
pub fn find_r_delta<F>(
    delta: f64,
    redshift: f64,
    center: [f64; 3],
    density: &[Array3<f64>],
    positions: &PositionFields,
    hierarchy: &PatchHierarchy,
    domain: &Domain,
    cosmology: &CosmologyParams,
    search: &RadiusSearchConfig,
    rho_background: F,
) -> AmrResult<f64>
where
    F: Fn(f64, f64, f64) -> f64,
{
    hierarchy.check_field("density", density)?;
    let background = rho_background(cosmology.h, cosmology.omega_m, redshift);

    // mass_inside errors cannot be returned through the closure; shapes were
    // validated above, so the first error seen is kept and re-raised.
    let mut failure: Option<AmrError> = None;
    let g = |r: f64| match r_delta_residual(
        r, delta, background, center, density, positions, hierarchy, domain,
    ) {
        Ok(v) => v,
        Err(e) => {
            failure.get_or_insert(e);
            f64::NAN
        }
    };

    let cfg = BrentConfig {
        xtol: search.rtol,
        max_iters: search.max_iterations,
        ..BrentConfig::default()
    };
    let result = brent(g, search.rmin, search.rmax, cfg);
    if let Some(e) = failure {
        return Err(e);
    }

    match result {
        Ok(root) => {
            log::debug!(
                "r_Delta converged: r={:.4} after {} iterations",
                root.root,
                root.iterations
            );
            Ok(root.root)
        }
        Err(AmrError::NoBracket { a, b, fa, fb }) => {
            log::warn!(
                "r_Delta not bracketed in [{a}, {b}] (g={fa:.3e}, {fb:.3e}) around {center:?}; returning NaN"
            );
            Ok(f64::NAN)
        }
        Err(e) => Err(e),
    }
}
