// ─────────────────────────────────────────────────────────────────────
// AMR Snapshot Analysis — Radial Bins
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Radial shell boundaries for profiles.

use amr_types::error::{AmrError, AmrResult};
use ndarray::Array1;

/// Build `nbins + 1` shell boundaries between `rmin` and `rmax`.
///
/// Linear edges are `linspace(rmin, rmax, nbins + 1)`; logarithmic edges are
/// `10^linspace(log10 rmin, log10 rmax, nbins + 1)` and need `rmin > 0`.
/// The outermost edge is pinned to `rmax` so it never drifts through `powf`.
pub fn bin_edges(rmin: f64, rmax: f64, nbins: usize, logbins: bool) -> AmrResult<Array1<f64>> {
    if !rmin.is_finite() || !rmax.is_finite() {
        return Err(AmrError::InvalidBinning(format!(
            "radii must be finite, got rmin={rmin}, rmax={rmax}"
        )));
    }
    if rmax <= rmin {
        return Err(AmrError::InvalidBinning(format!(
            "rmax must exceed rmin, got rmin={rmin}, rmax={rmax}"
        )));
    }
    if nbins == 0 {
        return Err(AmrError::InvalidBinning("nbins must be >= 1".to_string()));
    }

    if logbins {
        if rmin <= 0.0 {
            return Err(AmrError::InvalidBinning(format!(
                "logarithmic binning needs rmin > 0, got {rmin}"
            )));
        }
        let mut edges = Array1::linspace(rmin.log10(), rmax.log10(), nbins + 1)
            .mapv(|e| 10.0_f64.powf(e));
        edges[0] = rmin;
        edges[nbins] = rmax;
        Ok(edges)
    } else {
        Ok(Array1::linspace(rmin, rmax, nbins + 1))
    }
}

/// Arithmetic midpoints of adjacent boundaries.
pub fn bin_centers(edges: &Array1<f64>) -> Array1<f64> {
    let n = edges.len().saturating_sub(1);
    Array1::from_shape_fn(n, |i| 0.5 * (edges[i] + edges[i + 1]))
}
