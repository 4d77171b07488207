// ─────────────────────────────────────────────────────────────────────
// AMR Snapshot Analysis — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{Array1, Array3};

use crate::error::{AmrError, AmrResult};

/// One array per patch, aligned with the global patch index (index 0 is the base grid).
pub type Field = Vec<Array3<f64>>;

/// Per-patch boolean cell selection, aligned like [`Field`].
pub type MaskField = Vec<Array3<bool>>;

/// Cubic simulation box centred at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    /// Box side in comoving length units (typically Mpc).
    pub side: f64,
    /// Base-grid cells per axis.
    pub nmax: usize,
}

impl Domain {
    pub fn new(side: f64, nmax: usize) -> Self {
        Domain { side, nmax }
    }

    /// Cell side at refinement `level`: side / nmax / 2^level.
    pub fn cell_size(&self, level: usize) -> f64 {
        self.side / self.nmax as f64 / 2.0_f64.powi(level as i32)
    }

    pub fn cell_volume(&self, level: usize) -> f64 {
        self.cell_size(level).powi(3)
    }

    /// Map a 1-based base-grid coordinate to a comoving coordinate.
    /// Grid coordinate 1 is the left edge of the box (-side/2).
    pub fn grid_to_real(&self, grid: f64) -> f64 {
        let nmax = self.nmax as f64;
        (grid - nmax / 2.0 - 1.0) * self.side / nmax
    }
}

/// Cell-centre coordinates of every patch: `x[ipatch][[i, j, k]]` is the
/// x coordinate of cell (i, j, k) of patch `ipatch`.
#[derive(Debug, Clone, Default)]
pub struct PositionFields {
    pub x: Field,
    pub y: Field,
    pub z: Field,
}

impl PositionFields {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Shape of patch `ipatch` as `[nx, ny, nz]`.
    pub fn patch_shape(&self, ipatch: usize) -> Option<[usize; 3]> {
        self.x.get(ipatch).map(|a| {
            let (nx, ny, nz) = a.dim();
            [nx, ny, nz]
        })
    }

    pub fn total_cells(&self) -> usize {
        self.x.iter().map(|a| a.len()).sum()
    }

    /// `y` and `z` must list as many patches as `x`, each with `x`'s shape.
    pub fn check_consistent(&self) -> AmrResult<()> {
        let n = self.x.len();
        for (what, axis) in [("positions.y", &self.y), ("positions.z", &self.z)] {
            if axis.len() != n {
                return Err(AmrError::LengthMismatch {
                    what,
                    expected: n,
                    found: axis.len(),
                });
            }
            for (ipatch, (a, b)) in self.x.iter().zip(axis.iter()).enumerate() {
                if a.shape() != b.shape() {
                    return Err(AmrError::ShapeMismatch {
                        ipatch,
                        expected: a.shape().to_vec(),
                        found: b.shape().to_vec(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Volume-weighted radial profile.
#[derive(Debug, Clone)]
pub struct RadialProfile {
    pub bin_edges: Array1<f64>,  // [nbins + 1]
    pub bin_centers: Array1<f64>, // [nbins]
    pub profile: Array1<f64>,    // [nbins], NaN for shells without cells
}

impl RadialProfile {
    pub fn nbins(&self) -> usize {
        self.bin_centers.len()
    }
}
