// ─────────────────────────────────────────────────────────────────────
// AMR Snapshot Analysis — Patch Hierarchy
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Validated patch tree of one snapshot.
//!
//! Index convention:
//! - global index 0 is the base grid, a real entry of every per-patch array;
//! - `pare[ipatch]` is a global index into the same arrays, 0 meaning the base grid;
//! - `patchx/y/z` are 1-based offsets in units of the parent's cells;
//! - the base grid sits at absolute grid position (1, 1, 1).
//!
//! A level-l patch must hang from a level-(l-1) patch. Level blocks are stored
//! in order, so every parent index is smaller than its child's.

use std::sync::OnceLock;

use amr_types::error::{AmrError, AmrResult};
use amr_types::state::Domain;
use ndarray::Array3;

use crate::levels::{level_range, levels_of, max_level, total_patches};

/// Raw per-patch geometry as stored in a simulation dump, aligned by global index.
#[derive(Debug, Clone, Default)]
pub struct PatchGeometry {
    pub patchnx: Vec<usize>,
    pub patchny: Vec<usize>,
    pub patchnz: Vec<usize>,
    pub patchx: Vec<i64>,
    pub patchy: Vec<i64>,
    pub patchz: Vec<i64>,
    pub pare: Vec<usize>,
}

impl PatchGeometry {
    /// Geometry holding only the base grid of `nmax³` cells.
    pub fn base(nmax: usize) -> Self {
        PatchGeometry {
            patchnx: vec![nmax],
            patchny: vec![nmax],
            patchnz: vec![nmax],
            patchx: vec![0],
            patchy: vec![0],
            patchz: vec![0],
            pare: vec![0],
        }
    }

    /// Append a refinement patch; patches must be pushed level by level.
    pub fn push(&mut self, shape: [usize; 3], offset: [i64; 3], parent: usize) {
        self.patchnx.push(shape[0]);
        self.patchny.push(shape[1]);
        self.patchnz.push(shape[2]);
        self.patchx.push(offset[0]);
        self.patchy.push(offset[1]);
        self.patchz.push(offset[2]);
        self.pare.push(parent);
    }
}

#[derive(Debug, Clone)]
pub struct PatchHierarchy {
    npatch: Vec<usize>,
    levels: Vec<usize>,
    geometry: PatchGeometry,
    grid_positions: OnceLock<Vec<[f64; 3]>>,
}

impl PatchHierarchy {
    pub fn new(npatch: &[usize], geometry: PatchGeometry) -> AmrResult<Self> {
        let mut npatch = npatch.to_vec();
        if npatch.is_empty() {
            npatch.push(1);
        }
        npatch[0] = 1;

        let n = total_patches(&npatch);
        let lengths = [
            ("patchnx", geometry.patchnx.len()),
            ("patchny", geometry.patchny.len()),
            ("patchnz", geometry.patchnz.len()),
            ("patchx", geometry.patchx.len()),
            ("patchy", geometry.patchy.len()),
            ("patchz", geometry.patchz.len()),
            ("pare", geometry.pare.len()),
        ];
        for (what, found) in lengths {
            if found != n {
                return Err(AmrError::LengthMismatch {
                    what,
                    expected: n,
                    found,
                });
            }
        }

        let levels = levels_of(&npatch);
        for ipatch in 0..n {
            if geometry.patchnx[ipatch] == 0
                || geometry.patchny[ipatch] == 0
                || geometry.patchnz[ipatch] == 0
            {
                return Err(AmrError::InvalidHierarchy(format!(
                    "patch {ipatch} has an empty extent"
                )));
            }
            if ipatch == 0 {
                continue;
            }
            let parent = geometry.pare[ipatch];
            if parent >= n {
                return Err(AmrError::InvalidHierarchy(format!(
                    "patch {ipatch} points to parent {parent}, hierarchy has {n} patches"
                )));
            }
            if levels[parent] + 1 != levels[ipatch] {
                return Err(AmrError::InvalidHierarchy(format!(
                    "patch {ipatch} at level {} has parent {parent} at level {}",
                    levels[ipatch], levels[parent]
                )));
            }
        }

        Ok(PatchHierarchy {
            npatch,
            levels,
            geometry,
            grid_positions: OnceLock::new(),
        })
    }

    /// Hierarchy with no refinement patches.
    pub fn base_only(nmax: usize) -> AmrResult<Self> {
        Self::new(&[1], PatchGeometry::base(nmax))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn npatch(&self) -> &[usize] {
        &self.npatch
    }

    pub fn levels(&self) -> &[usize] {
        &self.levels
    }

    pub fn geometry(&self) -> &PatchGeometry {
        &self.geometry
    }

    pub fn max_level(&self) -> usize {
        max_level(&self.npatch)
    }

    pub fn level_range(&self, level: usize) -> std::ops::Range<usize> {
        level_range(&self.npatch, level)
    }

    fn check_index(&self, ipatch: usize) -> AmrResult<()> {
        if ipatch >= self.len() {
            return Err(AmrError::InvalidIndex {
                ipatch,
                npatches: self.len(),
            });
        }
        Ok(())
    }

    pub fn level(&self, ipatch: usize) -> AmrResult<usize> {
        self.check_index(ipatch)?;
        Ok(self.levels[ipatch])
    }

    /// Cells per axis `[nx, ny, nz]` at the patch's own resolution.
    pub fn shape(&self, ipatch: usize) -> AmrResult<[usize; 3]> {
        self.check_index(ipatch)?;
        let g = &self.geometry;
        Ok([g.patchnx[ipatch], g.patchny[ipatch], g.patchnz[ipatch]])
    }

    /// Parent index, `None` for the base grid.
    pub fn parent(&self, ipatch: usize) -> AmrResult<Option<usize>> {
        self.check_index(ipatch)?;
        Ok((ipatch > 0).then(|| self.geometry.pare[ipatch]))
    }

    /// Absolute grid coordinates of the patch's lower corner, in 1-based base-cell units.
    ///
    /// Level 1: `(patchx, patchy, patchz)`.
    /// Level l ≥ 2: `(patchx - 1) / 2^(l-1) + X(parent)` per axis.
    ///
    /// The whole table is built once, on first query, and reused afterwards.
    pub fn absolute_grid_position(&self, ipatch: usize) -> AmrResult<[f64; 3]> {
        self.check_index(ipatch)?;
        Ok(self.grid_position_table()[ipatch])
    }

    /// Same as [`absolute_grid_position`](Self::absolute_grid_position), walking the
    /// parent chain explicitly instead of reading the table.
    pub fn walk_grid_position(&self, ipatch: usize) -> AmrResult<[f64; 3]> {
        self.check_index(ipatch)?;
        let g = &self.geometry;
        if self.levels[ipatch] == 0 {
            return Ok([1.0; 3]);
        }

        let mut pos = [0.0; 3];
        let mut current = ipatch;
        loop {
            let level = self.levels[current];
            let offset = [g.patchx[current], g.patchy[current], g.patchz[current]];
            if level == 1 {
                for axis in 0..3 {
                    pos[axis] += offset[axis] as f64;
                }
                return Ok(pos);
            }
            let scale = 2.0_f64.powi(level as i32 - 1);
            for axis in 0..3 {
                pos[axis] += (offset[axis] - 1) as f64 / scale;
            }
            current = g.pare[current];
        }
    }

    fn grid_position_table(&self) -> &[[f64; 3]] {
        self.grid_positions.get_or_init(|| {
            let g = &self.geometry;
            let mut table: Vec<[f64; 3]> = Vec::with_capacity(self.len());
            table.push([1.0; 3]);
            for ipatch in 1..self.len() {
                let level = self.levels[ipatch];
                let offset = [g.patchx[ipatch], g.patchy[ipatch], g.patchz[ipatch]];
                let pos = if level == 1 {
                    offset.map(|o| o as f64)
                } else {
                    let scale = 2.0_f64.powi(level as i32 - 1);
                    let parent = table[g.pare[ipatch]];
                    [
                        (offset[0] - 1) as f64 / scale + parent[0],
                        (offset[1] - 1) as f64 / scale + parent[1],
                        (offset[2] - 1) as f64 / scale + parent[2],
                    ]
                };
                table.push(pos);
            }
            table
        })
    }

    /// Comoving coordinates of the patch's lower corner, box centred at the origin.
    pub fn absolute_real_position(&self, ipatch: usize, domain: &Domain) -> AmrResult<[f64; 3]> {
        let grid = self.absolute_grid_position(ipatch)?;
        Ok(grid.map(|g| domain.grid_to_real(g)))
    }

    /// Centre of the parent-level cell at each patch's lower corner
    /// (`corner + cellsize(level)`), the origin convention used by
    /// [`compute_position_fields`](crate::position::compute_position_fields).
    pub fn parent_cell_centers(&self, domain: &Domain) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let n = self.len();
        let mut rx = Vec::with_capacity(n);
        let mut ry = Vec::with_capacity(n);
        let mut rz = Vec::with_capacity(n);
        for (ipatch, grid) in self.grid_position_table().iter().enumerate() {
            let half_parent = domain.cell_size(self.levels[ipatch]);
            rx.push(domain.grid_to_real(grid[0]) + half_parent);
            ry.push(domain.grid_to_real(grid[1]) + half_parent);
            rz.push(domain.grid_to_real(grid[2]) + half_parent);
        }
        (rx, ry, rz)
    }

    /// Check that `arrays` holds one array per patch with the patch's shape.
    pub fn check_field<T>(&self, what: &'static str, arrays: &[Array3<T>]) -> AmrResult<()> {
        if arrays.len() != self.len() {
            return Err(AmrError::LengthMismatch {
                what,
                expected: self.len(),
                found: arrays.len(),
            });
        }
        let g = &self.geometry;
        for (ipatch, array) in arrays.iter().enumerate() {
            let expected = [g.patchnx[ipatch], g.patchny[ipatch], g.patchnz[ipatch]];
            if array.shape() != expected {
                return Err(AmrError::ShapeMismatch {
                    ipatch,
                    expected: expected.to_vec(),
                    found: array.shape().to_vec(),
                });
            }
        }
        Ok(())
    }
}
