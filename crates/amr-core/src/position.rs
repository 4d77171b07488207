// ─────────────────────────────────────────────────────────────────────
// AMR Snapshot Analysis — Positions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cell-centre position fields and patch bounding boxes.

use amr_types::error::{AmrError, AmrResult};
use amr_types::state::{Domain, PositionFields};
use ndarray::Array3;
use rayon::prelude::*;

use crate::hierarchy::PatchHierarchy;

/// Corners of an axis-aligned box, ordered x-major: (0,0,0), (0,0,1), (0,1,0), ..., (1,1,1).
fn box_vertices(corner: [f64; 3], extent: [f64; 3]) -> [[f64; 3]; 8] {
    let mut vertices = [[0.0; 3]; 8];
    let mut n = 0;
    for i in 0..2 {
        for j in 0..2 {
            for k in 0..2 {
                vertices[n] = [
                    corner[0] + i as f64 * extent[0],
                    corner[1] + j as f64 * extent[1],
                    corner[2] + k as f64 * extent[2],
                ];
                n += 1;
            }
        }
    }
    vertices
}

/// The 8 vertices of a patch from its level, shape and first-cell centre.
pub fn patch_vertices(
    level: usize,
    shape: [usize; 3],
    first_cell_center: [f64; 3],
    domain: &Domain,
) -> [[f64; 3]; 8] {
    let cellsize = domain.cell_size(level);
    let corner = first_cell_center.map(|c| c - 0.5 * cellsize);
    let extent = shape.map(|n| n as f64 * cellsize);
    box_vertices(corner, extent)
}

/// The 8 vertices of patch `ipatch` read back from position fields.
///
/// Cell size comes from the spacing of adjacent cells along the first axis
/// with more than one cell.
pub fn patch_vertices_from_fields(
    ipatch: usize,
    positions: &PositionFields,
) -> AmrResult<[[f64; 3]; 8]> {
    positions.check_consistent()?;
    if ipatch >= positions.len() {
        return Err(AmrError::InvalidIndex {
            ipatch,
            npatches: positions.len(),
        });
    }
    let x = &positions.x[ipatch];
    let y = &positions.y[ipatch];
    let z = &positions.z[ipatch];
    let (nx, ny, nz) = x.dim();

    let cellsize = if nx > 1 {
        x[[1, 0, 0]] - x[[0, 0, 0]]
    } else if ny > 1 {
        y[[0, 1, 0]] - y[[0, 0, 0]]
    } else if nz > 1 {
        z[[0, 0, 1]] - z[[0, 0, 0]]
    } else {
        return Err(AmrError::DegeneratePatch { ipatch });
    };

    let corner = [
        x[[0, 0, 0]] - 0.5 * cellsize,
        y[[0, 0, 0]] - 0.5 * cellsize,
        z[[0, 0, 0]] - 0.5 * cellsize,
    ];
    let extent = [
        nx as f64 * cellsize,
        ny as f64 * cellsize,
        nz as f64 * cellsize,
    ];
    Ok(box_vertices(corner, extent))
}

/// Cell-centre coordinates of one patch.
///
/// `origin` is the centre of the parent-level cell at the patch's lower
/// corner, so cell (i, j, k) sits at `origin - cellsize/2 + (i, j, k) * cellsize`.
pub fn compute_position_field_one_patch(
    shape: [usize; 3],
    origin: [f64; 3],
    level: usize,
    domain: &Domain,
) -> (Array3<f64>, Array3<f64>, Array3<f64>) {
    let cellsize = domain.cell_size(level);
    let first = origin.map(|o| o - 0.5 * cellsize);
    let dim = (shape[0], shape[1], shape[2]);
    let x = Array3::from_shape_fn(dim, |(i, _, _)| first[0] + i as f64 * cellsize);
    let y = Array3::from_shape_fn(dim, |(_, j, _)| first[1] + j as f64 * cellsize);
    let z = Array3::from_shape_fn(dim, |(_, _, k)| first[2] + k as f64 * cellsize);
    (x, y, z)
}

/// Position fields for every patch.
///
/// `patchrx/ry/rz` hold each patch's origin as described in
/// [`compute_position_field_one_patch`]. With `ncores > 1` patches are built on
/// a dedicated pool of that many threads; output order always follows the
/// patch index.
pub fn compute_position_fields(
    hierarchy: &PatchHierarchy,
    patchrx: &[f64],
    patchry: &[f64],
    patchrz: &[f64],
    domain: &Domain,
    ncores: usize,
) -> AmrResult<PositionFields> {
    let n = hierarchy.len();
    for (what, found) in [
        ("patchrx", patchrx.len()),
        ("patchry", patchry.len()),
        ("patchrz", patchrz.len()),
    ] {
        if found != n {
            return Err(AmrError::LengthMismatch {
                what,
                expected: n,
                found,
            });
        }
    }

    let levels = hierarchy.levels();
    let g = hierarchy.geometry();
    let build = |ipatch: usize| {
        compute_position_field_one_patch(
            [g.patchnx[ipatch], g.patchny[ipatch], g.patchnz[ipatch]],
            [patchrx[ipatch], patchry[ipatch], patchrz[ipatch]],
            levels[ipatch],
            domain,
        )
    };

    let patches: Vec<(Array3<f64>, Array3<f64>, Array3<f64>)> = if ncores <= 1 {
        (0..n).map(build).collect()
    } else {
        log::debug!("building position fields for {n} patches on {ncores} threads");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(ncores)
            .build()
            .map_err(|e| AmrError::ThreadPool(e.to_string()))?;
        pool.install(|| (0..n).into_par_iter().map(build).collect())
    };

    let mut fields = PositionFields {
        x: Vec::with_capacity(n),
        y: Vec::with_capacity(n),
        z: Vec::with_capacity(n),
    };
    for (x, y, z) in patches {
        fields.x.push(x);
        fields.y.push(y);
        fields.z.push(z);
    }
    Ok(fields)
}

/// Position fields with origins derived from the hierarchy's integer offsets.
pub fn hierarchy_position_fields(
    hierarchy: &PatchHierarchy,
    domain: &Domain,
    ncores: usize,
) -> AmrResult<PositionFields> {
    let (rx, ry, rz) = hierarchy.parent_cell_centers(domain);
    compute_position_fields(hierarchy, &rx, &ry, &rz, domain, ncores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::PatchGeometry;

    fn small_hierarchy() -> PatchHierarchy {
        let mut g = PatchGeometry::base(8);
        g.push([4, 2, 6], [3, 4, 2], 0);
        g.push([2, 2, 2], [2, 1, 3], 1);
        PatchHierarchy::new(&[1, 1, 1], g).unwrap()
    }

    #[test]
    fn test_base_grid_cell_centres() {
        let domain = Domain::new(8.0, 8);
        let h = PatchHierarchy::base_only(8).unwrap();
        let fields = hierarchy_position_fields(&h, &domain, 1).unwrap();
        let x = &fields.x[0];
        assert_eq!(x.dim(), (8, 8, 8));
        assert!((x[[0, 3, 5]] + 3.5).abs() < 1e-12);
        assert!((x[[7, 0, 0]] - 3.5).abs() < 1e-12);
        assert!((fields.y[0][[2, 6, 1]] - 2.5).abs() < 1e-12);
        assert!((fields.z[0][[0, 0, 4]] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_refined_patch_first_cell() {
        let domain = Domain::new(8.0, 8);
        let h = small_hierarchy();
        let fields = hierarchy_position_fields(&h, &domain, 1).unwrap();
        // Level-1 corner: (3-5, 4-5, 2-5) = (-2, -1, -3), cell 0.5.
        assert!((fields.x[1][[0, 0, 0]] + 1.75).abs() < 1e-12);
        assert!((fields.y[1][[0, 1, 0]] + 0.25).abs() < 1e-12);
        assert!((fields.z[1][[0, 0, 5]] + 0.25).abs() < 1e-12);
        // Level-2 corner: x = (2-1)/2 + 3 → -1.5, cell 0.25.
        assert!((fields.x[2][[1, 0, 0]] + 1.125).abs() < 1e-12);
    }

    #[test]
    fn test_vertex_forms_agree() {
        let domain = Domain::new(8.0, 8);
        let h = small_hierarchy();
        let fields = hierarchy_position_fields(&h, &domain, 1).unwrap();
        for ipatch in 0..h.len() {
            let level = h.level(ipatch).unwrap();
            let first = [
                fields.x[ipatch][[0, 0, 0]],
                fields.y[ipatch][[0, 0, 0]],
                fields.z[ipatch][[0, 0, 0]],
            ];
            let geometric = patch_vertices(level, h.shape(ipatch).unwrap(), first, &domain);
            let derived = patch_vertices_from_fields(ipatch, &fields).unwrap();
            for (a, b) in geometric.iter().zip(derived.iter()) {
                for axis in 0..3 {
                    assert!((a[axis] - b[axis]).abs() < 1e-12, "patch {ipatch}: {a:?} vs {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_vertices_match_real_corner() {
        let domain = Domain::new(8.0, 8);
        let h = small_hierarchy();
        let fields = hierarchy_position_fields(&h, &domain, 1).unwrap();
        let vertices = patch_vertices_from_fields(1, &fields).unwrap();
        let corner = h.absolute_real_position(1, &domain).unwrap();
        for axis in 0..3 {
            assert!((vertices[0][axis] - corner[axis]).abs() < 1e-12);
        }
        // Opposite corner: extent (4, 2, 6) × 0.5.
        assert!((vertices[7][0] - (corner[0] + 2.0)).abs() < 1e-12);
        assert!((vertices[7][1] - (corner[1] + 1.0)).abs() < 1e-12);
        assert!((vertices[7][2] - (corner[2] + 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_vertex_order() {
        let domain = Domain::new(4.0, 4);
        let v = patch_vertices(0, [4, 4, 4], [-1.5, -1.5, -1.5], &domain);
        assert_eq!(v[0], [-2.0, -2.0, -2.0]);
        assert_eq!(v[1], [-2.0, -2.0, 2.0]);
        assert_eq!(v[2], [-2.0, 2.0, -2.0]);
        assert_eq!(v[4], [2.0, -2.0, -2.0]);
        assert_eq!(v[7], [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_single_cell_patch_is_degenerate() {
        let fields = PositionFields {
            x: vec![Array3::zeros((1, 1, 1))],
            y: vec![Array3::zeros((1, 1, 1))],
            z: vec![Array3::zeros((1, 1, 1))],
        };
        assert!(matches!(
            patch_vertices_from_fields(0, &fields),
            Err(AmrError::DegeneratePatch { ipatch: 0 })
        ));
        assert!(matches!(
            patch_vertices_from_fields(1, &fields),
            Err(AmrError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn test_short_y_field_is_length_mismatch() {
        let domain = Domain::new(8.0, 8);
        let h = small_hierarchy();
        let mut fields = hierarchy_position_fields(&h, &domain, 1).unwrap();
        fields.y.truncate(1);
        assert!(matches!(
            patch_vertices_from_fields(1, &fields),
            Err(AmrError::LengthMismatch {
                what: "positions.y",
                ..
            })
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let domain = Domain::new(8.0, 8);
        let h = small_hierarchy();
        let seq = hierarchy_position_fields(&h, &domain, 1).unwrap();
        let par = hierarchy_position_fields(&h, &domain, 3).unwrap();
        assert_eq!(seq.len(), par.len());
        for ipatch in 0..seq.len() {
            assert_eq!(seq.x[ipatch], par.x[ipatch]);
            assert_eq!(seq.y[ipatch], par.y[ipatch]);
            assert_eq!(seq.z[ipatch], par.z[ipatch]);
        }
    }

    #[test]
    fn test_rejects_short_origin_arrays() {
        let domain = Domain::new(8.0, 8);
        let h = small_hierarchy();
        let err = compute_position_fields(&h, &[0.0; 3], &[0.0; 2], &[0.0; 3], &domain, 1)
            .unwrap_err();
        assert!(matches!(err, AmrError::LengthMismatch { what: "patchry", .. }));
    }
}
