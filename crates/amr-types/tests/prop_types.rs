// ─────────────────────────────────────────────────────────────────────
// AMR Snapshot Analysis — Property-Based Tests (proptest) for amr-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for amr-types using proptest.
//!
//! Covers: Domain cell geometry, configuration serialization roundtrip.

use amr_types::config::{AnalysisConfig, CosmologyParams, DomainConfig, RadiusSearchConfig};
use amr_types::state::Domain;
use proptest::prelude::*;

// ── Domain Geometry ──────────────────────────────────────────────────

proptest! {
    /// nmax base cells tile the box exactly.
    #[test]
    fn base_cells_tile_box(side in 0.1f64..1000.0, nmax in 1usize..1024) {
        let domain = Domain::new(side, nmax);
        let total = domain.cell_size(0) * nmax as f64;
        prop_assert!((total - side).abs() < 1e-9 * side);
    }

    /// Eight level-(l+1) cells fill one level-l cell.
    #[test]
    fn refinement_volume_ratio(side in 0.1f64..1000.0, nmax in 1usize..512, level in 0usize..12) {
        let domain = Domain::new(side, nmax);
        let ratio = domain.cell_volume(level) / domain.cell_volume(level + 1);
        prop_assert!((ratio - 8.0).abs() < 1e-9);
    }

    /// Grid coordinate 1 and nmax + 1 are the two box faces.
    #[test]
    fn grid_to_real_faces(side in 0.1f64..1000.0, nmax in 1usize..1024) {
        let domain = Domain::new(side, nmax);
        prop_assert!((domain.grid_to_real(1.0) + 0.5 * side).abs() < 1e-9 * side);
        prop_assert!((domain.grid_to_real(nmax as f64 + 1.0) - 0.5 * side).abs() < 1e-9 * side);
    }
}

// ── Config Roundtrip ─────────────────────────────────────────────────

proptest! {
    /// Valid configs survive JSON serialization unchanged.
    #[test]
    fn config_json_roundtrip(
        side in 1.0f64..500.0,
        nmax in 8usize..512,
        rmin in 0.01f64..1.0,
        span in 0.1f64..10.0,
        ncores in 1usize..16,
    ) {
        let cfg = AnalysisConfig {
            domain: DomainConfig { side, nmax },
            cosmology: CosmologyParams { h: 0.7, omega_m: 0.3 },
            radius_search: RadiusSearchConfig {
                rmin,
                rmax: rmin + span,
                ..RadiusSearchConfig::default()
            },
            profile: None,
            ncores,
        };
        prop_assert!(cfg.validate().is_ok());

        let json = serde_json::to_string(&cfg).unwrap();
        let back: AnalysisConfig = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.domain.nmax, nmax);
        prop_assert_eq!(back.ncores, ncores);
        prop_assert!((back.domain.side - side).abs() < 1e-12 * side);
        prop_assert!((back.radius_search.rmax - (rmin + span)).abs() < 1e-12);
        prop_assert!(back.profile.is_none());
    }
}
