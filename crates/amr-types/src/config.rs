// ─────────────────────────────────────────────────────────────────────
// AMR Snapshot Analysis — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::error::{AmrError, AmrResult};
use crate::state::Domain;

/// Top-level analysis configuration for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub domain: DomainConfig,
    pub cosmology: CosmologyParams,
    #[serde(default)]
    pub radius_search: RadiusSearchConfig,
    /// Optional default binning for radial profiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileConfig>,
    /// Worker threads for per-patch position fields (1 = sequential).
    #[serde(default = "default_ncores")]
    pub ncores: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Comoving box side.
    pub side: f64,
    /// Base-grid cells per axis (NMAX = NMAY = NMAZ).
    pub nmax: usize,
}

/// Parameters handed to the background-density callback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CosmologyParams {
    /// Dimensionless Hubble constant.
    pub h: f64,
    /// Matter density parameter.
    pub omega_m: f64,
}

/// Bracket and tolerance for r_Delta searches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RadiusSearchConfig {
    #[serde(default = "default_rmin")]
    pub rmin: f64,
    #[serde(default = "default_rmax")]
    pub rmax: f64,
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub rmin: f64,
    pub rmax: f64,
    pub nbins: usize,
    #[serde(default)]
    pub logbins: bool,
}

fn default_ncores() -> usize {
    1
}
fn default_rmin() -> f64 {
    0.1
}
fn default_rmax() -> f64 {
    6.0
}
fn default_rtol() -> f64 {
    1e-3
}
fn default_max_iterations() -> usize {
    100
}

impl Default for RadiusSearchConfig {
    fn default() -> Self {
        RadiusSearchConfig {
            rmin: default_rmin(),
            rmax: default_rmax(),
            rtol: default_rtol(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> AmrResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AmrResult<()> {
        if !self.domain.side.is_finite() || self.domain.side <= 0.0 {
            return Err(AmrError::ConfigError(format!(
                "domain.side must be finite > 0, got {}",
                self.domain.side
            )));
        }
        if self.domain.nmax == 0 {
            return Err(AmrError::ConfigError(
                "domain.nmax must be >= 1".to_string(),
            ));
        }
        let rs = &self.radius_search;
        if !(rs.rmin.is_finite() && rs.rmax.is_finite()) || rs.rmin <= 0.0 || rs.rmax <= rs.rmin {
            return Err(AmrError::ConfigError(format!(
                "radius_search bracket must satisfy 0 < rmin < rmax, got [{}, {}]",
                rs.rmin, rs.rmax
            )));
        }
        if !rs.rtol.is_finite() || rs.rtol <= 0.0 {
            return Err(AmrError::ConfigError(format!(
                "radius_search.rtol must be finite > 0, got {}",
                rs.rtol
            )));
        }
        if self.ncores == 0 {
            return Err(AmrError::ConfigError("ncores must be >= 1".to_string()));
        }
        Ok(())
    }

    pub fn domain(&self) -> Domain {
        Domain::new(self.domain.side, self.domain.nmax)
    }
}
