// ─────────────────────────────────────────────────────────────────────
// AMR Snapshot Analysis — Bracketed Root Finding
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Brent's method on a sign-changing bracket.
//!
//! Combines bisection, secant and inverse quadratic interpolation. Every
//! iterate stays inside the current bracket, so the method converges for any
//! function with a sign change, continuous or not (a step function converges
//! onto its jump).
//!
//! Stopping rule: `|bracket| / 2 < (xtol + rtol * |x|) / 2` or `f(x) == 0`.

use amr_types::error::{AmrError, AmrResult};

#[derive(Debug, Clone, Copy)]
pub struct BrentConfig {
    /// Absolute tolerance on the root.
    pub xtol: f64,
    /// Relative tolerance on the root.
    pub rtol: f64,
    pub max_iters: usize,
}

impl Default for BrentConfig {
    fn default() -> Self {
        Self {
            xtol: 2e-12,
            rtol: 4.0 * f64::EPSILON,
            max_iters: 100,
        }
    }
}

impl BrentConfig {
    pub fn with_xtol(xtol: f64) -> Self {
        Self {
            xtol,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct RootResult {
    pub root: f64,
    pub iterations: usize,
    pub function_calls: usize,
}

/// Find a root of `f` in `[a, b]`.
///
/// Fails with [`AmrError::NoBracket`] when `f(a)` and `f(b)` share sign and
/// with [`AmrError::SolverDiverged`] on non-finite values or when
/// `cfg.max_iters` is exhausted.
pub fn brent<F>(mut f: F, a: f64, b: f64, cfg: BrentConfig) -> AmrResult<RootResult>
where
    F: FnMut(f64) -> f64,
{
    if cfg.xtol.is_nan() || cfg.xtol <= 0.0 {
        return Err(AmrError::SolverDiverged {
            iterations: 0,
            message: format!("xtol must be > 0, got {}", cfg.xtol),
        });
    }

    let mut xpre = a;
    let mut xcur = b;
    let mut fpre = f(xpre);
    let mut fcur = f(xcur);
    let mut calls = 2usize;

    if !fpre.is_finite() || !fcur.is_finite() {
        return Err(AmrError::SolverDiverged {
            iterations: 0,
            message: format!("non-finite value at bracket ends: f({a})={fpre}, f({b})={fcur}"),
        });
    }
    if fpre == 0.0 {
        return Ok(RootResult {
            root: xpre,
            iterations: 0,
            function_calls: calls,
        });
    }
    if fcur == 0.0 {
        return Ok(RootResult {
            root: xcur,
            iterations: 0,
            function_calls: calls,
        });
    }
    if fpre.signum() == fcur.signum() {
        return Err(AmrError::NoBracket {
            a,
            b,
            fa: fpre,
            fb: fcur,
        });
    }

    // xblk is the contrapoint: f(xblk) and f(xcur) always differ in sign.
    let mut xblk = 0.0;
    let mut fblk = 0.0;
    let mut spre = 0.0;
    let mut scur = 0.0;

    for iter in 0..cfg.max_iters {
        if fpre != 0.0 && fcur != 0.0 && fpre.signum() != fcur.signum() {
            xblk = xpre;
            fblk = fpre;
            spre = xcur - xpre;
            scur = spre;
        }
        if fblk.abs() < fcur.abs() {
            xpre = xcur;
            xcur = xblk;
            xblk = xpre;

            fpre = fcur;
            fcur = fblk;
            fblk = fpre;
        }

        let delta = 0.5 * (cfg.xtol + cfg.rtol * xcur.abs());
        let sbis = 0.5 * (xblk - xcur);
        if fcur == 0.0 || sbis.abs() < delta {
            return Ok(RootResult {
                root: xcur,
                iterations: iter + 1,
                function_calls: calls,
            });
        }

        if spre.abs() > delta && fcur.abs() < fpre.abs() {
            let stry = if xpre == xblk {
                // secant
                -fcur * (xcur - xpre) / (fcur - fpre)
            } else {
                // inverse quadratic
                let dpre = (fpre - fcur) / (xpre - xcur);
                let dblk = (fblk - fcur) / (xblk - xcur);
                -fcur * (fblk * dblk - fpre * dpre) / (dblk * dpre * (fblk - fpre))
            };
            if 2.0 * stry.abs() < spre.abs().min(3.0 * sbis.abs() - delta) {
                spre = scur;
                scur = stry;
            } else {
                spre = sbis;
                scur = sbis;
            }
        } else {
            spre = sbis;
            scur = sbis;
        }

        xpre = xcur;
        fpre = fcur;
        if scur.abs() > delta {
            xcur += scur;
        } else {
            xcur += if sbis > 0.0 { delta } else { -delta };
        }

        fcur = f(xcur);
        calls += 1;
        if !fcur.is_finite() {
            return Err(AmrError::SolverDiverged {
                iterations: iter + 1,
                message: format!("non-finite value f({xcur})={fcur}"),
            });
        }
        log::trace!("brent iter {}: x={:.6e}, f={:.6e}", iter + 1, xcur, fcur);
    }

    Err(AmrError::SolverDiverged {
        iterations: cfg.max_iters,
        message: format!("no convergence within {} iterations, last x={xcur}", cfg.max_iters),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_two() {
        let res = brent(|x| x * x - 2.0, 0.0, 2.0, BrentConfig::default()).unwrap();
        assert!((res.root - 2.0_f64.sqrt()).abs() < 1e-11, "root={}", res.root);
        assert!(res.iterations < 20);
    }

    #[test]
    fn test_decreasing_cubic() {
        let res = brent(|x| 8.0 - x * x * x, 0.5, 5.0, BrentConfig::with_xtol(1e-10)).unwrap();
        assert!((res.root - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_endpoint_root_returned_directly() {
        let res = brent(|x| x - 1.0, 1.0, 3.0, BrentConfig::default()).unwrap();
        assert_eq!(res.root, 1.0);
        assert_eq!(res.iterations, 0);
    }

    #[test]
    fn test_no_bracket() {
        let err = brent(|x| x * x + 1.0, -1.0, 1.0, BrentConfig::default()).unwrap_err();
        assert!(matches!(err, AmrError::NoBracket { .. }));
    }

    #[test]
    fn test_step_function_converges_to_jump() {
        let jump = 0.7316;
        let xtol = 1e-6;
        let res = brent(
            |x| if x < jump { 1.0 } else { -1.0 },
            0.0,
            2.0,
            BrentConfig::with_xtol(xtol),
        )
        .unwrap();
        assert!((res.root - jump).abs() < 2.0 * xtol, "root={}", res.root);
    }

    #[test]
    fn test_iteration_cap() {
        let cfg = BrentConfig {
            xtol: 1e-15,
            rtol: 0.0,
            max_iters: 3,
        };
        let err = brent(|x| x.powi(3) - 0.3, 0.0, 10.0, cfg).unwrap_err();
        assert!(matches!(err, AmrError::SolverDiverged { iterations: 3, .. }));
    }

    #[test]
    fn test_nan_at_bracket_end() {
        let err = brent(|x| if x > 1.0 { f64::NAN } else { -1.0 }, 0.0, 2.0, BrentConfig::default())
            .unwrap_err();
        assert!(matches!(err, AmrError::SolverDiverged { .. }));
    }
}
