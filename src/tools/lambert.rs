/*
    Astraea, spacecraft propagation and maneuver design
    Copyright (C) 2024 Astraea Contributors

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

//! Lambert's problem in the Lagrange semi-major axis formulation: given two
//! position vectors and a time of flight, find the connecting conic.
//!
//! Infeasible geometries (time of flight below the parabolic minimum,
//! collinear endpoints, iteration failure) are returned as data with
//! `feasible = false` rather than as errors, so combinatorial searches such as
//! the rendezvous scan can skim over them.

use crate::linalg::Vector3;
use crate::utils::{clamped_acos, clamped_asin};
use serde_derive::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Iteration cap of the semi-major axis search.
const MAX_ITER: usize = 200;
/// Relative tolerance on the time of flight.
const TOF_TOLERANCE: f64 = 1e-11;
/// Transfer angles closer than this to 0 or π are treated as degenerate.
const SIN_DNU_EPSILON: f64 = 1e-10;

/// The inputs of a Lambert problem.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct LambertConfig {
    pub r_init_km: Vector3<f64>,
    pub r_final_km: Vector3<f64>,
    pub tof_s: f64,
    pub gm: f64,
    /// Prograde transfers sweep counterclockwise as seen from +z.
    pub prograde: bool,
    /// Number of complete revolutions on the transfer.
    pub revolutions: u32,
    /// Current velocity at departure, used for the ΔV cost of the solution.
    pub v_init_ref_km_s: Option<Vector3<f64>>,
    /// Target velocity at arrival, used for the ΔV cost of the solution.
    pub v_final_ref_km_s: Option<Vector3<f64>>,
}

impl LambertConfig {
    /// A direct prograde transfer.
    pub fn prograde(r_init_km: Vector3<f64>, r_final_km: Vector3<f64>, tof_s: f64, gm: f64) -> Self {
        Self {
            r_init_km,
            r_final_km,
            tof_s,
            gm,
            prograde: true,
            revolutions: 0,
            v_init_ref_km_s: None,
            v_final_ref_km_s: None,
        }
    }
}

/// A Lambert solution. When `feasible` is false the velocities are zero and
/// the ΔV cost is infinite.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct LambertSolution {
    pub v_init_km_s: Vector3<f64>,
    pub v_final_km_s: Vector3<f64>,
    /// Semi-major axis of the transfer conic in km
    pub sma_km: f64,
    /// Semilatus rectum of the transfer conic in km
    pub p_km: f64,
    pub revolutions: u32,
    pub feasible: bool,
    /// Total ΔV against the reference velocities of the config, or the sum of
    /// the boundary speeds when no references were provided.
    pub dv_total_km_s: f64,
}

impl LambertSolution {
    fn infeasible(revolutions: u32) -> Self {
        Self {
            v_init_km_s: Vector3::zeros(),
            v_final_km_s: Vector3::zeros(),
            sma_km: f64::NAN,
            p_km: f64::NAN,
            revolutions,
            feasible: false,
            dv_total_km_s: f64::INFINITY,
        }
    }
}

/// Geometry of one Lambert problem, fixed across the iteration.
struct Geometry {
    s: f64,
    c: f64,
    /// +1 for a transfer angle below π, -1 above
    beta_sign: f64,
    revs: f64,
}

impl Geometry {
    /// Time of flight on the transfer ellipse of semi-major axis `a`.
    /// `long_branch` selects the α > π family of solutions.
    fn tof(&self, a: f64, long_branch: bool, gm: f64) -> f64 {
        let alpha0 = 2.0 * clamped_asin((self.s / (2.0 * a)).sqrt());
        let beta0 = 2.0 * clamped_asin(((self.s - self.c) / (2.0 * a)).sqrt());
        let alpha = if long_branch { 2.0 * PI - alpha0 } else { alpha0 };
        let beta = self.beta_sign * beta0;
        (a.powi(3) / gm).sqrt()
            * (2.0 * PI * self.revs + (alpha - alpha.sin()) - (beta - beta.sin()))
    }

    fn alpha_beta(&self, a: f64, long_branch: bool) -> (f64, f64) {
        let alpha0 = 2.0 * clamped_asin((self.s / (2.0 * a)).sqrt());
        let beta0 = 2.0 * clamped_asin(((self.s - self.c) / (2.0 * a)).sqrt());
        let alpha = if long_branch { 2.0 * PI - alpha0 } else { alpha0 };
        (alpha, self.beta_sign * beta0)
    }
}

/// Bisects `geom.tof(a, long_branch) = tof` for `a` in the provided bracket.
/// `increasing` states whether the time of flight grows with `a` on this branch.
fn bisect_sma(
    geom: &Geometry,
    gm: f64,
    tof_s: f64,
    mut lo: f64,
    mut hi: f64,
    long_branch: bool,
    increasing: bool,
) -> Option<f64> {
    for _ in 0..MAX_ITER {
        let mid = 0.5 * (lo + hi);
        let t = geom.tof(mid, long_branch, gm);
        if ((t - tof_s) / tof_s).abs() < TOF_TOLERANCE {
            return Some(mid);
        }
        let too_long = t > tof_s;
        if too_long == increasing {
            hi = mid;
        } else {
            lo = mid;
        }
        if (hi - lo) / hi < 1e-15 {
            let t = geom.tof(0.5 * (lo + hi), long_branch, gm);
            return if ((t - tof_s) / tof_s).abs() < 1e-6 {
                Some(0.5 * (lo + hi))
            } else {
                None
            };
        }
    }
    None
}

/// Solves Lambert's problem for the provided configuration.
pub fn lambert(cfg: &LambertConfig) -> LambertSolution {
    let revs = cfg.revolutions;
    let r1 = cfg.r_init_km;
    let r2 = cfg.r_final_km;
    let r1n = r1.norm();
    let r2n = r2.norm();
    if cfg.tof_s <= 0.0 || r1n < f64::EPSILON || r2n < f64::EPSILON || cfg.gm <= 0.0 {
        return LambertSolution::infeasible(revs);
    }

    // Transfer angle, flipped by the winding of r1 x r2 for the requested direction.
    let mut dnu = clamped_acos(r1.dot(&r2) / (r1n * r2n));
    let n_z = r1.cross(&r2)[2];
    if cfg.prograde {
        if n_z < 0.0 {
            dnu = 2.0 * PI - dnu;
        }
    } else if n_z >= 0.0 {
        dnu = 2.0 * PI - dnu;
    }
    let (sin_dnu, cos_dnu) = dnu.sin_cos();
    if sin_dnu.abs() < SIN_DNU_EPSILON {
        // Collinear endpoints: the transfer plane is undefined (Δν ~ 0) or the
        // velocity extraction degenerates (Δν ~ π).
        return LambertSolution::infeasible(revs);
    }

    let c = (r2 - r1).norm();
    let s = (r1n + r2n + c) / 2.0;
    let geom = Geometry {
        s,
        c,
        beta_sign: if dnu <= PI { 1.0 } else { -1.0 },
        revs: f64::from(revs),
    };

    // Barker's equation: the parabolic minimum time of flight for this geometry.
    let tof_parabolic = (1.0 / 3.0)
        * (2.0 / cfg.gm).sqrt()
        * (s * (2.0 * s).sqrt() - geom.beta_sign * (s - c) * (2.0 * (s - c)).sqrt());
    if revs == 0 && cfg.tof_s < tof_parabolic {
        return LambertSolution::infeasible(revs);
    }

    let a_min = s / 2.0;
    let tof_at_min_energy = geom.tof(a_min, false, cfg.gm);

    let sma = if cfg.tof_s >= tof_at_min_energy {
        // Long-period family: the time of flight grows with the semi-major axis.
        let mut hi = 2.0 * a_min;
        let mut expansions = 0;
        while geom.tof(hi, true, cfg.gm) < cfg.tof_s {
            hi *= 2.0;
            expansions += 1;
            if expansions > 60 {
                return LambertSolution::infeasible(revs);
            }
        }
        match bisect_sma(&geom, cfg.gm, cfg.tof_s, a_min, hi, true, true) {
            Some(a) => (a, true),
            None => return LambertSolution::infeasible(revs),
        }
    } else if revs == 0 {
        // Short-period family: the time of flight shrinks toward the parabolic
        // limit as the ellipse opens up.
        let mut hi = 2.0 * a_min;
        let mut expansions = 0;
        while geom.tof(hi, false, cfg.gm) > cfg.tof_s {
            hi *= 2.0;
            expansions += 1;
            if expansions > 60 {
                return LambertSolution::infeasible(revs);
            }
        }
        match bisect_sma(&geom, cfg.gm, cfg.tof_s, a_min, hi, false, false) {
            Some(a) => (a, false),
            None => return LambertSolution::infeasible(revs),
        }
    } else {
        // Multi-revolution short branch: the time of flight dips to a minimum
        // before the 2πN·√(a³/μ) term takes over. Locate the minimum, then
        // bisect on the descending side.
        let mut lo = a_min;
        let mut hi = 1_000.0 * a_min;
        for _ in 0..200 {
            let m1 = lo + (hi - lo) / 3.0;
            let m2 = hi - (hi - lo) / 3.0;
            if geom.tof(m1, false, cfg.gm) < geom.tof(m2, false, cfg.gm) {
                hi = m2;
            } else {
                lo = m1;
            }
        }
        let a_star = 0.5 * (lo + hi);
        if cfg.tof_s < geom.tof(a_star, false, cfg.gm) {
            return LambertSolution::infeasible(revs);
        }
        match bisect_sma(&geom, cfg.gm, cfg.tof_s, a_min, a_star, false, false) {
            Some(a) => (a, false),
            None => return LambertSolution::infeasible(revs),
        }
    };
    let (sma_km, long_branch) = sma;

    // Lagrange's semilatus rectum for the converged ellipse.
    let (alpha, beta) = geom.alpha_beta(sma_km, long_branch);
    let p_km = 4.0 * sma_km * (s - r1n) * (s - r2n) * ((alpha + beta) / 2.0).sin().powi(2)
        / c.powi(2);
    if !sma_km.is_finite() || !p_km.is_finite() || p_km <= 0.0 {
        return LambertSolution::infeasible(revs);
    }

    // Lagrange coefficients give the boundary velocities.
    let f = 1.0 - r2n / p_km * (1.0 - cos_dnu);
    let g = r1n * r2n * sin_dnu / (cfg.gm * p_km).sqrt();
    let g_dot = 1.0 - r1n / p_km * (1.0 - cos_dnu);
    if g.abs() < f64::EPSILON {
        return LambertSolution::infeasible(revs);
    }
    let v_init_km_s = (r2 - f * r1) / g;
    let v_final_km_s = (g_dot * r2 - r1) / g;

    let dv_total_km_s = match (cfg.v_init_ref_km_s, cfg.v_final_ref_km_s) {
        (Some(v1), Some(v2)) => (v_init_km_s - v1).norm() + (v_final_km_s - v2).norm(),
        (Some(v1), None) => (v_init_km_s - v1).norm(),
        (None, Some(v2)) => (v_final_km_s - v2).norm(),
        (None, None) => v_init_km_s.norm() + v_final_km_s.norm(),
    };

    LambertSolution {
        v_init_km_s,
        v_final_km_s,
        sma_km,
        p_km,
        revolutions: revs,
        feasible: true,
        dv_total_km_s,
    }
}

/// Enumerates the transfers of zero through `max_revolutions` complete
/// revolutions, returning the feasible ones sorted by total ΔV.
pub fn lambert_multi_rev(cfg: &LambertConfig, max_revolutions: u32) -> Vec<LambertSolution> {
    let mut solutions: Vec<LambertSolution> = (0..=max_revolutions)
        .map(|revolutions| {
            lambert(&LambertConfig {
                revolutions,
                ..*cfg
            })
        })
        .filter(|sol| sol.feasible)
        .collect();
    solutions.sort_by(|a, b| {
        a.dv_total_km_s
            .partial_cmp(&b.dv_total_km_s)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    solutions
}

#[test]
fn test_lambert_vallado_shortway() {
    // Vallado, Example 7-1, p. 462
    let cfg = LambertConfig::prograde(
        Vector3::new(15_945.34, 0.0, 0.0),
        Vector3::new(12_214.838_99, 10_249.467_31, 0.0),
        76.0 * 60.0,
        3.986_004_33e5,
    );
    let sol = lambert(&cfg);
    assert!(sol.feasible);
    let exp_vi = Vector3::new(2.058_913, 2.915_965, 0.0);
    let exp_vf = Vector3::new(-3.451_565, 0.910_315, 0.0);
    assert!((sol.v_init_km_s - exp_vi).norm() < 1e-5, "{}", sol.v_init_km_s);
    assert!((sol.v_final_km_s - exp_vf).norm() < 1e-5, "{}", sol.v_final_km_s);
}

#[test]
fn test_lambert_vallado_longway() {
    let cfg = LambertConfig {
        prograde: false,
        ..LambertConfig::prograde(
            Vector3::new(15_945.34, 0.0, 0.0),
            Vector3::new(12_214.838_99, 10_249.467_31, 0.0),
            76.0 * 60.0,
            3.986_004_33e5,
        )
    };
    let sol = lambert(&cfg);
    assert!(sol.feasible);
    let exp_vi = Vector3::new(-3.811_158, -2.003_854, 0.0);
    let exp_vf = Vector3::new(4.207_569, 0.914_724, 0.0);
    assert!((sol.v_init_km_s - exp_vi).norm() < 1e-5, "{}", sol.v_init_km_s);
    assert!((sol.v_final_km_s - exp_vf).norm() < 1e-5, "{}", sol.v_final_km_s);
}

#[test]
fn test_lambert_below_parabolic_is_infeasible() {
    // One second of flight time between LEO radii cannot be an ellipse.
    let cfg = LambertConfig::prograde(
        Vector3::new(7_000.0, 0.0, 0.0),
        Vector3::new(0.0, 8_000.0, 0.0),
        1.0,
        398_600.441_8,
    );
    let sol = lambert(&cfg);
    assert!(!sol.feasible);
    assert!(sol.dv_total_km_s.is_infinite());
    assert_eq!(sol.v_init_km_s, Vector3::zeros());
}

#[test]
fn test_lambert_collinear_is_infeasible() {
    let cfg = LambertConfig::prograde(
        Vector3::new(7_000.0, 0.0, 0.0),
        Vector3::new(-8_000.0, 0.0, 0.0),
        3_600.0,
        398_600.441_8,
    );
    assert!(!lambert(&cfg).feasible);
}

#[test]
fn test_lambert_multi_rev_sorted() {
    // A leisurely transfer admits zero- and one-rev solutions.
    let cfg = LambertConfig::prograde(
        Vector3::new(8_000.0, 0.0, 0.0),
        Vector3::new(0.0, 8_500.0, 0.0),
        4.0 * 3_600.0,
        398_600.441_8,
    );
    let sols = lambert_multi_rev(&cfg, 2);
    assert!(!sols.is_empty());
    for pair in sols.windows(2) {
        assert!(pair[0].dv_total_km_s <= pair[1].dv_total_km_s);
    }
}
