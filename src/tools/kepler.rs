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

//! Kepler's equation in its elliptic and hyperbolic regimes, and the
//! conversions between true, eccentric, hyperbolic, and mean anomalies.
//!
//! All conversions use the half-angle atan2 forms, which preserve the
//! quadrant without explicit case analysis.

use crate::cosmic::OrbitalElements;
use crate::errors::AstroError;
use crate::time::Unit;
use crate::utils::between_0_2pi;

/// Convergence tolerance of the Newton iterations on the anomaly residual.
pub const KEPLER_TOLERANCE: f64 = 1e-12;
/// Iteration cap of the Newton iterations.
pub const KEPLER_MAX_ITER: usize = 50;

/// Solves the elliptic Kepler equation `M = E - e·sin E` for the eccentric
/// anomaly by Newton iteration. The mean anomaly is normalized to [0, 2π).
pub fn solve_kepler(mean_anomaly: f64, ecc: f64) -> Result<f64, AstroError> {
    if !(0.0..1.0).contains(&ecc) {
        return Err(AstroError::MathDomain(format!(
            "elliptic Kepler solver requires 0 <= e < 1, got {ecc}"
        )));
    }
    let mean_anomaly = between_0_2pi(mean_anomaly);
    let mut ecc_anomaly = mean_anomaly + ecc * mean_anomaly.sin();
    let mut residual = ecc_anomaly - ecc * ecc_anomaly.sin() - mean_anomaly;
    for _ in 0..KEPLER_MAX_ITER {
        if residual.abs() < KEPLER_TOLERANCE {
            return Ok(ecc_anomaly);
        }
        ecc_anomaly -= residual / (1.0 - ecc * ecc_anomaly.cos());
        residual = ecc_anomaly - ecc * ecc_anomaly.sin() - mean_anomaly;
    }
    Err(AstroError::MaxIterReached {
        solver: "elliptic Kepler",
        iterations: KEPLER_MAX_ITER,
        residual,
    })
}

/// Solves the hyperbolic Kepler equation `M = e·sinh H - H` for the hyperbolic
/// anomaly by Newton iteration.
pub fn solve_kepler_hyperbolic(mean_anomaly: f64, ecc: f64) -> Result<f64, AstroError> {
    if ecc <= 1.0 {
        return Err(AstroError::MathDomain(format!(
            "hyperbolic Kepler solver requires e > 1, got {ecc}"
        )));
    }
    // The logarithmic seed tracks the asymptotic growth of sinh.
    let mut hyp_anomaly =
        mean_anomaly.signum() * (2.0 * mean_anomaly.abs() / ecc + 1.8).ln();
    let mut residual = ecc * hyp_anomaly.sinh() - hyp_anomaly - mean_anomaly;
    for _ in 0..KEPLER_MAX_ITER {
        if residual.abs() < KEPLER_TOLERANCE {
            return Ok(hyp_anomaly);
        }
        hyp_anomaly -= residual / (ecc * hyp_anomaly.cosh() - 1.0);
        residual = ecc * hyp_anomaly.sinh() - hyp_anomaly - mean_anomaly;
    }
    Err(AstroError::MaxIterReached {
        solver: "hyperbolic Kepler",
        iterations: KEPLER_MAX_ITER,
        residual,
    })
}

/// True anomaly from the eccentric anomaly (elliptic).
pub fn true_from_eccentric(ecc_anomaly: f64, ecc: f64) -> f64 {
    between_0_2pi(2.0 * ((1.0 + ecc).sqrt() * (ecc_anomaly / 2.0).sin())
        .atan2((1.0 - ecc).sqrt() * (ecc_anomaly / 2.0).cos()))
}

/// Eccentric anomaly from the true anomaly (elliptic).
pub fn eccentric_from_true(ta: f64, ecc: f64) -> f64 {
    between_0_2pi(2.0 * ((1.0 - ecc).sqrt() * (ta / 2.0).sin())
        .atan2((1.0 + ecc).sqrt() * (ta / 2.0).cos()))
}

/// Mean anomaly from the eccentric anomaly (elliptic).
pub fn mean_from_eccentric(ecc_anomaly: f64, ecc: f64) -> f64 {
    between_0_2pi(ecc_anomaly - ecc * ecc_anomaly.sin())
}

/// True anomaly from the hyperbolic anomaly.
pub fn true_from_hyperbolic(hyp_anomaly: f64, ecc: f64) -> f64 {
    between_0_2pi(2.0 * ((ecc + 1.0).sqrt() * (hyp_anomaly / 2.0).sinh())
        .atan2((ecc - 1.0).sqrt() * (hyp_anomaly / 2.0).cosh()))
}

/// Hyperbolic anomaly from the true anomaly. The true anomaly must be within
/// the asymptote limits of the hyperbola.
pub fn hyperbolic_from_true(ta: f64, ecc: f64) -> f64 {
    let sin_ta = ta.sin();
    let cos_ta = ta.cos();
    let sinh_h = sin_ta * (ecc.powi(2) - 1.0).sqrt() / (1.0 + ecc * cos_ta);
    sinh_h.asinh()
}

/// Mean anomaly from the hyperbolic anomaly.
pub fn mean_from_hyperbolic(hyp_anomaly: f64, ecc: f64) -> f64 {
    ecc * hyp_anomaly.sinh() - hyp_anomaly
}

/// Mean anomaly from the true anomaly, dispatching on the regime.
pub fn mean_from_true(ta: f64, ecc: f64) -> Result<f64, AstroError> {
    if ecc < 1.0 {
        Ok(mean_from_eccentric(eccentric_from_true(ta, ecc), ecc))
    } else if ecc > 1.0 {
        Ok(mean_from_hyperbolic(hyperbolic_from_true(ta, ecc), ecc))
    } else {
        Err(AstroError::MathDomain(
            "mean anomaly undefined for parabolic orbits".to_string(),
        ))
    }
}

/// True anomaly from the mean anomaly, dispatching on the regime.
pub fn true_from_mean(mean_anomaly: f64, ecc: f64) -> Result<f64, AstroError> {
    if ecc < 1.0 {
        Ok(true_from_eccentric(solve_kepler(mean_anomaly, ecc)?, ecc))
    } else if ecc > 1.0 {
        Ok(true_from_hyperbolic(
            solve_kepler_hyperbolic(mean_anomaly, ecc)?,
            ecc,
        ))
    } else {
        Err(AstroError::MathDomain(
            "true anomaly from mean undefined for parabolic orbits".to_string(),
        ))
    }
}

/// Time of flight in seconds between two true anomalies on an elliptic orbit,
/// counted in the direction of motion (always non-negative, below one period).
pub fn time_of_flight_s(
    ta_from: f64,
    ta_to: f64,
    ecc: f64,
    sma_km: f64,
    gm: f64,
) -> Result<f64, AstroError> {
    if ecc >= 1.0 {
        return Err(AstroError::MathDomain(
            "time of flight between anomalies requires a closed orbit".to_string(),
        ));
    }
    let n = (gm / sma_km.powi(3)).sqrt();
    let m_from = mean_from_true(ta_from, ecc)?;
    let m_to = mean_from_true(ta_to, ecc)?;
    Ok(between_0_2pi(m_to - m_from) / n)
}

/// Advances an element set by `dt_s` seconds of unperturbed two-body motion.
pub fn propagate_kepler(
    elements: &OrbitalElements,
    dt_s: f64,
) -> Result<OrbitalElements, AstroError> {
    let epoch = elements.epoch + dt_s * Unit::Second;
    let n = elements.mean_motion_rad_s();
    let ta_rad = if elements.ecc < 1.0 {
        let mean_anomaly = mean_from_true(elements.ta_rad, elements.ecc)? + n * dt_s;
        true_from_eccentric(solve_kepler(mean_anomaly, elements.ecc)?, elements.ecc)
    } else if elements.ecc > 1.0 {
        let mean_anomaly = mean_from_true(elements.ta_rad, elements.ecc)? + n * dt_s;
        true_from_hyperbolic(
            solve_kepler_hyperbolic(mean_anomaly, elements.ecc)?,
            elements.ecc,
        )
    } else {
        return Err(AstroError::MathDomain(
            "cannot propagate a parabolic orbit with Kepler's equation".to_string(),
        ));
    };
    Ok(elements.with_anomaly(ta_rad, epoch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn reference_case() {
        // M = 1.0 rad, e = 0.5: the root of E - 0.5 sin E = 1 is E = 1.4987011...
        let ecc_anomaly = solve_kepler(1.0, 0.5).unwrap();
        assert!((ecc_anomaly - 1.498_701_1).abs() < 1e-6, "{ecc_anomaly}");
        let residual = ecc_anomaly - 0.5 * ecc_anomaly.sin() - 1.0;
        assert!(residual.abs() < KEPLER_TOLERANCE);
    }

    #[test]
    fn anomaly_round_trip() {
        for &ecc in &[0.001, 0.1, 0.5, 0.9, 0.999] {
            for k in 0..16 {
                let mean_anomaly = k as f64 * PI / 8.0;
                let ecc_anomaly = solve_kepler(mean_anomaly, ecc).unwrap();
                let ta = true_from_eccentric(ecc_anomaly, ecc);
                let back_ecc = eccentric_from_true(ta, ecc);
                let back_mean = mean_from_eccentric(back_ecc, ecc);
                assert!(
                    (between_0_2pi(mean_anomaly) - back_mean).abs() < 1e-11
                        || (between_0_2pi(mean_anomaly) - back_mean).abs() > 2.0 * PI - 1e-11,
                    "e {ecc} M {mean_anomaly} -> {back_mean}"
                );
            }
        }
    }

    #[test]
    fn hyperbolic_round_trip() {
        for &ecc in &[1.1, 1.8, 3.5] {
            for &mean_anomaly in &[-2.0, -0.5, 0.3, 4.0] {
                let hyp = solve_kepler_hyperbolic(mean_anomaly, ecc).unwrap();
                let back = mean_from_hyperbolic(hyp, ecc);
                assert!((back - mean_anomaly).abs() < 1e-10, "e {ecc} M {mean_anomaly}");
                let ta = true_from_hyperbolic(hyp, ecc);
                let hyp_back = hyperbolic_from_true(ta, ecc);
                assert!((hyp_back - hyp).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn hyperbolic_solver_rejects_ellipses() {
        assert!(matches!(
            solve_kepler_hyperbolic(1.0, 0.9),
            Err(AstroError::MathDomain(_))
        ));
    }

    #[test]
    fn tof_half_orbit() {
        // Periapsis to apoapsis is half the period regardless of eccentricity.
        let gm = 398_600.441_8;
        let sma: f64 = 8_000.0;
        let period = 2.0 * PI * (sma.powi(3) / gm).sqrt();
        for &ecc in &[0.0, 0.3, 0.7] {
            let tof = time_of_flight_s(0.0, PI, ecc, sma, gm).unwrap();
            assert!((tof - period / 2.0).abs() < 1e-6, "e {ecc}");
        }
    }
}
