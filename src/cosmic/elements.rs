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

use crate::cosmic::StateVector;
use crate::errors::AstroError;
use crate::linalg::Vector3;
use crate::time::{Duration, Epoch, Unit};
use crate::utils::{between_0_2pi, clamped_acos};
use serde_derive::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// If an orbit has an eccentricity below this value, it is considered circular.
pub const ECC_EPSILON: f64 = 1e-10;
/// If the node vector magnitude is below this value, the orbit is considered equatorial.
pub const NODE_EPSILON: f64 = 1e-10;

/// Classical Keplerian orbital elements. All angles in **radians**.
///
/// Elements are immutable snapshots: propagation returns a new set rather than
/// mutating in place. The sign convention ties eccentricity and semi-major
/// axis together: `sma_km > 0` for closed orbits (`ecc < 1`), `sma_km < 0`
/// for hyperbolic ones (`ecc > 1`).
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis in km (negative for hyperbolic orbits)
    pub sma_km: f64,
    /// Eccentricity (may exceed 1)
    pub ecc: f64,
    /// Inclination in radians, in [0, π]
    pub inc_rad: f64,
    /// Right ascension of the ascending node in radians, in [0, 2π)
    pub raan_rad: f64,
    /// Argument of periapsis in radians, in [0, 2π)
    pub aop_rad: f64,
    /// True anomaly in radians, in [0, 2π)
    pub ta_rad: f64,
    /// Epoch at which these elements osculate
    pub epoch: Epoch,
    /// Gravitational parameter of the central body in km^3/s^2
    pub gm: f64,
}

impl OrbitalElements {
    /// Creates a new element set, normalizing the angle ranges and the
    /// eccentricity/semi-major axis sign convention.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sma_km: f64,
        ecc: f64,
        inc_rad: f64,
        raan_rad: f64,
        aop_rad: f64,
        ta_rad: f64,
        epoch: Epoch,
        gm: f64,
    ) -> Self {
        let ecc = if ecc < 0.0 {
            warn!("eccentricity cannot be negative: sign of eccentricity changed");
            -ecc
        } else {
            ecc
        };
        let sma_km = if ecc > 1.0 && sma_km > 0.0 {
            warn!("eccentricity > 1 (hyperbolic) BUT SMA > 0 (elliptical): sign of SMA changed");
            -sma_km
        } else if ecc < 1.0 && sma_km < 0.0 {
            warn!("eccentricity < 1 (elliptical) BUT SMA < 0 (hyperbolic): sign of SMA changed");
            -sma_km
        } else {
            sma_km
        };
        Self {
            sma_km,
            ecc,
            inc_rad: inc_rad.clamp(0.0, PI),
            raan_rad: between_0_2pi(raan_rad),
            aop_rad: between_0_2pi(aop_rad),
            ta_rad: between_0_2pi(ta_rad),
            epoch,
            gm,
        }
    }

    /// Computes the osculating elements of the provided Cartesian state.
    ///
    /// The degenerate cases (circular, equatorial, and both at once) are
    /// normalized to the conventional angle choices, so round-tripping through
    /// [`OrbitalElements::to_state`] is the identity away from parabolas.
    pub fn from_state(state: &StateVector, gm: f64) -> Result<Self, AstroError> {
        let r = state.radius_km;
        let v = state.velocity_km_s;
        let rmag = r.norm();
        if rmag < f64::EPSILON {
            return Err(AstroError::MathDomain(
                "radius is zero, cannot compute orbital elements".to_string(),
            ));
        }
        let h = r.cross(&v);
        let hmag = h.norm();
        if hmag < f64::EPSILON {
            return Err(AstroError::MathDomain(
                "rectilinear trajectory has no orbital plane".to_string(),
            ));
        }

        let node = Vector3::new(-h[1], h[0], 0.0); // z_hat x h
        let nmag = node.norm();
        let evec = ((v.norm_squared() - gm / rmag) * r - r.dot(&v) * v) / gm;
        let ecc = evec.norm();

        let energy = v.norm_squared() / 2.0 - gm / rmag;
        if energy.abs() < f64::EPSILON || (ecc - 1.0).abs() < 1e-12 {
            return Err(AstroError::MathDomain(
                "parabolic orbits have ill-defined Keplerian orbital elements".to_string(),
            ));
        }
        let sma_km = -gm / (2.0 * energy);
        let inc_rad = clamped_acos(h[2] / hmag);

        let circular = ecc < ECC_EPSILON;
        // The node magnitude scales with |h| sin(i): compare it relative to
        // |h| so the equatorial branch keys off the inclination itself.
        let equatorial = nmag / hmag < NODE_EPSILON;

        let (raan_rad, aop_rad, ta_rad) = match (circular, equatorial) {
            (false, false) => inclined_elliptic(&r, &v, &node, nmag, &evec, ecc),
            (true, false) => circular_inclined(&r, &node, nmag),
            (false, true) => equatorial_elliptic(&r, &v, &evec, ecc),
            (true, true) => circular_equatorial(&r),
        };

        Ok(Self {
            sma_km,
            ecc,
            inc_rad,
            raan_rad,
            aop_rad,
            ta_rad,
            epoch: state.epoch,
            gm,
        })
    }

    /// Computes the Cartesian state of these elements.
    ///
    /// The state is defined in Cartesian coordinates as they are non-singular:
    /// expect rounding on the order of 1e-12 when round-tripping elements.
    pub fn to_state(&self) -> StateVector {
        let p = self.semi_parameter_km();
        if p.abs() < f64::EPSILON {
            error!("semilatus rectum ~= 0.0: parabolic orbit, state will not be finite");
        }
        let radius = p / (1.0 + self.ecc * self.ta_rad.cos());
        let (sin_aop_ta, cos_aop_ta) = (self.aop_rad + self.ta_rad).sin_cos();
        let (sin_inc, cos_inc) = self.inc_rad.sin_cos();
        let (sin_raan, cos_raan) = self.raan_rad.sin_cos();
        let (sin_aop, cos_aop) = self.aop_rad.sin_cos();

        let x = radius * (cos_aop_ta * cos_raan - cos_inc * sin_aop_ta * sin_raan);
        let y = radius * (cos_aop_ta * sin_raan + cos_inc * sin_aop_ta * cos_raan);
        let z = radius * sin_aop_ta * sin_inc;

        let sqrt_gm_p = (self.gm / p).sqrt();
        let cos_ta_ecc = self.ta_rad.cos() + self.ecc;
        let sin_ta = self.ta_rad.sin();

        let vx = sqrt_gm_p * cos_ta_ecc * (-sin_aop * cos_raan - cos_inc * sin_raan * cos_aop)
            - sqrt_gm_p * sin_ta * (cos_aop * cos_raan - cos_inc * sin_raan * sin_aop);
        let vy = sqrt_gm_p * cos_ta_ecc * (-sin_aop * sin_raan + cos_inc * cos_raan * cos_aop)
            - sqrt_gm_p * sin_ta * (cos_aop * sin_raan + cos_inc * cos_raan * sin_aop);
        let vz = sqrt_gm_p * (cos_ta_ecc * sin_inc * cos_aop - sin_ta * sin_inc * sin_aop);

        StateVector::cartesian(x, y, z, vx, vy, vz, self.epoch)
    }

    /// Returns the semilatus rectum in km
    pub fn semi_parameter_km(&self) -> f64 {
        self.sma_km * (1.0 - self.ecc.powi(2))
    }

    /// Returns the radius of periapsis in km
    pub fn periapsis_km(&self) -> f64 {
        self.sma_km * (1.0 - self.ecc)
    }

    /// Returns the radius of apoapsis in km (not meaningful for hyperbolic orbits)
    pub fn apoapsis_km(&self) -> f64 {
        self.sma_km * (1.0 + self.ecc)
    }

    /// Returns the mean motion in rad/s
    pub fn mean_motion_rad_s(&self) -> f64 {
        (self.gm / self.sma_km.abs().powi(3)).sqrt()
    }

    /// Returns the orbital period (not meaningful for hyperbolic orbits)
    pub fn period(&self) -> Duration {
        2.0 * PI * (self.sma_km.powi(3) / self.gm).sqrt() * Unit::Second
    }

    /// Returns the specific mechanical energy in km^2/s^2
    pub fn energy_km2_s2(&self) -> f64 {
        -self.gm / (2.0 * self.sma_km)
    }

    /// Returns the characteristic energy C3 in km^2/s^2
    pub fn c3_km2_s2(&self) -> f64 {
        -self.gm / self.sma_km
    }

    /// Returns the hyperbolic excess speed in km/s
    pub fn vinf_km_s(&self) -> Result<f64, AstroError> {
        if self.ecc <= 1.0 {
            Err(AstroError::NotHyperbolic(
                "hyperbolic excess speed requested".to_string(),
            ))
        } else {
            Ok(self.c3_km2_s2().sqrt())
        }
    }

    /// Returns the flight path angle in radians
    pub fn fpa_rad(&self) -> f64 {
        let denom = (1.0 + 2.0 * self.ecc * self.ta_rad.cos() + self.ecc.powi(2)).sqrt();
        let sin_fpa = self.ecc * self.ta_rad.sin() / denom;
        let cos_fpa = (1.0 + self.ecc * self.ta_rad.cos()) / denom;
        sin_fpa.atan2(cos_fpa)
    }

    /// Returns the true longitude in radians
    pub fn true_longitude_rad(&self) -> f64 {
        between_0_2pi(self.raan_rad + self.aop_rad + self.ta_rad)
    }

    /// Returns the argument of latitude in radians
    pub fn argument_of_latitude_rad(&self) -> f64 {
        between_0_2pi(self.aop_rad + self.ta_rad)
    }

    /// Returns the velocity at the current true anomaly in km/s (vis-viva)
    pub fn velocity_km_s(&self) -> f64 {
        let radius = self.semi_parameter_km() / (1.0 + self.ecc * self.ta_rad.cos());
        (self.gm * (2.0 / radius - 1.0 / self.sma_km)).sqrt()
    }

    /// Secular drift of the ascending node under the provided zonal J2, in rad/s
    pub fn raan_dot_rad_s(&self, j2: f64, r_eq_km: f64) -> f64 {
        let n = self.mean_motion_rad_s();
        let p = self.semi_parameter_km();
        -1.5 * n * j2 * (r_eq_km / p).powi(2) * self.inc_rad.cos()
    }

    /// Secular drift of the argument of periapsis under the provided zonal J2, in rad/s
    pub fn aop_dot_rad_s(&self, j2: f64, r_eq_km: f64) -> f64 {
        let n = self.mean_motion_rad_s();
        let p = self.semi_parameter_km();
        0.75 * n * j2 * (r_eq_km / p).powi(2) * (5.0 * self.inc_rad.cos().powi(2) - 1.0)
    }

    /// Secular correction to the mean motion under the provided zonal J2, in rad/s
    pub fn ma_dot_rad_s(&self, j2: f64, r_eq_km: f64) -> f64 {
        let n = self.mean_motion_rad_s();
        let p = self.semi_parameter_km();
        0.75 * n * j2 * (r_eq_km / p).powi(2)
            * (1.0 - self.ecc.powi(2)).sqrt()
            * (3.0 * self.inc_rad.cos().powi(2) - 1.0)
    }

    /// Classifies this orbit by shape and plane.
    pub fn classify(&self) -> OrbitClass {
        let shape = if self.ecc < ECC_EPSILON {
            OrbitShape::Circular
        } else if self.ecc < 1.0 {
            OrbitShape::Elliptical
        } else if (self.ecc - 1.0).abs() < 1e-12 {
            OrbitShape::Parabolic
        } else {
            OrbitShape::Hyperbolic
        };
        OrbitClass {
            shape,
            equatorial: self.inc_rad < NODE_EPSILON || (PI - self.inc_rad) < NODE_EPSILON,
            retrograde: self.inc_rad > PI / 2.0,
        }
    }

    /// Returns a copy of these elements with a new true anomaly and epoch.
    pub fn with_anomaly(&self, ta_rad: f64, epoch: Epoch) -> Self {
        Self {
            ta_rad: between_0_2pi(ta_rad),
            epoch,
            ..*self
        }
    }
}

/// Conic section shape of an orbit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitShape {
    Circular,
    Elliptical,
    Parabolic,
    Hyperbolic,
}

/// Orbit classification: conic shape plus plane geometry flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitClass {
    pub shape: OrbitShape,
    pub equatorial: bool,
    pub retrograde: bool,
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}] sma = {:.3} km\tecc = {:.6}\tinc = {:.3} deg\traan = {:.3} deg\taop = {:.3} deg\tta = {:.3} deg",
            self.epoch,
            self.sma_km,
            self.ecc,
            self.inc_rad.to_degrees(),
            self.raan_rad.to_degrees(),
            self.aop_rad.to_degrees(),
            self.ta_rad.to_degrees(),
        )
    }
}

/// Non-degenerate branch: all three angles from the node and eccentricity vectors.
fn inclined_elliptic(
    r: &Vector3<f64>,
    v: &Vector3<f64>,
    node: &Vector3<f64>,
    nmag: f64,
    evec: &Vector3<f64>,
    ecc: f64,
) -> (f64, f64, f64) {
    let mut raan = clamped_acos(node[0] / nmag);
    if node[1] < 0.0 {
        raan = 2.0 * PI - raan;
    }
    let mut aop = clamped_acos(node.dot(evec) / (nmag * ecc));
    if evec[2] < 0.0 {
        aop = 2.0 * PI - aop;
    }
    let mut ta = clamped_acos(evec.dot(r) / (ecc * r.norm()));
    if r.dot(v) < 0.0 {
        ta = 2.0 * PI - ta;
    }
    (raan, aop, ta)
}

/// Circular inclined: the argument of periapsis is conventionally zero and the
/// true anomaly is measured from the ascending node (argument of latitude).
fn circular_inclined(r: &Vector3<f64>, node: &Vector3<f64>, nmag: f64) -> (f64, f64, f64) {
    let mut raan = clamped_acos(node[0] / nmag);
    if node[1] < 0.0 {
        raan = 2.0 * PI - raan;
    }
    let mut ta = clamped_acos(node.dot(r) / (nmag * r.norm()));
    if r[2] < 0.0 {
        ta = 2.0 * PI - ta;
    }
    (raan, 0.0, ta)
}

/// Equatorial elliptic: the node is undefined, so the right ascension is
/// conventionally zero and the argument of periapsis becomes the true
/// longitude of periapsis, measured with atan2 to keep its quadrant.
fn equatorial_elliptic(
    r: &Vector3<f64>,
    v: &Vector3<f64>,
    evec: &Vector3<f64>,
    ecc: f64,
) -> (f64, f64, f64) {
    let aop = between_0_2pi(evec[1].atan2(evec[0]));
    let mut ta = clamped_acos(evec.dot(r) / (ecc * r.norm()));
    if r.dot(v) < 0.0 {
        ta = 2.0 * PI - ta;
    }
    (0.0, aop, ta)
}

/// Circular equatorial: both node and periapsis are undefined, the true
/// anomaly degenerates to the true longitude of the position itself.
fn circular_equatorial(r: &Vector3<f64>) -> (f64, f64, f64) {
    (0.0, 0.0, between_0_2pi(r[1].atan2(r[0])))
}
