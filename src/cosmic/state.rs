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

use crate::linalg::Vector3;
use crate::time::{Duration, Epoch, Unit};
use std::fmt;
use std::ops::{Add, Mul};

/// Below this magnitude, relative errors are computed against 1.0 instead of
/// the state magnitude to prevent dividing by a vanishing number.
const REL_ERR_FLOOR: f64 = 1.0;

/// A Cartesian state: position, velocity, and the epoch they osculate at.
///
/// This struct stores the state in Cartesian coordinates as these are always
/// non singular. States are plain values: they are copied, never aliased.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StateVector {
    /// Position in km
    pub radius_km: Vector3<f64>,
    /// Velocity in km/s
    pub velocity_km_s: Vector3<f64>,
    /// Epoch at which position and velocity are valid
    pub epoch: Epoch,
}

impl StateVector {
    /// Creates a new state at the provided Epoch.
    ///
    /// **Units:** km, km, km, km/s, km/s, km/s
    pub fn cartesian(x: f64, y: f64, z: f64, vx: f64, vy: f64, vz: f64, epoch: Epoch) -> Self {
        Self {
            radius_km: Vector3::new(x, y, z),
            velocity_km_s: Vector3::new(vx, vy, vz),
            epoch,
        }
    }

    /// Creates a new state from the borrowed position and velocity vectors.
    pub fn from_vectors(radius_km: Vector3<f64>, velocity_km_s: Vector3<f64>, epoch: Epoch) -> Self {
        Self {
            radius_km,
            velocity_km_s,
            epoch,
        }
    }

    /// Returns the magnitude of the radius vector in km
    pub fn rmag(&self) -> f64 {
        self.radius_km.norm()
    }

    /// Returns the magnitude of the velocity vector in km/s
    pub fn vmag(&self) -> f64 {
        self.velocity_km_s.norm()
    }

    /// Returns the unit vector in the direction of the state radius
    pub fn r_hat(&self) -> Vector3<f64> {
        self.radius_km / self.rmag()
    }

    /// Returns the orbital momentum vector in km^2/s
    pub fn hvec(&self) -> Vector3<f64> {
        self.radius_km.cross(&self.velocity_km_s)
    }

    /// Returns the norm of the orbital momentum
    pub fn hmag(&self) -> f64 {
        self.hvec().norm()
    }

    /// Returns the radial velocity in km/s, i.e. the velocity projected on the radius direction.
    ///
    /// Positive when climbing toward apoapsis, negative when falling toward periapsis.
    pub fn radial_velocity_km_s(&self) -> f64 {
        self.radius_km.dot(&self.velocity_km_s) / self.rmag()
    }

    /// Returns the specific mechanical energy in km^2/s^2 for the provided
    /// gravitational parameter.
    pub fn energy_km2_s2(&self, gm_km3_s2: f64) -> f64 {
        self.vmag().powi(2) / 2.0 - gm_km3_s2 / self.rmag()
    }

    /// Returns a copy of this state with the provided derivative applied for
    /// `scale` seconds: `(r + s*v_dot, v + s*a, t)`.
    ///
    /// The epoch is deliberately unchanged: integrator stages all osculate at
    /// the step start, and the caller advances the epoch once per accepted step.
    pub fn add_scaled(&self, deriv: &StateDerivative, scale: f64) -> Self {
        Self {
            radius_km: self.radius_km + scale * deriv.velocity_km_s,
            velocity_km_s: self.velocity_km_s + scale * deriv.accel_km_s2,
            epoch: self.epoch,
        }
    }

    /// Returns a copy of this state with position and velocity multiplied by the provided scalar.
    pub fn scale(&self, scalar: f64) -> Self {
        Self {
            radius_km: scalar * self.radius_km,
            velocity_km_s: scalar * self.velocity_km_s,
            epoch: self.epoch,
        }
    }

    /// Returns a copy of this state with the epoch advanced by the provided number of seconds.
    pub fn advanced_by(&self, dt_s: f64) -> Self {
        Self {
            epoch: self.epoch + dt_s * Unit::Second,
            ..*self
        }
    }

    /// Returns the duration elapsed since the provided reference epoch.
    pub fn time_since(&self, reference: Epoch) -> Duration {
        self.epoch - reference
    }

    /// Returns the scaled error between this state and another.
    ///
    /// The error is the larger of the relative position error and the relative
    /// velocity error, each normalized by this state's magnitude floored at 1.0.
    pub fn error_to(&self, other: &Self) -> f64 {
        let pos_err = (other.radius_km - self.radius_km).norm() / self.rmag().max(REL_ERR_FLOOR);
        let vel_err =
            (other.velocity_km_s - self.velocity_km_s).norm() / self.vmag().max(REL_ERR_FLOOR);
        pos_err.max(vel_err)
    }

    /// Returns whether every component of this state is finite.
    ///
    /// A non-finite component indicates a solver failure upstream.
    pub fn is_finite(&self) -> bool {
        self.radius_km.iter().all(|c| c.is_finite())
            && self.velocity_km_s.iter().all(|c| c.is_finite())
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}] position = [{:.6}, {:.6}, {:.6}] km\tvelocity = [{:.6}, {:.6}, {:.6}] km/s",
            self.epoch,
            self.radius_km[0],
            self.radius_km[1],
            self.radius_km[2],
            self.velocity_km_s[0],
            self.velocity_km_s[1],
            self.velocity_km_s[2],
        )
    }
}

/// The time derivative of a [`StateVector`]: the velocity contribution for the
/// position and the acceleration contribution for the velocity.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StateDerivative {
    /// d(position)/dt in km/s
    pub velocity_km_s: Vector3<f64>,
    /// d(velocity)/dt in km/s^2
    pub accel_km_s2: Vector3<f64>,
}

impl StateDerivative {
    pub fn new(velocity_km_s: Vector3<f64>, accel_km_s2: Vector3<f64>) -> Self {
        Self {
            velocity_km_s,
            accel_km_s2,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

impl Add for StateDerivative {
    type Output = StateDerivative;

    fn add(self, other: Self) -> Self {
        Self {
            velocity_km_s: self.velocity_km_s + other.velocity_km_s,
            accel_km_s2: self.accel_km_s2 + other.accel_km_s2,
        }
    }
}

impl Mul<f64> for StateDerivative {
    type Output = StateDerivative;

    fn mul(self, scalar: f64) -> Self {
        Self {
            velocity_km_s: scalar * self.velocity_km_s,
            accel_km_s2: scalar * self.accel_km_s2,
        }
    }
}

impl Mul<StateDerivative> for f64 {
    type Output = StateDerivative;

    fn mul(self, deriv: StateDerivative) -> StateDerivative {
        deriv * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leoish() -> StateVector {
        StateVector::cartesian(
            6778.137,
            0.0,
            0.0,
            0.0,
            7.6686,
            0.0,
            Epoch::from_gregorian_utc(2023, 3, 1, 0, 0, 0, 0),
        )
    }

    #[test]
    fn add_scaled_keeps_epoch() {
        let state = leoish();
        let deriv = StateDerivative::new(state.velocity_km_s, Vector3::new(0.0, 0.0, -1e-3));
        let bumped = state.add_scaled(&deriv, 10.0);
        assert_eq!(bumped.epoch, state.epoch);
        assert!((bumped.radius_km[1] - 76.686).abs() < 1e-12);
        assert!((bumped.velocity_km_s[2] + 1e-2).abs() < 1e-15);
    }

    #[test]
    fn error_metric_is_relative() {
        let state = leoish();
        let mut other = state;
        other.radius_km[0] += 6.778137e-3;
        // One part in a million of the position magnitude
        assert!((state.error_to(&other) - 1e-6).abs() < 1e-12);
        // Velocity error of 1e-6 km/s against a 7.67 km/s state
        let mut other = state;
        other.velocity_km_s[1] += 1e-6;
        assert!((state.error_to(&other) - 1e-6 / state.vmag()).abs() < 1e-12);
    }

    #[test]
    fn derivative_algebra() {
        let d1 = StateDerivative::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 2.0, 0.0));
        let d2 = StateDerivative::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, 4.0));
        let sum = (d1 + d2) * 0.5;
        assert_eq!(sum.velocity_km_s, Vector3::new(0.5, 0.5, 0.0));
        assert_eq!(sum.accel_km_s2, Vector3::new(0.0, 1.0, 2.0));
    }
}
