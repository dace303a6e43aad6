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

use super::Force;
use crate::cosmic::bodies::STD_GRAVITY_M_S2;
use crate::cosmic::StateVector;
use crate::linalg::Vector3;
use crate::time::Epoch;

const M_PER_KM: f64 = 1_000.0;

/// A continuous, inertially-fixed thrust arc.
///
/// The arc is keyed off the state epoch: it contributes between `start` and
/// `start + duration_s`, which keeps the force itself immutable during
/// propagation. The mass flow is not fed back into the trajectory; use
/// [`Thrust::fuel_used_kg`] to account for the propellant afterwards.
#[derive(Clone, Debug)]
pub struct Thrust {
    /// Thrust direction, unit, in the inertial frame
    pub direction: Vector3<f64>,
    /// Thrust magnitude in newtons
    pub thrust_n: f64,
    /// Burn duration in seconds
    pub duration_s: f64,
    /// Specific impulse in seconds
    pub isp_s: f64,
    /// Ignition epoch
    pub start: Epoch,
}

impl Thrust {
    pub fn new(direction: Vector3<f64>, thrust_n: f64, duration_s: f64, isp_s: f64, start: Epoch) -> Self {
        let norm = direction.norm();
        let direction = if (norm - 1.0).abs() > 1e-12 && norm > 0.0 {
            warn!("thrust direction was not a unit vector: normalized");
            direction / norm
        } else {
            direction
        };
        Self {
            direction,
            thrust_n,
            duration_s,
            isp_s,
            start,
        }
    }

    /// Propellant consumed by burning for the provided duration, in kg.
    pub fn fuel_used_kg(&self, burn_s: f64) -> f64 {
        let burn_s = burn_s.min(self.duration_s);
        self.thrust_n * burn_s / (self.isp_s * STD_GRAVITY_M_S2)
    }
}

impl Force for Thrust {
    fn name(&self) -> &'static str {
        "thrust"
    }

    fn applicable(&self, state: &StateVector) -> bool {
        let elapsed_s = (state.epoch - self.start).in_seconds();
        (0.0..=self.duration_s).contains(&elapsed_s)
    }

    fn acceleration(&self, _state: &StateVector, mass_kg: f64) -> Vector3<f64> {
        // N/kg is m/s^2; divide by M_PER_KM for km/s^2.
        self.thrust_n / (mass_kg * M_PER_KM) * self.direction
    }
}
