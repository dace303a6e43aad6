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
use crate::cosmic::bodies::{
    ATM_SCALE_HEIGHT_KM, EARTH_RADIUS_KM, EARTH_ROTATION_RAD_S, SEA_LEVEL_DENSITY_KG_M3,
};
use crate::cosmic::StateVector;
use crate::linalg::Vector3;

const M_PER_KM: f64 = 1_000.0;

/// Aerodynamic drag against a single-scale-height exponential atmosphere
/// which corotates with the Earth.
///
/// **WARNING:** a single scale height is a coarse fit of the real thermosphere.
/// Use this for decay-trend and maneuver-budget work, not precision lifetime
/// predictions.
#[derive(Clone, Copy, Debug)]
pub struct ExponentialDrag {
    /// Drag coefficient (dimensionless, typically 2.0 to 2.5)
    pub cd: f64,
    /// Cross sectional area in m^2
    pub area_m2: f64,
    /// The atmosphere is ignored above this altitude.
    pub max_altitude_km: f64,
}

impl ExponentialDrag {
    pub fn new(cd: f64, area_m2: f64) -> Self {
        Self {
            cd,
            area_m2,
            max_altitude_km: 1_000.0,
        }
    }

    /// Atmospheric density in kg/m^3 at the provided altitude in km.
    pub fn density_kg_m3(&self, altitude_km: f64) -> f64 {
        SEA_LEVEL_DENSITY_KG_M3 * (-altitude_km / ATM_SCALE_HEIGHT_KM).exp()
    }
}

impl Force for ExponentialDrag {
    fn name(&self) -> &'static str {
        "drag"
    }

    fn applicable(&self, state: &StateVector) -> bool {
        state.rmag() - EARTH_RADIUS_KM < self.max_altitude_km
    }

    fn acceleration(&self, state: &StateVector, mass_kg: f64) -> Vector3<f64> {
        let altitude_km = state.rmag() - EARTH_RADIUS_KM;
        let rho = self.density_kg_m3(altitude_km);
        // Velocity relative to the corotating atmosphere, in km/s.
        let omega = Vector3::new(0.0, 0.0, EARTH_ROTATION_RAD_S);
        let v_rel = state.velocity_km_s - omega.cross(&state.radius_km);
        // rho [kg/m^3] * v^2 [m^2/s^2] / m [kg] gives m/s^2; one km/s is
        // M_PER_KM m/s, and dividing by M_PER_KM brings it back to km/s^2.
        -0.5 * rho * self.cd * self.area_m2 * M_PER_KM * v_rel.norm() / mass_kg * v_rel
    }
}
