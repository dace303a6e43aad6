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
use crate::cosmic::bodies::EARTH_RADIUS_KM;
use crate::cosmic::{Body, StateVector};
use crate::linalg::Vector3;

/// Point-mass gravity of the central body: `a = -μ r / |r|^3`.
#[derive(Clone, Copy, Debug)]
pub struct CentralGravity {
    pub gm_km3_s2: f64,
}

impl CentralGravity {
    pub fn new(gm_km3_s2: f64) -> Self {
        Self { gm_km3_s2 }
    }
}

impl Force for CentralGravity {
    fn name(&self) -> &'static str {
        "two-body"
    }

    fn acceleration(&self, state: &StateVector, _mass_kg: f64) -> Vector3<f64> {
        -self.gm_km3_s2 / state.rmag().powi(3) * state.radius_km
    }
}

/// Differential gravity of a perturbing point mass.
///
/// Includes the indirect term: the perturber also accelerates the central
/// body, and states here are centered on that body, not on the barycenter.
#[derive(Clone, Debug)]
pub struct ThirdBody {
    pub body: Body,
    /// Third-body perturbations are only evaluated above this altitude.
    pub min_altitude_km: f64,
}

impl ThirdBody {
    pub fn new(body: Body) -> Self {
        Self {
            body,
            min_altitude_km: 1_000.0,
        }
    }
}

impl Force for ThirdBody {
    fn name(&self) -> &'static str {
        self.body.name
    }

    fn applicable(&self, state: &StateVector) -> bool {
        state.rmag() - EARTH_RADIUS_KM > self.min_altitude_km
    }

    fn acceleration(&self, state: &StateVector, _mass_kg: f64) -> Vector3<f64> {
        let r_body = self.body.position_km(state.epoch);
        let sat_to_body = r_body - state.radius_km;
        self.body.gm_km3_s2
            * (sat_to_body / sat_to_body.norm().powi(3) - r_body / r_body.norm().powi(3))
    }
}
