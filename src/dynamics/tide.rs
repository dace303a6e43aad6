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
use crate::cosmic::{Body, StateVector};
use crate::linalg::Vector3;

/// First-order tidal acceleration from a perturbing body.
///
/// This is the gravity-gradient expansion of the differential third-body
/// acceleration about the central body:
/// `a = μ_b / d^3 · (3 (d_hat·r) d_hat − r)`. It is cheaper than the full
/// differential form and adequate when `|r| << d`, which holds for Earth
/// orbits perturbed by the Sun or the Moon.
#[derive(Clone, Debug)]
pub struct TidalForce {
    pub body: Body,
}

impl TidalForce {
    pub fn new(body: Body) -> Self {
        Self { body }
    }
}

impl Force for TidalForce {
    fn name(&self) -> &'static str {
        "tide"
    }

    fn acceleration(&self, state: &StateVector, _mass_kg: f64) -> Vector3<f64> {
        let d = self.body.position_km(state.epoch);
        let dmag = d.norm();
        let d_hat = d / dmag;
        let r = state.radius_km;
        self.body.gm_km3_s2 / dmag.powi(3) * (3.0 * d_hat.dot(&r) * d_hat - r)
    }
}
