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

//! Zonal harmonics of orders two through four. Tesseral and sectoral terms
//! are out of scope for this library.

use super::Force;
use crate::cosmic::StateVector;
use crate::linalg::Vector3;

/// Acceleration from the J2 oblateness term of the central body.
#[derive(Clone, Copy, Debug)]
pub struct J2Gravity {
    pub gm_km3_s2: f64,
    pub j2: f64,
    pub r_eq_km: f64,
    /// J2 is negligible above this altitude and skipped.
    pub max_altitude_km: f64,
}

impl J2Gravity {
    pub fn new(gm_km3_s2: f64, j2: f64, r_eq_km: f64) -> Self {
        Self {
            gm_km3_s2,
            j2,
            r_eq_km,
            max_altitude_km: 100_000.0,
        }
    }
}

impl Force for J2Gravity {
    fn name(&self) -> &'static str {
        "J2"
    }

    fn applicable(&self, state: &StateVector) -> bool {
        state.rmag() - self.r_eq_km <= self.max_altitude_km
    }

    fn acceleration(&self, state: &StateVector, _mass_kg: f64) -> Vector3<f64> {
        let r = state.rmag();
        let p = state.radius_km;
        let factor = 1.5 * self.j2 * self.gm_km3_s2 * (self.r_eq_km / r).powi(2) / r.powi(3);
        let five_z2_r2 = 5.0 * (p[2] / r).powi(2);
        Vector3::new(
            factor * p[0] * (five_z2_r2 - 1.0),
            factor * p[1] * (five_z2_r2 - 1.0),
            factor * p[2] * (five_z2_r2 - 3.0),
        )
    }
}

/// Acceleration from the J3 and J4 zonal terms of the central body.
#[derive(Clone, Copy, Debug)]
pub struct J3J4Gravity {
    pub gm_km3_s2: f64,
    pub j3: f64,
    pub j4: f64,
    pub r_eq_km: f64,
    /// The higher zonals decay fast; skipped above this altitude.
    pub max_altitude_km: f64,
}

impl J3J4Gravity {
    pub fn new(gm_km3_s2: f64, j3: f64, j4: f64, r_eq_km: f64) -> Self {
        Self {
            gm_km3_s2,
            j3,
            j4,
            r_eq_km,
            max_altitude_km: 50_000.0,
        }
    }
}

impl Force for J3J4Gravity {
    fn name(&self) -> &'static str {
        "J3J4"
    }

    fn applicable(&self, state: &StateVector) -> bool {
        state.rmag() - self.r_eq_km <= self.max_altitude_km
    }

    fn acceleration(&self, state: &StateVector, _mass_kg: f64) -> Vector3<f64> {
        let p = state.radius_km;
        let r = state.rmag();
        let z2_r2 = (p[2] / r).powi(2);
        let z4_r4 = z2_r2.powi(2);

        let c3 = -2.5 * self.j3 * self.gm_km3_s2 * self.r_eq_km.powi(3) / r.powi(7);
        let a3 = Vector3::new(
            c3 * p[0] * (3.0 * p[2] - 7.0 * p[2].powi(3) / r.powi(2)),
            c3 * p[1] * (3.0 * p[2] - 7.0 * p[2].powi(3) / r.powi(2)),
            c3 * (6.0 * p[2].powi(2) - 7.0 * p[2].powi(4) / r.powi(2) - 0.6 * r.powi(2)),
        );

        let c4 = 1.875 * self.j4 * self.gm_km3_s2 * self.r_eq_km.powi(4) / r.powi(7);
        let a4 = Vector3::new(
            c4 * p[0] * (1.0 - 14.0 * z2_r2 + 21.0 * z4_r4),
            c4 * p[1] * (1.0 - 14.0 * z2_r2 + 21.0 * z4_r4),
            c4 * p[2] * (5.0 - 70.0 * z2_r2 / 3.0 + 21.0 * z4_r4),
        );

        a3 + a4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmic::bodies::{
        j2000, EARTH_RADIUS_KM, J2_EARTH, J3_EARTH, J4_EARTH, MU_EARTH_KM3_S2,
    };

    #[test]
    fn j2_pulls_equatorward() {
        let force = J2Gravity::new(MU_EARTH_KM3_S2, J2_EARTH, EARTH_RADIUS_KM);
        // Directly above the pole, the J2 acceleration pulls toward the equator plane.
        let state = StateVector::cartesian(0.0, 0.0, 7_000.0, 7.5, 0.0, 0.0, j2000());
        let accel = force.acceleration(&state, 500.0);
        assert!(accel[2] < 0.0);
        // On the equator it pushes outward along the radius.
        let state = StateVector::cartesian(7_000.0, 0.0, 0.0, 0.0, 7.5, 0.0, j2000());
        let accel = force.acceleration(&state, 500.0);
        assert!(accel[0] < 0.0);
        assert!(accel[2].abs() < 1e-20);
    }

    #[test]
    fn zonal_magnitude_ordering() {
        let j2 = J2Gravity::new(MU_EARTH_KM3_S2, J2_EARTH, EARTH_RADIUS_KM);
        let j34 = J3J4Gravity::new(MU_EARTH_KM3_S2, J3_EARTH, J4_EARTH, EARTH_RADIUS_KM);
        let state = StateVector::cartesian(5_000.0, 3_000.0, 3_500.0, -3.0, 6.0, 1.0, j2000());
        let a2 = j2.acceleration(&state, 500.0).norm();
        let a34 = j34.acceleration(&state, 500.0).norm();
        assert!(a2 > 100.0 * a34, "J2 {a2} should dwarf J3/J4 {a34}");
    }
}
