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
use crate::cosmic::bodies::{AU_KM, EARTH_RADIUS_KM, SOLAR_FLUX_W_M2, SPEED_OF_LIGHT_M_S};
use crate::cosmic::{Body, StateVector};
use crate::linalg::Vector3;

const M_PER_KM: f64 = 1_000.0;

/// Returns the illumination of a satellite by the Sun, zero inside the
/// cylindrical umbra of the Earth and one otherwise.
///
/// The satellite is shadowed when it is on the anti-sunward side of the
/// origin and within one Earth radius of the Earth-Sun axis. Penumbra is not
/// modeled: the factor is binary.
pub fn shadow_factor(radius_km: &Vector3<f64>, sun_km: &Vector3<f64>) -> f64 {
    let sun_hat = sun_km / sun_km.norm();
    let along = radius_km.dot(&sun_hat);
    if along >= 0.0 {
        return 1.0;
    }
    let perp = (radius_km - along * sun_hat).norm();
    if perp < EARTH_RADIUS_KM {
        0.0
    } else {
        1.0
    }
}

/// Cannonball solar radiation pressure.
#[derive(Clone, Debug)]
pub struct SolarRadiationPressure {
    /// Reflectivity coefficient: the acceleration scales with (1 + cr)
    pub cr: f64,
    /// Illuminated area in m^2
    pub area_m2: f64,
    /// The Sun's ephemeris, or None when the states are heliocentric (the Sun
    /// sits at the origin and nothing casts a shadow).
    pub sun: Option<Body>,
    /// Below this area-to-mass ratio in m^2/kg, radiation pressure is negligible.
    pub min_area_to_mass: f64,
}

impl SolarRadiationPressure {
    /// Radiation pressure on a geocentric state, with the Earth's umbra.
    pub fn new(cr: f64, area_m2: f64) -> Self {
        Self {
            cr,
            area_m2,
            sun: Some(Body::sun()),
            min_area_to_mass: 1e-3,
        }
    }

    /// Radiation pressure on a heliocentric state.
    pub fn heliocentric(cr: f64, area_m2: f64) -> Self {
        Self {
            cr,
            area_m2,
            sun: None,
            min_area_to_mass: 1e-3,
        }
    }
}

impl Force for SolarRadiationPressure {
    fn name(&self) -> &'static str {
        "srp"
    }

    fn applicable(&self, _state: &StateVector) -> bool {
        true
    }

    fn acceleration(&self, state: &StateVector, mass_kg: f64) -> Vector3<f64> {
        if self.area_m2 / mass_kg < self.min_area_to_mass {
            return Vector3::zeros();
        }
        let sun = match &self.sun {
            Some(body) => body.position_km(state.epoch),
            None => Vector3::zeros(),
        };
        let shadow = if self.sun.is_some() {
            shadow_factor(&state.radius_km, &sun)
        } else {
            1.0
        };
        if shadow == 0.0 {
            return Vector3::zeros();
        }
        let sun_to_sat = state.radius_km - sun;
        let d_km = sun_to_sat.norm();
        // Flux scales with the inverse square of the true solar distance.
        let flux_w_m2 = SOLAR_FLUX_W_M2 * (AU_KM / d_km).powi(2);
        let pressure_n_m2 = flux_w_m2 / SPEED_OF_LIGHT_M_S;
        // N/kg is m/s^2; divide by M_PER_KM for km/s^2.
        let accel_km_s2 =
            (1.0 + self.cr) * pressure_n_m2 * self.area_m2 * shadow / (mass_kg * M_PER_KM);
        accel_km_s2 * (sun_to_sat / d_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmic::bodies::j2000;

    #[test]
    fn shadow_cylinder() {
        let sun = Vector3::new(AU_KM, 0.0, 0.0);
        // Sun-side: lit.
        assert_eq!(shadow_factor(&Vector3::new(7_000.0, 0.0, 0.0), &sun), 1.0);
        // Behind the Earth, on the axis: umbra.
        assert_eq!(shadow_factor(&Vector3::new(-7_000.0, 0.0, 0.0), &sun), 0.0);
        // Behind the Earth but well off-axis: lit.
        assert_eq!(
            shadow_factor(&Vector3::new(-7_000.0, 42_164.0, 0.0), &sun),
            1.0
        );
    }

    #[test]
    fn srp_magnitude_at_one_au() {
        let srp = SolarRadiationPressure::new(0.3, 20.0);
        // Pick a sunlit state far from eclipse.
        let sun = srp.sun.as_ref().unwrap().position_km(j2000());
        let sun_hat = sun / sun.norm();
        let state = StateVector::from_vectors(42_164.0 * sun_hat, Vector3::zeros(), j2000());
        let accel = srp.acceleration(&state, 1_000.0).norm();
        // (1 + 0.3) * 4.56e-6 N/m^2 * 20 m^2 / 1000 kg = 1.19e-7 m/s^2
        assert!((accel - 1.19e-10).abs() < 2e-11, "{accel} km/s^2");
    }

    #[test]
    fn heliocentric_srp_points_outward() {
        let srp = SolarRadiationPressure::heliocentric(0.3, 20.0);
        let state = StateVector::cartesian(AU_KM, 0.0, 0.0, 0.0, 29.78, 0.0, j2000());
        let accel = srp.acceleration(&state, 1_000.0);
        assert!(accel[0] > 0.0);
        assert!(accel[1].abs() < f64::EPSILON);
    }

    #[test]
    fn srp_negligible_for_dense_spacecraft() {
        let srp = SolarRadiationPressure::new(0.3, 0.5);
        let state = StateVector::cartesian(42_164.0, 0.0, 0.0, 0.0, 3.07, 0.0, j2000());
        // 0.5 m^2 over 1000 kg is below the area-to-mass gate.
        assert_eq!(srp.acceleration(&state, 1_000.0).norm(), 0.0);
    }
}
