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

use crate::cosmic::OrbitalElements;
use crate::linalg::Vector3;
use crate::time::Epoch;
use crate::tools::kepler::propagate_kepler;

/// Gravitational parameter of the Earth in km^3/s^2 (JGM-3)
pub const MU_EARTH_KM3_S2: f64 = 398_600.441_8;
/// Mean equatorial radius of the Earth in km
pub const EARTH_RADIUS_KM: f64 = 6_378.137;
/// First zonal harmonic of the Earth gravity field (unnormalized)
pub const J2_EARTH: f64 = 1.082_626_68e-3;
/// Second zonal harmonic of the Earth gravity field (unnormalized)
pub const J3_EARTH: f64 = -2.532_656_48e-6;
/// Third zonal harmonic of the Earth gravity field (unnormalized)
pub const J4_EARTH: f64 = -1.619_621_59e-6;
/// Rotation rate of the Earth about its spin axis in rad/s
pub const EARTH_ROTATION_RAD_S: f64 = 7.292_115_9e-5;
/// One astronomical unit in km
pub const AU_KM: f64 = 149_597_870.7;
/// Gravitational parameter of the Sun in km^3/s^2
pub const MU_SUN_KM3_S2: f64 = 1.327_124_420_18e11;
/// Gravitational parameter of the Moon in km^3/s^2
pub const MU_MOON_KM3_S2: f64 = 4_902.800_066;
/// Solar flux at one astronomical unit in W/m^2
pub const SOLAR_FLUX_W_M2: f64 = 1_367.0;
/// Speed of light in m/s
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;
/// Standard gravity in m/s^2, used for specific impulse conversions
pub const STD_GRAVITY_M_S2: f64 = 9.806_65;
/// Atmospheric density at sea level in kg/m^3
pub const SEA_LEVEL_DENSITY_KG_M3: f64 = 1.225;
/// Scale height of the exponential atmosphere model in km
pub const ATM_SCALE_HEIGHT_KM: f64 = 8.5;
/// Mean obliquity of the ecliptic at J2000 in radians
pub const OBLIQUITY_J2000_RAD: f64 = 23.439_291_1 * std::f64::consts::PI / 180.0;

/// Returns the J2000 reference epoch, 2000-01-01 12:00:00 UTC.
pub fn j2000() -> Epoch {
    Epoch::from_gregorian_utc(2000, 1, 1, 12, 0, 0, 0)
}

/// A perturbing celestial body with an analytic mean-element ephemeris.
///
/// The ephemeris is a deliberately low-precision stand-in: the body moves on
/// fixed geocentric mean elements referenced to J2000, good to a fraction of a
/// degree over a few years. This is plenty for third-body and radiation
/// pressure perturbation work, and keeps the library free of kernel files.
#[derive(Clone, Debug)]
pub struct Body {
    pub name: &'static str,
    pub gm_km3_s2: f64,
    elements: OrbitalElements,
}

impl Body {
    /// The Sun on its geocentric mean orbit (equatorial frame, the ecliptic
    /// obliquity folded into the inclination).
    pub fn sun() -> Self {
        let elements = OrbitalElements::new(
            1.000_001_018 * AU_KM,
            0.016_708_6,
            OBLIQUITY_J2000_RAD,
            0.0,
            282.940_4_f64.to_radians(),
            // Seed the true anomaly with the J2000 mean anomaly: at e ~= 0.017
            // the equation of center is folded into the ephemeris error budget.
            357.529_1_f64.to_radians(),
            j2000(),
            MU_SUN_KM3_S2,
        );
        Self {
            name: "Sun",
            gm_km3_s2: MU_SUN_KM3_S2,
            elements,
        }
    }

    /// The Moon on geocentric mean elements, folded onto the equator at the
    /// mean lunar standstill.
    pub fn moon() -> Self {
        let elements = OrbitalElements::new(
            384_400.0,
            0.054_9,
            28.58_f64.to_radians(),
            0.0,
            318.151_5_f64.to_radians(),
            135.275_3_f64.to_radians(),
            j2000(),
            MU_EARTH_KM3_S2 + MU_MOON_KM3_S2,
        );
        Self {
            name: "Moon",
            gm_km3_s2: MU_MOON_KM3_S2,
            elements,
        }
    }

    /// A body on caller-provided mean elements.
    pub fn from_elements(name: &'static str, gm_km3_s2: f64, elements: OrbitalElements) -> Self {
        Self {
            name,
            gm_km3_s2,
            elements,
        }
    }

    /// Returns the geocentric position of this body at the provided epoch, in km.
    pub fn position_km(&self, epoch: Epoch) -> Vector3<f64> {
        let dt_s = (epoch - self.elements.epoch).in_seconds();
        match propagate_kepler(&self.elements, dt_s) {
            Ok(osc) => osc.to_state().radius_km,
            Err(e) => {
                error!("ephemeris propagation failed for {}: {}", self.name, e);
                self.elements.to_state().radius_km
            }
        }
    }
}
