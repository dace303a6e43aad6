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

//! Reference frame services: Earth rotation, Earth-fixed and topocentric
//! transformations, orbital-plane triads, and the J2000 precession model.
//!
//! The inertial frame is the mean equator and equinox of J2000; the
//! Earth-fixed transformation is a plain GMST rotation, which is consistent
//! with the accuracy class of the analytic ephemerides used elsewhere.

use crate::cosmic::StateVector;
use crate::linalg::{Matrix3, Vector3};
use crate::time::Epoch;
use crate::utils::{between_0_2pi, clamped_asin, r2, r3};
use std::f64::consts::PI;

/// WGS84 semi-major axis of the Earth ellipsoid in km
pub const WGS84_SEMI_MAJOR_AXIS_KM: f64 = 6_378.137;
/// WGS84 flattening of the Earth ellipsoid
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;
/// Iteration cap of the geodetic latitude fixed point
const GEODETIC_MAX_ITER: usize = 5;

/// Returns the Greenwich Mean Sidereal Time in radians at the provided epoch,
/// from the IAU-1982 polynomial in Julian centuries of UT1 since J2000.
pub fn gmst_rad(epoch: Epoch) -> f64 {
    let t = (epoch.as_jde_utc_days() - 2_451_545.0) / 36_525.0;
    let theta_s = 67_310.548_41
        + (876_600.0 * 3_600.0 + 8_640_184.812_866) * t
        + 0.093_104 * t.powi(2)
        - 6.2e-6 * t.powi(3);
    // Seconds of time to radians: 240 seconds per degree.
    between_0_2pi((theta_s % 86_400.0) / 240.0 * PI / 180.0)
}

/// Direction cosine matrix rotating inertial coordinates into Earth-fixed ones.
pub fn dcm_eci_to_ecef(epoch: Epoch) -> Matrix3<f64> {
    r3(gmst_rad(epoch))
}

/// Direction cosine matrix rotating Earth-fixed coordinates into inertial ones.
pub fn dcm_ecef_to_eci(epoch: Epoch) -> Matrix3<f64> {
    r3(gmst_rad(epoch)).transpose()
}

/// Rotates an inertial position into the Earth-fixed frame.
pub fn eci_to_ecef(radius_km: &Vector3<f64>, epoch: Epoch) -> Vector3<f64> {
    dcm_eci_to_ecef(epoch) * radius_km
}

/// Rotates an Earth-fixed position into the inertial frame.
pub fn ecef_to_eci(radius_km: &Vector3<f64>, epoch: Epoch) -> Vector3<f64> {
    dcm_ecef_to_eci(epoch) * radius_km
}

/// Converts a geodetic latitude (rad), longitude (rad), and height above the
/// WGS84 ellipsoid (km) into an Earth-fixed position in km.
pub fn geodetic_to_ecef(lat_rad: f64, lon_rad: f64, height_km: f64) -> Vector3<f64> {
    let e2 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();
    let n = WGS84_SEMI_MAJOR_AXIS_KM / (1.0 - e2 * sin_lat.powi(2)).sqrt();
    Vector3::new(
        (n + height_km) * cos_lat * cos_lon,
        (n + height_km) * cos_lat * sin_lon,
        (n * (1.0 - e2) + height_km) * sin_lat,
    )
}

/// Converts an Earth-fixed position into geodetic latitude (rad), longitude
/// (rad), and height above the WGS84 ellipsoid (km), via the Bowring-style
/// fixed point `φ = atan2(z, p(1 − e²·N/(N+h)))`.
pub fn ecef_to_geodetic(radius_km: &Vector3<f64>) -> (f64, f64, f64) {
    let e2 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);
    let x = radius_km[0];
    let y = radius_km[1];
    let z = radius_km[2];
    let lon = y.atan2(x);
    let p = (x.powi(2) + y.powi(2)).sqrt();

    if p < 1e-12 {
        // On the polar axis the longitude is arbitrary.
        let b = WGS84_SEMI_MAJOR_AXIS_KM * (1.0 - WGS84_FLATTENING);
        return (z.signum() * PI / 2.0, 0.0, z.abs() - b);
    }

    let mut lat = z.atan2(p * (1.0 - e2));
    let mut height = 0.0;
    for _ in 0..GEODETIC_MAX_ITER {
        let n = WGS84_SEMI_MAJOR_AXIS_KM / (1.0 - e2 * lat.sin().powi(2)).sqrt();
        height = p / lat.cos() - n;
        lat = z.atan2(p * (1.0 - e2 * n / (n + height)));
    }
    (lat, lon, height)
}

/// Direction cosine matrix from Earth-fixed coordinates to the local
/// east-north-up frame of an observer at the provided geodetic coordinates.
pub fn dcm_ecef_to_enu(lat_rad: f64, lon_rad: f64) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();
    Matrix3::new(
        -sin_lon,
        cos_lon,
        0.0,
        -sin_lat * cos_lon,
        -sin_lat * sin_lon,
        cos_lat,
        cos_lat * cos_lon,
        cos_lat * sin_lon,
        sin_lat,
    )
}

/// Expresses the Earth-fixed vector from an observer to a target in the
/// observer's east-north-up frame. Observer given as geodetic (rad, rad, km).
pub fn ecef_to_enu(
    observer_geodetic: (f64, f64, f64),
    target_ecef_km: &Vector3<f64>,
) -> Vector3<f64> {
    let (lat, lon, height) = observer_geodetic;
    let observer = geodetic_to_ecef(lat, lon, height);
    dcm_ecef_to_enu(lat, lon) * (target_ecef_km - observer)
}

/// Computes the azimuth (rad, clockwise from north), elevation (rad), and
/// range (km) of an inertial target as seen from a geodetic observer.
pub fn azimuth_elevation(
    observer_geodetic: (f64, f64, f64),
    target_eci_km: &Vector3<f64>,
    epoch: Epoch,
) -> (f64, f64, f64) {
    let target_ecef = eci_to_ecef(target_eci_km, epoch);
    let enu = ecef_to_enu(observer_geodetic, &target_ecef);
    let range = enu.norm();
    let azimuth = between_0_2pi(enu[0].atan2(enu[1]));
    let elevation = clamped_asin(enu[2] / range);
    (azimuth, elevation, range)
}

/// Converts a Cartesian vector to spherical coordinates: magnitude, right
/// ascension in [0, 2π), and declination in [-π/2, π/2].
pub fn cartesian_to_spherical(v: &Vector3<f64>) -> (f64, f64, f64) {
    let rmag = v.norm();
    (
        rmag,
        between_0_2pi(v[1].atan2(v[0])),
        clamped_asin(v[2] / rmag),
    )
}

/// Converts spherical coordinates (magnitude, right ascension, declination)
/// back to a Cartesian vector.
pub fn spherical_to_cartesian(rmag: f64, ra_rad: f64, dec_rad: f64) -> Vector3<f64> {
    let (sin_dec, cos_dec) = dec_rad.sin_cos();
    let (sin_ra, cos_ra) = ra_rad.sin_cos();
    Vector3::new(
        rmag * cos_dec * cos_ra,
        rmag * cos_dec * sin_ra,
        rmag * sin_dec,
    )
}

/// Great-circle distance in km between two geodetic points on the mean Earth
/// sphere, by the haversine formula.
pub fn geodetic_haversine(lat1_rad: f64, lon1_rad: f64, lat2_rad: f64, lon2_rad: f64) -> f64 {
    let half_dlat = (lat2_rad - lat1_rad) / 2.0;
    let half_dlon = (lon2_rad - lon1_rad) / 2.0;
    let a = half_dlat.sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * half_dlon.sin().powi(2);
    2.0 * WGS84_SEMI_MAJOR_AXIS_KM * a.sqrt().clamp(-1.0, 1.0).asin()
}

/// Returns the geodetic latitude and longitude (rad) directly beneath the
/// provided inertial state.
pub fn subsatellite_point(state: &StateVector) -> (f64, f64) {
    let ecef = eci_to_ecef(&state.radius_km, state.epoch);
    let (lat, lon, _) = ecef_to_geodetic(&ecef);
    (lat, lon)
}

/// Computes the ground track of a trajectory as geodetic (lat, lon) pairs in radians.
pub fn ground_track(states: &[StateVector]) -> Vec<(f64, f64)> {
    states.iter().map(subsatellite_point).collect()
}

/// Returns the radial / along-track / cross-track triad of the provided state
/// as the rows of a DCM rotating inertial vectors into the RSW frame.
///
/// Radial is the position direction, cross-track the momentum direction, and
/// along-track completes the right-handed set.
pub fn rsw_triad(state: &StateVector) -> Matrix3<f64> {
    let radial = state.r_hat();
    let cross = state.hvec() / state.hmag();
    let along = cross.cross(&radial);
    Matrix3::from_rows(&[radial.transpose(), along.transpose(), cross.transpose()])
}

/// Returns the local-vertical local-horizontal triad of the provided state.
///
/// This library uses the radial / along-track / cross-track triad for both
/// the RSW and LVLH conventions.
pub fn lvlh_triad(state: &StateVector) -> Matrix3<f64> {
    rsw_triad(state)
}

/// Precession matrix from the J2000 mean equator and equinox to the mean
/// equator and equinox of date, from the Lieske 1977 ζ, z, θ polynomials.
pub fn dcm_j2000_to_mod(epoch: Epoch) -> Matrix3<f64> {
    let t = (epoch.as_jde_utc_days() - 2_451_545.0) / 36_525.0;
    let arcsec = PI / (180.0 * 3_600.0);
    let zeta = (2_306.218_1 * t + 0.301_88 * t.powi(2) + 0.017_998 * t.powi(3)) * arcsec;
    let z = (2_306.218_1 * t + 1.094_68 * t.powi(2) + 0.018_203 * t.powi(3)) * arcsec;
    let theta = (2_004.310_9 * t - 0.426_65 * t.powi(2) - 0.041_833 * t.powi(3)) * arcsec;
    r3(-z) * r2(theta) * r3(-zeta)
}

/// Precession matrix from the mean equator and equinox of date back to J2000.
pub fn dcm_mod_to_j2000(epoch: Epoch) -> Matrix3<f64> {
    dcm_j2000_to_mod(epoch).transpose()
}
