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

//! Closed-form impulsive maneuver design: coplanar transfers, plane changes,
//! Lambert-based rendezvous, patched-conic escapes, and launch windows.

use super::kepler::propagate_kepler;
use super::lambert::{lambert, LambertConfig};
use crate::cosmic::frames::gmst_rad;
use crate::cosmic::{OrbitalElements, StateVector};
use crate::errors::AstroError;
use crate::linalg::Vector3;
use crate::time::Epoch;
use crate::utils::{between_0_2pi, clamped_asin};
use serde_derive::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Rotation speed of a launch site at the equator, in km/s.
const EARTH_EQUATORIAL_SPEED_KM_S: f64 = 0.465_1;
/// Resolution of the rendezvous departure-time scan, as a fraction of the window.
const RENDEZVOUS_SCAN_POINTS: usize = 100;
/// Resolution of the launch window scan in seconds (ten minutes).
const LAUNCH_SCAN_STEP_S: f64 = 600.0;

/// An impulsive transfer of up to three burns.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct TransferSolution {
    pub dv1_km_s: f64,
    pub dv2_km_s: f64,
    pub dv3_km_s: f64,
    pub dv_total_km_s: f64,
    pub tof_s: f64,
}

/// Circular speed at the provided radius.
fn v_circ(gm: f64, r_km: f64) -> f64 {
    (gm / r_km).sqrt()
}

/// Vis-viva speed at radius `r` on an orbit of semi-major axis `a`. The
/// argument is floored at zero for radii beyond the orbit's reach.
fn v_visviva(gm: f64, r_km: f64, sma_km: f64) -> f64 {
    (gm * (2.0 / r_km - 1.0 / sma_km)).max(0.0).sqrt()
}

/// The two-burn Hohmann transfer between circular coplanar orbits.
pub fn hohmann(r1_km: f64, r2_km: f64, gm: f64) -> TransferSolution {
    let a_transfer = (r1_km + r2_km) / 2.0;
    let dv1_km_s = (v_visviva(gm, r1_km, a_transfer) - v_circ(gm, r1_km)).abs();
    let dv2_km_s = (v_circ(gm, r2_km) - v_visviva(gm, r2_km, a_transfer)).abs();
    TransferSolution {
        dv1_km_s,
        dv2_km_s,
        dv3_km_s: 0.0,
        dv_total_km_s: dv1_km_s + dv2_km_s,
        tof_s: PI * (a_transfer.powi(3) / gm).sqrt(),
    }
}

/// The three-burn bi-elliptic transfer through an intermediate apoapsis at
/// `rb_km`. Beats Hohmann when the radius ratio is large and `rb_km` is high.
pub fn bi_elliptic(r1_km: f64, rb_km: f64, r2_km: f64, gm: f64) -> TransferSolution {
    let a1 = (r1_km + rb_km) / 2.0;
    let a2 = (rb_km + r2_km) / 2.0;
    let dv1_km_s = (v_visviva(gm, r1_km, a1) - v_circ(gm, r1_km)).abs();
    let dv2_km_s = (v_visviva(gm, rb_km, a2) - v_visviva(gm, rb_km, a1)).abs();
    let dv3_km_s = (v_circ(gm, r2_km) - v_visviva(gm, r2_km, a2)).abs();
    TransferSolution {
        dv1_km_s,
        dv2_km_s,
        dv3_km_s,
        dv_total_km_s: dv1_km_s + dv2_km_s + dv3_km_s,
        tof_s: PI * ((a1.powi(3) / gm).sqrt() + (a2.powi(3) / gm).sqrt()),
    }
}

/// The cost of rotating the orbit plane by `delta_inc_rad` at a point where
/// the speed is `v_km_s`: `2·v·sin(Δi/2)`. Cheapest at the node with the
/// lowest speed, i.e. apoapsis for an elliptic orbit.
pub fn plane_change(v_km_s: f64, delta_inc_rad: f64) -> f64 {
    2.0 * v_km_s * (delta_inc_rad / 2.0).sin().abs()
}

/// The cost of simultaneously changing speed from `v1` to `v2` and rotating
/// the plane by `delta_inc_rad`, by the law of cosines. Combining both at
/// apoapsis undercuts performing them separately.
pub fn combined_change(v1_km_s: f64, v2_km_s: f64, delta_inc_rad: f64) -> f64 {
    (v1_km_s.powi(2) + v2_km_s.powi(2)
        - 2.0 * v1_km_s * v2_km_s * delta_inc_rad.cos())
    .max(0.0)
    .sqrt()
}

/// One labeled burn of a multi-impulse plan.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Impulse {
    pub label: &'static str,
    pub dv_km_s: f64,
}

/// Plans a sequence of impulses from one orbit to another: a plane change at
/// the node when the inclinations differ, then a tangential burn at periapsis
/// for the shape change. Returns an empty plan when the orbits already agree.
pub fn multi_impulse(from: &OrbitalElements, to: &OrbitalElements) -> Vec<Impulse> {
    let mut plan = Vec::new();
    let delta_inc_rad = (to.inc_rad - from.inc_rad).abs();
    if delta_inc_rad > 1e-9 {
        // Rotate at the node, at the speed the orbit carries there; the
        // apoapsis speed is the cheap bound for a near-nodal apsis.
        let v_node = v_visviva(from.gm, from.apoapsis_km(), from.sma_km);
        plan.push(Impulse {
            label: "plane change at node",
            dv_km_s: plane_change(v_node, delta_inc_rad),
        });
    }
    let delta_sma = (to.sma_km - from.sma_km).abs();
    let delta_ecc = (to.ecc - from.ecc).abs();
    if delta_sma > 1e-6 || delta_ecc > 1e-9 {
        // Tangential burn at the current periapsis onto the target energy.
        let r_burn = from.periapsis_km();
        let v_before = v_visviva(from.gm, r_burn, from.sma_km);
        let v_after = v_visviva(to.gm, r_burn, to.sma_km);
        plan.push(Impulse {
            label: "shape change at periapsis",
            dv_km_s: (v_after - v_before).abs(),
        });
    }
    plan
}

/// Total cost of a multi-impulse plan.
pub fn multi_impulse_total(plan: &[Impulse]) -> f64 {
    plan.iter().map(|i| i.dv_km_s).sum()
}

/// A rendezvous opportunity out of the Lambert scan.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct RendezvousSolution {
    /// Time of flight of the intercept, in seconds
    pub tof_s: f64,
    /// Departure burn in km/s
    pub dv_init_km_s: Vector3<f64>,
    /// Arrival matching burn in km/s
    pub dv_final_km_s: Vector3<f64>,
    pub dv_total_km_s: f64,
}

/// Scans departure times over `[0, window_s]` at `window_s / 100` resolution,
/// propagating the target on its Keplerian orbit and solving Lambert from the
/// chaser's current position to each propagated target position. Returns the
/// cheapest feasible intercept, or None when every scan point is infeasible.
pub fn rendezvous(
    chaser: &StateVector,
    target: &OrbitalElements,
    window_s: f64,
    gm: f64,
) -> Result<Option<RendezvousSolution>, AstroError> {
    let mut best: Option<RendezvousSolution> = None;
    for i in 1..=RENDEZVOUS_SCAN_POINTS {
        let tof_s = window_s * i as f64 / RENDEZVOUS_SCAN_POINTS as f64;
        let target_then = propagate_kepler(target, tof_s)?.to_state();
        let cfg = LambertConfig {
            v_init_ref_km_s: Some(chaser.velocity_km_s),
            v_final_ref_km_s: Some(target_then.velocity_km_s),
            ..LambertConfig::prograde(chaser.radius_km, target_then.radius_km, tof_s, gm)
        };
        let sol = lambert(&cfg);
        if !sol.feasible {
            continue;
        }
        if best.map_or(true, |b| sol.dv_total_km_s < b.dv_total_km_s) {
            best = Some(RendezvousSolution {
                tof_s,
                dv_init_km_s: sol.v_init_km_s - chaser.velocity_km_s,
                dv_final_km_s: target_then.velocity_km_s - sol.v_final_km_s,
                dv_total_km_s: sol.dv_total_km_s,
            });
        }
    }
    Ok(best)
}

/// A patched-conic interplanetary transfer budget.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct PatchedConicSolution {
    /// Hyperbolic excess speed leaving the departure body, km/s
    pub v_inf_depart_km_s: f64,
    /// Hyperbolic excess speed arriving at the target body, km/s
    pub v_inf_arrive_km_s: f64,
    /// Burn from the circular parking orbit onto the escape hyperbola, km/s
    pub dv_depart_km_s: f64,
    /// Burn from the capture hyperbola into the circular parking orbit, km/s
    pub dv_arrive_km_s: f64,
    pub dv_total_km_s: f64,
    /// Heliocentric transfer time, seconds
    pub tof_s: f64,
}

/// Patched-conic budget for a Hohmann transfer between two circular
/// heliocentric orbits, escaping from and capturing into circular parking
/// orbits at each body.
///
/// The hyperbolic excess at each sphere of influence is the difference between
/// the heliocentric transfer speed and the body's circular heliocentric speed;
/// each burn converts the parking circular speed into the hyperbolic speed
/// `√(v∞² + 2μ/r_park)` at the same radius.
#[allow(clippy::too_many_arguments)]
pub fn patched_conic(
    r1_helio_km: f64,
    r2_helio_km: f64,
    r_park_depart_km: f64,
    r_park_arrive_km: f64,
    gm_depart: f64,
    gm_arrive: f64,
    gm_sun: f64,
) -> PatchedConicSolution {
    let a_transfer = (r1_helio_km + r2_helio_km) / 2.0;
    let v_inf_depart_km_s = (v_visviva(gm_sun, r1_helio_km, a_transfer)
        - v_circ(gm_sun, r1_helio_km))
    .abs();
    let v_inf_arrive_km_s = (v_circ(gm_sun, r2_helio_km)
        - v_visviva(gm_sun, r2_helio_km, a_transfer))
    .abs();

    let v_hyp_depart = (v_inf_depart_km_s.powi(2) + 2.0 * gm_depart / r_park_depart_km).sqrt();
    let v_hyp_arrive = (v_inf_arrive_km_s.powi(2) + 2.0 * gm_arrive / r_park_arrive_km).sqrt();
    let dv_depart_km_s = v_hyp_depart - v_circ(gm_depart, r_park_depart_km);
    let dv_arrive_km_s = v_hyp_arrive - v_circ(gm_arrive, r_park_arrive_km);

    PatchedConicSolution {
        v_inf_depart_km_s,
        v_inf_arrive_km_s,
        dv_depart_km_s,
        dv_arrive_km_s,
        dv_total_km_s: dv_depart_km_s + dv_arrive_km_s,
        tof_s: PI * (a_transfer.powi(3) / gm_sun).sqrt(),
    }
}

/// One scan point of a launch window search.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct LaunchWindowEntry {
    /// Seconds past the scan start
    pub offset_s: f64,
    /// Launch azimuth in radians, clockwise from north
    pub azimuth_rad: f64,
    /// Velocity the vehicle must supply after the Earth rotation credit, km/s
    pub dv_km_s: f64,
    /// Angular distance of the site from the target orbital plane, radians.
    /// Small values mark the actual windows.
    pub plane_angle_rad: f64,
}

/// Scans a sidereal day in ten-minute steps for launch opportunities from the
/// provided geodetic site into the target orbit plane.
///
/// Returns an empty vector (with a warning) when the target inclination is
/// below the site latitude and no direct injection exists.
pub fn launch_window(
    site_lat_rad: f64,
    site_lon_rad: f64,
    target: &OrbitalElements,
    start: Epoch,
) -> Vec<LaunchWindowEntry> {
    let cos_ratio = target.inc_rad.cos() / site_lat_rad.cos();
    if cos_ratio.abs() > 1.0 {
        warn!(
            "no direct launch into {:.2} deg inclination from {:.2} deg latitude",
            target.inc_rad.to_degrees(),
            site_lat_rad.to_degrees()
        );
        return Vec::new();
    }
    let azimuth_rad = clamped_asin(cos_ratio);
    let v_orb_km_s = v_circ(target.gm, target.sma_km);
    let v_earth_km_s = EARTH_EQUATORIAL_SPEED_KM_S * site_lat_rad.cos();
    let dv_km_s = (v_orb_km_s.powi(2) + v_earth_km_s.powi(2)
        - 2.0 * v_orb_km_s * v_earth_km_s * azimuth_rad.cos())
    .sqrt();

    // Target plane normal in the inertial frame.
    let normal = Vector3::new(
        target.raan_rad.sin() * target.inc_rad.sin(),
        -target.raan_rad.cos() * target.inc_rad.sin(),
        target.inc_rad.cos(),
    );

    let steps = (86_400.0 / LAUNCH_SCAN_STEP_S) as usize;
    let mut entries = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let offset_s = i as f64 * LAUNCH_SCAN_STEP_S;
        let epoch = start + offset_s * crate::time::Unit::Second;
        // Inertial direction of the site as the Earth rotates under the orbit plane.
        let lst = between_0_2pi(gmst_rad(epoch) + site_lon_rad);
        let site = Vector3::new(
            site_lat_rad.cos() * lst.cos(),
            site_lat_rad.cos() * lst.sin(),
            site_lat_rad.sin(),
        );
        let plane_angle_rad = clamped_asin(site.dot(&normal)).abs();
        entries.push(LaunchWindowEntry {
            offset_s,
            azimuth_rad,
            dv_km_s,
            plane_angle_rad,
        });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmic::bodies::{j2000, MU_EARTH_KM3_S2};

    #[test]
    fn hohmann_leo_to_geo() {
        let transfer = hohmann(6_778.0, 42_164.0, MU_EARTH_KM3_S2);
        assert!((transfer.dv1_km_s - 2.397).abs() < 5e-3, "{}", transfer.dv1_km_s);
        assert!((transfer.dv2_km_s - 1.457).abs() < 5e-3, "{}", transfer.dv2_km_s);
        assert!((transfer.dv_total_km_s - 3.854).abs() < 5e-3);
        assert!((transfer.tof_s - 19_048.0).abs() < 10.0, "{}", transfer.tof_s);
        // The identity dv_total = dv1 + dv2 holds exactly.
        assert!(
            (transfer.dv_total_km_s - (transfer.dv1_km_s + transfer.dv2_km_s)).abs() < 1e-12
        );
        // The time of flight is half the transfer orbit period.
        let a_transfer: f64 = (6_778.0 + 42_164.0) / 2.0;
        let period_s = 2.0 * PI * (a_transfer.powi(3) / MU_EARTH_KM3_S2).sqrt();
        assert!((transfer.tof_s - period_s / 2.0).abs() < 1e-12);
    }

    #[test]
    fn bi_elliptic_beats_hohmann_for_large_ratios() {
        let r1 = 7_000.0;
        let r2 = 110_000.0;
        let hoh = hohmann(r1, r2, MU_EARTH_KM3_S2);
        let bi = bi_elliptic(r1, 400_000.0, r2, MU_EARTH_KM3_S2);
        assert!(bi.dv_total_km_s < hoh.dv_total_km_s);
        assert!(bi.tof_s > hoh.tof_s);
    }

    #[test]
    fn plane_change_small_angle() {
        // For small angles the cost is ~ v * delta_i.
        let dv = plane_change(7.5, 0.01);
        assert!((dv - 7.5 * 0.01).abs() < 1e-4);
        // A 60 degree rotation costs a full orbital speed.
        let dv = plane_change(7.5, PI / 3.0);
        assert!((dv - 7.5).abs() < 1e-12);
    }

    #[test]
    fn combined_beats_sequential() {
        let v1 = 7.5;
        let v2 = 7.9;
        let di = 0.3;
        let combined = combined_change(v1, v2, di);
        let sequential = (v2 - v1).abs() + plane_change(v2, di);
        assert!(combined < sequential);
    }

    #[test]
    fn rendezvous_coplanar_phasing() {
        let gm = MU_EARTH_KM3_S2;
        // Target leads the chaser by 20 degrees on the same circular orbit.
        let chaser = StateVector::cartesian(7_000.0, 0.0, 0.0, 0.0, v_circ(gm, 7_000.0), 0.0, j2000());
        let target = OrbitalElements::new(
            7_000.0,
            1e-8,
            0.0,
            0.0,
            0.0,
            20.0_f64.to_radians(),
            j2000(),
            gm,
        );
        let period_s = target.period().in_seconds();
        let best = rendezvous(&chaser, &target, 2.0 * period_s, gm)
            .unwrap()
            .expect("a coplanar phasing intercept must exist");
        assert!(best.dv_total_km_s < 2.0, "{}", best.dv_total_km_s);
        assert!(best.tof_s > 0.0);
    }

    #[test]
    fn launch_window_ksc_to_iss() {
        let target = OrbitalElements::new(
            6_778.137,
            1e-8,
            51.6_f64.to_radians(),
            0.5,
            0.0,
            0.0,
            j2000(),
            MU_EARTH_KM3_S2,
        );
        let entries = launch_window(28.5_f64.to_radians(), -80.6_f64.to_radians(), &target, j2000());
        assert_eq!(entries.len(), 145);
        // The azimuth for 51.6 degrees from 28.5 degrees latitude is ~45 degrees.
        let azimuth = entries[0].azimuth_rad.to_degrees();
        assert!((azimuth - 45.0).abs() < 2.0, "{azimuth}");
        // The site crosses the target plane twice a day.
        let best = entries
            .iter()
            .map(|e| e.plane_angle_rad)
            .fold(f64::INFINITY, f64::min);
        assert!(best < 0.1, "closest approach to plane {best} rad");
    }

    #[test]
    fn launch_window_unreachable_inclination() {
        let target = OrbitalElements::new(
            6_778.137,
            1e-8,
            10.0_f64.to_radians(),
            0.0,
            0.0,
            0.0,
            j2000(),
            MU_EARTH_KM3_S2,
        );
        // 10 degree inclination is unreachable from 28.5 degrees latitude.
        assert!(launch_window(28.5_f64.to_radians(), -80.6, &target, j2000()).is_empty());
    }
}
