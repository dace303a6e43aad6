use crate::test_epoch;
use astraea::cosmic::bodies::{EARTH_RADIUS_KM, J2_EARTH, MU_EARTH_KM3_S2};
use astraea::cosmic::{OrbitalElements, StateVector};
use astraea::dynamics::{CentralGravity, ForceModel, J2Gravity};
use astraea::md::ValidationTestCase;
use astraea::propagators::{
    AdaptiveStep, Integrator, KeplerianPropagator, MeanElementPropagator, NumericalPropagator,
    Propagator, TleData, VelocityVerlet, RK4,
};
use astraea::time::Unit;
use std::f64::consts::PI;

/// The LEO scenario: 400 km circular at the ISS inclination.
fn leo_circular() -> OrbitalElements {
    OrbitalElements::new(
        6_778.137,
        0.0,
        51.6 * PI / 180.0,
        0.0,
        0.0,
        0.0,
        test_epoch(),
        MU_EARTH_KM3_S2,
    )
}

#[test]
fn leo_period() {
    let period_s = leo_circular().period().in_seconds();
    assert!((period_s - 5_553.64).abs() < 0.01, "{period_s}");
}

#[test]
fn geo_period() {
    let geo = OrbitalElements::new(
        42_164.137,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        test_epoch(),
        MU_EARTH_KM3_S2,
    );
    let period_s = geo.period().in_seconds();
    assert!((period_s - 86_164.09).abs() < 1.0, "{period_s}");
}

#[test]
fn rk4_one_period_position_error() {
    let initial = leo_circular().to_state();
    let period = leo_circular().period();
    let mut numerical = NumericalPropagator::two_body(MU_EARTH_KM3_S2, 1_000.0);
    let states = numerical
        .propagate(&initial, 10.0 * Unit::Second, period)
        .unwrap();
    let final_state = states.last().unwrap();
    // One full period brings the orbit back onto its initial position to
    // better than a meter at this step size.
    let error_km = (final_state.radius_km - initial.radius_km).norm();
    assert!(error_km < 1e-3, "position error {error_km} km");
}

#[test]
fn rk4_energy_conservation_over_one_period() {
    let initial = leo_circular().to_state();
    let period = leo_circular().period();
    let e0 = initial.energy_km2_s2(MU_EARTH_KM3_S2);
    let mut numerical = NumericalPropagator::two_body(MU_EARTH_KM3_S2, 1_000.0);
    let states = numerical
        .propagate(&initial, 10.0 * Unit::Second, period)
        .unwrap();
    for state in &states {
        let drift = ((state.energy_km2_s2(MU_EARTH_KM3_S2) - e0) / e0).abs();
        assert!(drift < 1e-8, "energy drift {drift}");
    }
}

#[test]
fn verlet_energy_bounded_over_hundred_periods() {
    let initial = leo_circular().to_state();
    let period_s = leo_circular().period().in_seconds();
    let e0 = initial.energy_km2_s2(MU_EARTH_KM3_S2);
    let mut verlet = VelocityVerlet::new();
    let eom = |_: f64, s: &StateVector| {
        astraea::cosmic::StateDerivative::new(
            s.velocity_km_s,
            -MU_EARTH_KM3_S2 / s.rmag().powi(3) * s.radius_km,
        )
    };
    let states = verlet.integrate(&initial, &eom, 10.0, 100.0 * period_s);
    // Symplectic: the energy error oscillates but does not grow secularly, so
    // the drift over 100 periods stays at the single-period amplitude.
    let max_drift = states
        .iter()
        .map(|s| ((s.energy_km2_s2(MU_EARTH_KM3_S2) - e0) / e0).abs())
        .fold(0.0, f64::max);
    assert!(max_drift < 1e-4, "energy drift {max_drift}");
    // And it is not a fluke of the last sample: the final drift matches.
    let last_drift = ((states.last().unwrap().energy_km2_s2(MU_EARTH_KM3_S2) - e0) / e0).abs();
    assert!(last_drift < 1e-4);
}

#[test]
fn angular_momentum_conserved_under_zonal_gravity() {
    // J2 is axisymmetric about z, so h_z is a constant of motion.
    let elements = OrbitalElements::new(
        7_000.0,
        0.01,
        51.6 * PI / 180.0,
        0.3,
        1.0,
        0.0,
        test_epoch(),
        MU_EARTH_KM3_S2,
    );
    let initial = elements.to_state();
    let hz0 = initial.hvec()[2];
    let period = elements.period();

    let model = ForceModel::new()
        .with(CentralGravity::new(MU_EARTH_KM3_S2))
        .with(J2Gravity::new(MU_EARTH_KM3_S2, J2_EARTH, EARTH_RADIUS_KM));
    let mut rk4_prop = NumericalPropagator::new(model, Box::new(RK4), 1_000.0);
    let states = rk4_prop
        .propagate(&initial, 5.0 * Unit::Second, period)
        .unwrap();
    let drift = ((states.last().unwrap().hvec()[2] - hz0) / hz0).abs();
    assert!(drift < 1e-10, "RK4 h_z drift {drift}");

    let model = ForceModel::new()
        .with(CentralGravity::new(MU_EARTH_KM3_S2))
        .with(J2Gravity::new(MU_EARTH_KM3_S2, J2_EARTH, EARTH_RADIUS_KM));
    let mut verlet_prop = NumericalPropagator::new(model, Box::new(VelocityVerlet::new()), 1_000.0);
    let states = verlet_prop
        .propagate(&initial, 5.0 * Unit::Second, period)
        .unwrap();
    let drift = ((states.last().unwrap().hvec()[2] - hz0) / hz0).abs();
    assert!(drift < 1e-10, "Verlet h_z drift {drift}");
}

#[test]
fn adaptive_fehlberg_tracks_closed_form() {
    let elements = OrbitalElements::new(
        8_000.0,
        0.15,
        0.5,
        0.2,
        0.4,
        0.0,
        test_epoch(),
        MU_EARTH_KM3_S2,
    );
    let initial = elements.to_state();
    let duration = 3.0 * elements.period().in_seconds();

    let mut adaptive = AdaptiveStep::fehlberg45(1e-10, 0.1, 300.0);
    let eom = |_: f64, s: &StateVector| {
        astraea::cosmic::StateDerivative::new(
            s.velocity_km_s,
            -MU_EARTH_KM3_S2 / s.rmag().powi(3) * s.radius_km,
        )
    };
    let states = adaptive.integrate(&initial, &eom, 60.0, duration);
    let final_state = states.last().unwrap();

    let mut reference = KeplerianPropagator::new(MU_EARTH_KM3_S2);
    let expected = reference
        .step(&initial, duration * Unit::Second)
        .unwrap();
    let error_km = (final_state.radius_km - expected.radius_km).norm();
    assert!(error_km < 0.1, "adaptive vs closed form: {error_km} km");
    // The controller took far fewer steps than a fixed fine grid would.
    assert!(states.len() < (duration / 10.0) as usize);
}

#[test]
fn keplerian_vs_numerical_cross_check() {
    let initial = leo_circular().to_state();
    let period = leo_circular().period();
    let mut keplerian = KeplerianPropagator::new(MU_EARTH_KM3_S2);
    let mut numerical = NumericalPropagator::two_body(MU_EARTH_KM3_S2, 500.0);
    let kep = keplerian
        .propagate(&initial, 60.0 * Unit::Second, period)
        .unwrap();
    let num = numerical
        .propagate(&initial, 60.0 * Unit::Second, period)
        .unwrap();
    assert_eq!(kep.len(), num.len());
    for (k, n) in kep.iter().zip(num.iter()) {
        assert!((k.radius_km - n.radius_km).norm() < 0.05, "at {}", k.epoch);
    }
}

#[test]
fn mean_element_propagator_secular_decay() {
    // A decaying mean motion shrinks the semi-major axis sample over sample.
    let tle = TleData {
        satellite_number: 1,
        epoch_year: 2023,
        epoch_day: 1.0,
        mean_motion_dot: 1e-9,
        mean_motion_ddot: 0.0,
        bstar: 1e-4,
        inc_rad: 0.9,
        raan_rad: 0.0,
        ecc: 0.001,
        aop_rad: 0.0,
        mean_anomaly_rad: 0.0,
        mean_motion_rad_min: 15.2 * 2.0 * PI / 1_440.0,
    };
    let mut prop = MeanElementPropagator::new(tle, MU_EARTH_KM3_S2);
    let initial = prop.state_at(tle.epoch()).unwrap();
    let states = prop
        .propagate(&initial, 600.0 * Unit::Second, 30.0 * Unit::Day)
        .unwrap();
    let sma_first = OrbitalElements::from_state(&states[0], MU_EARTH_KM3_S2)
        .unwrap()
        .sma_km;
    let sma_last = OrbitalElements::from_state(states.last().unwrap(), MU_EARTH_KM3_S2)
        .unwrap()
        .sma_km;
    assert!(
        sma_last < sma_first,
        "sma should decay: {sma_first} -> {sma_last}"
    );
}

#[test]
fn validation_harness_scores_keplerian_run() {
    let elements = leo_circular();
    let initial = elements.to_state();
    let case = ValidationTestCase {
        name: "LEO one period closure".to_string(),
        initial,
        expected: initial,
        step: 60.0 * Unit::Second,
        duration: elements.period(),
        gm: MU_EARTH_KM3_S2,
    };
    let mut prop = KeplerianPropagator::new(MU_EARTH_KM3_S2);
    let result = case.run(&mut prop).unwrap();
    assert!(result.position_error_km < 1e-5, "{result}");
    assert!(result.velocity_error_km_s < 1e-8);
    assert!(result.energy_drift_rel < 1e-12);
    assert!(result.momentum_drift_rel < 1e-12);
    assert_eq!(result.samples, 94);
}
