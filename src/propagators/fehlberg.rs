pub use super::{Derivative, Integrator};
use crate::cosmic::{StateDerivative, StateVector};

/// Number of derivative evaluations per step.
const STAGES: usize = 6;

/// The a_ij coefficients of the Fehlberg 4(5) Butcher tableau, flattened
/// row by row over the lower triangle.
const A_COEFFS: [f64; 15] = [
    1.0 / 4.0,
    3.0 / 32.0,
    9.0 / 32.0,
    1932.0 / 2197.0,
    -7200.0 / 2197.0,
    7296.0 / 2197.0,
    439.0 / 216.0,
    -8.0,
    3680.0 / 513.0,
    -845.0 / 4104.0,
    -8.0 / 27.0,
    2.0,
    -3544.0 / 2565.0,
    1859.0 / 4104.0,
    -11.0 / 40.0,
];

/// The b_i weights of the fifth-order solution.
const B5_COEFFS: [f64; 6] = [
    16.0 / 135.0,
    0.0,
    6656.0 / 12825.0,
    28561.0 / 56430.0,
    -9.0 / 50.0,
    2.0 / 55.0,
];

/// The b*_i weights of the embedded fourth-order companion.
const B4_COEFFS: [f64; 6] = [
    25.0 / 216.0,
    0.0,
    1408.0 / 2565.0,
    2197.0 / 4104.0,
    -1.0 / 5.0,
    0.0,
];

/// The [Runge-Kutta-Fehlberg 4(5)](https://en.wikipedia.org/wiki/Runge%E2%80%93Kutta%E2%80%93Fehlberg_method)
/// embedded method.
///
/// Each step produces a fifth-order solution and a fourth-order companion from
/// the same six stages; the scaled difference between the two is the local
/// error estimate used by the adaptive wrapper.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fehlberg45;

impl Fehlberg45 {
    fn stages(
        state: &StateVector,
        eom: &Derivative<'_>,
        dt_s: f64,
    ) -> [StateDerivative; STAGES] {
        let mut k = [StateDerivative::zero(); STAGES];
        k[0] = eom(0.0, state);
        let mut a_idx = 0;
        for i in 0..STAGES - 1 {
            // c_i is the sum of the row's a_ij per the consistency condition.
            let mut ci = 0.0;
            let mut stage = *state;
            for kj in k.iter().take(i + 1) {
                let a_ij = A_COEFFS[a_idx];
                ci += a_ij;
                stage = stage.add_scaled(kj, a_ij * dt_s);
                a_idx += 1;
            }
            k[i + 1] = eom(ci * dt_s, &stage);
        }
        k
    }
}

impl Integrator for Fehlberg45 {
    fn order(&self) -> u8 {
        5
    }

    fn step(&mut self, state: &StateVector, eom: &Derivative<'_>, dt_s: f64) -> StateVector {
        let k = Self::stages(state, eom, dt_s);
        let mut next = *state;
        for (ki, b_i) in k.iter().zip(B5_COEFFS.iter()) {
            next = next.add_scaled(ki, b_i * dt_s);
        }
        next.advanced_by(dt_s)
    }

    fn adaptive_step(
        &mut self,
        state: &StateVector,
        eom: &Derivative<'_>,
        dt_s: f64,
    ) -> (StateVector, f64, f64) {
        let k = Self::stages(state, eom, dt_s);
        let mut fifth = *state;
        let mut fourth = *state;
        for (i, ki) in k.iter().enumerate() {
            fifth = fifth.add_scaled(ki, B5_COEFFS[i] * dt_s);
            fourth = fourth.add_scaled(ki, B4_COEFFS[i] * dt_s);
        }
        let error = fifth.error_to(&fourth);
        (fifth.advanced_by(dt_s), dt_s, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmic::bodies::{j2000, MU_EARTH_KM3_S2};
    use crate::linalg::Vector3;

    fn two_body(_: f64, state: &StateVector) -> StateDerivative {
        StateDerivative::new(
            state.velocity_km_s,
            -MU_EARTH_KM3_S2 / state.rmag().powi(3) * state.radius_km,
        )
    }

    #[test]
    fn tableau_rows_sum_to_canonical_nodes() {
        // c = [1/4, 3/8, 12/13, 1, 1/2]
        let expected = [0.25, 0.375, 12.0 / 13.0, 1.0, 0.5];
        let mut a_idx = 0;
        for (i, c) in expected.iter().enumerate() {
            let mut ci = 0.0;
            for _ in 0..=i {
                ci += A_COEFFS[a_idx];
                a_idx += 1;
            }
            assert!((ci - c).abs() < 1e-15, "row {i}");
        }
    }

    #[test]
    fn error_estimate_shrinks_with_step() {
        let mut rkf = Fehlberg45;
        let state = StateVector::from_vectors(
            Vector3::new(6_778.137, 0.0, 0.0),
            Vector3::new(0.0, 7.668_6, 0.0),
            j2000(),
        );
        let (_, _, err_60) = rkf.adaptive_step(&state, &two_body, 60.0);
        let (_, _, err_6) = rkf.adaptive_step(&state, &two_body, 6.0);
        assert!(err_6 < err_60 / 1_000.0, "{err_6} vs {err_60}");
    }
}
