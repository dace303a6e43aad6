pub use super::{Derivative, Integrator};
use crate::cosmic::StateVector;

/// The explicit Euler method: `y + dt·f(y, t)`. First order, with a local
/// error of O(dt^2); useful as a baseline and for step-size experiments, not
/// for production propagation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Euler;

impl Integrator for Euler {
    fn order(&self) -> u8 {
        1
    }

    fn step(&mut self, state: &StateVector, eom: &Derivative<'_>, dt_s: f64) -> StateVector {
        let k1 = eom(0.0, state);
        state.add_scaled(&k1, dt_s).advanced_by(dt_s)
    }
}

/// The classical fourth-order Runge-Kutta method with weights 1/6, 1/3, 1/3, 1/6.
///
/// The adaptive variant estimates the local error by Richardson extrapolation:
/// one full step is compared against two half steps, the halved (twin)
/// solution is kept, and the error is |full − twin| / 15.
#[derive(Clone, Copy, Debug, Default)]
#[allow(clippy::upper_case_acronyms)]
pub struct RK4;

impl Integrator for RK4 {
    fn order(&self) -> u8 {
        4
    }

    fn step(&mut self, state: &StateVector, eom: &Derivative<'_>, dt_s: f64) -> StateVector {
        let half = dt_s / 2.0;
        let k1 = eom(0.0, state);
        let k2 = eom(half, &state.add_scaled(&k1, half));
        let k3 = eom(half, &state.add_scaled(&k2, half));
        let k4 = eom(dt_s, &state.add_scaled(&k3, dt_s));
        let weighted = (k1 + 2.0 * k2 + 2.0 * k3 + k4) * (1.0 / 6.0);
        state.add_scaled(&weighted, dt_s).advanced_by(dt_s)
    }

    fn adaptive_step(
        &mut self,
        state: &StateVector,
        eom: &Derivative<'_>,
        dt_s: f64,
    ) -> (StateVector, f64, f64) {
        let full = self.step(state, eom, dt_s);
        let mid = self.step(state, eom, dt_s / 2.0);
        let twin = self.step(&mid, eom, dt_s / 2.0);
        let error = full.error_to(&twin) / 15.0;
        (twin, dt_s, error)
    }
}
