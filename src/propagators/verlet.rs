pub use super::{Derivative, Integrator};
use crate::cosmic::{StateDerivative, StateVector};
use crate::linalg::Vector3;

/// The velocity-Verlet method: the position update uses the current
/// acceleration, the velocity update the average of the old and new
/// accelerations.
///
/// Verlet is the integrator of choice for long-horizon conservative
/// propagation: it is symplectic, so the energy error stays bounded instead of
/// drifting secularly. The acceleration at the end of each step is cached and
/// reused at the start of the next one, which makes the instance "hot" between
/// calls: call [`Integrator::reset`] before reusing it on an independent
/// trajectory, and clone it rather than sharing across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct VelocityVerlet {
    prior_accel_km_s2: Option<Vector3<f64>>,
}

impl VelocityVerlet {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Integrator for VelocityVerlet {
    fn order(&self) -> u8 {
        2
    }

    fn step(&mut self, state: &StateVector, eom: &Derivative<'_>, dt_s: f64) -> StateVector {
        let accel = match self.prior_accel_km_s2 {
            Some(accel) => accel,
            // No prior acceleration on the first step: bootstrap with the
            // position-only half-step (leapfrog) form.
            None => {
                let half = dt_s / 2.0;
                let probe = state.add_scaled(&eom(0.0, state), half);
                eom(half, &probe).accel_km_s2
            }
        };

        // Drift: x1 = x + v dt + a dt^2 / 2
        let drift = StateDerivative::new(
            state.velocity_km_s + 0.5 * dt_s * accel,
            Vector3::zeros(),
        );
        let mut next = state.add_scaled(&drift, dt_s);

        // Evaluate the new acceleration at the drifted position, with a
        // predicted velocity for any velocity-dependent contribution.
        let probe = StateVector {
            velocity_km_s: state.velocity_km_s + dt_s * accel,
            ..next
        };
        let new_accel = eom(dt_s, &probe).accel_km_s2;

        // Kick: v1 = v + (a0 + a1) dt / 2
        next.velocity_km_s = state.velocity_km_s + 0.5 * dt_s * (accel + new_accel);
        self.prior_accel_km_s2 = Some(new_accel);
        next.advanced_by(dt_s)
    }

    fn reset(&mut self) {
        self.prior_accel_km_s2 = None;
    }
}
