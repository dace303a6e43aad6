use super::Propagator;
use crate::cosmic::{OrbitalElements, StateVector};
use crate::errors::AstroError;
use crate::linalg::Vector3;
use crate::time::Duration;
use crate::tools::kepler::propagate_kepler;

/// Closed-form two-body propagation: state to elements, mean anomaly advanced
/// by `n·Δt`, Kepler's equation solved, elements back to state.
///
/// Exact for unperturbed motion at any step size; every sample is computed
/// from the initial elements so no error accumulates along the trajectory.
#[derive(Clone, Copy, Debug)]
pub struct KeplerianPropagator {
    pub gm: f64,
}

impl KeplerianPropagator {
    pub fn new(gm: f64) -> Self {
        Self { gm }
    }
}

impl Propagator for KeplerianPropagator {
    fn propagate(
        &mut self,
        initial: &StateVector,
        step: Duration,
        duration: Duration,
    ) -> Result<Vec<StateVector>, AstroError> {
        let elements = OrbitalElements::from_state(initial, self.gm)?;
        let dt_s = step.in_seconds();
        let duration_s = duration.in_seconds();
        let num_steps = (duration_s / dt_s).ceil().max(0.0) as usize;
        let mut states = Vec::with_capacity(num_steps + 1);
        states.push(*initial);
        for i in 1..=num_steps {
            let t_s = (i as f64 * dt_s).min(duration_s);
            states.push(propagate_kepler(&elements, t_s)?.to_state());
        }
        Ok(states)
    }

    fn step(&mut self, state: &StateVector, step: Duration) -> Result<StateVector, AstroError> {
        let elements = OrbitalElements::from_state(state, self.gm)?;
        Ok(propagate_kepler(&elements, step.in_seconds())?.to_state())
    }

    fn acceleration(&self, state: &StateVector) -> Vector3<f64> {
        -self.gm / state.rmag().powi(3) * state.radius_km
    }
}
