use super::{Integrator, Propagator, RK4};
use crate::cosmic::{StateDerivative, StateVector};
use crate::dynamics::{CentralGravity, ForceModel};
use crate::errors::AstroError;
use crate::linalg::Vector3;
use crate::time::{Duration, Unit};

/// Force-driven propagation: the owned integrator drives `ẏ = (v, a(p, v, t))`
/// where the acceleration aggregates every enabled, applicable force.
pub struct NumericalPropagator {
    pub force_model: ForceModel,
    pub integrator: Box<dyn Integrator>,
    /// Spacecraft mass in kg, consumed by the mass-dependent forces.
    pub mass_kg: f64,
}

impl NumericalPropagator {
    pub fn new(force_model: ForceModel, integrator: Box<dyn Integrator>, mass_kg: f64) -> Self {
        Self {
            force_model,
            integrator,
            mass_kg,
        }
    }

    /// Point-mass gravity only, integrated with RK4. The workhorse setup for
    /// validation against the closed-form propagator.
    pub fn two_body(gm: f64, mass_kg: f64) -> Self {
        Self::new(
            ForceModel::new().with(CentralGravity::new(gm)),
            Box::new(RK4),
            mass_kg,
        )
    }

    fn check_finite(state: &StateVector) -> Result<(), AstroError> {
        if state.is_finite() {
            Ok(())
        } else {
            Err(AstroError::StateNotFinite(format!(
                "at epoch {}",
                state.epoch
            )))
        }
    }
}

impl Propagator for NumericalPropagator {
    fn propagate(
        &mut self,
        initial: &StateVector,
        step: Duration,
        duration: Duration,
    ) -> Result<Vec<StateVector>, AstroError> {
        Self::check_finite(initial)?;
        let force_model = &self.force_model;
        let mass_kg = self.mass_kg;
        let eom = move |dt_s: f64, state: &StateVector| -> StateDerivative {
            // Integrator stages keep the step-start epoch; shift it so the
            // time-dependent forces see the stage time.
            let stage = StateVector {
                epoch: state.epoch + dt_s * Unit::Second,
                ..*state
            };
            StateDerivative::new(
                state.velocity_km_s,
                force_model.total_acceleration(&stage, mass_kg),
            )
        };
        let states =
            self.integrator
                .integrate(initial, &eom, step.in_seconds(), duration.in_seconds());
        Self::check_finite(states.last().unwrap_or(initial))?;
        Ok(states)
    }

    fn step(&mut self, state: &StateVector, step: Duration) -> Result<StateVector, AstroError> {
        Self::check_finite(state)?;
        let force_model = &self.force_model;
        let mass_kg = self.mass_kg;
        let eom = move |dt_s: f64, state: &StateVector| -> StateDerivative {
            let stage = StateVector {
                epoch: state.epoch + dt_s * Unit::Second,
                ..*state
            };
            StateDerivative::new(
                state.velocity_km_s,
                force_model.total_acceleration(&stage, mass_kg),
            )
        };
        let next = self.integrator.step(state, &eom, step.in_seconds());
        Self::check_finite(&next)?;
        Ok(next)
    }

    fn acceleration(&self, state: &StateVector) -> Vector3<f64> {
        self.force_model.total_acceleration(state, self.mass_kg)
    }
}
