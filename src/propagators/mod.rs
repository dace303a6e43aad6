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

//! The integrator family and the orbit propagators built on top of it.
//!
//! An [`Integrator`] advances a state through a pure derivative callback; a
//! [`Propagator`] knows where the derivative comes from (closed-form Kepler,
//! a force model, mean elements) and produces whole trajectories.

use crate::cosmic::{StateDerivative, StateVector};
use crate::errors::AstroError;
use crate::linalg::Vector3;
use crate::time::Duration;
use std::fmt;

mod rk;
pub use self::rk::{Euler, RK4};
mod fehlberg;
pub use self::fehlberg::Fehlberg45;
mod verlet;
pub use self::verlet::VelocityVerlet;
mod adaptive;
pub use self::adaptive::AdaptiveStep;

mod keplerian;
pub use self::keplerian::KeplerianPropagator;
mod numerical;
pub use self::numerical::NumericalPropagator;
mod mean_element;
pub use self::mean_element::{MeanElementPropagator, TleData};
mod analytical;
pub use self::analytical::{AnalyticalPropagator, PerturbationMode};

/// The equations of motion: a pure function of the time offset in seconds past
/// the state's epoch and the osculating state, returning the state derivative.
pub type Derivative<'a> = dyn Fn(f64, &StateVector) -> StateDerivative + 'a;

/// Stores the details of the previous integration step of a given integrator.
#[derive(Copy, Clone, Debug, Default)]
pub struct IntegrationDetails {
    /// step size used, in seconds
    pub step_s: f64,
    /// error in the previous integration step
    pub error: f64,
    /// number of attempts needed by an adaptive step size to be within the tolerance
    pub attempts: u8,
}

impl fmt::Display for IntegrationDetails {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "IntegrationDetails {{step: {} s, error: {:.3e}, attempts: {}}}",
            self.step_s, self.error, self.attempts
        )
    }
}

/// An ordinary differential equation integrator over [`StateVector`]s.
///
/// `step` is pure apart from the velocity-Verlet acceleration cache, which is
/// why it takes `&mut self`; call [`Integrator::reset`] between independent
/// runs and clone the integrator instead of sharing it across threads.
pub trait Integrator {
    /// The order of this integrator, used by the adaptive wrapper to scale steps.
    fn order(&self) -> u8;

    /// Advances the state by exactly `dt_s` seconds, including its epoch.
    fn step(&mut self, state: &StateVector, eom: &Derivative<'_>, dt_s: f64) -> StateVector;

    /// Advances the state by `dt_s` seconds and estimates the local error.
    ///
    /// Returns the new state, a suggested next step size in seconds, and the
    /// scaled error estimate. Integrators without an embedded error estimate
    /// report a zero error, which an adaptive wrapper treats as always accepted.
    fn adaptive_step(
        &mut self,
        state: &StateVector,
        eom: &Derivative<'_>,
        dt_s: f64,
    ) -> (StateVector, f64, f64) {
        (self.step(state, eom, dt_s), dt_s, 0.0)
    }

    /// Clears any cached per-run data. A no-op for stateless integrators.
    fn reset(&mut self) {}

    /// Integrates from the initial state for `duration_s` seconds at a nominal
    /// step of `dt_s`, returning every sample including the initial state.
    ///
    /// The final step is clamped so the total integrated time is exactly
    /// `duration_s`, hence `ceil(duration/dt) + 1` samples.
    fn integrate(
        &mut self,
        initial: &StateVector,
        eom: &Derivative<'_>,
        dt_s: f64,
        duration_s: f64,
    ) -> Vec<StateVector> {
        self.reset();
        let num_steps = (duration_s / dt_s).ceil().max(0.0) as usize;
        let mut states = Vec::with_capacity(num_steps + 1);
        states.push(*initial);
        let mut state = *initial;
        let mut elapsed_s = 0.0;
        for i in 0..num_steps {
            // The last step is clamped so the total integrated time is exact.
            let dt = if i + 1 == num_steps {
                duration_s - elapsed_s
            } else {
                dt_s
            };
            state = self.step(&state, eom, dt);
            elapsed_s += dt;
            states.push(state);
        }
        states
    }
}

/// An orbit propagator: produces trajectories from an initial state.
pub trait Propagator {
    /// Propagates the initial state for the provided duration, sampling every
    /// `step`, and returns the full sample sequence including the initial state.
    fn propagate(
        &mut self,
        initial: &StateVector,
        step: Duration,
        duration: Duration,
    ) -> Result<Vec<StateVector>, AstroError>;

    /// Advances the state by one step.
    fn step(&mut self, state: &StateVector, step: Duration) -> Result<StateVector, AstroError>;

    /// The acceleration this propagator models at the provided state, in km/s^2.
    fn acceleration(&self, state: &StateVector) -> Vector3<f64>;
}
