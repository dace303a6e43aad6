pub use super::{Derivative, IntegrationDetails, Integrator};
use super::Fehlberg45;
use crate::cosmic::StateVector;

/// Step acceptance exponent: accepted steps grow with (tol/err)^(1/5).
const GROW_EXPONENT: f64 = 0.2;
/// Step rejection exponent: rejected steps shrink with (tol/err)^(1/4).
const SHRINK_EXPONENT: f64 = 0.25;
/// A single adaptation may not change the step by more than these factors.
const MAX_SHRINK: f64 = 0.1;
const MAX_GROW: f64 = 5.0;
/// Attempts before the controller gives up and accepts the minimum step.
const MAX_ATTEMPTS: u8 = 10;

/// A step-size controller wrapping any [`Integrator`].
///
/// A step is accepted when the wrapped integrator's error estimate is at or
/// below the tolerance. The next step scales with the classic
/// `safety · (tol/err)^exponent` law, the relative change clamped to
/// [0.1, 5.0] and the absolute step to [min_step, max_step]. After repeated
/// rejections the step is halved, and once the floor is reached the step is
/// accepted regardless, under a warning.
#[derive(Clone, Debug)]
pub struct AdaptiveStep<I: Integrator> {
    inner: I,
    pub tolerance: f64,
    pub min_step_s: f64,
    pub max_step_s: f64,
    pub safety: f64,
    /// Details of the latest accepted step.
    pub details: IntegrationDetails,
    /// Step size and error estimate of every step accepted by the last
    /// [`Integrator::integrate`] run, parallel to its returned states.
    pub step_history: Vec<(f64, f64)>,
}

impl<I: Integrator> AdaptiveStep<I> {
    /// Wraps the provided integrator with the generic safety factor of 0.9.
    pub fn new(inner: I, tolerance: f64, min_step_s: f64, max_step_s: f64) -> Self {
        Self {
            inner,
            tolerance,
            min_step_s,
            max_step_s,
            safety: 0.9,
            details: IntegrationDetails::default(),
            step_history: Vec::new(),
        }
    }

    /// Attempts one step of nominally `dt_s` seconds. Returns the accepted
    /// state, the suggested next step size, and the error of the accepted step.
    pub fn try_step(
        &mut self,
        state: &StateVector,
        eom: &Derivative<'_>,
        dt_s: f64,
    ) -> (StateVector, f64, f64) {
        let mut step_s = dt_s.clamp(self.min_step_s, self.max_step_s).min(dt_s);
        let mut attempts = 1_u8;
        loop {
            let (candidate, _, error) = self.inner.adaptive_step(state, eom, step_s);
            if error <= self.tolerance {
                let factor = if error > 0.0 {
                    (self.safety * (self.tolerance / error).powf(GROW_EXPONENT)).min(MAX_GROW)
                } else {
                    MAX_GROW
                };
                let next = (step_s * factor).clamp(self.min_step_s, self.max_step_s);
                self.details = IntegrationDetails {
                    step_s,
                    error,
                    attempts,
                };
                return (candidate, next, error);
            }

            if step_s <= self.min_step_s || attempts >= MAX_ATTEMPTS {
                warn!(
                    "adaptive step at its floor of {} s after {} attempts with error {:.3e} > tolerance {:.3e}: accepting anyway",
                    step_s, attempts, error, self.tolerance
                );
                self.details = IntegrationDetails {
                    step_s,
                    error,
                    attempts,
                };
                return (candidate, self.min_step_s, error);
            }

            // First rejection shrinks by the error-controller law, further
            // rejections halve the step.
            let proposed = if attempts == 1 {
                self.safety * step_s * (self.tolerance / error).powf(SHRINK_EXPONENT)
            } else {
                step_s / 2.0
            };
            step_s = proposed.max(step_s * MAX_SHRINK).max(self.min_step_s);
            attempts += 1;
        }
    }
}

impl AdaptiveStep<Fehlberg45> {
    /// An adaptive Fehlberg 4(5), with the sharper safety factor of 0.84 its
    /// embedded error estimate supports.
    pub fn fehlberg45(tolerance: f64, min_step_s: f64, max_step_s: f64) -> Self {
        let mut ctrl = Self::new(Fehlberg45, tolerance, min_step_s, max_step_s);
        ctrl.safety = 0.84;
        ctrl
    }
}

impl<I: Integrator> Integrator for AdaptiveStep<I> {
    fn order(&self) -> u8 {
        self.inner.order()
    }

    fn step(&mut self, state: &StateVector, eom: &Derivative<'_>, dt_s: f64) -> StateVector {
        self.try_step(state, eom, dt_s).0
    }

    fn adaptive_step(
        &mut self,
        state: &StateVector,
        eom: &Derivative<'_>,
        dt_s: f64,
    ) -> (StateVector, f64, f64) {
        self.try_step(state, eom, dt_s)
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.details = IntegrationDetails::default();
        self.step_history.clear();
    }

    /// Variable-step driver: `dt_s` seeds the first step, each accepted step
    /// suggests the next, and the last step is clamped to land exactly on the
    /// requested duration.
    fn integrate(
        &mut self,
        initial: &StateVector,
        eom: &Derivative<'_>,
        dt_s: f64,
        duration_s: f64,
    ) -> Vec<StateVector> {
        self.reset();
        let mut states = vec![*initial];
        let mut state = *initial;
        let mut elapsed_s = 0.0;
        let mut dt = dt_s;
        while elapsed_s < duration_s {
            let remaining = duration_s - elapsed_s;
            if remaining <= self.min_step_s {
                // Close out with one fixed step, no adaptation on a sliver.
                state = self.inner.step(&state, eom, remaining);
                states.push(state);
                self.step_history.push((remaining, 0.0));
                break;
            }
            let attempt = dt.min(remaining);
            let (next, next_dt, error) = self.try_step(&state, eom, attempt);
            elapsed_s += self.details.step_s;
            state = next;
            states.push(state);
            self.step_history.push((self.details.step_s, error));
            dt = next_dt;
        }
        states
    }
}
