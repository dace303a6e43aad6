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

//! Trajectory event detection. An event is a zero crossing of a signed scalar
//! of the state; detectors only look at the sampled history, refining each
//! bracketing pair of samples by secant interpolation.

use crate::cosmic::{Body, StateVector};
use crate::dynamics::solarpressure::shadow_factor;
use crate::time::{Epoch, Unit};
use std::fmt;

/// A trait to specify how a specific event must be evaluated.
pub trait EventEvaluator: fmt::Display {
    /// Evaluation of the event: a signed value crossing zero at the event.
    fn eval(&self, state: &StateVector) -> f64;

    /// Whether the event happened between the two provided states. The
    /// default detects any sign change; directional events override this.
    fn eval_crossing(&self, prev: &StateVector, next: &StateVector) -> bool {
        self.eval(prev) * self.eval(next) < 0.0
    }
}

/// Periapsis passage: the radial velocity crosses zero from negative
/// (falling) to positive (climbing).
#[derive(Clone, Copy, Debug, Default)]
pub struct PeriapsisEvent;

impl fmt::Display for PeriapsisEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "periapsis")
    }
}

impl EventEvaluator for PeriapsisEvent {
    fn eval(&self, state: &StateVector) -> f64 {
        state.radial_velocity_km_s()
    }

    fn eval_crossing(&self, prev: &StateVector, next: &StateVector) -> bool {
        self.eval(prev) < 0.0 && self.eval(next) > 0.0
    }
}

/// Apoapsis passage: the radial velocity crosses zero from positive to negative.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApoapsisEvent;

impl fmt::Display for ApoapsisEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "apoapsis")
    }
}

impl EventEvaluator for ApoapsisEvent {
    fn eval(&self, state: &StateVector) -> f64 {
        state.radial_velocity_km_s()
    }

    fn eval_crossing(&self, prev: &StateVector, next: &StateVector) -> bool {
        self.eval(prev) > 0.0 && self.eval(next) < 0.0
    }
}

/// Ascending node: the out-of-plane position crosses zero going north.
#[derive(Clone, Copy, Debug, Default)]
pub struct AscendingNodeEvent;

impl fmt::Display for AscendingNodeEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ascending node")
    }
}

impl EventEvaluator for AscendingNodeEvent {
    fn eval(&self, state: &StateVector) -> f64 {
        state.radius_km[2]
    }

    fn eval_crossing(&self, prev: &StateVector, next: &StateVector) -> bool {
        self.eval(prev) < 0.0 && self.eval(next) > 0.0
    }
}

/// Descending node: the out-of-plane position crosses zero going south.
#[derive(Clone, Copy, Debug, Default)]
pub struct DescendingNodeEvent;

impl fmt::Display for DescendingNodeEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "descending node")
    }
}

impl EventEvaluator for DescendingNodeEvent {
    fn eval(&self, state: &StateVector) -> f64 {
        state.radius_km[2]
    }

    fn eval_crossing(&self, prev: &StateVector, next: &StateVector) -> bool {
        self.eval(prev) > 0.0 && self.eval(next) < 0.0
    }
}

/// Umbra entry or exit: the shadow factor, offset so that the lit side is
/// +0.5 and the shadowed side -0.5.
#[derive(Clone, Debug)]
pub struct EclipseEvent {
    pub sun: Body,
}

impl Default for EclipseEvent {
    fn default() -> Self {
        Self { sun: Body::sun() }
    }
}

impl fmt::Display for EclipseEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "eclipse")
    }
}

impl EventEvaluator for EclipseEvent {
    fn eval(&self, state: &StateVector) -> f64 {
        shadow_factor(&state.radius_km, &self.sun.position_km(state.epoch)) - 0.5
    }
}

/// A refined event: the interpolated epoch and state at the crossing, and the
/// event value there (zero up to the interpolation error).
#[derive(Clone, Copy, Debug)]
pub struct EventDetails {
    pub epoch: Epoch,
    pub state: StateVector,
    pub value: f64,
}

impl fmt::Display for EventDetails {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "event at {} (value {:.3e})", self.epoch, self.value)
    }
}

/// Linear interpolation of the state history at `tau` in [0, 1] between two samples.
fn lerp_state(prev: &StateVector, next: &StateVector, tau: f64) -> StateVector {
    let dt_s = (next.epoch - prev.epoch).in_seconds();
    StateVector {
        radius_km: prev.radius_km + tau * (next.radius_km - prev.radius_km),
        velocity_km_s: prev.velocity_km_s + tau * (next.velocity_km_s - prev.velocity_km_s),
        epoch: prev.epoch + tau * dt_s * Unit::Second,
    }
}

/// Scans a state history for crossings of the provided event, refining each
/// bracketing sample pair by the secant rule on the event value.
pub fn find_events<E: EventEvaluator + ?Sized>(
    states: &[StateVector],
    event: &E,
) -> Vec<EventDetails> {
    let mut found = Vec::new();
    for pair in states.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if !event.eval_crossing(prev, next) {
            continue;
        }
        let g_prev = event.eval(prev);
        let g_next = event.eval(next);
        // Secant zero of g between the two samples.
        let tau = if (g_next - g_prev).abs() < f64::EPSILON {
            0.5
        } else {
            (-g_prev / (g_next - g_prev)).clamp(0.0, 1.0)
        };
        let state = lerp_state(prev, next, tau);
        found.push(EventDetails {
            epoch: state.epoch,
            state,
            value: event.eval(&state),
        });
    }
    if found.is_empty() {
        info!("no {} crossing in {} samples", event, states.len());
    }
    found
}
