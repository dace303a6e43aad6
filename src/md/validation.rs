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

//! A small harness to score a propagator against a reference state: run the
//! case, compare the final state, and report the conservation metrics.

use crate::cosmic::StateVector;
use crate::errors::AstroError;
use crate::propagators::Propagator;
use crate::time::Duration;
use std::fmt;

/// One validation scenario: an initial state, the expected state after
/// `duration`, and the sampling step to run at.
#[derive(Clone, Debug)]
pub struct ValidationTestCase {
    pub name: String,
    pub initial: StateVector,
    pub expected: StateVector,
    pub step: Duration,
    pub duration: Duration,
    /// Gravitational parameter used for the energy and momentum metrics.
    pub gm: f64,
}

/// The error metrics of a validation run.
#[derive(Clone, Copy, Debug)]
pub struct ValidationResult {
    /// Final position error against the expected state, km
    pub position_error_km: f64,
    /// Final velocity error against the expected state, km/s
    pub velocity_error_km_s: f64,
    /// Relative drift of the specific mechanical energy over the run
    pub energy_drift_rel: f64,
    /// Relative drift of the z angular momentum over the run
    pub momentum_drift_rel: f64,
    pub final_state: StateVector,
    pub samples: usize,
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Δp = {:.3e} km\tΔv = {:.3e} km/s\tΔE/E = {:.3e}\tΔh_z/h_z = {:.3e} ({} samples)",
            self.position_error_km,
            self.velocity_error_km_s,
            self.energy_drift_rel,
            self.momentum_drift_rel,
            self.samples
        )
    }
}

impl ValidationTestCase {
    /// Runs the case on the provided propagator and computes the metrics.
    pub fn run(&self, propagator: &mut dyn Propagator) -> Result<ValidationResult, AstroError> {
        let states = propagator.propagate(&self.initial, self.step, self.duration)?;
        let final_state = *states.last().ok_or_else(|| {
            AstroError::ConfigError(format!("validation case {} produced no samples", self.name))
        })?;

        let e0 = self.initial.energy_km2_s2(self.gm);
        let hz0 = self.initial.hvec()[2];
        let energy_drift_rel = ((final_state.energy_km2_s2(self.gm) - e0) / e0).abs();
        let momentum_drift_rel = if hz0.abs() > f64::EPSILON {
            ((final_state.hvec()[2] - hz0) / hz0).abs()
        } else {
            final_state.hvec()[2].abs()
        };

        let result = ValidationResult {
            position_error_km: (final_state.radius_km - self.expected.radius_km).norm(),
            velocity_error_km_s: (final_state.velocity_km_s - self.expected.velocity_km_s).norm(),
            energy_drift_rel,
            momentum_drift_rel,
            final_state,
            samples: states.len(),
        };
        info!("validation case {}: {}", self.name, result);
        Ok(result)
    }
}
