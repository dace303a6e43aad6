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

use thiserror::Error;

/// Represents all possible errors that can occur in the Astraea library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstroError {
    /// Occurs when an iterative solver exceeds its iteration cap. Carries the
    /// residual of the last iterate so the caller can judge how close it got.
    #[error("{solver} did not converge after {iterations} iterations (last residual: {residual:e})")]
    MaxIterReached {
        solver: &'static str,
        iterations: usize,
        residual: f64,
    },

    /// Occurs when there is a math domain error, e.g. calling the hyperbolic
    /// Kepler solver with an elliptical eccentricity.
    #[error("math domain error: {0}")]
    MathDomain(String),

    /// Occurs when a state stops being representable during propagation, which
    /// indicates a solver failure upstream.
    #[error("state is no longer finite: {0}")]
    StateNotFinite(String),

    /// Occurs when an orbit is not hyperbolic but a hyperbolic-only quantity was requested.
    #[error("orbit is not hyperbolic: {0}")]
    NotHyperbolic(String),

    /// Occurs when the targets handed to the Lambert solver are collinear, i.e. Δν ~= 0 or ~= π.
    #[error("Lambert targets are collinear or too close")]
    TargetsTooClose,

    /// Occurs when a named force cannot be found in a force model.
    #[error("no force named `{0}` in this force model")]
    ForceNotFound(String),

    /// Occurs when a propagator or solver is configured with physically impossible inputs.
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}
