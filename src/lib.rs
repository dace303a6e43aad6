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

/*! # astraea

Astraea propagates the state of spacecraft and other orbiting bodies under
Keplerian motion and realistic perturbations, and solves the classical
two-point boundary value problems (Kepler, Lambert) along with closed-form
transfer maneuver design.

All positions are in kilometers, velocities in kilometers per second,
gravitational parameters in km^3/s^2, and angles in radians unless a name
says otherwise. Masses are in kilograms and spacecraft areas in square
meters, matching the usual mission engineering conventions.
*/

/// Provides all the integrators and orbit propagators available in `astraea`.
pub mod propagators;

/// Provides the composable force models consumed by the numerical propagator.
pub mod dynamics;

/// Provides the state vector, osculating orbital elements, reference frame
/// services, and celestial body data.
pub mod cosmic;

/// Utility functions shared by different modules, and which may be useful to engineers.
pub mod utils;

mod errors;
/// Astraea will (almost) never panic and functions which may fail will return an error.
pub use self::errors::AstroError;

/// Boundary-value solvers: Kepler's equation, Lambert's problem, and the
/// maneuver design primitives.
pub mod tools;

/// Mission analysis tools: event detection and the validation harness.
pub mod md;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Re-export some useful things
pub use self::cosmic::{OrbitalElements, StateDerivative, StateVector};
