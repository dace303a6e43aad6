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

/// The Cartesian state vector and its derivative algebra.
pub mod state;
pub use self::state::{StateDerivative, StateVector};

/// Osculating Keplerian orbital elements and orbit classification.
pub mod elements;
pub use self::elements::{OrbitClass, OrbitShape, OrbitalElements, ECC_EPSILON};

/// Reference frame transformations: Earth rotation, geodetic, topocentric,
/// orbital triads, and precession.
pub mod frames;

/// Physical constants and the analytic ephemerides of perturbing bodies.
pub mod bodies;
pub use self::bodies::Body;
