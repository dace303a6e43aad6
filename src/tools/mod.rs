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

/// Kepler's equation in both regimes and the anomaly conversions.
pub mod kepler;

/// Lambert's boundary value problem, including multi-revolution transfers.
pub mod lambert;
pub use self::lambert::{lambert, lambert_multi_rev, LambertConfig, LambertSolution};

/// Closed-form maneuver design: Hohmann, bi-elliptic, plane changes,
/// rendezvous, patched conics, launch windows.
pub mod maneuvers;
