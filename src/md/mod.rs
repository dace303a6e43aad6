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

/// Trajectory event detection: apsides, nodes, eclipses.
pub mod events;
pub use self::events::{
    find_events, ApoapsisEvent, AscendingNodeEvent, DescendingNodeEvent, EclipseEvent,
    EventDetails, EventEvaluator, PeriapsisEvent,
};

/// The propagator validation harness.
pub mod validation;
pub use self::validation::{ValidationResult, ValidationTestCase};
