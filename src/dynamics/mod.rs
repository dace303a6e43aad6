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

//! The force model. Individual [`Force`]s compute one physical acceleration
//! each; the composite [`ForceModel`] sums every force which is both enabled
//! and applicable to the current state. Forces consume positions in km and
//! return accelerations in km/s^2.
//!
//! A `ForceModel` is configure-then-run: build it, toggle what you need, then
//! hand it to a propagator. Toggling while a propagation borrows the model is
//! not supported.

use crate::cosmic::{Body, StateVector};
use crate::errors::AstroError;
use crate::linalg::Vector3;

/// The gravity module handles the central body and third-body point masses.
pub mod gravity;
pub use self::gravity::{CentralGravity, ThirdBody};

/// Zonal harmonics of the central body gravity field.
pub mod harmonics;
pub use self::harmonics::{J2Gravity, J3J4Gravity};

/// The drag module handles drag in a very basic fashion. Do not use for high fidelity dynamics.
pub mod drag;
pub use self::drag::ExponentialDrag;

/// Solar radiation pressure with a cylindrical umbra shadow model.
pub mod solarpressure;
pub use self::solarpressure::{shadow_factor, SolarRadiationPressure};

/// Continuous thrust profiles.
pub mod propulsion;
pub use self::propulsion::Thrust;

/// First-order lunisolar tidal acceleration.
pub mod tide;
pub use self::tide::TidalForce;

/// The `Force` capability: a named acceleration contribution which knows when
/// it is physically worth evaluating.
///
/// Forces are immutable during propagation; anything stateful (such as a
/// thrust arc) keys off the state epoch instead of internal counters.
pub trait Force: Send + Sync {
    /// The name used to toggle this force in a [`ForceModel`].
    fn name(&self) -> &'static str;

    /// Whether this force meaningfully contributes at the provided state.
    /// The composite skips non-applicable forces to avoid spurious computation.
    fn applicable(&self, _state: &StateVector) -> bool {
        true
    }

    /// The acceleration in km/s^2 at the provided state for a spacecraft of
    /// the provided mass in kg.
    fn acceleration(&self, state: &StateVector, mass_kg: f64) -> Vector3<f64>;
}

struct ForceEntry {
    force: Box<dyn Force>,
    enabled: bool,
}

/// An ordered collection of [`Force`]s with per-force enable flags.
#[derive(Default)]
pub struct ForceModel {
    entries: Vec<ForceEntry>,
}

impl ForceModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a force, enabled. Names should be unique if the force is to be
    /// toggled later: `toggle` acts on every force of the provided name.
    pub fn add<F: Force + 'static>(&mut self, force: F) {
        self.entries.push(ForceEntry {
            force: Box::new(force),
            enabled: true,
        });
    }

    /// Builder-style `add`.
    pub fn with<F: Force + 'static>(mut self, force: F) -> Self {
        self.add(force);
        self
    }

    /// Enables or disables every force with the provided name. Idempotent.
    pub fn toggle(&mut self, name: &str, enabled: bool) -> Result<(), AstroError> {
        let mut found = false;
        for entry in &mut self.entries {
            if entry.force.name() == name {
                entry.enabled = enabled;
                found = true;
            }
        }
        if found {
            Ok(())
        } else {
            Err(AstroError::ForceNotFound(name.to_string()))
        }
    }

    /// Returns whether the named force is enabled, or None if it is not in the model.
    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|e| e.force.name() == name)
            .map(|e| e.enabled)
    }

    /// Names of all forces in this model, in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.force.name()).collect()
    }

    /// Sums the acceleration of every enabled and applicable force, in km/s^2.
    pub fn total_acceleration(&self, state: &StateVector, mass_kg: f64) -> Vector3<f64> {
        let mut total = Vector3::zeros();
        for entry in &self.entries {
            if entry.enabled && entry.force.applicable(state) {
                total += entry.force.acceleration(state, mass_kg);
            }
        }
        total
    }

    /// Returns the labeled acceleration of every enabled and applicable force.
    pub fn contributions(
        &self,
        state: &StateVector,
        mass_kg: f64,
    ) -> Vec<(&'static str, Vector3<f64>)> {
        self.entries
            .iter()
            .filter(|e| e.enabled && e.force.applicable(state))
            .map(|e| (e.force.name(), e.force.acceleration(state, mass_kg)))
            .collect()
    }

    /// Standard force set for low Earth orbit work: central gravity, the J2
    /// through J4 zonals, and exponential drag on a typical spacecraft.
    pub fn leo() -> Self {
        use crate::cosmic::bodies::{
            EARTH_RADIUS_KM, J2_EARTH, J3_EARTH, J4_EARTH, MU_EARTH_KM3_S2,
        };
        Self::new()
            .with(CentralGravity::new(MU_EARTH_KM3_S2))
            .with(J2Gravity::new(MU_EARTH_KM3_S2, J2_EARTH, EARTH_RADIUS_KM))
            .with(J3J4Gravity::new(
                MU_EARTH_KM3_S2,
                J3_EARTH,
                J4_EARTH,
                EARTH_RADIUS_KM,
            ))
            .with(ExponentialDrag::new(2.2, 10.0))
    }

    /// Standard force set for geostationary work: central gravity, J2,
    /// lunisolar third bodies, and radiation pressure on a typical spacecraft.
    pub fn geo() -> Self {
        use crate::cosmic::bodies::{EARTH_RADIUS_KM, J2_EARTH, MU_EARTH_KM3_S2};
        Self::new()
            .with(CentralGravity::new(MU_EARTH_KM3_S2))
            .with(J2Gravity::new(MU_EARTH_KM3_S2, J2_EARTH, EARTH_RADIUS_KM))
            .with(ThirdBody::new(Body::sun()))
            .with(ThirdBody::new(Body::moon()))
            .with(SolarRadiationPressure::new(0.3, 20.0))
    }

    /// Standard force set for heliocentric cruise: solar point mass gravity
    /// and radiation pressure.
    pub fn interplanetary() -> Self {
        use crate::cosmic::bodies::MU_SUN_KM3_S2;
        Self::new()
            .with(CentralGravity::new(MU_SUN_KM3_S2))
            .with(SolarRadiationPressure::heliocentric(0.3, 20.0))
    }
}
