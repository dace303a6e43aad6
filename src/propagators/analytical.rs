use super::Propagator;
use crate::cosmic::bodies::{EARTH_RADIUS_KM, J2_EARTH};
use crate::cosmic::{OrbitalElements, StateVector};
use crate::errors::AstroError;
use crate::linalg::Vector3;
use crate::time::Duration;
use crate::tools::kepler::{propagate_kepler, solve_kepler, true_from_eccentric, mean_from_true};
use crate::utils::between_0_2pi;

/// Which secular perturbation the analytical propagator applies on top of
/// Keplerian motion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PerturbationMode {
    /// Pure Keplerian motion.
    None,
    /// J2 secular rates on the node, the argument of periapsis, and the mean motion.
    J2,
    /// Exponential decay of the semi-major axis from atmospheric drag,
    /// engaged only below 2000 km altitude.
    Atmospheric,
}

/// Closed-form propagation with a selectable secular perturbation.
#[derive(Copy, Clone, Debug)]
pub struct AnalyticalPropagator {
    pub gm: f64,
    pub mode: PerturbationMode,
    pub j2: f64,
    pub r_eq_km: f64,
    /// Time constant of the semi-major axis decay in the atmospheric mode.
    pub decay_timescale_s: f64,
    /// The atmospheric mode only engages below this altitude.
    pub decay_max_altitude_km: f64,
}

impl AnalyticalPropagator {
    pub fn new(gm: f64, mode: PerturbationMode) -> Self {
        Self {
            gm,
            mode,
            j2: J2_EARTH,
            r_eq_km: EARTH_RADIUS_KM,
            decay_timescale_s: 2.0e6,
            decay_max_altitude_km: 2_000.0,
        }
    }

    /// Propagates an element set by `dt_s` seconds under the configured mode.
    pub fn propagate_elements(
        &self,
        elements: &OrbitalElements,
        dt_s: f64,
    ) -> Result<OrbitalElements, AstroError> {
        match self.mode {
            PerturbationMode::None => propagate_kepler(elements, dt_s),
            PerturbationMode::J2 => {
                let raan_dot = elements.raan_dot_rad_s(self.j2, self.r_eq_km);
                let aop_dot = elements.aop_dot_rad_s(self.j2, self.r_eq_km);
                let ma_dot = elements.ma_dot_rad_s(self.j2, self.r_eq_km);
                let n = elements.mean_motion_rad_s();

                let mean_anomaly = between_0_2pi(
                    mean_from_true(elements.ta_rad, elements.ecc)? + (n + ma_dot) * dt_s,
                );
                let ecc_anomaly = solve_kepler(mean_anomaly, elements.ecc)?;
                let ta_rad = true_from_eccentric(ecc_anomaly, elements.ecc);

                Ok(OrbitalElements::new(
                    elements.sma_km,
                    elements.ecc,
                    elements.inc_rad,
                    elements.raan_rad + raan_dot * dt_s,
                    elements.aop_rad + aop_dot * dt_s,
                    ta_rad,
                    elements.epoch + dt_s * crate::time::Unit::Second,
                    elements.gm,
                ))
            }
            PerturbationMode::Atmospheric => {
                let altitude_km = elements.sma_km - self.r_eq_km;
                if altitude_km > self.decay_max_altitude_km {
                    // Too high for the atmosphere model to matter.
                    return propagate_kepler(elements, dt_s);
                }
                // Monotone decay of the semi-major axis, floored above the
                // dense atmosphere so the elements stay meaningful.
                let floor_km = self.r_eq_km + 100.0;
                let sma_km = floor_km
                    + (elements.sma_km - floor_km).max(0.0)
                        * (-dt_s / self.decay_timescale_s).exp();
                let decayed = OrbitalElements { sma_km, ..*elements };
                propagate_kepler(&decayed, dt_s)
            }
        }
    }
}

impl Propagator for AnalyticalPropagator {
    fn propagate(
        &mut self,
        initial: &StateVector,
        step: Duration,
        duration: Duration,
    ) -> Result<Vec<StateVector>, AstroError> {
        let elements = OrbitalElements::from_state(initial, self.gm)?;
        let dt_s = step.in_seconds();
        let duration_s = duration.in_seconds();
        let num_steps = (duration_s / dt_s).ceil().max(0.0) as usize;
        let mut states = Vec::with_capacity(num_steps + 1);
        states.push(*initial);
        for i in 1..=num_steps {
            let t_s = (i as f64 * dt_s).min(duration_s);
            states.push(self.propagate_elements(&elements, t_s)?.to_state());
        }
        Ok(states)
    }

    fn step(&mut self, state: &StateVector, step: Duration) -> Result<StateVector, AstroError> {
        let elements = OrbitalElements::from_state(state, self.gm)?;
        Ok(self
            .propagate_elements(&elements, step.in_seconds())?
            .to_state())
    }

    fn acceleration(&self, state: &StateVector) -> Vector3<f64> {
        -self.gm / state.rmag().powi(3) * state.radius_km
    }
}
