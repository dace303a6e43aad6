use super::Propagator;
use crate::cosmic::{OrbitalElements, StateVector};
use crate::errors::AstroError;
use crate::linalg::Vector3;
use crate::time::{Duration, Epoch, Unit};
use crate::tools::kepler::{solve_kepler, true_from_eccentric};
use crate::utils::between_0_2pi;
use serde_derive::{Deserialize, Serialize};

/// Mean orbital elements in the two-line element convention, already parsed
/// into floating point: angles in radians, mean motion in rad/min, and the
/// mean motion derivatives divided by two and six as published.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct TleData {
    pub satellite_number: u32,
    pub epoch_year: i32,
    /// Fractional day of year, 1.0 being January 1st 00:00 UTC
    pub epoch_day: f64,
    /// First derivative of the mean motion over two, in rad/min^2
    pub mean_motion_dot: f64,
    /// Second derivative of the mean motion over six, in rad/min^3
    pub mean_motion_ddot: f64,
    /// SGP4-style drag term in inverse Earth radii
    pub bstar: f64,
    pub inc_rad: f64,
    pub raan_rad: f64,
    pub ecc: f64,
    pub aop_rad: f64,
    pub mean_anomaly_rad: f64,
    /// Mean motion in rad/min
    pub mean_motion_rad_min: f64,
}

impl TleData {
    /// The absolute epoch of these mean elements.
    pub fn epoch(&self) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(self.epoch_year, 1, 1)
            + (self.epoch_day - 1.0) * Unit::Day
    }
}

/// A reduced mean-element propagator over TLE data.
///
/// The mean motion is advanced with the published polynomial
/// `n(t) = n₀ + ṅ·t + n̈·t²` (which carries the secular drag decay), Kepler's
/// equation is solved per sample, and the perifocal state is rotated by
/// (ω, i, Ω) into the TEME frame the elements are referenced to.
///
/// This is **not** SGP4: no Brouwer-Lyddane short- or long-period terms are
/// reconstructed, and no accuracy beyond the secular trend should be assumed.
#[derive(Copy, Clone, Debug)]
pub struct MeanElementPropagator {
    pub tle: TleData,
    pub gm: f64,
}

impl MeanElementPropagator {
    pub fn new(tle: TleData, gm: f64) -> Self {
        Self { tle, gm }
    }

    /// The osculating-equivalent state of the mean elements at the provided epoch.
    pub fn state_at(&self, epoch: Epoch) -> Result<StateVector, AstroError> {
        let t_min = (epoch - self.tle.epoch()).in_seconds() / 60.0;
        let n0 = self.tle.mean_motion_rad_min;
        let n = n0 + self.tle.mean_motion_dot * t_min + self.tle.mean_motion_ddot * t_min.powi(2);
        if n <= 0.0 {
            return Err(AstroError::MathDomain(format!(
                "mean motion decayed to {n} rad/min at {epoch}"
            )));
        }
        // Integral of n(t) advances the mean anomaly.
        let mean_anomaly = between_0_2pi(
            self.tle.mean_anomaly_rad
                + n0 * t_min
                + self.tle.mean_motion_dot * t_min.powi(2) / 2.0
                + self.tle.mean_motion_ddot * t_min.powi(3) / 3.0,
        );
        let n_rad_s = n / 60.0;
        let sma_km = (self.gm / n_rad_s.powi(2)).cbrt();

        let ecc_anomaly = solve_kepler(mean_anomaly, self.tle.ecc)?;
        let ta_rad = true_from_eccentric(ecc_anomaly, self.tle.ecc);

        let elements = OrbitalElements::new(
            sma_km,
            self.tle.ecc,
            self.tle.inc_rad,
            self.tle.raan_rad,
            self.tle.aop_rad,
            ta_rad,
            epoch,
            self.gm,
        );
        Ok(elements.to_state())
    }
}

impl Propagator for MeanElementPropagator {
    fn propagate(
        &mut self,
        initial: &StateVector,
        step: Duration,
        duration: Duration,
    ) -> Result<Vec<StateVector>, AstroError> {
        let dt_s = step.in_seconds();
        let duration_s = duration.in_seconds();
        let num_steps = (duration_s / dt_s).ceil().max(0.0) as usize;
        let mut states = Vec::with_capacity(num_steps + 1);
        states.push(self.state_at(initial.epoch)?);
        for i in 1..=num_steps {
            let t_s = (i as f64 * dt_s).min(duration_s);
            states.push(self.state_at(initial.epoch + t_s * Unit::Second)?);
        }
        Ok(states)
    }

    fn step(&mut self, state: &StateVector, step: Duration) -> Result<StateVector, AstroError> {
        self.state_at(state.epoch + step)
    }

    /// Mean-element propagation has no point-wise dynamics: this returns the
    /// zero vector and must not be used as a derivative source.
    fn acceleration(&self, _state: &StateVector) -> Vector3<f64> {
        Vector3::zeros()
    }
}
