extern crate nalgebra as na;
use self::na::{Matrix3, Vector3};
use std::f64::consts::PI;

/// Returns the provided angle bounded between 0.0 and 2π radians
pub fn between_0_2pi(angle: f64) -> f64 {
    let mut bounded = angle % (2.0 * PI);
    if bounded < 0.0 {
        bounded += 2.0 * PI;
    }
    bounded
}

/// Returns the provided angle bounded between 0.0 and 360.0 degrees
pub fn between_0_360(angle: f64) -> f64 {
    let mut bounded = angle % 360.0;
    if bounded < 0.0 {
        bounded += 360.0;
    }
    bounded
}

/// Returns the provided angle bounded between -180.0 and +180.0 degrees
pub fn between_pm_180(angle: f64) -> f64 {
    let mut bounded = angle % 360.0;
    if bounded > 180.0 {
        bounded -= 360.0;
    }
    if bounded < -180.0 {
        bounded += 360.0;
    }
    bounded
}

/// Arc cosine with the argument clamped to [-1, 1].
///
/// Rounding in dot products of unit vectors routinely lands just outside the
/// domain; every `acos` in the library goes through this function.
pub fn clamped_acos(arg: f64) -> f64 {
    arg.clamp(-1.0, 1.0).acos()
}

/// Arc sine with the argument clamped to [-1, 1].
pub fn clamped_asin(arg: f64) -> f64 {
    arg.clamp(-1.0, 1.0).asin()
}

/// Rotation about the X axis. Angle in radians
pub fn r1(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// Rotation about the Y axis. Angle in radians
pub fn r2(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
}

/// Rotation about the Z axis. Angle in radians
pub fn r3(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Returns the components of vector a orthogonal to b
pub fn perpv(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    let big_a = a[0].abs().max(a[1].abs().max(a[2].abs()));
    let big_b = b[0].abs().max(b[1].abs().max(b[2].abs()));
    if big_a < f64::EPSILON {
        Vector3::zeros()
    } else if big_b < f64::EPSILON {
        *a
    } else {
        let a_scl = a / big_a;
        let b_scl = b / big_b;
        let v = b_scl * (a_scl.dot(&b_scl) / b_scl.norm_squared());
        big_a * (a_scl - v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_wraps() {
        assert!((between_0_2pi(-0.5 * PI) - 1.5 * PI).abs() < f64::EPSILON);
        assert!((between_0_2pi(5.0 * PI) - PI).abs() < 1e-13);
        assert!((between_0_360(-90.0) - 270.0).abs() < f64::EPSILON);
        assert!((between_pm_180(270.0) + 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn acos_clamping() {
        assert!(clamped_acos(1.0 + 1e-15).is_finite());
        assert!((clamped_acos(-1.0 - 1e-15) - PI).abs() < f64::EPSILON);
    }

    #[test]
    fn rotations_orthonormal() {
        for angle in [-2.1, 0.0, 0.3, 1.8] {
            for dcm in [r1(angle), r2(angle), r3(angle)] {
                let should_be_eye = dcm * dcm.transpose();
                assert!((should_be_eye - Matrix3::identity()).norm() < 1e-14);
            }
        }
    }
}
