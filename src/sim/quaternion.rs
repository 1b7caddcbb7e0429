//! Orientation quaternion with roll/pitch/yaw conversion.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

/// Unit quaternion in `[w, x, y, z]` order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Build from roll (x), pitch (y) and yaw (z) angles in radians.
    ///
    /// Rotations are applied about the fixed world axes in x, y, z order,
    /// which is the convention physics engines report base orientation in.
    pub fn from_euler(roll: f64, pitch: f64, yaw: f64) -> Self {
        let (sr, cr) = (roll * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sy, cy) = (yaw * 0.5).sin_cos();

        Self {
            w: cr * cp * cy + sr * sp * sy,
            x: sr * cp * cy - cr * sp * sy,
            y: cr * sp * cy + sr * cp * sy,
            z: cr * cp * sy - sr * sp * cy,
        }
    }

    /// Roll, pitch and yaw in radians.
    ///
    /// Pitch is clamped to ±π/2 at gimbal lock.
    pub fn to_euler(&self) -> [f64; 3] {
        let Self { w, x, y, z } = *self;

        let sinr_cosp = 2.0 * (w * x + y * z);
        let cosr_cosp = 1.0 - 2.0 * (x * x + y * y);
        let roll = sinr_cosp.atan2(cosr_cosp);

        let sinp = 2.0 * (w * y - z * x);
        let pitch = if sinp.abs() >= 1.0 {
            FRAC_PI_2.copysign(sinp)
        } else {
            sinp.asin()
        };

        let siny_cosp = 2.0 * (w * z + x * y);
        let cosy_cosp = 1.0 - 2.0 * (y * y + z * z);
        let yaw = siny_cosp.atan2(cosy_cosp);

        [roll, pitch, yaw]
    }

    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_identity_has_zero_angles() {
        assert_eq!(Quaternion::IDENTITY.to_euler(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_euler_roundtrip_away_from_gimbal_lock() {
        let q = Quaternion::from_euler(0.3, -0.4, 1.2);
        let [roll, pitch, yaw] = q.to_euler();
        assert_abs_diff_eq!(roll, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(pitch, -0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(yaw, 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(q.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pitch_clamped_at_gimbal_lock() {
        let q = Quaternion::from_euler(-FRAC_PI_4, FRAC_PI_2, -FRAC_PI_2);
        let [_, pitch, _] = q.to_euler();
        assert_abs_diff_eq!(pitch, FRAC_PI_2, epsilon = 1e-6);
        assert!(pitch <= FRAC_PI_2);
    }
}
