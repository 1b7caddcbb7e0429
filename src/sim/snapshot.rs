//! Frozen simulation state
//!
//! A serde-loadable snapshot of one simulation step. Used to score recorded
//! states from the command line and as a deterministic provider in tests.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{BasePose, BaseVelocity, BodyId, JointState, Quaternion, SimulationProvider};
use crate::error::{Result, SoloError};

/// Recorded state of one body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: BodyId,
    #[serde(default)]
    pub position: [f64; 3],
    /// Orientation as a quaternion; takes precedence over `orientation_euler`
    #[serde(default)]
    pub orientation: Option<Quaternion>,
    /// Orientation as roll/pitch/yaw in radians
    #[serde(default)]
    pub orientation_euler: Option<[f64; 3]>,
    #[serde(default)]
    pub velocity: BaseVelocity,
    #[serde(default)]
    pub joints: Vec<JointState>,
}

impl BodySnapshot {
    pub fn new(id: BodyId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_position(mut self, position: [f64; 3]) -> Self {
        self.position = position;
        self
    }

    pub fn with_euler(mut self, roll: f64, pitch: f64, yaw: f64) -> Self {
        self.orientation = Some(Quaternion::from_euler(roll, pitch, yaw));
        self
    }

    pub fn with_linear_velocity(mut self, linear: [f64; 3]) -> Self {
        self.velocity.linear = linear;
        self
    }

    pub fn with_joints(mut self, joints: Vec<JointState>) -> Self {
        self.joints = joints;
        self
    }

    fn pose(&self) -> BasePose {
        let orientation = match (self.orientation, self.orientation_euler) {
            (Some(q), _) => q,
            (None, Some([roll, pitch, yaw])) => Quaternion::from_euler(roll, pitch, yaw),
            (None, None) => Quaternion::IDENTITY,
        };
        BasePose {
            position: self.position,
            orientation,
        }
    }
}

/// Immutable provider backed by recorded body states
///
/// Bodies that were not recorded read as resting at the origin with no joints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotProvider {
    #[serde(default)]
    pub bodies: Vec<BodySnapshot>,
}

impl SnapshotProvider {
    pub fn new(bodies: Vec<BodySnapshot>) -> Self {
        Self { bodies }
    }

    /// Load a snapshot from a `.json` or `.toml` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let snapshot = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&raw)?,
            Some("json") => serde_json::from_str(&raw)?,
            other => {
                return Err(SoloError::Validation(format!(
                    "unsupported snapshot format {:?} for {}",
                    other,
                    path.display()
                )))
            }
        };
        Ok(snapshot)
    }

    fn body(&self, id: BodyId) -> Option<&BodySnapshot> {
        self.bodies.iter().find(|body| body.id == id)
    }
}

impl SimulationProvider for SnapshotProvider {
    fn base_pose(&self, body: BodyId) -> BasePose {
        self.body(body).map(BodySnapshot::pose).unwrap_or_default()
    }

    fn base_velocity(&self, body: BodyId) -> BaseVelocity {
        self.body(body).map(|b| b.velocity).unwrap_or_default()
    }

    fn num_joints(&self, body: BodyId) -> usize {
        self.body(body).map_or(0, |b| b.joints.len())
    }

    fn joint_state(&self, body: BodyId, joint: usize) -> JointState {
        self.body(body)
            .and_then(|b| b.joints.get(joint).copied())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Write;

    #[test]
    fn test_unknown_body_reads_at_rest() {
        let provider = SnapshotProvider::default();
        assert_eq!(provider.base_pose(7), BasePose::default());
        assert_eq!(provider.base_velocity(7), BaseVelocity::default());
        assert_eq!(provider.num_joints(7), 0);
        assert_eq!(provider.joint_state(7, 0), JointState::default());
    }

    #[test]
    fn test_euler_orientation_is_converted() {
        let provider = SnapshotProvider::new(vec![BodySnapshot {
            id: 1,
            orientation_euler: Some([0.1, 0.2, 0.3]),
            ..Default::default()
        }]);
        let [roll, pitch, yaw] = provider.base_pose(1).orientation.to_euler();
        assert_abs_diff_eq!(roll, 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(pitch, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(yaw, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_load_json_snapshot() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"bodies": [{{"id": 1, "position": [0.0, 0.0, 0.3],
                "velocity": {{"linear": [0.5, 0.0, 0.0]}},
                "joints": [{{"position": 0.1, "velocity": 0.0}}]}}]}}"#
        )
        .unwrap();

        let provider = SnapshotProvider::load(file.path()).unwrap();
        assert_eq!(provider.base_pose(1).position, [0.0, 0.0, 0.3]);
        assert_eq!(provider.base_velocity(1).linear, [0.5, 0.0, 0.0]);
        assert_eq!(provider.num_joints(1), 1);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = SnapshotProvider::load(file.path()).unwrap_err();
        assert!(matches!(err, SoloError::Validation(_)));
    }
}
