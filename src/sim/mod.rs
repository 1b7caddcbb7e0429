//! Simulation State Access
//!
//! The reward core never owns the physics simulation. It reads physical
//! quantities through [`SimulationProvider`], a synchronous, side-effect-free
//! query surface over whatever engine drives the robot.

mod quaternion;
mod snapshot;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use quaternion::Quaternion;
pub use snapshot::{BodySnapshot, SnapshotProvider};

/// Identifier of a simulated body (the robot base, a plane, ...)
pub type BodyId = u32;

/// Provider handle shared between every reward bound to it
pub type SharedProvider = Arc<dyn SimulationProvider>;

/// Position and orientation of a body's base link in the world frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasePose {
    /// World position (x, y, z) in metres
    pub position: [f64; 3],
    /// World orientation
    pub orientation: Quaternion,
}

impl Default for BasePose {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            orientation: Quaternion::IDENTITY,
        }
    }
}

/// Linear and angular velocity of a body's base link in the world frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseVelocity {
    /// Linear velocity (m/s)
    pub linear: [f64; 3],
    /// Angular velocity (rad/s)
    #[serde(default)]
    pub angular: [f64; 3],
}

/// State of a single revolute joint
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointState {
    /// Joint angle (rad)
    pub position: f64,
    /// Joint angular velocity (rad/s)
    pub velocity: f64,
    /// Motor torque applied during the last step (N·m)
    #[serde(default)]
    pub applied_torque: f64,
}

/// Read-only view of the current simulation step
///
/// Every query returns a snapshot that is valid for the current step and
/// must not mutate the simulation.
#[cfg_attr(test, mockall::automock)]
pub trait SimulationProvider: Send + Sync {
    /// Base position and orientation of `body`
    fn base_pose(&self, body: BodyId) -> BasePose;

    /// Base linear and angular velocity of `body`
    fn base_velocity(&self, body: BodyId) -> BaseVelocity;

    /// Number of joints on `body`
    fn num_joints(&self, body: BodyId) -> usize;

    /// State of joint `joint` on `body`
    fn joint_state(&self, body: BodyId, joint: usize) -> JointState;
}

impl std::fmt::Debug for dyn SimulationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SimulationProvider")
    }
}

/// Collect the state of every joint on `body`
pub fn joint_states(provider: &dyn SimulationProvider, body: BodyId) -> Vec<JointState> {
    (0..provider.num_joints(body))
        .map(|joint| provider.joint_state(body, joint))
        .collect()
}

/// Whether two handles refer to the same provider instance
pub fn same_provider(a: &SharedProvider, b: &SharedProvider) -> bool {
    Arc::ptr_eq(a, b)
}
