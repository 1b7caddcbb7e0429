//! Physical reward terms for the Solo 8 quadruped.
//!
//! Each term reads one quantity off the simulation provider, converts it
//! to the unit its shaping function expects, and scores it.

use std::f64::consts::{FRAC_PI_2, PI};

use super::composite::MultiplicativeReward;
use super::reward::{Reward, RewardTerm};
use super::shaping::{linear, Tolerance, DEFAULT_MARGIN_VALUE};
use crate::error::{RewardError, RewardResult};
use crate::sim::{joint_states, BodyId, SimulationProvider};

// ============================================================================
// Constant
// ============================================================================

/// Returns a fixed value regardless of simulation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantReward {
    value: f64,
}

impl ConstantReward {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl RewardTerm for ConstantReward {
    fn name(&self) -> &'static str {
        "ConstantReward"
    }

    fn compute(&self, _sim: &dyn SimulationProvider) -> RewardResult<f64> {
        Ok(self.value)
    }
}

// ============================================================================
// Upright
// ============================================================================

/// Rewards pitching the torso nose-up.
///
/// `-pitch / (π/2)`: -1 when pitched +90°, 0 when flat, 1 when pitched -90°.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UprightReward {
    robot_id: BodyId,
}

impl UprightReward {
    pub fn new(robot_id: BodyId) -> Self {
        Self { robot_id }
    }

    pub fn robot_id(&self) -> BodyId {
        self.robot_id
    }
}

impl RewardTerm for UprightReward {
    fn name(&self) -> &'static str {
        "UprightReward"
    }

    fn compute(&self, sim: &dyn SimulationProvider) -> RewardResult<f64> {
        let [_, pitch, _] = sim.base_pose(self.robot_id).orientation.to_euler();
        Ok(-pitch / FRAC_PI_2)
    }
}

// ============================================================================
// Small Control
// ============================================================================

/// Rewards keeping the joints still.
///
/// Scores the mean absolute joint velocity against zero, with a soft
/// falloff of `margin` rad/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmallControlReward {
    robot_id: BodyId,
    margin: f64,
}

impl SmallControlReward {
    pub const DEFAULT_MARGIN: f64 = 1.0;

    pub fn new(robot_id: BodyId, margin: f64) -> Self {
        Self { robot_id, margin }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(0.0, 0.0).margin(self.margin, DEFAULT_MARGIN_VALUE)
    }
}

impl RewardTerm for SmallControlReward {
    fn name(&self) -> &'static str {
        "SmallControlReward"
    }

    fn compute(&self, sim: &dyn SimulationProvider) -> RewardResult<f64> {
        let joints = joint_states(sim, self.robot_id);
        if joints.is_empty() {
            return Err(RewardError::EmptyAggregation {
                aggregator: "SmallControlReward",
            });
        }
        let mean_speed =
            joints.iter().map(|j| j.velocity.abs()).sum::<f64>() / joints.len() as f64;
        self.tolerance().evaluate(mean_speed)
    }
}

// ============================================================================
// Horizontal Move Speed
// ============================================================================

/// Rewards moving across the ground plane at `target_speed`.
///
/// Speed is the norm of the base's x/y velocity. Anything within
/// `hard_margin` of the target scores 1; the score decays to
/// [`DEFAULT_MARGIN_VALUE`] over a further `soft_margin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalMoveSpeedReward {
    robot_id: BodyId,
    target_speed: f64,
    hard_margin: f64,
    soft_margin: f64,
}

impl HorizontalMoveSpeedReward {
    pub fn new(robot_id: BodyId, target_speed: f64, hard_margin: f64, soft_margin: f64) -> Self {
        Self {
            robot_id,
            target_speed,
            hard_margin,
            soft_margin,
        }
    }

    pub fn target_speed(&self) -> f64 {
        self.target_speed
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::around(self.target_speed, self.hard_margin)
            .margin(self.soft_margin, DEFAULT_MARGIN_VALUE)
    }
}

impl RewardTerm for HorizontalMoveSpeedReward {
    fn name(&self) -> &'static str {
        "HorizontalMoveSpeedReward"
    }

    fn compute(&self, sim: &dyn SimulationProvider) -> RewardResult<f64> {
        let [vx, vy, _] = sim.base_velocity(self.robot_id).linear;
        self.tolerance().evaluate(vx.hypot(vy))
    }
}

// ============================================================================
// Torso Height
// ============================================================================

/// Rewards holding the base at `target_height` metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorsoHeightReward {
    robot_id: BodyId,
    target_height: f64,
    hard_margin: f64,
    soft_margin: f64,
}

impl TorsoHeightReward {
    pub fn new(robot_id: BodyId, target_height: f64, hard_margin: f64, soft_margin: f64) -> Self {
        Self {
            robot_id,
            target_height,
            hard_margin,
            soft_margin,
        }
    }

    pub fn target_height(&self) -> f64 {
        self.target_height
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::around(self.target_height, self.hard_margin)
            .margin(self.soft_margin, DEFAULT_MARGIN_VALUE)
    }
}

impl RewardTerm for TorsoHeightReward {
    fn name(&self) -> &'static str {
        "TorsoHeightReward"
    }

    fn compute(&self, sim: &dyn SimulationProvider) -> RewardResult<f64> {
        let [_, _, z] = sim.base_pose(self.robot_id).position;
        self.tolerance().evaluate(z)
    }
}

// ============================================================================
// Flat Torso
// ============================================================================

/// Rewards keeping the torso level.
///
/// Tilt is the norm of roll and pitch (rad); yaw is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatTorsoReward {
    robot_id: BodyId,
    hard_margin: f64,
    soft_margin: f64,
}

impl FlatTorsoReward {
    pub fn new(robot_id: BodyId, hard_margin: f64, soft_margin: f64) -> Self {
        Self {
            robot_id,
            hard_margin,
            soft_margin,
        }
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::around(0.0, self.hard_margin).margin(self.soft_margin, DEFAULT_MARGIN_VALUE)
    }
}

impl RewardTerm for FlatTorsoReward {
    fn name(&self) -> &'static str {
        "FlatTorsoReward"
    }

    fn compute(&self, sim: &dyn SimulationProvider) -> RewardResult<f64> {
        let [roll, pitch, _] = sim.base_pose(self.robot_id).orientation.to_euler();
        self.tolerance().evaluate(roll.hypot(pitch))
    }
}

// ============================================================================
// Joint Posture
// ============================================================================

/// Rewards holding each joint near a target angle.
///
/// Mean over joints of `linear(angle, target, span, symmetric = true)`.
/// A single target applies to every joint; otherwise there must be one
/// target per joint.
#[derive(Debug, Clone, PartialEq)]
pub struct JointPostureReward {
    robot_id: BodyId,
    targets: Vec<f64>,
    span: f64,
}

impl JointPostureReward {
    pub fn new(robot_id: BodyId, targets: Vec<f64>, span: f64) -> Self {
        Self {
            robot_id,
            targets,
            span,
        }
    }

    pub fn validate(&self) -> RewardResult<()> {
        if self.targets.is_empty() {
            return Err(RewardError::invalid("targets", "at least one target angle is required"));
        }
        if !self.span.is_finite() {
            return Err(RewardError::invalid(
                "span",
                format!("must be finite, got {}", self.span),
            ));
        }
        Ok(())
    }
}

impl RewardTerm for JointPostureReward {
    fn name(&self) -> &'static str {
        "JointPostureReward"
    }

    fn compute(&self, sim: &dyn SimulationProvider) -> RewardResult<f64> {
        self.validate()?;

        let joints = joint_states(sim, self.robot_id);
        if joints.is_empty() {
            return Err(RewardError::EmptyAggregation {
                aggregator: "JointPostureReward",
            });
        }
        if self.targets.len() != 1 && self.targets.len() != joints.len() {
            return Err(RewardError::invalid(
                "targets",
                format!(
                    "expected 1 or {} target angles, got {}",
                    joints.len(),
                    self.targets.len()
                ),
            ));
        }

        let total: f64 = joints
            .iter()
            .enumerate()
            .map(|(i, joint)| {
                let target = if self.targets.len() == 1 {
                    self.targets[0]
                } else {
                    self.targets[i]
                };
                linear(joint.position, target, self.span, true)
            })
            .sum();
        Ok(total / joints.len() as f64)
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Nominal base height of a standing Solo 8 (m)
pub const QUAD_STANDING_HEIGHT: f64 = 0.3;

/// Standing still in the home position: level torso times target height.
///
/// The torso may tilt 0.1 rad freely and falls off over π; height may be
/// off by 5 mm freely and falls off over 15 cm.
pub fn home_position(robot_id: BodyId, standing_height: f64) -> Reward {
    MultiplicativeReward::new(
        1.0,
        vec![
            Reward::leaf(FlatTorsoReward::new(robot_id, 0.1, PI)),
            Reward::leaf(TorsoHeightReward::new(robot_id, standing_height, 0.005, 0.15)),
        ],
    )
    .into()
}
