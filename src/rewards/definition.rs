//! Declarative reward trees
//!
//! Reward trees described in configuration, deserialised with serde and
//! built into [`Reward`] nodes. Shaping parameters are validated when the
//! tree is built rather than on the first simulation step.

use serde::{Deserialize, Serialize};

use super::composite::{AdditiveReward, MultiplicativeReward};
use super::reward::Reward;
use super::terms::{
    home_position, ConstantReward, FlatTorsoReward, HorizontalMoveSpeedReward,
    JointPostureReward, SmallControlReward, TorsoHeightReward, UprightReward,
    QUAD_STANDING_HEIGHT,
};
use crate::error::{RewardError, RewardResult};
use crate::sim::BodyId;

fn default_small_control_margin() -> f64 {
    SmallControlReward::DEFAULT_MARGIN
}

fn default_standing_height() -> f64 {
    QUAD_STANDING_HEIGHT
}

fn default_coefficient() -> f64 {
    1.0
}

/// One node of a configured reward tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardDef {
    Constant {
        value: f64,
    },
    Upright,
    SmallControl {
        #[serde(default = "default_small_control_margin")]
        margin: f64,
    },
    HorizontalMoveSpeed {
        target_speed: f64,
        hard_margin: f64,
        soft_margin: f64,
    },
    TorsoHeight {
        target_height: f64,
        hard_margin: f64,
        soft_margin: f64,
    },
    FlatTorso {
        hard_margin: f64,
        soft_margin: f64,
    },
    JointPosture {
        targets: Vec<f64>,
        span: f64,
    },
    HomePosition {
        #[serde(default = "default_standing_height")]
        standing_height: f64,
    },
    Additive {
        terms: Vec<WeightedRewardDef>,
    },
    Multiplicative {
        #[serde(default = "default_coefficient")]
        coefficient: f64,
        terms: Vec<RewardDef>,
    },
}

/// A reward node paired with the weight it contributes with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRewardDef {
    pub weight: f64,
    #[serde(flatten)]
    pub reward: RewardDef,
}

impl WeightedRewardDef {
    pub fn new(weight: f64, reward: RewardDef) -> Self {
        Self { weight, reward }
    }
}

impl RewardDef {
    /// Build an unbound reward tree reading from body `robot_id`
    pub fn build(&self, robot_id: BodyId) -> RewardResult<Reward> {
        let reward = match self {
            RewardDef::Constant { value } => Reward::leaf(ConstantReward::new(*value)),
            RewardDef::Upright => Reward::leaf(UprightReward::new(robot_id)),
            RewardDef::SmallControl { margin } => {
                let term = SmallControlReward::new(robot_id, *margin);
                term.tolerance().validate()?;
                Reward::leaf(term)
            }
            RewardDef::HorizontalMoveSpeed {
                target_speed,
                hard_margin,
                soft_margin,
            } => {
                let term = HorizontalMoveSpeedReward::new(
                    robot_id,
                    *target_speed,
                    *hard_margin,
                    *soft_margin,
                );
                term.tolerance().validate()?;
                Reward::leaf(term)
            }
            RewardDef::TorsoHeight {
                target_height,
                hard_margin,
                soft_margin,
            } => {
                let term =
                    TorsoHeightReward::new(robot_id, *target_height, *hard_margin, *soft_margin);
                term.tolerance().validate()?;
                Reward::leaf(term)
            }
            RewardDef::FlatTorso {
                hard_margin,
                soft_margin,
            } => {
                let term = FlatTorsoReward::new(robot_id, *hard_margin, *soft_margin);
                term.tolerance().validate()?;
                Reward::leaf(term)
            }
            RewardDef::JointPosture { targets, span } => {
                let term = JointPostureReward::new(robot_id, targets.clone(), *span);
                term.validate()?;
                Reward::leaf(term)
            }
            RewardDef::HomePosition { standing_height } => {
                if !(standing_height.is_finite() && *standing_height > 0.0) {
                    return Err(RewardError::invalid(
                        "standing_height",
                        format!("must be a positive height, got {}", standing_height),
                    ));
                }
                home_position(robot_id, *standing_height)
            }
            RewardDef::Additive { terms } => {
                if terms.is_empty() {
                    return Err(RewardError::EmptyAggregation {
                        aggregator: "AdditiveReward",
                    });
                }
                let mut additive = AdditiveReward::new();
                for term in terms {
                    additive.add_term(term.weight, term.reward.build(robot_id)?);
                }
                additive.into()
            }
            RewardDef::Multiplicative { coefficient, terms } => {
                if terms.is_empty() {
                    return Err(RewardError::EmptyAggregation {
                        aggregator: "MultiplicativeReward",
                    });
                }
                let built = terms
                    .iter()
                    .map(|term| term.build(robot_id))
                    .collect::<RewardResult<Vec<_>>>()?;
                MultiplicativeReward::new(*coefficient, built).into()
            }
        };
        Ok(reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BodySnapshot, SharedProvider, SnapshotProvider};
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn standing_robot(id: BodyId) -> SharedProvider {
        Arc::new(SnapshotProvider::new(vec![
            BodySnapshot::new(id).with_position([0.0, 0.0, QUAD_STANDING_HEIGHT])
        ]))
    }

    #[test]
    fn test_parse_tagged_toml() {
        let raw = r#"
            [[terms]]
            weight = 2
            kind = "home_position"

            [[terms]]
            weight = 0.5
            kind = "small_control"

            [[terms]]
            weight = 1.0
            kind = "multiplicative"
            coefficient = 0.5
            terms = [
                { kind = "upright" },
                { kind = "constant", value = 2.0 },
            ]
        "#;

        #[derive(Deserialize)]
        struct Doc {
            terms: Vec<WeightedRewardDef>,
        }

        let doc: Doc = toml::from_str(raw).unwrap();
        assert_eq!(doc.terms.len(), 3);
        assert_eq!(doc.terms[0].weight, 2.0);
        assert_eq!(
            doc.terms[0].reward,
            RewardDef::HomePosition {
                standing_height: QUAD_STANDING_HEIGHT
            }
        );
        assert_eq!(
            doc.terms[1].reward,
            RewardDef::SmallControl {
                margin: SmallControlReward::DEFAULT_MARGIN
            }
        );
        assert!(matches!(
            doc.terms[2].reward,
            RewardDef::Multiplicative { coefficient, ref terms } if coefficient == 0.5 && terms.len() == 2
        ));
    }

    #[test]
    fn test_build_and_compute_home_position() {
        let mut reward = RewardDef::HomePosition {
            standing_height: QUAD_STANDING_HEIGHT,
        }
        .build(3)
        .unwrap();
        reward.bind(standing_robot(3));
        assert_eq!(reward.compute().unwrap(), 1.0);
    }

    #[test]
    fn test_build_nested_additive() {
        let def = RewardDef::Additive {
            terms: vec![
                WeightedRewardDef::new(1.0, RewardDef::Constant { value: 2.0 }),
                WeightedRewardDef::new(
                    0.5,
                    RewardDef::Multiplicative {
                        coefficient: 2.0,
                        terms: vec![
                            RewardDef::Constant { value: 3.0 },
                            RewardDef::TorsoHeight {
                                target_height: QUAD_STANDING_HEIGHT,
                                hard_margin: 0.01,
                                soft_margin: 0.1,
                            },
                        ],
                    },
                ),
            ],
        };
        let mut reward = def.build(0).unwrap();
        reward.bind(standing_robot(0));
        assert_abs_diff_eq!(reward.compute().unwrap(), 2.0 + 0.5 * 2.0 * 3.0);
    }

    #[test]
    fn test_build_rejects_invalid_shaping() {
        let err = RewardDef::FlatTorso {
            hard_margin: 0.1,
            soft_margin: -1.0,
        }
        .build(0)
        .unwrap_err();
        assert!(matches!(err, RewardError::InvalidArgument { ref param, .. } if param == "margin"));
    }

    #[test]
    fn test_build_rejects_empty_composites() {
        assert_eq!(
            RewardDef::Additive { terms: vec![] }.build(0).unwrap_err(),
            RewardError::EmptyAggregation {
                aggregator: "AdditiveReward"
            }
        );
        assert_eq!(
            RewardDef::Multiplicative {
                coefficient: 1.0,
                terms: vec![]
            }
            .build(0)
            .unwrap_err(),
            RewardError::EmptyAggregation {
                aggregator: "MultiplicativeReward"
            }
        );
    }

    #[test]
    fn test_build_rejects_bad_standing_height() {
        let err = RewardDef::HomePosition {
            standing_height: 0.0,
        }
        .build(0)
        .unwrap_err();
        assert!(matches!(err, RewardError::InvalidArgument { .. }));
    }

    #[test]
    fn test_built_reward_starts_unbound() {
        let reward = RewardDef::Upright.build(0).unwrap();
        assert!(!reward.is_bound());
    }
}
