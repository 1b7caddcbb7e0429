//! Reward Composition
//!
//! Builds the scalar training signal for a legged-robot environment out of
//! small, interpretable terms.
//!
//! # Features
//!
//! - **Shaping**: [`tolerance`] and [`linear`] map physical quantities to scores
//! - **Reward trees**: leaf terms nested inside additive and multiplicative aggregators
//! - **Factory**: the weighted top-level sum an environment queries once per step
//! - **Definitions**: reward trees described in configuration
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use solo_rewards::rewards::{home_position, RewardFactory, QUAD_STANDING_HEIGHT};
//! use solo_rewards::sim::{BodySnapshot, SnapshotProvider};
//!
//! let sim = SnapshotProvider::new(vec![
//!     BodySnapshot::new(0).with_position([0.0, 0.0, QUAD_STANDING_HEIGHT]),
//! ]);
//! let mut factory = RewardFactory::new(Arc::new(sim));
//! factory.register_reward(1.0, home_position(0, QUAD_STANDING_HEIGHT));
//! assert_eq!(factory.get_reward().unwrap(), 1.0);
//! ```

pub mod composite;
pub mod definition;
pub mod factory;
pub mod reward;
pub mod shaping;
pub mod terms;

pub use composite::{AdditiveReward, MultiplicativeReward};
pub use definition::{RewardDef, WeightedRewardDef};
pub use factory::{RewardContribution, RewardFactory};
pub use reward::{Binding, LeafReward, Reward, RewardTerm};
pub use shaping::{linear, tolerance, Sigmoid, Tolerance, DEFAULT_MARGIN_VALUE};
pub use terms::{
    home_position, ConstantReward, FlatTorsoReward, HorizontalMoveSpeedReward,
    JointPostureReward, SmallControlReward, TorsoHeightReward, UprightReward,
    QUAD_STANDING_HEIGHT,
};
