pub mod cli;
pub mod config;
pub mod error;
pub mod rewards;
pub mod sim;

pub use config::{AppConfig, RewardsConfig, Solo8Config};
pub use error::{Result, RewardError, RewardResult, SoloError};
pub use rewards::{
    linear, tolerance, AdditiveReward, MultiplicativeReward, Reward, RewardFactory, RewardTerm,
    Sigmoid, Tolerance,
};
pub use sim::{SharedProvider, SimulationProvider, SnapshotProvider};
