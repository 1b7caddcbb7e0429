use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::RewardResult;
use crate::rewards::{RewardDef, RewardFactory, WeightedRewardDef, QUAD_STANDING_HEIGHT};
use crate::sim::{BodyId, SharedProvider};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub env: Solo8Config,
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Physical setup of a Solo 8 simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Solo8Config {
    /// Fixed simulation timestep in seconds
    pub dt: f64,
    /// Maximum motor torque (N·m)
    pub motor_torque_limit: f64,
    /// Base position at reset
    pub robot_start_pos: [f64; 3],
    /// Base roll/pitch/yaw at reset (rad)
    pub robot_start_orientation_euler: [f64; 3],
    pub gravity: [f64; 3],
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub restitution: f64,
    pub lateral_friction: f64,
    /// Robot description, relative to the asset directory
    pub urdf_path: String,
}

impl Default for Solo8Config {
    fn default() -> Self {
        Self {
            dt: 1e-3,
            motor_torque_limit: 1.5,
            robot_start_pos: [0.0, 0.0, 0.5],
            robot_start_orientation_euler: [0.0, 0.0, 0.0],
            gravity: [0.0, 0.0, -9.81],
            linear_damping: 0.04,
            angular_damping: 0.04,
            restitution: 0.0,
            lateral_friction: 0.5,
            urdf_path: "assets/solo8_URDF_v2/solo8_URDF_v2.urdf".to_string(),
        }
    }
}

/// Weighted top-level rewards for an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardsConfig {
    /// Body the reward terms read from
    #[serde(default)]
    pub robot_id: BodyId,
    #[serde(default = "default_reward_terms")]
    pub terms: Vec<WeightedRewardDef>,
}

fn default_reward_terms() -> Vec<WeightedRewardDef> {
    vec![WeightedRewardDef::new(
        1.0,
        RewardDef::HomePosition {
            standing_height: QUAD_STANDING_HEIGHT,
        },
    )]
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            robot_id: 0,
            terms: default_reward_terms(),
        }
    }
}

impl RewardsConfig {
    /// Build every configured reward and register it on a new factory
    pub fn build_factory(&self, provider: SharedProvider) -> RewardResult<RewardFactory> {
        let mut factory = RewardFactory::new(provider);
        for term in &self.terms {
            factory.register_reward(term.weight, term.reward.build(self.robot_id)?);
        }
        debug!(
            robot_id = self.robot_id,
            rewards = factory.len(),
            "Built reward factory from config"
        );
        Ok(factory)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/training.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("SOLO_PROFILE").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (SOLO_ENV__DT, SOLO_LOGGING__LEVEL, etc.)
            .add_source(
                Environment::with_prefix("SOLO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // Validate simulation params
        if !(self.env.dt > 0.0) {
            errors.push(format!("dt must be positive, got {}", self.env.dt));
        }

        if !(self.env.motor_torque_limit > 0.0) {
            errors.push("motor_torque_limit must be positive".to_string());
        }

        for (name, value) in [
            ("linear_damping", self.env.linear_damping),
            ("angular_damping", self.env.angular_damping),
            ("restitution", self.env.restitution),
            ("lateral_friction", self.env.lateral_friction),
        ] {
            if !(value >= 0.0) {
                errors.push(format!("{name} must be non-negative, got {value}"));
            }
        }

        // Validate rewards
        if self.rewards.terms.is_empty() {
            errors.push("at least one reward term must be configured".to_string());
        }

        for (idx, term) in self.rewards.terms.iter().enumerate() {
            if !term.weight.is_finite() {
                errors.push(format!("reward term {idx}: weight must be finite"));
            }
            if let Err(e) = term.reward.build(self.rewards.robot_id) {
                errors.push(format!("reward term {idx}: {e}"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
