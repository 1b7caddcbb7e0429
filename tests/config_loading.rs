//! Loading reward trees from configuration directories.

use std::fs;
use std::sync::Arc;

use solo_rewards::config::AppConfig;
use solo_rewards::rewards::{Reward, RewardDef};
use solo_rewards::sim::{BodySnapshot, JointState, SnapshotProvider};
use tempfile::TempDir;

const DEFAULT_TOML: &str = r#"
[env]
dt = 0.002

[rewards]
robot_id = 1

[[rewards.terms]]
weight = 1.0
kind = "home_position"
standing_height = 0.3

[[rewards.terms]]
weight = 0.5
kind = "additive"

[[rewards.terms.terms]]
weight = 2.0
kind = "small_control"
margin = 1.0

[[rewards.terms.terms]]
weight = 1.0
kind = "joint_posture"
targets = [0.0]
span = 1.0

[logging]
level = "debug"
"#;

fn config_dir(default_toml: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("default.toml"), default_toml).unwrap();
    dir
}

#[test]
fn loads_reward_tree_from_default_toml() {
    let dir = config_dir(DEFAULT_TOML);
    let config = AppConfig::load_from(dir.path()).unwrap();

    assert_eq!(config.env.dt, 0.002);
    assert_eq!(config.env.motor_torque_limit, 1.5);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.rewards.robot_id, 1);
    assert_eq!(config.rewards.terms.len(), 2);
    assert!(matches!(
        config.rewards.terms[1].reward,
        RewardDef::Additive { ref terms } if terms.len() == 2
    ));
    assert!(config.validate().is_ok());
}

#[test]
fn configured_factory_scores_a_standing_robot() {
    let dir = config_dir(DEFAULT_TOML);
    let config = AppConfig::load_from(dir.path()).unwrap();

    let sim = SnapshotProvider::new(vec![BodySnapshot::new(1)
        .with_position([0.0, 0.0, 0.3])
        .with_joints(vec![JointState::default(); 8])]);
    let factory = config.rewards.build_factory(Arc::new(sim)).unwrap();

    assert_eq!(factory.len(), 2);
    let (_, second) = factory.rewards().nth(1).unwrap();
    assert!(matches!(second, Reward::Additive(_)));

    // 1.0 * 1.0 + 0.5 * (2.0 * 1.0 + 1.0 * 1.0)
    assert_eq!(factory.get_reward().unwrap(), 2.5);
}

#[test]
fn missing_directory_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load_from(dir.path().join("absent")).unwrap();
    assert_eq!(config.rewards.terms.len(), 1);
    assert!(config.validate().is_ok());
}

#[test]
fn invalid_shaping_parameters_fail_validation() {
    let dir = config_dir(
        r#"
[[rewards.terms]]
weight = 1.0
kind = "torso_height"
target_height = 0.3
hard_margin = 0.01
soft_margin = -0.2
"#,
    );
    let config = AppConfig::load_from(dir.path()).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("reward term 0"));
}

#[test]
fn unknown_reward_kind_is_a_config_error() {
    let dir = config_dir(
        r#"
[[rewards.terms]]
weight = 1.0
kind = "backflip"
"#,
    );
    assert!(AppConfig::load_from(dir.path()).is_err());
}
