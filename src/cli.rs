use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{Result, SoloError};
use crate::rewards::Reward;
use crate::sim::SnapshotProvider;

#[derive(Parser)]
#[command(name = "solo-rewards")]
#[command(author = "Solo Rewards Team")]
#[command(version = "0.1.0")]
#[command(about = "Score Solo 8 simulation states with composable rewards", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config directory
    #[arg(short, long, default_value = "config", env = "SOLO_CONFIG_DIR")]
    pub config: PathBuf,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the reward for a recorded simulation state
    Score {
        /// Snapshot file (.json or .toml)
        #[arg(short, long)]
        state: PathBuf,
        /// Print each weighted top-level reward
        #[arg(long)]
        breakdown: bool,
    },
    /// Validate the configured reward tree without scoring anything
    Check,
}

impl Cli {
    /// Load and validate the configuration this invocation points at
    pub fn load_config(&self) -> Result<AppConfig> {
        let config = AppConfig::load_from(&self.config)?;
        config
            .validate()
            .map_err(|errors| SoloError::Validation(errors.join("; ")))?;
        Ok(config)
    }
}

/// Run a parsed command against an already loaded configuration
pub fn run(command: &Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Score { state, breakdown } => score(config, state, *breakdown),
        Commands::Check => check(config),
    }
}

fn score(config: &AppConfig, state: &Path, breakdown: bool) -> Result<()> {
    let provider = SnapshotProvider::load(state)?;
    debug!(
        path = %state.display(),
        bodies = provider.bodies.len(),
        "Loaded simulation snapshot"
    );

    let factory = config.rewards.build_factory(Arc::new(provider))?;

    if breakdown {
        for contribution in factory.breakdown()? {
            println!(
                "{:<28} weight {:>8.4}  value {:>10.6}  weighted {:>10.6}",
                contribution.name,
                contribution.weight,
                contribution.value,
                contribution.weighted()
            );
        }
    }

    let reward = factory.get_reward()?;
    info!(reward, "Scored snapshot");
    println!("{reward:.6}");
    Ok(())
}

fn check(config: &AppConfig) -> Result<()> {
    for term in &config.rewards.terms {
        let reward = term.reward.build(config.rewards.robot_id)?;
        let mut lines = Vec::new();
        tree_lines(&reward, Some(term.weight), 0, &mut lines);
        for line in lines {
            println!("{line}");
        }
    }
    println!(
        "\x1b[32m✓ {} reward term(s) valid\x1b[0m",
        config.rewards.terms.len()
    );
    Ok(())
}

/// Render a reward tree one node per line
///
/// Children of an additive node carry their own weight. A product's
/// coefficient applies to the whole product, so it is shown once on the
/// product's line and its factors are listed bare.
fn tree_lines(reward: &Reward, weight: Option<f64>, depth: usize, lines: &mut Vec<String>) {
    let indent = depth * 2;
    let label = match reward {
        Reward::Multiplicative(product) => {
            format!("{} (coefficient {})", reward.name(), product.coefficient())
        }
        _ => reward.name().to_string(),
    };
    match weight {
        Some(weight) => lines.push(format!("{:indent$}{} × {}", "", weight, label)),
        None => lines.push(format!("{:indent$}{}", "", label)),
    }

    match reward {
        Reward::Leaf(_) => {}
        Reward::Additive(additive) => {
            for (coefficient, term) in additive.terms() {
                tree_lines(term, Some(coefficient), depth + 1, lines);
            }
        }
        Reward::Multiplicative(product) => {
            for term in product.terms() {
                tree_lines(term, None, depth + 1, lines);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::{RewardDef, WeightedRewardDef};
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_score_command() {
        let cli = Cli::try_parse_from([
            "solo-rewards",
            "--config",
            "conf",
            "score",
            "--state",
            "state.json",
            "--breakdown",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("conf"));
        match cli.command {
            Commands::Score { state, breakdown } => {
                assert_eq!(state, PathBuf::from("state.json"));
                assert!(breakdown);
            }
            Commands::Check => panic!("expected score command"),
        }
    }

    #[test]
    fn test_check_default_config() {
        assert!(check(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_tree_lines_show_product_coefficient_once() {
        let reward = RewardDef::Additive {
            terms: vec![
                WeightedRewardDef::new(0.5, RewardDef::Upright),
                WeightedRewardDef::new(
                    2.0,
                    RewardDef::Multiplicative {
                        coefficient: 3.0,
                        terms: vec![
                            RewardDef::Constant { value: 1.0 },
                            RewardDef::Upright,
                        ],
                    },
                ),
            ],
        }
        .build(0)
        .unwrap();

        let mut lines = Vec::new();
        tree_lines(&reward, Some(1.0), 0, &mut lines);
        assert_eq!(
            lines,
            vec![
                "1 × AdditiveReward",
                "  0.5 × UprightReward",
                "  2 × MultiplicativeReward (coefficient 3)",
                "    ConstantReward",
                "    UprightReward",
            ]
        );
    }

    #[test]
    fn test_score_missing_snapshot_is_io_error() {
        let err = score(
            &AppConfig::default(),
            Path::new("/nonexistent/state.json"),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, SoloError::Io(_)));
    }
}
