//! Reward Factory
//!
//! Top-level aggregator owned by an environment. Holds the weighted list of
//! rewards registered during setup and reduces them to one scalar per step.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::reward::Reward;
use crate::error::{RewardError, RewardResult};
use crate::sim::SharedProvider;

/// One weighted top-level term of a step's reward
#[derive(Debug, Clone, PartialEq)]
pub struct RewardContribution {
    pub name: &'static str,
    pub weight: f64,
    /// Unweighted term value
    pub value: f64,
}

impl RewardContribution {
    pub fn weighted(&self) -> f64 {
        self.weight * self.value
    }
}

/// Weighted sum of registered rewards over a single shared provider
pub struct RewardFactory {
    provider: SharedProvider,
    rewards: Vec<(f64, Reward)>,
}

impl fmt::Debug for RewardFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewardFactory")
            .field("provider", &Arc::as_ptr(&self.provider))
            .field("rewards", &self.rewards)
            .finish()
    }
}

impl RewardFactory {
    pub fn new(provider: SharedProvider) -> Self {
        Self {
            provider,
            rewards: Vec::new(),
        }
    }

    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    /// Bind `reward` to this factory's provider and append it with `weight`
    pub fn register_reward(&mut self, weight: f64, mut reward: Reward) {
        reward.bind(self.provider.clone());
        debug!(
            weight,
            reward = reward.name(),
            registered = self.rewards.len() + 1,
            "Registered reward"
        );
        self.rewards.push((weight, reward));
    }

    pub fn rewards(&self) -> impl Iterator<Item = (f64, &Reward)> {
        self.rewards.iter().map(|(weight, reward)| (*weight, reward))
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// `Σ weight_i · reward_i` for the current simulation step
    pub fn get_reward(&self) -> RewardResult<f64> {
        let total: f64 = self
            .breakdown()?
            .iter()
            .map(RewardContribution::weighted)
            .sum();
        trace!(reward = total, "Computed step reward");
        Ok(total)
    }

    /// Per-reward values for the current step, in registration order
    pub fn breakdown(&self) -> RewardResult<Vec<RewardContribution>> {
        if self.rewards.is_empty() {
            warn!("Reward requested before any reward was registered");
            return Err(RewardError::EmptyAggregation {
                aggregator: "RewardFactory",
            });
        }

        self.rewards
            .iter()
            .map(|(weight, reward)| {
                let value = reward.compute().map_err(|e| {
                    warn!(reward = reward.name(), error = %e, "Reward computation failed");
                    e
                })?;
                Ok(RewardContribution {
                    name: reward.name(),
                    weight: *weight,
                    value,
                })
            })
            .collect()
    }
}
