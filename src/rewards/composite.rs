//! Aggregating rewards
//!
//! [`AdditiveReward`] sums weighted terms, [`MultiplicativeReward`] scales a
//! product of terms. Both are themselves [`Reward`] nodes and nest freely.

use tracing::trace;

use super::reward::{Binding, Reward};
use crate::error::{RewardError, RewardResult};
use crate::sim::SharedProvider;

/// `Σ coefficient_i · term_i`
#[derive(Debug, Default)]
pub struct AdditiveReward {
    terms: Vec<(f64, Reward)>,
    binding: Binding,
}

impl AdditiveReward {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a weighted term, binding it to this reward's provider if one is set
    pub fn add_term(&mut self, coefficient: f64, reward: impl Into<Reward>) {
        let mut reward = reward.into();
        if let Ok(provider) = self.binding.get() {
            reward.bind(provider.clone());
        }
        trace!(
            coefficient,
            term = reward.name(),
            count = self.terms.len() + 1,
            "Added additive term"
        );
        self.terms.push((coefficient, reward));
    }

    /// Builder form of [`add_term`](Self::add_term)
    pub fn with_term(mut self, coefficient: f64, reward: impl Into<Reward>) -> Self {
        self.add_term(coefficient, reward);
        self
    }

    pub fn terms(&self) -> impl Iterator<Item = (f64, &Reward)> {
        self.terms.iter().map(|(coefficient, reward)| (*coefficient, reward))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn bind(&mut self, provider: SharedProvider) {
        for (_, term) in &mut self.terms {
            term.bind(provider.clone());
        }
        self.binding.set(provider);
    }

    pub fn provider(&self) -> RewardResult<&SharedProvider> {
        self.binding.get()
    }

    pub fn compute(&self) -> RewardResult<f64> {
        if self.terms.is_empty() {
            return Err(RewardError::EmptyAggregation {
                aggregator: "AdditiveReward",
            });
        }

        let mut total = 0.0;
        for (coefficient, term) in &self.terms {
            total += coefficient * term.compute()?;
        }
        Ok(total)
    }
}

/// `coefficient · Π term_i`, with terms fixed at construction
#[derive(Debug)]
pub struct MultiplicativeReward {
    coefficient: f64,
    terms: Vec<Reward>,
    binding: Binding,
}

impl MultiplicativeReward {
    pub fn new(coefficient: f64, terms: impl IntoIterator<Item = Reward>) -> Self {
        Self {
            coefficient,
            terms: terms.into_iter().collect(),
            binding: Binding::unbound(),
        }
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn terms(&self) -> &[Reward] {
        &self.terms
    }

    pub fn bind(&mut self, provider: SharedProvider) {
        for term in &mut self.terms {
            term.bind(provider.clone());
        }
        self.binding.set(provider);
    }

    pub fn provider(&self) -> RewardResult<&SharedProvider> {
        self.binding.get()
    }

    pub fn compute(&self) -> RewardResult<f64> {
        if self.terms.is_empty() {
            return Err(RewardError::EmptyAggregation {
                aggregator: "MultiplicativeReward",
            });
        }

        let mut product = self.coefficient;
        for term in &self.terms {
            product *= term.compute()?;
        }
        Ok(product)
    }
}
