//! Reward capability
//!
//! A [`Reward`] is a tree: physical leaf terms at the bottom, additive and
//! multiplicative aggregators above them. Every node carries a [`Binding`]
//! to the simulation provider it reads from; binding a node rebinds its whole
//! subtree immediately.

use std::fmt;

use super::composite::{AdditiveReward, MultiplicativeReward};
use crate::error::{RewardError, RewardResult};
use crate::sim::{SharedProvider, SimulationProvider};

/// A single interpretable score computed from simulation state
///
/// Implementors must be pure with respect to the provider: no mutation,
/// no memory of earlier calls.
pub trait RewardTerm: Send + Sync + fmt::Debug {
    /// Human-readable name for logging and breakdowns
    fn name(&self) -> &'static str;

    /// Score the current simulation step
    fn compute(&self, sim: &dyn SimulationProvider) -> RewardResult<f64>;
}

/// Zero-or-one bound simulation provider
#[derive(Clone, Default)]
pub struct Binding {
    provider: Option<SharedProvider>,
}

impl Binding {
    pub fn unbound() -> Self {
        Self { provider: None }
    }

    pub fn set(&mut self, provider: SharedProvider) {
        self.provider = Some(provider);
    }

    pub fn get(&self) -> RewardResult<&SharedProvider> {
        self.provider.as_ref().ok_or(RewardError::UnboundReward)
    }

    pub fn is_bound(&self) -> bool {
        self.provider.is_some()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.provider {
            Some(provider) => write!(f, "Bound({:p})", std::sync::Arc::as_ptr(provider)),
            None => f.write_str("Unbound"),
        }
    }
}

/// A leaf term together with its provider binding
#[derive(Debug)]
pub struct LeafReward {
    term: Box<dyn RewardTerm>,
    binding: Binding,
}

impl LeafReward {
    pub fn new(term: impl RewardTerm + 'static) -> Self {
        Self {
            term: Box::new(term),
            binding: Binding::unbound(),
        }
    }

    pub fn term(&self) -> &dyn RewardTerm {
        self.term.as_ref()
    }
}

/// Any node of a reward tree
#[derive(Debug)]
pub enum Reward {
    Leaf(LeafReward),
    Additive(AdditiveReward),
    Multiplicative(MultiplicativeReward),
}

impl Reward {
    /// Wrap a physical term as an unbound leaf
    pub fn leaf(term: impl RewardTerm + 'static) -> Self {
        Reward::Leaf(LeafReward::new(term))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Reward::Leaf(leaf) => leaf.term.name(),
            Reward::Additive(_) => "AdditiveReward",
            Reward::Multiplicative(_) => "MultiplicativeReward",
        }
    }

    /// Attach `provider` to this node and, for aggregators, every current term
    pub fn bind(&mut self, provider: SharedProvider) {
        match self {
            Reward::Leaf(leaf) => leaf.binding.set(provider),
            Reward::Additive(additive) => additive.bind(provider),
            Reward::Multiplicative(multiplicative) => multiplicative.bind(provider),
        }
    }

    /// The bound provider, or `UnboundReward`
    pub fn provider(&self) -> RewardResult<&SharedProvider> {
        match self {
            Reward::Leaf(leaf) => leaf.binding.get(),
            Reward::Additive(additive) => additive.provider(),
            Reward::Multiplicative(multiplicative) => multiplicative.provider(),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.provider().is_ok()
    }

    pub fn compute(&self) -> RewardResult<f64> {
        match self {
            Reward::Leaf(leaf) => {
                let provider = leaf.binding.get()?;
                leaf.term.compute(provider.as_ref())
            }
            Reward::Additive(additive) => additive.compute(),
            Reward::Multiplicative(multiplicative) => multiplicative.compute(),
        }
    }
}

impl From<AdditiveReward> for Reward {
    fn from(reward: AdditiveReward) -> Self {
        Reward::Additive(reward)
    }
}

impl From<MultiplicativeReward> for Reward {
    fn from(reward: MultiplicativeReward) -> Self {
        Reward::Multiplicative(reward)
    }
}

impl From<LeafReward> for Reward {
    fn from(reward: LeafReward) -> Self {
        Reward::Leaf(reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::terms::ConstantReward;
    use crate::sim::{same_provider, SnapshotProvider};
    use std::sync::Arc;

    #[test]
    fn test_unbound_provider_errors() {
        let reward = Reward::leaf(ConstantReward::new(0.0));
        assert_eq!(reward.provider().unwrap_err(), RewardError::UnboundReward);
        assert!(!reward.is_bound());
    }

    #[test]
    fn test_unbound_compute_errors() {
        let reward = Reward::leaf(ConstantReward::new(1.0));
        assert_eq!(reward.compute().unwrap_err(), RewardError::UnboundReward);
    }

    #[test]
    fn test_bind_then_compute() {
        let provider: SharedProvider = Arc::new(SnapshotProvider::default());
        let mut reward = Reward::leaf(ConstantReward::new(2.5));
        reward.bind(Arc::clone(&provider));

        assert!(same_provider(reward.provider().unwrap(), &provider));
        assert_eq!(reward.compute().unwrap(), 2.5);
    }

    #[test]
    fn test_rebind_replaces_provider() {
        let first: SharedProvider = Arc::new(SnapshotProvider::default());
        let second: SharedProvider = Arc::new(SnapshotProvider::default());
        let mut reward = Reward::leaf(ConstantReward::new(1.0));

        reward.bind(Arc::clone(&first));
        reward.bind(Arc::clone(&second));

        assert!(same_provider(reward.provider().unwrap(), &second));
        assert!(!same_provider(reward.provider().unwrap(), &first));
    }

    #[test]
    fn test_compute_is_repeatable() {
        let mut reward = Reward::leaf(ConstantReward::new(0.75));
        reward.bind(Arc::new(SnapshotProvider::default()));
        let first = reward.compute().unwrap();
        let second = reward.compute().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_binding_debug_format() {
        assert_eq!(format!("{:?}", Binding::unbound()), "Unbound");
    }
}
