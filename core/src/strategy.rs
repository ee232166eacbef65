//! Named strategy management.
//!
//! A [`StrategySet`] is an ordered registry of `(name, policy)` pairs. The
//! order of registration is the order of columns in the comparison table, and
//! re-registering a name replaces its policy in place.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::backoff::BackoffPolicy;
use crate::sequence::BackoffSequence;

/// A named strategy with a live delay sequence, ready to be sampled.
#[derive(Debug, Clone)]
pub struct Strategy<R = SmallRng> {
    /// Column heading for this strategy
    pub name: String,
    /// Sequence the strategy's delays are drawn from
    pub sequence: BackoffSequence<R>,
}

impl<R: Rng> Strategy<R> {
    pub fn new(name: impl Into<String>, sequence: BackoffSequence<R>) -> Self {
        Self {
            name: name.into(),
            sequence,
        }
    }
}

/// Ordered registry of named [`BackoffPolicy`] values.
///
/// Lookups are linear; a comparison only ever holds a handful of strategies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategySet {
    entries: Vec<(String, BackoffPolicy)>,
}

impl StrategySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, policy: impl Into<BackoffPolicy>) -> Self {
        self.register(name, policy);
        self
    }

    /// Insert or replace a policy under the given name.
    ///
    /// A replaced policy keeps its original position. Returns the previously
    /// registered policy if one existed.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        policy: impl Into<BackoffPolicy>,
    ) -> Option<BackoffPolicy> {
        let name = name.into();
        let policy = policy.into();
        if let Some((_, existing)) = self
            .entries
            .iter_mut()
            .find(|(existing_name, _)| *existing_name == name)
        {
            Some(std::mem::replace(existing, policy))
        } else {
            self.entries.push((name, policy));
            None
        }
    }

    /// Retrieve a policy by name.
    pub fn get(&self, name: &str) -> Option<BackoffPolicy> {
        self.entries
            .iter()
            .find(|(existing_name, _)| existing_name == name)
            .map(|(_, policy)| *policy)
    }

    /// Remove a policy by name, preserving the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<BackoffPolicy> {
        let index = self
            .entries
            .iter()
            .position(|(existing_name, _)| existing_name == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Strategy names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(name, policy)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BackoffPolicy)> {
        self.entries.iter().map(|(name, policy)| (name.as_str(), policy))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start a fresh sequence for every strategy, each with its own
    /// OS-seeded RNG.
    pub fn sequences(&self) -> Vec<Strategy> {
        self.sequences_with(SmallRng::from_os_rng)
    }

    /// Start a fresh sequence for every strategy, drawing one RNG per
    /// strategy from `make_rng`.
    pub fn sequences_with<R, F>(&self, mut make_rng: F) -> Vec<Strategy<R>>
    where
        R: Rng,
        F: FnMut() -> R,
    {
        self.iter()
            .map(|(name, policy)| {
                Strategy::new(name, BackoffSequence::with_rng(*policy, make_rng()))
            })
            .collect()
    }
}
