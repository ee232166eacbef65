//! Stateful delay sequences
//!
//! A [`BackoffSequence`] owns a policy, an RNG and its own attempt counter, so
//! consumers only ever ask for the next delay. It is an [`Iterator`] that ends
//! when the policy runs out of retries.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::backoff::{BackoffPolicy, BackoffStrategy};

/// Iterator over the delays a [`BackoffPolicy`] produces, one per attempt.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use backoff_table::{BackoffSequence, ExponentialBackoff};
///
/// let mut sequence = BackoffSequence::new(
///     ExponentialBackoff::new().base_delay(Duration::from_secs(20)),
/// );
///
/// assert_eq!(sequence.next(), Some(Duration::from_secs(20)));
/// assert_eq!(sequence.next(), Some(Duration::from_secs(40)));
/// assert_eq!(sequence.attempt(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BackoffSequence<R = SmallRng> {
    policy: BackoffPolicy,
    attempt: u32,
    rng: R,
}

impl BackoffSequence<SmallRng> {
    /// Create a sequence with an RNG seeded from the operating system.
    pub fn new(policy: impl Into<BackoffPolicy>) -> Self {
        Self::with_rng(policy, SmallRng::from_os_rng())
    }
}

impl<R: Rng> BackoffSequence<R> {
    /// Create a sequence with a caller-provided RNG, useful for deterministic
    /// testing.
    pub fn with_rng(policy: impl Into<BackoffPolicy>, rng: R) -> Self {
        Self {
            policy: policy.into(),
            attempt: 0,
            rng,
        }
    }

    /// Number of delays produced so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// The policy driving this sequence.
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }
}

impl<R: Rng> Iterator for BackoffSequence<R> {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let delay = self.policy.delay(self.attempt, &mut self.rng)?;
        self.attempt = self.attempt.saturating_add(1);
        Some(delay)
    }
}
