//! Backoff strategy implementations
//!
//! Each strategy is a pure function from an attempt index (0-indexed) to the
//! delay that would be waited before that retry. Stateful iteration over the
//! sequence lives in [`crate::sequence`].

use std::time::Duration;

use rand::Rng;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Trait for backoff strategies that calculate delays between retry attempts
pub trait BackoffStrategy {
    /// Calculate the delay for the given attempt number
    ///
    /// # Arguments
    ///
    /// * `attempt` - Attempt number (0-indexed)
    /// * `rng` - Random number generator for jitter
    ///
    /// # Returns
    ///
    /// The delay, or `None` once the strategy has run out of retries
    fn delay<R: Rng>(&self, attempt: u32, rng: &mut R) -> Option<Duration>;

    /// Maximum number of retries permitted, `None` when unlimited.
    fn retry_limit(&self) -> Option<u32>;
}

fn within_limit(limit: Option<u32>, attempt: u32) -> bool {
    limit.is_none_or(|max| attempt < max)
}

/// Build a duration from a nanosecond count, saturating at [`Duration::MAX`].
fn from_nanos_saturating(nanos: u128) -> Duration {
    match u64::try_from(nanos / NANOS_PER_SEC) {
        Ok(secs) => Duration::new(secs, (nanos % NANOS_PER_SEC) as u32),
        Err(_) => Duration::MAX,
    }
}

/// Multiply `base` by `factor` without overflowing.
fn scale(base: Duration, factor: Option<u128>) -> Duration {
    if base.is_zero() {
        return Duration::ZERO;
    }

    factor
        .and_then(|factor| base.as_nanos().checked_mul(factor))
        .map_or(Duration::MAX, from_nanos_saturating)
}

/// Perturb `value` by a uniformly drawn offset in `[-percent%, +percent%]`,
/// with `percent` clamped to 100.
fn apply_jitter<R: Rng>(value: Duration, percent: u32, rng: &mut R) -> Duration {
    let nanos = value.as_nanos();
    let top = nanos.saturating_mul(u128::from(percent.min(100))) / 100;
    if top == 0 {
        return value;
    }

    let offset = rng.random_range(0..=top.saturating_mul(2));
    from_nanos_saturating((nanos - top).saturating_add(offset))
}

fn cap(value: Duration, max_delay: Option<Duration>) -> Duration {
    match max_delay {
        Some(max) => value.min(max),
        None => value,
    }
}

/// Constant backoff strategy with fixed delay
///
/// All retry delays are the same value.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use backoff_table::ConstantBackoff;
///
/// let backoff = ConstantBackoff::new()
///     .interval(Duration::from_secs(3600))
///     .max_retries(5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantBackoff {
    /// Fixed delay between attempts
    pub interval: Duration,
    /// Jitter applied to every delay, as a percentage (0 to 100)
    pub jitter_percent: u32,
    /// Maximum number of retries, `None` for unlimited
    pub max_retries: Option<u32>,
}

impl ConstantBackoff {
    /// Create a new constant backoff builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the constant delay
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the jitter percentage, clamped to 100
    pub fn jitter_percent(mut self, percent: u32) -> Self {
        self.jitter_percent = percent.min(100);
        self
    }

    /// Limit the number of retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

impl Default for ConstantBackoff {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            jitter_percent: 0,
            max_retries: None,
        }
    }
}

impl BackoffStrategy for ConstantBackoff {
    fn delay<R: Rng>(&self, attempt: u32, rng: &mut R) -> Option<Duration> {
        if !within_limit(self.max_retries, attempt) {
            return None;
        }

        Some(apply_jitter(self.interval, self.jitter_percent, rng))
    }

    fn retry_limit(&self) -> Option<u32> {
        self.max_retries
    }
}

/// Exponential backoff strategy with optional cap and jitter
///
/// Delays double on every attempt: `base_delay * 2^attempt`. Jitter is applied
/// to the raw exponential value first, then the result is clamped to
/// `max_delay`, so a capped sequence never exceeds its ceiling.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use backoff_table::ExponentialBackoff;
///
/// let backoff = ExponentialBackoff::new()
///     .base_delay(Duration::from_secs(20))
///     .max_delay(Duration::from_secs(7200))
///     .jitter_percent(10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialBackoff {
    /// Delay returned for the first attempt
    pub base_delay: Duration,
    /// Maximum delay cap, `None` for unbounded growth
    pub max_delay: Option<Duration>,
    /// Jitter applied before capping, as a percentage (0 to 100)
    pub jitter_percent: u32,
    /// Maximum number of retries, `None` for unlimited
    pub max_retries: Option<u32>,
}

impl ExponentialBackoff {
    /// Create a new exponential backoff builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base delay
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the maximum delay cap
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the jitter percentage, clamped to 100
    pub fn jitter_percent(mut self, percent: u32) -> Self {
        self.jitter_percent = percent.min(100);
        self
    }

    /// Limit the number of retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(100),
            max_delay: None,
            jitter_percent: 0,
            max_retries: None,
        }
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn delay<R: Rng>(&self, attempt: u32, rng: &mut R) -> Option<Duration> {
        if !within_limit(self.max_retries, attempt) {
            return None;
        }

        let exponential = scale(self.base_delay, 2u128.checked_pow(attempt));
        let jittered = apply_jitter(exponential, self.jitter_percent, rng);

        Some(cap(jittered, self.max_delay))
    }

    fn retry_limit(&self) -> Option<u32> {
        self.max_retries
    }
}

/// Fibonacci backoff strategy
///
/// Delays follow the Fibonacci sequence: 1, 1, 2, 3, 5, 8, 13, ...
/// Each delay is `base_delay * fibonacci(attempt + 1)`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use backoff_table::FibonacciBackoff;
///
/// let backoff = FibonacciBackoff::new()
///     .base_delay(Duration::from_millis(100)) // 100ms, 100ms, 200ms, 300ms, 500ms...
///     .max_delay(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibonacciBackoff {
    /// Base delay, multiplied by the Fibonacci number
    pub base_delay: Duration,
    /// Maximum delay cap, `None` for unbounded growth
    pub max_delay: Option<Duration>,
    /// Jitter applied before capping, as a percentage (0 to 100)
    pub jitter_percent: u32,
    /// Maximum number of retries, `None` for unlimited
    pub max_retries: Option<u32>,
}

impl FibonacciBackoff {
    /// Create a new Fibonacci backoff builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base delay
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the maximum delay cap
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the jitter percentage, clamped to 100
    pub fn jitter_percent(mut self, percent: u32) -> Self {
        self.jitter_percent = percent.min(100);
        self
    }

    /// Limit the number of retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Calculate the nth Fibonacci number (1-indexed), saturating on overflow
    fn fibonacci(n: u32) -> u128 {
        match n {
            0 => 0,
            1 | 2 => 1,
            _ => {
                let mut a = 1u128;
                let mut b = 1u128;
                for _ in 2..n {
                    let next = a.saturating_add(b);
                    a = b;
                    b = next;
                }
                b
            }
        }
    }
}

impl Default for FibonacciBackoff {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(100),
            max_delay: None,
            jitter_percent: 0,
            max_retries: None,
        }
    }
}

impl BackoffStrategy for FibonacciBackoff {
    fn delay<R: Rng>(&self, attempt: u32, rng: &mut R) -> Option<Duration> {
        if !within_limit(self.max_retries, attempt) {
            return None;
        }

        let fib = Self::fibonacci(attempt.saturating_add(1));
        let raw = scale(self.base_delay, Some(fib));
        let jittered = apply_jitter(raw, self.jitter_percent, rng);

        Some(cap(jittered, self.max_delay))
    }

    fn retry_limit(&self) -> Option<u32> {
        self.max_retries
    }
}

/// Backoff policy that can represent any supported strategy.
///
/// The enum form makes it possible to store heterogeneous strategies in a
/// [`StrategySet`](crate::StrategySet) without dynamic dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackoffPolicy {
    /// Constant backoff policy
    Constant(ConstantBackoff),
    /// Exponential backoff policy, capped or not
    Exponential(ExponentialBackoff),
    /// Fibonacci backoff policy
    Fibonacci(FibonacciBackoff),
}

impl BackoffPolicy {
    /// Return the delay ceiling of the wrapped strategy, if any.
    pub fn max_delay(&self) -> Option<Duration> {
        match self {
            BackoffPolicy::Constant(_) => None,
            BackoffPolicy::Exponential(policy) => policy.max_delay,
            BackoffPolicy::Fibonacci(policy) => policy.max_delay,
        }
    }

    /// Return the jitter percentage of the wrapped strategy.
    pub fn jitter_percent(&self) -> u32 {
        match self {
            BackoffPolicy::Constant(policy) => policy.jitter_percent,
            BackoffPolicy::Exponential(policy) => policy.jitter_percent,
            BackoffPolicy::Fibonacci(policy) => policy.jitter_percent,
        }
    }
}

impl BackoffStrategy for BackoffPolicy {
    fn delay<R: Rng>(&self, attempt: u32, rng: &mut R) -> Option<Duration> {
        match self {
            BackoffPolicy::Constant(policy) => policy.delay(attempt, rng),
            BackoffPolicy::Exponential(policy) => policy.delay(attempt, rng),
            BackoffPolicy::Fibonacci(policy) => policy.delay(attempt, rng),
        }
    }

    fn retry_limit(&self) -> Option<u32> {
        match self {
            BackoffPolicy::Constant(policy) => policy.retry_limit(),
            BackoffPolicy::Exponential(policy) => policy.retry_limit(),
            BackoffPolicy::Fibonacci(policy) => policy.retry_limit(),
        }
    }
}

impl From<ConstantBackoff> for BackoffPolicy {
    fn from(value: ConstantBackoff) -> Self {
        BackoffPolicy::Constant(value)
    }
}

impl From<ExponentialBackoff> for BackoffPolicy {
    fn from(value: ExponentialBackoff) -> Self {
        BackoffPolicy::Exponential(value)
    }
}

impl From<FibonacciBackoff> for BackoffPolicy {
    fn from(value: FibonacciBackoff) -> Self {
        BackoffPolicy::Fibonacci(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_exponential_backoff_builder() {
        let backoff = ExponentialBackoff::new()
            .base_delay(Duration::from_millis(200))
            .max_delay(Duration::from_secs(5))
            .max_retries(5)
            .jitter_percent(150);

        assert_eq!(backoff.base_delay, Duration::from_millis(200));
        assert_eq!(backoff.max_delay, Some(Duration::from_secs(5)));
        assert_eq!(backoff.max_retries, Some(5));
        assert_eq!(backoff.jitter_percent, 100);
    }

    #[test]
    fn test_constant_backoff() {
        let backoff = ConstantBackoff::new().interval(Duration::from_secs(3600));
        let mut rng = SmallRng::seed_from_u64(42);

        for attempt in 0..50 {
            assert_eq!(
                backoff.delay(attempt, &mut rng),
                Some(Duration::from_secs(3600))
            );
        }
    }

    #[test]
    fn test_exponential_delays() {
        let backoff = ExponentialBackoff::new().base_delay(20 * SECOND);
        let mut rng = SmallRng::seed_from_u64(42);

        assert_eq!(backoff.delay(0, &mut rng), Some(20 * SECOND));
        assert_eq!(backoff.delay(1, &mut rng), Some(40 * SECOND));
        assert_eq!(backoff.delay(2, &mut rng), Some(80 * SECOND));
        assert_eq!(backoff.delay(19, &mut rng), Some(20 * SECOND * (1 << 19)));
    }

    #[test]
    fn test_exponential_saturates_instead_of_overflowing() {
        let backoff = ExponentialBackoff::new().base_delay(20 * SECOND);
        let mut rng = SmallRng::seed_from_u64(42);

        assert_eq!(backoff.delay(200, &mut rng), Some(Duration::MAX));
        assert_eq!(backoff.delay(u32::MAX, &mut rng), Some(Duration::MAX));
    }

    #[test]
    fn test_capped_exponential_clamps_to_ceiling() {
        let cap = Duration::from_secs(7200);
        let backoff = ExponentialBackoff::new()
            .base_delay(20 * SECOND)
            .max_delay(cap);
        let mut rng = SmallRng::seed_from_u64(42);

        // 20s * 2^8 = 5120s is the last uncapped value, 2^9 would be 10240s
        assert_eq!(backoff.delay(8, &mut rng), Some(Duration::from_secs(5120)));
        for attempt in 9..64 {
            assert_eq!(backoff.delay(attempt, &mut rng), Some(cap));
        }
    }

    #[test]
    fn test_jitter_stays_within_percentage() {
        let base = Duration::from_secs(1000);
        let backoff = ConstantBackoff::new().interval(base).jitter_percent(10);
        let mut rng = SmallRng::seed_from_u64(7);

        let delays: Vec<Duration> = (0..200)
            .filter_map(|attempt| backoff.delay(attempt, &mut rng))
            .collect();

        assert!(delays.iter().all(|d| *d >= Duration::from_secs(900)));
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(1100)));
        assert!(
            delays.windows(2).any(|w| w[0] != w[1]),
            "jitter should produce varying delays"
        );
    }

    #[test]
    fn test_jitter_applied_before_cap() {
        let cap = Duration::from_secs(7200);
        let backoff = ExponentialBackoff::new()
            .base_delay(20 * SECOND)
            .max_delay(cap)
            .jitter_percent(10);
        let mut rng = SmallRng::seed_from_u64(42);

        for attempt in 0..40 {
            let delay = backoff.delay(attempt, &mut rng).unwrap();
            let unjittered = (20 * SECOND * 2u32.pow(attempt.min(20))).min(cap);

            assert!(delay <= cap, "attempt {attempt}: {delay:?} exceeds cap");
            assert!(
                delay.as_nanos() * 10 >= unjittered.as_nanos() * 9,
                "attempt {attempt}: {delay:?} below jitter range"
            );
            assert!(
                delay.as_nanos() * 10 <= unjittered.as_nanos() * 11,
                "attempt {attempt}: {delay:?} above jitter range"
            );
        }
    }

    #[test]
    fn test_zero_jitter_is_exact() {
        let backoff = ConstantBackoff::new()
            .interval(Duration::from_millis(1500))
            .jitter_percent(0);
        let mut rng = SmallRng::seed_from_u64(1);

        assert_eq!(backoff.delay(0, &mut rng), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_max_retries_stops_sequence() {
        let backoff = ConstantBackoff::new()
            .interval(Duration::from_millis(500))
            .max_retries(3);
        let mut rng = SmallRng::seed_from_u64(42);

        assert!(within_limit(backoff.retry_limit(), 2));
        assert!(!within_limit(backoff.retry_limit(), 3));
        assert_eq!(backoff.delay(2, &mut rng), Some(Duration::from_millis(500)));
        assert_eq!(backoff.delay(3, &mut rng), None);
    }

    #[test]
    fn test_jitter_percent_over_100_is_clamped() {
        let base = Duration::from_secs(20);
        let exponential = ExponentialBackoff {
            jitter_percent: 150,
            ..ExponentialBackoff::new().base_delay(base)
        };
        let constant = ConstantBackoff {
            interval: base,
            jitter_percent: u32::MAX,
            max_retries: None,
        };
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..50 {
            let delay = exponential.delay(0, &mut rng).unwrap();
            assert!(delay <= 2 * base, "{delay:?} beyond full jitter");

            let delay = constant.delay(0, &mut rng).unwrap();
            assert!(delay <= 2 * base, "{delay:?} beyond full jitter");
        }
    }

    #[test]
    fn test_zero_base_delay_stays_zero() {
        let exponential = ExponentialBackoff::new().base_delay(Duration::ZERO);
        let fibonacci = FibonacciBackoff::new()
            .base_delay(Duration::ZERO)
            .jitter_percent(10);
        let mut rng = SmallRng::seed_from_u64(42);

        for attempt in [0, 127, 128, 200, u32::MAX] {
            assert_eq!(exponential.delay(attempt, &mut rng), Some(Duration::ZERO));
        }
        for attempt in [0, 10, 200] {
            assert_eq!(fibonacci.delay(attempt, &mut rng), Some(Duration::ZERO));
        }
    }

    #[test]
    fn test_fibonacci_sequence() {
        assert_eq!(FibonacciBackoff::fibonacci(1), 1);
        assert_eq!(FibonacciBackoff::fibonacci(2), 1);
        assert_eq!(FibonacciBackoff::fibonacci(3), 2);
        assert_eq!(FibonacciBackoff::fibonacci(4), 3);
        assert_eq!(FibonacciBackoff::fibonacci(5), 5);
        assert_eq!(FibonacciBackoff::fibonacci(6), 8);
        assert_eq!(FibonacciBackoff::fibonacci(7), 13);
    }

    #[test]
    fn test_fibonacci_backoff() {
        let backoff = FibonacciBackoff::new()
            .base_delay(Duration::from_millis(100))
            .max_delay(Duration::from_millis(250));
        let mut rng = SmallRng::seed_from_u64(42);

        assert_eq!(backoff.delay(0, &mut rng), Some(Duration::from_millis(100)));
        assert_eq!(backoff.delay(1, &mut rng), Some(Duration::from_millis(100)));
        assert_eq!(backoff.delay(2, &mut rng), Some(Duration::from_millis(200)));
        assert_eq!(backoff.delay(3, &mut rng), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_policy_dispatch() {
        let policy = BackoffPolicy::from(
            ExponentialBackoff::new()
                .base_delay(SECOND)
                .max_delay(4 * SECOND)
                .max_retries(10),
        );
        let mut rng = SmallRng::seed_from_u64(42);

        assert_eq!(policy.max_delay(), Some(4 * SECOND));
        assert_eq!(policy.retry_limit(), Some(10));
        assert_eq!(policy.jitter_percent(), 0);
        assert_eq!(policy.delay(1, &mut rng), Some(2 * SECOND));
        assert_eq!(policy.delay(5, &mut rng), Some(4 * SECOND));
        assert_eq!(policy.delay(10, &mut rng), None);
    }
}
