//! Per-identifier login failure tracking with temporary lockout.

use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Time source for the tracker. Injectable so tests can simulate the
/// lockout window elapsing instead of sleeping through it.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Lockout policy knobs.
#[derive(Debug, Clone)]
pub struct LockoutConfig {
    /// Failures tolerated before the identifier is locked.
    pub max_attempts: u32,

    /// How long the lock holds after the last failure.
    pub lockout_duration: Duration,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_duration: Duration::minutes(15),
        }
    }
}

/// Consecutive-failure record for one identifier.
#[derive(Debug, Clone)]
struct LockoutEntry {
    failure_count: u32,
    last_failure_at: DateTime<Utc>,
}

/// Outcome of a lockout check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockoutDecision {
    /// Attempt may proceed.
    Allowed,

    /// Identifier is locked out.
    Locked { retry_after_minutes: i64 },
}

impl LockoutDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, LockoutDecision::Allowed)
    }
}

/// In-memory map from login identifier to its consecutive-failure state.
///
/// Entries are keyed by the raw identifier string rather than a user id,
/// so unknown emails are tracked exactly like real ones and the login
/// path stays behaviorally identical for both.
///
/// All three operations take the write lock up front, so a check and the
/// increment racing it for the same identifier cannot interleave and lose
/// updates.
pub struct LockoutTracker {
    entries: RwLock<HashMap<String, LockoutEntry>>,
    config: LockoutConfig,
    clock: Clock,
}

impl LockoutTracker {
    /// Create a tracker driven by the system clock.
    pub fn new(config: LockoutConfig) -> Self {
        Self::with_clock(config, Arc::new(Utc::now))
    }

    /// Create a tracker with an injected clock.
    pub fn with_clock(config: LockoutConfig, clock: Clock) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
            clock,
        }
    }

    /// Check whether `identifier` may attempt a login right now.
    ///
    /// An entry whose lockout window has elapsed is discarded here, so a
    /// stale lock never outlives its window.
    pub async fn check(&self, identifier: &str) -> LockoutDecision {
        let now = (self.clock)();
        let mut entries = self.entries.write().await;

        let Some(entry) = entries.get(identifier) else {
            return LockoutDecision::Allowed;
        };

        if entry.failure_count >= self.config.max_attempts {
            let lockout_end = entry.last_failure_at + self.config.lockout_duration;
            if now < lockout_end {
                let retry_after_minutes = (lockout_end - now).num_seconds() / 60;
                return LockoutDecision::Locked { retry_after_minutes };
            }
            // Window elapsed: treat as reset.
            entries.remove(identifier);
        }

        LockoutDecision::Allowed
    }

    /// Record a failed attempt for `identifier`.
    pub async fn record_failure(&self, identifier: &str) {
        let now = (self.clock)();
        let mut entries = self.entries.write().await;

        let entry = entries
            .entry(identifier.to_string())
            .or_insert_with(|| LockoutEntry {
                failure_count: 0,
                last_failure_at: now,
            });

        entry.failure_count += 1;
        entry.last_failure_at = now;

        if entry.failure_count >= self.config.max_attempts {
            tracing::warn!(identifier, failures = entry.failure_count, "login identifier locked out");
        }
    }

    /// Remove any failure state for `identifier` unconditionally.
    pub async fn clear(&self, identifier: &str) {
        self.entries.write().await.remove(identifier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock starting at a fixed instant, advanced by bumping the offset.
    fn mock_clock() -> (Arc<AtomicI64>, Clock) {
        let base = Utc::now();
        let offset_secs = Arc::new(AtomicI64::new(0));
        let handle = Arc::clone(&offset_secs);
        let clock: Clock =
            Arc::new(move || base + Duration::seconds(handle.load(Ordering::SeqCst)));
        (offset_secs, clock)
    }

    fn tracker() -> (Arc<AtomicI64>, LockoutTracker) {
        let (offset, clock) = mock_clock();
        (offset, LockoutTracker::with_clock(LockoutConfig::default(), clock))
    }

    #[tokio::test]
    async fn unknown_identifier_is_allowed() {
        let (_, tracker) = tracker();
        assert!(tracker.check("a@b.com").await.is_allowed());
    }

    #[tokio::test]
    async fn locks_after_max_attempts() {
        let (_, tracker) = tracker();

        for _ in 0..4 {
            tracker.record_failure("a@b.com").await;
            assert!(tracker.check("a@b.com").await.is_allowed());
        }

        tracker.record_failure("a@b.com").await;
        let decision = tracker.check("a@b.com").await;
        assert_eq!(decision, LockoutDecision::Locked { retry_after_minutes: 15 });
    }

    #[tokio::test]
    async fn lock_expires_after_window() {
        let (offset, tracker) = tracker();

        for _ in 0..5 {
            tracker.record_failure("a@b.com").await;
        }
        assert!(!tracker.check("a@b.com").await.is_allowed());

        // 16 simulated minutes later the entry is discarded.
        offset.store(16 * 60, Ordering::SeqCst);
        assert!(tracker.check("a@b.com").await.is_allowed());

        // The discarded entry means the counter restarted from zero.
        tracker.record_failure("a@b.com").await;
        assert!(tracker.check("a@b.com").await.is_allowed());
    }

    #[tokio::test]
    async fn retry_after_counts_down() {
        let (offset, tracker) = tracker();

        for _ in 0..5 {
            tracker.record_failure("a@b.com").await;
        }

        offset.store(10 * 60, Ordering::SeqCst);
        assert_eq!(
            tracker.check("a@b.com").await,
            LockoutDecision::Locked { retry_after_minutes: 5 }
        );
    }

    #[tokio::test]
    async fn clear_resets_the_counter() {
        let (_, tracker) = tracker();

        for _ in 0..4 {
            tracker.record_failure("a@b.com").await;
        }
        tracker.clear("a@b.com").await;

        for _ in 0..4 {
            tracker.record_failure("a@b.com").await;
            assert!(tracker.check("a@b.com").await.is_allowed());
        }
    }

    #[tokio::test]
    async fn identifiers_are_independent() {
        let (_, tracker) = tracker();

        for _ in 0..5 {
            tracker.record_failure("locked@b.com").await;
        }

        assert!(!tracker.check("locked@b.com").await.is_allowed());
        assert!(tracker.check("other@b.com").await.is_allowed());
    }

    #[tokio::test]
    async fn concurrent_failures_are_not_lost() {
        let (_, clock) = mock_clock();
        let tracker = Arc::new(LockoutTracker::with_clock(
            LockoutConfig { max_attempts: 100, lockout_duration: Duration::minutes(15) },
            clock,
        ));

        let mut join_set = tokio::task::JoinSet::new();
        for _ in 0..50 {
            let tracker = Arc::clone(&tracker);
            join_set.spawn(async move {
                tracker.record_failure("a@b.com").await;
            });
        }
        while join_set.join_next().await.is_some() {}

        let entries = tracker.entries.read().await;
        assert_eq!(entries.get("a@b.com").unwrap().failure_count, 50);
    }
}
