//! 按用户的命令冷却。
//!
//! 槽位 `(command id, user id)` 记录该用户上次被接受调用的到期时间。
//! 不超过 [`COOLDOWN_FLOOR_MS`] 的冷却不会被强制执行。

use chrono::{DateTime, TimeZone, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cooldowns must exceed this to be enforced; a slot with less than this remaining is let through.
pub const COOLDOWN_FLOOR_MS: u64 = 1000;

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Result of [`CooldownManager::check_and_stamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownCheck {
    /// Not enforced for this command.
    Exempt,
    /// Accepted; the slot now expires at the given epoch ms.
    Stamped { expires_at_ms: u64 },
    /// The user is still cooling down until the given epoch ms.
    Rejected { expires_at_ms: u64 },
}

impl CooldownCheck {
    pub fn is_rejected(&self) -> bool {
        matches!(self, CooldownCheck::Rejected { .. })
    }
}

type Slot = (String, String);

/// Tracks cooldown expiries per command and user.
#[derive(Clone)]
pub struct CooldownManager {
    slots: Arc<DashMap<Slot, u64>>,
    clock: Arc<dyn Clock>,
}

impl Default for CooldownManager {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl CooldownManager {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            clock,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Checks the slot and, unless rejected, stamps a new expiry of `now + cooldown_ms`
    /// (saturating at `u64::MAX`).
    ///
    /// Stamping schedules removal of the slot after `cooldown_ms`; the timer only removes the
    /// expiry it was scheduled for, so a newer stamp is never cleared early. Must be called
    /// inside a Tokio runtime when the cooldown is enforced.
    pub fn check_and_stamp(&self, command_id: &str, user_id: &str, cooldown_ms: Option<u64>) -> CooldownCheck {
        let cooldown_ms = match cooldown_ms {
            Some(ms) if ms > COOLDOWN_FLOOR_MS => ms,
            _ => return CooldownCheck::Exempt,
        };
        let now = self.clock.now_ms();
        let slot = (command_id.to_string(), user_id.to_string());
        let expires_at_ms = now.saturating_add(cooldown_ms);

        match self.slots.entry(slot.clone()) {
            Entry::Occupied(mut entry) => {
                let current = *entry.get();
                if current.saturating_sub(now) >= COOLDOWN_FLOOR_MS {
                    debug!(command_id, user_id, expires_at_ms = current, "cooldown active");
                    return CooldownCheck::Rejected { expires_at_ms: current };
                }
                entry.insert(expires_at_ms);
            }
            Entry::Vacant(entry) => {
                entry.insert(expires_at_ms);
            }
        }

        let slots = Arc::clone(&self.slots);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(cooldown_ms)).await;
            slots.remove_if(&slot, |_, expiry| *expiry == expires_at_ms);
        });
        CooldownCheck::Stamped { expires_at_ms }
    }

    /// Current expiry of a slot, if any.
    pub fn expiry(&self, command_id: &str, user_id: &str) -> Option<u64> {
        self.slots
            .get(&(command_id.to_string(), user_id.to_string()))
            .map(|e| *e.value())
    }
}

/// Epoch milliseconds as a UTC timestamp; values past chrono's range clamp to its maximum.
pub fn to_datetime(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct ManualClock(AtomicU64);

    impl ManualClock {
        fn at(ms: u64) -> Arc<Self> {
            Arc::new(Self(AtomicU64::new(ms)))
        }

        fn set(&self, ms: u64) {
            self.0.store(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    const T0: u64 = 1_700_000_000_000;

    /// Lets spawned timer tasks register or finish their sleeps.
    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    /// **Test: 1500 ms cooldown timeline.**
    ///
    /// **Setup:** manual clock at t=0.
    /// **Action:** invoke at t=0, t=500 and t=1600.
    /// **Expected:** pass, reject with at least 900 ms remaining, pass.
    #[tokio::test]
    async fn test_cooldown_timeline() {
        let clock = ManualClock::at(T0);
        let cooldowns = CooldownManager::new(clock.clone());

        assert_eq!(
            cooldowns.check_and_stamp("Slash:ping", "u1", Some(1500)),
            CooldownCheck::Stamped { expires_at_ms: T0 + 1500 }
        );

        clock.set(T0 + 500);
        match cooldowns.check_and_stamp("Slash:ping", "u1", Some(1500)) {
            CooldownCheck::Rejected { expires_at_ms } => assert!(expires_at_ms - (T0 + 500) >= 900),
            other => panic!("expected rejection, got {:?}", other),
        }

        clock.set(T0 + 1600);
        assert_eq!(
            cooldowns.check_and_stamp("Slash:ping", "u1", Some(1500)),
            CooldownCheck::Stamped { expires_at_ms: T0 + 3100 }
        );
    }

    #[tokio::test]
    async fn test_cooldown_floor_is_never_enforced() {
        let cooldowns = CooldownManager::new(ManualClock::at(T0));
        for _ in 0..3 {
            assert_eq!(cooldowns.check_and_stamp("Slash:ping", "u1", Some(1000)), CooldownCheck::Exempt);
            assert_eq!(cooldowns.check_and_stamp("Slash:ping", "u1", None), CooldownCheck::Exempt);
        }
        assert_eq!(cooldowns.expiry("Slash:ping", "u1"), None);
    }

    #[tokio::test]
    async fn test_cooldown_slots_are_per_user_and_command() {
        let cooldowns = CooldownManager::new(ManualClock::at(T0));
        cooldowns.check_and_stamp("Slash:ping", "u1", Some(5000));
        assert!(!cooldowns.check_and_stamp("Slash:ping", "u2", Some(5000)).is_rejected());
        assert!(!cooldowns.check_and_stamp("Message:ping", "u1", Some(5000)).is_rejected());
        assert!(cooldowns.check_and_stamp("Slash:ping", "u1", Some(5000)).is_rejected());
    }

    /// **Test: A cooldown too large for the clock saturates instead of overflowing.**
    ///
    /// **Setup:** manual clock at t=0.
    /// **Action:** stamp with `u64::MAX`, then invoke again.
    /// **Expected:** expiry is `u64::MAX`; the second call is rejected.
    #[tokio::test]
    async fn test_huge_cooldown_saturates() {
        let cooldowns = CooldownManager::new(ManualClock::at(T0));

        assert_eq!(
            cooldowns.check_and_stamp("Slash:ping", "u1", Some(u64::MAX)),
            CooldownCheck::Stamped { expires_at_ms: u64::MAX }
        );
        assert!(cooldowns.check_and_stamp("Slash:ping", "u1", Some(u64::MAX)).is_rejected());
        assert_eq!(to_datetime(u64::MAX), DateTime::<Utc>::MAX_UTC);
    }

    /// **Test: Expiry timers only clear the stamp they were scheduled for.**
    ///
    /// **Setup:** paused Tokio time; a 2000 ms stamp at t=0 and a new stamp at t=1500.
    /// **Action:** advance past the first timer.
    /// **Expected:** the newer stamp survives; it is cleared after its own timer.
    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_keeps_newer_stamp() {
        let clock = ManualClock::at(T0);
        let cooldowns = CooldownManager::new(clock.clone());

        cooldowns.check_and_stamp("Slash:ping", "u1", Some(2000));
        settle().await;
        tokio::time::advance(Duration::from_millis(1500)).await;
        clock.set(T0 + 1500);
        assert!(!cooldowns.check_and_stamp("Slash:ping", "u1", Some(2000)).is_rejected());
        settle().await;

        tokio::time::advance(Duration::from_millis(600)).await;
        settle().await;
        assert_eq!(cooldowns.expiry("Slash:ping", "u1"), Some(T0 + 3500));

        tokio::time::advance(Duration::from_millis(1500)).await;
        settle().await;
        assert_eq!(cooldowns.expiry("Slash:ping", "u1"), None);
    }
}
