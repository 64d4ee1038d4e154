use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};

pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        ManualClock {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, at: Instant) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        ManualClock::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Whether a value fetched at `updated` may still be handed out at `now`.
///
/// Never-fetched values and a zero TTL are never current.
pub fn is_current(updated: Option<Instant>, ttl: Duration, now: Instant) -> bool {
    if ttl == Duration::ZERO {
        return false;
    }
    match updated {
        Some(at) => now.saturating_duration_since(at) <= ttl,
        None => false,
    }
}

/// Last mapped state of one group.
#[derive(Debug, Default)]
pub struct Cached<G> {
    pub bundle: G,
    pub refreshed_at: Option<Instant>,
}

/// Cache slot of one group.
///
/// The lock is held across a refresh. `refreshes` can be read without it, so a reader that
/// waited for the lock can tell whether somebody else refreshed the group meanwhile.
#[derive(Debug, Default)]
pub struct Slot<G> {
    cached: AsyncMutex<Cached<G>>,
    refreshes: AtomicU64,
}

impl<G> Slot<G> {
    pub fn refreshes(&self) -> u64 {
        self.refreshes.load(Ordering::Acquire)
    }

    pub async fn lock(&self) -> MutexGuard<'_, Cached<G>> {
        self.cached.lock().await
    }

    pub fn store(&self, cached: &mut Cached<G>, bundle: G, at: Instant) {
        cached.bundle = bundle;
        cached.refreshed_at = Some(at);
        self.refreshes.fetch_add(1, Ordering::Release);
    }
}
