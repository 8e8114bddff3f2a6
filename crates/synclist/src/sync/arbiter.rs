//! # Access Arbiter
//!
//! Writer-preferring reader/writer admission over three atomics.
//!
//! ## Protocol
//!
//! ```text
//! acquire_read:   wait while (writer_active || waiting_writers > 0)
//!                 active_readers += 1
//!                 re-check; back out and retry if a writer slipped in
//!
//! acquire_write:  waiting_writers += 1
//!                 wait until CAS(writer_active, false -> true)
//!                 wait until active_readers == 0
//!                 waiting_writers -= 1
//! ```
//!
//! The waiting-writers check in `acquire_read` is what keeps a steady stream
//! of readers from starving a writer: readers already admitted finish
//! normally, new ones queue behind the writer.
//!
//! ## Ordering
//!
//! Reader admission and writer draining form a store-then-load handshake on
//! two different atomics (`active_readers` against `waiting_writers` /
//! `writer_active`), so every access on that path is `SeqCst`. With anything
//! weaker both sides could miss each other's store and overlap.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::{Condvar, Mutex};

use super::backoff::Backoff;
use super::bracket::{ReadBracket, WriteBracket};
use super::stats::{ArbiterStats, StatCounters};
use crate::config::{ArbiterConfig, WaitStrategy};

/// Owner of all reader/writer admission state.
///
/// Acquisition hands out a [`ReadBracket`] or [`WriteBracket`]; dropping the
/// bracket is the release. None of the operations fail: they either block
/// (spinning or parked, per [`ArbiterConfig`]) or succeed.
///
/// ## Usage
///
/// ```rust
/// use synclist::AccessArbiter;
///
/// let arbiter = AccessArbiter::new();
/// {
///     let _a = arbiter.read();
///     let _b = arbiter.read();
///     assert_eq!(arbiter.active_readers(), 2);
/// }
/// {
///     let _w = arbiter.write();
///     assert!(arbiter.is_writer_active());
///     assert!(arbiter.try_read().is_none());
/// }
/// assert!(!arbiter.is_writer_active());
/// ```
pub struct AccessArbiter {
    /// Number of admitted readers.
    active_readers: AtomicUsize,

    /// Claimed by exactly one writer at a time.
    /// May be observed true while admitted readers drain.
    writer_active: AtomicBool,

    /// Writers registered but not yet admitted.
    waiting_writers: AtomicUsize,

    config: ArbiterConfig,

    /// Monitor for the park strategy. Guards nothing; only orders the
    /// check-then-wait against notifications.
    monitor: Mutex<()>,
    wake: Condvar,

    stats: StatCounters,
}

impl AccessArbiter {
    /// Creates an arbiter with the default (parking) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ArbiterConfig::default())
    }

    /// Creates an arbiter with the given configuration.
    #[must_use]
    pub fn with_config(config: ArbiterConfig) -> Self {
        tracing::debug!(
            "Creating access arbiter: strategy={:?}, spin_limit={}",
            config.wait_strategy,
            config.spin_limit
        );
        Self {
            active_readers: AtomicUsize::new(0),
            writer_active: AtomicBool::new(false),
            waiting_writers: AtomicUsize::new(0),
            config,
            monitor: Mutex::new(()),
            wake: Condvar::new(),
            stats: StatCounters::default(),
        }
    }

    /// Returns the configuration this arbiter was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Returns the number of admitted readers.
    #[inline]
    #[must_use]
    pub fn active_readers(&self) -> usize {
        self.active_readers.load(Ordering::SeqCst)
    }

    /// Returns whether a writer has claimed the writer flag.
    #[inline]
    #[must_use]
    pub fn is_writer_active(&self) -> bool {
        self.writer_active.load(Ordering::SeqCst)
    }

    /// Returns the number of writers registered but not yet admitted.
    #[inline]
    #[must_use]
    pub fn waiting_writers(&self) -> usize {
        self.waiting_writers.load(Ordering::SeqCst)
    }

    /// Returns a snapshot of the admission counters.
    #[must_use]
    pub fn stats(&self) -> ArbiterStats {
        self.stats.snapshot()
    }

    /// Blocks until shared admission is granted.
    pub fn read(&self) -> ReadBracket<'_> {
        self.acquire_read();
        ReadBracket::new(self)
    }

    /// Blocks until exclusive admission is granted.
    pub fn write(&self) -> WriteBracket<'_> {
        self.acquire_write();
        WriteBracket::new(self)
    }

    /// Attempts shared admission without blocking.
    ///
    /// Fails whenever a writer is active or waiting. The arbiter state is
    /// unchanged on failure.
    pub fn try_read(&self) -> Option<ReadBracket<'_>> {
        if self.writers_present() {
            return None;
        }
        self.active_readers.fetch_add(1, Ordering::SeqCst);
        if self.writers_present() {
            self.release_read();
            return None;
        }
        self.stats.record_read();
        Some(ReadBracket::new(self))
    }

    /// Attempts exclusive admission without blocking.
    ///
    /// Never registers as a waiting writer, so a failed attempt does not hold
    /// back readers.
    pub fn try_write(&self) -> Option<WriteBracket<'_>> {
        if self.active_readers.load(Ordering::SeqCst) != 0 {
            return None;
        }
        if self
            .writer_active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }
        if self.active_readers.load(Ordering::SeqCst) != 0 {
            // A reader got in first; it will back out or finish on its own.
            self.writer_active.store(false, Ordering::SeqCst);
            self.notify();
            return None;
        }
        self.stats.record_write();
        Some(WriteBracket::new(self))
    }

    #[inline]
    fn writers_present(&self) -> bool {
        self.waiting_writers.load(Ordering::SeqCst) != 0
            || self.writer_active.load(Ordering::SeqCst)
    }

    fn acquire_read(&self) {
        let mut contended = false;
        loop {
            if self.writers_present() {
                if !contended {
                    contended = true;
                    self.stats.record_contended_read();
                    tracing::trace!("Reader waiting: writer active or queued");
                }
                self.wait_until(|| !self.writers_present());
            }

            self.active_readers.fetch_add(1, Ordering::SeqCst);
            if !self.writers_present() {
                self.stats.record_read();
                return;
            }

            // A writer registered between the check and the increment.
            self.release_read();
        }
    }

    pub(super) fn release_read(&self) {
        let previous = self.active_readers.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "release_read without matching acquire");
        if previous == 1 && self.writers_present() {
            self.notify();
        }
    }

    fn acquire_write(&self) {
        self.waiting_writers.fetch_add(1, Ordering::SeqCst);

        let mut contended = false;
        let claim = || {
            self.writer_active
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
        };
        if !claim() {
            contended = true;
            tracing::trace!("Writer waiting: another writer holds the flag");
            self.wait_until(claim);
        }

        let drained = || self.active_readers.load(Ordering::SeqCst) == 0;
        if !drained() {
            contended = true;
            tracing::trace!("Writer waiting: draining readers");
            self.wait_until(drained);
        }

        self.waiting_writers.fetch_sub(1, Ordering::SeqCst);
        if contended {
            self.stats.record_contended_write();
        }
        self.stats.record_write();
    }

    pub(super) fn release_write(&self) {
        self.writer_active.store(false, Ordering::SeqCst);
        self.notify();
    }

    /// Blocks until `ready` returns true, using the configured strategy.
    fn wait_until(&self, mut ready: impl FnMut() -> bool) {
        let mut backoff = Backoff::new(self.config.spin_limit);
        match self.config.wait_strategy {
            WaitStrategy::Spin => {
                while !ready() {
                    backoff.snooze();
                }
            }
            WaitStrategy::Park => {
                while !backoff.is_exhausted() {
                    if ready() {
                        return;
                    }
                    backoff.snooze();
                }
                // The condition is re-tested under the monitor, and notifiers
                // take the monitor before signaling, so no wakeup is lost.
                // Spurious wakeups just loop.
                let mut guard = self.monitor.lock();
                while !ready() {
                    self.wake.wait(&mut guard);
                }
            }
        }
    }

    fn notify(&self) {
        if self.config.wait_strategy == WaitStrategy::Park {
            let _guard = self.monitor.lock();
            self.wake.notify_all();
        }
    }
}

impl Default for AccessArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AccessArbiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessArbiter")
            .field("active_readers", &self.active_readers())
            .field("writer_active", &self.is_writer_active())
            .field("waiting_writers", &self.waiting_writers())
            .field("wait_strategy", &self.config.wait_strategy)
            .finish_non_exhaustive()
    }
}
