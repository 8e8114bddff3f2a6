//! Admission counters for profiling contention.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of an arbiter's admission counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArbiterStats {
    /// Read brackets handed out.
    pub reads: u64,
    /// Write brackets handed out.
    pub writes: u64,
    /// Reads that had to wait at least once before admission.
    pub contended_reads: u64,
    /// Writes that had to wait at least once before admission.
    pub contended_writes: u64,
}

impl ArbiterStats {
    /// Fraction of admissions that had to wait, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn contention_ratio(&self) -> f64 {
        let total = self.reads + self.writes;
        if total == 0 {
            return 0.0;
        }
        (self.contended_reads + self.contended_writes) as f64 / total as f64
    }
}

/// Live counters. Relaxed: they order nothing.
#[derive(Debug, Default)]
pub(crate) struct StatCounters {
    reads: AtomicU64,
    writes: AtomicU64,
    contended_reads: AtomicU64,
    contended_writes: AtomicU64,
}

impl StatCounters {
    #[inline]
    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_contended_read(&self) {
        self.contended_reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_contended_write(&self) {
        self.contended_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ArbiterStats {
        ArbiterStats {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            contended_reads: self.contended_reads.load(Ordering::Relaxed),
            contended_writes: self.contended_writes.load(Ordering::Relaxed),
        }
    }
}
