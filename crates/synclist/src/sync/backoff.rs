//! Spin-then-yield backoff for the waiting loops.

/// Per-wait backoff state.
///
/// The first `limit` steps busy-spin with [`std::hint::spin_loop`]; every
/// later step gives up the thread's turn with [`std::thread::yield_now`].
#[derive(Debug)]
pub(crate) struct Backoff {
    step: u32,
    limit: u32,
}

impl Backoff {
    /// Creates a fresh backoff with the given spin budget.
    #[inline]
    pub(crate) const fn new(limit: u32) -> Self {
        Self { step: 0, limit }
    }

    /// Returns true once the busy-spin budget is spent.
    #[inline]
    pub(crate) fn is_exhausted(&self) -> bool {
        self.step >= self.limit
    }

    /// Performs one backoff step.
    #[inline]
    pub(crate) fn snooze(&mut self) {
        if self.is_exhausted() {
            std::thread::yield_now();
        } else {
            std::hint::spin_loop();
            self.step += 1;
        }
    }
}
