//! Scoped brackets: acquisition handles that release on drop.
//!
//! Dropping a bracket is the only way to release the arbiter, so every
//! acquire is matched by exactly one release on every exit path, including
//! `?` early returns and unwinding panics.

use super::arbiter::AccessArbiter;

/// Shared admission to the protected data.
///
/// Any number of read brackets may be live at once, but never alongside a
/// [`WriteBracket`].
#[must_use = "the arbiter is released as soon as the bracket is dropped"]
#[derive(Debug)]
pub struct ReadBracket<'a> {
    arbiter: &'a AccessArbiter,
}

impl<'a> ReadBracket<'a> {
    /// Wraps an admission that has already been registered with `arbiter`.
    #[inline]
    pub(super) fn new(arbiter: &'a AccessArbiter) -> Self {
        Self { arbiter }
    }
}

impl Drop for ReadBracket<'_> {
    #[inline]
    fn drop(&mut self) {
        self.arbiter.release_read();
    }
}

/// Exclusive admission to the protected data.
///
/// Only one write bracket can exist at a time, and no reader is admitted
/// while it lives.
#[must_use = "the arbiter is released as soon as the bracket is dropped"]
#[derive(Debug)]
pub struct WriteBracket<'a> {
    arbiter: &'a AccessArbiter,
}

impl<'a> WriteBracket<'a> {
    /// Wraps an admission that has already been registered with `arbiter`.
    #[inline]
    pub(super) fn new(arbiter: &'a AccessArbiter) -> Self {
        Self { arbiter }
    }
}

impl Drop for WriteBracket<'_> {
    #[inline]
    fn drop(&mut self) {
        self.arbiter.release_write();
    }
}
