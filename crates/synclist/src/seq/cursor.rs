//! # Live Cursor
//!
//! A position counter over a [`SyncSeq`]. Each call takes its own bracket
//! and releases it before returning; nothing is held between calls and no
//! snapshot is taken, so the sequence may change between two steps of the
//! same cursor.
//!
//! ```text
//! position:  ... -1 | 0   1   2 | 3  4 ...
//!                   | A   B   C |
//!                     valid range
//! ```
//!
//! The position is an unbounded integer. Stepping off either end moves it
//! outside `[0, len)`, and concurrent removals can leave it past the end.
//! `previous()` recovers from the latter by clamping to the last element.

use std::fmt;

use super::sequence::SyncSeq;
use super::storage::SeqStorage;
use crate::error::{Direction, SeqError, SeqResult};

#[inline]
fn signed(len: usize) -> isize {
    isize::try_from(len).unwrap_or(isize::MAX)
}

/// Positional traversal handle over a [`SyncSeq`].
///
/// Borrows the sequence, so it cannot outlive it. Obtained from
/// [`SyncSeq::cursor`] or [`SyncSeq::cursor_at`].
///
/// ## Usage
///
/// ```rust
/// use synclist::SyncSeq;
///
/// let seq = SyncSeq::from(vec![1, 2, 3]);
/// let mut cursor = seq.cursor();
///
/// let mut seen = Vec::new();
/// while cursor.has_next() {
///     seen.push(cursor.next().unwrap());
/// }
/// assert_eq!(seen, vec![1, 2, 3]);
/// assert_eq!(cursor.previous(), Ok(3));
/// ```
pub struct Cursor<'a, T, S = Vec<T>> {
    seq: &'a SyncSeq<T, S>,
    position: isize,
}

impl<'a, T, S: SeqStorage<T>> Cursor<'a, T, S> {
    pub(super) fn new(seq: &'a SyncSeq<T, S>, start: usize) -> Self {
        Self {
            seq,
            position: signed(start),
        }
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> isize {
        self.position
    }

    /// Returns true if the sequence extends past the current position.
    #[must_use]
    pub fn has_next(&self) -> bool {
        let position = self.position;
        self.seq.with_read(|s| signed(s.len()) > position)
    }

    /// Returns the element at the current position and advances past it.
    ///
    /// A position before the start is treated as index 0.
    ///
    /// # Errors
    ///
    /// [`SeqError::ExhaustedIteration`] if the position is at or past the end
    /// (or the sequence is empty). The position is left unchanged.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> SeqResult<T>
    where
        T: Clone,
    {
        let index = usize::try_from(self.position).unwrap_or(0);
        let value = self.seq.with_read(|s| {
            s.get(index).cloned().ok_or(SeqError::ExhaustedIteration {
                direction: Direction::Forward,
            })
        })?;
        self.position = signed(index).saturating_add(1);
        Ok(value)
    }

    /// Returns true if the sequence is non-empty and the position is past
    /// the first element.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        let position = self.position;
        self.seq.with_read(|s| !s.is_empty() && position > 0)
    }

    /// Steps back one place and returns the element there.
    ///
    /// If concurrent removals left the new position past the end, the cursor
    /// clamps to the last element and returns it.
    ///
    /// # Errors
    ///
    /// [`SeqError::ExhaustedIteration`] if the sequence is empty or the new
    /// position is before the start. The step back is kept.
    pub fn previous(&mut self) -> SeqResult<T>
    where
        T: Clone,
    {
        self.position = self.position.saturating_sub(1);
        let position = self.position;

        let (index, value) = self.seq.with_read(|s| {
            let exhausted = SeqError::ExhaustedIteration {
                direction: Direction::Backward,
            };
            let len = s.len();
            let Ok(index) = usize::try_from(position) else {
                return Err(exhausted);
            };
            if len == 0 {
                return Err(exhausted);
            }
            let index = index.min(len - 1);
            s.get(index)
                .cloned()
                .map(|value| (index, value))
                .ok_or(exhausted)
        })?;

        if signed(index) != position {
            tracing::trace!(
                "Cursor clamped from {} to {} after concurrent shrink",
                position,
                index
            );
            self.position = signed(index);
        }
        Ok(value)
    }

    /// `position + 1`. Takes no bracket, so it may be stale relative to
    /// concurrent structural changes.
    #[inline]
    #[must_use]
    pub fn next_index(&self) -> isize {
        self.position.saturating_add(1)
    }

    /// `position - 1`. Takes no bracket, so it may be stale relative to
    /// concurrent structural changes.
    #[inline]
    #[must_use]
    pub fn previous_index(&self) -> isize {
        self.position.saturating_sub(1)
    }

    /// Removes and returns the element at the current position.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if the position is outside `[0, len)`.
    pub fn remove_current(&mut self) -> SeqResult<T> {
        let position = self.position;
        self.seq.with_write(|s| {
            let index = checked_index(position, s.len())?;
            s.remove(index)
        })
    }

    /// Overwrites the element at the current position, returning the old one.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if the position is outside `[0, len)`.
    pub fn set_current(&mut self, value: T) -> SeqResult<T> {
        let position = self.position;
        self.seq.with_write(|s| {
            let index = checked_index(position, s.len())?;
            s.replace(index, value)
        })
    }

    /// Inserts `value` just after the current position.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if `position + 1` is outside `[0, len]`.
    pub fn insert_after_current(&mut self, value: T) -> SeqResult<()> {
        let target = self.position.saturating_add(1);
        self.seq.with_write(|s| {
            let index = checked_index(target, s.len())?;
            s.insert(index, value)
        })
    }
}

/// Converts a signed position to an index, rejecting negatives.
fn checked_index(position: isize, len: usize) -> SeqResult<usize> {
    usize::try_from(position).map_err(|_| SeqError::IndexOutOfRange {
        index: position,
        len,
    })
}

impl<T, S> Clone for Cursor<'_, T, S> {
    fn clone(&self) -> Self {
        Self {
            seq: self.seq,
            position: self.position,
        }
    }
}

impl<T, S> fmt::Debug for Cursor<'_, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> SyncSeq<char> {
        SyncSeq::from(vec!['A', 'B', 'C'])
    }

    #[test]
    fn test_forward_boundary() {
        let seq = abc();
        let mut cursor = seq.cursor();

        assert_eq!(cursor.next(), Ok('A'));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.next(), Ok('B'));
        assert_eq!(cursor.next(), Ok('C'));
        assert_eq!(cursor.position(), 3);
        assert!(!cursor.has_next());

        assert_eq!(
            cursor.next(),
            Err(SeqError::ExhaustedIteration {
                direction: Direction::Forward
            })
        );
        assert_eq!(cursor.position(), 3);

        assert_eq!(cursor.previous(), Ok('C'));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_backward_boundary() {
        let seq = abc();
        let mut cursor = seq.cursor_at(1);

        assert!(cursor.has_previous());
        assert_eq!(cursor.previous(), Ok('A'));
        assert_eq!(cursor.position(), 0);
        assert!(!cursor.has_previous());

        assert_eq!(
            cursor.previous(),
            Err(SeqError::ExhaustedIteration {
                direction: Direction::Backward
            })
        );
        assert_eq!(cursor.position(), -1);

        // Before the start, the next step recovers to the first element
        assert!(cursor.has_next());
        assert_eq!(cursor.next(), Ok('A'));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_shrink_recovery() {
        let seq = abc();
        let mut cursor = seq.cursor_at(3);

        seq.remove(2).unwrap();
        seq.remove(1).unwrap();
        assert_eq!(seq.to_vec(), vec!['A']);

        assert_eq!(cursor.previous(), Ok('A'));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_empty_sequence() {
        let seq: SyncSeq<char> = SyncSeq::default();
        let mut cursor = seq.cursor_at(2);

        assert!(!cursor.has_next());
        assert!(!cursor.has_previous());
        assert!(cursor.next().is_err());
        assert_eq!(cursor.position(), 2);
        assert!(cursor.previous().is_err());
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_index_accessors() {
        let seq = abc();
        let cursor = seq.cursor_at(2);
        assert_eq!(cursor.next_index(), 3);
        assert_eq!(cursor.previous_index(), 1);

        let reads_before = seq.arbiter().stats().reads;
        let _ = (cursor.next_index(), cursor.previous_index());
        assert_eq!(seq.arbiter().stats().reads, reads_before);
    }

    #[test]
    fn test_mutate_at_cursor() {
        let seq = abc();
        let mut cursor = seq.cursor_at(1);

        assert_eq!(cursor.set_current('b'), Ok('B'));
        cursor.insert_after_current('x').unwrap();
        assert_eq!(seq.to_vec(), vec!['A', 'b', 'x', 'C']);

        assert_eq!(cursor.remove_current(), Ok('b'));
        assert_eq!(seq.to_vec(), vec!['A', 'x', 'C']);
        // Position is not adjusted by the cursor's own removal
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.next(), Ok('x'));
    }

    #[test]
    fn test_mutate_out_of_range() {
        let seq = abc();
        let mut cursor = seq.cursor_at(3);

        assert_eq!(cursor.remove_current(), Err(SeqError::out_of_range(3, 3)));
        assert_eq!(cursor.set_current('z'), Err(SeqError::out_of_range(3, 3)));

        // Inserting after the last slot would land at len + 1
        assert_eq!(
            cursor.insert_after_current('z'),
            Err(SeqError::out_of_range(4, 3))
        );

        let mut cursor = seq.cursor();
        assert!(cursor.previous().is_err());
        assert_eq!(
            cursor.remove_current(),
            Err(SeqError::IndexOutOfRange { index: -1, len: 3 })
        );
        // Inserting after -1 is inserting at the front
        cursor.insert_after_current('0').unwrap();
        assert_eq!(seq.to_vec(), vec!['0', 'A', 'B', 'C']);

        let arbiter = seq.arbiter();
        assert_eq!(arbiter.active_readers(), 0);
        assert!(!arbiter.is_writer_active());
    }

    #[test]
    fn test_sees_live_inserts() {
        let seq = abc();
        let mut cursor = seq.cursor();
        assert_eq!(cursor.next(), Ok('A'));

        seq.insert(1, 'N').unwrap();
        assert_eq!(cursor.next(), Ok('N'));
        assert_eq!(cursor.next(), Ok('B'));

        let mut other = cursor.clone();
        seq.push('D');
        assert_eq!(cursor.next(), Ok('C'));
        assert_eq!(other.next(), Ok('C'));
        assert_eq!(other.next(), Ok('D'));
    }
}
