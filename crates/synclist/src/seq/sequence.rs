//! # Arbitrated Sequence Facade
//!
//! Every public operation is one bracket around one storage call:
//!
//! ```text
//! READ:   len, is_empty, contains, contains_all, get, read_with,
//!         index_of, last_index_of, to_vec
//! WRITE:  push, insert, set, remove, remove_item, extend_from,
//!         insert_all, remove_all, retain_all, retain, clear
//! ```
//!
//! The bracket is a drop guard, so the arbiter is released even when the
//! storage call returns an error or unwinds.
//!
//! ## Safety Note
//!
//! The storage lives in an `UnsafeCell`; the arbiter is the only thing that
//! hands out references to it. All unsafe blocks are confined to
//! `with_read` / `with_write`.

#![allow(unsafe_code)]

use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;

use super::cursor::Cursor;
use super::storage::SeqStorage;
use crate::config::ArbiterConfig;
use crate::error::{SeqError, SeqResult};
use crate::sync::AccessArbiter;

/// A sequence readable by many threads at once and writable by one.
///
/// Wrapping a container transfers ownership of it to the facade; from then on
/// it is only reachable through arbitrated calls (or [`SyncSeq::into_inner`]).
///
/// ## Usage
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
/// use synclist::SyncSeq;
///
/// let seq = Arc::new(SyncSeq::from((0..100).collect::<Vec<u32>>()));
///
/// let readers: Vec<_> = (0..4)
///     .map(|_| {
///         let seq = Arc::clone(&seq);
///         thread::spawn(move || seq.get(42).unwrap())
///     })
///     .collect();
///
/// seq.push(100);
///
/// for r in readers {
///     assert_eq!(r.join().unwrap(), 42);
/// }
/// assert_eq!(seq.len(), 101);
/// ```
///
/// ## Re-entrancy
///
/// Closures passed to [`SyncSeq::read_with`] and [`SyncSeq::retain`] run
/// inside the bracket. They must not call back into the same sequence: a
/// write from inside a read waits for itself, and a read from inside a read
/// blocks behind any writer that queued in between.
pub struct SyncSeq<T, S = Vec<T>> {
    arbiter: AccessArbiter,
    storage: UnsafeCell<S>,
    _element: PhantomData<fn() -> T>,
}

// SAFETY: shared access to `storage` only happens under a read bracket, which
// the arbiter never grants alongside a write bracket; mutable access only
// happens under the exclusive write bracket. Readers on several threads share
// `&S` (needs `S: Sync`), writers move and drop elements from any thread
// (needs `S: Send`).
unsafe impl<T, S: Send + Sync> Sync for SyncSeq<T, S> {}

impl<T, S: SeqStorage<T>> SyncSeq<T, S> {
    /// Wraps `storage` with the default (parking) arbiter.
    #[must_use]
    pub fn wrap(storage: S) -> Self {
        Self::with_config(storage, ArbiterConfig::default())
    }

    /// Wraps `storage` with an arbiter built from `config`.
    #[must_use]
    pub fn with_config(storage: S, config: ArbiterConfig) -> Self {
        tracing::debug!(
            "Wrapping sequence of {} elements ({:?})",
            storage.len(),
            config.wait_strategy
        );
        Self {
            arbiter: AccessArbiter::with_config(config),
            storage: UnsafeCell::new(storage),
            _element: PhantomData,
        }
    }

    /// Returns the arbiter guarding this sequence.
    #[inline]
    #[must_use]
    pub fn arbiter(&self) -> &AccessArbiter {
        &self.arbiter
    }

    /// Unwraps the facade, returning the container.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.storage.into_inner()
    }

    /// Runs `op` on the storage under a read bracket.
    pub(super) fn with_read<R>(&self, op: impl FnOnce(&S) -> R) -> R {
        let _bracket = self.arbiter.read();
        // SAFETY: a read bracket is never live alongside a write bracket, so
        // no `&mut S` exists for as long as `_bracket` does.
        let storage = unsafe { &*self.storage.get() };
        op(storage)
    }

    /// Runs `op` on the storage under the write bracket.
    pub(super) fn with_write<R>(&self, op: impl FnOnce(&mut S) -> R) -> R {
        let _bracket = self.arbiter.write();
        // SAFETY: the write bracket is exclusive against every other bracket,
        // so this is the only reference to the storage while it lives.
        let storage = unsafe { &mut *self.storage.get() };
        op(storage)
    }

    // =========================================================================
    // READ operations
    // =========================================================================

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.with_read(|s| s.len())
    }

    /// Returns true if the sequence has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with_read(|s| s.is_empty())
    }

    /// Returns true if some element equals `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.with_read(|s| s.position(|x| x == value).is_some())
    }

    /// Returns true if every element of `values` is present.
    #[must_use]
    pub fn contains_all(&self, values: &[T]) -> bool
    where
        T: PartialEq,
    {
        self.with_read(|s| values.iter().all(|v| s.position(|x| x == v).is_some()))
    }

    /// Clone of the element at `index`.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> SeqResult<T>
    where
        T: Clone,
    {
        self.with_read(|s| {
            s.get(index)
                .cloned()
                .ok_or_else(|| SeqError::out_of_range(index, s.len()))
        })
    }

    /// Applies `f` to the element at `index` without cloning it.
    ///
    /// `f` runs inside the read bracket; see the re-entrancy note on
    /// [`SyncSeq`].
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if `index >= len`.
    pub fn read_with<R>(&self, index: usize, f: impl FnOnce(&T) -> R) -> SeqResult<R> {
        self.with_read(|s| match s.get(index) {
            Some(value) => Ok(f(value)),
            None => Err(SeqError::out_of_range(index, s.len())),
        })
    }

    /// Index of the first element equal to `value`.
    #[must_use]
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.with_read(|s| s.position(|x| x == value))
    }

    /// Index of the last element equal to `value`.
    #[must_use]
    pub fn last_index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.with_read(|s| s.rposition(|x| x == value))
    }

    /// Copies every element out, in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.with_read(|s| s.to_vec())
    }

    /// Sub-range views are not provided.
    ///
    /// A view sharing the backing storage would need either this sequence's
    /// arbiter or a second one that the parent knows nothing about; neither is
    /// offered. Copy a range out with [`SyncSeq::to_vec`] instead.
    ///
    /// # Errors
    ///
    /// Always [`SeqError::Unsupported`].
    pub fn sub_range(&self, _from: usize, _to: usize) -> SeqResult<Self> {
        Err(SeqError::Unsupported("sub_range"))
    }

    // =========================================================================
    // WRITE operations
    // =========================================================================

    /// Appends `value`.
    pub fn push(&self, value: T) {
        self.with_write(|s| s.push(value));
    }

    /// Inserts `value` at `index`, shifting later elements up.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if `index > len`.
    pub fn insert(&self, index: usize, value: T) -> SeqResult<()> {
        self.with_write(|s| s.insert(index, value))
    }

    /// Overwrites the element at `index`, returning the previous value.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if `index >= len`.
    pub fn set(&self, index: usize, value: T) -> SeqResult<T> {
        self.with_write(|s| s.replace(index, value))
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if `index >= len`.
    pub fn remove(&self, index: usize) -> SeqResult<T> {
        self.with_write(|s| s.remove(index))
    }

    /// Removes the first element equal to `value`. Returns true if one was found.
    pub fn remove_item(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.with_write(|s| match s.position(|x| x == value) {
            Some(index) => s.remove(index).is_ok(),
            None => false,
        })
    }

    /// Appends every element of `values`. Returns true if anything was added.
    ///
    /// `values` is drained before the bracket is taken.
    pub fn extend_from(&self, values: impl IntoIterator<Item = T>) -> bool {
        let values: Vec<T> = values.into_iter().collect();
        if values.is_empty() {
            return false;
        }
        self.with_write(|s| s.append_all(values));
        true
    }

    /// Inserts every element of `values` starting at `index`. Returns true if
    /// anything was added.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if `index > len`.
    pub fn insert_all(&self, index: usize, values: impl IntoIterator<Item = T>) -> SeqResult<bool> {
        let values: Vec<T> = values.into_iter().collect();
        let added = !values.is_empty();
        self.with_write(|s| s.insert_all(index, values))?;
        Ok(added)
    }

    /// Removes every element equal to any of `values`. Returns true if the
    /// sequence changed.
    pub fn remove_all(&self, values: &[T]) -> bool
    where
        T: PartialEq,
    {
        self.retain_counted(|x| !values.contains(x))
    }

    /// Keeps only elements equal to one of `values`. Returns true if the
    /// sequence changed.
    pub fn retain_all(&self, values: &[T]) -> bool
    where
        T: PartialEq,
    {
        self.retain_counted(|x| values.contains(x))
    }

    /// Keeps only elements for which `keep` returns true. Returns true if the
    /// sequence changed.
    ///
    /// `keep` runs inside the write bracket.
    pub fn retain(&self, keep: impl FnMut(&T) -> bool) -> bool {
        self.retain_counted(keep)
    }

    fn retain_counted(&self, keep: impl FnMut(&T) -> bool) -> bool {
        self.with_write(|s| {
            let before = s.len();
            s.retain(keep);
            s.len() != before
        })
    }

    /// Removes every element.
    pub fn clear(&self) {
        self.with_write(|s| s.clear());
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Cursor starting before the first element.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_, T, S> {
        Cursor::new(self, 0)
    }

    /// Cursor starting at `start`. Positions past the end are allowed.
    #[must_use]
    pub fn cursor_at(&self, start: usize) -> Cursor<'_, T, S> {
        Cursor::new(self, start)
    }
}

impl<T, S: SeqStorage<T> + Default> Default for SyncSeq<T, S> {
    fn default() -> Self {
        Self::wrap(S::default())
    }
}

impl<T> From<Vec<T>> for SyncSeq<T> {
    fn from(values: Vec<T>) -> Self {
        Self::wrap(values)
    }
}

impl<T> FromIterator<T> for SyncSeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::wrap(iter.into_iter().collect())
    }
}

impl<T: fmt::Debug, S: SeqStorage<T>> fmt::Debug for SyncSeq<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_read(|s| {
            f.debug_list()
                .entries((0..s.len()).filter_map(|i| s.get(i)))
                .finish()
        })
    }
}
