//! # Storage Abstraction
//!
//! The ordered, index-addressable container that a [`SyncSeq`] arbitrates
//! access to. The facade never implements storage itself; it brackets exactly
//! one of these calls per operation.
//!
//! Implemented for [`Vec`] and [`VecDeque`].
//!
//! [`SyncSeq`]: crate::SyncSeq

use std::collections::VecDeque;

use crate::error::{SeqError, SeqResult};

/// Positional, mutable sequence storage.
///
/// Out-of-range positions are reported as [`SeqError::IndexOutOfRange`]
/// rather than panicking.
pub trait SeqStorage<T> {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns true if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, if any.
    fn get(&self, index: usize) -> Option<&T>;

    /// Overwrites the element at `index`, returning the previous value.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if `index >= len`.
    fn replace(&mut self, index: usize, value: T) -> SeqResult<T>;

    /// Inserts `value` at `index`, shifting later elements up.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if `index > len`.
    fn insert(&mut self, index: usize, value: T) -> SeqResult<()>;

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if `index >= len`.
    fn remove(&mut self, index: usize) -> SeqResult<T>;

    /// Appends `value`.
    fn push(&mut self, value: T);

    /// Appends every element of `values`, in order.
    fn append_all(&mut self, values: Vec<T>);

    /// Inserts every element of `values` starting at `index`, in order.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] if `index > len`; nothing is inserted.
    fn insert_all(&mut self, index: usize, values: Vec<T>) -> SeqResult<()>;

    /// Keeps only the elements for which `keep` returns true.
    fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F);

    /// Removes every element.
    fn clear(&mut self);

    /// Index of the first element matching `predicate`.
    fn position<F: FnMut(&T) -> bool>(&self, mut predicate: F) -> Option<usize> {
        (0..self.len()).find(|&i| self.get(i).is_some_and(&mut predicate))
    }

    /// Index of the last element matching `predicate`.
    fn rposition<F: FnMut(&T) -> bool>(&self, mut predicate: F) -> Option<usize> {
        (0..self.len())
            .rev()
            .find(|&i| self.get(i).is_some_and(&mut predicate))
    }

    /// Copies the elements out, in order.
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        (0..self.len())
            .filter_map(|i| self.get(i).cloned())
            .collect()
    }
}

impl<T> SeqStorage<T> for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    fn replace(&mut self, index: usize, value: T) -> SeqResult<T> {
        let len = Vec::len(self);
        match self.as_mut_slice().get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(SeqError::out_of_range(index, len)),
        }
    }

    fn insert(&mut self, index: usize, value: T) -> SeqResult<()> {
        if index > Vec::len(self) {
            return Err(SeqError::out_of_range(index, Vec::len(self)));
        }
        Vec::insert(self, index, value);
        Ok(())
    }

    fn remove(&mut self, index: usize) -> SeqResult<T> {
        if index >= Vec::len(self) {
            return Err(SeqError::out_of_range(index, Vec::len(self)));
        }
        Ok(Vec::remove(self, index))
    }

    #[inline]
    fn push(&mut self, value: T) {
        Vec::push(self, value);
    }

    fn append_all(&mut self, mut values: Vec<T>) {
        Vec::append(self, &mut values);
    }

    fn insert_all(&mut self, index: usize, values: Vec<T>) -> SeqResult<()> {
        if index > Vec::len(self) {
            return Err(SeqError::out_of_range(index, Vec::len(self)));
        }
        let mut tail = self.split_off(index);
        self.extend(values);
        Vec::append(self, &mut tail);
        Ok(())
    }

    fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) {
        Vec::retain(self, keep);
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn position<F: FnMut(&T) -> bool>(&self, predicate: F) -> Option<usize> {
        self.iter().position(predicate)
    }

    fn rposition<F: FnMut(&T) -> bool>(&self, predicate: F) -> Option<usize> {
        self.iter().rposition(predicate)
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }
}

impl<T> SeqStorage<T> for VecDeque<T> {
    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&T> {
        VecDeque::get(self, index)
    }

    fn replace(&mut self, index: usize, value: T) -> SeqResult<T> {
        let len = VecDeque::len(self);
        match VecDeque::get_mut(self, index) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(SeqError::out_of_range(index, len)),
        }
    }

    fn insert(&mut self, index: usize, value: T) -> SeqResult<()> {
        if index > VecDeque::len(self) {
            return Err(SeqError::out_of_range(index, VecDeque::len(self)));
        }
        VecDeque::insert(self, index, value);
        Ok(())
    }

    fn remove(&mut self, index: usize) -> SeqResult<T> {
        let len = VecDeque::len(self);
        VecDeque::remove(self, index).ok_or_else(|| SeqError::out_of_range(index, len))
    }

    #[inline]
    fn push(&mut self, value: T) {
        self.push_back(value);
    }

    fn append_all(&mut self, values: Vec<T>) {
        self.extend(values);
    }

    fn insert_all(&mut self, index: usize, values: Vec<T>) -> SeqResult<()> {
        if index > VecDeque::len(self) {
            return Err(SeqError::out_of_range(index, VecDeque::len(self)));
        }
        let mut tail = self.split_off(index);
        self.extend(values);
        VecDeque::append(self, &mut tail);
        Ok(())
    }

    fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) {
        VecDeque::retain(self, keep);
    }

    fn clear(&mut self) {
        VecDeque::clear(self);
    }

    fn position<F: FnMut(&T) -> bool>(&self, predicate: F) -> Option<usize> {
        self.iter().position(predicate)
    }
}
