//! # Arbitrated Sequence
//!
//! The [`SyncSeq`] facade over a [`SeqStorage`] container, and the
//! [`Cursor`] views it hands out. Both go through the same arbiter, so
//! direct calls and cursor steps share one serialization order.

mod cursor;
mod sequence;
mod storage;

pub use cursor::Cursor;
pub use sequence::SyncSeq;
pub use storage::SeqStorage;
