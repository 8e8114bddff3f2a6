//! # SYNCLIST
//!
//! A mutable, index-addressable sequence that many threads may read at once
//! while at most one thread mutates it, and never both at the same time.
//! Built for read-heavy workloads with occasional structural edits, where a
//! plain mutex would serialize every reader.
//!
//! ## Architecture
//!
//! ```text
//!   caller ──> SyncSeq / Cursor ──> AccessArbiter (acquire)
//!                                        │
//!                                 storage operation
//!                                        │
//!   caller <── result <────────── AccessArbiter (release on drop)
//! ```
//!
//! 1. **One bracket per call** - every public operation takes exactly one
//!    read or write bracket around exactly one container call
//! 2. **Writer preference** - once a writer is waiting, no new reader is admitted
//! 3. **Live cursors** - a cursor re-reads the sequence on every call and never
//!    holds the lock in between
//!
//! ## Example
//!
//! ```rust
//! use synclist::SyncSeq;
//!
//! let seq = SyncSeq::from(vec!['a', 'b', 'c']);
//! seq.push('d');
//!
//! let mut cursor = seq.cursor();
//! assert_eq!(cursor.next(), Ok('a'));
//! assert_eq!(seq.len(), 4);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod seq;
pub mod sync;

pub use config::{ArbiterConfig, WaitStrategy};
pub use error::{Direction, SeqError, SeqResult};
pub use seq::{Cursor, SeqStorage, SyncSeq};
pub use sync::{AccessArbiter, ArbiterStats, ReadBracket, WriteBracket};
