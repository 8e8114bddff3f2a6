//! # Reader/Writer Admission
//!
//! ## The Problem
//!
//! ```text
//! Readers:  frequent, short, harmless to each other
//! Writers:  rare, structural, must see nobody else
//!
//! With Mutex:                 readers serialize behind each other
//! With naive reader counting: a steady reader stream starves writers
//! ```
//!
//! ## The Solution: Writer-Preferring Arbiter
//!
//! ```text
//! Writer registers as waiting  ──>  no NEW reader is admitted
//! Admitted readers drain       ──>  writer admitted alone
//! Writer releases              ──>  queued readers and writers wake
//! ```
//!
//! Acquisition returns a bracket; dropping it releases. Waiting either spins
//! with yields or parks on a condition variable, per [`ArbiterConfig`].
//!
//! [`ArbiterConfig`]: crate::ArbiterConfig

mod arbiter;
mod backoff;
mod bracket;
mod stats;

pub use arbiter::AccessArbiter;
pub use bracket::{ReadBracket, WriteBracket};
pub use stats::ArbiterStats;
