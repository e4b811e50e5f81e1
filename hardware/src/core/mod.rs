//! Cache simulation core.
//!
//! [`units`] holds the per-level cache machinery; [`hierarchy`] composes
//! the instruction cache and the data cache chain and routes accesses
//! between them.

/// Instruction and data cache composition.
pub mod hierarchy;

/// Hardware units (cache levels, address decoding, replacement).
pub mod units;

pub use hierarchy::{Hierarchy, HierarchyOutcome, ServedBy};
