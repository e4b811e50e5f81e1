//! CPU Memory Hierarchy Simulator Library.
//!
//! This crate models an instruction cache and up to three levels of data
//! cache against a recorded sequence of memory accesses and produces
//! hit/miss statistics. It is a functional model: it counts misses and
//! words transferred, not cycles.
//!
//! # Architecture
//!
//! * **Cache level**: set-associative storage with LRU or Random
//!   replacement, write-back/write-through and allocate/no-allocate writes.
//! * **Hierarchy**: one instruction cache and an L1 → L2 → L3 data chain;
//!   a miss at one level becomes an access at the next.
//! * **Trace driver**: reads `0x<addr> <I|R|W>` lines and feeds them in order.
//!
//! # Modules
//!
//! * `common`: Access types, address constants, and error types.
//! * `config`: Cache parameters from TOML files or command-line strings.
//! * `core`: Cache levels, address decoding, replacement and the hierarchy.
//! * `sim`: Trace reader and simulation driver.
//! * `stats`: Per-level counters and reports.

/// Shared types, constants and error definitions.
pub mod common;

/// Configuration of the instruction cache and the data cache chain.
///
/// Loads TOML configuration files or parses the compact `-I`/`-D`
/// parameter strings.
pub mod config;

/// Cache levels and the hierarchy that routes accesses between them.
pub mod core;

/// Trace reading and the simulation loop.
pub mod sim;

/// Statistics collection and reporting.
///
/// Tracks reads, writes, words transferred and miss classes per level.
pub mod stats;

pub use crate::config::Config;
pub use crate::core::Hierarchy;
