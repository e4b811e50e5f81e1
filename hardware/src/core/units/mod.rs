//! Hardware units of the memory hierarchy.

/// Set-associative cache level, address decoding and replacement policies.
pub mod cache;
