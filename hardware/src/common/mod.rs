//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the access classification, address geometry
//! constants and error types that are shared by the cache levels, the
//! hierarchy and the trace driver.

/// Address geometry constants.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Configuration and trace error types.
pub mod error;

pub use data::AccessType;
pub use error::{ConfigError, TraceError};

pub use constants::{ADDR_BITS, BYTE_BITS, MAX_DCACHE_LEVELS};
