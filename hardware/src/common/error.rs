//! Error types.
//!
//! Configuration errors are detected before any access is simulated and are
//! fatal. Trace errors are raised by the trace reader for input the driver
//! cannot interpret. Access handling itself never fails.

use std::io;
use thiserror::Error;

/// Structural configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A size parameter is not a power of two.
    #[error("{cache}: {what} must be a power of two (got {value})")]
    NotPowerOfTwo {
        cache: String,
        what: &'static str,
        value: usize,
    },

    /// Associativity is zero or exceeds the block count.
    #[error("{cache}: associativity {associativity} must be between 1 and the block count {num_blocks}")]
    InvalidAssociativity {
        cache: String,
        associativity: usize,
        num_blocks: usize,
    },

    /// The block count is not a multiple of the associativity.
    #[error("{cache}: block count {num_blocks} is not divisible by associativity {associativity}")]
    NotDivisible {
        cache: String,
        num_blocks: usize,
        associativity: usize,
    },

    /// The geometry leaves no address bits for the tag.
    #[error("{cache}: geometry leaves {tag_bits} tag bits in a {addr_bits}-bit address")]
    NoTagBits {
        cache: String,
        tag_bits: i64,
        addr_bits: u32,
    },

    /// A data cache level is enabled while its predecessor is not.
    #[error("L{level} D-cache specified, but not L{previous}.")]
    MissingLevel { level: usize, previous: usize },

    /// A data cache level outside 1..=3.
    #[error("Invalid D-cache level {0}.")]
    InvalidLevel(usize),

    /// The same data cache level was given twice.
    #[error("Duplicate D-cache level {0} parameters.")]
    DuplicateLevel(usize),

    /// No instruction cache parameters were supplied.
    #[error("No I-cache parameters specified.")]
    MissingICache,

    /// A parameter string does not have the expected shape.
    #[error("Invalid {cache} parameters '{input}'.")]
    InvalidParameters { cache: &'static str, input: String },

    /// Unknown replacement letter (expected `L` or `R`).
    #[error("Invalid {cache} replacement scheme '{letter}'.")]
    InvalidReplacement { cache: &'static str, letter: char },

    /// Unknown write scheme letter (expected `B` or `T`).
    #[error("Invalid D-cache write scheme '{0}'.")]
    InvalidWriteScheme(char),

    /// Unknown allocation letter (expected `A` or `N`).
    #[error("Invalid D-cache allocation scheme '{0}'.")]
    InvalidAllocateScheme(char),

    /// The configuration file is not valid TOML for [`crate::config::Config`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration '{path}': {source}")]
    Io { path: String, source: io::Error },
}

/// Errors raised while reading an access trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),

    /// A trace line carries an access kind other than `R`, `W` or `I`.
    #[error("Malformed trace file: invalid access type '{kind}' on line {line}.")]
    InvalidAccessType { line: usize, kind: char },
}
