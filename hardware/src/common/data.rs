//! Memory Access Types.
//!
//! This module defines the classification of memory accesses read from a
//! trace. The access type decides which cache chain services the access
//! and whether the write policy of a data cache applies.

/// Type of memory access operation.
///
/// Used to route an access to the instruction cache or the data cache
/// chain, and to distinguish data reads from data writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Instruction fetch access.
    ///
    /// Always a read, serviced by the instruction cache only.
    Fetch,

    /// Data read access.
    Read,

    /// Data write access.
    ///
    /// Subject to the write and allocate policies of each data cache level.
    Write,
}

impl AccessType {
    /// Maps a trace kind letter (`I`, `R`, `W`) to an access type.
    pub fn from_trace_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(AccessType::Fetch),
            'R' => Some(AccessType::Read),
            'W' => Some(AccessType::Write),
            _ => None,
        }
    }

    /// Returns `true` for data writes.
    pub fn is_write(self) -> bool {
        matches!(self, AccessType::Write)
    }
}
