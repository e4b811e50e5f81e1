//! Simulation harness.
//!
//! Reads an access trace and drives it through a [`Hierarchy`] in order.

/// Access trace reader.
pub mod trace;

use crate::common::TraceError;
use crate::core::Hierarchy;
use std::io::BufRead;
use tracing::info;

pub use trace::{TraceEntry, TraceReader};

/// Feeds every trace entry to `hierarchy`, returning the number of accesses.
///
/// Stops at the first malformed line.
pub fn run_trace<R: BufRead>(hierarchy: &mut Hierarchy, reader: R) -> Result<u64, TraceError> {
    let mut count = 0;
    for entry in TraceReader::new(reader) {
        let entry = entry?;
        hierarchy.handle_access(entry.kind, entry.addr);
        count += 1;
    }
    info!(accesses = count, "trace finished");
    Ok(count)
}
