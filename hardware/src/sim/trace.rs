//! Access Trace Reader.
//!
//! A trace is a text file with one access per line:
//!
//! ```text
//! 0x00400000 I
//! 0x10010004 R
//! 0x10010008 W
//! ```
//!
//! A hexadecimal address, optional blanks, then `I` (instruction fetch),
//! `R` (data read) or `W` (data write). Lines that do not start with a `0x`
//! address followed by a kind character are skipped. Any other kind
//! character is an error.

use crate::common::{AccessType, TraceError};
use std::io::BufRead;
use tracing::trace;

/// One parsed trace line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    pub kind: AccessType,
    pub addr: u64,
}

/// Parses a single line.
///
/// The line must start with `0x`. The hex digits run up to the first
/// non-hex character, and the next non-blank character is the kind, so
/// `0x10R` is a read of `0x10` while `0x12zz R` has kind `z`.
///
/// Returns `Ok(None)` for lines that carry no access.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<TraceEntry>, TraceError> {
    let Some(rest) = line.strip_prefix("0x") else {
        return Ok(None);
    };
    let rest = rest.trim_start();
    let digits = rest
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(rest.len());
    let Ok(addr) = u64::from_str_radix(&rest[..digits], 16) else {
        return Ok(None);
    };
    let Some(kind_char) = rest[digits..].trim_start().chars().next() else {
        return Ok(None);
    };

    match AccessType::from_trace_char(kind_char) {
        Some(kind) => Ok(Some(TraceEntry { kind, addr })),
        None => Err(TraceError::InvalidAccessType {
            line: line_no,
            kind: kind_char,
        }),
    }
}

/// Iterator over the accesses of a trace.
pub struct TraceReader<R> {
    reader: R,
    line_no: usize,
    buf: String,
    failed: bool,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceEntry, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            }
            self.line_no += 1;
            match parse_line(&self.buf, self.line_no) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => trace!(line = self.line_no, "skipped trace line"),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
