//! Simulation statistics collection and reporting.
//!
//! Each cache level owns a [`CacheStats`] whose counters only ever grow.
//! Rates are derived from the counters when a report is produced.

use crate::core::units::cache::{CacheKind, CacheLevel, Outcome};
use crate::core::Hierarchy;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

/// Per-level counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads performed (instruction fetches count as reads).
    pub reads: u64,
    pub writes: u64,
    /// Words brought in by block fills.
    pub words_loaded: u64,
    /// Words sent to the next level: write-through stores, non-allocated
    /// write misses and dirty block write-backs.
    pub words_stored: u64,
    pub compulsory_misses_read: u64,
    pub conflict_misses_read: u64,
    pub compulsory_misses_write: u64,
    pub conflict_misses_write: u64,
    /// Dirty blocks evicted.
    pub writebacks: u64,
}

impl CacheStats {
    pub(crate) fn record_miss(&mut self, is_write: bool, outcome: Outcome) {
        let counter = match (is_write, outcome) {
            (false, Outcome::CompulsoryMiss) => &mut self.compulsory_misses_read,
            (false, Outcome::ConflictOrCapacityMiss) => &mut self.conflict_misses_read,
            (true, Outcome::CompulsoryMiss) => &mut self.compulsory_misses_write,
            (true, Outcome::ConflictOrCapacityMiss) => &mut self.conflict_misses_write,
            _ => return,
        };
        *counter += 1;
    }

    pub fn accesses(&self) -> u64 {
        self.reads + self.writes
    }

    pub fn read_misses(&self) -> u64 {
        self.compulsory_misses_read + self.conflict_misses_read
    }

    pub fn write_misses(&self) -> u64 {
        self.compulsory_misses_write + self.conflict_misses_write
    }

    pub fn compulsory_misses(&self) -> u64 {
        self.compulsory_misses_read + self.compulsory_misses_write
    }

    pub fn conflict_misses(&self) -> u64 {
        self.conflict_misses_read + self.conflict_misses_write
    }

    pub fn misses(&self) -> u64 {
        self.read_misses() + self.write_misses()
    }

    pub fn hits(&self) -> u64 {
        self.accesses() - self.misses()
    }

    /// Hit rate over all accesses, in percent.
    pub fn hit_rate(&self) -> f64 {
        percent(self.hits(), self.accesses())
    }

    /// Miss rate over all accesses, in percent.
    pub fn miss_rate(&self) -> f64 {
        percent(self.misses(), self.accesses())
    }

    /// Miss rate counting only conflict/capacity misses, in percent.
    pub fn miss_rate_without_compulsory(&self) -> f64 {
        percent(self.conflict_misses(), self.accesses())
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Text report of one level.
pub struct LevelReport<'a> {
    level: &'a CacheLevel,
}

impl<'a> LevelReport<'a> {
    pub fn new(level: &'a CacheLevel) -> Self {
        Self { level }
    }
}

impl fmt::Display for LevelReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.level.stats();
        let label = self.level.miss_label();
        let is_data = matches!(self.level.kind(), CacheKind::Data { .. });

        writeln!(f, "{} statistics:", self.level.name())?;
        writeln!(f, "\tNumber of reads performed: \t{}", s.reads)?;
        if is_data {
            writeln!(f, "\tNumber of writes performed: \t{}", s.writes)?;
        }
        writeln!(f, "\tWords read from memory: \t{}", s.words_loaded)?;
        if is_data {
            writeln!(f, "\tWords written to memory: \t{}", s.words_stored)?;
        }
        write_misses(
            f,
            "Read",
            label,
            s.compulsory_misses_read,
            s.conflict_misses_read,
            s.reads,
        )?;
        if is_data {
            write_misses(
                f,
                "Write",
                label,
                s.compulsory_misses_write,
                s.conflict_misses_write,
                s.writes,
            )?;
        }
        Ok(())
    }
}

fn write_misses(
    f: &mut fmt::Formatter<'_>,
    what: &str,
    label: &str,
    compulsory: u64,
    conflict: u64,
    total: u64,
) -> fmt::Result {
    writeln!(f, "\t{} misses:", what)?;
    writeln!(f, "\t  Compulsory misses: \t\t{}", compulsory)?;
    writeln!(f, "\t  {} misses: \t\t{}", label, conflict)?;
    writeln!(
        f,
        "\t  Miss rate w/ compulsory: \t{:.2}%",
        percent(compulsory + conflict, total)
    )?;
    writeln!(
        f,
        "\t  Miss rate w/o compulsory: \t{:.2}%",
        percent(conflict, total)
    )
}

/// Counters of one level in the JSON report.
#[derive(Serialize)]
struct LevelSummary<'a> {
    name: &'a str,
    #[serde(flatten)]
    stats: &'a CacheStats,
    hit_rate: f64,
    miss_rate: f64,
    miss_rate_without_compulsory: f64,
}

/// Writes the text report of every enabled level.
pub fn write_report<W: Write>(hierarchy: &Hierarchy, out: &mut W) -> io::Result<()> {
    for level in hierarchy.levels() {
        writeln!(out)?;
        write!(out, "{}", LevelReport::new(level))?;
    }
    Ok(())
}

/// Writes the counters of every enabled level as a JSON array.
pub fn write_json<W: Write>(hierarchy: &Hierarchy, out: &mut W) -> io::Result<()> {
    let summaries: Vec<LevelSummary<'_>> = hierarchy
        .levels()
        .map(|level| {
            let stats = level.stats();
            LevelSummary {
                name: level.name(),
                stats,
                hit_rate: stats.hit_rate(),
                miss_rate: stats.miss_rate(),
                miss_rate_without_compulsory: stats.miss_rate_without_compulsory(),
            }
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &summaries)?;
    writeln!(out)
}

/// Prints the text report to standard output.
pub fn print(hierarchy: &Hierarchy) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_report(hierarchy, &mut lock)?;
    lock.flush()
}

/// Writes the configuration summary printed before a simulation.
pub fn write_config<W: Write>(hierarchy: &Hierarchy, out: &mut W) -> io::Result<()> {
    for level in hierarchy.levels() {
        let cfg = level.config();
        writeln!(out, "{}:", level.name())?;
        writeln!(out, "\t{} blocks", cfg.num_blocks)?;
        writeln!(out, "\t{} word(s) per block", cfg.words_per_block)?;
        writeln!(out, "\t{}-way associative", cfg.associativity)?;
        if cfg.associativity > 1 {
            writeln!(out, "\treplacement: {}", cfg.policy)?;
        }
        if let CacheKind::Data {
            write_policy,
            allocate_policy,
        } = level.kind()
        {
            writeln!(out, "\twrite scheme: {}", write_policy)?;
            writeln!(out, "\tallocation scheme: {}", allocate_policy)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
