//! Integration tests for statistics and reports.

use cachesim::common::AccessType;
use cachesim::config::CacheHierarchyConfig;
use cachesim::core::Hierarchy;
use cachesim::stats::{self, CacheStats, LevelReport};
use std::io::{self, Write};

/// Creates a hierarchy from argument strings.
fn create_hierarchy(icache: &str, dcache: &[&str]) -> Hierarchy {
    let config = CacheHierarchyConfig::from_args(Some(icache), dcache).unwrap();
    Hierarchy::new(&config, 1).unwrap()
}

/// Writer whose every write fails.
struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Tests derived rates.
#[test]
fn test_stats_rates() {
    let stats = CacheStats {
        reads: 8,
        writes: 2,
        compulsory_misses_read: 3,
        conflict_misses_read: 1,
        conflict_misses_write: 1,
        ..Default::default()
    };

    assert_eq!(stats.accesses(), 10);
    assert_eq!(stats.misses(), 5);
    assert_eq!(stats.hits(), 5);
    assert!((stats.hit_rate() - 50.0).abs() < 1e-9);
    assert!((stats.miss_rate() - 50.0).abs() < 1e-9);
    assert!((stats.miss_rate_without_compulsory() - 20.0).abs() < 1e-9);
}

/// Tests that an idle level reports zero rates.
#[test]
fn test_stats_empty() {
    let stats = CacheStats::default();
    assert_eq!(stats.hit_rate(), 0.0);
    assert_eq!(stats.miss_rate(), 0.0);
}

/// Tests the I-cache text report and the conflict label.
#[test]
fn test_report_icache() {
    let mut hierarchy = create_hierarchy("4:1:1:x", &[]);
    for addr in [0x00, 0x04, 0x08, 0x0C, 0x00] {
        hierarchy.handle_access(AccessType::Fetch, addr);
    }

    let report = LevelReport::new(hierarchy.icache()).to_string();
    assert!(report.starts_with("I-Cache statistics:"));
    assert!(report.contains("Number of reads performed: \t5"));
    assert!(report.contains("Words read from memory: \t4"));
    assert!(report.contains("Compulsory misses: \t\t4"));
    assert!(report.contains("Conflict misses: \t\t0"));
    assert!(report.contains("Miss rate w/ compulsory: \t80.00%"));
    assert!(!report.contains("writes performed"));
}

/// Tests the D-cache report and the capacity label.
#[test]
fn test_report_dcache() {
    let mut hierarchy = create_hierarchy("4:1:1:x", &["1:4:1:2:L:B:A"]);
    hierarchy.handle_access(AccessType::Read, 0x0);
    hierarchy.handle_access(AccessType::Write, 0x4);

    let report = LevelReport::new(hierarchy.dcache(1).unwrap()).to_string();
    assert!(report.starts_with("L1 D-Cache statistics:"));
    assert!(report.contains("Number of writes performed: \t1"));
    assert!(report.contains("Capacity misses"));
    assert!(report.contains("Write misses:"));
}

/// Tests the full text report and the configuration dump.
#[test]
fn test_write_report() {
    let hierarchy = create_hierarchy("8:1:2:R", &["1:8:1:1:x:T:N", "2:16:2:4:L:B:A"]);

    let mut out = Vec::new();
    stats::write_report(&hierarchy, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("I-Cache statistics:"));
    assert!(text.contains("L1 D-Cache statistics:"));
    assert!(text.contains("L2 D-Cache statistics:"));
    assert!(!text.contains("L3 D-Cache"));

    let mut out = Vec::new();
    stats::write_config(&hierarchy, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("replacement: Random"));
    assert!(text.contains("write scheme: write-through"));
    assert!(text.contains("allocation scheme: write-no-allocate"));
    assert!(text.contains("replacement: LRU"));
}

/// Tests the JSON report.
#[test]
fn test_write_json() {
    let mut hierarchy = create_hierarchy("4:1:1:x", &["1:4:1:1:x:B:A"]);
    hierarchy.handle_access(AccessType::Fetch, 0x0);
    hierarchy.handle_access(AccessType::Fetch, 0x0);
    hierarchy.handle_access(AccessType::Write, 0x0);

    let mut out = Vec::new();
    stats::write_json(&hierarchy, &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

    let levels = value.as_array().unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0]["name"], "I-Cache");
    assert_eq!(levels[0]["reads"], 2);
    assert_eq!(levels[0]["hit_rate"], 50.0);
    assert_eq!(levels[1]["name"], "L1 D-Cache");
    assert_eq!(levels[1]["writes"], 1);
    assert_eq!(levels[1]["compulsory_misses_write"], 1);
}

/// Tests that output failures surface from every report writer.
#[test]
fn test_report_write_errors() {
    let mut hierarchy = create_hierarchy("4:1:1:x", &["1:4:1:1:x:B:A"]);
    hierarchy.handle_access(AccessType::Read, 0x0);

    let err = stats::write_report(&hierarchy, &mut FailingWriter).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert!(stats::write_config(&hierarchy, &mut FailingWriter).is_err());
    assert!(stats::write_json(&hierarchy, &mut FailingWriter).is_err());
}
