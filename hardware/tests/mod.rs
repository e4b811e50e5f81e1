//! Test module organization.
//!
//! This module organizes all integration tests for the cache simulator.



/// Address decomposition tests.
mod decoder_tests;


/// Statistics and report tests.
mod stats_tests;
