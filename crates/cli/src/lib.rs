//! # Seen-Tools CLI Library
//!
//! Dedup log of recommended tools plus the listings printed by the CLI.

pub mod core;
pub mod report;

// Re-export core types for convenience
pub use core::{
    Clock, ErrorCategory, FixedClock, MigrationReport, NewRecord, ReadOutcome, Record,
    RecordStore, SeenError, SeenResult, SystemClock, DEFAULT_RETENTION_DAYS,
};
