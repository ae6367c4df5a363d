//! # Seen-Tools Core
//!
//! Record store for previously recommended tools.
//!
//! - **Records**: dated `(name, desc)` pairs, validated at the append boundary
//! - **Store**: JSON Lines log with retention-based pruning
//! - **Legacy import**: one-shot migration of the old markdown log

pub mod clock;
pub mod errors;
pub mod legacy;
pub mod record;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ErrorCategory, SeenError, SeenResult};
pub use record::{NewRecord, Record};
pub use store::{MigrationReport, ReadOutcome, RecordStore, DEFAULT_RETENTION_DAYS};
