// # -----------------------------
// # crates/common/src/lib.rs
// # -----------------------------
//! Runtime data layout and configuration shared by the seen-tools crates.

pub mod config;
pub mod fs;
pub mod paths;

pub use config::{EmailSettings, EnvFile, Settings, Source};
pub use paths::{RuntimePaths, DEFAULT_SKILL_NAME};
