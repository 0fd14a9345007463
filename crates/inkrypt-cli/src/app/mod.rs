//! Application-level utilities for the Inkrypt CLI.
//!
//! This module provides:
//! - Path resolution for config, journal and settings files
//! - PIN and password prompts
//! - Unlocking with retry logic and opening the journal

mod context;
mod input;
mod journal;
mod resolver;
mod unlock;

// Re-export public API
pub use context::AppContext;
pub use input::{confirm, prompt_archive_password, prompt_new_pin, read_body};
pub use resolver::resolve_config_path;
