//! Application-level utilities for the Strongbox CLI.
//!
//! This module provides:
//! - Path resolution for config and vault files
//! - The command context (CLI args plus config)
//! - Master password prompting and unlock with retry logic

mod context;
mod resolver;
mod unlock;

// Re-export public API
pub use context::AppContext;
pub use unlock::{open_vault, prompt_new_master_password, OpenVault};
