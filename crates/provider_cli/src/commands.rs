//! Command modules for the GitLab provider CLI.
//!
//! - `lifecycle_cmd`: exists, create, read, update and delete against a state file
//! - `schema_cmd`: schema inspection and offline configuration validation

pub mod lifecycle_cmd;
pub mod schema_cmd;
