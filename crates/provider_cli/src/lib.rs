//! GitLab provider CLI library exports for integration testing.
//!
//! The `gitlab-provider` binary is a thin host around [`provider_core`]: it resolves the
//! provider configuration, loads a resource's desired configuration and state from JSON
//! files, runs one lifecycle callback and writes the state back.

pub mod commands;
pub mod config;
pub mod errors;
pub mod state;
