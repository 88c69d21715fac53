//! Provider configuration for the CLI.
//!
//! Flags win over the provider configuration file, which wins over the
//! `GITLAB_TOKEN` and `GITLAB_BASE_URL` environment variables.

use std::path::PathBuf;

use clap::Args;
use provider_core::{Provider, ProviderConfig, ProviderError, ProviderSettings};
use tracing::debug;

use crate::errors::Error;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Flags that configure the connection to GitLab.
#[derive(Args, Clone, Default)]
pub struct ProviderArgs {
    /// TOML file with `token` and `base_url`
    #[arg(long, global = true, value_name = "FILE")]
    pub provider_config: Option<PathBuf>,

    /// GitLab access token [default: $GITLAB_TOKEN]
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// GitLab API base URL [default: $GITLAB_BASE_URL, then https://gitlab.com/api/v4/]
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

impl std::fmt::Debug for ProviderArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderArgs")
            .field("provider_config", &self.provider_config)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ProviderArgs {
    /// Resolves the provider configuration from the flags, the file and the environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when no token can be found, the base URL is invalid,
    /// or the configuration file cannot be loaded.
    pub fn resolve(&self) -> Result<ProviderConfig, Error> {
        let explicit = ProviderSettings {
            token: self.token.clone(),
            base_url: self.base_url.clone(),
        };

        let resolved = match &self.provider_config {
            Some(path) => ProviderConfig::load(explicit, path),
            None => ProviderConfig::resolve(explicit),
        };
        let config = resolved.map_err(|e| match e {
            ProviderError::Configuration(message) => Error::Config(message),
            other => Error::Provider(other),
        })?;

        debug!(base_url = %config.base_url(), "Resolved provider configuration");
        Ok(config)
    }

    /// Resolves the configuration and builds a provider from it.
    pub fn build_provider(&self) -> Result<Provider, Error> {
        let config = self.resolve()?;
        Ok(Provider::configure(&config)?)
    }
}
