//! JSON files holding a resource's desired configuration and recorded state.
//!
//! A state file looks like this:
//!
//! ```json
//! {
//!   "id": "42",
//!   "attributes": { "name": "infra", "path": "infra", "web_url": "..." }
//! }
//! ```
//!
//! A missing state file stands for a resource that has not been created yet.

use std::{fs, path::Path};

use provider_core::ResourceData;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::errors::Error;

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

/// The persisted part of one resource instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    /// GitLab's numeric ID as a string, `null` once the object is gone
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl StateFile {
    /// Loads a state file, treating a missing file as an empty state.
    ///
    /// # Errors
    ///
    /// Returns `Error::ReadFile` if the file exists but cannot be read, or
    /// `Error::ParseJson` if it is not a valid state document.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            debug!("No state file at {:?}, starting from empty state", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| Error::ParseJson {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the state file as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let write_error = |source| Error::WriteFile {
            path: path.to_path_buf(),
            source,
        };

        let content = serde_json::to_string_pretty(self).map_err(Error::Output)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, content).map_err(write_error)?;

        info!("State saved to {:?}", path);
        Ok(())
    }

    /// Combines this state with a desired configuration for a lifecycle callback.
    pub fn into_resource_data(self, config: Map<String, Value>) -> ResourceData {
        ResourceData::with_state(self.id, self.attributes, config)
    }
}

impl From<ResourceData> for StateFile {
    fn from(data: ResourceData) -> Self {
        let (id, attributes) = data.into_state();
        Self { id, attributes }
    }
}

/// Loads a desired configuration: a JSON object of attribute values.
///
/// # Errors
///
/// Returns `Error::ReadFile` or `Error::ParseJson` when the file cannot be used,
/// including when it holds JSON that is not an object.
pub fn load_resource_config(path: &Path) -> Result<Map<String, Value>, Error> {
    debug!("Loading resource configuration from {:?}", path);

    let content = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::ParseJson {
        path: path.to_path_buf(),
        source,
    })
}
