use std::path::PathBuf;

use clap::Args;
use provider_core::{Provider, ResourceData};
use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::errors::Error;
use crate::state::{load_resource_config, StateFile};

#[cfg(test)]
#[path = "lifecycle_cmd_tests.rs"]
mod tests;

/// Arguments shared by the lifecycle commands.
#[derive(Args, Debug, Clone)]
pub struct ResourceArgs {
    /// Resource type, e.g. gitlab_group or gitlab_project
    #[arg(long, short = 't')]
    pub resource_type: String,

    /// JSON file with the desired configuration
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// JSON state file; read before and rewritten after the operation
    #[arg(long, short)]
    pub state: PathBuf,
}

/// The lifecycle callback to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Exists,
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Exists => "exists",
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn needs_config(&self) -> bool {
        matches!(self, Operation::Create | Operation::Update)
    }
}

/// Runs one lifecycle callback and returns what the command prints.
///
/// `exists` leaves the state file untouched and returns `{"exists": bool}`. Every other
/// operation rewrites the state file on success and returns its new content. A `create`
/// that fails after GitLab assigned an ID still records that ID before the error is
/// returned.
///
/// # Errors
///
/// Returns `Error::InvalidArguments` when `--config` is missing for create/update or when
/// create is asked to run against a state that already has an identifier. File and
/// provider failures are passed through; apart from the partial `create` above, the state
/// file is not rewritten on failure.
#[instrument(skip(provider))]
pub async fn execute(
    provider: &Provider,
    operation: Operation,
    args: &ResourceArgs,
) -> Result<Value, Error> {
    let config = match &args.config {
        Some(path) => load_resource_config(path)?,
        None if operation.needs_config() => {
            return Err(Error::InvalidArguments(format!(
                "--config is required for {}",
                operation.name()
            )))
        }
        None => Map::new(),
    };

    let state = StateFile::load(&args.state)?;
    if operation == Operation::Create {
        if let Some(id) = &state.id {
            return Err(Error::InvalidArguments(format!(
                "{:?} already records resource {}; use update instead",
                args.state, id
            )));
        }
    }

    let mut data = state.into_resource_data(config);
    let resource_type = args.resource_type.as_str();

    debug!(operation = operation.name(), resource_type, "Running lifecycle operation");
    match operation {
        Operation::Exists => {
            let exists = provider.exists(resource_type, &data).await?;
            return Ok(json!({ "exists": exists }));
        }
        Operation::Create => {
            if let Err(e) = provider.create(resource_type, &mut data).await {
                // An ID means the object exists remotely; it must reach the state file.
                if data.id().is_some() {
                    warn!(
                        id = data.id(),
                        "Create failed after the object was created; recording its ID"
                    );
                    StateFile::from(data).save(&args.state)?;
                }
                return Err(e.into());
            }
        }
        Operation::Read => provider.read(resource_type, &mut data).await?,
        Operation::Update => provider.update(resource_type, &mut data).await?,
        Operation::Delete => provider.delete(resource_type, &mut data).await?,
    }

    save(data, &args.state)
}

fn save(data: ResourceData, path: &std::path::Path) -> Result<Value, Error> {
    let state = StateFile::from(data);
    state.save(path)?;
    if state.id.is_none() {
        info!("Resource no longer exists; state cleared");
    }
    serde_json::to_value(&state).map_err(Error::Output)
}
