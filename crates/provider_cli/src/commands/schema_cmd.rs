//! Offline commands: print resource schemas and validate configuration files.

use std::path::PathBuf;

use clap::Args;
use provider_core::{resource_for, schemas, validate_resource_config, ResourceSchema};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::Error;
use crate::state::load_resource_config;

#[cfg(test)]
#[path = "schema_cmd_tests.rs"]
mod tests;

#[derive(Args, Debug, Clone, Default)]
pub struct SchemaArgs {
    /// Only print the schema of this resource type
    #[arg(long, short = 't')]
    pub resource_type: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Resource type the configuration is meant for
    #[arg(long, short = 't')]
    pub resource_type: String,

    /// JSON file with the desired configuration
    #[arg(long, short)]
    pub config: PathBuf,
}

/// Returns the schema of one resource type, or of all of them keyed by type name.
pub fn schema(args: &SchemaArgs) -> Result<Value, Error> {
    match &args.resource_type {
        Some(type_name) => to_json(resource_for(type_name)?.schema()),
        None => {
            let mut all = serde_json::Map::new();
            for schema in schemas() {
                all.insert(schema.type_name.to_string(), to_json(schema)?);
            }
            Ok(Value::Object(all))
        }
    }
}

/// Validates a configuration file without contacting GitLab.
///
/// # Errors
///
/// Returns `Error::Provider` holding every problem found, or a file error if the
/// configuration cannot be loaded.
pub fn validate(args: &ValidateArgs) -> Result<Value, Error> {
    let config = load_resource_config(&args.config)?;
    validate_resource_config(&args.resource_type, &config)?;

    info!(resource_type = %args.resource_type, "Configuration is valid");
    Ok(json!({ "valid": true }))
}

fn to_json(schema: &ResourceSchema) -> Result<Value, Error> {
    serde_json::to_value(schema).map_err(Error::Output)
}
