use clap::{Parser, Subcommand};
use provider_cli::commands::lifecycle_cmd::{self, Operation, ResourceArgs};
use provider_cli::commands::schema_cmd::{self, SchemaArgs, ValidateArgs};
use provider_cli::config::ProviderArgs;
use serde_json::Value;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// GitLab provider: manage GitLab groups and projects as declarative resources
#[derive(Parser, Debug)]
#[command(name = "gitlab-provider", version)]
#[command(about = "Manage GitLab groups and projects as declarative resources", long_about = None)]
struct Cli {
    #[command(flatten)]
    provider: ProviderArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the attribute schema of the resource types
    Schema(SchemaArgs),

    /// Check a configuration file without contacting GitLab
    Validate(ValidateArgs),

    /// Report whether the resource recorded in the state file still exists
    Exists(ResourceArgs),

    /// Create the resource and record it in the state file
    Create(ResourceArgs),

    /// Refresh the state file from GitLab
    Read(ResourceArgs),

    /// Apply configuration changes to the recorded resource
    Update(ResourceArgs),

    /// Delete the recorded resource
    Delete(ResourceArgs),
}

impl Commands {
    fn lifecycle(&self) -> Option<(Operation, &ResourceArgs)> {
        match self {
            Commands::Exists(args) => Some((Operation::Exists, args)),
            Commands::Create(args) => Some((Operation::Create, args)),
            Commands::Read(args) => Some((Operation::Read, args)),
            Commands::Update(args) => Some((Operation::Update, args)),
            Commands::Delete(args) => Some((Operation::Delete, args)),
            Commands::Schema(_) | Commands::Validate(_) => None,
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<Value> {
    let output = match &cli.command {
        Commands::Schema(args) => schema_cmd::schema(args)?,
        Commands::Validate(args) => schema_cmd::validate(args)?,
        command => {
            let (operation, args) = command
                .lifecycle()
                .ok_or_else(|| anyhow::anyhow!("{command:?} is not a lifecycle command"))?;
            let provider = cli.provider.build_provider()?;
            lifecycle_cmd::execute(&provider, operation, args).await?
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the JSON result
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("GITLAB_PROVIDER_LOG"))
        .init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                error!("Error: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
