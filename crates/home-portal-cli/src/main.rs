// crates/home-portal-cli/src/main.rs
// ============================================================================
// Module: Home Portal CLI Entry Point
// Description: Command dispatcher for the Home Portal server.
// Purpose: Provide a safe CLI for serving the portal from local config.
// Dependencies: clap, home-portal, thiserror, tokio
// ============================================================================

//! ## Overview
//! The Home Portal CLI loads configuration, applies command-line overrides,
//! and runs the portal HTTP server. Configuration failures are reported on
//! stderr and surface as a non-zero exit code.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use home_portal::PortalConfig;
use home_portal::PortalServer;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "home-portal", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Home Portal HTTP server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Path to the portal configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Bind address override in `host:port` form.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate a configuration file.
    Validate {
        /// Path to the portal configuration file.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI result alias.
type CliResult<T> = Result<T, CliError>;

/// CLI execution errors.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration loading or validation failures.
    #[error("{0}")]
    Config(String),
    /// Server startup or runtime failures.
    #[error("{0}")]
    Server(String),
    /// Output stream failures.
    #[error("output error: {0}")]
    Output(String),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point.
#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            let _ = write_stderr_line(&format!("home-portal: {err}"));
            ExitCode::FAILURE
        }
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("home-portal {version}"))
            .map_err(|err| CliError::Output(err.to_string()))?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };
    match command {
        Commands::Serve(command) => command_serve(&command).await,
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

/// Runs the portal server from resolved configuration.
async fn command_serve(serve: &ServeCommand) -> CliResult<ExitCode> {
    let config = resolve_config(serve.config.as_deref(), serve.bind.as_deref())?;
    let server =
        PortalServer::from_config(config).map_err(|err| CliError::Server(err.to_string()))?;
    server.serve().await.map_err(|err| CliError::Server(err.to_string()))?;
    Ok(ExitCode::SUCCESS)
}

/// Validates configuration without starting the server.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate {
            config,
        } => {
            PortalConfig::load(config.as_deref())
                .map_err(|err| CliError::Config(err.to_string()))?;
            write_stdout_line("config ok").map_err(|err| CliError::Output(err.to_string()))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Loads configuration and applies CLI overrides.
fn resolve_config(
    config_path: Option<&std::path::Path>,
    bind: Option<&str>,
) -> CliResult<PortalConfig> {
    let mut config =
        PortalConfig::load(config_path).map_err(|err| CliError::Config(err.to_string()))?;
    if let Some(bind) = bind {
        config.server.bind = bind.to_string();
        config.validate().map_err(|err| CliError::Config(err.to_string()))?;
    }
    Ok(config)
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::Output(err.to_string()))?;
    write_stdout_line("").map_err(|err| CliError::Output(err.to_string()))?;
    Ok(())
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}
