//! gigadeploy - deploy the gigagen native library into the Unity project
//!
//! - `release`: both desktop libraries plus the binding, for shipping
//! - `reload <platform>`: one freshly named dev library the editor will load
//! - `config`: show how paths and names resolve

use anyhow::Result;
use clap::{Parser, Subcommand};
use gigadeploy_logging::LogConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

mod cli;

#[derive(Parser, Debug)]
#[command(
    name = "gigadeploy",
    version,
    about = "Publish or hot-reload the gigagen native library into the Unity project"
)]
struct Cli {
    /// Show debug logs and full error reports
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Native crate root (holds Cargo.toml, target/ and bindings/)
    #[arg(long, global = true, env = "GIGADEPLOY_NATIVE_ROOT", default_value = ".")]
    native_root: PathBuf,

    /// Unity project root [default: parent of the native root]
    #[arg(long, global = true, env = "GIGADEPLOY_PROJECT_ROOT")]
    project_root: Option<PathBuf>,

    /// Config file [default: <native-root>/gigadeploy.toml when present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Publish the Linux and Windows release libraries and the binding
    Release(cli::release::ReleaseArgs),

    /// Hot-reload one platform's dev library under a fresh name
    Reload(cli::reload::ReloadArgs),

    /// Show resolved paths and naming
    Config(cli::config::ConfigArgs),
}

fn command_wants_json(command: &Commands) -> bool {
    match command {
        Commands::Release(args) => args.json,
        Commands::Reload(args) => args.json,
        Commands::Config(args) => args.json,
    }
}

fn run_command(cli: Cli) -> Result<()> {
    let layout = cli::resolve_layout(
        &cli.native_root,
        cli.project_root.as_deref(),
        cli.config.as_deref(),
    )?;

    match cli.command {
        Commands::Release(args) => cli::release::run(&layout, args),
        Commands::Reload(args) => cli::reload::run(&layout, args),
        Commands::Config(args) => cli::config::run(&layout, args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let json_mode = command_wants_json(&cli.command);

    if let Err(err) = gigadeploy_logging::init_logging(LogConfig {
        app_name: "gigadeploy",
        verbose,
    }) {
        eprintln!("Warning: logging disabled: {:#}", err);
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            info!("command failed: {:#}", err);
            let helpful = cli::error::HelpfulError::from_anyhow(&err);
            if json_mode {
                cli::error::print_json_error(&helpful);
            } else {
                eprintln!("{}", helpful.render(verbose).trim_end());
            }
            ExitCode::from(1)
        }
    }
}
