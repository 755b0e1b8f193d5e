use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{error, info};
use modula_core::component::{ActivatorRegistry, ComponentManager};
use modula_core::kernel::config::RuntimeConfig;
use modula_core::kernel::error::{Error, Result};
use modula_core::kernel::Runtime;
use modula_core::specification::SpecificationParser;

/// Modula: a component runtime with isolated loading contexts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate component descriptors
    Check {
        /// Descriptor files to validate
        #[arg(required = true)]
        descriptors: Vec<PathBuf>,
    },
    /// Print the start order of the components under a directory
    Order {
        /// Directory scanned for descriptors
        dir: PathBuf,
    },
    /// Start every component, list what is running, then shut down
    Run {
        /// Runtime configuration file (.json, .toml, .yaml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory scanned for descriptors, overrides the configuration
        #[arg(long)]
        components: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = core_logging::init_subscriber("info") {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = match args.command {
        Commands::Check { descriptors } => check(&descriptors),
        Commands::Order { dir } => order(&dir),
        Commands::Run { config, components } => run(config.as_deref(), components),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn check(descriptors: &[PathBuf]) -> Result<()> {
    let mut invalid = 0;
    for path in descriptors {
        match SpecificationParser::parse_file(path) {
            Ok(spec) => println!("OK      {} ({})", path.display(), spec.id()),
            Err(e) => {
                invalid += 1;
                println!("INVALID {}: {}", path.display(), e);
            }
        }
    }
    if invalid > 0 {
        return Err(Error::Other(format!(
            "{} of {} descriptor(s) invalid",
            invalid,
            descriptors.len()
        )));
    }
    Ok(())
}

fn order(dir: &Path) -> Result<()> {
    let specs: Vec<_> = SpecificationParser::load_directory(dir)?
        .into_iter()
        .map(Arc::new)
        .collect();
    let ordered = ComponentManager::get_start_order(&specs)?;
    for (position, spec) in ordered.iter().enumerate() {
        let kind = if spec.is_managed() { " (managed)" } else { "" };
        println!("{}. {}{}", position + 1, spec.id(), kind);
    }
    Ok(())
}

fn run(config_path: Option<&Path>, components: Option<PathBuf>) -> Result<()> {
    let mut config = match config_path {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    }
    .with_env_overrides();
    if components.is_some() {
        config.components_dir = components;
    }

    let mut runtime = Runtime::new(config, ActivatorRegistry::new())?;
    core_logging::install(&mut runtime)?;
    let loaded = runtime.load_configured_components()?;
    info!("{} component(s) loaded from the components directory", loaded);

    if let Err(e) = runtime.start_all() {
        error!("Startup failed, stopping what was started: {}", e);
        if let Err(stop_error) = runtime.shutdown() {
            error!("{}", stop_error);
        }
        return Err(e);
    }

    println!("Running components:");
    for id in runtime.manager().running_components() {
        println!("  - {}", id);
    }

    runtime.shutdown()?;
    println!("Shutdown complete");
    Ok(())
}
