//! Resource Naming Tool CLI
//!
//! Usage:
//!   resource-naming-tool [OPTIONS] <COMMAND>
//!
//! Commands:
//!   configure  Validate a TOML configuration and store it
//!   generate   Generate a resource name
//!   show       Print the stored configuration
//!   patterns   List the effective naming patterns
//!   status     Print version and store location
//!
//! Options:
//!   -d, --dir <PATH>  Store directory (default: ./.resourcenamingtool)
//!   -v, --verbose     Enable debug logging
//!   -h, --help        Print help

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use resource_naming_tool::template::select_pattern;
use resource_naming_tool::{
    configure, normalize_json, resolve, status, ConfigError, ConfigStore, Error, NamingConfig,
    NamingError, NamingFunction, NormalizeError, StoreConfig, StoreError,
};

#[derive(Parser)]
#[command(name = "resource-naming-tool")]
#[command(about = "Consistent cloud resource names from naming patterns")]
#[command(version)]
struct Cli {
    /// Store directory (default: ./.resourcenamingtool)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a TOML configuration and store it as the shared defaults
    Configure {
        /// Configuration file (TOML format)
        file: PathBuf,
    },

    /// Generate a resource name
    Generate {
        /// Parameter list as JSON, or `-` to read it from stdin
        #[arg(short, long)]
        params: Option<String>,

        /// Resource type, overriding the one in the parameters
        #[arg(short, long)]
        resource_type: Option<String>,

        /// Function-scoped overrides (TOML format)
        #[arg(short, long)]
        overrides: Option<PathBuf>,
    },

    /// Print the stored configuration
    Show,

    /// List the effective naming patterns
    Patterns {
        /// Only list resource types starting with this prefix
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Print version and store location
    Status,
}

/// A failed command, with an optional source report
struct Failure {
    error: Error,
    report: Option<String>,
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        Failure {
            error,
            report: None,
        }
    }
}

macro_rules! failure_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Failure {
            fn from(err: $ty) -> Self {
                Error::from(err).into()
            }
        })*
    };
}

failure_from!(ConfigError, NamingError, NormalizeError, StoreError);

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if let Err(failure) = run(cli) {
        eprintln!("Error: {}: {}", failure.error.summary(), failure.error);
        if let Some(report) = failure.report {
            eprintln!("{}", report);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Failure> {
    let store_config = || match &cli.dir {
        Some(dir) => StoreConfig::in_dir(dir),
        None => StoreConfig::default(),
    };

    match &cli.command {
        Command::Configure { file } => {
            let config = NamingConfig::from_file(file)?;
            let store = ConfigStore::new(config.store_config(cli.dir.clone()));
            configure(&store, &config)?;
            println!("Configuration stored in {}", store.path().display());
        }
        Command::Generate {
            params,
            resource_type,
            overrides,
        } => {
            let name = generate(
                ConfigStore::new(store_config()),
                params.as_deref(),
                resource_type.as_deref(),
                overrides.as_ref(),
            )?;
            println!("{}", name);
        }
        Command::Show => {
            let store = ConfigStore::new(store_config());
            match store.read()? {
                Some(snapshot) => {
                    println!("{}", snapshot.to_json().map_err(StoreError::from)?)
                }
                None => println!("No configuration stored in {}", store.path().display()),
            }
        }
        Command::Patterns { filter } => {
            let ctx = NamingFunction::new(ConfigStore::new(store_config())).context()?;
            let prefix = filter.as_deref().unwrap_or("");
            for (resource_type, entry) in ctx.patterns.iter() {
                if resource_type.starts_with(prefix) {
                    println!("{}\t{}\t({})", resource_type, entry.template, entry.source);
                }
            }
        }
        Command::Status => {
            let status = status(&ConfigStore::new(store_config()));
            println!("resource-naming-tool {}", status.version);
            println!("store: {}", status.store_path.display());
        }
    }
    Ok(())
}

fn generate(
    store: ConfigStore,
    params: Option<&str>,
    resource_type: Option<&str>,
    overrides: Option<&PathBuf>,
) -> Result<String, Failure> {
    let json = match params {
        Some("-") => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(NormalizeError::from)?;
            buffer
        }
        Some(json) => json.to_string(),
        None => String::new(),
    };
    let mut params = normalize_json(&json)?;
    if let Some(resource_type) = resource_type {
        params = params.with_resource_type(resource_type);
    }

    let mut function = NamingFunction::new(store);
    if let Some(path) = overrides {
        let snapshot = NamingConfig::from_file(path)?.validated_snapshot()?;
        function = function.with_overrides(snapshot);
    }

    let ctx = function.context()?;
    resolve(&params, &ctx).map_err(|err| {
        let report = match (&err, select_pattern(&params, &ctx)) {
            (NamingError::Unresolved { spans, .. }, Ok(selected)) if !spans.is_empty() => {
                Some(err.format(selected.template, selected.resource_type))
            }
            _ => None,
        };
        Failure {
            error: err.into(),
            report,
        }
    })
}
