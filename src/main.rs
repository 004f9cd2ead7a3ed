// SPDX-License-Identifier: MIT OR Apache-2.0

//! `layercfg`: inspect layered configuration from the command line.

use clap::{Parser, Subcommand};
use layercfg::adapters::{CommandLineOverrides, SourceLayout};
use layercfg::domain::{ConfigValue, Format};
use layercfg::service::{ConfigContext, ConfigDocument, ConfigRegistry};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Inspect layered application configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Application root holding config/, vendor/ and the .env files
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Store directory for cache artifacts (defaults to the user cache dir)
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    /// Neither read nor write the parse cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Override a value after loading, as PATH=VALUE (repeatable)
    #[arg(long = "set", value_name = "PATH=VALUE", global = true)]
    overrides: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one value of a source
    Get {
        /// Source identifier, e.g. "engine"
        source: String,
        /// Slash-delimited path, e.g. "db/host"
        path: String,
        /// Package whose config directory is searched
        #[arg(short, long)]
        package: Option<String>,
        /// Printed when the path is absent
        #[arg(short, long, default_value = "")]
        default: String,
    },
    /// Print every leaf of a source as `path = value`
    Dump {
        /// Source identifier
        source: String,
        /// Package whose config directory is searched
        #[arg(short, long)]
        package: Option<String>,
    },
    /// Print the merged .env and .env.local values
    Env,
    /// Remove a compiled artifact from the store
    Forget {
        /// Artifact name, e.g. "app-libraries"
        name: String,
    },
}

fn init_logging(verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn print_leaves(doc: &ConfigDocument) {
    for (path, value) in doc.flatten() {
        println!("{} = {}", path, value);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    if cli.no_cache {
        ConfigDocument::set_caching(false);
    }
    let context = match &cli.store {
        Some(store) => ConfigContext::new(SourceLayout::new(&cli.root), store),
        None => ConfigContext::from_default_location(&cli.root, "org", "layercfg")?,
    };
    let registry = ConfigRegistry::new(context);
    let overrides = CommandLineOverrides::from_pairs(&cli.overrides);

    match cli.command {
        Command::Get {
            source,
            path,
            package,
            default,
        } => {
            let doc = load(&registry, package.as_deref(), &source, &overrides)?;
            println!("{}", doc.get_one(&path, ConfigValue::from(default)));
        }
        Command::Dump { source, package } => {
            let doc = load(&registry, package.as_deref(), &source, &overrides)?;
            print_leaves(&doc);
        }
        Command::Env => {
            let mut doc = registry.build_env()?;
            doc.apply_overrides(&overrides);
            print_leaves(&doc);
        }
        Command::Forget { name } => {
            let compiler = registry
                .compiler()
                .ok_or("no store directory configured")?;
            if compiler.invalidate(&name) {
                println!("removed {}", compiler.artifact_path(&name).display());
            } else {
                println!("no artifact named {}", name);
            }
        }
    }
    Ok(())
}

fn load(
    registry: &ConfigRegistry,
    package: Option<&str>,
    source: &str,
    overrides: &CommandLineOverrides,
) -> Result<ConfigDocument, Box<dyn std::error::Error>> {
    let mut doc = registry
        .build_from(Format::KeyFile, package, source, true, false)?
        .ok_or("source not found")?;
    doc.apply_overrides(overrides);
    Ok(doc)
}
