//! stylestore CLI
//!
//! Command-line interface for a styles.json data directory.

use std::collections::BTreeMap;
use std::fs;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use stylestore::{Config, Engine, Result, Style, StyleError};
use tracing_subscriber::{fmt, EnvFilter};

/// stylestore CLI
#[derive(Parser, Debug)]
#[command(name = "stylestore")]
#[command(about = "Manage a case-insensitive style store")]
#[command(version)]
struct Args {
    /// Data directory (defaults to $DATA_ROOT, then /app/data)
    #[arg(short, long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all styles in name order
    List,

    /// Get a style by name
    Get {
        /// Style name (any case)
        name: String,
    },

    /// Add or replace a style from a JSON object
    Set {
        /// e.g. '{"styleName":"Heading","mode":1}'
        json: String,
    },

    /// Delete a style
    Delete {
        /// Style name (any case)
        name: String,
    },

    /// Rename a style
    Rename {
        old_name: String,
        new_name: String,
    },

    /// Import styles from a JSON file (array or key map)
    Import {
        /// Path to the JSON file
        file: String,

        /// Remove existing styles first
        #[arg(long)]
        replace: bool,
    },

    /// Export all styles as a key map
    Export,

    /// Remove all styles
    Clear,
}

/// Legacy bulk-export body
#[derive(Serialize)]
struct Export {
    styles: BTreeMap<String, Style>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        process::exit(if e.is_client_error() { 2 } else { 1 });
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir.into();
    }

    tracing::debug!("Data directory: {}", config.data_dir.display());

    // One-shot invocation: no background saver, flush on the way out
    let engine = Engine::new(config);
    engine.init(0);

    let result = execute(&engine, args.command);
    engine.close();
    result
}

fn execute(engine: &Engine, command: Commands) -> Result<()> {
    match command {
        Commands::List => print_json(&engine.list()),
        Commands::Get { name } => match engine.get(&name)? {
            Some(style) => print_json(&style),
            None => Err(StyleError::NotFound(name)),
        },
        Commands::Set { json } => {
            let value: Value = serde_json::from_str(&json)?;
            let key = engine.set_value(value)?;
            println!("{}", key);
            Ok(())
        }
        Commands::Delete { name } => {
            if !engine.delete(&name)? {
                tracing::info!("No style named \"{}\"", name);
            }
            Ok(())
        }
        Commands::Rename { old_name, new_name } => {
            if let Some(key) = engine.rename(&old_name, &new_name)? {
                println!("{}", key);
            }
            Ok(())
        }
        Commands::Import { file, replace } => {
            let value: Value = serde_json::from_slice(&fs::read(&file)?)?;
            engine.import(value, replace)?;
            tracing::info!("{} styles after import", engine.len());
            Ok(())
        }
        Commands::Export => print_json(&Export {
            styles: engine.export_map(),
        }),
        Commands::Clear => {
            engine.clear();
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
