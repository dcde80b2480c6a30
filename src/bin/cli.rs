//! flatkv CLI
//!
//! Command-line interface for a flatkv store file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flatkv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// flatkv CLI
#[derive(Parser, Debug)]
#[command(name = "flatkv-cli")]
#[command(about = "CLI for the flatkv flat-file key-value store")]
#[command(version)]
struct Args {
    /// Directory holding the store file
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Store file name inside the data directory
    #[arg(short, long, default_value = Config::DEFAULT_FILE_NAME)]
    file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a record (fails if the key exists)
    Create {
        /// The key to create
        key: String,

        /// The value, as JSON text
        value: String,

        /// Seconds to live, or "infinite"
        #[arg(short, long)]
        ttl: Option<String>,
    },

    /// Read a value by key
    Read {
        /// The key to read
        key: String,
    },

    /// Delete a key
    Delete {
        /// The key to delete
        key: String,
    },

    /// List every record, expired ones included
    List,
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries values only.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,flatkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .file_name(&args.file)
        .build();

    let engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&engine, args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(engine: &Engine, command: Commands) -> flatkv::Result<()> {
    match command {
        Commands::Create { key, value, ttl } => {
            engine.create_raw(&key, &value, ttl.as_deref())?;
            println!("created {}", key);
        }
        Commands::Read { key } => {
            let value = engine.read(&key)?;
            println!("{}", value);
        }
        Commands::Delete { key } => {
            engine.delete(&key)?;
            println!("deleted {}", key);
        }
        Commands::List => {
            for record in engine.scan_all()? {
                println!(
                    "{}\t{}\tttl={}\tcreated={}",
                    record.key,
                    record.value,
                    record.ttl,
                    record.created_time.format(flatkv::record::TIMESTAMP_FORMAT)
                );
            }
        }
    }

    Ok(())
}
