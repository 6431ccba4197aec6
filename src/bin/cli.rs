//! kvstash CLI
//!
//! Command-line interface for inspecting and editing a kvstash file.

use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use kvstash::{Config, KvError, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// kvstash CLI
#[derive(Parser, Debug)]
#[command(name = "kvstash-cli")]
#[command(about = "CLI for kvstash key-value files")]
#[command(version)]
struct Args {
    /// Backing file
    #[arg(short, long, default_value = "./kvstash.db")]
    db: String,

    /// Lock timeout in milliseconds (0 waits forever)
    #[arg(short, long, default_value = "50")]
    timeout_ms: u64,

    /// Container name
    #[arg(short, long, default_value = Config::DEFAULT_CONTAINER)]
    container: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List all keys
    Ls,
}

fn main() {
    // Logs go to stderr so command output stays clean
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,kvstash=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), KvError> {
    let lock_timeout = match args.timeout_ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };

    let config = Config::builder()
        .path(&args.db)
        .container(args.container)
        .lock_timeout(lock_timeout)
        .build();

    let store = Store::open_with(config)?;

    let result = match args.command {
        Commands::Get { key } => store.get::<String>(&key).map(|value| println!("{}", value)),
        Commands::Set { key, value } => store.put(&key, &value),
        Commands::Del { key } => store.delete(&key),
        Commands::Ls => store.keys().map(|keys| {
            for key in keys {
                println!("{}", key);
            }
        }),
    };

    store.close()?;
    result
}
