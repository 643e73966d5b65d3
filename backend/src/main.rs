//! csvmatrix CLI - serve matrix operations over HTTP
//!
//! ```bash
//! csvmatrix serve                       # Start HTTP server (port 8080)
//! csvmatrix apply sum matrix.csv        # Run one operation on a local file
//! csvmatrix operations                  # Show available operations
//! ```
//!
//! Server settings can also come from `CSVMATRIX_HOST`, `CSVMATRIX_PORT`
//! and `CSVMATRIX_MAX_UPLOAD_BYTES`, or a `.env` file.

use clap::{Parser, Subcommand};
use csvmatrix::{parse_grid_file, validate, Operation, ServerConfig};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "csvmatrix")]
#[command(about = "Echo, transpose, flatten, sum or multiply square CSV matrices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Maximum upload size in bytes
        #[arg(long)]
        max_upload_bytes: Option<usize>,
    },

    /// Apply an operation to a local CSV file and print the result
    Apply {
        /// echo, invert, flatten, sum or multiply
        operation: Operation,

        /// Input CSV file
        input: PathBuf,
    },

    /// Show available operations
    Operations,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            max_upload_bytes,
        } => cmd_serve(host, port, max_upload_bytes).await,

        Commands::Apply { operation, input } => cmd_apply(operation, &input),

        Commands::Operations => cmd_operations(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(
    host: Option<IpAddr>,
    port: Option<u16>,
    max_upload_bytes: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env()?;

    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(limit) = max_upload_bytes {
        config = config.with_max_upload_bytes(limit);
    }

    csvmatrix::server::start_server(config).await?;
    Ok(())
}

fn cmd_apply(operation: Operation, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let grid = parse_grid_file(input)?;
    let square = validate(grid)?;
    let output = operation.apply(&square)?;

    print!("{}", output);
    Ok(())
}

fn cmd_operations() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", csvmatrix::operations_description());
    Ok(())
}
