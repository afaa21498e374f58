//! Parlor chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parlor-server -- --port 8080 --credential-db data/users.db
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use parlor_server::{ServerConfig, config::DEFAULT_BACKLOG};
use parlor_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "parlor-server", version, about = "Parlor chat message router")]
struct Args {
    /// Host name or IP address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Listen backlog
    #[arg(long, default_value_t = DEFAULT_BACKLOG)]
    backlog: u32,

    /// Session token lifetime in seconds
    #[arg(long, default_value_t = 300)]
    session_ttl: u64,

    /// SQLite file for registered users (in-memory when omitted)
    #[arg(long, value_name = "PATH")]
    credential_db: Option<PathBuf>,

    /// Default log level (RUST_LOG overrides it)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            backlog: args.backlog,
            session_ttl: Duration::from_secs(args.session_ttl),
            credential_db: args.credential_db,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = parlor_server::run_server(args.into()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
