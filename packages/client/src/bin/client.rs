//! Parlor chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parlor-client -- --url ws://127.0.0.1:8080/ws
//! ```

use clap::Parser;
use parlor_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "parlor-client", version, about = "Parlor chat client")]
struct Args {
    /// WebSocket URL of the server
    #[arg(short, long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Resume a session with a token from an earlier login
    #[arg(long)]
    cookie: Option<String>,

    /// Default log level (RUST_LOG overrides it)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = parlor_client::run_client(&args.url, args.cookie).await {
        tracing::error!("Client error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    // The readline thread may still be blocked on the terminal, and runtime
    // shutdown would wait for it.
    std::process::exit(0);
}
