use clap::Parser;
use saboteur_client::config::{ClientConfig, GAME_PATH, MAX_RECONNECT_ATTEMPTS, RECONNECT_DELAY_MS};
use tracing_subscriber::EnvFilter;

mod client;
mod command;

#[derive(Parser)]
#[command(name = "saboteur")]
#[command(about = "Play Saboteur against a game server from the terminal", long_about = None)]
struct Cli {
    /// WebSocket server URL
    #[arg(short, long, default_value = "ws://127.0.0.1:8080")]
    server: String,

    /// Path of the game socket on the server
    #[arg(short, long, default_value = GAME_PATH)]
    path: String,

    /// Delay between reconnection attempts, in milliseconds
    #[arg(long, default_value_t = RECONNECT_DELAY_MS)]
    reconnect_delay_ms: u64,

    /// Reconnection attempts before giving up
    #[arg(long, default_value_t = MAX_RECONNECT_ATTEMPTS)]
    max_reconnect: u32,
}

/// Append `path` to `server` unless the user already included it.
fn game_url(server: &str, path: &str) -> String {
    let path = format!("/{}", path.trim_start_matches('/'));
    if server.ends_with(&path) {
        server.to_string()
    } else {
        format!("{}{}", server.trim_end_matches('/'), path)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let url = game_url(&cli.server, &cli.path);
    let config = ClientConfig {
        max_reconnect_attempts: cli.max_reconnect,
        reconnect_delay_ms: cli.reconnect_delay_ms,
        game_path: cli.path,
        ..ClientConfig::default()
    };

    println!("Connecting to {url}... (type 'help' for commands)");

    if let Err(e) = client::run(url, config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
