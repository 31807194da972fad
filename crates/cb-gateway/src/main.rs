//! cordbridge: Discord interactions webhook + gateway session
//!
//! Usage:
//!   cordbridge            - Start the HTTP server and log into the gateway
//!   cordbridge --help     - Show help
//!   cordbridge --version  - Show version

mod app;

use cb_core::Config;
use cb_discord::GatewaySession;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Serve interactions and run the gateway session
    Server,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("cordbridge {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Server => {}
    }

    // Load .env file first so RUST_LOG from it reaches the filter
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    tracing::info!("Starting cordbridge...");
    tracing::debug!("Configuration: {:?}", config);

    let addr = app::bind_addr(&config);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    let session = GatewaySession::serenity(config.discord_token.clone());

    app::run_bridge(&config, session, listener, app::shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Server
}

/// Print help message
fn print_help() {
    println!("cordbridge - Discord interactions webhook and gateway bridge");
    println!();
    println!("Usage:");
    println!("  cordbridge            Start the HTTP server and gateway session");
    println!("  cordbridge --help     Show this help message");
    println!("  cordbridge --version  Show version");
    println!();
    println!("Environment Variables:");
    println!("  DISCORD_TOKEN        Bot token for the gateway (required)");
    println!("  DISCORD_PUBLIC_KEY   Application public key, hex (required)");
    println!("  PORT                 HTTP listener port (default: 3000)");
    println!("  INTERACTION_REPLY    Reply content for commands (default: Hello from ngrok!)");
    println!("  RUST_LOG             Log filter (default: info)");
    println!();
    println!("Settings may also be placed in ./cordbridge.toml; environment variables win.");
}
