//! # Wander Feed Client
//!
//! Terminal front end: renders the feed, pages it as you scroll and applies
//! likes and comments through the interaction reconciler.

use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

mod config;
mod console;
mod state;
mod telemetry;

use config::AppConfig;
use console::{Command, Console};
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    tracing::info!(
        backend = ?config.backend,
        production = config.production,
        "Starting feed client"
    );

    let state = AppState::new(&config).await;
    let mut console = Console::new(state);
    println!("{}", console.start().await);
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("failed to flush stdout")?;

        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read input")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => println!("{}", console.handle(command).await),
            Err(message) => println!("{message}"),
        }
    }

    console.shutdown();
    tracing::info!("Feed client stopped");
    Ok(())
}
