//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::engine::EngineConfig;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-timer")]
#[command(about = "A single countdown timer with start, pause and reset over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Countdown length in seconds
    #[arg(short, long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    pub duration: u64,

    /// Milliseconds between ticks
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Engine parameters derived from the command line
    pub fn engine_config(&self) -> Result<EngineConfig, String> {
        EngineConfig::new(self.duration, Duration::from_millis(self.tick_ms))
    }
}
