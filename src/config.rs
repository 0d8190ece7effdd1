//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "rest-coach")]
#[command(about = "A voice-controlled rest-timer engine for guided workout sessions")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Rest duration between sets, in seconds
    #[arg(short, long, default_value = "60")]
    pub rest: u64,

    /// Locale handed to the speech recognizer
    #[arg(short, long, default_value = "pt-BR")]
    pub locale: String,

    /// Keep listening after each recognition cycle ends
    #[arg(short, long)]
    pub continuous: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
