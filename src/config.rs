use clap::{Parser, Subcommand};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(version, about = "Audio mixer control via the PipeWire media session daemon")]
pub struct Config {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Verb to forward to the daemon
    #[command(subcommand)]
    pub command: Command,
}

/// Mixer verbs
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Get or set volume for a stream role
    Volume {
        /// Stream role the command applies to
        role: String,
        /// Volume to set (0-100); omit to query the current value
        #[arg(allow_negative_numbers = true)]
        value: Option<i32>,
    },
    /// Get or set mute for a stream role
    Mute {
        /// Stream role the command applies to
        role: String,
        /// Mute state to set (0 or 1); omit to query the current value
        #[arg(allow_negative_numbers = true)]
        value: Option<i32>,
    },
    /// Get or set the output zone for a stream role
    Zone {
        /// Stream role the command applies to
        role: String,
        /// Zone to set (0-4); omit to query the current value
        #[arg(allow_negative_numbers = true)]
        value: Option<i32>,
    },
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
