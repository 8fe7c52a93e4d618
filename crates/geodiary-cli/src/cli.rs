//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};

use geodiary_core::SyncMode;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "geodiary")]
#[command(author, version, about = "Offline-tolerant location diary with queued sync", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record the current location into the local queue
    Record {
        /// Sensor helper command printing one JSON position object
        /// (overrides config and GEODIARY_SENSOR_COMMAND)
        #[arg(long)]
        sensor_command: Option<String>,
    },

    /// List the queued locations
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete one queued location by its position (0-based, oldest first)
    Delete {
        /// Index from the current `geodiary list` output
        index: usize,
    },

    /// Empty the local queue without syncing
    Clear,

    /// Send queued locations to the configured endpoint, then drop the
    /// delivered ones from the queue
    Sync {
        /// Delivery mode: single, batch, or sequential
        #[arg(short, long, default_value = "batch")]
        mode: SyncMode,
    },

    /// Print the viewer deep link for this device
    Link {
        /// Reference date (YYYY-MM-DD, UTC); defaults to the newest queued
        /// point's date, or today when the queue is empty
        #[arg(long)]
        date: Option<String>,
    },

    /// Show device identity, queue length, and configuration
    Status,
}
