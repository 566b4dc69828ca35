pub mod connections;
pub mod devices;
pub mod dial;
pub mod entries;
pub mod info;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dialr")]
#[command(about = "A safe dialer over the native connection API.")]
pub struct CommandLine {
    /// Reduce decorative output; repeat for results only
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show information about the tool and its backend
    #[command(alias = "i")]
    Info,
    /// List the phonebook's entries
    #[command(alias = "e")]
    Entries {
        /// Phonebook to read instead of the default one
        #[arg(long)]
        phonebook: Option<PathBuf>,
    },
    /// List dial-capable devices
    #[command(alias = "d")]
    Devices,
    /// List active connections
    #[command(alias = "c")]
    Connections,
    /// Dial a phonebook entry
    Dial {
        /// Name of the entry to dial
        entry: String,
        #[arg(short, long, default_value = "demo")]
        user: String,
        #[arg(short, long, default_value = "demo")]
        password: String,
        /// Give up after this many seconds
        #[arg(short, long)]
        timeout: Option<u64>,
        /// Phonebook to look the entry up in
        #[arg(long)]
        phonebook: Option<PathBuf>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
