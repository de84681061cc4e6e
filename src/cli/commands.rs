//! CLI commands and argument parsing

use crate::peers::parse_peer_ids;
use crate::render::Format;
use crate::types::PeerId;
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Save VK conversations in a machine-friendly format
#[derive(Parser, Debug)]
#[command(name = "vkms")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output directory where the materials are saved
    #[arg(short = 'o', value_name = "OUTDIR", global = true, default_value = "vkms-result")]
    pub out_dir: PathBuf,

    /// Comma-separated list of peer IDs to process.
    /// If not specified, all peers will be processed
    #[arg(short, long, global = true, value_parser = parse_peer_set, allow_hyphen_values = true)]
    pub include: Option<BTreeSet<PeerId>>,

    /// Comma-separated list of peer IDs that DON'T need to be processed.
    /// Ignored if --include is specified
    #[arg(short, long, global = true, value_parser = parse_peer_set, allow_hyphen_values = true)]
    pub exclude: Option<BTreeSet<PeerId>>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save VK API method outputs as JSON for further processing
    Dump {
        /// Access token of an account with scope of messages.
        /// The ACCESS_TOKEN env variable takes precedence
        #[arg(long)]
        token: Option<String>,

        /// Number of peers downloaded at the same time
        #[arg(short, long, default_value = "2")]
        threads: usize,

        /// Maximum number of messages saved in each conversation
        #[arg(short, long = "max-msgs", value_name = "MAX", default_value = "75000")]
        max_msgs: usize,

        /// Request one page per call instead of running batches through `execute`
        #[arg(long)]
        no_execute: bool,
    },

    /// Convert saved dumps into human-readable transcripts
    Parse {
        /// Transcript format
        #[arg(short = 'f', value_name = "FORMAT", value_enum, default_value_t = Format::Txt)]
        fmt: Format,
    },

    /// List the peer IDs that would be processed
    Peers {
        /// Access token of an account with scope of messages.
        /// The ACCESS_TOKEN env variable takes precedence
        #[arg(long)]
        token: Option<String>,
    },
}

fn parse_peer_set(value: &str) -> Result<BTreeSet<PeerId>, String> {
    parse_peer_ids(value).map_err(|e| e.to_string())
}
