//! # CLI Interface
//!
//! Command-line structure for `coldsign` using `clap` derive. Subcommands:
//! `sign`, `addr`, `encode` and `version`. A bare intent file path is
//! accepted in place of `sign <file>`.

use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Air-gapped signer for EIP-1559 ETH transfers.
#[derive(Parser, Debug)]
#[command(
    name = "coldsign",
    about = "Offline EIP-1559 transfer signer",
    version,
    propagate_version = true
)]
pub struct ColdsignCli {
    /// Print debug logs to stderr (also enabled by COLDSIGN_DEBUG=1).
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review an intent and, with --sign, sign it.
    Sign(SignArgs),
    /// Derive and print the address for an account index.
    Addr(AddrArgs),
    /// Wrap intent JSON into a coldintent:v1: envelope.
    Encode(EncodeArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Intent file: JSON or a coldintent:v1: envelope.
    pub intent_file: Option<PathBuf>,

    /// Read the intent from the first line of stdin instead of a file.
    #[arg(long, conflicts_with = "intent_file")]
    pub intent_stdin: bool,

    /// Authorize signing. Without it the intent is only reviewed.
    #[arg(long)]
    pub sign: bool,

    /// Skip the interactive confirmation gate (dangerous).
    #[arg(long)]
    pub yes: bool,

    /// JSON policy file overriding the built-in limits.
    #[arg(long, env = "COLDSIGN_POLICY")]
    pub policy: Option<PathBuf>,

    /// Sender address the derived key must match.
    #[arg(long, value_name = "ADDRESS")]
    pub expect_from: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddrArgs {
    /// BIP-44 account index (m/44'/60'/0'/0/INDEX).
    #[arg(long)]
    pub index: u32,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Intent JSON file; stdin when omitted.
    pub json_file: Option<PathBuf>,
}

const SUBCOMMANDS: &[&str] = &["sign", "addr", "encode", "version", "help"];

/// `coldsign <intent-file> [flags]` is treated as `coldsign sign <intent-file> [flags]`.
pub fn with_default_subcommand(mut args: Vec<OsString>) -> Vec<OsString> {
    let insert = match args.get(1) {
        Some(first) => {
            let s = first.to_string_lossy();
            !s.starts_with('-')
                && !SUBCOMMANDS.contains(&s.as_ref())
                && Path::new(first).is_file()
        }
        None => false,
    };
    if insert {
        args.insert(1, OsString::from("sign"));
    }
    args
}
