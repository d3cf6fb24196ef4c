//! # coldsign
//!
//! Entry point for the `coldsign` binary. Parses arguments, sets up
//! logging, and runs one command. Signed output goes to stdout; review,
//! prompts and logs go to stderr.
//!
//! Exit statuses: 0 signed, 1 error, 2 usage or review-only, 3 canceled.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Read};
use std::process::ExitCode;

use coldsign::intent::{encode_envelope, parse_intent};
use coldsign::pipeline::{self, ExitStatus, SignOutcome, SignRequest};
use coldsign::utils::format::separator;
use coldsign::utils::logging;
use coldsign::{Policy, TtyTerminal};

use cli::{AddrArgs, ColdsignCli, Commands, EncodeArgs, SignArgs};

fn main() -> ExitCode {
    let args = cli::with_default_subcommand(std::env::args_os().collect());
    let cli = ColdsignCli::parse_from(args);
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Sign(args) => run_sign(args),
        Commands::Addr(args) => run_addr(args),
        Commands::Encode(args) => run_encode(args),
        Commands::Version => {
            println!("coldsign {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitStatus::Success)
        }
    };

    match result {
        Ok(status) => ExitCode::from(status.code()),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(ExitStatus::Failure.code())
        }
    }
}

fn run_sign(args: SignArgs) -> Result<ExitStatus> {
    let input = if args.intent_stdin {
        eprintln!("READY: waiting for intent on stdin (JSON or coldintent:v1:...)");
        read_first_line()?
    } else if let Some(ref path) = args.intent_file {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read intent file {}", path.display()))?
    } else {
        eprintln!("usage: coldsign sign [flags] <intent.json>  (or --intent-stdin)");
        return Ok(ExitStatus::NotSigned);
    };

    let policy = match args.policy {
        Some(ref path) => Policy::load(path)?,
        None => Policy::default(),
    };

    let request = SignRequest {
        input: &input,
        authorize: args.sign,
        skip_confirmation: args.yes,
        expected_sender: args.expect_from.as_deref(),
    };

    let mut terminal = TtyTerminal::new();
    let outcome = pipeline::run(&policy, &request, &mut terminal)?;

    if let SignOutcome::Signed(ref signed) = outcome {
        println!("{}", separator(""));
        println!("Signed tx hash: {}", signed.hash_hex());
        println!("Signed raw tx hex: {}", signed.raw_hex());
        println!("DONE: signed transaction ready for broadcast");
    }
    Ok(outcome.exit_status())
}

fn run_addr(args: AddrArgs) -> Result<ExitStatus> {
    let mut terminal = TtyTerminal::new();
    let key = pipeline::read_secrets_and_derive(args.index, &mut terminal)?;
    println!("{}", key.checksum_address());
    Ok(ExitStatus::Success)
}

fn run_encode(args: EncodeArgs) -> Result<ExitStatus> {
    let json = match args.json_file {
        Some(ref path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let json = json.trim();
    parse_intent(json.as_bytes()).context("refusing to encode an invalid intent")?;
    println!("{}", encode_envelope(json.as_bytes()));
    Ok(ExitStatus::Success)
}

fn read_first_line() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim().to_string();
    if line.is_empty() {
        bail!("no intent provided on stdin");
    }
    Ok(line)
}
