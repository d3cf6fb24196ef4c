//! Generate a fresh 24-word BIP-39 mnemonic on an offline machine.
//!
//! Usage: `gen_mnemonic --print`. The phrase goes to stdout after a warning
//! on stderr; nothing is written anywhere else.

use anyhow::{bail, Result};
use std::env;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use coldsign::wallet::generate_mnemonic;

const WARNING: &str = "\x1b[31m!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!
!!!  SECURITY WARNING - READ CAREFULLY      !!!
!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!
YOU ARE ABOUT TO GENERATE A WALLET MNEMONIC.

THIS WILL BE PRINTED TO STDOUT.

IF YOU ARE NOT ALONE, YOUR TERMINAL MAY BE
LOGGED, OR THIS SCREEN MAY BE RECORDED:

EXIT NOW AND REGENERATE IN A PRIVATE SESSION.
!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!\x1b[0m";

/// Time to read the warning (and hit Ctrl-C) before the phrase appears.
const WARNING_PAUSE: Duration = Duration::from_millis(1500);

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 1 || args[0] != "--print" {
        bail!("usage: gen_mnemonic --print");
    }

    let phrase = generate_mnemonic()?;

    eprintln!("{}", WARNING);
    thread::sleep(WARNING_PAUSE);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", phrase.as_str())?;
    stdout.flush()?;
    Ok(())
}
