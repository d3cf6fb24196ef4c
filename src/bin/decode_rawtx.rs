//! Decode a signed raw transaction offline and print its fields plus the
//! quick checks a plain transfer must pass.
//!
//! Usage: `decode_rawtx <0xRAW_TX_HEX>` or pipe the hex on stdin.
//! Exits 1 on malformed input, 0 otherwise (check results are printed, not
//! enforced).

use anyhow::{bail, Context, Result};
use std::env;
use std::io::{self, Read};

use coldsign::tx::{decode_signed_transaction, parse_raw_hex};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let input = match args.as_slice() {
        [] => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        [hex] => hex.clone(),
        _ => bail!("usage: decode_rawtx <0xRAW_TX_HEX>  (or pipe via stdin)"),
    };

    let raw = parse_raw_hex(&input).context("hex decode")?;
    let decoded = decode_signed_transaction(&raw).context("tx decode")?;
    println!("{}", decoded.render());
    Ok(())
}
