//! Controlling-terminal I/O
//!
//! Confirmation answers are read from `/dev/tty`, never from stdin, so
//! whoever controls the intent transport (a pipe, a QR scanner) cannot also
//! answer the prompts. Secrets go through `dialoguer`'s hidden password
//! entry on the stderr terminal, which falls back to `/dev/tty` when stdin
//! is not a terminal. Prompts go to stderr.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::error::{ColdsignError, ColdsignResult};
use crate::security::secure_memory::{normalize_secret, SecretString};

const TTY_PATH: &str = "/dev/tty";

/// Operator-facing terminal used by the confirmation gate and secret entry.
pub trait Terminal {
    /// Show text to the operator.
    fn show(&mut self, text: &str) -> ColdsignResult<()>;

    /// Print `prompt` and read one visible line.
    fn read_line(&mut self, prompt: &str) -> ColdsignResult<String>;

    /// Print `prompt` and read one line with echo disabled. The result is
    /// normalized (trimmed, lowercased, whitespace runs collapsed). Empty
    /// input is an error unless `optional`.
    fn read_secret(&mut self, prompt: &str, optional: bool) -> ColdsignResult<SecretString>;
}

/// The process's controlling terminal.
#[derive(Debug, Default)]
pub struct TtyTerminal;

impl TtyTerminal {
    pub fn new() -> Self {
        Self
    }

    fn open() -> ColdsignResult<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(TTY_PATH)
            .map_err(|e| ColdsignError::terminal(format!("no TTY available: {}", e)))
    }
}

impl Terminal for TtyTerminal {
    fn show(&mut self, text: &str) -> ColdsignResult<()> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{}", text)?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> ColdsignResult<String> {
        let mut tty = Self::open()?;
        eprint!("{}", prompt);
        io::stderr().flush()?;
        let line = read_until_newline(&mut tty)?;
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    fn read_secret(&mut self, prompt: &str, optional: bool) -> ColdsignResult<SecretString> {
        eprintln!();
        let raw = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .report(false)
            .interact()
            .map(Zeroizing::new)
            .map_err(|e| ColdsignError::terminal(format!("secret entry failed: {}", e)))?;
        finish_secret(&raw, optional)
    }
}

/// Normalize `raw` and refuse empty input unless `optional`.
fn finish_secret(raw: &str, optional: bool) -> ColdsignResult<SecretString> {
    let secret = normalize_secret(raw);
    if secret.is_empty() && !optional {
        return Err(ColdsignError::terminal("empty input"));
    }
    Ok(secret)
}

/// Reads byte by byte so no userspace buffer keeps a copy past the newline.
fn read_until_newline(tty: &mut File) -> ColdsignResult<Zeroizing<Vec<u8>>> {
    let mut line = Zeroizing::new(Vec::with_capacity(256));
    let mut byte = [0u8; 1];
    loop {
        match tty.read(&mut byte) {
            Ok(0) => break,
            Ok(_) if byte[0] == b'\n' => break,
            Ok(_) if byte[0] == b'\r' => continue,
            Ok(_) => line.push(byte[0]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ColdsignError::terminal(format!("read error: {}", e))),
        }
    }
    Ok(line)
}

/// Scripted terminal for tests and embedding. Answers are consumed in order;
/// everything shown is recorded.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    answers: std::collections::VecDeque<String>,
    pub shown: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            shown: Vec::new(),
            prompts: Vec::new(),
        }
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: &str) -> ColdsignResult<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| ColdsignError::terminal("no scripted answer left"))
    }
}

impl Terminal for ScriptedTerminal {
    fn show(&mut self, text: &str) -> ColdsignResult<()> {
        self.shown.push(text.to_string());
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> ColdsignResult<String> {
        self.next_answer(prompt)
    }

    fn read_secret(&mut self, prompt: &str, optional: bool) -> ColdsignResult<SecretString> {
        let answer = Zeroizing::new(self.next_answer(prompt)?);
        finish_secret(&answer, optional)
    }
}
