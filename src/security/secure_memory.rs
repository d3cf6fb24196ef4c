//! Secure Memory Utilities
//!
//! Scoped owners for secret material:
//! - `SecretString` wipes mnemonics and passphrases when it goes out of scope
//! - `secure_compare` compares without early exit
//!
//! Wiping happens in `Drop`, so early returns and `?` paths are covered the
//! same as the success path. Copies the allocator made before the value was
//! wrapped are out of reach.

use std::fmt;

use secrecy::{ExposeSecret, SecretBox};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// A string secret (mnemonic or passphrase) that zeroizes on drop.
pub struct SecretString {
    inner: SecretBox<str>,
    len: usize,
}

impl SecretString {
    /// Take ownership of `s`. The string must already be at capacity == len
    /// for the move into a box to avoid a reallocation; `normalize_secret`
    /// builds it that way.
    pub fn new(mut s: String) -> Self {
        if s.capacity() != s.len() {
            let mut exact = String::with_capacity(s.len());
            exact.push_str(&s);
            zeroize::Zeroize::zeroize(&mut s);
            s = exact;
        }
        let len = s.len();
        Self {
            inner: SecretBox::new(s.into_boxed_str()),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl ExposeSecret<str> for SecretString {
    fn expose_secret(&self) -> &str {
        self.inner.expose_secret()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretString")
            .field("len", &self.len)
            .finish()
    }
}

/// Normalize pasted or scanned secret text: trim, lowercase, and collapse
/// whitespace runs (including NBSP) to a single space.
pub fn normalize_secret(raw: &str) -> SecretString {
    // Case folding grows UTF-8 by at most half; no reallocation leaves a copy behind.
    let mut lower = Zeroizing::new(String::with_capacity(raw.len() * 2));
    for ch in raw.chars() {
        for folded in ch.to_lowercase() {
            lower.push(folded);
        }
    }

    let mut total = 0usize;
    for (i, word) in lower.split_whitespace().enumerate() {
        total += word.len() + usize::from(i > 0);
    }

    let mut out = String::with_capacity(total);
    for (i, word) in lower.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(word);
    }
    SecretString::new(out)
}

/// Secure comparison (constant-time over equal-length inputs)
pub fn secure_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
