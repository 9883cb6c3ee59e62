// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generation over selectable character classes.

use rand::Rng;
use tracing::warn;

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Which character classes to draw from, and how many characters to emit.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 16,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
        }
    }
}

/// Generate a random password.
///
/// Characters are drawn uniformly from the enabled classes using the
/// thread-local CSPRNG. If every class is disabled, all classes are used
/// instead of producing an empty pool.
pub fn generate(options: &GeneratorOptions) -> String {
    let mut pool = String::new();
    if options.uppercase {
        pool.push_str(UPPERCASE);
    }
    if options.lowercase {
        pool.push_str(LOWERCASE);
    }
    if options.digits {
        pool.push_str(DIGITS);
    }
    if options.symbols {
        pool.push_str(SYMBOLS);
    }

    if pool.is_empty() {
        warn!("no character classes selected; using all of them");
        pool = format!("{UPPERCASE}{LOWERCASE}{DIGITS}{SYMBOLS}");
    }

    let pool: Vec<char> = pool.chars().collect();
    let mut rng = rand::thread_rng();
    (0..options.length)
        .map(|_| pool[rng.gen_range(0..pool.len())])
        .collect()
}
