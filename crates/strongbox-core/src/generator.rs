//! Random password generation.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StrongboxError};

pub const MIN_GENERATED_LENGTH: usize = 8;
pub const MAX_GENERATED_LENGTH: usize = 128;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.<>?/~";
const AMBIGUOUS: &str = "Il1O0o|`'\"";

/// Which characters a generated password draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub exclude_ambiguous: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 20,
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
            exclude_ambiguous: false,
        }
    }
}

impl GeneratorOptions {
    fn classes(&self) -> Vec<Vec<char>> {
        [
            (self.lowercase, LOWERCASE),
            (self.uppercase, UPPERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, set)| {
            set.chars()
                .filter(|c| !(self.exclude_ambiguous && AMBIGUOUS.contains(*c)))
                .collect()
        })
        .collect()
    }
}

/// Generate a password from the OS CSPRNG.
///
/// The result contains at least one character from every selected class.
///
/// # Errors
///
/// Returns `StrongboxError::InvalidInput` when the length is outside
/// 8..=128 or no character class is selected.
pub fn generate_password(options: &GeneratorOptions) -> Result<String> {
    if !(MIN_GENERATED_LENGTH..=MAX_GENERATED_LENGTH).contains(&options.length) {
        return Err(StrongboxError::InvalidInput(format!(
            "Password length must be between {} and {} (got {})",
            MIN_GENERATED_LENGTH, MAX_GENERATED_LENGTH, options.length
        )));
    }

    let classes = options.classes();
    if classes.is_empty() {
        return Err(StrongboxError::InvalidInput(
            "Select at least one character class".to_string(),
        ));
    }

    let mut rng = OsRng;
    let pool: Vec<char> = classes.iter().flatten().copied().collect();
    let mut password: Vec<char> = classes
        .iter()
        .map(|class| class[rng.gen_range(0..class.len())])
        .collect();
    while password.len() < options.length {
        password.push(pool[rng.gen_range(0..pool.len())]);
    }
    password.shuffle(&mut rng);

    Ok(password.into_iter().collect())
}
