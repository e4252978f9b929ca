//! Random password generation and strength scoring.

use rand::Rng;
use serde::{Deserialize, Serialize};

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{}|;:,.<>?";

/// Characters counted as symbols when scoring.
const SCORED_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Character classes a generated password may draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            uppercase: true,
            lowercase: true,
            numbers: true,
            symbols: true,
        }
    }
}

impl GeneratorOptions {
    fn alphabet(&self) -> Vec<char> {
        let mut chars = String::new();
        if self.uppercase {
            chars.push_str(UPPERCASE);
        }
        if self.lowercase {
            chars.push_str(LOWERCASE);
        }
        if self.numbers {
            chars.push_str(NUMBERS);
        }
        if self.symbols {
            chars.push_str(SYMBOLS);
        }
        if chars.is_empty() {
            chars.push_str(LOWERCASE);
        }
        chars.chars().collect()
    }
}

/// Generate a random password of `length` characters.
///
/// Falls back to lowercase letters when no class is selected.
pub fn generate_password(length: usize, options: &GeneratorOptions) -> String {
    let alphabet = options.alphabet();
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

/// Coarse password strength rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl PasswordStrength {
    /// Human-readable description.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Weak => "Weak: Too short or too simple",
            Self::Medium => "Medium: Add more variety",
            Self::Strong => "Strong: Good password",
            Self::VeryStrong => "Very Strong: Excellent password",
        }
    }
}

/// Score `password`.
///
/// Length earns up to four points; each character class that is both
/// present and enabled in `options` earns one more.
pub fn evaluate_strength(password: &str, options: &GeneratorOptions) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength::Weak;
    }

    let length = password.chars().count();
    let mut score = match length {
        n if n >= 16 => 4,
        n if n >= 12 => 3,
        n if n >= 8 => 2,
        n if n >= 6 => 1,
        _ => 0,
    };

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_number = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| SCORED_SYMBOLS.contains(c));

    for (present, enabled) in [
        (has_lower, options.lowercase),
        (has_upper, options.uppercase),
        (has_number, options.numbers),
        (has_symbol, options.symbols),
    ] {
        if present && enabled {
            score += 1;
        }
    }

    match score {
        s if s >= 6 => PasswordStrength::VeryStrong,
        s if s >= 4 => PasswordStrength::Strong,
        s if s >= 2 => PasswordStrength::Medium,
        _ => PasswordStrength::Weak,
    }
}
