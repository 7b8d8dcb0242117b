use std::fmt;

use serde::{Deserialize, Serialize};

/// Synthetic drain token of the form `TOK-####-###`.
///
/// The first group is `|seed| mod 10000`, zero-padded to four digits; the
/// second is a three-digit draw in `100..=999`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    #[must_use]
    pub fn from_parts(seed: i64, suffix: u16) -> Self {
        debug_assert!((100..=999).contains(&suffix), "suffix out of range: {suffix}");
        let magnitude = seed.unsigned_abs() % 10_000;
        Self(format!("TOK-{magnitude:04}-{suffix}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
