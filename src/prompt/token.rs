//! Letter tokens, the unit of a fingerspelling prompt

use serde::{Deserialize, Serialize};

/// A single lowercase ASCII letter (`a`..=`z`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct LetterToken(u8);

impl LetterToken {
    /// Build a token from any ASCII letter, normalizing to lowercase
    ///
    /// Returns `None` for digits, whitespace, punctuation and non-ASCII input.
    pub fn new(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            Some(Self(c.to_ascii_lowercase() as u8))
        } else {
            None
        }
    }

    /// Parse a canonical clip name, which must be exactly one lowercase letter
    pub fn from_clip_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_lowercase() => Some(Self(c as u8)),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        self.0 as char
    }
}

impl std::fmt::Display for LetterToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for LetterToken {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::new(c).ok_or_else(|| format!("not an ASCII letter: {c:?}"))
    }
}

impl From<LetterToken> for char {
    fn from(token: LetterToken) -> Self {
        token.as_char()
    }
}
