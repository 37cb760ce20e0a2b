//! Prompt construction from raw committed text

use super::token::LetterToken;

/// Ordered letters to fingerspell, derived from one commit of the input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    tokens: Vec<LetterToken>,
}

impl Prompt {
    /// Build a prompt by keeping the ASCII letters of `raw` in order
    pub fn from_input(raw: &str) -> Self {
        Self {
            tokens: raw.chars().filter_map(LetterToken::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<LetterToken> {
        self.tokens.get(index).copied()
    }

    pub fn tokens(&self) -> &[LetterToken] {
        &self.tokens
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for token in &self.tokens {
            write!(f, "{token}")?;
        }
        Ok(())
    }
}
