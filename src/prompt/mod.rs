//! Prompt module for turning committed text into letter sequences
//!
//! Only ASCII letters survive; everything else is dropped without error.

mod builder;
mod token;

pub use builder::Prompt;
pub use token::LetterToken;
