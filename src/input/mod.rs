//! Input module for the text field stand-in
//!
//! Reads stdin line by line; pressing Enter commits the line.

mod commands;
mod listener;

pub use commands::InputEvent;
pub use listener::{InputError, InputListener};
