//! Parsing of committed input lines

use crate::model::Handedness;

/// Events sent from the input source to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Text committed with Enter
    Commit(String),
    /// Select the model for one hand
    SelectHandedness(Handedness),
    /// Leave the viewer
    Quit,
}

impl InputEvent {
    /// Interpret one line of input
    ///
    /// Lines starting with `:` are commands; an unknown command is returned
    /// as an error so it is not mistaken for text to spell.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_end_matches(['\r', '\n']);

        let Some(command) = line.trim_start().strip_prefix(':') else {
            return Ok(InputEvent::Commit(line.to_string()));
        };

        match command.trim().to_ascii_lowercase().as_str() {
            "q" | "quit" | "exit" => Ok(InputEvent::Quit),
            other => other
                .strip_prefix("hand ")
                .unwrap_or(other)
                .parse()
                .map(InputEvent::SelectHandedness)
                .map_err(|_| format!("unknown command: :{}", command.trim())),
        }
    }
}
