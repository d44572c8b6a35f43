//! Line-oriented console front end.
//!
//! Stdin carries two kinds of lines:
//!
//! * detector frames, one JSON object per line (see [`crate::landmark`]);
//! * slash commands standing in for the buttons and text fields of a GUI.
//!
//! | Command            | Intent                          |
//! |--------------------|---------------------------------|
//! | `/collect`         | toggle collect mode             |
//! | `/predict`         | enter predict mode              |
//! | `/stop`            | back to idle                    |
//! | `/label <text>`    | set the label being taught      |
//! | `/train`           | retrain the remote model        |
//! | `/add`             | append the prediction           |
//! | `/sentence <text>` | replace the sentence            |
//! | `/clear`           | clear the sentence              |
//! | `/speak`           | speak the sentence              |
//! | `/status`          | print the session               |
//!
//! [`ConsoleReader::start`] runs the blocking stdin loop on its own thread;
//! [`run_control`] applies the commands it forwards.

pub mod control;
pub mod reader;

pub use control::{run_control, status_report, Printer};
pub use reader::{ConsoleReader, ReaderStats};

use thiserror::Error;

use crate::landmark::{DetectorFrame, LandmarkError};
use crate::session::Intent;

// ---------------------------------------------------------------------------
// ConsoleInput
// ---------------------------------------------------------------------------

/// Everything the control loop receives from the console.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Intent(Intent),
    /// Print mode, counters, prediction, sentence and status.
    Status,
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    Frame(DetectorFrame),
    Command(Command),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsoleError {
    #[error("unknown command: /{0}")]
    UnknownCommand(String),

    #[error("expected a JSON frame or a /command, got {0:?}")]
    Unrecognised(String),

    #[error(transparent)]
    Frame(#[from] LandmarkError),
}

// ---------------------------------------------------------------------------
// parse_line
// ---------------------------------------------------------------------------

/// Parse one console line.
///
/// Blank lines yield `Ok(None)`.  Command names are case-insensitive; the
/// argument of `/label` and `/sentence` is taken verbatim after the first
/// space, so an empty argument clears the field.
///
/// # Examples
///
/// ```
/// use sign_bridge::console::{parse_line, Command, ConsoleInput};
/// use sign_bridge::session::Intent;
///
/// assert_eq!(
///     parse_line("/label Hello").unwrap(),
///     Some(ConsoleInput::Command(Command::Intent(Intent::SetLabel("Hello".into()))))
/// );
/// assert_eq!(parse_line("   ").unwrap(), None);
/// assert!(parse_line("/jump").is_err());
/// ```
pub fn parse_line(line: &str) -> Result<Option<ConsoleInput>, ConsoleError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();

    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.starts_with('{') {
        return Ok(Some(ConsoleInput::Frame(DetectorFrame::from_json(trimmed)?)));
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return Err(ConsoleError::Unrecognised(trimmed.to_string()));
    };

    let (name, arg) = match rest.split_once(' ') {
        Some((name, arg)) => (name, arg),
        None => (rest, ""),
    };

    let intent = match name.to_ascii_lowercase().as_str() {
        "collect" => Intent::ToggleCollect,
        "predict" => Intent::StartPredict,
        "stop" => Intent::Stop,
        "label" => Intent::SetLabel(arg.to_string()),
        "train" => Intent::Train,
        "add" => Intent::AddWord,
        "sentence" => Intent::SetSentence(arg.to_string()),
        "clear" => Intent::ClearSentence,
        "speak" => Intent::Speak,
        "status" => return Ok(Some(ConsoleInput::Command(Command::Status))),
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };

    Ok(Some(ConsoleInput::Command(Command::Intent(intent))))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
