//! Commands accepted by an interactive rating session.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// One line of input in an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Add a star rating to the current image.
    Rate(u8),
    /// Remove the most recent rating of the current image.
    Undo,
    /// Replace the current image's note. Empty text removes it.
    Note(String),
    Next,
    Prev,
    /// Jump to an image by its 1-based position.
    Goto(usize),
    /// Put the collection in a new random order.
    Shuffle,
    /// Describe the current image.
    Show,
    /// Save progress now.
    Save,
    /// Write results, optionally into a given directory.
    Export(Option<PathBuf>),
    Help,
    /// Save and leave the session.
    Quit,
}

/// Input that is not a session command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{value}' is not a valid {expected}")]
    InvalidNumber {
        value: String,
        expected: &'static str,
    },
}

impl FromStr for SessionCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word.to_ascii_lowercase().as_str() {
            "" => Err(ParseCommandError::Empty),
            "rate" | "r" => {
                let value = required(rest, "rate", "a star value from 1 to 5")?;
                value
                    .parse()
                    .map(Self::Rate)
                    .map_err(|_| ParseCommandError::InvalidNumber {
                        value: value.to_string(),
                        expected: "star value",
                    })
            }
            "1" | "2" | "3" | "4" | "5" if rest.is_empty() => {
                word.parse().map(Self::Rate).map_err(|_| {
                    ParseCommandError::Unknown(word.to_string())
                })
            }
            "undo" | "u" => Ok(Self::Undo),
            "note" => Ok(Self::Note(rest.to_string())),
            "next" | "n" => Ok(Self::Next),
            "prev" | "p" => Ok(Self::Prev),
            "goto" | "g" => {
                let value = required(rest, "goto", "an image number")?;
                match value.parse::<usize>() {
                    Ok(position) if position > 0 => Ok(Self::Goto(position)),
                    _ => Err(ParseCommandError::InvalidNumber {
                        value: value.to_string(),
                        expected: "image number",
                    }),
                }
            }
            "shuffle" => Ok(Self::Shuffle),
            "show" | "s" => Ok(Self::Show),
            "save" => Ok(Self::Save),
            "export" => Ok(Self::Export((!rest.is_empty()).then(|| PathBuf::from(rest)))),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            _ => Err(ParseCommandError::Unknown(word.to_string())),
        }
    }
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ParseCommandError> {
    if rest.is_empty() {
        Err(ParseCommandError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

/// Usage lines shown by `help`: command and description.
pub const HELP: [(&str, &str); 12] = [
    ("rate N, N", "Rate the current image with N stars (1-5)"),
    ("undo", "Remove the last rating of the current image"),
    ("note TEXT", "Set the note of the current image (empty clears it)"),
    ("next, prev", "Move to the next or previous image"),
    ("goto N", "Jump to image number N"),
    ("shuffle", "Shuffle the image order"),
    ("show", "Show the current image"),
    ("save", "Save progress now"),
    ("export [DIR]", "Write results JSON (default: current directory)"),
    ("help", "Show this list"),
    ("quit", "Save and exit"),
    ("Ctrl-C", "Save and exit"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorthand_rating() {
        assert_eq!("4".parse(), Ok(SessionCommand::Rate(4)));
        assert_eq!("r 2".parse(), Ok(SessionCommand::Rate(2)));
    }

    #[test]
    fn test_rating_range_is_left_to_the_workspace() {
        assert_eq!("rate 9".parse(), Ok(SessionCommand::Rate(9)));
        assert!(matches!(
            "rate lots".parse::<SessionCommand>(),
            Err(ParseCommandError::InvalidNumber { .. })
        ));
    }
}
