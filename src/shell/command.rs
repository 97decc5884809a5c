//! Parsing of interactive shell input.

use std::str::FromStr;

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a new search; bare text is treated as search terms
    Search(String),
    /// Load the next page
    More,
    /// Open the detail view for a 1-based result number
    Open(usize),
    /// Close the detail view
    Close,
    /// Re-render the current results
    List,
    /// Show query, page and loading state
    Status,
    Help,
    Quit,
    /// Blank line
    Empty,
}

/// Input that could not be turned into a [`Command`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("`{0}` is not a result number (results start at 1)")]
    InvalidIndex(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Empty);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "search" | "s" | "/" => Command::Search(rest.to_string()),
            "more" | "m" | "next" if rest.is_empty() => Command::More,
            "open" | "o" | "view" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("open"));
                }
                match rest.parse::<usize>() {
                    Ok(index) if index >= 1 => Command::Open(index),
                    _ => return Err(CommandError::InvalidIndex(rest.to_string())),
                }
            }
            "close" | "c" | "back" if rest.is_empty() => Command::Close,
            "list" | "ls" if rest.is_empty() => Command::List,
            "status" if rest.is_empty() => Command::Status,
            "help" | "?" if rest.is_empty() => Command::Help,
            "quit" | "exit" | "q" if rest.is_empty() => Command::Quit,
            _ => Command::Search(line.to_string()),
        };

        Ok(command)
    }
}
