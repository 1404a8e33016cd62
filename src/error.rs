//! Error types for the xo-break crate

use thiserror::Error;

/// Main error type for the xo-break crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("no match is active")]
    MatchNotActive,

    #[error("invalid move: cell {position} is already occupied")]
    CellOccupied { position: usize },

    #[error("out of turn: it is the {current}'s turn")]
    OutOfTurn { current: String },

    #[error("cell {position} is out of bounds (must be 0-8)")]
    InvalidPosition { position: usize },

    #[error("a match is already open")]
    MatchAlreadyOpen,

    #[error("no match is open")]
    MatchNotOpen,

    #[error("no empty cells left on the board")]
    NoEmptyCells,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

impl Error {
    /// True for errors that reject a game operation without touching state.
    ///
    /// The presentation layer may surface these as a message; nothing has to be
    /// rolled back.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::MatchNotActive
                | Error::CellOccupied { .. }
                | Error::OutOfTurn { .. }
                | Error::InvalidPosition { .. }
                | Error::MatchAlreadyOpen
                | Error::MatchNotOpen
                | Error::NoEmptyCells
                | Error::InvalidConfiguration { .. }
        )
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_flagged() {
        assert!(Error::CellOccupied { position: 4 }.is_rejection());
        assert!(Error::MatchAlreadyOpen.is_rejection());
        assert!(
            !Error::SerializationContext {
                operation: "write".to_string(),
                message: "boom".to_string(),
            }
            .is_rejection()
        );
    }

    #[test]
    fn test_occupied_message_mentions_cell() {
        let message = Error::CellOccupied { position: 7 }.to_string();
        assert!(message.contains("occupied"));
        assert!(message.contains('7'));
    }
}
