use thiserror::Error;

/// Errors that can occur while searching for a move.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MosaicError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience Result type for search operations
pub type Result<T> = std::result::Result<T, MosaicError>;
