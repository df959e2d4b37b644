use thiserror::Error;

use crate::types::{GameStatus, Move};

/// Errors raised by board queries and commands.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RulesError {
    /// The caller passed something the board cannot act on.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The position is corrupt (e.g. a king is missing). Not recoverable.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("illegal move: {mv}")]
    IllegalMove { mv: Move },

    #[error("game is over: {0:?}")]
    GameOver(GameStatus),

    #[error(transparent)]
    Fen(#[from] FenError),
}

/// Error when parsing a FEN position string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN must have 6 fields, found {0}")]
    FieldCount(usize),

    #[error("piece placement must have 8 ranks, found {0}")]
    RankCount(usize),

    #[error("rank {rank} does not describe exactly 8 squares")]
    RankLength { rank: u8 },

    #[error("unknown piece: '{0}'")]
    UnknownPiece(char),

    #[error("invalid active color: '{0}'")]
    ActiveColor(String),

    #[error("invalid castling right: '{0}'")]
    CastlingRight(char),

    #[error("invalid en passant square: '{0}'")]
    EnPassant(String),

    #[error("invalid move counter: '{0}'")]
    Counter(String),

    #[error("expected exactly one {0} king")]
    KingCount(crate::types::Color),
}
