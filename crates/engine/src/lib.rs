//! Chess rules: board state, legal move generation, check / checkmate /
//! stalemate detection, castling and en passant, and FEN encoding.

pub mod board;
pub mod error;
pub mod perft;
pub mod types;

pub use board::*;
pub use error::{FenError, RulesError};
pub use perft::*;
pub use types::*;
