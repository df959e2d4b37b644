use std::fmt;

use super::Board;
use crate::types::Square;

impl Board {
    /// Debug game state information
    pub fn describe_state(&self) -> Vec<String> {
        let mut debug_info = Vec::new();

        debug_info.push(format!("Current turn: {}", self.active_color()));
        debug_info.push(format!("Castling rights: {}", self.castling.to_fen()));
        match self.en_passant_target() {
            Some(target) => debug_info.push(format!("En passant target: {target}")),
            None => debug_info.push("En passant target: None".to_string()),
        }
        debug_info.push(format!("Half-move clock: {}", self.halfmove_clock()));
        debug_info.push(format!("Full-move number: {}", self.fullmove_number()));
        debug_info.push(format!("Status: {:?}", self.status()));

        debug_info
    }
}

/// ASCII diagram, rank 8 at the top, `.` for empty squares.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let c = self
                    .piece_at(Square::new(file, rank))
                    .map_or('.', |piece| piece.fen_char());
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
