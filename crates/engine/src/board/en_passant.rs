use crate::types::{Move, Piece, PieceKind, Square};

/// The square a pawn skipped on the previous ply, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnPassant {
    target: Option<Square>,
}

impl EnPassant {
    pub(crate) const fn with_target(target: Option<Square>) -> Self {
        Self { target }
    }

    #[inline]
    pub fn target(&self) -> Option<Square> {
        self.target
    }

    pub fn clear(&mut self) {
        self.target = None;
    }

    /// Set the target after a two-square pawn advance, otherwise clear it.
    pub fn update_target(&mut self, piece: &Piece, mv: Move) {
        let advance = mv.to.rank() as i8 - mv.from.rank() as i8;
        self.target = if piece.kind() == PieceKind::Pawn && advance.abs() == 2 {
            Some(Square::new(mv.from.file(), (mv.from.rank() + mv.to.rank()) / 2))
        } else {
            None
        };
    }

    /// FEN en passant field: the target square or "-".
    pub fn to_fen(&self) -> String {
        self.target
            .map(|square| square.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}
