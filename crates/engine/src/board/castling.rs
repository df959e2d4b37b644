use log::trace;

use super::placement::Placement;
use super::validation::{find_king, is_square_attacked};
use crate::error::RulesError;
use crate::types::{CastleSide, Color, Move, Piece, PieceKind, Square};

const KING_START_FILE: u8 = 4;

/// Per-color, per-side castling permissions. Rights are only ever cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

impl CastlingRights {
    pub const fn all() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub const fn has(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => self.white_kingside,
            (Color::White, CastleSide::Queenside) => self.white_queenside,
            (Color::Black, CastleSide::Kingside) => self.black_kingside,
            (Color::Black, CastleSide::Queenside) => self.black_queenside,
        }
    }

    pub(crate) fn grant(&mut self, color: Color, side: CastleSide) {
        *self.flag(color, side) = true;
    }

    pub fn clear(&mut self, color: Color, side: CastleSide) {
        *self.flag(color, side) = false;
    }

    pub fn clear_color(&mut self, color: Color) {
        self.clear(color, CastleSide::Kingside);
        self.clear(color, CastleSide::Queenside);
    }

    fn flag(&mut self, color: Color, side: CastleSide) -> &mut bool {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => &mut self.white_kingside,
            (Color::White, CastleSide::Queenside) => &mut self.white_queenside,
            (Color::Black, CastleSide::Kingside) => &mut self.black_kingside,
            (Color::Black, CastleSide::Queenside) => &mut self.black_queenside,
        }
    }

    /// Check if castling is possible for a given color and side.
    ///
    /// Needs the right, king and rook on their home squares, every square
    /// between them empty, and the king's start, transit and destination
    /// squares free of attack. Fails if `color` has no king.
    pub fn can_castle(
        &self,
        color: Color,
        side: CastleSide,
        placement: &Placement,
    ) -> Result<bool, RulesError> {
        let king = find_king(placement, color)?;
        if !self.has(color, side) {
            return Ok(false);
        }

        let rank = color.back_rank();
        let king_start = Square::new(KING_START_FILE, rank);
        let rook_start = Square::new(side.rook_start_file(), rank);

        let home = |square: Square, kind: PieceKind| {
            placement
                .piece_at(square)
                .is_some_and(|piece| piece.kind() == kind && piece.color() == color)
        };
        if king != king_start || !home(rook_start, PieceKind::Rook) {
            return Ok(false);
        }

        let (low, high) = match side {
            CastleSide::Kingside => (KING_START_FILE + 1, side.rook_start_file() - 1),
            CastleSide::Queenside => (side.rook_start_file() + 1, KING_START_FILE - 1),
        };
        if (low..=high).any(|file| !placement.is_empty(Square::new(file, rank))) {
            return Ok(false);
        }

        let (first, last) = match side {
            CastleSide::Kingside => (KING_START_FILE, side.king_end_file()),
            CastleSide::Queenside => (side.king_end_file(), KING_START_FILE),
        };
        let attacked = (first..=last)
            .any(|file| is_square_attacked(placement, Square::new(file, rank), color));
        Ok(!attacked)
    }

    /// Move king and rook to their castled squares and drop both rights for `color`.
    pub fn apply_castling_move(
        &mut self,
        color: Color,
        side: CastleSide,
        placement: &mut Placement,
    ) -> Result<(), RulesError> {
        let rank = color.back_rank();
        let king_start = Square::new(KING_START_FILE, rank);
        let rook_start = Square::new(side.rook_start_file(), rank);

        let king = placement.id_at(king_start).ok_or_else(|| {
            RulesError::InvariantViolation(format!("no {color} king on {king_start} to castle"))
        })?;
        let rook = placement.id_at(rook_start).ok_or_else(|| {
            RulesError::InvariantViolation(format!("no {color} rook on {rook_start} to castle"))
        })?;

        placement.relocate(king, Square::new(side.king_end_file(), rank))?;
        placement.relocate(rook, Square::new(side.rook_end_file(), rank))?;
        trace!("{color} castles {side:?}");

        self.clear_color(color);
        Ok(())
    }

    /// Drop rights after a move by `piece`, and for a rook captured on its home square.
    pub fn update_castling_rights(&mut self, piece: &Piece, mv: Move, captured: Option<&Piece>) {
        match piece.kind() {
            PieceKind::King => self.clear_color(piece.color()),
            PieceKind::Rook => self.clear_home_rook(piece.color(), mv.from),
            _ => {}
        }

        if let Some(captured) = captured.filter(|p| p.kind() == PieceKind::Rook) {
            self.clear_home_rook(captured.color(), mv.to);
        }
    }

    fn clear_home_rook(&mut self, color: Color, square: Square) {
        if square.rank() != color.back_rank() {
            return;
        }
        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            if square.file() == side.rook_start_file() {
                self.clear(color, side);
            }
        }
    }

    /// FEN castling field: "KQkq" subset in that order, or "-".
    pub fn to_fen(&self) -> String {
        let field: String = [
            (self.white_kingside, 'K'),
            (self.white_queenside, 'Q'),
            (self.black_kingside, 'k'),
            (self.black_queenside, 'q'),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, c)| *c)
        .collect();

        if field.is_empty() {
            "-".to_string()
        } else {
            field
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    fn back_rank(color: Color) -> Placement {
        let rank = color.back_rank();
        let mut placement = Placement::empty();
        placement.spawn(PieceKind::King, color, Square::new(4, rank));
        placement.spawn(PieceKind::Rook, color, Square::new(0, rank));
        placement.spawn(PieceKind::Rook, color, Square::new(7, rank));
        placement.spawn(PieceKind::King, color.opposite(), Square::new(4, 7 - rank));
        placement
    }

    #[test]
    fn clear_path_allows_both_sides() {
        let placement = back_rank(Color::White);
        let rights = CastlingRights::all();
        assert_eq!(rights.can_castle(Color::White, CastleSide::Kingside, &placement), Ok(true));
        assert_eq!(rights.can_castle(Color::White, CastleSide::Queenside, &placement), Ok(true));
    }

    #[test]
    fn blocked_or_attacked_path_forbids_castling() {
        let mut placement = back_rank(Color::White);
        placement.spawn(PieceKind::Knight, Color::White, sq("b1"));
        placement.spawn(PieceKind::Rook, Color::Black, sq("f8"));
        let rights = CastlingRights::all();

        assert_eq!(rights.can_castle(Color::White, CastleSide::Queenside, &placement), Ok(false));
        assert_eq!(rights.can_castle(Color::White, CastleSide::Kingside, &placement), Ok(false));
    }

    #[test]
    fn attacked_b_file_square_does_not_stop_queenside() {
        let mut placement = back_rank(Color::Black);
        placement.spawn(PieceKind::Rook, Color::White, sq("b1"));
        let rights = CastlingRights::all();
        assert_eq!(rights.can_castle(Color::Black, CastleSide::Queenside, &placement), Ok(true));
    }

    #[test]
    fn king_in_check_cannot_castle() {
        let mut placement = back_rank(Color::White);
        placement.spawn(PieceKind::Rook, Color::Black, sq("e5"));
        let rights = CastlingRights::all();
        assert_eq!(rights.can_castle(Color::White, CastleSide::Kingside, &placement), Ok(false));
    }

    #[test]
    fn missing_king_is_an_invariant_violation() {
        let mut placement = Placement::empty();
        placement.spawn(PieceKind::Rook, Color::White, sq("h1"));
        placement.spawn(PieceKind::King, Color::Black, sq("e8"));
        let rights = CastlingRights::all();
        assert!(matches!(
            rights.can_castle(Color::White, CastleSide::Kingside, &placement),
            Err(RulesError::InvariantViolation(_))
        ));
    }

    #[test]
    fn displaced_king_cannot_castle() {
        let mut placement = Placement::empty();
        placement.spawn(PieceKind::King, Color::White, sq("f1"));
        placement.spawn(PieceKind::Rook, Color::White, sq("h1"));
        placement.spawn(PieceKind::King, Color::Black, sq("e8"));
        let rights = CastlingRights::all();
        assert_eq!(rights.can_castle(Color::White, CastleSide::Kingside, &placement), Ok(false));
    }

    #[test]
    fn castling_relocates_king_and_rook() {
        let mut placement = back_rank(Color::Black);
        let mut rights = CastlingRights::all();
        rights
            .apply_castling_move(Color::Black, CastleSide::Queenside, &mut placement)
            .expect("pieces on home squares");

        assert_eq!(placement.piece_at(sq("c8")).map(|p| p.kind()), Some(PieceKind::King));
        assert_eq!(placement.piece_at(sq("d8")).map(|p| p.kind()), Some(PieceKind::Rook));
        assert!(placement.is_empty(sq("a8")));
        assert!(placement.is_empty(sq("e8")));
        assert!(!rights.black_kingside && !rights.black_queenside);
        assert!(rights.white_kingside && rights.white_queenside);
    }

    #[test]
    fn rook_move_and_rook_capture_clear_one_side() {
        let mut rights = CastlingRights::all();
        let rook = Piece::new(PieceKind::Rook, Color::White, sq("h1"));
        rights.update_castling_rights(&rook, Move::new(sq("h1"), sq("h5")), None);
        assert!(!rights.white_kingside);
        assert!(rights.white_queenside);

        let bishop = Piece::new(PieceKind::Bishop, Color::White, sq("g2"));
        let victim = Piece::new(PieceKind::Rook, Color::Black, sq("a8"));
        rights.update_castling_rights(&bishop, Move::new(sq("g2"), sq("a8")), Some(&victim));
        assert!(!rights.black_queenside);
        assert!(rights.black_kingside);
        assert_eq!(rights.to_fen(), "Qk");
    }

    #[test]
    fn empty_rights_encode_as_dash() {
        assert_eq!(CastlingRights::none().to_fen(), "-");
        assert_eq!(CastlingRights::all().to_fen(), "KQkq");
    }
}
