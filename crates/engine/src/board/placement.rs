//! Piece placement: the 8x8 grid and the pieces standing on it.
//!
//! The grid says which piece stands on a square; each piece also records its
//! own square. Only this module writes either, and every write updates both.

use std::ops::Deref;

use crate::error::RulesError;
use crate::types::{Color, Piece, PieceId, PieceKind, Square};

#[derive(Debug, Clone)]
pub struct Placement {
    grid: [Option<PieceId>; 64],
    // Slot is `None` once the piece has left the board.
    pieces: Vec<Option<Piece>>,
}

impl Default for Placement {
    fn default() -> Self {
        Self::empty()
    }
}

impl Placement {
    pub fn empty() -> Self {
        Self {
            grid: [None; 64],
            pieces: Vec::with_capacity(32),
        }
    }

    /// Put a new piece on `square`, removing whatever stood there.
    pub(crate) fn spawn(&mut self, kind: PieceKind, color: Color, square: Square) -> PieceId {
        self.remove(square);
        let id = PieceId(self.pieces.len());
        self.pieces.push(Some(Piece::new(kind, color, square)));
        self.grid[square.index()] = Some(id);
        id
    }

    #[inline]
    pub fn id_at(&self, square: Square) -> Option<PieceId> {
        self.grid[square.index()]
    }

    /// The piece for `id`, if it is still on the board.
    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)?.as_ref()
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.id_at(square).and_then(|id| self.piece(id))
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.grid[square.index()].is_none()
    }

    /// Pieces on the board in square order (a1, b1, ..., h8).
    pub fn iter(&self) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.grid
            .iter()
            .flatten()
            .filter_map(move |&id| self.piece(id).map(|piece| (id, piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.color() == color)
    }

    /// Move a piece to `to`, capturing any occupant. No legality checks.
    ///
    /// Returns the captured piece, which is gone from the board afterwards.
    pub(crate) fn relocate(
        &mut self,
        id: PieceId,
        to: Square,
    ) -> Result<Option<Piece>, RulesError> {
        let from = self
            .piece(id)
            .map(Piece::square)
            .ok_or_else(|| RulesError::InvalidArgument(format!("{id:?} is not on the board")))?;
        if from == to {
            return Ok(None);
        }

        let captured = self.remove(to);
        self.grid[from.index()] = None;
        self.grid[to.index()] = Some(id);
        if let Some(Some(piece)) = self.pieces.get_mut(id.0) {
            piece.square = to;
        }
        Ok(captured)
    }

    /// Take the piece on `square` off the board.
    pub(crate) fn remove(&mut self, square: Square) -> Option<Piece> {
        let id = self.grid[square.index()].take()?;
        self.pieces.get_mut(id.0)?.take()
    }

    /// Temporarily play `id` to `to` for inspection.
    ///
    /// `victim` names the square of a pawn taken en passant; otherwise the
    /// occupant of `to` (if any) is the one set aside. The returned guard
    /// derefs to the simulated placement and restores this one when dropped.
    pub(crate) fn probe(
        &mut self,
        id: PieceId,
        to: Square,
        victim: Option<Square>,
    ) -> Result<Probe<'_>, RulesError> {
        let from = self
            .piece(id)
            .map(Piece::square)
            .ok_or_else(|| RulesError::InvalidArgument(format!("{id:?} is not on the board")))?;

        let captured_square = victim.unwrap_or(to);
        let captured = self.grid[captured_square.index()]
            .take()
            .map(|captured| (captured, captured_square));

        self.grid[from.index()] = None;
        self.grid[to.index()] = Some(id);
        if let Some(Some(piece)) = self.pieces.get_mut(id.0) {
            piece.square = to;
        }

        Ok(Probe {
            placement: self,
            mover: id,
            from,
            to,
            captured,
        })
    }
}

/// A move played on a placement, undone on drop.
///
/// The captured piece keeps its arena slot while the probe lives, so the
/// exact same piece is put back.
pub(crate) struct Probe<'a> {
    placement: &'a mut Placement,
    mover: PieceId,
    from: Square,
    to: Square,
    captured: Option<(PieceId, Square)>,
}

impl Deref for Probe<'_> {
    type Target = Placement;

    fn deref(&self) -> &Placement {
        &*self.placement
    }
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        let placement = &mut *self.placement;
        placement.grid[self.to.index()] = None;
        placement.grid[self.from.index()] = Some(self.mover);
        if let Some((id, square)) = self.captured {
            placement.grid[square.index()] = Some(id);
        }
        if let Some(Some(piece)) = placement.pieces.get_mut(self.mover.0) {
            piece.square = self.from;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    #[test]
    fn relocate_keeps_grid_and_piece_in_step() {
        let mut placement = Placement::empty();
        let rook = placement.spawn(PieceKind::Rook, Color::White, sq("a1"));
        let knight = placement.spawn(PieceKind::Knight, Color::Black, sq("a8"));

        let captured = placement.relocate(rook, sq("a8")).expect("rook is on the board");

        assert_eq!(captured.map(|p| p.kind()), Some(PieceKind::Knight));
        assert!(placement.is_empty(sq("a1")));
        assert_eq!(placement.id_at(sq("a8")), Some(rook));
        assert_eq!(placement.piece(rook).map(Piece::square), Some(sq("a8")));
        assert!(placement.piece(knight).is_none());
    }

    #[test]
    fn relocate_unknown_piece_is_invalid_argument() {
        let mut placement = Placement::empty();
        let result = placement.relocate(PieceId(3), sq("e4"));
        assert!(matches!(result, Err(RulesError::InvalidArgument(_))));
    }

    #[test]
    fn probe_restores_captured_piece_on_drop() {
        let mut placement = Placement::empty();
        let queen = placement.spawn(PieceKind::Queen, Color::White, sq("d1"));
        let bishop = placement.spawn(PieceKind::Bishop, Color::Black, sq("d7"));
        let before = placement.clone();

        {
            let probe = placement.probe(queen, sq("d7"), None).expect("queen is on the board");
            assert_eq!(probe.id_at(sq("d7")), Some(queen));
            assert!(probe.is_empty(sq("d1")));
            assert_eq!(probe.piece(queen).map(Piece::square), Some(sq("d7")));
        }

        assert_eq!(placement.id_at(sq("d7")), Some(bishop));
        assert_eq!(placement.id_at(sq("d1")), Some(queen));
        assert_eq!(placement.piece(queen), before.piece(queen));
        assert_eq!(placement.piece(bishop), before.piece(bishop));
    }

    #[test]
    fn probe_sets_aside_en_passant_victim() {
        let mut placement = Placement::empty();
        let pawn = placement.spawn(PieceKind::Pawn, Color::White, sq("e5"));
        let victim = placement.spawn(PieceKind::Pawn, Color::Black, sq("d5"));

        {
            let probe = placement
                .probe(pawn, sq("d6"), Some(sq("d5")))
                .expect("pawn is on the board");
            assert!(probe.is_empty(sq("d5")));
            assert!(probe.is_empty(sq("e5")));
        }

        assert_eq!(placement.id_at(sq("d5")), Some(victim));
        assert_eq!(placement.id_at(sq("e5")), Some(pawn));
        assert!(placement.is_empty(sq("d6")));
    }

    #[test]
    fn iter_yields_pieces_in_square_order() {
        let mut placement = Placement::empty();
        placement.spawn(PieceKind::King, Color::Black, sq("e8"));
        placement.spawn(PieceKind::King, Color::White, sq("e1"));
        let squares: Vec<Square> = placement.iter().map(|(_, p)| p.square()).collect();
        assert_eq!(squares, vec![sq("e1"), sq("e8")]);
    }
}
