use super::placement::Placement;
use super::validation::{
    would_leave_king_in_check, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};
use super::Board;
use crate::error::RulesError;
use crate::types::{CastleSide, Move, Piece, PieceId, PieceKind, Square};

impl Board {
    /// Legal destination squares for the piece `id`, in generation order.
    pub fn legal_moves(&self, id: PieceId) -> Result<Vec<Square>, RulesError> {
        let mut scratch = self.placement.clone();
        self.legal_moves_in(&mut scratch, id)
    }

    /// Legal destination squares for whatever stands on `square`.
    pub fn legal_moves_from(&self, square: Square) -> Result<Vec<Square>, RulesError> {
        let id = self
            .placement
            .id_at(square)
            .ok_or_else(|| RulesError::InvalidArgument(format!("no piece on {square}")))?;
        self.legal_moves(id)
    }

    /// Generate all legal moves for the side to move.
    ///
    /// A pawn reaching the last rank yields one move per promotion choice.
    pub fn all_legal_moves(&self) -> Result<Vec<Move>, RulesError> {
        let color = self.active_color();
        let mut scratch = self.placement.clone();
        let movers: Vec<(PieceId, Piece)> = self
            .placement
            .pieces_of(color)
            .map(|(id, piece)| (id, *piece))
            .collect();

        let mut all_moves = Vec::new();
        for (id, piece) in movers {
            let from = piece.square();
            for to in self.legal_moves_in(&mut scratch, id)? {
                if piece.kind() == PieceKind::Pawn && to.rank() == color.promotion_rank() {
                    for kind in PieceKind::PROMOTIONS {
                        all_moves.push(Move::new_promotion(from, to, kind));
                    }
                } else {
                    all_moves.push(Move::new(from, to));
                }
            }
        }
        Ok(all_moves)
    }

    /// Pseudo-legal moves minus those leaving the mover's king attacked.
    ///
    /// `scratch` must hold the same placement as the board; each candidate is
    /// played on it and taken back.
    pub(crate) fn legal_moves_in(
        &self,
        scratch: &mut Placement,
        id: PieceId,
    ) -> Result<Vec<Square>, RulesError> {
        let candidates = self.pseudo_legal_moves(id)?;
        let mut legal = Vec::with_capacity(candidates.len());
        for to in candidates {
            let victim = self.en_passant_victim(id, to);
            if !would_leave_king_in_check(scratch, id, to, victim)? {
                legal.push(to);
            }
        }
        Ok(legal)
    }

    /// Destinations allowed by the piece's movement pattern, ignoring self-check.
    pub fn pseudo_legal_moves(&self, id: PieceId) -> Result<Vec<Square>, RulesError> {
        let piece = *self
            .placement
            .piece(id)
            .ok_or_else(|| RulesError::InvalidArgument(format!("{id:?} is not on the board")))?;

        let moves = match piece.kind() {
            PieceKind::Pawn => {
                let en_passant = if piece.color() == self.active_color() {
                    self.en_passant.target()
                } else {
                    None
                };
                pawn_moves(&self.placement, &piece, en_passant)
            }
            PieceKind::Knight => step_moves(&self.placement, &piece, &KNIGHT_OFFSETS),
            PieceKind::Bishop => sliding_moves(&self.placement, &piece, &BISHOP_DIRECTIONS),
            PieceKind::Rook => sliding_moves(&self.placement, &piece, &ROOK_DIRECTIONS),
            PieceKind::Queen => {
                let mut moves = sliding_moves(&self.placement, &piece, &ROOK_DIRECTIONS);
                moves.extend(sliding_moves(&self.placement, &piece, &BISHOP_DIRECTIONS));
                moves
            }
            PieceKind::King => {
                let mut moves = step_moves(&self.placement, &piece, &KING_OFFSETS);
                for side in [CastleSide::Kingside, CastleSide::Queenside] {
                    if self.castling.can_castle(piece.color(), side, &self.placement)? {
                        moves.push(Square::new(side.king_end_file(), piece.square().rank()));
                    }
                }
                moves
            }
        };
        Ok(moves)
    }

    /// Square of the pawn `id` would capture by moving to `to` en passant.
    pub(crate) fn en_passant_victim(&self, id: PieceId, to: Square) -> Option<Square> {
        let piece = self.placement.piece(id)?;
        let from = piece.square();
        let is_en_passant = piece.kind() == PieceKind::Pawn
            && piece.color() == self.active_color()
            && self.en_passant.target() == Some(to)
            && to.file() != from.file()
            && self.placement.is_empty(to);
        is_en_passant.then(|| Square::new(to.file(), from.rank()))
    }
}

/// Generate pawn moves: pushes, captures, and the en passant capture onto `en_passant`.
fn pawn_moves(placement: &Placement, pawn: &Piece, en_passant: Option<Square>) -> Vec<Square> {
    let mut moves = Vec::new();
    let color = pawn.color();
    let from = pawn.square();
    let direction = color.pawn_direction();

    if let Some(one) = from.offset(0, direction).filter(|&s| placement.is_empty(s)) {
        moves.push(one);
        if from.rank() == color.pawn_start_rank() {
            if let Some(two) = one.offset(0, direction).filter(|&s| placement.is_empty(s)) {
                moves.push(two);
            }
        }
    }

    for df in [-1, 1] {
        let Some(target) = from.offset(df, direction) else {
            continue;
        };
        match placement.piece_at(target) {
            Some(victim) if victim.color() != color => moves.push(target),
            Some(_) => {}
            None if Some(target) == en_passant => {
                let passed = Square::new(target.file(), from.rank());
                let capturable = placement
                    .piece_at(passed)
                    .is_some_and(|p| p.kind() == PieceKind::Pawn && p.color() != color);
                if capturable {
                    moves.push(target);
                }
            }
            None => {}
        }
    }

    moves
}

/// Fixed-offset moves (knight, king): on the board and not onto a friendly piece.
fn step_moves(placement: &Placement, piece: &Piece, offsets: &[(i8, i8)]) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(df, dr)| piece.square().offset(df, dr))
        .filter(|&to| {
            placement
                .piece_at(to)
                .map_or(true, |occupant| occupant.color() != piece.color())
        })
        .collect()
}

/// Ray walk: empty squares, then one enemy square, stopping at any occupant.
fn sliding_moves(placement: &Placement, piece: &Piece, directions: &[(i8, i8)]) -> Vec<Square> {
    let mut moves = Vec::new();
    for &(df, dr) in directions {
        let mut current = piece.square().offset(df, dr);
        while let Some(to) = current {
            match placement.piece_at(to) {
                None => moves.push(to),
                Some(occupant) => {
                    if occupant.color() != piece.color() {
                        moves.push(to);
                    }
                    break;
                }
            }
            current = to.offset(df, dr);
        }
    }
    moves
}
