use log::trace;

use super::placement::Placement;
use super::Board;
use crate::error::RulesError;
use crate::types::{Color, PieceId, PieceKind, Square};

#[rustfmt::skip]
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

#[rustfmt::skip]
pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1), (0, -1),
    (0, 1), (1, -1), (1, 0), (1, 1),
];

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Check if `square` is attacked by any piece of the side opposing `defending`.
pub fn is_square_attacked(placement: &Placement, square: Square, defending: Color) -> bool {
    let by = defending.opposite();
    check_pawn_threats(placement, square, by)
        || check_knight_threats(placement, square, by)
        || check_sliding_threats(placement, square, by)
        || check_king_threats(placement, square, by)
}

fn holds(placement: &Placement, square: Square, color: Color, kind: PieceKind) -> bool {
    placement
        .piece_at(square)
        .is_some_and(|piece| piece.color() == color && piece.kind() == kind)
}

fn check_pawn_threats(placement: &Placement, square: Square, by: Color) -> bool {
    // Attacking pawns stand one rank behind the square, from their point of view.
    let dr = -by.pawn_direction();
    [-1, 1].into_iter().any(|df| {
        square
            .offset(df, dr)
            .is_some_and(|from| holds(placement, from, by, PieceKind::Pawn))
    })
}

fn check_knight_threats(placement: &Placement, square: Square, by: Color) -> bool {
    KNIGHT_OFFSETS.iter().any(|&(df, dr)| {
        square
            .offset(df, dr)
            .is_some_and(|from| holds(placement, from, by, PieceKind::Knight))
    })
}

fn check_sliding_threats(placement: &Placement, square: Square, by: Color) -> bool {
    let axial = ROOK_DIRECTIONS.iter().map(|&d| (d, PieceKind::Rook));
    let diagonal = BISHOP_DIRECTIONS.iter().map(|&d| (d, PieceKind::Bishop));

    for ((df, dr), slider) in axial.chain(diagonal) {
        let attacker = cast_ray(placement, square, df, dr).and_then(|s| placement.piece_at(s));
        if let Some(attacker) = attacker {
            if attacker.color() == by
                && (attacker.kind() == slider || attacker.kind() == PieceKind::Queen)
            {
                return true;
            }
        }
    }
    false
}

fn check_king_threats(placement: &Placement, square: Square, by: Color) -> bool {
    KING_OFFSETS.iter().any(|&(df, dr)| {
        square
            .offset(df, dr)
            .is_some_and(|from| holds(placement, from, by, PieceKind::King))
    })
}

/// Walk from `start` in one direction and return the first occupied square.
fn cast_ray(placement: &Placement, start: Square, df: i8, dr: i8) -> Option<Square> {
    let mut current = start.offset(df, dr);
    while let Some(square) = current {
        if !placement.is_empty(square) {
            return Some(square);
        }
        current = square.offset(df, dr);
    }
    None
}

pub fn find_king(placement: &Placement, color: Color) -> Result<Square, RulesError> {
    placement
        .pieces_of(color)
        .find(|(_, piece)| piece.kind() == PieceKind::King)
        .map(|(_, piece)| piece.square())
        .ok_or_else(|| RulesError::InvariantViolation(format!("no {color} king on the board")))
}

/// Play `id` to `to` on `placement` and report whether its own king is then attacked.
///
/// `victim` is the square of a pawn captured en passant, if the move is one.
/// The placement is restored before returning, whatever the outcome.
pub(crate) fn would_leave_king_in_check(
    placement: &mut Placement,
    id: PieceId,
    to: Square,
    victim: Option<Square>,
) -> Result<bool, RulesError> {
    let probe = placement.probe(id, to, victim)?;
    let color = probe
        .piece(id)
        .map(|piece| piece.color())
        .ok_or_else(|| RulesError::InvariantViolation(format!("{id:?} vanished during probe")))?;
    // The mover may be the king itself, so look it up after the move.
    let king = find_king(&probe, color)?;
    let in_check = is_square_attacked(&probe, king, color);
    trace!("probe {id:?} -> {to}: king on {king} attacked = {in_check}");
    Ok(in_check)
}

impl Board {
    pub fn is_square_attacked(&self, square: Square, defending: Color) -> bool {
        is_square_attacked(&self.placement, square, defending)
    }

    pub fn find_king(&self, color: Color) -> Result<Square, RulesError> {
        find_king(&self.placement, color)
    }

    /// Whether playing `id` to `to` would leave its own king attacked.
    ///
    /// The board itself is never touched; the move is tried on a scratch copy.
    pub fn would_leave_king_in_check(&self, id: PieceId, to: Square) -> Result<bool, RulesError> {
        let mut scratch = self.placement.clone();
        let victim = self.en_passant_victim(id, to);
        would_leave_king_in_check(&mut scratch, id, to, victim)
    }

    pub fn is_in_check(&self, color: Color) -> Result<bool, RulesError> {
        let king = self.find_king(color)?;
        Ok(self.is_square_attacked(king, color))
    }

    /// In check, and no piece of `color` has a legal move.
    pub fn is_checkmate(&self, color: Color) -> Result<bool, RulesError> {
        if !self.is_in_check(color)? {
            return Ok(false);
        }
        Ok(!self.has_legal_move(color)?)
    }

    /// Not in check, yet no piece of `color` has a legal move.
    pub fn is_stalemate(&self, color: Color) -> Result<bool, RulesError> {
        if self.is_in_check(color)? {
            return Ok(false);
        }
        Ok(!self.has_legal_move(color)?)
    }

    fn has_legal_move(&self, color: Color) -> Result<bool, RulesError> {
        let mut scratch = self.placement.clone();
        let ids: Vec<PieceId> = self.placement.pieces_of(color).map(|(id, _)| id).collect();
        for id in ids {
            if !self.legal_moves_in(&mut scratch, id)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
