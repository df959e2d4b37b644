use log::{debug, info, trace};

use super::Board;
use crate::error::RulesError;
use crate::types::{
    CastleSide, Color, GameStatus, Move, MoveRecord, Piece, PieceId, PieceKind, Square,
};

/// Side to move and the two move counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionState {
    active_color: Color,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for PositionState {
    fn default() -> Self {
        Self::new(Color::White, 0, 1)
    }
}

impl PositionState {
    pub const fn new(active_color: Color, halfmove_clock: u32, fullmove_number: u32) -> Self {
        Self {
            active_color,
            halfmove_clock,
            fullmove_number,
        }
    }

    #[inline]
    pub const fn active_color(&self) -> Color {
        self.active_color
    }

    #[inline]
    pub const fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub const fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn toggle_active_color(&mut self) {
        self.active_color = self.active_color.opposite();
    }

    /// Reset on a pawn move or capture, otherwise count up.
    pub fn update_halfmove_clock(&mut self, pawn_move_or_capture: bool) {
        if pawn_move_or_capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
    }

    /// Advance after Black's move; call once the active color has been toggled.
    pub fn update_fullmove_number(&mut self) {
        if self.active_color == Color::White {
            self.fullmove_number += 1;
        }
    }
}

impl Board {
    /// Low-level relocation: moves the piece, capturing any occupant, with no
    /// legality checks and no bookkeeping.
    pub fn move_piece(&mut self, id: PieceId, to: Square) -> Result<Option<Piece>, RulesError> {
        self.placement.relocate(id, to)
    }

    /// Play a move for the side to move and update all position state.
    ///
    /// Returns `Ok(None)` when `mv.from` is empty. Castling is a king move of
    /// two files; en passant and promotion are inferred from the board.
    pub fn apply_move(&mut self, mv: Move) -> Result<Option<MoveRecord>, RulesError> {
        let Some(id) = self.placement.id_at(mv.from) else {
            debug!("ignoring {mv}: no piece on {}", mv.from);
            return Ok(None);
        };

        if self.status.is_over() {
            return Err(RulesError::GameOver(self.status));
        }

        let piece = *self
            .placement
            .piece(id)
            .ok_or_else(|| {
                RulesError::InvariantViolation(format!("{} holds a missing piece", mv.from))
            })?;
        if piece.color() != self.active_color() || !self.legal_moves(id)?.contains(&mv.to) {
            return Err(RulesError::IllegalMove { mv });
        }

        let reaches_last_rank =
            piece.kind() == PieceKind::Pawn && mv.to.rank() == piece.color().promotion_rank();
        let promotion = match (reaches_last_rank, mv.promotion) {
            (false, None) => None,
            (false, Some(_)) => return Err(RulesError::IllegalMove { mv }),
            (true, None) => Some(PieceKind::Queen),
            (true, Some(kind)) if PieceKind::PROMOTIONS.contains(&kind) => Some(kind),
            (true, Some(_)) => return Err(RulesError::IllegalMove { mv }),
        };

        let castle = castle_side(&piece, mv);
        let victim = self.en_passant_victim(id, mv.to);
        self.en_passant.clear();

        let captured = if let Some(side) = castle {
            self.castling.apply_castling_move(piece.color(), side, &mut self.placement)?;
            None
        } else {
            let captured = self.placement.relocate(id, mv.to)?;
            match victim {
                Some(square) => {
                    trace!("{mv} takes en passant on {square}");
                    self.placement.remove(square)
                }
                None => captured,
            }
        };

        if let Some(kind) = promotion {
            self.placement.remove(mv.to);
            self.placement.spawn(kind, piece.color(), mv.to);
        }

        self.castling.update_castling_rights(&piece, mv, captured.as_ref());
        self.en_passant.update_target(&piece, mv);
        self.state
            .update_halfmove_clock(piece.kind() == PieceKind::Pawn || captured.is_some());
        self.state.toggle_active_color();
        self.state.update_fullmove_number();
        self.status = self.evaluate_status()?;

        debug!("{} plays {mv} -> {}", piece.color(), self.to_fen());
        match self.status {
            GameStatus::Checkmate(color) => info!("{color} is checkmated"),
            GameStatus::Stalemate => info!("stalemate, the game is drawn"),
            _ => {}
        }

        Ok(Some(MoveRecord {
            mv,
            piece,
            captured,
            castle,
            en_passant: victim.is_some(),
            promotion,
            status: self.status,
        }))
    }

    /// Terminal condition for the side to move.
    pub(crate) fn evaluate_status(&self) -> Result<GameStatus, RulesError> {
        let color = self.active_color();
        Ok(if self.is_checkmate(color)? {
            GameStatus::Checkmate(color)
        } else if self.is_stalemate(color)? {
            GameStatus::Stalemate
        } else if self.is_in_check(color)? {
            GameStatus::Check(color)
        } else {
            GameStatus::InProgress
        })
    }
}

fn castle_side(piece: &Piece, mv: Move) -> Option<CastleSide> {
    if piece.kind() != PieceKind::King {
        return None;
    }
    match mv.to.file() as i8 - mv.from.file() as i8 {
        2 => Some(CastleSide::Kingside),
        -2 => Some(CastleSide::Queenside),
        _ => None,
    }
}
