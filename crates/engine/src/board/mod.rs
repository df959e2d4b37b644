use crate::error::RulesError;
use crate::types::*;

pub mod castling;
pub mod debug;
pub mod en_passant;
pub mod fen;
pub mod moves;
pub mod placement;
pub mod state;
pub mod validation;

pub use castling::CastlingRights;
pub use en_passant::EnPassant;
pub use placement::Placement;
pub use state::PositionState;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A chess position: placement, side to move, counters, castling rights and
/// en passant target, mutated in place as moves are applied.
#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) placement: Placement,
    pub(crate) state: PositionState,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: EnPassant,
    pub(crate) status: GameStatus,
}

impl Board {
    pub fn new() -> Self {
        let mut board = Self {
            placement: Placement::empty(),
            state: PositionState::default(),
            castling: CastlingRights::all(),
            en_passant: EnPassant::default(),
            status: GameStatus::InProgress,
        };
        board.initialize();
        board
    }

    /// Reset to the standard starting position.
    pub fn initialize(&mut self) {
        let mut placement = Placement::empty();
        for (file, kind) in (0u8..).zip(BACK_RANK) {
            placement.spawn(kind, Color::White, Square::new(file, 0));
            placement.spawn(PieceKind::Pawn, Color::White, Square::new(file, 1));
            placement.spawn(PieceKind::Pawn, Color::Black, Square::new(file, 6));
            placement.spawn(kind, Color::Black, Square::new(file, 7));
        }

        self.placement = placement;
        self.state = PositionState::default();
        self.castling = CastlingRights::all();
        self.en_passant = EnPassant::default();
        self.status = GameStatus::InProgress;
    }

    // Basic board operations
    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.placement.piece(id)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.placement.piece_at(square)
    }

    #[inline]
    pub fn id_at(&self, square: Square) -> Option<PieceId> {
        self.placement.id_at(square)
    }

    /// Ids of all `color` pieces on the board, in square order.
    pub fn pieces(&self, color: Color) -> Vec<PieceId> {
        self.placement.pieces_of(color).map(|(id, _)| id).collect()
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn active_color(&self) -> Color {
        self.state.active_color()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.state.halfmove_clock()
    }

    pub fn fullmove_number(&self) -> u32 {
        self.state.fullmove_number()
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn can_castle(&self, color: Color, side: CastleSide) -> Result<bool, RulesError> {
        self.castling.can_castle(color, side, &self.placement)
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant.target()
    }

    /// Status of the side to move, as of the last applied move.
    pub fn status(&self) -> GameStatus {
        self.status
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
