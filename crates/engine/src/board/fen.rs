use super::castling::CastlingRights;
use super::en_passant::EnPassant;
use super::placement::Placement;
use super::state::PositionState;
use super::Board;
use crate::error::{FenError, RulesError};
use crate::types::{CastleSide, Color, GameStatus, PieceKind, Square};

impl Board {
    /// Generates the FEN representation of the current position.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.piece_placement(),
            match self.active_color() {
                Color::White => "w",
                Color::Black => "b",
            },
            self.castling.to_fen(),
            self.en_passant.to_fen(),
            self.halfmove_clock(),
            self.fullmove_number(),
        )
    }

    /// FEN piece placement field, rank 8 first.
    pub fn piece_placement(&self) -> String {
        let mut fen = String::with_capacity(72);
        for rank in (0..8).rev() {
            let mut empty_squares = 0;
            for file in 0..8 {
                match self.placement.piece_at(Square::new(file, rank)) {
                    None => empty_squares += 1,
                    Some(piece) => {
                        if empty_squares > 0 {
                            fen.push_str(&empty_squares.to_string());
                            empty_squares = 0;
                        }
                        fen.push(piece.fen_char());
                    }
                }
            }
            if empty_squares > 0 {
                fen.push_str(&empty_squares.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        fen
    }

    /// Load a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(FenError::FieldCount(parts.len()).into());
        }

        let placement = parse_piece_placement(parts[0])?;

        let active_color = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::ActiveColor(other.to_string()).into()),
        };

        let castling = parse_castling_rights(parts[2])?;
        let en_passant = parse_en_passant(parts[3])?;

        let halfmove_clock = parts[4]
            .parse()
            .map_err(|_| FenError::Counter(parts[4].to_string()))?;
        let fullmove_number = parts[5]
            .parse()
            .map_err(|_| FenError::Counter(parts[5].to_string()))?;

        let mut board = Self {
            placement,
            state: PositionState::new(active_color, halfmove_clock, fullmove_number),
            castling,
            en_passant,
            status: GameStatus::InProgress,
        };
        board.status = board.evaluate_status()?;
        Ok(board)
    }
}

fn parse_piece_placement(field: &str) -> Result<Placement, FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    let mut placement = Placement::empty();
    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        // FEN starts from rank 8, we start from rank 0
        let rank = 7 - rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                if skip == 0 || file as u32 + skip > 8 {
                    return Err(FenError::RankLength { rank: rank + 1 });
                }
                file += skip as u8;
                continue;
            }
            if file >= 8 {
                return Err(FenError::RankLength { rank: rank + 1 });
            }
            let kind = PieceKind::from_char(ch).ok_or(FenError::UnknownPiece(ch))?;
            let color = if ch.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            placement.spawn(kind, color, Square::new(file, rank));
            file += 1;
        }

        if file != 8 {
            return Err(FenError::RankLength { rank: rank + 1 });
        }
    }

    for color in [Color::White, Color::Black] {
        let kings = placement
            .pieces_of(color)
            .filter(|(_, piece)| piece.kind() == PieceKind::King)
            .count();
        if kings != 1 {
            return Err(FenError::KingCount(color));
        }
    }

    Ok(placement)
}

fn parse_castling_rights(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }

    for ch in field.chars() {
        match ch {
            'K' => rights.grant(Color::White, CastleSide::Kingside),
            'Q' => rights.grant(Color::White, CastleSide::Queenside),
            'k' => rights.grant(Color::Black, CastleSide::Kingside),
            'q' => rights.grant(Color::Black, CastleSide::Queenside),
            _ => return Err(FenError::CastlingRight(ch)),
        }
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<EnPassant, FenError> {
    if field == "-" {
        return Ok(EnPassant::default());
    }

    let square: Square = field
        .parse()
        .map_err(|_| FenError::EnPassant(field.to_string()))?;
    // Only the third and sixth ranks can hold a skipped square.
    if square.rank() != 2 && square.rank() != 5 {
        return Err(FenError::EnPassant(field.to_string()));
    }
    Ok(EnPassant::with_target(Some(square)))
}
