//! Move-path enumeration ("perft") for checking move generation against
//! published node counts.
//!
//! Each child position is a clone of its parent; the board keeps no undo stack.

use std::time::Instant;

use log::debug;

use crate::error::RulesError;
use crate::types::{GameStatus, Move};
use crate::Board;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerftResult {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
    pub time_ms: u128,
}

impl PerftResult {
    pub fn nodes_per_second(&self) -> u64 {
        if self.time_ms == 0 {
            return 0;
        }
        (self.nodes * 1000) / (self.time_ms as u64)
    }

    fn absorb(&mut self, child: &PerftResult) {
        self.nodes += child.nodes;
        self.captures += child.captures;
        self.en_passant += child.en_passant;
        self.castles += child.castles;
        self.promotions += child.promotions;
        self.checks += child.checks;
        self.checkmates += child.checkmates;
    }
}

#[derive(Debug)]
pub struct PerftTestCase {
    pub name: &'static str,
    pub fen: &'static str,
    pub expected_results: &'static [(u32, u64)], // (depth, expected_nodes)
}

// Standard perft test positions
pub const PERFT_POSITIONS: &[PerftTestCase] = &[
    PerftTestCase {
        name: "Starting Position",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        expected_results: &[(1, 20), (2, 400), (3, 8_902), (4, 197_281)],
    },
    PerftTestCase {
        name: "Kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        expected_results: &[(1, 48), (2, 2_039), (3, 97_862)],
    },
    PerftTestCase {
        name: "Position 3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        expected_results: &[(1, 14), (2, 191), (3, 2_812), (4, 43_238)],
    },
    PerftTestCase {
        name: "Position 4",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        expected_results: &[(1, 6), (2, 264), (3, 9_467)],
    },
    PerftTestCase {
        name: "Position 5",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        expected_results: &[(1, 44), (2, 1_486), (3, 62_379)],
    },
];

/// Count leaf positions reachable in exactly `depth` plies.
pub fn perft(board: &Board, depth: u32) -> Result<u64, RulesError> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = board.all_legal_moves()?;
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0;
    for mv in moves {
        let mut child = board.clone();
        child.apply_move(mv)?;
        nodes += perft(&child, depth - 1)?;
    }
    Ok(nodes)
}

/// Perft that also classifies the moves made on the last ply.
pub fn perft_detailed(board: &Board, depth: u32) -> Result<PerftResult, RulesError> {
    let start_time = Instant::now();
    let mut result = PerftResult::default();

    if depth == 0 {
        result.nodes = 1;
        return Ok(result);
    }

    for mv in board.all_legal_moves()? {
        let mut child = board.clone();
        let Some(record) = child.apply_move(mv)? else {
            continue;
        };

        if depth == 1 {
            result.nodes += 1;
            result.captures += u64::from(record.captured.is_some());
            result.en_passant += u64::from(record.en_passant);
            result.castles += u64::from(record.castle.is_some());
            result.promotions += u64::from(record.promotion.is_some());
            match record.status {
                GameStatus::Check(_) => result.checks += 1,
                GameStatus::Checkmate(_) => {
                    result.checks += 1;
                    result.checkmates += 1;
                }
                _ => {}
            }
        } else {
            result.absorb(&perft_detailed(&child, depth - 1)?);
        }
    }

    result.time_ms = start_time.elapsed().as_millis();
    Ok(result)
}

/// Divide perft - shows per-move breakdown for debugging
pub fn perft_divide(board: &Board, depth: u32) -> Result<Vec<(Move, u64)>, RulesError> {
    let mut results = Vec::new();
    for mv in board.all_legal_moves()? {
        let mut child = board.clone();
        child.apply_move(mv)?;
        let nodes = perft(&child, depth.saturating_sub(1))?;
        debug!("divide {mv}: {nodes}");
        results.push((mv, nodes));
    }

    results.sort_by(|a, b| b.1.cmp(&a.1)); // Sort by node count descending
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_depth_three() {
        assert_eq!(perft(&Board::new(), 3), Ok(8_902));
    }

    #[test]
    fn detailed_counts_start_position_replies() {
        let result = perft_detailed(&Board::new(), 2).expect("kings present");
        assert_eq!(result.nodes, 400);
        assert_eq!(result.captures, 0);
        assert_eq!(result.checks, 0);
    }

    #[test]
    fn detailed_counts_kiwipete_specials() {
        let board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("valid FEN");
        let result = perft_detailed(&board, 1).expect("kings present");
        assert_eq!(result.nodes, 48);
        assert_eq!(result.captures, 8);
        assert_eq!(result.castles, 2);
        assert_eq!(result.en_passant, 0);
        assert_eq!(result.promotions, 0);
    }

    #[test]
    fn nodes_per_second_handles_zero_time() {
        let result = PerftResult { nodes: 400, ..PerftResult::default() };
        assert_eq!(result.nodes_per_second(), 0);
        let timed = PerftResult { nodes: 400, time_ms: 200, ..PerftResult::default() };
        assert_eq!(timed.nodes_per_second(), 2_000);
    }

    #[test]
    fn divide_sums_to_perft() {
        let board = Board::new();
        let divide = perft_divide(&board, 2).expect("kings present");
        assert_eq!(divide.len(), 20);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 400);
    }
}
