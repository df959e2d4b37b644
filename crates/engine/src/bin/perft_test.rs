use std::process::ExitCode;
use std::time::Instant;

use chess_rules::perft::{perft, perft_detailed, perft_divide};
use chess_rules::{Board, PERFT_POSITIONS};

const DEFAULT_DEPTH: u32 = 3;

// Usage: perft_test [depth] [fen]
// Without a FEN, runs every standard position up to `depth`.
fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let depth = match args.next().map(|arg| arg.parse::<u32>()) {
        None => DEFAULT_DEPTH,
        Some(Ok(depth)) => depth,
        Some(Err(err)) => {
            eprintln!("invalid depth: {err}");
            return ExitCode::FAILURE;
        }
    };
    let fen: Vec<String> = args.collect();

    if !fen.is_empty() {
        return run_single(&fen.join(" "), depth);
    }

    let mut passed = 0;
    for case in PERFT_POSITIONS {
        println!("\nTesting: {}", case.name);
        println!("FEN: {}", case.fen);
        let board = match Board::from_fen(case.fen) {
            Ok(board) => board,
            Err(err) => {
                eprintln!("  {err}");
                continue;
            }
        };

        let mut ok = true;
        for &(d, expected) in case.expected_results.iter().filter(|(d, _)| *d <= depth) {
            let start_time = Instant::now();
            match perft(&board, d) {
                Ok(nodes) => {
                    let status = if nodes == expected { "PASS" } else { "FAIL" };
                    println!(
                        "  {status} depth {d}: {nodes} nodes (expected {expected}) in {:.3}s",
                        start_time.elapsed().as_secs_f64()
                    );
                    ok &= nodes == expected;
                }
                Err(err) => {
                    println!("  FAIL depth {d}: {err}");
                    ok = false;
                }
            }
            if !ok {
                break;
            }
        }
        passed += usize::from(ok);
    }

    println!("\nResults: {}/{} positions passed", passed, PERFT_POSITIONS.len());
    if passed == PERFT_POSITIONS.len() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_single(fen: &str, depth: u32) -> ExitCode {
    let board = match Board::from_fen(fen) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    println!("{board}");
    for line in board.describe_state() {
        println!("{line}");
    }

    let start_time = Instant::now();
    match perft_divide(&board, depth) {
        Ok(divide) => {
            for (mv, nodes) in &divide {
                println!("{mv}: {nodes}");
            }
            let total: u64 = divide.iter().map(|(_, nodes)| nodes).sum();
            println!("\nDepth {depth}: {total} nodes");
            println!("Time: {:.3}s", start_time.elapsed().as_secs_f64());
        }
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }

    match perft_detailed(&board, depth) {
        Ok(stats) => {
            println!("Captures: {}", stats.captures);
            println!("En passant: {}", stats.en_passant);
            println!("Castles: {}", stats.castles);
            println!("Promotions: {}", stats.promotions);
            println!("Checks: {}", stats.checks);
            println!("Checkmates: {}", stats.checkmates);
            println!("Speed: {} nodes/s", stats.nodes_per_second());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
