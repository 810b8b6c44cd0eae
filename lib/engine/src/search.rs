/*
 * 走法搜索：为当前走棋方穷举 (棋子, 落点) 组合
 *
 * - 每个组合都走完整的 attempt_move(commit = false)，包括照面与自将检查
 * - 试走靠 Game 内部的 apply/revert 完成，不复制棋盘
 * - has_legal_move 找到第一个合法走法立即返回，用于终局判定
 */

use tracing::trace;

use crate::board::{Board, Coordinate};
use crate::game::Game;

fn movers(game: &Game) -> Vec<Coordinate> {
    game.roster(game.current_turn())
        .in_play()
        .map(|(_, piece)| piece.position)
        .collect()
}

/// Whether the side to move has at least one legal move.
pub fn has_legal_move(game: &mut Game) -> bool {
    for from in movers(game) {
        for to in Board::cells() {
            if game.attempt_move(from, to, false).is_ok() {
                trace!(%from, %to, "escape found");
                return true;
            }
        }
    }
    false
}

/// Every legal move of the side to move, grouped by roster slot.
pub fn legal_moves(game: &mut Game) -> Vec<(Coordinate, Coordinate)> {
    let mut moves = vec![];
    for from in movers(game) {
        for to in Board::cells() {
            if game.attempt_move(from, to, false).is_ok() {
                moves.push((from, to));
            }
        }
    }
    moves
}
