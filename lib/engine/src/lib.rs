/*
 * 象棋规则引擎
 *
 * - board: 坐标与棋盘索引
 * - constant: 棋盘尺寸、九宫、河界与开局摆放
 * - piece: 颜色、棋种、棋子编号与各棋种走法判定
 * - roster: 每方 16 个棋子的名册，棋子位置与存活状态以此为准
 * - game: 回合、走子、吃子、将军与终局判定
 * - search: 穷举当前走棋方的合法走法
 */
pub mod board;
pub mod constant;
pub mod game;
pub mod piece;
pub mod roster;
pub mod search;

pub use board::Coordinate;
pub use game::{Game, GameState, MoveError, Setup, SetupError};
pub use piece::{Color, PieceKind};

/// A game at the standard opening, red to move.
pub fn new_game() -> Game {
    Game::new()
}
