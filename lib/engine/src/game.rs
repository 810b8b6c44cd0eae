/*
 * 对局模块：回合、走子合法性、吃子与终局判定
 *
 * 走子流程 attempt_move：
 *   1. 对局已结束则拒绝
 *   2. 起点必须有当前走棋方的棋子
 *   3. 棋子自身的几何规则 Piece::is_legal_move
 *   4. 非将帅走子不能让双方将帅照面
 *   5. 走子后己方不能被将军（apply 后检查再 revert，不复制棋盘）
 *   6. commit 为 false 时到此为止，局面保持不变
 *   7. 提交：更新 Roster 与 Board、吃子、换手、判定终局
 */

use std::fmt;

use tracing::{debug, info};

use crate::board::{Board, Coordinate};
use crate::piece::{Color, Piece, PieceId, PieceKind, Slot};
use crate::roster::Roster;
use crate::search;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum GameState {
    Unfinished,
    RedWon,
    BlackWon,
}

impl GameState {
    pub fn won_by(color: Color) -> Self {
        match color {
            Color::Red => GameState::RedWon,
            Color::Black => GameState::BlackWon,
        }
    }

    pub fn is_finished(&self) -> bool {
        *self != GameState::Unfinished
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameState::Unfinished => "UNFINISHED",
            GameState::RedWon => "RED_WON",
            GameState::BlackWon => "BLACK_WON",
        })
    }
}

/// Why a move was not applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveError {
    GameOver(GameState),
    OffBoard(Coordinate),
    EmptySource(Coordinate),
    WrongTurn { piece: Color, turn: Color },
    IllegalGeometry { kind: PieceKind, from: Coordinate, to: Coordinate },
    ExposesGeneral,
    SelfCheck,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::GameOver(state) => write!(f, "the game is over ({})", state),
            MoveError::OffBoard(pos) => write!(f, "{} is not on the board", pos),
            MoveError::EmptySource(pos) => write!(f, "there is no piece at {}", pos),
            MoveError::WrongTurn { piece, turn } => {
                write!(f, "it is {}'s turn, not {}'s", turn.name(), piece.name())
            }
            MoveError::IllegalGeometry { kind, from, to } => {
                write!(f, "a {:?} cannot move from {} to {}", kind, from, to)
            }
            MoveError::ExposesGeneral => f.write_str("the move leaves the generals facing each other"),
            MoveError::SelfCheck => f.write_str("the move leaves the own general in check"),
        }
    }
}

impl std::error::Error for MoveError {}

// 一次走子的逆操作记录
#[derive(Clone, Copy, Debug)]
struct Undo {
    id: PieceId,
    from: Coordinate,
    to: Coordinate,
    captured: Option<PieceId>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Game {
    rosters: [Roster; 2],
    board: Board,
    turn: Color,
    state: GameState,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// A new game at the standard opening, red to move.
    pub fn new() -> Self {
        Game::from_rosters(Roster::opening(Color::Red), Roster::opening(Color::Black), Color::Red)
    }

    fn from_rosters(red: Roster, black: Roster, turn: Color) -> Self {
        let mut board = Board::empty();
        for roster in [&red, &black] {
            for (id, piece) in roster.in_play() {
                board.place(piece.position, id);
            }
        }
        Game {
            rosters: [red, black],
            board,
            turn,
            state: GameState::Unfinished,
        }
    }

    pub fn current_turn(&self) -> Color {
        self.turn
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn roster(&self, color: Color) -> &Roster {
        &self.rosters[color.index()]
    }

    fn roster_mut(&mut self, color: Color) -> &mut Roster {
        &mut self.rosters[color.index()]
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.roster(id.color).get(id.slot)
    }

    pub fn piece_at(&self, pos: Coordinate) -> Option<&Piece> {
        self.board.piece_at(pos).and_then(|id| self.piece(id))
    }

    /// Plays `from -> to` for the side to move. Returns whether the move was applied.
    pub fn make_move(&mut self, from: Coordinate, to: Coordinate) -> bool {
        self.try_move(from, to).is_ok()
    }

    /// Plays `from -> to`, returning the captured piece on success.
    pub fn try_move(&mut self, from: Coordinate, to: Coordinate) -> Result<Option<Piece>, MoveError> {
        let result = self.attempt_move(from, to, true);
        match &result {
            Ok(Some(captured)) => debug!(%from, %to, captured = ?captured.kind, "move played"),
            Ok(None) => debug!(%from, %to, "move played"),
            Err(error) => debug!(%from, %to, %error, "move rejected"),
        }
        result
    }

    /// Evaluates `from -> to` without playing it. The game is left exactly as it was.
    pub fn check_move(&mut self, from: Coordinate, to: Coordinate) -> Result<(), MoveError> {
        self.attempt_move(from, to, false).map(|_| ())
    }

    pub(crate) fn attempt_move(
        &mut self,
        from: Coordinate,
        to: Coordinate,
        commit: bool,
    ) -> Result<Option<Piece>, MoveError> {
        if self.state.is_finished() {
            return Err(MoveError::GameOver(self.state));
        }
        for pos in [from, to] {
            if !pos.is_on_board() {
                return Err(MoveError::OffBoard(pos));
            }
        }

        let id = self.board.piece_at(from).ok_or(MoveError::EmptySource(from))?;
        if id.color != self.turn {
            return Err(MoveError::WrongTurn {
                piece: id.color,
                turn: self.turn,
            });
        }
        let piece = *self.piece(id).ok_or(MoveError::EmptySource(from))?;

        if !piece.is_legal_move(to, &self.board) {
            return Err(MoveError::IllegalGeometry {
                kind: piece.kind,
                from,
                to,
            });
        }
        // 将帅自身的走法已经处理了照面
        if piece.kind != PieceKind::General && self.move_exposes_general(from, to) {
            return Err(MoveError::ExposesGeneral);
        }

        let undo = self.apply(id, from, to);
        if self.is_in_check(id.color) {
            self.revert(undo);
            return Err(MoveError::SelfCheck);
        }
        let captured = undo.captured.and_then(|victim| self.piece(victim).copied());
        if !commit {
            self.revert(undo);
            return Ok(captured);
        }

        self.turn = self.turn.opponent();
        self.update_state();
        Ok(captured)
    }

    /// Whether `color`'s general is attacked by any opposing piece in play.
    pub fn is_in_check(&self, color: Color) -> bool {
        let Some(general) = self.roster(color).general().filter(|general| general.in_play) else {
            return false;
        };
        self.roster(color.opponent())
            .in_play()
            .any(|(_, piece)| piece.is_legal_move(general.position, &self.board))
    }

    /// Whether moving the piece on `from` to `to` would leave the two generals
    /// on one file with nothing between them.
    ///
    /// The generals are taken at their current cells, so this only answers
    /// for moves of other pieces.
    pub fn move_exposes_general(&self, from: Coordinate, to: Coordinate) -> bool {
        let generals = (
            self.roster(Color::Red).general().filter(|g| g.in_play),
            self.roster(Color::Black).general().filter(|g| g.in_play),
        );
        let (Some(red), Some(black)) = generals else {
            return false;
        };
        let (red, black) = (red.position, black.position);
        if red.column() != black.column() {
            return false;
        }
        // 落点算作有子，起点算作空
        let blocked = (red.row().min(black.row()) + 1..red.row().max(black.row()))
            .map(|row| Coordinate::from_index(red.column(), row))
            .any(|cell| cell == to || (cell != from && self.board.has_piece(cell)));
        !blocked
    }

    /// Whether playing the piece on `from` to `to` would leave its own general
    /// in check. Movement geometry is not validated here.
    pub fn move_puts_mover_in_check(&mut self, from: Coordinate, to: Coordinate) -> bool {
        if !from.is_on_board() || !to.is_on_board() || from == to {
            return false;
        }
        let Some(id) = self.board.piece_at(from) else {
            return false;
        };
        if self.board.piece_at(to).is_some_and(|target| target.color == id.color) {
            return false;
        }
        let undo = self.apply(id, from, to);
        let checked = self.is_in_check(id.color);
        self.revert(undo);
        checked
    }

    // 在 Roster 和 Board 上同时执行走子，返回用于撤销的记录
    fn apply(&mut self, id: PieceId, from: Coordinate, to: Coordinate) -> Undo {
        let captured = self.board.clear(to);
        if let Some(victim) = captured {
            if let Some(piece) = self.roster_mut(victim.color).get_mut(victim.slot) {
                piece.in_play = false;
            }
        }
        self.board.clear(from);
        self.board.place(to, id);
        if let Some(piece) = self.roster_mut(id.color).get_mut(id.slot) {
            piece.position = to;
        }
        Undo { id, from, to, captured }
    }

    fn revert(&mut self, undo: Undo) {
        self.board.clear(undo.to);
        self.board.place(undo.from, undo.id);
        if let Some(piece) = self.roster_mut(undo.id.color).get_mut(undo.id.slot) {
            piece.position = undo.from;
        }
        if let Some(victim) = undo.captured {
            self.board.place(undo.to, victim);
            if let Some(piece) = self.roster_mut(victim.color).get_mut(victim.slot) {
                piece.in_play = true;
            }
        }
    }

    // 轮到的一方无子可走即判负（困毙与将死同样处理）
    fn update_state(&mut self) {
        if search::has_legal_move(self) {
            return;
        }
        let checked = self.is_in_check(self.turn);
        self.state = GameState::won_by(self.turn.opponent());
        info!(state = %self.state, checkmate = checked, "game finished");
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SetupError {
    OffBoard(Coordinate),
    Occupied(Coordinate),
    TooMany(Color, PieceKind),
    MissingGeneral(Color),
    GeneralsFacing,
    OpponentInCheck(Color),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::OffBoard(pos) => write!(f, "{} is not on the board", pos),
            SetupError::Occupied(pos) => write!(f, "{} is already occupied", pos),
            SetupError::TooMany(color, kind) => write!(f, "{} has no free {:?} slot", color.name(), kind),
            SetupError::MissingGeneral(color) => write!(f, "{} has no general", color.name()),
            SetupError::GeneralsFacing => f.write_str("the generals face each other"),
            SetupError::OpponentInCheck(color) => {
                write!(f, "{} is in check but it is not {}'s turn", color.name(), color.name())
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Builder for games that start from an arbitrary position.
///
/// ```
/// use engine::board::Coordinate;
/// use engine::game::Setup;
/// use engine::piece::{Color, PieceKind};
///
/// let game = Setup::new(Color::Black)
///     .place(Color::Red, PieceKind::General, Coordinate::new('e', 1))
///     .place(Color::Black, PieceKind::General, Coordinate::new('d', 10))
///     .place(Color::Black, PieceKind::Chariot, Coordinate::new('d', 8))
///     .build()
///     .unwrap();
/// assert_eq!(game.current_turn(), Color::Black);
/// ```
#[derive(Clone, Debug)]
pub struct Setup {
    turn: Color,
    placements: Vec<(Color, PieceKind, Coordinate)>,
}

impl Setup {
    pub fn new(turn: Color) -> Self {
        Setup {
            turn,
            placements: vec![],
        }
    }

    pub fn place(mut self, color: Color, kind: PieceKind, pos: Coordinate) -> Self {
        self.placements.push((color, kind, pos));
        self
    }

    pub fn build(self) -> Result<Game, SetupError> {
        let mut rosters = [Roster::empty(Color::Red), Roster::empty(Color::Black)];
        let mut board = Board::empty();
        for (color, kind, pos) in self.placements {
            if !pos.is_on_board() {
                return Err(SetupError::OffBoard(pos));
            }
            if board.has_piece(pos) {
                return Err(SetupError::Occupied(pos));
            }
            let roster = &mut rosters[color.index()];
            let slot = Slot::of_kind(kind)
                .find(|slot| roster.get(*slot).is_none())
                .ok_or(SetupError::TooMany(color, kind))?;
            roster.set(slot, Piece::new(kind, color, pos));
            board.place(pos, PieceId::new(color, slot));
        }

        let [red, black] = rosters;
        let mut game = Game::from_rosters(red, black, self.turn);
        let general_at = |color: Color| {
            game.roster(color)
                .general()
                .map(|general| general.position)
                .ok_or(SetupError::MissingGeneral(color))
        };
        let red = general_at(Color::Red)?;
        let black = general_at(Color::Black)?;
        if red.column() == black.column() && game.board.pieces_between(red, black) == 0 {
            return Err(SetupError::GeneralsFacing);
        }
        let waiting = self.turn.opponent();
        if game.is_in_check(waiting) {
            return Err(SetupError::OpponentInCheck(waiting));
        }

        game.update_state();
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Coordinate;
    use crate::game::*;

    fn at(column: char, row: i8) -> Coordinate {
        Coordinate::new(column, row)
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.current_turn(), Color::Red);
        assert_eq!(game.game_state(), GameState::Unfinished);
        assert!(!game.is_in_check(Color::Red));
        assert!(!game.is_in_check(Color::Black));
        assert_eq!(game.piece_at(at('e', 1)).map(|p| p.kind), Some(PieceKind::General));
        assert_eq!(game.piece_at(at('b', 8)).map(|p| (p.kind, p.color)), Some((PieceKind::Cannon, Color::Black)));
        assert!(game.piece_at(at('e', 5)).is_none());
    }

    #[test]
    fn test_board_matches_rosters() {
        let game = Game::new();
        for color in [Color::Red, Color::Black] {
            for (id, piece) in game.roster(color).in_play() {
                assert_eq!(game.board().piece_at(piece.position), Some(id));
            }
        }
        assert_eq!(Board::cells().filter(|pos| game.board().has_piece(*pos)).count(), 32);
    }

    #[test]
    fn test_turn_order() {
        let mut game = Game::new();
        assert_eq!(
            game.try_move(at('a', 7), at('a', 6)),
            Err(MoveError::WrongTurn {
                piece: Color::Black,
                turn: Color::Red
            })
        );
        assert!(game.make_move(at('a', 4), at('a', 5)));
        assert_eq!(game.current_turn(), Color::Black);
        assert!(!game.make_move(at('a', 5), at('a', 6)));
        assert!(game.make_move(at('a', 7), at('a', 6)));
        assert_eq!(game.current_turn(), Color::Red);
    }

    #[test]
    fn test_structural_rejections() {
        let mut game = Game::new();
        assert_eq!(game.try_move(at('e', 5), at('e', 6)), Err(MoveError::EmptySource(at('e', 5))));
        assert_eq!(game.try_move(at('j', 1), at('e', 6)), Err(MoveError::OffBoard(at('j', 1))));
        assert_eq!(game.try_move(at('a', 1), at('a', 0)), Err(MoveError::OffBoard(at('a', 0))));
        assert!(matches!(
            game.try_move(at('a', 1), at('b', 2)),
            Err(MoveError::IllegalGeometry {
                kind: PieceKind::Chariot,
                ..
            })
        ));
        assert_eq!(game, Game::new());
    }

    #[test]
    fn test_capture_marks_piece() {
        let mut game = Game::new();
        let captured = game.try_move(at('h', 3), at('h', 10)).unwrap();
        let captured = captured.unwrap();
        assert_eq!(captured.kind, PieceKind::Horse);
        assert_eq!(captured.color, Color::Black);
        assert!(!captured.in_play);
        assert_eq!(captured.position, at('h', 10));

        assert_eq!(game.roster(Color::Black).captured().count(), 1);
        assert_eq!(game.roster(Color::Black).in_play().count(), 15);
        assert_eq!(game.piece_at(at('h', 10)).map(|p| (p.kind, p.color)), Some((PieceKind::Cannon, Color::Red)));
        assert!(game.piece_at(at('h', 3)).is_none());
    }

    #[test]
    fn test_check_move_leaves_game_untouched() {
        let mut game = Game::new();
        let before = game.clone();
        assert_eq!(game.check_move(at('h', 3), at('h', 10)), Ok(()));
        assert_eq!(game, before);
        assert!(game.check_move(at('h', 3), at('h', 9)).is_err());
        assert_eq!(game, before);

        // 被拒绝的自将走法也要完整恢复
        let mut game = Setup::new(Color::Red)
            .place(Color::Red, PieceKind::General, at('e', 1))
            .place(Color::Red, PieceKind::Chariot, at('e', 2))
            .place(Color::Black, PieceKind::Chariot, at('e', 7))
            .place(Color::Black, PieceKind::General, at('d', 10))
            .build()
            .unwrap();
        let before = game.clone();
        assert_eq!(game.check_move(at('e', 2), at('d', 2)), Err(MoveError::SelfCheck));
        assert_eq!(game, before);
        assert_eq!(game.check_move(at('e', 2), at('e', 7)), Ok(()));
        assert_eq!(game, before);
    }

    #[test]
    fn test_exposes_general() {
        let mut game = Setup::new(Color::Red)
            .place(Color::Red, PieceKind::General, at('e', 1))
            .place(Color::Red, PieceKind::Soldier, at('e', 7))
            .place(Color::Black, PieceKind::General, at('e', 10))
            .build()
            .unwrap();
        assert!(game.move_exposes_general(at('e', 7), at('d', 7)));
        assert!(!game.move_exposes_general(at('e', 7), at('e', 8)));
        assert_eq!(game.try_move(at('e', 7), at('d', 7)), Err(MoveError::ExposesGeneral));
        assert!(game.make_move(at('e', 7), at('e', 8)));
    }

    #[test]
    fn test_moving_along_file_still_blocks() {
        let mut game = Setup::new(Color::Red)
            .place(Color::Red, PieceKind::General, at('e', 1))
            .place(Color::Red, PieceKind::Soldier, at('e', 6))
            .place(Color::Black, PieceKind::General, at('e', 10))
            .build()
            .unwrap();
        // 落点仍在 e 列上，照样隔开双方将帅
        assert!(!game.move_exposes_general(at('e', 6), at('e', 7)));
        assert!(game.make_move(at('e', 6), at('e', 7)));
    }

    #[test]
    fn test_puts_mover_in_check() {
        let mut game = Setup::new(Color::Red)
            .place(Color::Red, PieceKind::General, at('e', 1))
            .place(Color::Red, PieceKind::Soldier, at('e', 7))
            .place(Color::Black, PieceKind::Chariot, at('e', 8))
            .place(Color::Black, PieceKind::General, at('e', 10))
            .build()
            .unwrap();
        assert!(!game.is_in_check(Color::Red));
        assert!(game.move_puts_mover_in_check(at('e', 7), at('d', 7)));
        assert!(!game.move_exposes_general(at('e', 7), at('d', 7)));
        assert!(!game.is_in_check(Color::Red));
        assert_eq!(game.try_move(at('e', 7), at('d', 7)), Err(MoveError::SelfCheck));
        assert!(game.make_move(at('e', 7), at('e', 8)));
    }

    #[test]
    fn test_general_cannot_face() {
        let mut game = Setup::new(Color::Red)
            .place(Color::Red, PieceKind::General, at('d', 1))
            .place(Color::Black, PieceKind::General, at('e', 10))
            .place(Color::Black, PieceKind::Soldier, at('a', 7))
            .build()
            .unwrap();
        assert!(matches!(
            game.try_move(at('d', 1), at('e', 1)),
            Err(MoveError::IllegalGeometry {
                kind: PieceKind::General,
                ..
            })
        ));
        assert!(game.make_move(at('d', 1), at('d', 2)));
    }

    fn general(color: Color, pos: Coordinate) -> (Color, PieceKind, Coordinate) {
        (color, PieceKind::General, pos)
    }

    fn build(pieces: &[(Color, PieceKind, Coordinate)]) -> Result<Game, SetupError> {
        pieces
            .iter()
            .fold(Setup::new(Color::Red), |setup, &(color, kind, pos)| setup.place(color, kind, pos))
            .build()
    }

    #[test]
    fn test_setup_errors() {
        assert_eq!(
            build(&[general(Color::Red, at('e', 1))]).unwrap_err(),
            SetupError::MissingGeneral(Color::Black)
        );
        assert_eq!(
            build(&[general(Color::Red, at('e', 1)), general(Color::Black, at('e', 10))]).unwrap_err(),
            SetupError::GeneralsFacing
        );
        assert_eq!(
            build(&[general(Color::Red, at('e', 1)), general(Color::Black, at('e', 1))]).unwrap_err(),
            SetupError::Occupied(at('e', 1))
        );
        assert_eq!(
            build(&[general(Color::Red, at('e', 0))]).unwrap_err(),
            SetupError::OffBoard(at('e', 0))
        );
        assert_eq!(
            build(&[
                general(Color::Red, at('e', 1)),
                general(Color::Red, at('d', 1)),
                general(Color::Black, at('f', 10)),
            ])
            .unwrap_err(),
            SetupError::TooMany(Color::Red, PieceKind::General)
        );
        assert_eq!(
            build(&[
                general(Color::Red, at('e', 1)),
                general(Color::Black, at('f', 10)),
                (Color::Red, PieceKind::Chariot, at('f', 5)),
            ])
            .unwrap_err(),
            SetupError::OpponentInCheck(Color::Black)
        );
    }

    #[test]
    fn test_game_over_rejects_moves() {
        let mut game = Setup::new(Color::Black)
            .place(Color::Red, PieceKind::General, at('d', 1))
            .place(Color::Black, PieceKind::Chariot, at('c', 6))
            .place(Color::Black, PieceKind::General, at('e', 8))
            .build()
            .unwrap();
        assert!(game.make_move(at('c', 6), at('d', 6)));
        assert_eq!(game.game_state(), GameState::BlackWon);
        let before = game.clone();
        assert_eq!(
            game.try_move(at('d', 1), at('d', 2)),
            Err(MoveError::GameOver(GameState::BlackWon))
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(GameState::Unfinished.to_string(), "UNFINISHED");
        assert_eq!(GameState::won_by(Color::Red).to_string(), "RED_WON");
        assert_eq!(GameState::won_by(Color::Black).to_string(), "BLACK_WON");
    }
}
