/*
 * 棋子模块
 *
 * - Color: 红/黑两方
 * - PieceKind: 七种棋子，每种有自己的走法判定
 * - Slot: 每方 16 个固定编号（将、士1/2、象1/2、马1/2、车1/2、炮1/2、兵1..5）
 * - PieceId: 棋盘格子里存放的句柄 (Color, Slot)
 * - Piece: 棋子本体，记录颜色、种类、当前位置和是否仍在棋盘上
 *
 * 走法判定分两步：所有棋子共用的前置检查 common_precondition，
 * 然后按种类分派到各自的几何规则。
 */

use crate::board::{in_country, in_palace, Board, Coordinate};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn opponent(&self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Color::Red => 0,
            Color::Black => 1,
        }
    }

    // 朝敌方的行方向
    pub fn forward(&self) -> i8 {
        match self {
            Color::Red => 1,
            Color::Black => -1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Black => "black",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceKind {
    General,  // 帅
    Advisor,  // 士
    Elephant, // 相
    Horse,    // 马
    Chariot,  // 车
    Cannon,   // 炮
    Soldier,  // 兵
}

impl PieceKind {
    pub fn name(&self, color: Color) -> &'static str {
        match (color, self) {
            (Color::Red, PieceKind::General) => "帥",
            (Color::Red, PieceKind::Advisor) => "仕",
            (Color::Red, PieceKind::Elephant) => "相",
            (Color::Red, PieceKind::Horse) => "傌",
            (Color::Red, PieceKind::Chariot) => "俥",
            (Color::Red, PieceKind::Cannon) => "炮",
            (Color::Red, PieceKind::Soldier) => "兵",
            (Color::Black, PieceKind::General) => "將",
            (Color::Black, PieceKind::Advisor) => "士",
            (Color::Black, PieceKind::Elephant) => "象",
            (Color::Black, PieceKind::Horse) => "馬",
            (Color::Black, PieceKind::Chariot) => "車",
            (Color::Black, PieceKind::Cannon) => "砲",
            (Color::Black, PieceKind::Soldier) => "卒",
        }
    }

    pub fn letter(&self) -> char {
        match self {
            PieceKind::General => 'G',
            PieceKind::Advisor => 'A',
            PieceKind::Elephant => 'E',
            PieceKind::Horse => 'H',
            PieceKind::Chariot => 'R',
            PieceKind::Cannon => 'C',
            PieceKind::Soldier => 'S',
        }
    }
}

/// Stable roster identifier of a piece within one color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Slot {
    General,
    Advisor1,
    Advisor2,
    Elephant1,
    Elephant2,
    Horse1,
    Horse2,
    Chariot1,
    Chariot2,
    Cannon1,
    Cannon2,
    Soldier1,
    Soldier2,
    Soldier3,
    Soldier4,
    Soldier5,
}

impl Slot {
    pub const ALL: [Slot; 16] = [
        Slot::General,
        Slot::Advisor1,
        Slot::Advisor2,
        Slot::Elephant1,
        Slot::Elephant2,
        Slot::Horse1,
        Slot::Horse2,
        Slot::Chariot1,
        Slot::Chariot2,
        Slot::Cannon1,
        Slot::Cannon2,
        Slot::Soldier1,
        Slot::Soldier2,
        Slot::Soldier3,
        Slot::Soldier4,
        Slot::Soldier5,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn kind(&self) -> PieceKind {
        match self {
            Slot::General => PieceKind::General,
            Slot::Advisor1 | Slot::Advisor2 => PieceKind::Advisor,
            Slot::Elephant1 | Slot::Elephant2 => PieceKind::Elephant,
            Slot::Horse1 | Slot::Horse2 => PieceKind::Horse,
            Slot::Chariot1 | Slot::Chariot2 => PieceKind::Chariot,
            Slot::Cannon1 | Slot::Cannon2 => PieceKind::Cannon,
            Slot::Soldier1 | Slot::Soldier2 | Slot::Soldier3 | Slot::Soldier4 | Slot::Soldier5 => {
                PieceKind::Soldier
            }
        }
    }

    pub fn of_kind(kind: PieceKind) -> impl Iterator<Item = Slot> {
        Slot::ALL.into_iter().filter(move |slot| slot.kind() == kind)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PieceId {
    pub color: Color,
    pub slot: Slot,
}

impl PieceId {
    pub fn new(color: Color, slot: Slot) -> Self {
        PieceId { color, slot }
    }

    pub fn general(color: Color) -> Self {
        PieceId::new(color, Slot::General)
    }

    pub fn kind(&self) -> PieceKind {
        self.slot.kind()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub position: Coordinate,
    pub in_play: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, position: Coordinate) -> Self {
        Piece {
            kind,
            color,
            position,
            in_play: true,
        }
    }

    /// Whether this piece may move to `to` on `board`, judged by its own
    /// movement geometry only.
    ///
    /// Game-wide rules (exposing the generals, leaving the own general in
    /// check, turn order) are applied by [`crate::game::Game`].
    pub fn is_legal_move(&self, to: Coordinate, board: &Board) -> bool {
        if !self.common_precondition(to, board) {
            return false;
        }
        let from = self.position;
        let dc = to.column() - from.column();
        let dr = to.row() - from.row();
        match self.kind {
            PieceKind::General => self.general_move(to, dc, dr, board),
            PieceKind::Advisor => in_palace(to, self.color) && dc.abs() == 1 && dr.abs() == 1,
            PieceKind::Elephant => {
                in_country(to.row(), self.color)
                    && dc.abs() == 2
                    && dr.abs() == 2
                    // 塞象眼
                    && !board.has_piece(from.shift(dc / 2, dr / 2))
            }
            PieceKind::Horse => {
                // 蹩马腿：长边一侧紧挨起点的格子
                let leg = match (dc.abs(), dr.abs()) {
                    (2, 1) => from.shift(dc / 2, 0),
                    (1, 2) => from.shift(0, dr / 2),
                    _ => return false,
                };
                !board.has_piece(leg)
            }
            PieceKind::Chariot => (dc == 0 || dr == 0) && board.pieces_between(from, to) == 0,
            PieceKind::Cannon => {
                if dc != 0 && dr != 0 {
                    return false;
                }
                let screens = board.pieces_between(from, to);
                if board.has_piece(to) {
                    screens == 1
                } else {
                    screens == 0
                }
            }
            PieceKind::Soldier => {
                if dc.abs() + dr.abs() != 1 {
                    return false;
                }
                if dr == -self.color.forward() {
                    return false;
                }
                // 没过河只能前进
                dc == 0 || !in_country(from.row(), self.color)
            }
        }
    }

    // Checks shared by every kind: a real move, on the board, not onto a friend.
    fn common_precondition(&self, to: Coordinate, board: &Board) -> bool {
        if !self.in_play || to == self.position || !to.is_on_board() {
            return false;
        }
        match board.piece_at(to) {
            Some(target) => target.color != self.color,
            None => true,
        }
    }

    fn general_move(&self, to: Coordinate, dc: i8, dr: i8, board: &Board) -> bool {
        if dc.abs() + dr.abs() != 1 || !in_palace(to, self.color) {
            return false;
        }
        // 将帅不能照面：从落点沿本列向敌方扫描，第一个遇到的棋子不能是对方的将
        let enemy_general = PieceId::general(self.color.opponent());
        let mut cell = to.shift(0, self.color.forward());
        while cell.is_on_board() {
            if cell != self.position {
                if let Some(found) = board.piece_at(cell) {
                    return found != enemy_general;
                }
            }
            cell = cell.shift(0, self.color.forward());
        }
        true
    }
}
