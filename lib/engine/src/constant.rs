use crate::piece::Slot;

pub const BOARD_WIDTH: i8 = 9;
pub const BOARD_HEIGHT: i8 = 10;

// 九宫格列范围 d..=f（从 0 开始的列号）
pub const PALACE_COLUMNS: (i8, i8) = (3, 5);
pub const RED_PALACE_ROWS: (i8, i8) = (1, 3);
pub const BLACK_PALACE_ROWS: (i8, i8) = (8, 10);

// 楚河汉界：红方 1..=5，黑方 6..=10
pub const RED_RIVER_BANK: i8 = 5;
pub const BLACK_RIVER_BANK: i8 = 6;

pub const ROSTER_SIZE: usize = 16;

/// 红方开局摆放 (棋子, 列, 行)；黑方按 `11 - 行` 镜像
pub const OPENING_LAYOUT: [(Slot, i8, i8); ROSTER_SIZE] = [
    (Slot::General, 4, 1),
    (Slot::Advisor1, 3, 1),
    (Slot::Advisor2, 5, 1),
    (Slot::Elephant1, 2, 1),
    (Slot::Elephant2, 6, 1),
    (Slot::Horse1, 1, 1),
    (Slot::Horse2, 7, 1),
    (Slot::Chariot1, 0, 1),
    (Slot::Chariot2, 8, 1),
    (Slot::Cannon1, 1, 3),
    (Slot::Cannon2, 7, 3),
    (Slot::Soldier1, 0, 4),
    (Slot::Soldier2, 2, 4),
    (Slot::Soldier3, 4, 4),
    (Slot::Soldier4, 6, 4),
    (Slot::Soldier5, 8, 4),
];
