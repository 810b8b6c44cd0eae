/*
 * 棋盘模块（Coordinate 与 Board）
 *
 * - 棋盘 9 列 x 10 行，列 a..i，行 1..10，红方在下（1..5），黑方在上（6..10）
 * - Board 只是一个按坐标索引的派生表，每格存放棋子句柄 PieceId；
 *   棋子的位置与存活状态以 Roster 为准，由 Game 负责两者同步
 * - Board 本身不包含任何走法规则
 */

use std::fmt;

use crate::constant::{
    BLACK_PALACE_ROWS, BLACK_RIVER_BANK, BOARD_HEIGHT, BOARD_WIDTH, PALACE_COLUMNS, RED_PALACE_ROWS,
    RED_RIVER_BANK,
};
use crate::piece::{Color, PieceId};

/// A board cell address: column `a..i` and rank `1..10`.
///
/// A coordinate may lie off the board; every consumer checks
/// [`Coordinate::is_on_board`] before indexing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Coordinate {
    column: i8,
    row: i8,
}

impl Coordinate {
    pub fn new(column: char, row: i8) -> Self {
        let column = (column as u32).wrapping_sub('a' as u32);
        Coordinate {
            column: i8::try_from(column).unwrap_or(-1),
            row,
        }
    }

    /// 列号从 0 开始（a = 0），行号从 1 开始
    pub fn from_index(column: i8, row: i8) -> Self {
        Coordinate { column, row }
    }

    pub fn column(&self) -> i8 {
        self.column
    }

    pub fn row(&self) -> i8 {
        self.row
    }

    pub fn file(&self) -> char {
        (b'a'.wrapping_add(self.column as u8)) as char
    }

    pub fn is_on_board(&self) -> bool {
        (0..BOARD_WIDTH).contains(&self.column) && (1..=BOARD_HEIGHT).contains(&self.row)
    }

    pub fn shift(&self, columns: i8, rows: i8) -> Self {
        Coordinate {
            column: self.column.saturating_add(columns),
            row: self.row.saturating_add(rows),
        }
    }

    fn index(&self) -> Option<(usize, usize)> {
        if self.is_on_board() {
            Some(((self.row - 1) as usize, self.column as usize))
        } else {
            None
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            write!(f, "{}{}", self.file(), self.row)
        } else {
            write!(f, "({}, {})", self.column, self.row)
        }
    }
}

// 是否在该方九宫格内
pub fn in_palace(pos: Coordinate, color: Color) -> bool {
    let (low, high) = match color {
        Color::Red => RED_PALACE_ROWS,
        Color::Black => BLACK_PALACE_ROWS,
    };
    (PALACE_COLUMNS.0..=PALACE_COLUMNS.1).contains(&pos.column) && (low..=high).contains(&pos.row)
}

// 是否仍在本方河界以内（未过河）
pub fn in_country(row: i8, color: Color) -> bool {
    match color {
        Color::Red => row <= RED_RIVER_BANK,
        Color::Black => row >= BLACK_RIVER_BANK,
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    cells: [[Option<PieceId>; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
}

impl Board {
    pub fn empty() -> Self {
        Board {
            cells: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
        }
    }

    pub fn piece_at(&self, pos: Coordinate) -> Option<PieceId> {
        let (row, col) = pos.index()?;
        self.cells[row][col]
    }

    pub fn has_piece(&self, pos: Coordinate) -> bool {
        self.piece_at(pos).is_some()
    }

    pub fn place(&mut self, pos: Coordinate, piece: PieceId) {
        debug_assert!(pos.is_on_board(), "placing {:?} off the board at {}", piece, pos);
        if let Some((row, col)) = pos.index() {
            self.cells[row][col] = Some(piece);
        }
    }

    pub fn clear(&mut self, pos: Coordinate) -> Option<PieceId> {
        let (row, col) = pos.index()?;
        self.cells[row][col].take()
    }

    /// Counts occupied cells strictly between `a` and `b`.
    ///
    /// Returns 0 unless the two coordinates share a rank or a file.
    pub fn pieces_between(&self, a: Coordinate, b: Coordinate) -> usize {
        if a.row == b.row {
            (a.column.min(b.column) + 1..a.column.max(b.column))
                .filter(|&col| self.has_piece(Coordinate::from_index(col, a.row)))
                .count()
        } else if a.column == b.column {
            (a.row.min(b.row) + 1..a.row.max(b.row))
                .filter(|&row| self.has_piece(Coordinate::from_index(a.column, row)))
                .count()
        } else {
            0
        }
    }

    /// 按行优先遍历全部 90 个格子
    pub fn cells() -> impl Iterator<Item = Coordinate> {
        (1..=BOARD_HEIGHT).flat_map(|row| (0..BOARD_WIDTH).map(move |col| Coordinate::from_index(col, row)))
    }
}
