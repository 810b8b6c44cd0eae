use crate::board::Coordinate;
use crate::constant::{BOARD_HEIGHT, OPENING_LAYOUT, ROSTER_SIZE};
use crate::piece::{Color, Piece, PieceId, Slot};

/// One side's pieces, indexed by [`Slot`].
///
/// The roster is the owner of every piece's position and in-play flag;
/// captured pieces stay in their slot with `in_play == false`.
/// Empty slots only occur in custom setups.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Roster {
    color: Color,
    pieces: [Option<Piece>; ROSTER_SIZE],
}

impl Roster {
    pub fn empty(color: Color) -> Self {
        Roster {
            color,
            pieces: [None; ROSTER_SIZE],
        }
    }

    // 标准开局摆放，黑方为红方上下镜像
    pub fn opening(color: Color) -> Self {
        let mut roster = Roster::empty(color);
        for (slot, col, row) in OPENING_LAYOUT {
            let row = match color {
                Color::Red => row,
                Color::Black => BOARD_HEIGHT + 1 - row,
            };
            roster.set(slot, Piece::new(slot.kind(), color, Coordinate::from_index(col, row)));
        }
        roster
    }

    pub fn get(&self, slot: Slot) -> Option<&Piece> {
        self.pieces[slot.index()].as_ref()
    }

    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut Piece> {
        self.pieces[slot.index()].as_mut()
    }

    pub fn set(&mut self, slot: Slot, piece: Piece) {
        debug_assert_eq!(piece.kind, slot.kind());
        self.pieces[slot.index()] = Some(piece);
    }

    pub fn general(&self) -> Option<&Piece> {
        self.get(Slot::General)
    }

    /// Pieces still on the board, with their ids.
    pub fn in_play(&self) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        Slot::ALL.into_iter().filter_map(move |slot| {
            self.get(slot)
                .filter(|piece| piece.in_play)
                .map(|piece| (PieceId::new(self.color, slot), piece))
        })
    }

    pub fn captured(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().flatten().filter(|piece| !piece.in_play)
    }
}
