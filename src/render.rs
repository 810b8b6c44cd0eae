use engine::constant::{BOARD_HEIGHT, BOARD_WIDTH, RED_RIVER_BANK};
use engine::{Color, Coordinate, Game, GameState};

#[derive(Clone, Copy, Debug)]
pub struct Style {
    pub latin: bool,  // 用 G/A/E/H/R/C/S 代替汉字
    pub colored: bool, // 红方棋子用 ANSI 红色
}

impl Default for Style {
    fn default() -> Self {
        Style {
            latin: false,
            colored: true,
        }
    }
}

fn cell(game: &Game, pos: Coordinate, style: Style) -> String {
    let Some(piece) = game.piece_at(pos) else {
        return if style.latin { ". ".to_owned() } else { "··".to_owned() };
    };
    let text = if style.latin {
        let letter = piece.kind.letter();
        match piece.color {
            Color::Red => format!("{} ", letter),
            Color::Black => format!("{} ", letter.to_ascii_lowercase()),
        }
    } else {
        piece.kind.name(piece.color).to_owned()
    };
    if style.colored && piece.color == Color::Red {
        format!("\x1B[31m{}\x1B[0m", text)
    } else {
        text
    }
}

pub fn render(game: &Game, style: Style) -> String {
    let mut out = String::new();
    for row in (1..=BOARD_HEIGHT).rev() {
        out.push_str(&format!("{:>2} ", row));
        for col in 0..BOARD_WIDTH {
            out.push_str(&format!(" {}", cell(game, Coordinate::from_index(col, row), style)));
        }
        out.push('\n');
        if row == RED_RIVER_BANK + 1 {
            out.push_str("   ~~~~~~~~~~~~~~~~~~~~~~~~~~~\n");
        }
    }
    out.push_str("   ");
    for col in 0..BOARD_WIDTH {
        out.push_str(&format!(" {} ", Coordinate::from_index(col, 1).file()));
    }
    out.push('\n');
    out.push_str(&status(game));
    out.push('\n');
    out
}

pub fn status(game: &Game) -> String {
    match game.game_state() {
        GameState::Unfinished => {
            let turn = game.current_turn();
            if game.is_in_check(turn) {
                format!("{} to move (in check)", turn.name())
            } else {
                format!("{} to move", turn.name())
            }
        }
        state => format!("game over: {}", state),
    }
}
