use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use engine::{search, Game};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod notation;
mod render;

use render::Style;

const HELP: &str = "\
commands:
  <from><to>   play a move, e.g. h3h10, h3 h10 or h3-h10
  moves        list the legal moves of the side to move
  board        redraw the board
  new          start a new game
  help         show this text
  quit         leave";

fn parse_args() -> Result<Style> {
    let mut style = Style::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--latin" => style.latin = true,
            "--plain" => style.colored = false,
            "-h" | "--help" => {
                println!("usage: xiangqi [--latin] [--plain]\n\n{}", HELP);
                std::process::exit(0);
            }
            other => bail!("unknown argument `{}`", other),
        }
    }
    Ok(style)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let style = parse_args()?;
    let mut game = Game::new();
    info!(?style, "new game");

    let mut stdout = io::stdout();
    print!("{}", render::render(&game, style));
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        match line.trim() {
            "" => {}
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "board" => print!("{}", render::render(&game, style)),
            "new" => {
                game = Game::new();
                info!("new game");
                print!("{}", render::render(&game, style));
            }
            "moves" => {
                let moves: Vec<String> = search::legal_moves(&mut game)
                    .into_iter()
                    .map(|(from, to)| notation::format_move(from, to))
                    .collect();
                println!("{} legal moves: {}", moves.len(), moves.join(" "));
            }
            cmd => match notation::parse_move(cmd) {
                Ok((from, to)) => match game.try_move(from, to) {
                    Ok(captured) => {
                        if let Some(piece) = captured {
                            println!("captured {} at {}", piece.kind.name(piece.color), piece.position);
                        }
                        print!("{}", render::render(&game, style));
                    }
                    Err(error) => println!("illegal move: {}", error),
                },
                Err(error) => println!("{}", error),
            },
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}
