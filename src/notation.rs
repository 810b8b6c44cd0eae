// 坐标记法：列 a..i + 行 1..10，例如 "e1"、"h10"；走子写作 "h3h10"、"h3 h10" 或 "h3-h10"
use std::sync::LazyLock;

use anyhow::{anyhow, Result};
use engine::Coordinate;
use regex::Regex;

static COORDINATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-i])(10|[1-9])$").expect("coordinate pattern"));

static MOVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<from>[a-i](?:10|[1-9]))\s*[-\s]?\s*(?P<to>[a-i](?:10|[1-9]))$").expect("move pattern")
});

pub fn parse_coordinate(text: &str) -> Result<Coordinate> {
    let captures = COORDINATE
        .captures(text.trim())
        .ok_or_else(|| anyhow!("`{}` is not a coordinate like e1 or h10", text.trim()))?;
    let column = captures[1]
        .chars()
        .next()
        .map(|c| c.to_ascii_lowercase())
        .ok_or_else(|| anyhow!("missing column in `{}`", text))?;
    let row: i8 = captures[2].parse()?;
    Ok(Coordinate::new(column, row))
}

pub fn parse_move(text: &str) -> Result<(Coordinate, Coordinate)> {
    let captures = MOVE
        .captures(text.trim())
        .ok_or_else(|| anyhow!("`{}` is not a move like h3h10 or e1 e2", text.trim()))?;
    Ok((parse_coordinate(&captures["from"])?, parse_coordinate(&captures["to"])?))
}

pub fn format_move(from: Coordinate, to: Coordinate) -> String {
    format!("{}{}", from, to)
}
