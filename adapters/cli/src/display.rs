//! Terminal rendering of the board, the queue and game events.

use std::fmt::Write as _;

use pipes_core::{Coordinate, Event};
use pipes_game::{FlowPhase, Game};
use pipes_world::Map;

/// Letter labelling interior column `col`, which starts at 1.
pub(crate) fn column_label(col: i32) -> Option<char> {
    let offset = u8::try_from(col.checked_sub(1)?).ok()?;
    (offset < 26).then(|| char::from(b'A' + offset))
}

/// Player-facing name of a coordinate, such as `B3`.
pub(crate) fn coordinate_label(coord: Coordinate) -> String {
    match column_label(coord.col()) {
        Some(letter) => format!("{letter}{}", coord.row()),
        None => format!("({}, {})", coord.row(), coord.col()),
    }
}

/// Board framed by column letters and row numbers.
pub(crate) fn render_board(map: &Map) -> String {
    let rows = map.rows();
    let pad = (rows - 1).max(0).to_string().len();
    let mut out = String::new();

    push_column_header(&mut out, pad, map.cols());
    let width = usize::try_from(map.cols()).unwrap_or(1).max(1);
    for (row, cells) in (0..).zip(map.cells().chunks(width)) {
        let labelled = row != 0 && row != rows - 1;
        if labelled {
            let _ = write!(out, "{row:>pad$}");
        } else {
            out.push_str(&" ".repeat(pad));
        }
        out.extend(cells.iter().map(|cell| cell.to_single_char()));
        if labelled {
            let _ = write!(out, "{row}");
        }
        out.push('\n');
    }
    push_column_header(&mut out, pad, map.cols());
    out
}

fn push_column_header(out: &mut String, pad: usize, cols: i32) {
    out.push_str(&" ".repeat(pad + 1));
    out.extend((1..cols - 1).map(|col| column_label(col).unwrap_or('?')));
    out.push('\n');
}

/// Full view of a round: board, upcoming pipes and counters.
pub(crate) fn render_game(game: &Game) -> String {
    let mut out = render_board(game.map());
    out.push('\n');

    let upcoming: Vec<String> = game
        .queue()
        .iter()
        .map(|pipe| pipe.to_single_char().to_string())
        .collect();
    let _ = writeln!(out, "Next: {}", upcoming.join(" "));

    let _ = write!(
        out,
        "Steps: {}  Undos: {}  ",
        game.steps(),
        game.undo_count()
    );
    let _ = match game.phase() {
        FlowPhase::Idle => writeln!(out, "Water waits for the countdown to start"),
        FlowPhase::CountingDown => writeln!(
            out,
            "Water flows in {} round(s)",
            game.distance().saturating_neg()
        ),
        FlowPhase::Flowing => writeln!(out, "Water distance: {}", game.distance()),
        FlowPhase::Stopped => writeln!(out, "Round over"),
    };
    out
}

/// Message for events the player should be told about.
pub(crate) fn describe(event: &Event) -> Option<String> {
    match event {
        Event::PlacementRejected { cell, reason } => Some(format!(
            "Cannot place pipe on {}: {reason}",
            coordinate_label(*cell)
        )),
        Event::UndoRejected { reason } => Some(format!("Cannot undo: {reason}")),
        Event::StepUndone { cell, .. } => {
            Some(format!("Removed pipe from {}", coordinate_label(*cell)))
        }
        Event::FlowAdvanced { distance } if *distance == 0 => {
            Some("Water starts flowing!".to_owned())
        }
        Event::RoundWon => Some("You win!".to_owned()),
        Event::RoundLost => Some("You lost!".to_owned()),
        _ => None,
    }
}
