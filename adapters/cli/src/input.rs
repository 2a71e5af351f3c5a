//! Parsing of player input lines.

use std::path::PathBuf;

use pipes_core::Coordinate;

/// A single line of player input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    /// Place the front pipe on a cell.
    Place(Coordinate),
    /// Discard the front pipe.
    Skip,
    /// Revert the last placement.
    Undo,
    /// Let time pass without acting.
    Wait,
    /// Write the current board to a map file.
    Save(PathBuf),
    /// Load the next level of the catalog.
    NextLevel,
    /// Print the command summary.
    Help,
    /// Leave the game.
    Quit,
}

/// Summary printed for `:h`.
pub(crate) const HELP: &str = "\
Commands:
  <col><row>   place the next pipe, e.g. B3
  :s, skip     discard the next pipe
  :u, undo     undo the last placement
  :t, wait     let one tick pass
  :w <path>    save the board as a map file
  :n, next     load the next level
  :h, help     show this summary
  :q, quit     leave the game";

/// Parses a line of input. Returns a message describing the problem when
/// the line is not understood.
pub(crate) fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Err("Enter a command, or :h for help".to_owned()),
        ":q" | "quit" | "exit" => Ok(Input::Quit),
        ":u" | "undo" => Ok(Input::Undo),
        ":s" | "skip" => Ok(Input::Skip),
        ":t" | "wait" => Ok(Input::Wait),
        ":n" | "next" => Ok(Input::NextLevel),
        ":h" | "help" => Ok(Input::Help),
        ":w" | "save" => {
            if rest.is_empty() {
                Err("Give a file name to save to".to_owned())
            } else {
                Ok(Input::Save(PathBuf::from(rest)))
            }
        }
        _ => parse_coordinate(line).map(Input::Place),
    }
}

fn parse_coordinate(text: &str) -> Result<Coordinate, String> {
    let mut chars = text.chars();
    let letter = chars
        .next()
        .filter(char::is_ascii_alphabetic)
        .ok_or_else(|| "Cannot parse column!".to_owned())?
        .to_ascii_uppercase();
    let digits: String = chars.take_while(char::is_ascii_digit).collect();
    let row = digits
        .parse::<i32>()
        .map_err(|_| "Cannot parse row!".to_owned())?;

    let col = i32::from(u8::try_from(letter).unwrap_or(b'A') - b'A') + 1;
    Ok(Coordinate::new(row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_use_letter_then_row() {
        assert_eq!(parse_input("B3"), Ok(Input::Place(Coordinate::new(3, 2))));
        assert_eq!(parse_input("  a1 "), Ok(Input::Place(Coordinate::new(1, 1))));
        assert_eq!(parse_input("c12x"), Ok(Input::Place(Coordinate::new(12, 3))));
    }

    #[test]
    fn malformed_coordinates_are_explained() {
        assert_eq!(parse_input("3B"), Err("Cannot parse column!".to_owned()));
        assert_eq!(parse_input("B"), Err("Cannot parse row!".to_owned()));
    }

    #[test]
    fn commands_accept_short_and_long_forms() {
        assert_eq!(parse_input(":q"), Ok(Input::Quit));
        assert_eq!(parse_input("UNDO"), Ok(Input::Undo));
        assert_eq!(parse_input(":s"), Ok(Input::Skip));
        assert_eq!(parse_input("wait"), Ok(Input::Wait));
        assert_eq!(
            parse_input(":w levels/mine.map"),
            Ok(Input::Save(PathBuf::from("levels/mine.map")))
        );
        assert!(parse_input(":w").is_err());
    }
}
