use pipes_core::{Cell, Coordinate, Event, MapError, Pipe, PipeShape, UndoRejection};
use pipes_game::{FlowPhase, Game, GameConfig, GameError, GameStatus};

// Source at (1,1) points right, sink at (1,3) faces left.
const TINY: &str = "WWWW\nW>.<\nW..W\nWWWW";

fn tiny(pipes: Vec<Pipe>, delay: i32) -> Game {
    Game::from_layout(4, 4, TINY, pipes, &GameConfig::new(delay, 1, Some(17)))
        .expect("valid layout")
}

fn pipes(shapes: &[PipeShape]) -> Vec<Pipe> {
    shapes.iter().copied().map(Pipe::new).collect()
}

#[test]
fn single_horizontal_pipe_wins_the_tiny_map() {
    let mut game = tiny(pipes(&[PipeShape::Horizontal]), 0);
    let mut events = Vec::new();

    assert_eq!(game.place_pipe(Coordinate::new(1, 2), &mut events), Ok(true));
    assert!(game.map().check_path());

    game.update_state(&mut events);
    assert!(game
        .map()
        .cell(Coordinate::new(1, 1))
        .is_some_and(Cell::is_filled));

    game.start_countdown();
    events.clear();
    game.tick(&mut events);

    assert!(game
        .map()
        .cell(Coordinate::new(1, 2))
        .is_some_and(Cell::is_filled));
    assert!(game
        .map()
        .cell(Coordinate::new(1, 3))
        .is_some_and(Cell::is_filled));
    assert_eq!(game.status(), GameStatus::Won);
    assert_eq!(game.phase(), FlowPhase::Stopped);
    assert_eq!(
        events,
        vec![
            Event::TimeAdvanced { ticks: 1 },
            Event::FlowAdvanced { distance: 1 },
            Event::TilesFilled {
                distance: 1,
                newly_filled: 1
            },
            Event::RoundWon,
        ]
    );
}

#[test]
fn rotated_pipe_breaks_the_path() {
    let mut game = tiny(pipes(&[PipeShape::Vertical]), 0);
    let mut events = Vec::new();

    assert_eq!(game.place_pipe(Coordinate::new(1, 2), &mut events), Ok(true));

    assert!(!game.map().check_path());
    assert!(!game.has_won(&mut events));
}

#[test]
fn place_then_undo_restores_map_and_queue() {
    let mut game = tiny(Vec::new(), 3);
    let mut events = Vec::new();
    let map_before = game.map().clone();
    let queue_before: Vec<Pipe> = game.queue().iter().copied().collect();

    assert_eq!(game.place_pipe(Coordinate::new(2, 2), &mut events), Ok(true));
    assert_eq!(game.undo_step(&mut events), Ok(true));

    assert_eq!(game.map(), &map_before);
    let queue_after: Vec<Pipe> = game.queue().iter().copied().collect();
    assert_eq!(&queue_after[..queue_before.len()], queue_before.as_slice());
    assert_eq!(game.steps(), 2, "undo counts as a step");
    assert_eq!(game.undo_count(), 1);
}

#[test]
fn filled_pipe_cannot_be_undone() {
    let mut game = tiny(pipes(&[PipeShape::Horizontal]), 0);
    let mut events = Vec::new();

    assert_eq!(game.place_pipe(Coordinate::new(1, 2), &mut events), Ok(true));
    game.start_countdown();
    game.tick(&mut events);
    let steps = game.steps();
    let front = game.queue().peek();
    events.clear();

    assert_eq!(game.undo_step(&mut events), Ok(false));

    assert_eq!(
        events,
        vec![Event::UndoRejected {
            reason: UndoRejection::AlreadyFilled
        }]
    );
    assert_eq!(game.steps(), steps);
    assert_eq!(game.undo_count(), 0);
    assert_eq!(game.queue().peek(), front);
    assert!(game
        .map()
        .cell(Coordinate::new(1, 2))
        .and_then(Cell::pipe)
        .is_some());
}

#[test]
fn skip_consumes_front_pipe_and_counts_a_step() {
    let mut game = tiny(pipes(&[PipeShape::Cross, PipeShape::TopLeft]), 3);
    let mut events = Vec::new();

    game.skip_pipe(&mut events).expect("queue is never empty");

    assert_eq!(game.steps(), 1);
    assert_eq!(game.queue().peek(), Ok(Pipe::new(PipeShape::TopLeft)));
    assert_eq!(
        events,
        vec![
            Event::PipeSkipped {
                shape: PipeShape::Cross
            },
            Event::StepsChanged { steps: 1 },
        ]
    );
}

#[test]
fn loss_is_not_reported_before_water_flows() {
    let mut game = tiny(Vec::new(), 2);
    let mut events = Vec::new();
    game.start_countdown();

    for _ in 0..2 {
        game.tick(&mut events);
        assert!(!game.has_lost(&mut events), "distance {}", game.distance());
    }
    assert_eq!(game.distance(), 0);
    assert_eq!(game.status(), GameStatus::Playing);
}

#[test]
fn stalled_water_loses_the_round() {
    let mut game = tiny(Vec::new(), 0);
    let mut events = Vec::new();
    game.start_countdown();

    game.tick(&mut events);

    assert_eq!(game.distance(), 1);
    assert_eq!(game.status(), GameStatus::Lost);
    assert!(events.contains(&Event::RoundLost));
    assert_eq!(game.phase(), FlowPhase::Stopped);

    events.clear();
    game.tick(&mut events);
    assert!(events.is_empty(), "no tick after the round ended");
}

#[test]
fn flow_handlers_observe_distance() {
    use std::sync::{Arc, Mutex};

    let mut game = tiny(Vec::new(), 1);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    game.add_on_flow_handler(move |distance| sink.lock().expect("lock").push(distance));
    game.start_countdown();

    let mut events = Vec::new();
    game.tick(&mut events);
    game.tick(&mut events);

    assert_eq!(*seen.lock().expect("lock"), vec![0, 1]);
}

#[test]
fn oversized_board_is_an_error() {
    let result = Game::generate(i32::MAX, 5, &GameConfig::new(0, 1, Some(3)));
    assert!(
        matches!(
            result,
            Err(GameError::Map(MapError::TooLarge {
                rows: i32::MAX,
                cols: 5
            }))
        ),
        "interior size overflowing with walls must be rejected"
    );

    let result = Game::generate(2_000, 5, &GameConfig::new(0, 1, Some(3)));
    assert!(matches!(
        result,
        Err(GameError::Map(MapError::TooLarge { .. }))
    ));
}
