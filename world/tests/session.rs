use std::time::Duration;

use pathx_core::{AlgorithmKind, Command, Event, GridCell, SortTransaction, TileId};
use pathx_level::{Intersection, Level, LevelSeed, Road};
use pathx_world::{apply, query, Session, SnakeLayout};

fn small_level() -> Level {
    let mut level = Level::new(LevelSeed {
        name: "training".to_owned(),
        background_image: "training_bg.png".to_owned(),
        starting_location_image: "home.png".to_owned(),
        destination_image: "depot.png".to_owned(),
        money: 100,
        num_police: 1,
        num_bandits: 0,
        num_zombies: 0,
    });
    let a = level.add_intersection(Intersection::new(0, 0));
    let b = level.add_intersection(Intersection::new(100, 0));
    level.add_road(Road::new(a, b, false, 45)).expect("road");
    level.set_start(a).expect("start");
    level.set_destination(b).expect("destination");
    level
}

fn row_snake(length: u32, algorithm: AlgorithmKind) -> SnakeLayout {
    let cells = (0..length).map(|column| GridCell::new(column, 0)).collect();
    SnakeLayout::new(algorithm, length, 1, cells).expect("snake layout")
}

fn session(length: u32, algorithm: AlgorithmKind, seed: u64) -> Session {
    Session::new(small_level(), row_snake(length, algorithm), seed).expect("session")
}

fn ids_in_snake_order(session: &Session) -> Vec<TileId> {
    query::tile_view(session)
        .into_iter()
        .map(|snapshot| snapshot.id)
        .collect()
}

fn replay_to_completion(session: &mut Session) -> Vec<Event> {
    let mut events = Vec::new();
    let transactions: Vec<SortTransaction> = query::transactions(session).to_vec();
    for transaction in transactions {
        apply(
            session,
            Command::RequestSwap {
                first: transaction.from_index(),
                second: transaction.to_index(),
            },
            &mut events,
        );
    }
    events
}

#[test]
fn session_starts_unsorted_with_pending_transactions() {
    for seed in 0..4 {
        let session = session(6, AlgorithmKind::BubbleSort, seed);
        let ids = ids_in_snake_order(&session);
        assert!(
            ids.windows(2).any(|pair| pair[0] > pair[1]),
            "seed {seed} produced an already-sorted session",
        );
        assert!(!query::transactions(&session).is_empty());
        assert_eq!(query::progress(&session), 0);
        assert!(!query::is_complete(&session));
    }
}

#[test]
fn identical_seeds_stage_identical_sessions() {
    let first = session(8, AlgorithmKind::SelectionSort, 77);
    let second = session(8, AlgorithmKind::SelectionSort, 77);
    assert_eq!(ids_in_snake_order(&first), ids_in_snake_order(&second));
    assert_eq!(query::transactions(&first), query::transactions(&second));
}

#[test]
fn replaying_the_reference_sequence_wins_the_session() {
    for algorithm in [AlgorithmKind::BubbleSort, AlgorithmKind::SelectionSort] {
        let mut session = session(7, algorithm, 3);
        let events = replay_to_completion(&mut session);

        assert!(query::is_complete(&session));
        let ids = ids_in_snake_order(&session);
        assert!(
            ids.windows(2).all(|pair| pair[0] <= pair[1]),
            "completed session must leave tiles ascending by id",
        );
        assert!(
            matches!(
                events.last(),
                Some(Event::SortCompleted { outcome }) if outcome.is_perfect(),
            ),
            "a flawless replay must end in a perfect completion",
        );
    }
}

#[test]
fn tiles_stay_on_the_snake_cells_throughout() {
    let mut session = session(5, AlgorithmKind::BubbleSort, 11);
    let cells_before: Vec<GridCell> = query::tile_view(&session)
        .into_iter()
        .map(|snapshot| snapshot.cell)
        .collect();
    let _ = replay_to_completion(&mut session);
    let cells_after: Vec<GridCell> = query::tile_view(&session)
        .into_iter()
        .map(|snapshot| snapshot.cell)
        .collect();
    assert_eq!(
        cells_before, cells_after,
        "snake positions hold cells; swaps exchange occupants, not cells",
    );
}

#[test]
fn mismatched_swap_counts_a_mistake_and_moves_nothing() {
    let mut session = session(6, AlgorithmKind::BubbleSort, 5);
    let expected = query::transactions(&session)[0];
    let wrong = (0..6)
        .flat_map(|first| (0..6).map(move |second| (first, second)))
        .find(|&(first, second)| SortTransaction::new(first, second) != expected)
        .expect("a six-tile session has more than one candidate swap");

    let before = ids_in_snake_order(&session);
    let mut events = Vec::new();
    apply(
        &mut session,
        Command::RequestSwap {
            first: wrong.0,
            second: wrong.1,
        },
        &mut events,
    );

    assert_eq!(ids_in_snake_order(&session), before, "tiles must not move");
    assert_eq!(query::progress(&session), 0, "counter must not advance");
    assert_eq!(query::mistakes(&session), 1);
    assert_eq!(
        events,
        vec![Event::SwapRejected {
            first: wrong.0,
            second: wrong.1,
            mistakes: 1,
        }],
    );
}

#[test]
fn mistakes_survive_into_the_completion_outcome() {
    let mut session = session(5, AlgorithmKind::BubbleSort, 9);
    let expected = query::transactions(&session)[0];
    let wrong = (0..5)
        .flat_map(|first| (0..5).map(move |second| (first, second)))
        .find(|&(first, second)| SortTransaction::new(first, second) != expected)
        .expect("candidate");

    let mut events = Vec::new();
    apply(
        &mut session,
        Command::RequestSwap {
            first: wrong.0,
            second: wrong.1,
        },
        &mut events,
    );
    let events = replay_to_completion(&mut session);

    let Some(Event::SortCompleted { outcome }) = events.last() else {
        panic!("replay must complete the session");
    };
    assert_eq!(outcome.mistakes, 1);
    assert!(!outcome.is_perfect());
}

#[test]
fn undo_restores_both_tiles_to_their_previous_cells() {
    let mut session = session(6, AlgorithmKind::BubbleSort, 5);
    let snapshot_before = query::tile_view(&session);
    let first_transaction = query::transactions(&session)[0];

    let mut events = Vec::new();
    apply(
        &mut session,
        Command::RequestSwap {
            first: first_transaction.from_index(),
            second: first_transaction.to_index(),
        },
        &mut events,
    );
    assert_eq!(query::progress(&session), 1);

    apply(&mut session, Command::UndoSwap, &mut events);

    assert_eq!(query::progress(&session), 0);
    assert_eq!(
        query::tile_view(&session),
        snapshot_before,
        "undo must restore the exact pre-swap arrangement",
    );
    assert!(matches!(
        events.last(),
        Some(Event::SwapUndone { progress: 0, .. }),
    ));
}

#[test]
fn undo_with_no_progress_is_inert() {
    let mut session = session(4, AlgorithmKind::BubbleSort, 2);
    let before = query::tile_view(&session);
    let mut events = Vec::new();
    apply(&mut session, Command::UndoSwap, &mut events);
    assert!(events.is_empty());
    assert_eq!(query::tile_view(&session), before);
}

#[test]
fn out_of_range_swap_requests_are_ignored() {
    let mut session = session(4, AlgorithmKind::BubbleSort, 2);
    let mut events = Vec::new();
    apply(
        &mut session,
        Command::RequestSwap {
            first: 0,
            second: 99,
        },
        &mut events,
    );
    assert!(events.is_empty());
    assert_eq!(query::mistakes(&session), 0);
}

#[test]
fn swaps_after_completion_are_ignored() {
    let mut session = session(4, AlgorithmKind::BubbleSort, 2);
    let _ = replay_to_completion(&mut session);
    assert!(query::is_complete(&session));

    let before = ids_in_snake_order(&session);
    let mut events = Vec::new();
    apply(
        &mut session,
        Command::RequestSwap {
            first: 0,
            second: 1,
        },
        &mut events,
    );
    apply(&mut session, Command::UndoSwap, &mut events);

    assert!(events.is_empty());
    assert_eq!(ids_in_snake_order(&session), before);
}

#[test]
fn the_clock_stops_when_the_session_completes() {
    let mut session = session(4, AlgorithmKind::BubbleSort, 2);
    let mut events = Vec::new();
    apply(
        &mut session,
        Command::Tick {
            dt: Duration::from_secs(3),
        },
        &mut events,
    );
    assert_eq!(query::elapsed(&session), Duration::from_secs(3));

    let _ = replay_to_completion(&mut session);
    apply(
        &mut session,
        Command::Tick {
            dt: Duration::from_secs(10),
        },
        &mut events,
    );
    assert_eq!(
        query::elapsed(&session),
        Duration::from_secs(3),
        "time past completion must not count toward the outcome",
    );
}

#[test]
fn selection_sessions_accept_their_noop_transactions() {
    // Selection sort logs (i, i) when the minimum is already in place; the
    // player performs that step by requesting a swap of a tile with itself.
    let mut session = session(7, AlgorithmKind::SelectionSort, 1);
    let events = replay_to_completion(&mut session);
    assert!(query::is_complete(&session));
    assert_eq!(query::mistakes(&session), 0);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::SwapApplied { .. }))
            .count(),
        query::transactions(&session).len(),
    );
}

#[test]
fn tile_at_cell_finds_the_occupant() {
    let session = session(5, AlgorithmKind::BubbleSort, 4);
    for snapshot in query::tile_view(&session) {
        let found = query::tile_at_cell(&session, snapshot.cell).expect("occupied cell");
        assert_eq!(found, snapshot);
    }
    assert!(query::tile_at_cell(&session, GridCell::new(4, 3)).is_none());
}
