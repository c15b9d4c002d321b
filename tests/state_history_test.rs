//! State container history, subscriptions and persistence

use std::cell::RefCell;
use std::rc::Rc;

use letter_cascade::core::{GameState, StateContainer, StatePatch};
use letter_cascade::types::{GameStatus, Position};

fn score_patch(score: u32) -> StatePatch {
    StatePatch {
        score: Some(score),
        ..Default::default()
    }
}

#[test]
fn test_undo_after_n_writes_returns_write_n_minus_one() {
    let mut store = StateContainer::new(GameState::new(8, 8));
    for n in 1..=5 {
        store.set_state(score_patch(n * 10));
    }
    assert_eq!(store.state().score, 50);

    assert!(store.undo());
    assert_eq!(store.state().score, 40);
    assert!(store.redo());
    assert_eq!(store.state().score, 50);
    assert!(!store.redo());
}

#[test]
fn test_undo_walks_back_to_initial_state() {
    let mut store = StateContainer::new(GameState::new(8, 8));
    store.set_state(score_patch(10));
    store.set_state(score_patch(20));

    assert!(store.undo());
    assert!(store.undo());
    assert_eq!(store.state().score, 0);
    assert!(!store.undo());

    // A fresh write drops the redo tail.
    store.set_state(score_patch(5));
    assert!(!store.can_redo());
    assert!(store.undo());
    assert_eq!(store.state().score, 0);
}

#[test]
fn test_subscribers_see_true_old_state_on_undo() {
    let mut store = StateContainer::new(GameState::new(8, 8));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |new: &GameState, old: &GameState| {
        sink.borrow_mut().push((old.score, new.score));
    });

    store.set_state(score_patch(30));
    store.undo();
    store.redo();
    assert_eq!(*seen.borrow(), vec![(0, 30), (30, 0), (0, 30)]);
}

#[test]
fn test_panicking_subscriber_does_not_block_others() {
    let mut store = StateContainer::new(GameState::new(8, 8));
    let calls = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&calls);
    store.subscribe(|_: &GameState, _: &GameState| panic!("subscriber failure"));
    store.subscribe(move |_: &GameState, _: &GameState| *sink.borrow_mut() += 1);

    store.update_score(30);
    assert_eq!(*calls.borrow(), 1);
    assert_eq!(store.state().score, 30);
}

#[test]
fn test_invalid_placement_is_silent() {
    let mut store = StateContainer::new(GameState::new(8, 8));
    assert!(store.place_letter('A', Position::new(7, 0)));
    let before = store.history_len();

    assert!(!store.place_letter('B', Position::new(7, 0)));
    assert!(!store.place_letter('B', Position::new(8, 0)));
    assert_eq!(store.history_len(), before);
    assert_eq!(store.state().grid.letter_at(7, 0), Some('A'));
}

#[test]
fn test_export_import_round_trip_and_rejection() {
    let mut store = StateContainer::new(GameState::new(8, 8));
    store.start_game(1_000);
    store.place_letter('Q', Position::new(7, 4));
    store.update_score(30);
    let json = store.export();

    let mut other = StateContainer::new(GameState::new(8, 8));
    assert!(other.import(&json));
    assert_eq!(other.state().score, 30);
    assert_eq!(other.state().grid.letter_at(7, 4), Some('Q'));
    assert_eq!(other.status(), GameStatus::Playing);

    let before = other.snapshot();
    assert!(!other.import("{ not json"));
    assert!(!other.import(r#"{"state": {"score": 1}}"#));
    assert_eq!(*other.state(), before);
}
