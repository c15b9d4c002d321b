//! End-to-end engine scenarios driven through the event bus

use std::cell::RefCell;
use std::rc::Rc;

use letter_cascade::core::{Dictionary, GameEvent};
use letter_cascade::engine::{Engine, EngineConfig, SpawnPolicy};
use letter_cascade::term::{create_renderer, RendererMode};
use letter_cascade::types::{GameCommand, GameStatus, TICK_MS};

fn engine(words: &[&str], letters: &str) -> Engine {
    let config = EngineConfig {
        spawn: SpawnPolicy::Center,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config, Dictionary::from_words(words)).unwrap();
    engine.set_letter_queue(letters.chars());
    engine
}

fn drop_next(engine: &mut Engine) {
    engine.tick(TICK_MS);
    engine.send(GameCommand::Drop);
}

#[test]
fn test_vertical_dog_clears_column_three() {
    let mut engine = engine(&["DOG"], "GOD");
    let found = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&found);
    engine.bus_mut().on_word_found(move |event| {
        if let GameEvent::WordFound { word, score } = event {
            sink.borrow_mut().push((word.word.clone(), word.start, *score));
        }
    });

    engine.send(GameCommand::Start);
    for _ in 0..3 {
        drop_next(&mut engine);
        assert_eq!(engine.state().falling_letter, None);
    }

    let state = engine.state();
    assert_eq!(state.words_found, vec!["DOG".to_string()]);
    assert_eq!(state.score, 30);
    assert!((0..8).all(|row| state.grid.is_free(row, 3)));

    let found = found.borrow();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0, "DOG");
    assert_eq!((found[0].1.row, found[0].1.col), (5, 3));
    assert_eq!(found[0].2, 30);
}

#[test]
fn test_commands_arrive_as_key_press_events() {
    let mut engine = engine(&[], "AB");
    let keys = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&keys);
    engine.bus_mut().on_key_press(move |event| {
        if let GameEvent::KeyPress { command } = event {
            sink.borrow_mut().push(*command);
        }
    });

    engine.send(GameCommand::Start);
    engine.tick(TICK_MS);
    engine.send(GameCommand::MoveLeft);
    engine.send(GameCommand::Pause);
    engine.send(GameCommand::MoveLeft);

    assert_eq!(
        *keys.borrow(),
        vec![
            GameCommand::Start,
            GameCommand::MoveLeft,
            GameCommand::Pause,
            GameCommand::MoveLeft
        ]
    );
    assert_eq!(engine.status(), GameStatus::Paused);
    // The second move arrived while paused and was ignored.
    assert_eq!(engine.state().falling_letter.unwrap().col, 2);
}

#[test]
fn test_level_up_reported_per_threshold() {
    let config = EngineConfig {
        spawn: SpawnPolicy::Center,
        points_per_level: 10,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config, Dictionary::from_words(["DOG"])).unwrap();
    engine.set_letter_queue("GOD".chars());
    let levels = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&levels);
    engine.bus_mut().on_level_up(move |event| {
        if let GameEvent::LevelUp { level } = event {
            sink.borrow_mut().push(*level);
        }
    });

    engine.start();
    for _ in 0..3 {
        drop_next(&mut engine);
    }
    assert_eq!(*levels.borrow(), vec![2, 3, 4]);
    assert_eq!(engine.state().level, 4);
}

#[test]
fn test_reset_returns_to_idle_from_any_status() {
    let mut engine = engine(&["DOG"], "GOD");
    let resets = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&resets);
    engine.bus_mut().on_game_reset(move |_| *sink.borrow_mut() += 1);

    engine.start();
    drop_next(&mut engine);
    engine.pause();
    assert_eq!(engine.status(), GameStatus::Paused);

    engine.send(GameCommand::Reset);
    let state = engine.state();
    assert_eq!(engine.status(), GameStatus::Idle);
    assert_eq!(state.score, 0);
    assert_eq!(state.level, 1);
    assert!(state.grid.is_empty());
    assert!(!engine.store().can_undo());
    assert_eq!(*resets.borrow(), 1);
}

#[test]
fn test_export_and_import_across_engines() {
    let mut first = engine(&[], "ABC");
    first.start();
    drop_next(&mut first);
    drop_next(&mut first);
    let json = first.export();

    let mut second = engine(&[], "XYZ");
    assert!(second.import(&json));
    assert_eq!(second.state().letters_placed, 2);
    assert_eq!(second.state().grid, first.state().grid);
    assert!(!second.import("[]"));
}

#[test]
fn test_headless_session_runs_until_game_over() {
    let config = EngineConfig {
        rows: 3,
        columns: 3,
        spawn: SpawnPolicy::Fixed(0),
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config, Dictionary::new()).unwrap();
    engine
        .inject_renderer(create_renderer(RendererMode::Headless))
        .unwrap();
    engine.start();

    for _ in 0..10 {
        if engine.status() == GameStatus::GameOver {
            break;
        }
        drop_next(&mut engine);
    }
    assert_eq!(engine.status(), GameStatus::GameOver);
    engine.dispose();
}
