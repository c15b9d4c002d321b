//! State container module - the single writer of `GameState`
//!
//! Every write goes through `set_state` (or a wholesale replacement for
//! undo/redo/reset/import), which:
//! 1. records a copy of the pre-write state in the bounded history,
//! 2. merges the patch,
//! 3. calls each subscriber in registration order with `(new, old)`.
//!
//! A panicking subscriber is logged and skipped; the others still run.
//! Domain mutators below build the correct patch for each game action so
//! callers never hand-assemble partial updates.

use std::mem;

use crate::dispatch::guarded;
use crate::grid::normalize_letter;
use crate::history::History;
use crate::letter::FallingLetter;
use crate::snapshot::{SavedGame, SnapshotError};
use crate::state::{GameState, GameStats, StatePatch, UiFlags};
use crate::types::{GameStatus, Position, Screen, WordMatch, HISTORY_CAPACITY};

type Subscriber = Box<dyn FnMut(&GameState, &GameState)>;

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owner of the canonical game state
pub struct StateContainer {
    state: GameState,
    initial: GameState,
    history: History<GameState>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl StateContainer {
    pub fn new(initial: GameState) -> Self {
        Self::with_history_capacity(initial, HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(initial: GameState, capacity: usize) -> Self {
        Self {
            state: initial.clone(),
            initial,
            history: History::new(capacity),
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Read-only view of the live state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the live state
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn stats(&self) -> GameStats {
        self.state.stats()
    }

    // === Subscription ===

    /// Register a subscriber called with `(new_state, old_state)` after every write
    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&GameState, &GameState) + 'static,
    ) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, old: &GameState) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            guarded("state", "subscriber", || subscriber(&self.state, old));
        }
    }

    // === Writes ===

    /// Merge `patch` into the state, recording history and notifying subscribers
    pub fn set_state(&mut self, patch: StatePatch) {
        let old = self.state.clone();
        self.history.record(old.clone());
        patch.apply(&mut self.state);
        self.notify(&old);
    }

    /// Replace the whole state as one recorded write
    fn replace_state(&mut self, next: GameState) {
        let old = mem::replace(&mut self.state, next);
        self.history.record(old.clone());
        self.notify(&old);
    }

    /// Add points to the score and the lifetime total
    pub fn update_score(&mut self, points: u32) {
        self.set_state(StatePatch {
            score: Some(self.state.score.saturating_add(points)),
            total_score: Some(self.state.total_score.saturating_add(points)),
            ..Default::default()
        });
    }

    /// Adjust the combo by `delta` (never below zero), tracking the maximum
    pub fn update_combo(&mut self, delta: i32) {
        let combo = self.state.combo.saturating_add_signed(delta);
        self.set_state(StatePatch {
            combo: Some(combo),
            max_combo: Some(self.state.max_combo.max(combo)),
            ..Default::default()
        });
    }

    pub fn reset_combo(&mut self) {
        self.set_state(StatePatch {
            combo: Some(0),
            ..Default::default()
        });
    }

    /// Append a found word
    pub fn add_word(&mut self, word: &str) {
        let mut words = self.state.words_found.clone();
        words.push(word.to_uppercase());
        self.set_state(StatePatch {
            words_completed: Some(self.state.words_completed + 1),
            words_found: Some(words),
            ..Default::default()
        });
    }

    /// Write `letter` into a free cell.
    ///
    /// An out-of-bounds or occupied target is an invalid move: nothing is
    /// written, recorded or notified, and false is returned.
    pub fn place_letter(&mut self, letter: char, at: Position) -> bool {
        let mut grid = self.state.grid.clone();
        if !grid.place(at.row, at.col, letter) {
            return false;
        }
        self.set_state(StatePatch {
            grid: Some(grid),
            letters_placed: Some(self.state.letters_placed + 1),
            ..Default::default()
        });
        true
    }

    /// Clear the cells of a match; returns how many letters were removed
    pub fn clear_word(&mut self, word: &WordMatch) -> usize {
        let mut grid = self.state.grid.clone();
        let cleared = grid.clear_match(word);
        if cleared > 0 {
            self.set_state(StatePatch {
                grid: Some(grid),
                ..Default::default()
            });
        }
        cleared
    }

    /// Replace the falling letter (or clear it with `None`)
    ///
    /// The letter is upper-cased; anything the grid would not accept is
    /// rejected and false returned with the state untouched.
    pub fn set_falling_letter(&mut self, letter: Option<FallingLetter>) -> bool {
        let letter = match letter {
            Some(falling) => match normalize_letter(falling.letter) {
                Some(ch) => Some(FallingLetter { letter: ch, ..falling }),
                None => {
                    tracing::debug!(letter = %falling.letter, "rejected falling letter");
                    return false;
                }
            },
            None => None,
        };
        self.set_state(StatePatch {
            falling_letter: Some(letter),
            ..Default::default()
        });
        true
    }

    /// Append a whole batch to the letter queue in one write
    ///
    /// Letters are upper-cased; non-letters are dropped.
    pub fn push_letters(&mut self, letters: impl IntoIterator<Item = char>) {
        let mut queue = self.state.letter_queue.clone();
        queue.extend(letters.into_iter().filter_map(normalize_letter));
        self.set_state(StatePatch {
            letter_queue: Some(queue),
            ..Default::default()
        });
    }

    /// Pop the front of the letter queue
    pub fn take_next_letter(&mut self) -> Option<char> {
        let mut queue = self.state.letter_queue.clone();
        let letter = queue.pop_front()?;
        self.set_state(StatePatch {
            letter_queue: Some(queue),
            ..Default::default()
        });
        Some(letter)
    }

    /// Enter the playing state, stamping the start time
    pub fn start_game(&mut self, now_ms: i64) {
        self.set_state(StatePatch {
            running: Some(true),
            paused: Some(false),
            over: Some(false),
            started_at_ms: Some(Some(now_ms)),
            ui: Some(UiFlags {
                current_screen: Screen::Game,
                ..UiFlags::default()
            }),
            ..Default::default()
        });
    }

    /// Toggle pause; returns the new paused flag
    pub fn pause_game(&mut self) -> bool {
        let paused = !self.state.paused;
        self.set_state(StatePatch {
            paused: Some(paused),
            ui: Some(UiFlags {
                show_pause_menu: paused,
                current_screen: if paused { Screen::Pause } else { Screen::Game },
                ..self.state.ui
            }),
            ..Default::default()
        });
        paused
    }

    pub fn end_game(&mut self) {
        self.set_state(StatePatch {
            running: Some(false),
            paused: Some(false),
            over: Some(true),
            ui: Some(UiFlags {
                show_pause_menu: false,
                show_game_over: true,
                show_level_up: false,
                current_screen: Screen::GameOver,
            }),
            ..Default::default()
        });
    }

    /// Advance one level; returns the new level
    pub fn level_up(&mut self) -> u32 {
        let level = self.state.level + 1;
        self.set_state(StatePatch {
            level: Some(level),
            ui: Some(UiFlags {
                show_level_up: true,
                ..self.state.ui
            }),
            ..Default::default()
        });
        level
    }

    /// Clear the level-up banner flag, if set
    pub fn acknowledge_level_up(&mut self) {
        if self.state.ui.show_level_up {
            self.set_state(StatePatch {
                ui: Some(UiFlags {
                    show_level_up: false,
                    ..self.state.ui
                }),
                ..Default::default()
            });
        }
    }

    pub fn set_fall_speed(&mut self, fall_speed_ms: u32) {
        self.set_state(StatePatch {
            fall_speed_ms: Some(fall_speed_ms),
            ..Default::default()
        });
    }

    pub fn add_play_time(&mut self, elapsed_ms: u64) {
        self.set_state(StatePatch {
            play_time_ms: Some(self.state.play_time_ms.saturating_add(elapsed_ms)),
            ..Default::default()
        });
    }

    // === History ===

    /// Restore the state before the most recent write.
    ///
    /// Subscribers receive the state being replaced as `old`.
    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        let old = self.state.clone();
        self.history.undo(&mut self.state);
        tracing::debug!(index = ?self.history.index(), "undo");
        self.notify(&old);
        true
    }

    /// Re-apply the most recently undone write
    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        let old = self.state.clone();
        self.history.redo(&mut self.state);
        tracing::debug!(index = ?self.history.index(), "redo");
        self.notify(&old);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// History cursor; `None` when nothing can be undone
    pub fn history_index(&self) -> Option<usize> {
        self.history.index()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Restore the initial state and clear history
    pub fn reset(&mut self) {
        let initial = self.initial.clone();
        self.reset_to(initial);
    }

    /// Replace the state with `fresh` in one notification and clear history
    pub fn reset_to(&mut self, fresh: GameState) {
        let old = mem::replace(&mut self.state, fresh);
        self.history.clear();
        self.notify(&old);
    }

    // === Persistence ===

    pub fn try_export(&self) -> Result<String, SnapshotError> {
        SavedGame::capture(&self.state).to_json()
    }

    /// JSON snapshot of the live state with a timestamp
    pub fn export(&self) -> String {
        match self.try_export() {
            Ok(json) => json,
            Err(err) => {
                tracing::error!(%err, "state export failed");
                String::new()
            }
        }
    }

    /// Replace the state from a snapshot; the state is untouched on error
    pub fn try_import(&mut self, json: &str) -> Result<(), SnapshotError> {
        let rows = self.state.grid.rows();
        let cols = self.state.grid.cols();
        let saved = SavedGame::from_json(json, rows, cols)?;
        tracing::info!(timestamp = %saved.timestamp, "state imported");
        self.replace_state(saved.state);
        Ok(())
    }

    /// Like `try_import`, reporting failure as `false`
    pub fn import(&mut self, json: &str) -> bool {
        match self.try_import(json) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "rejected state import");
                false
            }
        }
    }
}

impl Default for StateContainer {
    fn default() -> Self {
        Self::new(GameState::default())
    }
}

impl std::fmt::Debug for StateContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateContainer")
            .field("state", &self.state)
            .field("history_index", &self.history.index())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store() -> StateContainer {
        StateContainer::new(GameState::new(8, 8))
    }

    #[test]
    fn test_subscribers_run_in_order_with_old_state() {
        let mut store = store();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let log = Rc::clone(&log);
            store.subscribe(move |new, old| log.borrow_mut().push((tag, old.score, new.score)));
        }
        store.update_score(30);
        assert_eq!(*log.borrow(), vec![("first", 0, 30), ("second", 0, 30)]);
    }

    #[test]
    fn test_panicking_subscriber_is_contained() {
        let mut store = store();
        let hits = Rc::new(RefCell::new(0));
        store.subscribe(|_, _| panic!("subscriber failure"));
        let sink = Rc::clone(&hits);
        store.subscribe(move |_, _| *sink.borrow_mut() += 1);

        store.update_score(10);
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(store.state().score, 10);
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = store();
        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        let id = store.subscribe(move |_, _| *sink.borrow_mut() += 1);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.update_score(10);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_undo_returns_previous_write_and_redo_restores() {
        let mut store = store();
        for _ in 0..5 {
            store.update_score(10);
        }
        assert_eq!(store.history_index(), Some(4));

        assert!(store.undo());
        assert_eq!(store.state().score, 40);
        assert!(store.redo());
        assert_eq!(store.state().score, 50);
        assert!(!store.redo());
    }

    #[test]
    fn test_undo_passes_true_old_state() {
        let mut store = store();
        store.update_score(10);
        store.update_score(10);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |new, old| sink.borrow_mut().push((old.score, new.score)));

        store.undo();
        store.redo();
        assert_eq!(*seen.borrow(), vec![(20, 10), (10, 20)]);
    }

    #[test]
    fn test_invalid_placement_is_silent() {
        let mut store = store();
        assert!(store.place_letter('A', Position::new(7, 0)));
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        store.subscribe(move |_, _| *sink.borrow_mut() += 1);

        assert!(!store.place_letter('B', Position::new(7, 0)));
        assert!(!store.place_letter('B', Position::new(8, 0)));
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(store.history_len(), 1);
        assert_eq!(store.state().grid.letter_at(7, 0), Some('A'));
        assert_eq!(store.state().letters_placed, 1);
    }

    #[test]
    fn test_combo_tracks_max_and_floors_at_zero() {
        let mut store = store();
        store.update_combo(2);
        store.update_combo(1);
        store.reset_combo();
        store.update_combo(-4);
        assert_eq!(store.state().combo, 0);
        assert_eq!(store.state().max_combo, 3);
    }

    #[test]
    fn test_queue_batch_and_pop() {
        let mut store = store();
        store.push_letters(['D', 'O', 'G']);
        assert_eq!(store.history_len(), 1);
        assert_eq!(store.take_next_letter(), Some('D'));
        assert_eq!(store.state().upcoming(5).collect::<String>(), "OG");

        let mut empty = StateContainer::default();
        assert_eq!(empty.take_next_letter(), None);
        assert_eq!(empty.history_len(), 0);
    }

    #[test]
    fn test_lifecycle_flags() {
        let mut store = store();
        store.start_game(1_000);
        assert_eq!(store.status(), GameStatus::Playing);
        assert_eq!(store.state().started_at_ms, Some(1_000));

        assert!(store.pause_game());
        assert_eq!(store.status(), GameStatus::Paused);
        assert_eq!(store.state().ui.current_screen, Screen::Pause);
        assert!(!store.pause_game());
        assert_eq!(store.status(), GameStatus::Playing);

        assert_eq!(store.level_up(), 2);
        assert!(store.state().ui.show_level_up);
        store.acknowledge_level_up();
        assert!(!store.state().ui.show_level_up);

        store.end_game();
        assert_eq!(store.status(), GameStatus::GameOver);
        assert!(store.state().ui.show_game_over);
    }

    #[test]
    fn test_reset_clears_history_in_one_notification() {
        let mut store = store();
        store.start_game(0);
        store.update_score(30);
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        store.subscribe(move |_, _| *sink.borrow_mut() += 1);

        store.reset();
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(store.history_index(), None);
        assert_eq!(store.history_len(), 0);
        assert_eq!(*store.state(), GameState::new(8, 8));
        assert!(!store.undo());
    }

    #[test]
    fn test_export_import() {
        let mut source = store();
        source.place_letter('C', Position::new(7, 2));
        source.update_score(30);
        let json = source.export();

        let mut target = store();
        assert!(target.import(&json));
        assert_eq!(target.state().score, 30);
        assert_eq!(target.state().grid.letter_at(7, 2), Some('C'));
        assert!(target.undo());
        assert_eq!(target.state().score, 0);
    }

    #[test]
    fn test_stored_letters_survive_export_import() {
        let mut source = store();
        assert!(!source.set_falling_letter(Some(FallingLetter::new('É', 1))));
        assert_eq!(source.state().falling_letter, None);
        assert_eq!(source.history_len(), 0);

        assert!(source.set_falling_letter(Some(FallingLetter::new('q', 1))));
        source.push_letters(['x', 'É', '7', 'Y']);
        assert_eq!(source.state().upcoming(5).collect::<String>(), "XY");

        let mut target = store();
        assert!(target.try_import(&source.export()).is_ok());
        assert_eq!(target.state().falling_letter.map(|f| f.letter), Some('Q'));
        assert_eq!(target.state().upcoming(5).collect::<String>(), "XY");
    }

    #[test]
    fn test_bad_import_leaves_state_untouched() {
        let mut store = store();
        store.update_score(10);
        let before = store.snapshot();
        assert!(!store.import("{broken"));
        assert!(matches!(
            store.try_import(&StateContainer::new(GameState::new(4, 4)).export()),
            Err(SnapshotError::GridShape { .. })
        ));
        assert_eq!(*store.state(), before);
        assert_eq!(store.history_len(), 1);
    }

    #[test]
    fn test_stats() {
        let mut store = store();
        store.add_word("dog");
        store.update_score(30);
        store.update_combo(1);
        let stats = store.stats();
        assert_eq!(stats.words_found, 1);
        assert_eq!(stats.words_completed, 1);
        assert_eq!(stats.score, 30);
        assert_eq!(stats.max_combo, 1);
        assert_eq!(store.state().words_found, vec!["DOG".to_string()]);
    }
}
