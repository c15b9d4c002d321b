//! Event bus module - named publish/subscribe with one-shot listeners
//!
//! `EventBus<T>` maps an event name to two ordered listener lists: persistent
//! listeners registered with `on`, and one-shot listeners registered with
//! `once`. `emit` calls the persistent listeners in registration order, then
//! takes the one-shot list for that name and calls each of those exactly once.
//! Every invocation is guarded: a panicking listener is logged and the rest
//! still run.
//!
//! The game itself uses `EventBus<GameEvent>`; the `on_*` / `emit_*` helpers on
//! that instantiation only fix the event name and payload shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dispatch::guarded;
use crate::types::{GameCommand, GameOverReason, WordMatch};

/// Event names used by the game
pub mod names {
    pub const GAME_START: &str = "gameStart";
    pub const GAME_PAUSE: &str = "gamePause";
    pub const GAME_RESUME: &str = "gameResume";
    pub const GAME_END: &str = "gameEnd";
    pub const GAME_RESET: &str = "gameReset";
    pub const LETTER_SPAWNED: &str = "letterSpawned";
    pub const LETTER_PLACED: &str = "letterPlaced";
    pub const WORD_FOUND: &str = "wordFound";
    pub const SCORE_UPDATE: &str = "scoreUpdate";
    pub const COMBO_UPDATE: &str = "comboUpdate";
    pub const LEVEL_UP: &str = "levelUp";
    pub const KEY_PRESS: &str = "keyPress";
    pub const MOUSE_CLICK: &str = "mouseClick";
}

/// Payload carried by game events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    GameStart,
    GamePause,
    GameResume,
    GameEnd { score: u32, reason: GameOverReason },
    GameReset,
    LetterSpawned { letter: char, col: usize },
    LetterPlaced { letter: char, row: usize, col: usize },
    WordFound { word: WordMatch, score: u32 },
    ScoreUpdate { score: u32, points: u32 },
    ComboUpdate { combo: u32 },
    LevelUp { level: u32 },
    /// An abstract command from an input adapter
    KeyPress { command: GameCommand },
    /// A pointer click on a grid column
    MouseClick { col: usize },
}

/// Handle identifying one registration, used to remove it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;
type Registry<T> = HashMap<String, Vec<(ListenerId, Listener<T>)>>;

/// Named event dispatcher
pub struct EventBus<T> {
    persistent: Registry<T>,
    once: Registry<T>,
    next_id: u64,
}

impl<T> EventBus<T> {
    pub fn new() -> Self {
        Self {
            persistent: HashMap::new(),
            once: HashMap::new(),
            next_id: 0,
        }
    }

    fn allocate(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    /// Register a listener called on every emission of `event`
    pub fn on(&mut self, event: &str, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = self.allocate();
        self.persistent
            .entry(event.to_owned())
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Register a listener called on the next emission of `event` only
    pub fn once(&mut self, event: &str, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = self.allocate();
        self.once
            .entry(event.to_owned())
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a registration from both registries. Returns whether it existed.
    pub fn off(&mut self, event: &str, id: ListenerId) -> bool {
        let mut removed = false;
        for registry in [&mut self.persistent, &mut self.once] {
            if let Some(list) = registry.get_mut(event) {
                let before = list.len();
                list.retain(|(lid, _)| *lid != id);
                removed |= list.len() != before;
                if list.is_empty() {
                    registry.remove(event);
                }
            }
        }
        removed
    }

    /// Deliver `data` to every listener of `event`; returns how many listeners
    /// completed without panicking.
    pub fn emit(&mut self, event: &str, data: &T) -> usize {
        let mut delivered = 0;
        if let Some(list) = self.persistent.get_mut(event) {
            for (_, listener) in list.iter_mut() {
                if guarded("event", event, || listener(data)) {
                    delivered += 1;
                }
            }
        }

        // Taken before the calls so each one-shot fires exactly once.
        let pending = self.once.remove(event).unwrap_or_default();
        for (_, mut listener) in pending {
            if guarded("event", event, || listener(data)) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Clear one event's registries, or every registry when `event` is `None`
    pub fn remove_all_listeners(&mut self, event: Option<&str>) {
        match event {
            Some(name) => {
                self.persistent.remove(name);
                self.once.remove(name);
            }
            None => {
                self.persistent.clear();
                self.once.clear();
            }
        }
    }

    /// Registered listeners (persistent and pending one-shot) for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        let count = |registry: &Registry<T>| registry.get(event).map_or(0, Vec::len);
        count(&self.persistent) + count(&self.once)
    }

    /// Names with at least one registered listener, sorted
    pub fn event_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .persistent
            .keys()
            .chain(self.once.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.event_names())
            .finish()
    }
}

impl EventBus<GameEvent> {
    pub fn on_game_start(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::GAME_START, f)
    }

    pub fn on_game_pause(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::GAME_PAUSE, f)
    }

    pub fn on_game_resume(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::GAME_RESUME, f)
    }

    pub fn on_game_end(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::GAME_END, f)
    }

    pub fn on_game_reset(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::GAME_RESET, f)
    }

    pub fn on_letter_spawned(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::LETTER_SPAWNED, f)
    }

    pub fn on_letter_placed(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::LETTER_PLACED, f)
    }

    pub fn on_word_found(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::WORD_FOUND, f)
    }

    pub fn on_score_update(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::SCORE_UPDATE, f)
    }

    pub fn on_combo_update(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::COMBO_UPDATE, f)
    }

    pub fn on_level_up(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::LEVEL_UP, f)
    }

    pub fn on_key_press(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::KEY_PRESS, f)
    }

    pub fn on_mouse_click(&mut self, f: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.on(names::MOUSE_CLICK, f)
    }

    pub fn emit_game_start(&mut self) {
        self.emit(names::GAME_START, &GameEvent::GameStart);
    }

    pub fn emit_game_pause(&mut self) {
        self.emit(names::GAME_PAUSE, &GameEvent::GamePause);
    }

    pub fn emit_game_resume(&mut self) {
        self.emit(names::GAME_RESUME, &GameEvent::GameResume);
    }

    pub fn emit_game_end(&mut self, score: u32, reason: GameOverReason) {
        self.emit(names::GAME_END, &GameEvent::GameEnd { score, reason });
    }

    pub fn emit_game_reset(&mut self) {
        self.emit(names::GAME_RESET, &GameEvent::GameReset);
    }

    pub fn emit_letter_spawned(&mut self, letter: char, col: usize) {
        self.emit(names::LETTER_SPAWNED, &GameEvent::LetterSpawned { letter, col });
    }

    pub fn emit_letter_placed(&mut self, letter: char, row: usize, col: usize) {
        self.emit(
            names::LETTER_PLACED,
            &GameEvent::LetterPlaced { letter, row, col },
        );
    }

    pub fn emit_word_found(&mut self, word: WordMatch, score: u32) {
        self.emit(names::WORD_FOUND, &GameEvent::WordFound { word, score });
    }

    pub fn emit_score_update(&mut self, score: u32, points: u32) {
        self.emit(names::SCORE_UPDATE, &GameEvent::ScoreUpdate { score, points });
    }

    pub fn emit_combo_update(&mut self, combo: u32) {
        self.emit(names::COMBO_UPDATE, &GameEvent::ComboUpdate { combo });
    }

    pub fn emit_level_up(&mut self, level: u32) {
        self.emit(names::LEVEL_UP, &GameEvent::LevelUp { level });
    }

    pub fn emit_key_press(&mut self, command: GameCommand) {
        self.emit(names::KEY_PRESS, &GameEvent::KeyPress { command });
    }

    pub fn emit_mouse_click(&mut self, col: usize) {
        self.emit(names::MOUSE_CLICK, &GameEvent::MouseClick { col });
    }
}
