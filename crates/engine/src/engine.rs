//! Engine module - the scheduled game loop
//!
//! The engine owns the state container, the event bus, the dictionary and the
//! letter generator, and is the only writer of game state. Call
//! [`Engine::tick`] once per frame with the elapsed milliseconds:
//!
//! 1. Queued input (delivered as `keyPress` / `mouseClick` events) is applied.
//! 2. While playing and no letter is falling, the next queued letter spawns at
//!    row 0 (the queue is refilled with a whole batch first when empty).
//! 3. Otherwise the fall timer accumulates; once it reaches the fall interval
//!    the letter moves down one row, or is placed if the cell below is taken
//!    or it sits on the bottom row.
//! 4. After each placement the grid is scanned; every match is scored, cleared,
//!    recorded and announced, and the level is raised once per threshold
//!    crossed.
//! 5. The renderer, if any, draws the current state.
//!
//! ```text
//! Idle --start--> Playing <--pause--> Paused
//! Playing --(grid nearly full | spawn blocked | time limit)--> GameOver
//! any --reset--> Idle
//! ```
//!
//! Illegal moves (out of bounds, occupied target, no falling letter, wrong
//! status) are silent no-ops.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, info, warn};

use letter_cascade_core::{
    find_words, level_for_score, names, word_score, Dictionary, EventBus, FallCurve,
    FallingLetter, GameEvent, GameState, LetterGenerator, LevelManager, ListenerId,
    ScoreManager, SnapshotError, StateContainer, StatePatch,
};
use letter_cascade_types::{GameCommand, GameOverReason, GameStatus};

use crate::config::{ConfigError, EngineConfig, SpawnPolicy};
use crate::ports::Renderer;

/// Input received from the bus, applied on the next drain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Command(GameCommand),
    Click(usize),
}

type Inbox = Rc<RefCell<VecDeque<Input>>>;

/// Game orchestrator
pub struct Engine {
    config: EngineConfig,
    store: StateContainer,
    bus: EventBus<GameEvent>,
    dictionary: Dictionary,
    generator: LetterGenerator,
    scores: ScoreManager,
    levels: LevelManager,
    curve: FallCurve,
    renderer: Option<Box<dyn Renderer>>,
    inbox: Inbox,
    input_listeners: Vec<(&'static str, ListenerId)>,
    fall_timer_ms: u32,
    /// Play time not yet written to the state
    pending_play_ms: u64,
}

impl Engine {
    /// Build an idle engine with a filled letter queue
    pub fn new(config: EngineConfig, dictionary: Dictionary) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut generator = LetterGenerator::new(config.seed, config.distribution);
        let curve = config.fall_curve();
        let initial = fresh_state(&config, curve, &mut generator);
        let store = StateContainer::with_history_capacity(initial, config.history_capacity);

        let mut bus = EventBus::new();
        let inbox = Inbox::default();
        let input_listeners = subscribe_inputs(&mut bus, &inbox);

        debug!(
            rows = config.rows,
            columns = config.columns,
            seed = config.seed,
            words = dictionary.len(),
            "engine created"
        );

        Ok(Self {
            config,
            store,
            bus,
            dictionary,
            generator,
            scores: ScoreManager::new(),
            levels: LevelManager::new(),
            curve,
            renderer: None,
            inbox,
            input_listeners,
            fall_timer_ms: 0,
            pending_play_ms: 0,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view of the live state
    pub fn state(&self) -> &GameState {
        self.store.state()
    }

    pub fn store(&self) -> &StateContainer {
        &self.store
    }

    pub fn status(&self) -> GameStatus {
        self.store.status()
    }

    pub fn bus(&self) -> &EventBus<GameEvent> {
        &self.bus
    }

    /// The event bus, for collaborators to subscribe and for input adapters to emit
    pub fn bus_mut(&mut self) -> &mut EventBus<GameEvent> {
        &mut self.bus
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    pub fn score(&self) -> u32 {
        self.scores.score()
    }

    pub fn level(&self) -> u32 {
        self.levels.level()
    }

    // === Lifecycle ===

    /// Idle -> Playing. Returns false in any other status.
    pub fn start(&mut self) -> bool {
        if self.status() != GameStatus::Idle {
            debug!(status = self.status().as_str(), "start ignored");
            return false;
        }
        self.fall_timer_ms = 0;
        self.pending_play_ms = 0;
        self.store.start_game(chrono::Utc::now().timestamp_millis());
        info!(seed = self.config.seed, "game started");
        self.bus.emit_game_start();
        true
    }

    /// Toggle Playing <-> Paused. Returns false in any other status.
    pub fn pause(&mut self) -> bool {
        if !matches!(self.status(), GameStatus::Playing | GameStatus::Paused) {
            return false;
        }
        self.flush_play_time();
        if self.store.pause_game() {
            info!("game paused");
            self.bus.emit_game_pause();
        } else {
            info!("game resumed");
            self.bus.emit_game_resume();
        }
        true
    }

    /// Any status -> Idle, with a fresh grid, queue, score, level and fall speed.
    ///
    /// The state is replaced in a single write and undo history is cleared.
    pub fn reset(&mut self) {
        self.scores.reset();
        self.levels.reset();
        self.fall_timer_ms = 0;
        self.pending_play_ms = 0;
        let fresh = fresh_state(&self.config, self.curve, &mut self.generator);
        self.store.reset_to(fresh);
        info!("game reset");
        self.bus.emit_game_reset();
    }

    // === Scheduling ===

    /// Advance the game by `elapsed_ms`; returns true if game state changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let mut changed = self.process_inputs();
        if self.status() == GameStatus::Playing {
            changed |= self.step(elapsed_ms);
        }
        self.render();
        changed
    }

    fn step(&mut self, elapsed_ms: u32) -> bool {
        self.pending_play_ms += u64::from(elapsed_ms);
        if let Some(limit) = self.config.time_limit_ms {
            if self.state().play_time_ms + self.pending_play_ms >= limit {
                self.game_over(GameOverReason::TimeLimit);
                return true;
            }
        }

        let Some(falling) = self.state().falling_letter else {
            return self.spawn_letter();
        };

        self.fall_timer_ms = self.fall_timer_ms.saturating_add(elapsed_ms);
        if self.fall_timer_ms < self.state().fall_speed_ms {
            return false;
        }
        self.fall_timer_ms = 0;

        if falling.can_descend(&self.state().grid) {
            let play_time_ms = self.take_play_time();
            self.store.set_state(StatePatch {
                falling_letter: Some(Some(falling.descended())),
                play_time_ms: Some(play_time_ms),
                ..Default::default()
            });
        } else {
            self.commit(falling);
        }
        true
    }

    fn spawn_letter(&mut self) -> bool {
        if self.state().letter_queue.is_empty() {
            let batch = self.generator.batch(self.config.refill_batch);
            debug!(count = batch.len(), "refilling letter queue");
            self.store.push_letters(batch);
        }
        let Some(letter) = self.store.take_next_letter() else {
            return false;
        };

        let col = self.spawn_column();
        if !self.state().grid.is_free(0, col) {
            self.game_over(GameOverReason::SpawnBlocked);
            return true;
        }

        self.store.acknowledge_level_up();
        self.store.set_falling_letter(Some(FallingLetter::new(letter, col)));
        self.fall_timer_ms = 0;
        debug!(%letter, col, "letter spawned");
        self.bus.emit_letter_spawned(letter, col);
        true
    }

    fn spawn_column(&mut self) -> usize {
        let last = self.config.columns - 1;
        match self.config.spawn {
            SpawnPolicy::Random => self.generator.pick(self.config.columns),
            SpawnPolicy::Center => last / 2,
            SpawnPolicy::Fixed(col) => col.min(last),
        }
    }

    /// Write the falling letter into the grid and resolve the consequences
    fn commit(&mut self, falling: FallingLetter) {
        let at = falling.position();
        self.store.set_falling_letter(None);
        if !self.store.place_letter(falling.letter, at) {
            warn!(row = at.row, col = at.col, "falling letter over an occupied cell");
            return;
        }
        debug!(letter = %falling.letter, row = at.row, col = at.col, "letter placed");
        self.bus.emit_letter_placed(falling.letter, at.row, at.col);

        self.resolve_words();
        self.flush_play_time();

        if self.state().grid.is_nearly_full(self.config.nearly_full_percent) {
            self.game_over(GameOverReason::GridFull);
        }
    }

    /// Score and clear every word on the grid; returns how many were found
    fn resolve_words(&mut self) -> usize {
        let found = find_words(&self.state().grid, &self.dictionary);
        if found.is_empty() {
            if self.state().combo > 0 {
                self.store.reset_combo();
                self.bus.emit_combo_update(0);
            }
            return 0;
        }

        for word in &found {
            let points = word_score(&word.word);
            self.scores.add_points(points);
            self.store.update_score(points);
            self.store.clear_word(word);
            self.store.add_word(&word.word);
            info!(
                word = %word.word,
                points,
                direction = word.direction.as_str(),
                "word found"
            );
            self.bus.emit_word_found(word.clone(), points);
            self.bus.emit_score_update(self.scores.score(), points);
            self.check_level_up();
        }

        self.store
            .update_combo(i32::try_from(found.len()).unwrap_or(i32::MAX));
        self.bus.emit_combo_update(self.state().combo);
        found.len()
    }

    /// Raise the level once per threshold crossed, then retune the fall speed
    fn check_level_up(&mut self) {
        let target = level_for_score(self.scores.score(), self.config.points_per_level);
        if target <= self.levels.level() {
            return;
        }
        while self.levels.level() < target {
            self.levels.next_level();
            let level = self.store.level_up();
            info!(level, "level up");
            self.bus.emit_level_up(level);
        }
        self.store
            .set_fall_speed(self.curve.interval_ms(self.levels.level()));
    }

    fn game_over(&mut self, reason: GameOverReason) {
        self.flush_play_time();
        self.store.end_game();
        let score = self.scores.score();
        info!(reason = reason.as_str(), score, "game over");
        self.bus.emit_game_end(score, reason);
    }

    fn take_play_time(&mut self) -> u64 {
        let total = self.state().play_time_ms + self.pending_play_ms;
        self.pending_play_ms = 0;
        total
    }

    fn flush_play_time(&mut self) {
        if self.pending_play_ms > 0 {
            let pending = std::mem::take(&mut self.pending_play_ms);
            self.store.add_play_time(pending);
        }
    }

    // === Input ===

    /// Apply one command directly; returns whether anything changed
    pub fn handle_command(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::MoveLeft => self.shift(false),
            GameCommand::MoveRight => self.shift(true),
            GameCommand::Drop => self.hard_drop(),
            GameCommand::Pause => self.pause(),
            GameCommand::Start => self.start(),
            GameCommand::Reset => {
                self.reset();
                true
            }
        }
    }

    /// Emit `command` as a `keyPress` event and apply everything queued
    pub fn send(&mut self, command: GameCommand) -> bool {
        self.bus.emit_key_press(command);
        self.process_inputs()
    }

    /// Emit a `mouseClick` on `col` and apply everything queued
    pub fn click(&mut self, col: usize) -> bool {
        self.bus.emit_mouse_click(col);
        self.process_inputs()
    }

    fn process_inputs(&mut self) -> bool {
        let mut changed = false;
        loop {
            let next = self.inbox.borrow_mut().pop_front();
            let Some(input) = next else {
                break;
            };
            changed |= match input {
                Input::Command(command) => self.handle_command(command),
                Input::Click(col) => self.steer_to(col),
            };
        }
        changed
    }

    /// The falling letter, if input may currently move it
    fn active_letter(&self) -> Option<FallingLetter> {
        if self.status() != GameStatus::Playing {
            return None;
        }
        self.state().falling_letter
    }

    fn shift(&mut self, right: bool) -> bool {
        let Some(falling) = self.active_letter() else {
            return false;
        };
        let Some(moved) = falling.shifted(&self.state().grid, right) else {
            return false;
        };
        self.store.set_falling_letter(Some(moved));
        true
    }

    /// Move straight down to the lowest free cell and place immediately
    fn hard_drop(&mut self) -> bool {
        let Some(falling) = self.active_letter() else {
            return false;
        };
        let landed = FallingLetter {
            row: falling.landing_row(&self.state().grid),
            ..falling
        };
        self.fall_timer_ms = 0;
        self.commit(landed);
        true
    }

    /// Slide the falling letter towards `col` until it arrives or is blocked
    fn steer_to(&mut self, col: usize) -> bool {
        let Some(falling) = self.active_letter() else {
            return false;
        };
        let grid = &self.state().grid;
        let mut current = falling;
        while current.col != col {
            match current.shifted(grid, col > current.col) {
                Some(next) => current = next,
                None => break,
            }
        }
        if current == falling {
            return false;
        }
        self.store.set_falling_letter(Some(current));
        true
    }

    // === History and persistence ===

    /// Undo the last state write; engine counters follow the restored state
    pub fn undo(&mut self) -> bool {
        let done = self.store.undo();
        if done {
            self.resync();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.store.redo();
        if done {
            self.resync();
        }
        done
    }

    /// Replace the contents of the letter queue in one write.
    ///
    /// Non-letters are dropped and letters upper-cased; used to load a fixed
    /// sequence for puzzles and replays.
    pub fn set_letter_queue(&mut self, letters: impl IntoIterator<Item = char>) {
        let queue = letters
            .into_iter()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        self.store.set_state(StatePatch {
            letter_queue: Some(queue),
            ..Default::default()
        });
    }

    pub fn export(&self) -> String {
        self.store.export()
    }

    pub fn try_import(&mut self, json: &str) -> Result<(), SnapshotError> {
        self.store.try_import(json)?;
        self.resync();
        Ok(())
    }

    /// Load a snapshot produced by `export`; false (state untouched) on error
    pub fn import(&mut self, json: &str) -> bool {
        let ok = self.store.import(json);
        if ok {
            self.resync();
        }
        ok
    }

    fn resync(&mut self) {
        let (score, level) = (self.state().score, self.state().level);
        self.scores.reset();
        self.scores.add_points(score);
        self.levels.reset();
        for _ in 1..level {
            self.levels.next_level();
        }
        self.fall_timer_ms = 0;
        self.pending_play_ms = 0;
    }

    // === Rendering ===

    /// Install the active renderer, initializing it first.
    ///
    /// A previously installed renderer is disposed.
    pub fn inject_renderer(&mut self, mut renderer: Box<dyn Renderer>) -> anyhow::Result<()> {
        renderer.init()?;
        if let Some(mut previous) = self.renderer.replace(renderer) {
            if let Err(err) = previous.dispose() {
                warn!(%err, "previous renderer failed to dispose");
            }
        }
        Ok(())
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if let Some(renderer) = self.renderer.as_mut() {
            if let Err(err) = renderer.resize(width, height) {
                warn!(%err, width, height, "renderer resize failed");
            }
        }
    }

    fn render(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            if let Err(err) = renderer.render(self.store.state()) {
                warn!(%err, "render failed");
            }
        }
    }

    /// Detach the renderer and the input listeners
    pub fn dispose(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            if let Err(err) = renderer.dispose() {
                warn!(%err, "renderer failed to dispose");
            }
        }
        for (event, id) in self.input_listeners.drain(..) {
            self.bus.off(event, id);
        }
        self.inbox.borrow_mut().clear();
        debug!("engine disposed");
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("status", &self.status())
            .field("score", &self.scores.score())
            .field("level", &self.levels.level())
            .field("fall_timer_ms", &self.fall_timer_ms)
            .finish()
    }
}

/// Idle state for a new session: empty grid, full queue, base fall speed
fn fresh_state(
    config: &EngineConfig,
    curve: FallCurve,
    generator: &mut LetterGenerator,
) -> GameState {
    let mut state = GameState::new(config.rows, config.columns);
    state
        .letter_queue
        .extend(generator.batch(config.refill_batch));
    state.fall_speed_ms = curve.interval_ms(1);
    state
}

/// Forward `keyPress` / `mouseClick` payloads into the engine inbox
fn subscribe_inputs(
    bus: &mut EventBus<GameEvent>,
    inbox: &Inbox,
) -> Vec<(&'static str, ListenerId)> {
    let keys = Rc::clone(inbox);
    let key_id = bus.on_key_press(move |event| {
        if let GameEvent::KeyPress { command } = event {
            keys.borrow_mut().push_back(Input::Command(*command));
        }
    });

    let clicks = Rc::clone(inbox);
    let click_id = bus.on_mouse_click(move |event| {
        if let GameEvent::MouseClick { col } = event {
            clicks.borrow_mut().push_back(Input::Click(*col));
        }
    });

    vec![(names::KEY_PRESS, key_id), (names::MOUSE_CLICK, click_id)]
}
