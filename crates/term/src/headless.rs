//! HeadlessRenderer: renders frames off-screen and logs them.
//!
//! Used for `--headless` runs and tests. Frames are built with the same
//! [`GameView`] as the terminal renderer; a frame is only logged when the
//! visible game state changed since the last logged one.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use anyhow::Result;
use tracing::{debug, info, trace};

use crate::core::GameState;
use crate::engine::Renderer;
use crate::fb::FrameBuffer;
use crate::game_view::{GameView, Viewport};

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    view: GameView,
    viewport: Viewport,
    frame: FrameBuffer,
    last_fingerprint: Option<u64>,
    frames_rendered: u64,
    frames_logged: u64,
    active: bool,
}

impl HeadlessRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn frames_logged(&self) -> u64 {
        self.frames_logged
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Renderer for HeadlessRenderer {
    fn init(&mut self) -> Result<()> {
        self.active = true;
        self.last_fingerprint = None;
        info!(
            width = self.viewport.width,
            height = self.viewport.height,
            "headless renderer ready"
        );
        Ok(())
    }

    fn render(&mut self, state: &GameState) -> Result<()> {
        self.view.render_into(state, self.viewport, &mut self.frame);
        self.frames_rendered += 1;

        let print = fingerprint(state);
        if self.last_fingerprint == Some(print) {
            return Ok(());
        }
        self.last_fingerprint = Some(print);
        self.frames_logged += 1;

        debug!(
            frame = self.frames_rendered,
            status = state.status().as_str(),
            score = state.score,
            level = state.level,
            letters = state.letters_placed,
            "frame"
        );
        trace!("\n{}", self.frame.to_text());
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.viewport = Viewport::new(width, height);
        self.last_fingerprint = None;
        Ok(())
    }

    fn dispose(&mut self) -> Result<()> {
        self.active = false;
        info!(
            rendered = self.frames_rendered,
            logged = self.frames_logged,
            "headless renderer disposed"
        );
        Ok(())
    }
}

/// Hash of everything the view draws that can change between ticks.
fn fingerprint(state: &GameState) -> u64 {
    let mut hasher = DefaultHasher::new();
    state.status().hash(&mut hasher);
    state.score.hash(&mut hasher);
    state.level.hash(&mut hasher);
    state.combo.hash(&mut hasher);
    state.letters_placed.hash(&mut hasher);
    state.words_completed.hash(&mut hasher);
    state.falling_letter.hash(&mut hasher);
    state.ui.show_level_up.hash(&mut hasher);
    state.upcoming(crate::game_view::PREVIEW_LEN).for_each(|c| c.hash(&mut hasher));
    hasher.finish()
}
