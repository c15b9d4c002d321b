//! Terminal rendering module - framebuffer renderers for the letter grid
//!
//! A small, game-oriented rendering layer. It avoids widget/layout crates and
//! renders into a plain framebuffer that a backend flushes:
//!
//! - [`TerminalRenderer`]: crossterm backend with diffed redraws
//! - [`HeadlessRenderer`]: off-screen frames logged through `tracing`
//!
//! Both implement the engine's [`Renderer`](crate::engine::Renderer) port.
//! Exactly one is active per session, picked with [`create_renderer`].

pub mod fb;
pub mod game_view;
pub mod headless;
pub mod renderer;

pub use letter_cascade_core as core;
pub use letter_cascade_engine as engine;
pub use letter_cascade_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport, PREVIEW_LEN};
pub use headless::HeadlessRenderer;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};

use engine::Renderer;

/// Which renderer backs the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererMode {
    #[default]
    Terminal,
    Headless,
}

impl RendererMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "terminal" | "term" | "tty" => Some(RendererMode::Terminal),
            "headless" | "none" => Some(RendererMode::Headless),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RendererMode::Terminal => "terminal",
            RendererMode::Headless => "headless",
        }
    }
}

/// Build the renderer for `mode`; the engine only sees the trait object.
pub fn create_renderer(mode: RendererMode) -> Box<dyn Renderer> {
    match mode {
        RendererMode::Terminal => Box::new(TerminalRenderer::new()),
        RendererMode::Headless => Box::new(HeadlessRenderer::new(Viewport::default())),
    }
}
