//! Composition root: one engine plus the collaborators attached to it.
//!
//! Everything is passed in by the caller; nothing is reachable through
//! globals.

use std::cell::RefCell;
use std::rc::Rc;

use letter_cascade_core::{Dictionary, ListenerId};

use crate::config::{ConfigError, EngineConfig};
use crate::engine::Engine;
use crate::ports::{wire_audio, wire_particles, AudioSink, ParticleSink, Renderer};

/// A wired-up game session
#[derive(Debug)]
pub struct GameApp {
    engine: Engine,
    collaborators: Vec<(&'static str, ListenerId)>,
}

impl GameApp {
    pub fn new(config: EngineConfig, dictionary: Dictionary) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: Engine::new(config, dictionary)?,
            collaborators: Vec::new(),
        })
    }

    /// Install the renderer chosen at startup
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> anyhow::Result<Self> {
        self.engine.inject_renderer(renderer)?;
        Ok(self)
    }

    pub fn with_audio<A: AudioSink + 'static>(mut self, sink: Rc<RefCell<A>>) -> Self {
        let ids = wire_audio(self.engine.bus_mut(), sink);
        self.collaborators.extend(ids.into_iter().map(|id| ("audio", id)));
        self
    }

    pub fn with_particles<P: ParticleSink + 'static>(mut self, sink: Rc<RefCell<P>>) -> Self {
        let ids = wire_particles(self.engine.bus_mut(), sink);
        self.collaborators
            .extend(ids.into_iter().map(|id| ("particles", id)));
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Number of listener registrations made for audio/particle collaborators
    pub fn collaborator_count(&self) -> usize {
        self.collaborators.len()
    }

    /// Advance one frame
    pub fn frame(&mut self, elapsed_ms: u32) -> bool {
        self.engine.tick(elapsed_ms)
    }

    /// Tear down the renderer and every bus listener
    pub fn shutdown(mut self) -> Engine {
        self.engine.dispose();
        self.engine.bus_mut().remove_all_listeners(None);
        self.collaborators.clear();
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnPolicy;
    use crate::ports::{ParticleOptions, Sound};
    use letter_cascade_types::{GameCommand, TICK_MS};

    #[derive(Default)]
    struct Sounds(Vec<Sound>);

    impl AudioSink for Sounds {
        fn play(&mut self, sound: Sound) {
            self.0.push(sound);
        }
    }

    #[derive(Default)]
    struct Sparks(usize);

    impl ParticleSink for Sparks {
        fn spawn_particle(&mut self, _options: ParticleOptions) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_collaborators_hear_gameplay() {
        let config = EngineConfig {
            spawn: SpawnPolicy::Center,
            ..EngineConfig::default()
        };
        let sounds = Rc::new(RefCell::new(Sounds::default()));
        let sparks = Rc::new(RefCell::new(Sparks::default()));
        let mut app = GameApp::new(config, Dictionary::from_words(["DOG"]))
            .unwrap()
            .with_audio(Rc::clone(&sounds))
            .with_particles(Rc::clone(&sparks));
        assert_eq!(app.collaborator_count(), 5);

        app.engine_mut().set_letter_queue("GOD".chars());
        app.engine_mut().start();
        for _ in 0..3 {
            app.frame(TICK_MS);
            app.engine_mut().send(GameCommand::Drop);
        }

        assert_eq!(
            sounds.borrow().0,
            vec![
                Sound::LetterPlaced,
                Sound::LetterPlaced,
                Sound::LetterPlaced,
                Sound::WordComplete
            ]
        );
        assert_eq!(sparks.borrow().0, 4);

        let engine = app.shutdown();
        assert!(engine.bus().event_names().is_empty());
    }
}
