//! Collaborator ports - the interfaces the engine calls out through
//!
//! - [`Renderer`]: draws a read-only state snapshot once per tick
//! - [`AudioSink`]: plays named sounds in reaction to domain events
//! - [`ParticleSink`]: spawns visual effects in reaction to domain events
//!
//! Audio and particle collaborators are attached to the event bus with
//! [`wire_audio`] / [`wire_particles`]; the engine never waits on them and
//! never reads anything back.

use std::cell::RefCell;
use std::rc::Rc;

use letter_cascade_core::{names, EventBus, GameEvent, GameState, ListenerId};
use letter_cascade_types::Position;

/// Presentation backend driven by the engine
pub trait Renderer {
    /// Acquire output resources; called once before the first frame
    fn init(&mut self) -> anyhow::Result<()>;

    /// Draw one frame; must not retain or mutate the state
    fn render(&mut self, state: &GameState) -> anyhow::Result<()>;

    /// Output surface changed size
    fn resize(&mut self, width: u16, height: u16) -> anyhow::Result<()>;

    /// Release output resources
    fn dispose(&mut self) -> anyhow::Result<()>;
}

/// Sounds the game asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    WordComplete,
    LevelUp,
    LetterPlaced,
}

impl Sound {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sound::WordComplete => "wordComplete",
            Sound::LevelUp => "levelUp",
            Sound::LetterPlaced => "letterPlaced",
        }
    }
}

pub trait AudioSink {
    fn play(&mut self, sound: Sound);
}

/// Visual effect request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleOptions {
    pub kind: &'static str,
    pub position: Position,
    pub color: &'static str,
}

pub trait ParticleSink {
    fn spawn_particle(&mut self, options: ParticleOptions);
}

/// Subscribe `sink` to word, level and placement events
pub fn wire_audio<A>(bus: &mut EventBus<GameEvent>, sink: Rc<RefCell<A>>) -> Vec<ListenerId>
where
    A: AudioSink + 'static,
{
    [
        (names::WORD_FOUND, Sound::WordComplete),
        (names::LEVEL_UP, Sound::LevelUp),
        (names::LETTER_PLACED, Sound::LetterPlaced),
    ]
    .into_iter()
    .map(|(event, sound)| {
        let sink = Rc::clone(&sink);
        bus.on(event, move |_| sink.borrow_mut().play(sound))
    })
    .collect()
}

/// Subscribe `sink` to word and placement events
pub fn wire_particles<P>(bus: &mut EventBus<GameEvent>, sink: Rc<RefCell<P>>) -> Vec<ListenerId>
where
    P: ParticleSink + 'static,
{
    let words = Rc::clone(&sink);
    let word_id = bus.on_word_found(move |event| {
        if let GameEvent::WordFound { word, .. } = event {
            words.borrow_mut().spawn_particle(ParticleOptions {
                kind: "wordComplete",
                position: word.start,
                color: "#ffd93d",
            });
        }
    });

    let placed_id = bus.on_letter_placed(move |event| {
        if let GameEvent::LetterPlaced { row, col, .. } = *event {
            sink.borrow_mut().spawn_particle(ParticleOptions {
                kind: "letterPlaced",
                position: Position::new(row, col),
                color: "#ffffff",
            });
        }
    });

    vec![word_id, placed_id]
}

#[cfg(test)]
mod tests {
    use super::*;
    use letter_cascade_types::{Direction, WordMatch};

    #[derive(Default)]
    struct RecordingAudio(Vec<Sound>);

    impl AudioSink for RecordingAudio {
        fn play(&mut self, sound: Sound) {
            self.0.push(sound);
        }
    }

    #[derive(Default)]
    struct RecordingParticles(Vec<ParticleOptions>);

    impl ParticleSink for RecordingParticles {
        fn spawn_particle(&mut self, options: ParticleOptions) {
            self.0.push(options);
        }
    }

    #[test]
    fn test_audio_reacts_to_domain_events() {
        let mut bus = EventBus::new();
        let audio = Rc::new(RefCell::new(RecordingAudio::default()));
        let ids = wire_audio(&mut bus, Rc::clone(&audio));
        assert_eq!(ids.len(), 3);

        bus.emit_letter_placed('A', 7, 0);
        bus.emit_level_up(2);
        bus.emit_game_start();
        assert_eq!(audio.borrow().0, vec![Sound::LetterPlaced, Sound::LevelUp]);

        for id in ids {
            bus.off(names::LETTER_PLACED, id);
        }
        bus.emit_letter_placed('B', 7, 1);
        assert_eq!(audio.borrow().0.len(), 2);
    }

    #[test]
    fn test_particles_follow_word_start() {
        let mut bus = EventBus::new();
        let particles = Rc::new(RefCell::new(RecordingParticles::default()));
        wire_particles(&mut bus, Rc::clone(&particles));

        bus.emit_word_found(
            WordMatch::new("DOG", Position::new(5, 3), Direction::Vertical),
            30,
        );
        let spawned = &particles.borrow().0;
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].kind, "wordComplete");
        assert_eq!(spawned[0].position, Position::new(5, 3));
    }
}
