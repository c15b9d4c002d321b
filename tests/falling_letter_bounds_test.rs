//! Property: steering never moves the falling letter off the grid

use proptest::prelude::*;

use letter_cascade::core::Dictionary;
use letter_cascade::engine::{Engine, EngineConfig, SpawnPolicy};
use letter_cascade::types::{GameCommand, TICK_MS};

fn arb_move() -> impl Strategy<Value = GameCommand> {
    prop_oneof![Just(GameCommand::MoveLeft), Just(GameCommand::MoveRight)]
}

proptest! {
    #[test]
    fn prop_column_stays_in_bounds(
        columns in 1usize..12,
        spawn in 0usize..12,
        moves in prop::collection::vec(arb_move(), 0..200),
    ) {
        let config = EngineConfig {
            columns,
            spawn: SpawnPolicy::Fixed(spawn % columns),
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(config, Dictionary::new()).unwrap();
        engine.start();
        engine.tick(TICK_MS);

        for command in moves {
            engine.send(command);
            let falling = engine.state().falling_letter;
            prop_assert!(falling.is_some());
            prop_assert!(falling.unwrap().col < columns);
        }
    }

    #[test]
    fn prop_clicks_stay_in_bounds(
        columns in 1usize..12,
        targets in prop::collection::vec(0usize..32, 0..50),
    ) {
        let config = EngineConfig {
            columns,
            spawn: SpawnPolicy::Center,
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(config, Dictionary::new()).unwrap();
        engine.start();
        engine.tick(TICK_MS);

        for col in targets {
            engine.click(col);
            let falling = engine.state().falling_letter.unwrap();
            prop_assert!(falling.col < columns);
        }
    }
}
