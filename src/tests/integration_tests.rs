#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use bevy_ecs::prelude::*;

    use crate::components::{GameState, Screen, Target};
    use crate::store::BestScore;
    use crate::systems;
    use crate::tests::test_utils::create_test_world;

    const STEP_MS: u64 = 10;

    fn live_targets(world: &mut World) -> Vec<Entity> {
        world
            .query::<(Entity, &Target)>()
            .iter(world)
            .filter(|(_, target)| target.is_live())
            .map(|(entity, _)| entity)
            .collect()
    }

    fn run_until_over(world: &mut World, limit_ms: u64) -> u64 {
        let mut elapsed = 0;
        while world.resource::<GameState>().active && elapsed < limit_ms {
            systems::run_timers(world, STEP_MS);
            elapsed += STEP_MS;
        }
        elapsed
    }

    #[test]
    fn test_idle_game_runs_out() {
        let mut world = create_test_world();
        systems::start_game(&mut world);

        let elapsed = run_until_over(&mut world, 60_000);

        // Five seconds of countdown after the one second "Get Ready", misses only shorten it
        assert!(elapsed <= 6_000, "game lasted {elapsed}ms");
        assert_eq!(*world.resource::<Screen>(), Screen::GameOver);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.score, 0);
        assert_eq!(game_state.hits, 0);
        assert!(!game_state.new_record);
        assert_eq!(world.resource::<BestScore>().value(), 0);
    }

    #[test]
    fn test_perfect_player_keeps_going_then_runs_out() {
        let mut world = create_test_world();
        systems::start_game(&mut world);

        // Hit everything for 20 seconds
        let mut elapsed = 0;
        while elapsed < 20_000 {
            systems::run_timers(&mut world, STEP_MS);
            elapsed += STEP_MS;
            for entity in live_targets(&mut world) {
                assert!(systems::hit_target(&mut world, entity));
            }
        }

        let (score, level, hits) = {
            let game_state = world.resource::<GameState>();
            assert!(game_state.active, "perfect play should keep the clock alive");
            assert_eq!(game_state.misses, 0);
            (game_state.score, game_state.level, game_state.hits)
        };
        assert!(hits > 20);
        assert!(level > 1);
        assert!(score > 0);

        // Then stop playing
        run_until_over(&mut world, 30_000);

        assert_eq!(*world.resource::<Screen>(), Screen::GameOver);
        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.score, score);
        assert!(game_state.new_record);
        assert_eq!(world.resource::<BestScore>().value(), score);
        assert_eq!(live_targets(&mut world).len(), 0);
    }

    #[test]
    fn test_replay_after_game_over() {
        let mut world = create_test_world();
        systems::start_game(&mut world);
        run_until_over(&mut world, 60_000);

        systems::start_game(&mut world);
        systems::run_timers(&mut world, 1_000);

        let game_state = world.resource::<GameState>();
        assert!(game_state.active);
        assert_eq!(game_state.time_left_tenths, 50);
        assert_eq!(game_state.score, 0);
        assert_eq!(*world.resource::<Screen>(), Screen::Playing);
    }
}
