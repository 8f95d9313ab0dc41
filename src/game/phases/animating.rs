//! Time passes while the player waits on their cooldown

use super::{DungeonPhase, Phase, PhaseHandler, PhaseKind, Transition};
use crate::game::{Event, Game, Key};

/// Ticks run projectiles and monsters until the player may act again
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimatingPhase;

impl PhaseHandler for AnimatingPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Animating
    }

    fn handle_event(&mut self, game: &mut Game, event: Event) -> Transition {
        match event {
            Event::Tick => {
                game.tick();
                game.advance_projectiles();
                if game.registry.has_projectiles() {
                    return Transition::Stay;
                }

                game.run_monsters();
                if game.player_ready() {
                    game.refresh_fov();
                    return Transition::To(Phase::Dungeon(DungeonPhase));
                }
                Transition::Stay
            }
            Event::Key(Key::Char('q')) | Event::Key(Key::Char('Q')) => {
                game.stop();
                Transition::Stay
            }
            Event::Key(key) => {
                // Single slot: a newer key replaces an older one
                game.buffered = Some(key);
                Transition::Stay
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::tests::{arena, arena_with, content};
    use crate::world::Position;

    #[test]
    fn test_monsters_move_while_player_waits() {
        let mut game = arena_with(content().with_ai("monsters/rat.lua", (-1, 0)));
        let rat = game.spawn_monster(Position::new(8, 3), "monsters/rat.lua").unwrap();
        game.registry.stats.get_mut(&rat).unwrap().action_delay = 1;
        game.registry.player_stats_mut().unwrap().action_timer = 3;

        let mut phase = AnimatingPhase;
        for _ in 0..2 {
            assert!(matches!(phase.handle_event(&mut game, Event::Tick), Transition::Stay));
        }
        assert_eq!(game.registry.positions[&rat], Position::new(6, 3));
        assert!(matches!(phase.handle_event(&mut game, Event::Tick), Transition::To(_)));
    }

    #[test]
    fn test_keys_are_buffered() {
        let mut game = arena();
        let mut phase = AnimatingPhase;
        phase.handle_event(&mut game, Event::Key(Key::Up));
        phase.handle_event(&mut game, Event::Key(Key::Char('f')));
        assert_eq!(game.buffered, Some(Key::Char('f')));
    }
}
