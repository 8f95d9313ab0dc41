//! End-of-level screens

use super::{DungeonPhase, Overlay, Phase, PhaseHandler, PhaseKind, Transition};
use crate::game::{Event, Game, Key};

/// The player died: restart or quit
#[derive(Debug, Default, Clone, Copy)]
pub struct GameOverPhase;

impl PhaseHandler for GameOverPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::GameOver
    }

    fn overlay(&self) -> Overlay<'_> {
        Overlay::GameOver
    }

    fn handle_event(&mut self, game: &mut Game, event: Event) -> Transition {
        match event {
            Event::Key(Key::Char('r')) | Event::Key(Key::Char('R')) => {
                log::info!("Restarting after death at depth {}", game.depth);
                game.start_run();
                Transition::To(Phase::Dungeon(DungeonPhase))
            }
            Event::Key(Key::Char('q')) | Event::Key(Key::Char('Q')) => {
                game.stop();
                Transition::Stay
            }
            _ => Transition::Stay,
        }
    }
}

/// The boss fell: continue deeper or quit
#[derive(Debug, Default, Clone, Copy)]
pub struct VictoryPhase;

impl PhaseHandler for VictoryPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Victory
    }

    fn overlay(&self) -> Overlay<'_> {
        Overlay::Victory
    }

    fn handle_event(&mut self, game: &mut Game, event: Event) -> Transition {
        match event {
            Event::Key(Key::Char('c')) | Event::Key(Key::Char('C')) => {
                let next = game.next_level_path();
                game.reset(false, &next);
                Transition::To(Phase::Dungeon(DungeonPhase))
            }
            Event::Key(Key::Char('q')) | Event::Key(Key::Char('Q')) => {
                game.stop();
                Transition::Stay
            }
            _ => Transition::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::tests::arena;

    #[test]
    fn test_other_keys_ignored() {
        let mut game = arena();
        let mut over = GameOverPhase;
        assert!(matches!(over.handle_event(&mut game, Event::Key(Key::Up)), Transition::Stay));
        assert!(matches!(over.handle_event(&mut game, Event::Tick), Transition::Stay));
        let mut win = VictoryPhase;
        assert!(matches!(win.handle_event(&mut game, Event::Key(Key::Char('r'))), Transition::Stay));
        assert!(game.is_running());
    }

    #[test]
    fn test_quit() {
        let mut game = arena();
        VictoryPhase.handle_event(&mut game, Event::Key(Key::Char('q')));
        assert!(!game.is_running());
    }
}
