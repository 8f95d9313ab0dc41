//! Exploring: the player may act

use super::{AnimatingPhase, HelpPhase, InventoryPhase, Phase, PhaseHandler, PhaseKind, StatsPhase, Transition};
use crate::game::turn::any_monster_due;
use crate::game::{Event, Game, Key, StepResult};

/// Waiting for the player's next action
#[derive(Debug, Default, Clone, Copy)]
pub struct DungeonPhase;

/// Open a modal screen, arming the debounce so the key that opened it is
/// not read again as a menu action
fn open_modal(game: &mut Game, phase: Phase) -> Transition {
    game.menu_lock = game.config.menu_lock_ticks;
    Transition::To(phase)
}

/// The player just spent their turn. Animate if anything is still moving or
/// waiting on a timer; otherwise let the monsters answer right away.
pub(super) fn end_player_turn(game: &mut Game) -> Transition {
    game.arm_player();
    game.refresh_fov();

    if game.registry.has_projectiles() || !game.player_ready() || any_monster_due(&game.registry) {
        return Transition::To(Phase::Animating(AnimatingPhase));
    }
    game.run_monsters();
    game.refresh_fov();
    Transition::Stay
}

impl PhaseHandler for DungeonPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Dungeon
    }

    fn handle_event(&mut self, game: &mut Game, event: Event) -> Transition {
        let key = match event {
            Event::Tick => {
                game.menu_lock = game.menu_lock.saturating_sub(1);
                return Transition::Stay;
            }
            Event::Key(key) => key,
        };

        match key {
            Key::Char('q') | Key::Char('Q') => {
                game.stop();
                return Transition::Stay;
            }
            Key::Char('i') => return open_modal(game, Phase::Inventory(InventoryPhase)),
            Key::Char('c') => return open_modal(game, Phase::Stats(StatsPhase)),
            Key::Escape | Key::Char('?') => {
                let text = game.help_text();
                return open_modal(game, Phase::Help(HelpPhase::new(text)));
            }
            _ => {}
        }

        if !game.player_ready() {
            if key.is_action() {
                game.buffered = Some(key);
            }
            return Transition::Stay;
        }

        let acted = if let Some(dir) = key.direction() {
            match game.player_step(dir) {
                // A fresh level; nothing else happens this turn
                StepResult::Descended => return Transition::Stay,
                result => result.acted(),
            }
        } else if matches!(key, Key::Char('f') | Key::Char('F')) {
            game.cast()
        } else {
            false
        };

        if acted {
            end_player_turn(game)
        } else {
            Transition::Stay
        }
    }
}
