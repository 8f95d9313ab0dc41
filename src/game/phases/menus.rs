//! Modal screens: inventory, character sheet, help

use super::{AnimatingPhase, DungeonPhase, Overlay, Phase, PhaseHandler, PhaseKind, Transition};
use crate::game::{tags, Event, Game, Key};

/// How a modal reads one event
enum ModalInput {
    /// Tick, or a key swallowed by the debounce
    Ignored,
    Close,
    Key(Key),
}

fn read_modal(game: &mut Game, event: Event, toggle: char) -> ModalInput {
    match event {
        Event::Tick => {
            game.menu_lock = game.menu_lock.saturating_sub(1);
            ModalInput::Ignored
        }
        Event::Key(_) if game.menu_lock > 0 => ModalInput::Ignored,
        Event::Key(Key::Escape) => ModalInput::Close,
        Event::Key(Key::Char(c)) if c == toggle => ModalInput::Close,
        Event::Key(key) => ModalInput::Key(key),
    }
}

fn back_to_dungeon() -> Transition {
    Transition::To(Phase::Dungeon(DungeonPhase))
}

/// Carried items; `1`-`9` uses one
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryPhase;

impl PhaseHandler for InventoryPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Inventory
    }

    fn overlay(&self) -> Overlay<'_> {
        Overlay::Inventory
    }

    fn handle_event(&mut self, game: &mut Game, event: Event) -> Transition {
        let key = match read_modal(game, event, 'i') {
            ModalInput::Ignored => return Transition::Stay,
            ModalInput::Close => return back_to_dungeon(),
            ModalInput::Key(key) => key,
        };

        let Key::Char(c @ '1'..='9') = key else {
            return Transition::Stay;
        };
        let slot = c as usize - '1' as usize;
        if slot >= game.inventory.len() {
            return Transition::Stay;
        }

        match game.use_item(slot) {
            Ok(()) => {
                game.arm_player();
                Transition::To(Phase::Animating(AnimatingPhase))
            }
            Err(e) => {
                log::warn!("{}", e);
                game.log.add_colored(format!("Script Error: {}", e), tags::EMPHASIS);
                Transition::Stay
            }
        }
    }
}

/// Character sheet
#[derive(Debug, Default, Clone, Copy)]
pub struct StatsPhase;

impl PhaseHandler for StatsPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Stats
    }

    fn overlay(&self) -> Overlay<'_> {
        Overlay::Stats
    }

    fn handle_event(&mut self, game: &mut Game, event: Event) -> Transition {
        match read_modal(game, event, 'c') {
            ModalInput::Close => back_to_dungeon(),
            _ => Transition::Stay,
        }
    }
}

/// Help text from the game script
#[derive(Debug, Default, Clone)]
pub struct HelpPhase {
    text: String,
}

impl HelpPhase {
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

impl PhaseHandler for HelpPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Help
    }

    fn overlay(&self) -> Overlay<'_> {
        Overlay::Help(&self.text)
    }

    fn handle_event(&mut self, game: &mut Game, event: Event) -> Transition {
        match read_modal(game, event, '?') {
            ModalInput::Close => back_to_dungeon(),
            _ => Transition::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{ItemKind, ItemTag};
    use crate::game::state::tests::arena;

    #[test]
    fn test_locked_modal_ignores_input() {
        let mut game = arena();
        game.menu_lock = 2;
        let mut phase = StatsPhase;
        assert!(matches!(phase.handle_event(&mut game, Event::Key(Key::Escape)), Transition::Stay));
        phase.handle_event(&mut game, Event::Tick);
        phase.handle_event(&mut game, Event::Tick);
        assert_eq!(game.menu_lock, 0);
        assert!(matches!(phase.handle_event(&mut game, Event::Key(Key::Char('c'))), Transition::To(_)));
    }

    #[test]
    fn test_failed_use_keeps_item_and_stays() {
        let mut game = arena();
        game.inventory.push(ItemTag {
            kind: ItemKind::Consumable,
            value: 0,
            name: "Rock".into(),
            script: "items/rock.lua".into(),
        });
        let mut phase = InventoryPhase;
        let t = phase.handle_event(&mut game, Event::Key(Key::Char('1')));
        assert!(matches!(t, Transition::Stay));
        assert_eq!(game.inventory.len(), 1);
        assert!(game.player_ready());
        assert!(game.log.last().unwrap().text.starts_with("Script Error"));
    }

    #[test]
    fn test_empty_slot_does_nothing() {
        let mut game = arena();
        let mut phase = InventoryPhase;
        let before = game.log.len();
        assert!(matches!(phase.handle_event(&mut game, Event::Key(Key::Char('3'))), Transition::Stay));
        assert_eq!(game.log.len(), before);
    }
}
