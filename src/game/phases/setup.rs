//! Character creation: a name, then a class

use super::{DungeonPhase, Overlay, Phase, PhaseHandler, PhaseKind, Transition};
use crate::game::{tags, Event, Game, Key};

/// Longest accepted player name, in characters
pub const MAX_NAME_LEN: usize = 31;

/// Name entry followed by class selection
#[derive(Debug, Clone)]
pub struct SetupPhase {
    name: String,
    naming: bool,
    classes: Vec<String>,
    selected: usize,
}

impl SetupPhase {
    pub fn new(game: &Game) -> Self {
        Self {
            name: String::new(),
            naming: true,
            classes: game.class_templates(),
            selected: 0,
        }
    }

    fn handle_name(&mut self, game: &mut Game, key: Key) {
        match key {
            Key::Char(c) if !c.is_control() && self.name.chars().count() < MAX_NAME_LEN => self.name.push(c),
            Key::Backspace => {
                self.name.pop();
            }
            Key::Enter => {
                let name = self.name.trim();
                if name.is_empty() {
                    game.log.add_colored("Invalid name. Please try again.", tags::EMPHASIS);
                    return;
                }
                game.player_name = name.to_string();
                game.log.add_colored(format!("Welcome, {}!", name), tags::GOLD);
                self.naming = false;
                if self.classes.is_empty() {
                    game.log.add_colored("No classes found in scripts/class", tags::EMPHASIS);
                }
            }
            _ => {}
        }
    }

    fn handle_class(&mut self, game: &mut Game, key: Key) -> Transition {
        match key {
            Key::Up => self.selected = self.selected.saturating_sub(1),
            Key::Down if self.selected + 1 < self.classes.len() => self.selected += 1,
            Key::Escape => self.naming = true,
            Key::Enter | Key::Char(' ') => {
                let Some(class) = self.classes.get(self.selected) else {
                    game.log.add_colored("No classes found in scripts/class", tags::EMPHASIS);
                    return Transition::Stay;
                };
                log::info!("{} starts a run as {}", game.player_name, class);
                game.player_class = class.clone();
                game.start_run();
                return Transition::To(Phase::Dungeon(DungeonPhase));
            }
            _ => {}
        }
        Transition::Stay
    }
}

impl PhaseHandler for SetupPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Setup
    }

    fn overlay(&self) -> Overlay<'_> {
        Overlay::Setup {
            name: &self.name,
            naming: self.naming,
            classes: &self.classes,
            selected: self.selected,
        }
    }

    fn handle_event(&mut self, game: &mut Game, event: Event) -> Transition {
        let Event::Key(key) = event else {
            return Transition::Stay;
        };
        if self.naming {
            self.handle_name(game, key);
            Transition::Stay
        } else {
            self.handle_class(game, key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::tests::{content, game_with, CLASS};

    fn type_name(phase: &mut SetupPhase, game: &mut Game, text: &str) {
        for c in text.chars() {
            phase.handle_event(game, Event::Key(Key::Char(c)));
        }
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut game = game_with(content());
        let mut phase = SetupPhase::new(&game);
        type_name(&mut phase, &mut game, "   ");
        phase.handle_event(&mut game, Event::Key(Key::Enter));
        assert!(phase.naming);
        assert!(game.log.contains("Invalid name"));
    }

    #[test]
    fn test_name_then_class_starts_run() {
        let mut scripts = content();
        scripts.classes = vec!["class/a.lua".into(), CLASS.into()];
        let mut game = game_with(scripts);
        game.player_class.clear();
        let mut phase = SetupPhase::new(&game);

        type_name(&mut phase, &mut game, "Bobx");
        phase.handle_event(&mut game, Event::Key(Key::Backspace));
        phase.handle_event(&mut game, Event::Key(Key::Enter));
        assert_eq!(game.player_name, "Bob");
        assert!(!phase.naming);

        phase.handle_event(&mut game, Event::Key(Key::Down));
        phase.handle_event(&mut game, Event::Key(Key::Down));
        let t = phase.handle_event(&mut game, Event::Key(Key::Enter));
        assert!(matches!(t, Transition::To(Phase::Dungeon(_))));
        assert_eq!(game.player_class, CLASS);
        assert_eq!(game.depth, 1);
        assert_eq!(game.registry.name_of(game.registry.player_id), "Bob");
    }

    #[test]
    fn test_no_classes_stays() {
        let mut game = game_with(content());
        let mut phase = SetupPhase::new(&game);
        type_name(&mut phase, &mut game, "Eve");
        phase.handle_event(&mut game, Event::Key(Key::Enter));
        let t = phase.handle_event(&mut game, Event::Key(Key::Enter));
        assert!(matches!(t, Transition::Stay));
        assert!(game.log.contains("No classes found"));
    }

    #[test]
    fn test_name_length_capped() {
        let mut game = game_with(content());
        let mut phase = SetupPhase::new(&game);
        type_name(&mut phase, &mut game, &"x".repeat(40));
        assert_eq!(phase.name.chars().count(), MAX_NAME_LEN);
    }
}
