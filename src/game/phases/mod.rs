//! Game phases
//!
//! Exactly one phase is active at a time. Each phase is its own type behind
//! [`PhaseHandler`]; handling an event either keeps the phase or hands back
//! the next one, and the [`StateMachine`] swaps it in wholesale.

mod animating;
mod dungeon;
mod menus;
mod outcome;
mod setup;

pub use animating::AnimatingPhase;
pub use dungeon::DungeonPhase;
pub use menus::{HelpPhase, InventoryPhase, StatsPhase};
pub use outcome::{GameOverPhase, VictoryPhase};
pub use setup::SetupPhase;

use super::{Event, Game, Key};

/// Which phase is active, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Setup,
    Dungeon,
    Inventory,
    Stats,
    Help,
    Animating,
    GameOver,
    Victory,
}

/// What the front-end draws over (or instead of) the dungeon view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay<'a> {
    /// Just the dungeon
    None,
    /// Character creation
    Setup {
        name: &'a str,
        naming: bool,
        classes: &'a [String],
        selected: usize,
    },
    Inventory,
    Stats,
    Help(&'a str),
    GameOver,
    Victory,
}

/// Outcome of handling one event
#[derive(Debug)]
pub enum Transition {
    Stay,
    To(Phase),
}

/// One game phase
pub trait PhaseHandler {
    fn kind(&self) -> PhaseKind;

    fn overlay(&self) -> Overlay<'_> {
        Overlay::None
    }

    fn handle_event(&mut self, game: &mut Game, event: Event) -> Transition;
}

/// The closed set of phases
#[derive(Debug)]
pub enum Phase {
    Setup(SetupPhase),
    Dungeon(DungeonPhase),
    Inventory(InventoryPhase),
    Stats(StatsPhase),
    Help(HelpPhase),
    Animating(AnimatingPhase),
    GameOver(GameOverPhase),
    Victory(VictoryPhase),
}

impl Phase {
    fn handler(&self) -> &dyn PhaseHandler {
        match self {
            Phase::Setup(p) => p,
            Phase::Dungeon(p) => p,
            Phase::Inventory(p) => p,
            Phase::Stats(p) => p,
            Phase::Help(p) => p,
            Phase::Animating(p) => p,
            Phase::GameOver(p) => p,
            Phase::Victory(p) => p,
        }
    }

    fn handler_mut(&mut self) -> &mut dyn PhaseHandler {
        match self {
            Phase::Setup(p) => p,
            Phase::Dungeon(p) => p,
            Phase::Inventory(p) => p,
            Phase::Stats(p) => p,
            Phase::Help(p) => p,
            Phase::Animating(p) => p,
            Phase::GameOver(p) => p,
            Phase::Victory(p) => p,
        }
    }

    pub fn kind(&self) -> PhaseKind {
        self.handler().kind()
    }

    pub fn overlay(&self) -> Overlay<'_> {
        self.handler().overlay()
    }
}

/// Holds the active phase and routes events to it
#[derive(Debug)]
pub struct StateMachine {
    phase: Phase,
}

impl StateMachine {
    /// Start in character setup
    pub fn new(game: &Game) -> Self {
        Self {
            phase: Phase::Setup(SetupPhase::new(game)),
        }
    }

    /// Start from an arbitrary phase
    #[cfg(test)]
    pub fn with_phase(phase: Phase) -> Self {
        Self { phase }
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn overlay(&self) -> Overlay<'_> {
        self.phase.overlay()
    }

    /// Process one event to completion
    pub fn handle_event(&mut self, game: &mut Game, event: Event) {
        if matches!(event, Event::Key(Key::Interrupt)) {
            game.stop();
            return;
        }

        self.dispatch(game, event);
        self.check_outcome(game);

        // Replay a key held back while the player was busy
        if self.kind() == PhaseKind::Dungeon && game.player_ready() {
            if let Some(key) = game.buffered.take() {
                log::debug!("Replaying buffered {:?}", key);
                self.dispatch(game, Event::Key(key));
                self.check_outcome(game);
            }
        }
    }

    fn dispatch(&mut self, game: &mut Game, event: Event) {
        if let Transition::To(next) = self.phase.handler_mut().handle_event(game, event) {
            self.switch(next);
        }
    }

    /// Death and victory preempt whatever phase is running
    fn check_outcome(&mut self, game: &Game) {
        if !matches!(self.kind(), PhaseKind::Dungeon | PhaseKind::Animating) {
            return;
        }
        if game.player_dead() {
            self.switch(Phase::GameOver(GameOverPhase));
        } else if game.victory() {
            self.switch(Phase::Victory(VictoryPhase));
        }
    }

    fn switch(&mut self, next: Phase) {
        log::debug!("Phase {:?} -> {:?}", self.kind(), next.kind());
        self.phase = next;
    }
}
