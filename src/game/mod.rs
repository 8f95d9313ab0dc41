//! Game module - Core game logic and state management

pub mod event;
pub mod messages;
pub mod phases;
pub mod state;
pub mod time;
pub mod turn;

pub use event::{Event, Key};
pub use messages::{tags, LogEntry, MessageLog};
pub use phases::{Overlay, Phase, PhaseKind, StateMachine, Transition};
pub use state::{Game, StepResult};
pub use time::TickClock;
