//! Progression systems

pub mod xp;

pub use xp::{check_level_up, xp_for_next_level};
