//! Core slot machine logic. Keep this crate free of IO and platform concerns.

pub mod config;
pub mod eval;
pub mod events;
pub mod grid;
pub mod paylines;
pub mod reel;
pub mod rng;
pub mod schedule;
pub mod session;
pub mod symbols;

pub use config::*;
pub use eval::*;
pub use events::*;
pub use grid::*;
pub use paylines::*;
pub use reel::*;
pub use rng::*;
pub use schedule::*;
pub use session::*;
pub use symbols::*;
