//! Headless batch simulation over the core session API.

mod config;
mod error;
mod report;
mod simulator;

pub use config::*;
pub use error::*;
pub use report::*;
pub use simulator::*;
