//! Data loading and validation for machine assets.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
