//! Core data models for the ATP proxy.

mod h2h;
mod match_record;
mod tournament;

pub use h2h::*;
pub use match_record::*;
pub use tournament::*;
