//! CLI command implementations.

pub mod chunk;
pub mod common;
pub mod coverage;
pub mod point;
pub mod tiles;
