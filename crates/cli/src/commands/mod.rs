//! CLI command implementations.

pub mod check;
pub mod feed;
pub mod hints;
pub mod interactive;
pub mod list;
