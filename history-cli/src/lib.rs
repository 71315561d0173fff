//! Terminal front end for `history-core`.

pub mod cli;
pub mod explore;
pub mod render;
