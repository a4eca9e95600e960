//! Window geometry management

pub mod sizing;

pub use sizing::{NaturalSize, WindowSizer};
