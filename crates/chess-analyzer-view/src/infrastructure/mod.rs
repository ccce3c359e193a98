//! Infrastructure layer for chess-analyzer-view.

pub mod document;
