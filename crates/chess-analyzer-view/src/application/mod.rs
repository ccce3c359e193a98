//! Application layer for chess-analyzer-view.

pub mod automation;
pub mod controller;
pub mod document;
