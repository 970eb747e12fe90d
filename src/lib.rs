//! Palmer penguins explorer: an egui dashboard over an immutable in-memory
//! table, filtered by island and species.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod reactive;
pub mod state;
pub mod ui;
