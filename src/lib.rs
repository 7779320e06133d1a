//! Four-way Intersection Signal Library
//!
//! A signal controller for a four-way intersection that can run headless or with a Bevy UI.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
