//! Theme components for the TUI.
//!
//! This module provides:
//! - [`Theme`] - Color palette (Catppuccin Mocha/Latte/High Contrast)
//! - [`IconSet`] - Icons with Nerd/Unicode/ASCII modes

mod colors;
mod icons;

pub use colors::{Theme, DIM_OPACITY, HOVER_OPACITY};
pub use icons::IconSet;
