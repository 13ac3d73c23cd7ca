//! Application core
//!
//! A single state value changes only through [`next_state`]. Slow work
//! (playback, persistence, catalog moves) is returned as an [`Effect`] and
//! run by the [`AppLoop`], which feeds each effect's result back in as a new
//! action.

mod action;
mod app_loop;
mod effect;
mod environment;
mod reducer;
mod state;

pub use action::Action;
pub use app_loop::{AppHandle, AppLoop};
pub use effect::Effect;
pub use environment::Environment;
pub use reducer::{loaded_level, next_state};
pub use state::{AppState, Highlight};
