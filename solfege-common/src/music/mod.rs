//! Music theory primitives: pitch classes, notes and cadences

mod cadence;
mod note;

pub use cadence::Cadence;
pub use note::{Note, NoteName, PITCH_CLASS_COUNT};
