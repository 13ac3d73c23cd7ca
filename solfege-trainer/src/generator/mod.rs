//! Exercise content generators
//!
//! Both generators are deterministic table lookups over half-step patterns
//! measured from the tonic.

mod level;
mod resolution;

pub use level::{DiatonicLevelGenerator, LevelGenerator};
pub use resolution::{DiatonicNoteResolutionGenerator, NoteResolutionGenerator};

use solfege_common::music::NoteName;

/// Octave a pitch class lands in when counted up from `key`
///
/// Pitch classes below the tonic (in C-relative order) have wrapped into the
/// upper octave, as has the tonic itself when repeated at a non-zero offset.
pub(crate) fn octave_in_key(name: NoteName, offset: u8, key: NoteName) -> u8 {
    if name == key && offset > 0 {
        return 2;
    }

    if name.pitch_class() < key.pitch_class() {
        return 2;
    }

    1
}
