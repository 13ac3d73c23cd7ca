//! Resolution paths
//!
//! After a correct answer the trainer plays the way home to the tonic: notes
//! in the lower half of the octave descend stepwise through the scale, notes
//! in the upper half climb to the tonic an octave up. A chromatic note not in
//! the scale is slotted into the pattern at its sorted position.

use super::octave_in_key;
use solfege_common::music::{Note, NoteName};
use solfege_common::practice::Mode;

const MAJOR_LOWER: &[usize] = &[0, 2, 4, 5];
const MAJOR_UPPER: &[usize] = &[7, 9, 11];

const MINOR_LOWER: &[usize] = &[0, 2, 3, 5];
const MINOR_UPPER: &[usize] = &[7, 8, 11];

/// Highest scale-degree index resolved downwards
const LOWER_HALF_MAX_INDEX: usize = 5;

/// Produces the note sequence leading from an answer back to the tonic
pub trait NoteResolutionGenerator: Send + Sync {
    fn resolution(&self, note: Note, key: NoteName, mode: Mode, include_chromatic: bool)
        -> Vec<Note>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiatonicNoteResolutionGenerator;

impl DiatonicNoteResolutionGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl NoteResolutionGenerator for DiatonicNoteResolutionGenerator {
    // Chromatic levels resolve exactly like diatonic ones: the pressed note is
    // inserted into the scale pattern either way.
    fn resolution(
        &self,
        note: Note,
        key: NoteName,
        mode: Mode,
        _include_chromatic: bool,
    ) -> Vec<Note> {
        if note.name == key {
            return vec![note];
        }

        let (lower, upper) = match mode {
            Mode::Major => (MAJOR_LOWER, MAJOR_UPPER),
            Mode::Minor => (MINOR_LOWER, MINOR_UPPER),
        };
        let index = note.name.index_in_key(key);

        if index <= LOWER_HALF_MAX_INDEX {
            with_degree(lower, index)
                .into_iter()
                .filter(|&degree| degree <= index)
                .rev()
                .map(|degree| note_at_degree(degree, key))
                .collect()
        } else {
            with_degree(upper, index)
                .into_iter()
                .filter(|&degree| degree >= index)
                .map(|degree| note_at_degree(degree, key))
                .chain(std::iter::once(Note::new(key, 2)))
                .collect()
        }
    }
}

/// Pattern with `degree` inserted in sorted position if missing
fn with_degree(pattern: &[usize], degree: usize) -> Vec<usize> {
    let mut degrees = pattern.to_vec();
    if let Err(position) = degrees.binary_search(&degree) {
        degrees.insert(position, degree);
    }
    degrees
}

fn note_at_degree(degree: usize, key: NoteName) -> Note {
    let name = NoteName::note_at(degree, key);
    Note::new(name, octave_in_key(name, degree as u8, key))
}
