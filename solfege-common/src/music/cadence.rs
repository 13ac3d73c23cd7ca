//! Cadence model
//!
//! A cadence is a short chord progression played before a question. The chords
//! are described relative to the final tonic chord: `movement[i][j]` is the
//! half-step offset applied to `voices[j]` for chord `i`. Two equal cadences
//! always produce the same voicings, so players may memoize by value.

use crate::music::NoteName;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cadence {
    voices: Vec<NoteName>,
    roots: Vec<NoteName>,
    movement: Vec<Vec<i8>>,
}

impl Cadence {
    /// Build a cadence, checking that `movement` has one row per root and one
    /// column per voice.
    pub fn new(voices: Vec<NoteName>, roots: Vec<NoteName>, movement: Vec<Vec<i8>>) -> Result<Self> {
        if movement.len() != roots.len() {
            return Err(Error::InvalidInput(format!(
                "Cadence has {} roots but {} movement rows",
                roots.len(),
                movement.len()
            )));
        }

        if let Some(row) = movement.iter().find(|row| row.len() != voices.len()) {
            return Err(Error::InvalidInput(format!(
                "Cadence movement row has {} entries, expected {}",
                row.len(),
                voices.len()
            )));
        }

        Ok(Self { voices, roots, movement })
    }

    /// Pitch classes of the tonic chord
    pub fn voices(&self) -> &[NoteName] {
        &self.voices
    }

    /// Bass progression, one root per chord
    pub fn roots(&self) -> &[NoteName] {
        &self.roots
    }

    /// Half-step offsets per chord and voice
    pub fn movement(&self) -> &[Vec<i8>] {
        &self.movement
    }

    /// Each chord as `(voice, offset)` pairs, in playing order
    pub fn chords(&self) -> impl Iterator<Item = Vec<(NoteName, i8)>> + '_ {
        self.movement.iter().map(move |row| {
            self.voices
                .iter()
                .copied()
                .zip(row.iter().copied())
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_major() -> Cadence {
        Cadence::new(
            vec![NoteName::C, NoteName::E, NoteName::G],
            vec![NoteName::C, NoteName::F, NoteName::G, NoteName::C],
            vec![vec![0, 0, 0], vec![0, 1, 2], vec![-1, -2, 0], vec![0, 0, 0]],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_mismatched_rows() {
        let result = Cadence::new(
            vec![NoteName::C, NoteName::E, NoteName::G],
            vec![NoteName::C, NoteName::G],
            vec![vec![0, 0, 0]],
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_mismatched_columns() {
        let result = Cadence::new(
            vec![NoteName::C, NoteName::E, NoteName::G],
            vec![NoteName::C],
            vec![vec![0, 0]],
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_empty_cadence_is_valid() {
        assert!(Cadence::new(vec![], vec![], vec![]).is_ok());
    }

    #[test]
    fn test_chords_pair_voices_with_offsets() {
        let chords: Vec<_> = c_major().chords().collect();

        assert_eq!(chords.len(), 4);
        assert_eq!(chords[1], vec![(NoteName::C, 0), (NoteName::E, 1), (NoteName::G, 2)]);
        assert_eq!(chords[2], vec![(NoteName::C, -1), (NoteName::E, -2), (NoteName::G, 0)]);
    }

    #[test]
    fn test_equal_cadences_hash_equal() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(c_major());
        set.insert(c_major());
        assert_eq!(set.len(), 1);
    }
}
