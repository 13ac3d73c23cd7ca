//! Level generation
//!
//! A level's notes come from a fixed half-step pattern selected by mode,
//! range and chromatic flag. Each offset is resolved against the key and
//! placed in octave 1 or 2.

use super::octave_in_key;
use solfege_common::music::{Cadence, Note, NoteName};
use solfege_common::practice::{Level, Mode, NoteRange};
use solfege_common::Result;

const MAJOR_FIRST_HALF: &[u8] = &[0, 2, 4, 5];
const MAJOR_SECOND_HALF: &[u8] = &[7, 9, 11, 12];
const MAJOR_ENTIRE: &[u8] = &[0, 2, 4, 5, 7, 9, 11, 12];

const MINOR_FIRST_HALF: &[u8] = &[0, 2, 3, 5];
const MINOR_SECOND_HALF: &[u8] = &[7, 8, 11, 12];
const MINOR_ENTIRE: &[u8] = &[0, 2, 3, 5, 7, 8, 11, 12];

const CHROMATIC_FIRST_HALF: &[u8] = &[0, 1, 2, 3, 4, 5];
const CHROMATIC_SECOND_HALF: &[u8] = &[6, 7, 8, 9, 10, 11, 12];
const CHROMATIC_ENTIRE: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

/// I-IV-V-I voice leading around a major triad
const MAJOR_MOVEMENT: [[i8; 3]; 4] = [[0, 0, 0], [0, 1, 2], [-1, -2, 0], [0, 0, 0]];

/// Same progression voiced around a minor triad
const MINOR_MOVEMENT: [[i8; 3]; 4] = [[0, 0, 0], [0, 2, 1], [-1, -1, 0], [0, 0, 0]];

/// Builds levels from a key and exercise parameters
pub trait LevelGenerator: Send + Sync {
    fn make_level(
        &self,
        id: u32,
        key: NoteName,
        mode: Mode,
        spans_multiple_octaves: bool,
        include_chromatic: bool,
        range: NoteRange,
    ) -> Result<Level>;
}

/// Scale-based generator: diatonic patterns, or every half step when chromatic
#[derive(Debug, Clone, Copy, Default)]
pub struct DiatonicLevelGenerator;

impl DiatonicLevelGenerator {
    pub fn new() -> Self {
        Self
    }

    fn pattern(mode: Mode, include_chromatic: bool, range: NoteRange) -> &'static [u8] {
        match (mode, include_chromatic, range) {
            (_, true, NoteRange::FirstHalfOfOctave) => CHROMATIC_FIRST_HALF,
            (_, true, NoteRange::SecondHalfOfOctave) => CHROMATIC_SECOND_HALF,
            (_, true, NoteRange::EntireOctave) => CHROMATIC_ENTIRE,
            (Mode::Major, false, NoteRange::FirstHalfOfOctave) => MAJOR_FIRST_HALF,
            (Mode::Major, false, NoteRange::SecondHalfOfOctave) => MAJOR_SECOND_HALF,
            (Mode::Major, false, NoteRange::EntireOctave) => MAJOR_ENTIRE,
            (Mode::Minor, false, NoteRange::FirstHalfOfOctave) => MINOR_FIRST_HALF,
            (Mode::Minor, false, NoteRange::SecondHalfOfOctave) => MINOR_SECOND_HALF,
            (Mode::Minor, false, NoteRange::EntireOctave) => MINOR_ENTIRE,
        }
    }

    fn cadence(key: NoteName, mode: Mode) -> Result<Cadence> {
        let (third, movement) = match mode {
            Mode::Major => (key.major_third(), MAJOR_MOVEMENT),
            Mode::Minor => (key.minor_third(), MINOR_MOVEMENT),
        };

        Cadence::new(
            vec![key, third, key.fifth()],
            vec![key, key.fourth(), key.fifth(), key],
            movement.iter().map(|row| row.to_vec()).collect(),
        )
    }
}

impl LevelGenerator for DiatonicLevelGenerator {
    fn make_level(
        &self,
        id: u32,
        key: NoteName,
        mode: Mode,
        spans_multiple_octaves: bool,
        include_chromatic: bool,
        range: NoteRange,
    ) -> Result<Level> {
        let notes = Self::pattern(mode, include_chromatic, range)
            .iter()
            .map(|&offset| {
                let name = key.half_steps(offset as i32);
                Note::new(name, octave_in_key(name, offset, key))
            })
            .collect();

        Ok(Level {
            id,
            key,
            mode,
            is_chromatic: include_chromatic,
            notes,
            cadence: Self::cadence(key, mode)?,
            spans_multiple_octaves,
            range,
            is_custom: false,
            sessions: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(key: NoteName, mode: Mode, chromatic: bool, range: NoteRange) -> Level {
        DiatonicLevelGenerator::new()
            .make_level(1, key, mode, false, chromatic, range)
            .unwrap()
    }

    fn notes(pairs: &[(NoteName, u8)]) -> Vec<Note> {
        pairs.iter().map(|&(name, octave)| Note::new(name, octave)).collect()
    }

    #[test]
    fn test_c_major_entire_octave() {
        let level = level(NoteName::C, Mode::Major, false, NoteRange::EntireOctave);

        assert_eq!(
            level.notes,
            notes(&[
                (NoteName::C, 1),
                (NoteName::D, 1),
                (NoteName::E, 1),
                (NoteName::F, 1),
                (NoteName::G, 1),
                (NoteName::A, 1),
                (NoteName::B, 1),
                (NoteName::C, 2),
            ])
        );
        assert!(level.is_major());
        assert!(!level.is_custom);
        assert!(level.sessions.is_empty());
    }

    #[test]
    fn test_a_minor_second_half() {
        let level = level(NoteName::A, Mode::Minor, false, NoteRange::SecondHalfOfOctave);

        assert_eq!(
            level.notes,
            notes(&[
                (NoteName::E, 2),
                (NoteName::F, 2),
                (NoteName::GSharp, 2),
                (NoteName::A, 2),
            ])
        );
    }

    #[test]
    fn test_b_major_wraps_into_upper_octave() {
        let level = level(NoteName::B, Mode::Major, false, NoteRange::FirstHalfOfOctave);

        assert_eq!(
            level.notes,
            notes(&[
                (NoteName::B, 1),
                (NoteName::CSharp, 2),
                (NoteName::DSharp, 2),
                (NoteName::E, 2),
            ])
        );
    }

    #[test]
    fn test_chromatic_second_half_starts_at_tritone() {
        let level = level(NoteName::F, Mode::Minor, true, NoteRange::SecondHalfOfOctave);

        assert_eq!(level.notes.len(), 7);
        assert_eq!(level.notes[0], Note::new(NoteName::B, 1));
        assert_eq!(level.notes[1], Note::new(NoteName::C, 2));
        assert_eq!(level.notes[6], Note::new(NoteName::F, 2));
        assert!(level.is_chromatic);
    }

    #[test]
    fn test_note_counts_for_every_configuration() {
        let generator = DiatonicLevelGenerator::new();

        for key in NoteName::ALL {
            for mode in [Mode::Major, Mode::Minor] {
                for chromatic in [false, true] {
                    for range in NoteRange::ALL {
                        let level = generator
                            .make_level(1, key, mode, false, chromatic, range)
                            .unwrap();
                        let expected = DiatonicLevelGenerator::pattern(mode, chromatic, range);

                        assert_eq!(level.notes.len(), expected.len());
                        for (note, &offset) in level.notes.iter().zip(expected) {
                            assert_eq!(note.name.index_in_key(key), offset as usize % 12);
                            assert!(note.octave == 1 || note.octave == 2);
                        }

                        // Upper tonic always sits in octave 2
                        if expected.last() == Some(&12) {
                            assert_eq!(level.notes.last(), Some(&Note::new(key, 2)));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_notes_ascend() {
        let generator = DiatonicLevelGenerator::new();

        for key in NoteName::ALL {
            let level = generator
                .make_level(1, key, Mode::Major, false, true, NoteRange::EntireOctave)
                .unwrap();
            assert!(level.notes.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn test_major_cadence() {
        let level = level(NoteName::D, Mode::Major, false, NoteRange::EntireOctave);
        let cadence = &level.cadence;

        assert_eq!(cadence.voices(), &[NoteName::D, NoteName::FSharp, NoteName::A]);
        assert_eq!(
            cadence.roots(),
            &[NoteName::D, NoteName::G, NoteName::A, NoteName::D]
        );
        assert_eq!(cadence.movement()[1], vec![0, 1, 2]);
        assert_eq!(cadence.movement()[2], vec![-1, -2, 0]);
    }

    #[test]
    fn test_minor_cadence() {
        let level = level(NoteName::D, Mode::Minor, false, NoteRange::EntireOctave);
        let cadence = &level.cadence;

        assert_eq!(cadence.voices(), &[NoteName::D, NoteName::F, NoteName::A]);
        assert_eq!(cadence.movement()[1], vec![0, 2, 1]);
        assert_eq!(cadence.movement()[2], vec![-1, -1, 0]);
    }

    #[test]
    fn test_cadence_equal_across_ranges() {
        let first = level(NoteName::E, Mode::Major, false, NoteRange::FirstHalfOfOctave);
        let second = level(NoteName::E, Mode::Major, true, NoteRange::EntireOctave);
        let minor = level(NoteName::E, Mode::Minor, false, NoteRange::FirstHalfOfOctave);

        assert_eq!(first.cadence, second.cadence);
        assert_ne!(first.cadence, minor.cadence);
    }

    #[test]
    fn test_multiple_octave_flag_is_carried() {
        let level = DiatonicLevelGenerator::new()
            .make_level(7, NoteName::G, Mode::Major, true, false, NoteRange::EntireOctave)
            .unwrap();

        assert_eq!(level.id, 7);
        assert!(level.spans_multiple_octaves);
        assert_eq!(level.range, NoteRange::EntireOctave);
    }
}
