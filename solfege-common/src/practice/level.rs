//! Exercise configuration
//!
//! A level is an immutable value: its key, mode, note range and chromatic flag,
//! the playable notes, the cadence, and the history of sessions practiced on it.
//! Changing notes or history always produces a new level.

use crate::music::{Cadence, Note, NoteName};
use crate::practice::Session;
use std::collections::BTreeMap;

/// Which part of the octave a level draws its notes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteRange {
    FirstHalfOfOctave,
    SecondHalfOfOctave,
    EntireOctave,
}

impl NoteRange {
    /// Catalog order
    pub const ALL: [NoteRange; 3] = [
        NoteRange::FirstHalfOfOctave,
        NoteRange::SecondHalfOfOctave,
        NoteRange::EntireOctave,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Major,
    Minor,
}

/// Accuracy over every session recorded against a level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSummary {
    /// Mean of the per-note averages over the level's notes; unattempted notes count as 0
    pub average: f64,
    /// Omits notes with zero attempts
    pub average_per_note: BTreeMap<Note, f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub id: u32,
    pub key: NoteName,
    pub mode: Mode,
    pub is_chromatic: bool,
    pub notes: Vec<Note>,
    pub cadence: Cadence,
    pub spans_multiple_octaves: bool,
    pub range: NoteRange,
    /// User-edited note subset rather than a catalog original
    pub is_custom: bool,
    pub sessions: Vec<Session>,
}

impl Level {
    pub fn is_major(&self) -> bool {
        self.mode == Mode::Major
    }

    pub fn is_minor(&self) -> bool {
        self.mode == Mode::Minor
    }

    /// Display title, e.g. `F♯ / G♭ minor *`
    pub fn title(&self) -> String {
        let mode = match self.mode {
            Mode::Major => "major",
            Mode::Minor => "minor",
        };
        let mut title = format!("{} {}", self.key.letter(), mode);

        if self.is_custom {
            title.push_str(" *");
        }
        if self.spans_multiple_octaves {
            title.push_str(" · 8..");
        }

        title
    }

    pub fn summary(&self) -> LevelSummary {
        let mut totals: BTreeMap<Note, (u64, u64)> = BTreeMap::new();

        for session in &self.sessions {
            for (note, score) in &session.score {
                let entry = totals.entry(*note).or_default();
                entry.0 += u64::from(score.correct);
                entry.1 += u64::from(score.wrong);
            }
        }

        let average_per_note: BTreeMap<Note, f64> = totals
            .into_iter()
            .filter(|(_, (correct, wrong))| correct + wrong > 0)
            .map(|(note, (correct, wrong))| (note, correct as f64 / (correct + wrong) as f64))
            .collect();

        let average = if self.notes.is_empty() {
            0.0
        } else {
            let sum: f64 = self
                .notes
                .iter()
                .map(|note| average_per_note.get(note).copied().unwrap_or(0.0))
                .sum();
            sum / self.notes.len() as f64
        };

        LevelSummary {
            average,
            average_per_note,
        }
    }

    /// Same configuration with a different note subset: always custom, no history
    pub fn with_notes(&self, notes: Vec<Note>) -> Level {
        Level {
            notes,
            is_custom: true,
            sessions: Vec::new(),
            ..self.clone()
        }
    }

    /// Same configuration with replaced history
    pub fn with_sessions(&self, sessions: Vec<Session>) -> Level {
        Level {
            sessions,
            ..self.clone()
        }
    }
}
