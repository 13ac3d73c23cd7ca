//! Practice sessions and their per-note tallies

use crate::music::Note;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Correct and wrong identification counts for one note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Score {
    pub correct: u32,
    pub wrong: u32,
}

impl Score {
    pub fn new(correct: u32, wrong: u32) -> Self {
        Self { correct, wrong }
    }

    pub fn attempts(&self) -> u64 {
        u64::from(self.correct) + u64::from(self.wrong)
    }

    /// correct / attempts, or None when the note was never attempted
    pub fn average(&self) -> Option<f64> {
        match self.attempts() {
            0 => None,
            attempts => Some(self.correct as f64 / attempts as f64),
        }
    }
}

/// Aggregated view over one session's score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    /// Saturates at `u32::MAX`
    pub correct: u32,
    pub wrong: u32,
    /// correct / (correct + wrong) over all notes, 0.0 when nothing was attempted
    pub average: f64,
    /// Omits notes with zero attempts
    pub average_per_note: BTreeMap<Note, f64>,
}

/// One practice run
///
/// Sessions start empty and grow through scoring; each scoring call produces a
/// new value rather than changing an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub timestamp: DateTime<Utc>,
    pub score: BTreeMap<Note, Score>,
}

impl Session {
    /// Empty session started at `timestamp`
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            score: BTreeMap::new(),
        }
    }

    pub fn with_score(timestamp: DateTime<Utc>, score: BTreeMap<Note, Score>) -> Self {
        Self { timestamp, score }
    }

    /// True when no note has been scored yet
    pub fn is_empty(&self) -> bool {
        self.score.is_empty()
    }

    /// Copy of this session with one more correct answer for `note`
    pub fn recording_correct(&self, note: Note) -> Session {
        let mut score = self.score.clone();
        let entry = score.entry(note).or_default();
        entry.correct = entry.correct.saturating_add(1);
        Session::with_score(self.timestamp, score)
    }

    /// Copy of this session with one more wrong answer for `note`
    pub fn recording_wrong(&self, note: Note) -> Session {
        let mut score = self.score.clone();
        let entry = score.entry(note).or_default();
        entry.wrong = entry.wrong.saturating_add(1);
        Session::with_score(self.timestamp, score)
    }

    pub fn summary(&self) -> SessionSummary {
        let mut summary = SessionSummary::default();

        for (note, score) in &self.score {
            summary.correct = summary.correct.saturating_add(score.correct);
            summary.wrong = summary.wrong.saturating_add(score.wrong);

            if let Some(average) = score.average() {
                summary.average_per_note.insert(*note, average);
            }
        }

        let (correct, attempts) = self.score.values().fold((0u64, 0u64), |(c, a), score| {
            (c + u64::from(score.correct), a + score.attempts())
        });
        if attempts > 0 {
            summary.average = correct as f64 / attempts as f64;
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::NoteName;

    fn scored_session() -> Session {
        let score = BTreeMap::from([
            (Note::new(NoteName::C, 1), Score::new(4, 2)),
            (Note::new(NoteName::D, 1), Score::new(3, 0)),
            (Note::new(NoteName::E, 1), Score::new(0, 8)),
            (Note::new(NoteName::F, 1), Score::new(4, 1)),
            (Note::new(NoteName::G, 1), Score::new(0, 0)),
            (Note::new(NoteName::C, 2), Score::new(2, 1)),
        ]);
        Session::with_score(DateTime::from_timestamp(1000, 0).unwrap(), score)
    }

    #[test]
    fn test_summary() {
        let summary = scored_session().summary();

        assert_eq!(summary.correct, 13);
        assert_eq!(summary.wrong, 12);
        assert_eq!((summary.average * 100.0) as u32, 52);
        assert_eq!(summary.average_per_note.len(), 5);
        assert_eq!(summary.average_per_note[&Note::new(NoteName::D, 1)], 1.0);
        assert_eq!(summary.average_per_note[&Note::new(NoteName::E, 1)], 0.0);
        assert_eq!((summary.average_per_note[&Note::new(NoteName::C, 1)] * 100.0) as u32, 66);
        assert_eq!((summary.average_per_note[&Note::new(NoteName::F, 1)] * 100.0) as u32, 80);
        assert!(!summary.average_per_note.contains_key(&Note::new(NoteName::G, 1)));
    }

    #[test]
    fn test_summary_with_huge_counts() {
        let score = BTreeMap::from([
            (Note::new(NoteName::C, 1), Score::new(u32::MAX, 1)),
            (Note::new(NoteName::D, 1), Score::new(u32::MAX, u32::MAX)),
        ]);
        let session = Session::with_score(DateTime::from_timestamp(1000, 0).unwrap(), score);
        let summary = session.summary();

        assert_eq!(summary.correct, u32::MAX);
        assert_eq!(summary.wrong, u32::MAX);
        assert!(summary.average > 0.66 && summary.average < 0.67);
        assert!(summary.average_per_note[&Note::new(NoteName::C, 1)] > 0.99);
        assert_eq!(summary.average_per_note[&Note::new(NoteName::D, 1)], 0.5);

        let recorded = session.recording_correct(Note::new(NoteName::C, 1));
        assert_eq!(recorded.score[&Note::new(NoteName::C, 1)], Score::new(u32::MAX, 1));
    }

    #[test]
    fn test_empty_summary() {
        let summary = Session::new(Utc::now()).summary();

        assert_eq!(summary.correct, 0);
        assert_eq!(summary.wrong, 0);
        assert_eq!(summary.average, 0.0);
        assert!(summary.average_per_note.is_empty());
    }

    #[test]
    fn test_recording_produces_new_values() {
        let session = Session::new(Utc::now());
        let note = Note::new(NoteName::A, 1);

        let after_correct = session.recording_correct(note);
        let after_wrong = after_correct.recording_wrong(note);

        assert!(session.is_empty());
        assert_eq!(after_correct.score[&note], Score::new(1, 0));
        assert_eq!(after_wrong.score[&note], Score::new(1, 1));
        assert_eq!(after_wrong.timestamp, session.timestamp);
    }
}
