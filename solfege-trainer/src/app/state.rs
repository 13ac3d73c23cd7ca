//! Application state snapshot
//!
//! The state holds read-only copies of the manager's current level, session
//! and question. Only manager responses refresh them.

use solfege_common::music::Note;
use solfege_common::practice::{Level, Question, Session};
use solfege_common::tip::Tip;
use solfege_common::Error;
use std::collections::BTreeMap;

/// How a highlighted key should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Note previewed outside a session (amber)
    Preview,
    /// Correct answer or resolution note (green)
    Correct,
    /// Wrong answer (red)
    Wrong,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub is_loading: bool,
    pub is_practicing: bool,
    pub level: Option<Level>,
    /// Latest catalog (non-custom) level, the reference for note editing
    pub base_level: Option<Level>,
    pub session: Option<Session>,
    pub question: Option<Question>,
    /// Last note pressed in answer to a question
    pub answer: Option<Note>,
    pub questions_count: u32,
    pub correct_identifications: u32,
    pub accuracy: f64,
    pub accuracy_per_note: BTreeMap<Note, f64>,
    pub is_level_editor_visible: bool,
    pub is_accuracy_screen_visible: bool,
    pub highlighted_note: Option<(Note, Highlight)>,
    pub has_error: bool,
    pub is_interaction_enabled: bool,
    /// Resolution notes still to be played after a correct answer
    pub currently_playing_resolution: Vec<Note>,
    pub error: Option<Error>,
    pub current_tip: Option<Tip>,
}

impl AppState {
    /// Level navigation and editing are locked while practicing
    pub fn is_navigation_enabled(&self) -> bool {
        !self.is_practicing && self.is_interaction_enabled
    }

    pub fn wrong_identifications(&self) -> u32 {
        self.questions_count.saturating_sub(self.correct_identifications)
    }

    /// `correct · wrong · total`, empty before the first answer
    pub fn score_text(&self) -> String {
        if self.questions_count == 0 {
            return String::new();
        }

        format!(
            "{} · {} · {}",
            self.correct_identifications,
            self.wrong_identifications(),
            self.questions_count
        )
    }

    /// Accuracy as a whole percentage
    pub fn accuracy_percent(&self) -> u32 {
        (self.accuracy * 100.0).round() as u32
    }

    /// Notes the level editor offers: every note of the base level
    pub fn editable_notes(&self) -> &[Note] {
        self.base_level
            .as_ref()
            .map(|level| level.notes.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_text() {
        let mut state = AppState::default();
        assert_eq!(state.score_text(), "");

        state.questions_count = 7;
        state.correct_identifications = 5;
        assert_eq!(state.score_text(), "5 · 2 · 7");
    }

    #[test]
    fn test_navigation_locked_while_practicing() {
        let mut state = AppState {
            is_interaction_enabled: true,
            ..AppState::default()
        };
        assert!(state.is_navigation_enabled());

        state.is_practicing = true;
        assert!(!state.is_navigation_enabled());
    }

    #[test]
    fn test_accuracy_percent() {
        let state = AppState {
            accuracy: 0.52,
            ..AppState::default()
        };
        assert_eq!(state.accuracy_percent(), 52);
    }
}
