//! Everything that can happen to the application
//!
//! User input and completed effects both arrive as actions. Async results
//! carry a `Result` so the reducer can take the failure branch.

use solfege_common::music::Note;
use solfege_common::practice::{Level, Question, Session};
use solfege_common::Result;
use std::fmt;

#[derive(Debug, Clone)]
pub enum Action {
    // Lifecycle
    Launched,

    // Onboarding
    TipDismissed,

    // Navigation bar
    HomePressed,
    RandomPressed,
    PreviousLevelPressed,
    NextLevelPressed,
    ConfigureLevelPressed,
    StartStopPressed,
    RepeatQuestionPressed,
    AccuracyRingPressed,

    // Keyboard
    NotePressed(Note),
    NoteReleased(Note),

    // Modals
    AccuracyScreenDismissed,
    LevelEditorDismissed,
    NotesSelected(Vec<Note>),

    // Effect results
    LevelLoaded(Result<Level>),
    SessionStarted(Result<Session>),
    QuestionLoaded(Result<Question>),
    RightAnswerLogged(Result<Session>),
    WrongAnswerLogged(Result<Session>),
    ResolutionNotePlayed(Result<()>),
    CadencePlayed(Result<()>),
}

impl Action {
    /// True for effect results that carry an error
    pub fn is_failure(&self) -> bool {
        match self {
            Action::LevelLoaded(result) => result.is_err(),
            Action::SessionStarted(result) => result.is_err(),
            Action::QuestionLoaded(result) => result.is_err(),
            Action::RightAnswerLogged(result) | Action::WrongAnswerLogged(result) => {
                result.is_err()
            }
            Action::ResolutionNotePlayed(result) | Action::CadencePlayed(result) => {
                result.is_err()
            }
            _ => false,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Launched => write!(f, "launched"),
            Action::TipDismissed => write!(f, "tip dismissed"),
            Action::HomePressed => write!(f, "pressed home"),
            Action::RandomPressed => write!(f, "pressed random level"),
            Action::PreviousLevelPressed => write!(f, "pressed previous level"),
            Action::NextLevelPressed => write!(f, "pressed next level"),
            Action::ConfigureLevelPressed => write!(f, "pressed configure level"),
            Action::StartStopPressed => write!(f, "pressed start/stop"),
            Action::RepeatQuestionPressed => write!(f, "pressed repeat"),
            Action::AccuracyRingPressed => write!(f, "pressed accuracy ring"),
            Action::NotePressed(note) => {
                write!(f, "pressed note {} ({})", note.name.letter(), note.octave)
            }
            Action::NoteReleased(note) => {
                write!(f, "released note {} ({})", note.name.letter(), note.octave)
            }
            Action::AccuracyScreenDismissed => write!(f, "dismissed accuracy screen"),
            Action::LevelEditorDismissed => write!(f, "dismissed level editor"),
            Action::NotesSelected(notes) => {
                let letters: Vec<&str> = notes.iter().map(|n| n.name.letter()).collect();
                write!(f, "selected notes [{}]", letters.join(", "))
            }
            Action::LevelLoaded(Ok(level)) => {
                write!(f, "loaded level {} - {}", level.id, level.title())
            }
            Action::LevelLoaded(Err(e)) => write!(f, "failed to load level: {}", e),
            Action::SessionStarted(Ok(session)) => {
                write!(f, "started session at {}", session.timestamp)
            }
            Action::SessionStarted(Err(e)) => write!(f, "failed to start session: {}", e),
            Action::QuestionLoaded(Ok(question)) => write!(
                f,
                "loaded question {} - {}",
                question.id,
                question.answer.name.letter()
            ),
            Action::QuestionLoaded(Err(e)) => write!(f, "failed to load question: {}", e),
            Action::RightAnswerLogged(Ok(session)) => {
                write!(f, "logged right answer in session started at {}", session.timestamp)
            }
            Action::RightAnswerLogged(Err(e)) => write!(f, "failed to log right answer: {}", e),
            Action::WrongAnswerLogged(Ok(session)) => {
                write!(f, "logged wrong answer in session started at {}", session.timestamp)
            }
            Action::WrongAnswerLogged(Err(e)) => write!(f, "failed to log wrong answer: {}", e),
            Action::ResolutionNotePlayed(Ok(())) => write!(f, "played resolution note"),
            Action::ResolutionNotePlayed(Err(e)) => {
                write!(f, "failed to play resolution note: {}", e)
            }
            Action::CadencePlayed(Ok(())) => write!(f, "played cadence"),
            Action::CadencePlayed(Err(e)) => write!(f, "failed to play cadence: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solfege_common::music::NoteName;
    use solfege_common::Error;

    #[test]
    fn test_display() {
        assert_eq!(Action::HomePressed.to_string(), "pressed home");
        assert_eq!(
            Action::NotePressed(Note::new(NoteName::CSharp, 1)).to_string(),
            "pressed note C♯ / D♭ (1)"
        );
        assert_eq!(
            Action::CadencePlayed(Err(Error::NoSessionInProgress)).to_string(),
            "failed to play cadence: No practice session in progress"
        );
    }

    #[test]
    fn test_is_failure() {
        assert!(Action::LevelLoaded(Err(Error::unexpected("gone"))).is_failure());
        assert!(!Action::CadencePlayed(Ok(())).is_failure());
        assert!(!Action::Launched.is_failure());
    }
}
