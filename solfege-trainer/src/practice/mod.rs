//! Practice session management
//!
//! The practice manager is the single owner of the level catalog, the cursor,
//! the running session and the current question. Operations are async and
//! never interleave.

mod cyclic;

pub use cyclic::{CyclicPracticeManager, KEYS_IN_FOURTHS};

use async_trait::async_trait;
use solfege_common::music::Note;
use solfege_common::practice::{Level, Question, Session};
use solfege_common::Result;

#[async_trait]
pub trait PracticeManager: Send + Sync {
    /// Build the level catalog
    async fn prepare_to_practice(&self) -> Result<()>;

    async fn move_to_previous_level(&self) -> Result<Level>;

    async fn move_to_next_level(&self) -> Result<Level>;

    async fn move_to_random_level(&self) -> Result<Level>;

    async fn move_to_first_level(&self) -> Result<Level>;

    /// Begin an empty session stamped with the current time
    async fn start_session(&self) -> Result<Session>;

    /// End the running session and return the level carrying it
    ///
    /// Custom levels get the session in memory only. Empty sessions are
    /// dropped. Otherwise the session is saved and appended to the history.
    async fn stop_current_session(&self) -> Result<Level>;

    /// Install a caller-built level (usually an edited note subset) as current
    async fn use_temporary_level(&self, level: Level) -> Result<Level>;

    async fn move_to_next_question(&self) -> Result<Question>;

    /// Count a correct identification of `question.answer`
    ///
    /// Answering the same question twice leaves the session unchanged.
    async fn log_correct_answer(&self, note: Note, question: &Question) -> Result<Session>;

    /// Count a wrong identification of `question.answer` (not of `note`)
    ///
    /// Answering the same question twice leaves the session unchanged.
    async fn log_wrong_answer(&self, note: Note, question: &Question) -> Result<Session>;
}
