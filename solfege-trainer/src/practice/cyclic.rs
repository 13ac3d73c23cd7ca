//! Cyclic level catalog
//!
//! Keys progress by fourths. Each key contributes its major levels then its
//! minor levels; each mode diatonic then chromatic; each of those the three
//! note ranges. Navigation wraps at both ends.

use super::PracticeManager;
use crate::generator::{LevelGenerator, NoteResolutionGenerator};
use crate::preferences::{PreferenceKey, Preferences};
use crate::storage::SessionStorage;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use solfege_common::music::{Note, NoteName};
use solfege_common::practice::{Level, Mode, NoteRange, Question, Session};
use solfege_common::{time, Error, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Catalog key order
pub const KEYS_IN_FOURTHS: [NoteName; 12] = [
    NoteName::C,
    NoteName::F,
    NoteName::B_FLAT,
    NoteName::E_FLAT,
    NoteName::A_FLAT,
    NoteName::D_FLAT,
    NoteName::G_FLAT,
    NoteName::B,
    NoteName::E,
    NoteName::A,
    NoteName::D,
    NoteName::G,
];

#[derive(Default)]
struct PracticeState {
    levels: Vec<Level>,
    /// None until the first move: the next move forward lands on index 0
    cursor: Option<usize>,
    current_level: Option<Level>,
    current_session: Option<Session>,
    current_question: Option<Question>,
    /// Shuffled notes of the current level
    queue: Vec<Note>,
    /// Index of the last asked note in `queue`
    queue_position: Option<usize>,
    last_asked: Option<Note>,
    last_answered: Option<Uuid>,
}

pub struct CyclicPracticeManager {
    storage: Arc<dyn SessionStorage>,
    level_generator: Arc<dyn LevelGenerator>,
    resolution_generator: Arc<dyn NoteResolutionGenerator>,
    preferences: Arc<dyn Preferences>,
    state: Mutex<PracticeState>,
}

impl CyclicPracticeManager {
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        level_generator: Arc<dyn LevelGenerator>,
        resolution_generator: Arc<dyn NoteResolutionGenerator>,
        preferences: Arc<dyn Preferences>,
    ) -> Self {
        Self {
            storage,
            level_generator,
            resolution_generator,
            preferences,
            state: Mutex::new(PracticeState::default()),
        }
    }

    /// Snapshot of the catalog (empty before `prepare_to_practice`)
    pub async fn catalog(&self) -> Vec<Level> {
        self.state.lock().await.levels.clone()
    }

    /// Index of the current catalog level
    pub async fn cursor(&self) -> Option<usize> {
        self.state.lock().await.cursor
    }

    fn make_catalog(&self) -> Result<Vec<Level>> {
        let mut levels = Vec::with_capacity(KEYS_IN_FOURTHS.len() * 12);
        let mut id = 1;

        for key in KEYS_IN_FOURTHS {
            for mode in [Mode::Major, Mode::Minor] {
                for include_chromatic in [false, true] {
                    for range in NoteRange::ALL {
                        levels.push(self.level_generator.make_level(
                            id,
                            key,
                            mode,
                            false,
                            include_chromatic,
                            range,
                        )?);
                        id += 1;
                    }
                }
            }
        }

        Ok(levels)
    }

    /// Load history for the catalog level at `cursor` and make it current
    ///
    /// The cursor is written to preferences before any state changes, so a
    /// failed write leaves the manager on its previous level.
    async fn enter_level(&self, state: &mut PracticeState, cursor: usize) -> Result<Level> {
        let base = state
            .levels
            .get(cursor)
            .ok_or_else(|| Error::unexpected("Cursor is outside the level catalog"))?;

        let sessions = self.storage.load_sessions(base).await?;
        let level = base.with_sessions(sessions);

        self.persist_cursor(cursor).await?;

        state.levels[cursor] = level.clone();
        state.cursor = Some(cursor);
        install_level(state, level.clone());

        info!(
            "Moved to level {} ({}) with {} past sessions",
            level.id,
            level.title(),
            level.sessions.len()
        );
        Ok(level)
    }

    async fn persist_cursor(&self, cursor: usize) -> Result<()> {
        let preferences = Arc::clone(&self.preferences);
        tokio::task::spawn_blocking(move || {
            preferences.set_int(PreferenceKey::LatestPracticeCursor, cursor as i64)
        })
        .await
        .map_err(|e| Error::unexpected(format!("Cursor write task failed: {}", e)))?
        .map_err(|e| {
            error!("Failed to persist practice cursor {}: {}", cursor, e);
            e
        })
    }
}

fn install_level(state: &mut PracticeState, level: Level) {
    state.queue = shuffled(&level.notes, None);
    state.queue_position = None;
    state.current_question = None;
    state.current_level = Some(level);
}

fn ensure_catalog(state: &PracticeState) -> Result<usize> {
    match state.levels.len() {
        0 => Err(Error::unexpected("Level catalog is empty")),
        len => Ok(len),
    }
}

/// Shuffle `notes`; with more than one note, never start with `avoid`
fn shuffled(notes: &[Note], avoid: Option<Note>) -> Vec<Note> {
    let mut rng = rand::thread_rng();
    let mut queue = notes.to_vec();
    queue.shuffle(&mut rng);

    if queue.len() > 1 && queue.first().copied() == avoid && avoid.is_some() {
        let swap_with = rng.gen_range(1..queue.len());
        queue.swap(0, swap_with);
    }

    queue
}

#[async_trait]
impl PracticeManager for CyclicPracticeManager {
    async fn prepare_to_practice(&self) -> Result<()> {
        let levels = self.make_catalog()?;
        let mut state = self.state.lock().await;

        let stored = self.preferences.int(PreferenceKey::LatestPracticeCursor);
        state.cursor = match stored {
            Some(index) if index >= 0 && (index as usize) < levels.len() => {
                // One before, so the next forward move resumes on the stored level
                (index as usize).checked_sub(1)
            }
            Some(index) => {
                warn!("Ignoring stored practice cursor {} outside catalog", index);
                None
            }
            None => None,
        };

        info!(
            "Level catalog ready: {} levels, resuming at {:?}",
            levels.len(),
            stored
        );
        state.levels = levels;
        Ok(())
    }

    async fn move_to_previous_level(&self) -> Result<Level> {
        let mut state = self.state.lock().await;
        let len = ensure_catalog(&state)?;

        let cursor = match state.cursor {
            Some(cursor) if cursor > 0 && cursor < len => cursor - 1,
            _ => len - 1,
        };

        self.enter_level(&mut state, cursor).await
    }

    async fn move_to_next_level(&self) -> Result<Level> {
        let mut state = self.state.lock().await;
        let len = ensure_catalog(&state)?;

        let cursor = match state.cursor {
            Some(cursor) if cursor + 1 < len => cursor + 1,
            _ => 0,
        };

        self.enter_level(&mut state, cursor).await
    }

    async fn move_to_random_level(&self) -> Result<Level> {
        let mut state = self.state.lock().await;
        let len = ensure_catalog(&state)?;

        let cursor = rand::thread_rng().gen_range(0..len);

        self.enter_level(&mut state, cursor).await
    }

    async fn move_to_first_level(&self) -> Result<Level> {
        let mut state = self.state.lock().await;
        ensure_catalog(&state)?;

        self.enter_level(&mut state, 0).await
    }

    async fn start_session(&self) -> Result<Session> {
        let mut state = self.state.lock().await;
        let session = Session::new(time::now());

        state.current_session = Some(session.clone());
        state.last_answered = None;

        info!("Session started at {}", session.timestamp);
        Ok(session)
    }

    async fn stop_current_session(&self) -> Result<Level> {
        let mut state = self.state.lock().await;

        let level = state
            .current_level
            .clone()
            .ok_or_else(|| Error::unexpected("No level selected"))?;
        let session = state
            .current_session
            .clone()
            .ok_or(Error::NoSessionInProgress)?;

        if level.is_custom {
            state.current_session = None;
            info!("Session on custom level kept in memory only");
            return Ok(level.with_sessions(vec![session]));
        }

        if session.is_empty() {
            state.current_session = None;
            debug!("Discarding empty session");
            return Ok(level);
        }

        self.storage.save_session(&session, &level).await?;
        state.current_session = None;

        let mut sessions = level.sessions.clone();
        sessions.push(session);
        let level = level.with_sessions(sessions);

        if let Some(cursor) = state.cursor {
            if state.levels.get(cursor).map(|l| l.id) == Some(level.id) {
                state.levels[cursor] = level.clone();
            }
        }
        state.current_level = Some(level.clone());

        info!(
            "Session stopped and saved for level {} ({} sessions)",
            level.id,
            level.sessions.len()
        );
        Ok(level)
    }

    async fn use_temporary_level(&self, level: Level) -> Result<Level> {
        let mut state = self.state.lock().await;

        info!("Using temporary level with {} notes", level.notes.len());
        install_level(&mut state, level.clone());

        Ok(level)
    }

    async fn move_to_next_question(&self) -> Result<Question> {
        let mut state = self.state.lock().await;

        let level = state
            .current_level
            .clone()
            .ok_or_else(|| Error::unexpected("No level selected"))?;

        let next = state.queue_position.map_or(0, |position| position + 1);
        let position = if next >= state.queue.len() {
            state.queue = shuffled(&level.notes, state.last_asked);
            0
        } else {
            next
        };

        let note = *state
            .queue
            .get(position)
            .ok_or_else(|| Error::unexpected("Level has no notes to ask"))?;

        let resolution =
            self.resolution_generator
                .resolution(note, level.key, level.mode, level.is_chromatic);
        let question = Question::new(note, resolution);

        state.queue_position = Some(position);
        state.last_asked = Some(note);
        state.current_question = Some(question.clone());

        debug!("Next question {} asks for {}", question.id, note);
        Ok(question)
    }

    async fn log_correct_answer(&self, note: Note, question: &Question) -> Result<Session> {
        let mut state = self.state.lock().await;

        let session = state
            .current_session
            .clone()
            .ok_or(Error::NoSessionInProgress)?;

        if state.last_answered == Some(question.id) {
            debug!("Question {} already answered", question.id);
            return Ok(session);
        }

        let session = session.recording_correct(question.answer);
        state.last_answered = Some(question.id);
        state.current_session = Some(session.clone());

        debug!("Correct: {} for {}", note, question.answer);
        Ok(session)
    }

    async fn log_wrong_answer(&self, note: Note, question: &Question) -> Result<Session> {
        let mut state = self.state.lock().await;

        let session = state
            .current_session
            .clone()
            .ok_or(Error::NoSessionInProgress)?;

        if state.last_answered == Some(question.id) {
            debug!("Question {} already answered", question.id);
            return Ok(session);
        }

        let session = session.recording_wrong(question.answer);
        state.last_answered = Some(question.id);
        state.current_session = Some(session.clone());

        debug!("Wrong: {} for {}", note, question.answer);
        Ok(session)
    }
}
