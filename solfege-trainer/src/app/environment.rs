//! Collaborators reachable from the reducer and its effects

use crate::player::NotePlayer;
use crate::practice::PracticeManager;
use crate::preferences::Preferences;
use crate::tips::TipProvider;
use solfege_common::{Error, Result};
use std::sync::{Arc, Weak};

pub struct Environment {
    pub note_player: Arc<dyn NotePlayer>,
    pub practice_manager: Arc<dyn PracticeManager>,
    pub preferences: Arc<dyn Preferences>,
    pub tip_provider: Arc<dyn TipProvider>,
}

impl Environment {
    pub fn new(
        note_player: Arc<dyn NotePlayer>,
        practice_manager: Arc<dyn PracticeManager>,
        preferences: Arc<dyn Preferences>,
        tip_provider: Arc<dyn TipProvider>,
    ) -> Self {
        Self {
            note_player,
            practice_manager,
            preferences,
            tip_provider,
        }
    }
}

/// Upgrade an effect's environment handle, failing once the loop is gone
pub(crate) fn upgrade(environment: &Weak<Environment>) -> Result<Arc<Environment>> {
    environment
        .upgrade()
        .ok_or_else(|| Error::unexpected("Application environment was torn down"))
}
