//! In-memory session storage
//!
//! Keeps formatted record lines per level id, so it behaves like the file
//! store (same format, same load limit) without touching disk.

use super::format::{format_record, parse_records};
use super::SessionStorage;
use async_trait::async_trait;
use solfege_common::practice::{Level, Session};
use solfege_common::Result;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemorySessionStorage {
    records: RwLock<HashMap<u32, Vec<String>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw record lines stored for a level id
    pub async fn records(&self, level_id: u32) -> Vec<String> {
        self.records
            .read()
            .await
            .get(&level_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Seed raw lines, as if read from an existing file
    pub async fn insert_raw(&self, level_id: u32, line: impl Into<String>) {
        self.records
            .write()
            .await
            .entry(level_id)
            .or_default()
            .push(line.into());
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn save_session(&self, session: &Session, level: &Level) -> Result<()> {
        if session.is_empty() {
            return Ok(());
        }

        self.insert_raw(level.id, format_record(session)).await;
        Ok(())
    }

    async fn load_sessions(&self, level: &Level) -> Result<Vec<Session>> {
        let content = self.records(level.id).await.join("\n");
        Ok(parse_records(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{DiatonicLevelGenerator, LevelGenerator};
    use solfege_common::music::{Note, NoteName};
    use solfege_common::practice::{Mode, NoteRange};

    #[tokio::test]
    async fn test_raw_lines_share_file_format() {
        let storage = MemorySessionStorage::new();
        let level = DiatonicLevelGenerator::new()
            .make_level(9, NoteName::A, Mode::Minor, false, false, NoteRange::FirstHalfOfOctave)
            .unwrap();

        storage.insert_raw(9, "1000;a:1:2:0,bflat:1:1:1").await;
        storage.insert_raw(9, "garbage").await;

        let session = Session::new(solfege_common::time::now())
            .recording_wrong(Note::new(NoteName::B, 1));
        storage.save_session(&session, &level).await.unwrap();
        storage
            .save_session(&Session::new(solfege_common::time::now()), &level)
            .await
            .unwrap();

        let sessions = storage.load_sessions(&level).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].score.len(), 2);
        assert_eq!(storage.records(9).await.len(), 3);
    }
}
