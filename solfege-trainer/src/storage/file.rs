//! File-backed session storage
//!
//! Layout: `<data_dir>/sessions/sessions_<level id>.txt`, one record per line.

use super::format::{format_record, parse_records};
use super::SessionStorage;
use async_trait::async_trait;
use solfege_common::practice::{Level, Session};
use solfege_common::Result;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

const SESSIONS_DIR: &str = "sessions";

pub struct FileSessionStorage {
    root: PathBuf,
    /// Serializes appends so records never interleave
    write_lock: Mutex<()>,
}

impl FileSessionStorage {
    /// Storage rooted at `<data_dir>/sessions`; the folder is created on first save
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root: data_dir.as_ref().join(SESSIONS_DIR),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn sessions_file(&self, level: &Level) -> PathBuf {
        self.root.join(format!("sessions_{}.txt", level.id))
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn save_session(&self, session: &Session, level: &Level) -> Result<()> {
        if session.is_empty() {
            debug!("Not saving empty session for level {}", level.id);
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;

        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.sessions_file(level);
        let mut line = format_record(session);
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        info!(
            "Saved session for level {} ({} notes) to {}",
            level.id,
            session.score.len(),
            path.display()
        );
        Ok(())
    }

    async fn load_sessions(&self, level: &Level) -> Result<Vec<Session>> {
        let path = self.sessions_file(level);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let sessions = parse_records(&content);
        debug!("Loaded {} sessions for level {}", sessions.len(), level.id);
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{DiatonicLevelGenerator, LevelGenerator};
    use solfege_common::music::{Note, NoteName};
    use solfege_common::practice::{Mode, NoteRange};
    use tempfile::TempDir;

    fn level(id: u32) -> Level {
        DiatonicLevelGenerator::new()
            .make_level(id, NoteName::C, Mode::Major, false, false, NoteRange::EntireOctave)
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(dir.path());

        let sessions = storage.load_sessions(&level(1)).await.unwrap();
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_empty_session_is_not_written() {
        let dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(dir.path());

        storage
            .save_session(&Session::new(solfege_common::time::now()), &level(1))
            .await
            .unwrap();

        assert!(!storage.root().join("sessions_1.txt").exists());
    }

    #[tokio::test]
    async fn test_appends_per_level() {
        let dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(dir.path());
        let note = Note::new(NoteName::E, 1);
        let session = Session::new(solfege_common::time::now()).recording_correct(note);

        storage.save_session(&session, &level(3)).await.unwrap();
        storage.save_session(&session, &level(3)).await.unwrap();
        storage.save_session(&session, &level(4)).await.unwrap();

        assert_eq!(storage.load_sessions(&level(3)).await.unwrap().len(), 2);
        assert_eq!(storage.load_sessions(&level(4)).await.unwrap().len(), 1);
        assert!(dir.path().join("sessions").join("sessions_3.txt").exists());
    }
}
