//! Session history persistence
//!
//! Sessions are appended one record per line, grouped per level id.
//! Only sessions with at least one scored note are ever written.

pub mod format;
mod file;
mod memory;

pub use file::FileSessionStorage;
pub use memory::MemorySessionStorage;

use async_trait::async_trait;
use solfege_common::practice::{Level, Session};
use solfege_common::Result;

/// Append-only store of practice sessions
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Append `session` to the history of `level`; no-op for an empty session
    async fn save_session(&self, session: &Session, level: &Level) -> Result<()>;

    /// Most recent sessions recorded for `level`, oldest first
    async fn load_sessions(&self, level: &Level) -> Result<Vec<Session>>;
}
