//! Practice models: levels, sessions and questions

mod level;
mod question;
mod session;

pub use level::{Level, LevelSummary, Mode, NoteRange};
pub use question::Question;
pub use session::{Score, Session, SessionSummary};
