//! Questions asked during a session

use crate::music::Note;
use uuid::Uuid;

/// An ephemeral prompt: the note to identify and the path back to the tonic
///
/// Every question gets its own id, so two questions with the same answer are
/// still different entities. Answer de-duplication relies on this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: Uuid,
    pub answer: Note,
    pub resolution: Vec<Note>,
}

impl Question {
    pub fn new(answer: Note, resolution: Vec<Note>) -> Self {
        Self {
            id: Uuid::new_v4(),
            answer,
            resolution,
        }
    }
}
