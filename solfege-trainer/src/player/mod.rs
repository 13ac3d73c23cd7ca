//! Note playback
//!
//! The trainer only needs three calls from an audio device: get ready, play a
//! note, play a cadence. Each call returns once the sound has had its time.

mod sequenced;

pub use sequenced::SequencedNotePlayer;

use async_trait::async_trait;
use solfege_common::config::DEFAULT_TEMPO_BPM;
use solfege_common::music::{Cadence, Note};
use solfege_common::Result;
use std::time::Duration;

#[async_trait]
pub trait NotePlayer: Send + Sync {
    async fn prepare_to_play(&self) -> Result<()>;

    /// Play one note and wait until it has settled
    async fn play_note(&self, note: Note) -> Result<()>;

    /// Play the whole progression and wait for it to finish
    async fn play_cadence(&self, cadence: &Cadence) -> Result<()>;
}

/// Sound emitted by a player, as MIDI key numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiEvent {
    Note { key: u8, velocity: u8 },
    Chord { keys: Vec<u8>, velocity: u8 },
}

/// Musical durations derived from a tempo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackTiming {
    pub bpm: f64,
    /// Skip every wait (tests, headless runs)
    pub instant: bool,
}

impl PlaybackTiming {
    /// Beats a single note is given before the next call may proceed
    pub const NOTE_BEATS: f64 = 0.75;

    /// Silence before and after a cadence
    pub const CADENCE_PADDING: Duration = Duration::from_millis(250);

    pub fn new(bpm: f64) -> Self {
        Self { bpm, instant: false }
    }

    pub fn instant() -> Self {
        Self {
            bpm: DEFAULT_TEMPO_BPM,
            instant: true,
        }
    }

    pub fn beats(&self, beats: f64) -> Duration {
        if self.instant || !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(beats * 60.0 / self.bpm)
    }

    pub fn note_duration(&self) -> Duration {
        self.beats(Self::NOTE_BEATS)
    }

    pub fn cadence_padding(&self) -> Duration {
        if self.instant {
            Duration::ZERO
        } else {
            Self::CADENCE_PADDING
        }
    }

    /// Padding, one beat per chord, padding
    pub fn cadence_duration(&self, chords: usize) -> Duration {
        self.cadence_padding() * 2 + self.beats(chords as f64)
    }
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPO_BPM)
    }
}
