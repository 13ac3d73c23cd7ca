//! MIDI sequencing player
//!
//! Converts notes and cadences to MIDI key numbers, publishes them on a
//! broadcast channel and waits out their musical duration. A synthesizer
//! front end (or a test) subscribes to the channel.

use super::{MidiEvent, NotePlayer, PlaybackTiming};
use async_trait::async_trait;
use solfege_common::music::{Cadence, Note, NoteName};
use solfege_common::{Error, Result};
use std::collections::HashMap;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

const NOTE_VELOCITY: u8 = 76;

/// MIDI octave holding cadence voices and practice octave 1
const CADENCE_MIDI_OCTAVE: u8 = 4;

#[derive(Default)]
struct PlayerState {
    prepared: bool,
    /// Chord key numbers, memoized per cadence
    progressions: HashMap<Cadence, Vec<Vec<u8>>>,
}

pub struct SequencedNotePlayer {
    timing: PlaybackTiming,
    /// Held for the whole of each call, so playback never overlaps
    state: Mutex<PlayerState>,
    event_tx: broadcast::Sender<MidiEvent>,
}

impl SequencedNotePlayer {
    pub fn new(timing: PlaybackTiming) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            timing,
            state: Mutex::new(PlayerState::default()),
            event_tx,
        }
    }

    pub fn timing(&self) -> PlaybackTiming {
        self.timing
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MidiEvent> {
        self.event_tx.subscribe()
    }

    /// MIDI key number of a pitch class in a MIDI octave (C4 = 60)
    pub fn key_number(name: NoteName, midi_octave: u8) -> u8 {
        name.raw() + midi_octave * 12
    }

    /// MIDI key number of a practice note: octave 0 maps to MIDI octave 3,
    /// octave 1 to 4, anything higher to 5
    pub fn note_key_number(note: Note) -> u8 {
        let midi_octave = match note.octave {
            0 => 3,
            1 => 4,
            _ => 5,
        };
        Self::key_number(note.name, midi_octave)
    }

    /// Chord key numbers: each voice in MIDI octave 4, shifted by the movement row
    pub fn progression(cadence: &Cadence) -> Vec<Vec<u8>> {
        cadence
            .chords()
            .map(|chord| {
                chord
                    .into_iter()
                    .map(|(voice, offset)| {
                        let key = Self::key_number(voice, CADENCE_MIDI_OCTAVE) as i16 + offset as i16;
                        key.clamp(0, 127) as u8
                    })
                    .collect()
            })
            .collect()
    }

    /// Number of distinct cadences voiced so far
    pub async fn cached_progressions(&self) -> usize {
        self.state.lock().await.progressions.len()
    }

    fn send(&self, event: MidiEvent) {
        // No receivers is fine
        let _ = self.event_tx.send(event);
    }
}

#[async_trait]
impl NotePlayer for SequencedNotePlayer {
    async fn prepare_to_play(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.prepared {
            state.prepared = true;
            info!("Note player ready at {} bpm", self.timing.bpm);
        }
        Ok(())
    }

    async fn play_note(&self, note: Note) -> Result<()> {
        let state = self.state.lock().await;
        if !state.prepared {
            return Err(Error::Playback("Player used before prepare_to_play".to_string()));
        }

        let key = Self::note_key_number(note);
        debug!("Playing {} (MIDI {})", note, key);
        self.send(MidiEvent::Note {
            key,
            velocity: NOTE_VELOCITY,
        });

        tokio::time::sleep(self.timing.note_duration()).await;
        drop(state);
        Ok(())
    }

    async fn play_cadence(&self, cadence: &Cadence) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.prepared {
            return Err(Error::Playback("Player used before prepare_to_play".to_string()));
        }

        let progression = state
            .progressions
            .entry(cadence.clone())
            .or_insert_with(|| Self::progression(cadence))
            .clone();

        debug!("Playing cadence on {:?}", cadence.roots().first());
        tokio::time::sleep(self.timing.cadence_padding()).await;

        for keys in progression {
            self.send(MidiEvent::Chord {
                keys,
                velocity: NOTE_VELOCITY,
            });
            tokio::time::sleep(self.timing.beats(1.0)).await;
        }

        tokio::time::sleep(self.timing.cadence_padding()).await;
        drop(state);
        Ok(())
    }
}
