//! Pitch classes and notes
//!
//! `NoteName` is one of the 12 pitch classes, stored with a fixed base offset
//! (C = 12) so that the raw value doubles as a MIDI key number inside octave 0.
//! All interval arithmetic wraps within the 12-class cycle. Flat spellings are
//! aliases of their sharp equivalent, never separate variants.

use crate::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Number of pitch classes in an octave
pub const PITCH_CLASS_COUNT: u8 = 12;

/// One of the 12 pitch classes, canonical sharp spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum NoteName {
    C = 12,
    CSharp = 13,
    D = 14,
    DSharp = 15,
    E = 16,
    F = 17,
    FSharp = 18,
    G = 19,
    GSharp = 20,
    A = 21,
    ASharp = 22,
    B = 23,
}

impl NoteName {
    pub const D_FLAT: NoteName = NoteName::CSharp;
    pub const E_FLAT: NoteName = NoteName::DSharp;
    pub const E_SHARP: NoteName = NoteName::F;
    pub const F_FLAT: NoteName = NoteName::E;
    pub const G_FLAT: NoteName = NoteName::FSharp;
    pub const A_FLAT: NoteName = NoteName::GSharp;
    pub const B_FLAT: NoteName = NoteName::ASharp;

    /// Raw value of C, the lowest pitch class
    pub const BASE: u8 = 12;

    /// All pitch classes in ascending order
    pub const ALL: [NoteName; 12] = [
        NoteName::C,
        NoteName::CSharp,
        NoteName::D,
        NoteName::DSharp,
        NoteName::E,
        NoteName::F,
        NoteName::FSharp,
        NoteName::G,
        NoteName::GSharp,
        NoteName::A,
        NoteName::ASharp,
        NoteName::B,
    ];

    /// Raw value including the base offset (C = 12 .. B = 23)
    pub fn raw(self) -> u8 {
        self as u8
    }

    /// Inverse of [`NoteName::raw`]
    pub fn from_raw(raw: u8) -> Option<Self> {
        raw.checked_sub(Self::BASE)
            .and_then(|pc| Self::ALL.get(pc as usize).copied())
    }

    /// Pitch class 0 (C) through 11 (B)
    pub fn pitch_class(self) -> u8 {
        self.raw() - Self::BASE
    }

    /// Pitch class for any integer, wrapping into 0..12
    pub fn from_pitch_class(pitch_class: i32) -> Self {
        Self::ALL[pitch_class.rem_euclid(PITCH_CLASS_COUNT as i32) as usize]
    }

    /// Move by a signed number of half steps, wrapping around the octave
    pub fn half_steps(self, count: i32) -> Self {
        Self::from_pitch_class(self.pitch_class() as i32 + count)
    }

    // Intervals

    pub fn major_third(self) -> Self {
        self.half_steps(4)
    }

    pub fn minor_third(self) -> Self {
        self.half_steps(3)
    }

    pub fn fourth(self) -> Self {
        self.half_steps(5)
    }

    pub fn fifth(self) -> Self {
        self.half_steps(7)
    }

    pub fn step(self) -> Self {
        self.half_steps(2)
    }

    pub fn half_step(self) -> Self {
        self.half_steps(1)
    }

    pub fn major_third_down(self) -> Self {
        self.half_steps(-4)
    }

    pub fn minor_third_down(self) -> Self {
        self.half_steps(-3)
    }

    pub fn fourth_down(self) -> Self {
        self.half_steps(-5)
    }

    pub fn fifth_down(self) -> Self {
        self.half_steps(-7)
    }

    pub fn step_down(self) -> Self {
        self.half_steps(-2)
    }

    pub fn half_step_down(self) -> Self {
        self.half_steps(-1)
    }

    /// Scale-degree offset of this pitch class above `key`, always 0..=11
    pub fn index_in_key(self, key: NoteName) -> usize {
        (self.pitch_class() as i32 - key.pitch_class() as i32).rem_euclid(12) as usize
    }

    /// Pitch class sitting `index` half steps above `key`
    ///
    /// Total over every index; values past 11 wrap.
    pub fn note_at(index: usize, key: NoteName) -> Self {
        key.half_steps((index % PITCH_CLASS_COUNT as usize) as i32)
    }

    /// Canonical lowercase sharp-based word, as written to storage
    pub fn canonical_name(self) -> &'static str {
        match self {
            NoteName::C => "c",
            NoteName::CSharp => "csharp",
            NoteName::D => "d",
            NoteName::DSharp => "dsharp",
            NoteName::E => "e",
            NoteName::F => "f",
            NoteName::FSharp => "fsharp",
            NoteName::G => "g",
            NoteName::GSharp => "gsharp",
            NoteName::A => "a",
            NoteName::ASharp => "asharp",
            NoteName::B => "b",
        }
    }

    /// Letter name with both spellings for black keys
    pub fn letter(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::CSharp => "C♯ / D♭",
            NoteName::D => "D",
            NoteName::DSharp => "D♯ / E♭",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::FSharp => "F♯ / G♭",
            NoteName::G => "G",
            NoteName::GSharp => "G♯ / A♭",
            NoteName::A => "A",
            NoteName::ASharp => "A♯ / B♭",
            NoteName::B => "B",
        }
    }

    /// Movable-do syllable relative to `key`
    pub fn solfege(self, key: NoteName) -> &'static str {
        SOLFEGE_NAMES[self.index_in_key(key)]
    }
}

const SOLFEGE_NAMES: [&str; 12] = [
    "Do",
    "Di / Ra",
    "Re",
    "Ri / Me",
    "Mi",
    "Fa",
    "Fi / Se",
    "Sol",
    "Si / Le",
    "La",
    "Li / Te",
    "Ti",
];

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl FromStr for NoteName {
    type Err = Error;

    /// Accepts canonical words (`csharp`), flat words (`dflat`) and symbols
    /// (`c#`, `db`), in any letter case.
    fn from_str(s: &str) -> Result<Self> {
        let name = match s.trim().to_lowercase().as_str() {
            "c" => NoteName::C,
            "csharp" | "dflat" | "c#" | "db" | "c♯" | "d♭" => NoteName::CSharp,
            "d" => NoteName::D,
            "dsharp" | "eflat" | "d#" | "eb" | "d♯" | "e♭" => NoteName::DSharp,
            "e" | "fflat" | "fb" | "f♭" => NoteName::E,
            "f" | "esharp" | "e#" | "e♯" => NoteName::F,
            "fsharp" | "gflat" | "f#" | "gb" | "f♯" | "g♭" => NoteName::FSharp,
            "g" => NoteName::G,
            "gsharp" | "aflat" | "g#" | "ab" | "g♯" | "a♭" => NoteName::GSharp,
            "a" => NoteName::A,
            "asharp" | "bflat" | "a#" | "bb" | "a♯" | "b♭" => NoteName::ASharp,
            "b" => NoteName::B,
            _ => return Err(Error::InvalidInput(format!("Unknown note name: {:?}", s))),
        };

        Ok(name)
    }
}

/// A pitch class placed in a register of the practice range
///
/// Ordered by octave first, then pitch class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub name: NoteName,
    pub octave: u8,
}

impl Note {
    pub fn new(name: NoteName, octave: u8) -> Self {
        Self { name, octave }
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> Ordering {
        self.octave
            .cmp(&other.octave)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.octave)
    }
}

impl FromStr for Note {
    type Err = Error;

    /// Parses `name:octave` (`csharp:1`) or a name followed by digits (`C#1`)
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, octave) = match s.split_once(':') {
            Some(parts) => parts,
            None => {
                let split = s
                    .find(|c: char| c.is_ascii_digit())
                    .ok_or_else(|| Error::InvalidInput(format!("Missing octave in note: {:?}", s)))?;
                s.split_at(split)
            }
        };

        let octave = octave
            .trim()
            .parse::<u8>()
            .map_err(|e| Error::InvalidInput(format!("Invalid octave in note {:?}: {}", s, e)))?;

        Ok(Note::new(name.parse()?, octave))
    }
}
