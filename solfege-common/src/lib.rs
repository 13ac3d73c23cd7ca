//! # Solfege Common Library
//!
//! Shared code for the ear trainer:
//! - Music primitives (pitch classes, notes, cadences)
//! - Practice models (levels, sessions, questions)
//! - Onboarding tip types
//! - Configuration loading
//! - Error and timestamp utilities

pub mod config;
pub mod error;
pub mod music;
pub mod practice;
pub mod time;
pub mod tip;

pub use error::{Error, Result};
