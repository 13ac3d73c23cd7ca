//! # Solfege Trainer
//!
//! Decision core of the ear trainer:
//! - Level and resolution generators (exercise content)
//! - Practice manager (level catalog, sessions, questions, scoring)
//! - Application loop (action reducer plus effect driver)
//! - Collaborators: session storage, preferences, onboarding tips, note player

pub mod app;
pub mod generator;
pub mod player;
pub mod practice;
pub mod preferences;
pub mod storage;
pub mod tips;
