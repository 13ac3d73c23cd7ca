//! Onboarding tip sequencing
//!
//! Tip text is carried as localization keys; rendering them is up to the
//! presentation layer.

use solfege_common::tip::{Tip, TipTarget};
use std::sync::{Mutex, PoisonError};

/// Single-cursor tip source: advances on every call, never rewinds
pub trait TipProvider: Send + Sync {
    /// Next tip, or None once the sequence is exhausted
    fn next_tip(&self) -> Option<Tip>;
}

pub struct SequentialTipProvider {
    tips: Vec<Tip>,
    next: Mutex<usize>,
}

impl SequentialTipProvider {
    pub fn new(tips: Vec<Tip>) -> Self {
        Self {
            tips,
            next: Mutex::new(0),
        }
    }

    /// The first-launch walkthrough
    pub fn onboarding() -> Self {
        const NEXT: &str = "tip.next";

        Self::new(vec![
            Tip::new(TipTarget::StartStopButton, "tip.howItWorks.title", "tip.howItWorks.content", NEXT),
            Tip::new(TipTarget::StartStopButton, "tip.howItWorks.title", "tip.howItWorks.content.1", NEXT),
            Tip::new(TipTarget::StartStopButton, "tip.howItWorks.title", "tip.howItWorks.content.2", NEXT),
            Tip::new(TipTarget::Keyboard, "tip.keyboard.title", "tip.keyboard.content", NEXT),
            Tip::new(TipTarget::TitleView, "tip.currentLevel.title", "tip.currentLevel.content", NEXT),
            Tip::new(TipTarget::NextButton, "tip.nextLevel.title", "tip.nextLevel.content", NEXT),
            Tip::new(TipTarget::PreviousButton, "tip.previousLevel.title", "tip.previousLevel.content", NEXT),
            Tip::new(TipTarget::RandomButton, "tip.randomLevel.title", "tip.randomLevel.content", NEXT),
            Tip::new(TipTarget::HomeButton, "tip.firstLevel.title", "tip.firstLevel.content", NEXT),
            Tip::new(TipTarget::ConfigureLevelButton, "tip.configureLevel.title", "tip.configureLevel.content", NEXT),
            Tip::new(TipTarget::AccuracyRing, "tip.accuracyRing.title", "tip.accuracyRing.content", NEXT),
            Tip::new(TipTarget::StartStopButton, "tip.getStarted.title", "tip.getStarted.content", "tip.getStarted.button"),
        ])
    }

    pub fn len(&self) -> usize {
        self.tips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tips.is_empty()
    }
}

impl TipProvider for SequentialTipProvider {
    fn next_tip(&self) -> Option<Tip> {
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        let tip = self.tips.get(*next).cloned()?;
        *next += 1;
        Some(tip)
    }
}
