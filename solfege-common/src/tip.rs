//! Onboarding tips

/// Control a tip points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipTarget {
    TitleView,
    StartStopButton,
    RepeatButton,
    PreviousButton,
    NextButton,
    RandomButton,
    HomeButton,
    AccuracyRing,
    ConfigureLevelButton,
    Keyboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip {
    pub target: TipTarget,
    pub title: String,
    pub message: String,
    pub action_title: String,
}

impl Tip {
    pub fn new(
        target: TipTarget,
        title: impl Into<String>,
        message: impl Into<String>,
        action_title: impl Into<String>,
    ) -> Self {
        Self {
            target,
            title: title.into(),
            message: message.into(),
            action_title: action_title.into(),
        }
    }
}
