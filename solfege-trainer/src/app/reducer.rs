//! Action reducer
//!
//! `next_state` maps the current state and one action to a new state and at
//! most one effect. It performs no I/O: everything slow or fallible is
//! described as an effect holding a weak handle on the environment.
//!
//! Answer protocol while practicing:
//!
//! ```text
//! QuestionLoaded -> play cadence + answer -> CadencePlayed (keyboard enabled)
//! NotePressed (correct) -> ResolutionNotePlayed -> ... one per resolution note
//!     -> log correct answer -> RightAnswerLogged -> next question
//! NotePressed (wrong) -> play pressed note + log wrong answer -> WrongAnswerLogged
//! ```

use super::environment::upgrade;
use super::{Action, AppState, Effect, Environment, Highlight};
use crate::preferences::PreferenceKey;
use solfege_common::music::Note;
use solfege_common::practice::{Level, Session};
use solfege_common::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Effect running `work` against the environment, if it still exists
fn with_environment<T, F, Fut>(
    environment: &Arc<Environment>,
    work: F,
    into_action: fn(Result<T>) -> Action,
) -> Effect
where
    T: Send + 'static,
    F: FnOnce(Arc<Environment>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let environment = Arc::downgrade(environment);
    Effect::task(
        async move {
            let environment = upgrade(&environment)?;
            work(environment).await
        },
        into_action,
    )
}

/// Compute the state following `action`, plus the effect to run next
pub fn next_state(
    environment: &Arc<Environment>,
    state: &AppState,
    action: Action,
) -> (AppState, Option<Effect>) {
    let mut next = state.clone();

    match action {
        // Lifecycle
        Action::Launched => {
            next.is_loading = true;

            let effect = with_environment(
                environment,
                |env| async move {
                    env.note_player.prepare_to_play().await?;
                    env.practice_manager.prepare_to_practice().await?;
                    env.practice_manager.move_to_next_level().await
                },
                Action::LevelLoaded,
            );
            (next, Some(effect))
        }

        // Onboarding
        Action::TipDismissed => {
            next.current_tip = environment.tip_provider.next_tip();
            next.is_interaction_enabled = next.current_tip.is_none();

            if next.current_tip.is_some() {
                return (next, None);
            }

            let weak = Arc::downgrade(environment);
            let persist = Effect::new(async move {
                let result = match upgrade(&weak) {
                    Ok(env) => {
                        let preferences = Arc::clone(&env.preferences);
                        drop(env);
                        tokio::task::spawn_blocking(move || {
                            preferences.set_bool(PreferenceKey::HasSeenOnboarding, true)
                        })
                        .await
                        .unwrap_or_else(|e| {
                            Err(Error::unexpected(format!("Preference write task failed: {}", e)))
                        })
                    }
                    Err(e) => Err(e),
                };
                if let Err(e) = result {
                    warn!("Failed to remember onboarding as seen: {}", e);
                }
                None
            });
            (next, Some(persist))
        }

        // Navigation bar
        Action::HomePressed => {
            next.is_loading = true;
            let effect = with_environment(
                environment,
                |env| async move { env.practice_manager.move_to_first_level().await },
                Action::LevelLoaded,
            );
            (next, Some(effect))
        }

        Action::RandomPressed => {
            next.is_loading = true;
            let effect = with_environment(
                environment,
                |env| async move { env.practice_manager.move_to_random_level().await },
                Action::LevelLoaded,
            );
            (next, Some(effect))
        }

        Action::PreviousLevelPressed => {
            next.is_loading = true;
            let effect = with_environment(
                environment,
                |env| async move { env.practice_manager.move_to_previous_level().await },
                Action::LevelLoaded,
            );
            (next, Some(effect))
        }

        Action::NextLevelPressed => {
            next.is_loading = true;
            let effect = with_environment(
                environment,
                |env| async move { env.practice_manager.move_to_next_level().await },
                Action::LevelLoaded,
            );
            (next, Some(effect))
        }

        Action::ConfigureLevelPressed => {
            next.is_level_editor_visible = true;
            (next, None)
        }

        Action::StartStopPressed => {
            next.is_practicing = !state.is_practicing;
            next.highlighted_note = None;

            let effect = if next.is_practicing {
                with_environment(
                    environment,
                    |env| async move { env.practice_manager.start_session().await },
                    Action::SessionStarted,
                )
            } else {
                with_environment(
                    environment,
                    |env| async move { env.practice_manager.stop_current_session().await },
                    Action::LevelLoaded,
                )
            };
            (next, Some(effect))
        }

        Action::RepeatQuestionPressed => {
            let question = match (&state.question, state.is_practicing) {
                (Some(question), true) => question.clone(),
                _ => return (next, None),
            };

            next.is_interaction_enabled = false;

            let level = state.level.clone();
            let effect = with_environment(
                environment,
                move |env| async move {
                    let level = level.ok_or_else(|| Error::unexpected("No level to repeat"))?;
                    env.note_player.play_cadence(&level.cadence).await?;
                    env.note_player.play_note(question.answer).await
                },
                Action::CadencePlayed,
            );
            (next, Some(effect))
        }

        Action::AccuracyRingPressed => {
            next.is_accuracy_screen_visible = true;
            (next, None)
        }

        // Keyboard
        Action::NotePressed(note) => note_pressed(environment, state, next, note),

        Action::NoteReleased(_) => (next, None),

        // Modals
        Action::LevelEditorDismissed => {
            next.is_level_editor_visible = false;
            (next, None)
        }

        Action::AccuracyScreenDismissed => {
            next.is_accuracy_screen_visible = false;
            (next, None)
        }

        Action::NotesSelected(notes) => {
            let level = state.level.clone();
            let base_level = state.base_level.clone();

            let effect = with_environment(
                environment,
                move |env| async move {
                    let level = level.ok_or_else(|| Error::unexpected("No level to edit"))?;

                    if same_notes(&notes, &level.notes) {
                        return Ok(level);
                    }
                    if let Some(base_level) = base_level {
                        if same_notes(&notes, &base_level.notes) {
                            return Ok(base_level);
                        }
                    }

                    env.practice_manager
                        .use_temporary_level(level.with_notes(notes))
                        .await
                },
                Action::LevelLoaded,
            );
            (next, Some(effect))
        }

        // Effect results
        Action::LevelLoaded(Ok(level)) => {
            let summary = level.summary();

            clear_error(&mut next);
            next.accuracy = summary.average;
            next.accuracy_per_note = summary.average_per_note;
            next.session = None;
            next.question = None;
            next.answer = None;
            next.highlighted_note = None;
            next.is_interaction_enabled = true;

            if !level.is_custom {
                next.base_level = Some(level.clone());
            }
            next.level = Some(level);

            if !environment
                .preferences
                .bool(PreferenceKey::HasSeenOnboarding)
            {
                next.current_tip = environment.tip_provider.next_tip();
                next.is_interaction_enabled = next.current_tip.is_none();
            }

            (next, None)
        }

        Action::SessionStarted(Ok(session)) | Action::RightAnswerLogged(Ok(session)) => {
            clear_error(&mut next);
            apply_session(&mut next, session);
            next.highlighted_note = None;
            next.is_interaction_enabled = true;

            let effect = with_environment(
                environment,
                |env| async move { env.practice_manager.move_to_next_question().await },
                Action::QuestionLoaded,
            );
            (next, Some(effect))
        }

        Action::WrongAnswerLogged(Ok(session)) => {
            clear_error(&mut next);
            apply_session(&mut next, session);
            next.is_interaction_enabled = true;
            (next, None)
        }

        Action::QuestionLoaded(Ok(question)) => {
            clear_error(&mut next);
            next.question = Some(question.clone());
            next.highlighted_note = None;
            next.is_interaction_enabled = false;

            let level = state.level.clone();
            let effect = with_environment(
                environment,
                move |env| async move {
                    let level = level.ok_or_else(|| Error::unexpected("No level for question"))?;
                    env.note_player.play_cadence(&level.cadence).await?;
                    env.note_player.play_note(question.answer).await
                },
                Action::CadencePlayed,
            );
            (next, Some(effect))
        }

        Action::CadencePlayed(Ok(())) => {
            next.is_interaction_enabled = true;
            (next, None)
        }

        Action::ResolutionNotePlayed(Ok(())) => {
            let Some((&note, remaining)) = state.currently_playing_resolution.split_first() else {
                let question = state.question.clone();
                let effect = with_environment(
                    environment,
                    move |env| async move {
                        let question =
                            question.ok_or_else(|| Error::unexpected("No question answered"))?;
                        env.practice_manager
                            .log_correct_answer(question.answer, &question)
                            .await
                    },
                    Action::RightAnswerLogged,
                );
                return (next, Some(effect));
            };

            next.highlighted_note = Some((note, Highlight::Correct));
            next.currently_playing_resolution = remaining.to_vec();

            let effect = with_environment(
                environment,
                move |env| async move { env.note_player.play_note(note).await },
                Action::ResolutionNotePlayed,
            );
            (next, Some(effect))
        }

        // Failures
        Action::LevelLoaded(Err(e))
        | Action::SessionStarted(Err(e))
        | Action::QuestionLoaded(Err(e))
        | Action::RightAnswerLogged(Err(e))
        | Action::WrongAnswerLogged(Err(e))
        | Action::ResolutionNotePlayed(Err(e))
        | Action::CadencePlayed(Err(e)) => {
            error!("Action failed: {}", e);
            next.error = Some(e);
            next.is_loading = false;
            next.has_error = true;
            (next, None)
        }
    }
}

fn note_pressed(
    environment: &Arc<Environment>,
    state: &AppState,
    mut next: AppState,
    note: Note,
) -> (AppState, Option<Effect>) {
    if !state.is_practicing {
        next.highlighted_note = Some((note, Highlight::Preview));

        let weak = Arc::downgrade(environment);
        let preview = Effect::new(async move {
            let result = match upgrade(&weak) {
                Ok(env) => env.note_player.play_note(note).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                warn!("Preview of {} failed: {}", note, e);
            }
            None
        });
        return (next, Some(preview));
    }

    let (level, question) = match (&state.level, &state.question) {
        (Some(level), Some(question)) => (level, question.clone()),
        _ => return (next, None),
    };

    let is_correct = if level.spans_multiple_octaves {
        note.name == question.answer.name
    } else {
        note == question.answer
    };

    next.answer = Some(note);
    next.is_interaction_enabled = false;

    if is_correct {
        debug!("{} is correct", note);
        next.currently_playing_resolution = question.resolution.clone();
        let first = next.currently_playing_resolution.first().copied().unwrap_or(note);
        next.highlighted_note = Some((first, Highlight::Correct));

        return (next, Some(Effect::ready(Action::ResolutionNotePlayed(Ok(())))));
    }

    debug!("{} is wrong, expected {}", note, question.answer);
    next.highlighted_note = Some((note, Highlight::Wrong));

    let effect = with_environment(
        environment,
        move |env| async move {
            env.note_player.play_note(note).await?;
            env.practice_manager.log_wrong_answer(note, &question).await
        },
        Action::WrongAnswerLogged,
    );
    (next, Some(effect))
}

fn clear_error(state: &mut AppState) {
    state.is_loading = false;
    state.has_error = false;
    state.error = None;
}

fn apply_session(state: &mut AppState, session: Session) {
    let summary = session.summary();

    state.correct_identifications = summary.correct;
    state.questions_count = summary.correct.saturating_add(summary.wrong);
    state.accuracy = summary.average;
    state.accuracy_per_note = summary.average_per_note;
    state.session = Some(session);
}

/// Same note set, ignoring order
fn same_notes(a: &[Note], b: &[Note]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort();
    b.sort();
    a == b
}

/// Level carried by a `LevelLoaded` result, for callers inspecting actions
pub fn loaded_level(action: &Action) -> Option<&Level> {
    match action {
        Action::LevelLoaded(Ok(level)) => Some(level),
        _ => None,
    }
}
