//! Solfege Trainer - headless terminal driver
//!
//! Wires the file-backed collaborators into the application loop and feeds it
//! commands read from stdin. A status line is printed whenever the state
//! changes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use solfege_common::config::{load_toml_config, resolve_data_dir, DATA_DIR_ENV_VAR};
use solfege_common::music::Note;
use solfege_common::Error;
use solfege_trainer::app::{Action, AppHandle, AppLoop, AppState, Environment, Highlight};
use solfege_trainer::generator::{DiatonicLevelGenerator, DiatonicNoteResolutionGenerator};
use solfege_trainer::player::{PlaybackTiming, SequencedNotePlayer};
use solfege_trainer::practice::CyclicPracticeManager;
use solfege_trainer::preferences::FilePreferences;
use solfege_trainer::storage::FileSessionStorage;
use solfege_trainer::tips::SequentialTipProvider;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for solfege-trainer
#[derive(Parser, Debug)]
#[command(name = "solfege-trainer")]
#[command(about = "Ear trainer: identify notes by ear in the context of a cadence")]
#[command(version)]
struct Args {
    /// Folder holding session history and preferences
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Path to config.toml
    #[arg(short, long, env = "SOLFEGE_CONFIG")]
    config: Option<PathBuf>,

    /// Playback tempo in beats per minute
    #[arg(short, long, env = "SOLFEGE_TEMPO_BPM")]
    tempo_bpm: Option<f64>,

    /// Log level for the trainer crates (overridden by RUST_LOG)
    #[arg(short, long, env = "SOLFEGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Skip playback waits
    #[arg(long, env = "SOLFEGE_INSTANT")]
    instant: bool,
}

/// One line of user input
#[derive(Debug)]
enum Command {
    Dispatch(Vec<Action>),
    Status,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  next | prev | random | home     move through the level catalog
  start | stop                    start or stop a practice session
  repeat                          replay cadence and question
  press <note>                    press a key, e.g. press e:1 or press F#1
  select <note>,<note>,...        practice only these notes
  tip                             dismiss the current tip
  accuracy | editor | close       open or close the accuracy and editor screens
  status                          print the current state
  quit";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_toml_config(args.config.as_deref()).context("Failed to load configuration")?;

    init_tracing(args.log_level.as_deref().or(config.log_level.as_deref()));

    let data_dir = resolve_data_dir(args.data_dir.as_deref(), DATA_DIR_ENV_VAR, &config);
    info!("Data folder: {}", data_dir.display());

    let timing = if args.instant || config.instant_playback() {
        PlaybackTiming::instant()
    } else {
        let bpm = args.tempo_bpm.unwrap_or_else(|| config.tempo_bpm());
        if !(bpm > 0.0) {
            bail!("Tempo must be positive, got {}", bpm);
        }
        PlaybackTiming::new(bpm)
    };
    info!("Playback tempo: {} bpm (instant: {})", timing.bpm, timing.instant);

    let preferences = Arc::new(FilePreferences::open(&data_dir));
    let practice_manager = CyclicPracticeManager::new(
        Arc::new(FileSessionStorage::new(&data_dir)),
        Arc::new(DiatonicLevelGenerator::new()),
        Arc::new(DiatonicNoteResolutionGenerator::new()),
        preferences.clone(),
    );
    let environment = Arc::new(Environment::new(
        Arc::new(SequencedNotePlayer::new(timing)),
        Arc::new(practice_manager),
        preferences,
        Arc::new(SequentialTipProvider::onboarding()),
    ));

    let (app, handle) = AppLoop::new(environment, AppState::default());
    let states = app.subscribe();

    tokio::spawn(print_status(states.clone()));

    handle
        .dispatch(Action::Launched)
        .context("Failed to launch application loop")?;

    println!("{}", HELP);
    let input = tokio::spawn(read_commands(handle, states));

    tokio::select! {
        state = app.run() => {
            info!(
                "Stopped after {} questions ({} correct)",
                state.questions_count, state.correct_identifications
            );
        }
        _ = shutdown_signal() => {}
    }

    input.abort();
    Ok(())
}

fn init_tracing(log_level: Option<&str>) {
    let default_filter = match log_level {
        Some(level) => format!("solfege_trainer={level},solfege_common={level}"),
        None => "solfege_trainer=info,solfege_common=info".to_string(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Forward stdin commands until `quit` or end of input
async fn read_commands(handle: AppHandle, states: watch::Receiver<AppState>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Dispatch(actions) => {
                for action in actions {
                    if let Err(e) = handle.dispatch(action) {
                        warn!("{}", e);
                        return;
                    }
                }
            }
            Command::Status => println!("{}", status_line(&states.borrow())),
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    info!("Input closed, finishing pending work");
}

fn parse_command(line: &str) -> solfege_common::Result<Option<Command>> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let single = |action: Action| -> solfege_common::Result<Option<Command>> {
        Ok(Some(Command::Dispatch(vec![action])))
    };

    match word.to_lowercase().as_str() {
        "" => Ok(None),
        "next" => single(Action::NextLevelPressed),
        "prev" | "previous" => single(Action::PreviousLevelPressed),
        "random" => single(Action::RandomPressed),
        "home" => single(Action::HomePressed),
        "start" | "stop" => single(Action::StartStopPressed),
        "repeat" => single(Action::RepeatQuestionPressed),
        "tip" => single(Action::TipDismissed),
        "accuracy" => single(Action::AccuracyRingPressed),
        "editor" => single(Action::ConfigureLevelPressed),
        "close" => Ok(Some(Command::Dispatch(vec![
            Action::AccuracyScreenDismissed,
            Action::LevelEditorDismissed,
        ]))),
        "press" => {
            let note: Note = rest.parse()?;
            Ok(Some(Command::Dispatch(vec![
                Action::NotePressed(note),
                Action::NoteReleased(note),
            ])))
        }
        "select" => {
            let notes = rest
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect::<solfege_common::Result<Vec<Note>>>()?;
            if notes.is_empty() {
                return Err(Error::InvalidInput("select needs at least one note".to_string()));
            }
            single(Action::NotesSelected(notes))
        }
        "status" => Ok(Some(Command::Status)),
        "help" | "?" => Ok(Some(Command::Help)),
        "quit" | "exit" => Ok(Some(Command::Quit)),
        other => Err(Error::InvalidInput(format!(
            "Unknown command {:?}, type help for a list",
            other
        ))),
    }
}

/// Print a status line for every distinct state
async fn print_status(mut states: watch::Receiver<AppState>) {
    let mut last = String::new();

    while states.changed().await.is_ok() {
        let line = status_line(&states.borrow_and_update());
        if line != last {
            println!("{}", line);
            last = line;
        }
    }
}

fn status_line(state: &AppState) -> String {
    if state.is_loading {
        return "loading...".to_string();
    }

    let mut parts = Vec::new();

    match &state.level {
        Some(level) => parts.push(format!("[{}] {}", level.id, level.title())),
        None => parts.push("no level".to_string()),
    }

    if state.is_practicing {
        let score = state.score_text();
        parts.push(if score.is_empty() {
            "practicing".to_string()
        } else {
            format!("practicing {}", score)
        });
    }

    parts.push(format!("accuracy {}%", state.accuracy_percent()));

    if let Some((note, highlight)) = state.highlighted_note {
        let marker = match highlight {
            Highlight::Preview => "~",
            Highlight::Correct => "+",
            Highlight::Wrong => "x",
        };
        parts.push(format!("{}{}", marker, note));
    }

    if state.is_practicing && state.question.is_some() {
        parts.push(if state.is_interaction_enabled {
            "which note?".to_string()
        } else {
            "listen...".to_string()
        });
    }

    if state.is_level_editor_visible {
        let notes: Vec<String> = state.editable_notes().iter().map(Note::to_string).collect();
        parts.push(format!("editor: {}", notes.join(",")));
    }

    if state.is_accuracy_screen_visible {
        let per_note: Vec<String> = state
            .accuracy_per_note
            .iter()
            .map(|(note, average)| format!("{} {:.0}%", note, average * 100.0))
            .collect();
        parts.push(format!("per note: {}", per_note.join(", ")));
    }

    if let Some(tip) = &state.current_tip {
        parts.push(format!("tip {:?}: {} (type tip)", tip.target, tip.message));
    }

    if let (true, Some(error)) = (state.has_error, &state.error) {
        parts.push(format!("error: {}", error));
    }

    parts.join(" | ")
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use solfege_common::music::NoteName;

    fn actions(line: &str) -> Vec<Action> {
        match parse_command(line) {
            Ok(Some(Command::Dispatch(actions))) => actions,
            other => panic!("{:?} did not parse to actions: {:?}", line, other),
        }
    }

    #[test]
    fn test_parse_navigation() {
        assert!(matches!(&actions("next")[..], [Action::NextLevelPressed]));
        assert!(matches!(&actions("  PREV ")[..], [Action::PreviousLevelPressed]));
        assert!(matches!(&actions("stop")[..], [Action::StartStopPressed]));
        assert!(matches!(parse_command(""), Ok(None)));
        assert!(matches!(parse_command("quit"), Ok(Some(Command::Quit))));
    }

    #[test]
    fn test_parse_press_releases_too() {
        let parsed = actions("press F#1");
        let note = Note::new(NoteName::FSharp, 1);

        assert!(matches!(
            &parsed[..],
            [Action::NotePressed(a), Action::NoteReleased(b)] if *a == note && *b == note
        ));
    }

    #[test]
    fn test_parse_select() {
        let parsed = actions("select c:1, e:1,g:1");

        match &parsed[..] {
            [Action::NotesSelected(notes)] => assert_eq!(
                notes,
                &vec![
                    Note::new(NoteName::C, 1),
                    Note::new(NoteName::E, 1),
                    Note::new(NoteName::G, 1),
                ]
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(parse_command("select"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_command("press h2"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_command("dance"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_status_line() {
        assert_eq!(
            status_line(&AppState {
                is_loading: true,
                ..AppState::default()
            }),
            "loading..."
        );

        let state = AppState {
            is_practicing: true,
            questions_count: 4,
            correct_identifications: 3,
            accuracy: 0.75,
            highlighted_note: Some((Note::new(NoteName::D, 1), Highlight::Wrong)),
            ..AppState::default()
        };
        assert_eq!(
            status_line(&state),
            "no level | practicing 3 · 1 · 4 | accuracy 75% | xd:1"
        );
    }
}
