//! Action dispatch loop
//!
//! User actions arrive on an unbounded channel and are reduced one at a time,
//! so state transitions are strictly serialized. Effects run as tasks in a
//! `JoinSet`; whatever action an effect yields is reduced by the same loop.
//! The newest state is published on a watch channel after every action.
//!
//! The loop finishes once every [`AppHandle`] is dropped and no effect is
//! still in flight.

use super::{next_state, Action, AppState, Environment};
use solfege_common::{Error, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Cloneable sender of user actions into a running loop
#[derive(Debug, Clone)]
pub struct AppHandle {
    sender: mpsc::UnboundedSender<Action>,
}

impl AppHandle {
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.sender
            .send(action)
            .map_err(|e| Error::unexpected(format!("Application loop stopped before {}", e.0)))
    }
}

pub struct AppLoop {
    environment: Arc<Environment>,
    state: AppState,
    receiver: mpsc::UnboundedReceiver<Action>,
    receiver_closed: bool,
    effects: JoinSet<Option<Action>>,
    publisher: watch::Sender<AppState>,
}

impl AppLoop {
    /// Create a loop plus the first handle feeding it
    pub fn new(environment: Arc<Environment>, initial: AppState) -> (Self, AppHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (publisher, _) = watch::channel(initial.clone());

        let app = Self {
            environment,
            state: initial,
            receiver,
            receiver_closed: false,
            effects: JoinSet::new(),
            publisher,
        };
        (app, AppHandle { sender })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn environment(&self) -> &Arc<Environment> {
        &self.environment
    }

    /// Number of effects still running
    pub fn pending_effects(&self) -> usize {
        self.effects.len()
    }

    /// Receiver of every published state, starting with the current one
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.publisher.subscribe()
    }

    /// Reduce one action, publish the new state and start its effect
    pub fn dispatch(&mut self, action: Action) {
        debug!("Dispatching: {}", action);

        let (state, effect) = next_state(&self.environment, &self.state, action);
        self.state = state;
        self.publisher.send_replace(self.state.clone());

        if let Some(effect) = effect {
            self.effects.spawn(effect.run());
        }
    }

    /// Wait for the next user action or finished effect and dispatch it
    ///
    /// An effect yielding no action still counts as a step. Returns false
    /// once the channel is closed and every effect has finished.
    pub async fn step(&mut self) -> bool {
        loop {
            tokio::select! {
                received = self.receiver.recv(), if !self.receiver_closed => match received {
                    Some(action) => {
                        self.dispatch(action);
                        return true;
                    }
                    None => {
                        debug!("All handles dropped");
                        self.receiver_closed = true;
                    }
                },
                Some(joined) = self.effects.join_next(), if !self.effects.is_empty() => {
                    match joined {
                        Ok(Some(action)) => self.dispatch(action),
                        Ok(None) => {}
                        Err(e) => warn!("Effect task failed: {}", e),
                    }
                    return true;
                }
                else => return false,
            }
        }
    }

    /// Step until no effect is in flight
    ///
    /// User actions arriving meanwhile are dispatched as well.
    pub async fn settle(&mut self) {
        while self.pending_effects() > 0 {
            if !self.step().await {
                break;
            }
        }
    }

    /// Dispatch actions until every handle and effect is gone
    pub async fn run(mut self) -> AppState {
        info!("Application loop started");

        while self.step().await {}

        info!("Application loop finished");
        self.state
    }
}
