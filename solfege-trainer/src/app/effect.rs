//! Deferred asynchronous work returned by the reducer
//!
//! An effect runs once, outside the reducer, and yields at most one follow-up
//! action. There is no cancellation.

use super::Action;
use futures::future::BoxFuture;
use futures::FutureExt;
use solfege_common::Result;
use std::fmt;
use std::future::Future;

pub struct Effect {
    future: BoxFuture<'static, Option<Action>>,
}

impl Effect {
    /// Effect yielding whatever the future yields
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Option<Action>> + Send + 'static,
    {
        Self {
            future: future.boxed(),
        }
    }

    /// Effect whose success or failure is wrapped into an action
    pub fn task<T, F, M>(future: F, into_action: M) -> Self
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
        M: FnOnce(Result<T>) -> Action + Send + 'static,
    {
        Self::new(async move { Some(into_action(future.await)) })
    }

    /// Effect yielding `action` without doing any work
    pub fn ready(action: Action) -> Self {
        Self::new(async move { Some(action) })
    }

    pub async fn run(self) -> Option<Action> {
        self.future.await
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Effect")
    }
}
