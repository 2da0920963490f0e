//! Bounded fan-out for collection members
//!
//! This module handles:
//! - Concurrency limiting via a semaphore whose permit is taken before each
//!   task is spawned
//! - Sequential mode as a width of one, which serializes members in order
//! - Index-addressed results, so arrival order never matters

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Semaphore-gated task launcher
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    width: usize,
}

impl Scheduler {
    /// Creates a scheduler allowing `limit` tasks in flight, or one when
    /// `sequential` is set
    pub fn new(limit: usize, sequential: bool) -> Self {
        let width = if sequential { 1 } else { limit.max(1) };
        Self { width }
    }

    /// Maximum number of tasks in flight
    pub fn width(&self) -> usize {
        self.width
    }

    /// Runs `task` over every item and waits for all of them
    ///
    /// Slot `i` of the result holds the output for item `i`, or `None` if that
    /// task panicked. With a width of one, each task finishes before the next
    /// is spawned.
    pub async fn run<I, F, Fut, T>(&self, items: Vec<I>, task: F) -> Vec<Option<T>>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.width));
        let mut handles = Vec::with_capacity(items.len());

        for item in items {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!("Fan-out semaphore closed: {}", e);
                    break;
                }
            };

            let future = task(item);
            handles.push(tokio::spawn(async move {
                let _permit = permit;
                future.await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(value) => results.push(Some(value)),
                Err(e) => {
                    tracing::error!("Task {} did not complete: {}", index, e);
                    results.push(None);
                }
            }
        }

        results
    }
}
