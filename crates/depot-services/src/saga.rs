//! Compensation stack for multi-resource writes
//!
//! The record store and blob storage offer no cross-resource transaction, so
//! a commit spanning both is a saga: each completed forward step registers a
//! compensating action, and a failure at step i unwinds steps i-1..1 in
//! reverse order before the error surfaces.

use futures::future::BoxFuture;
use std::future::Future;

type CompensationFn = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Ordered list of compensating actions, unwound in reverse on failure.
///
/// Compensations are best-effort: each handles and logs its own errors, so an
/// unwind always runs to completion.
#[derive(Default)]
pub struct CompensationStack {
    steps: Vec<(&'static str, CompensationFn)>,
}

impl CompensationStack {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Register the compensation for a forward step that just completed.
    pub fn push<F, Fut>(&mut self, label: &'static str, compensation: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.steps
            .push((label, Box::new(move || Box::pin(compensation()))));
    }

    /// The logical unit committed; registered compensations no longer apply.
    pub fn disarm(&mut self) {
        self.steps.clear();
    }

    /// Run all registered compensations in reverse order.
    pub async fn unwind(&mut self) {
        while let Some((label, compensation)) = self.steps.pop() {
            tracing::warn!(step = label, "Running compensation");
            compensation().await;
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_unwind_runs_in_reverse_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut stack = CompensationStack::new();

        for step in 1..=3 {
            let order = order.clone();
            stack.push("step", move || async move {
                order.lock().unwrap().push(step);
            });
        }

        stack.unwind().await;
        assert_eq!(*order.lock().unwrap(), vec![3, 2, 1]);
        assert!(stack.is_empty());
    }

    #[tokio::test]
    async fn test_disarm_clears_without_running() {
        let ran = Arc::new(AtomicUsize::new(0));
        let mut stack = CompensationStack::new();

        let counter = ran.clone();
        stack.push("delete_blob", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(stack.len(), 1);
        stack.disarm();
        stack.unwind().await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }
}
