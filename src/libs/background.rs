//! Slow jobs (exports, reports, backups) run off the caller's thread.
//!
//! Jobs go to tokio's blocking pool. Completion or failure is reported
//! through the message layer once the job returns, and every outcome is
//! appended to a shared log. Jobs cannot be cancelled and several may run at
//! the same time.

use super::formatter::now_stamp;
use super::messages::Message;
use crate::{msg_error, msg_info, msg_success};
use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub label: String,
    /// Detail on success, error text on failure.
    pub result: Result<String, String>,
    pub finished_at: String,
}

#[derive(Clone, Default)]
pub struct Background {
    log: Arc<Mutex<Vec<JobOutcome>>>,
}

impl Background {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `job` on the blocking pool and waits for it.
    pub async fn run<F>(&self, label: &str, job: F) -> Result<String>
    where
        F: FnOnce() -> Result<String> + Send + 'static,
    {
        msg_info!(Message::JobStarted(label.to_string()));
        tracing::debug!(job = label, "background job started");

        let outcome = match tokio::task::spawn_blocking(job).await {
            Ok(outcome) => outcome,
            Err(e) => Err(anyhow::anyhow!("job {} did not complete: {}", label, e)),
        };

        match outcome {
            Ok(detail) => {
                msg_success!(Message::JobFinished(label.to_string(), detail.clone()));
                self.record(label, Ok(detail.clone()));
                Ok(detail)
            }
            Err(e) => {
                tracing::error!(job = label, error = ?e, "background job failed");
                msg_error!(Message::JobFailed(label.to_string(), e.to_string()));
                self.record(label, Err(e.to_string()));
                Err(e)
            }
        }
    }

    /// Starts `job` without waiting; the handle resolves like [`run`](Self::run).
    pub fn spawn<F>(&self, label: impl Into<String>, job: F) -> JoinHandle<Result<String>>
    where
        F: FnOnce() -> Result<String> + Send + 'static,
    {
        let runner = self.clone();
        let label = label.into();
        tokio::spawn(async move { runner.run(&label, job).await })
    }

    fn record(&self, label: &str, result: Result<String, String>) {
        self.log.lock().push(JobOutcome {
            label: label.to_string(),
            result,
            finished_at: now_stamp(),
        });
    }

    pub fn outcomes(&self) -> Vec<JobOutcome> {
        self.log.lock().clone()
    }

    pub fn last(&self) -> Option<JobOutcome> {
        self.log.lock().last().cloned()
    }
}
