use std::time::Duration;

use serde_json::json;
use tokio::time::{sleep, Instant};

use crate::models::request::{GenerationRequest, JobHandle, JobKind};
use crate::models::status::{Classified, JobStatus};
use crate::services::transport::{Transport, TransportError};

/// Default status-check interval for text jobs.
pub const TEXT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Default status-check interval for image jobs.
pub const IMAGE_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Backoff applied instead of the regular interval after a transport error.
const ERROR_BACKOFF_BASE: Duration = Duration::from_secs(8);
const ERROR_BACKOFF_STEP: Duration = Duration::from_secs(4);
const ERROR_BACKOFF_CAP: Duration = Duration::from_secs(20);

/// Client for one Horde async-job family: submit once, poll to a terminal
/// state, classify the result.
///
/// Submission errors surface to the caller; retry across attempts belongs to
/// the fallback orchestrator. Status checks are idempotent, so transport
/// errors mid-poll are retried internally until the wait budget runs out.
pub struct JobClient<T> {
    transport: T,
    kind: JobKind,
    poll_interval: Duration,
}

impl<T: Transport> JobClient<T> {
    pub fn new(transport: T, kind: JobKind, poll_interval: Duration) -> Self {
        Self {
            transport,
            kind,
            poll_interval,
        }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Submit one generation job. One POST, no internal retry.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle, SubmitError> {
        if request.kind != self.kind {
            return Err(SubmitError::WrongKind {
                client: self.kind,
                request: request.kind,
            });
        }
        if request.prompt.trim().is_empty() {
            return Err(SubmitError::EmptyPrompt);
        }

        let body = json!({
            "prompt": request.prompt,
            "params": request.params,
            "models": request.models,
        });

        let reply = self.transport.submit(self.kind, &body).await?;
        let id = reply.id.filter(|id| !id.is_empty()).ok_or(SubmitError::MissingId)?;

        tracing::info!(
            kind = %self.kind,
            job_id = %id,
            model_count = request.models.len(),
            prompt_chars = request.prompt.len(),
            "Submitted generation job"
        );

        Ok(JobHandle::new(id, self.kind))
    }

    /// Poll one handle until it reaches a terminal state or the wait budget
    /// is exhausted.
    ///
    /// The first status check is immediate; subsequent checks wait the full
    /// interval. Only the calling task suspends between checks. Once a
    /// terminal state is observed polling stops; there is no server-side
    /// cancellation, so an exceeded budget simply returns `PollTimeout`.
    pub async fn poll(&self, handle: &JobHandle, max_wait: Duration) -> JobStatus {
        let started = Instant::now();
        let mut consecutive_errors: u32 = 0;

        loop {
            let delay = match self.transport.status(self.kind, &handle.id).await {
                Ok(reply) => {
                    consecutive_errors = 0;
                    match reply.classify(self.kind) {
                        Classified::Done(payload) => {
                            tracing::info!(
                                kind = %self.kind,
                                job_id = %handle.id,
                                elapsed_ms = started.elapsed().as_millis() as u64,
                                "Job completed"
                            );
                            return JobStatus::Done(payload);
                        }
                        Classified::Faulted(message) => {
                            tracing::warn!(
                                kind = %self.kind,
                                job_id = %handle.id,
                                fault = %message,
                                "Job faulted"
                            );
                            return JobStatus::Faulted(message);
                        }
                        Classified::Pending {
                            waiting,
                            processing,
                        } => {
                            tracing::debug!(
                                kind = %self.kind,
                                job_id = %handle.id,
                                waiting,
                                processing,
                                "Job still pending"
                            );
                            self.poll_interval
                        }
                    }
                }
                Err(e) => {
                    consecutive_errors += 1;
                    let backoff = error_backoff(consecutive_errors);
                    tracing::warn!(
                        kind = %self.kind,
                        job_id = %handle.id,
                        error = %e,
                        consecutive_errors,
                        backoff_secs = backoff.as_secs(),
                        "Status check failed, backing off"
                    );
                    backoff
                }
            };

            if started.elapsed() >= max_wait {
                tracing::warn!(
                    kind = %self.kind,
                    job_id = %handle.id,
                    budget_secs = max_wait.as_secs(),
                    "Gave up polling, wait budget exhausted"
                );
                return JobStatus::PollTimeout;
            }

            sleep(delay).await;
        }
    }
}

fn error_backoff(consecutive_errors: u32) -> Duration {
    let extra = ERROR_BACKOFF_STEP * consecutive_errors.saturating_sub(1);
    (ERROR_BACKOFF_BASE + extra).min(ERROR_BACKOFF_CAP)
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("refusing to submit an empty prompt")]
    EmptyPrompt,

    #[error("{request} request submitted to a {client} client")]
    WrongKind { client: JobKind, request: JobKind },

    #[error("server accepted the job but returned no id")]
    MissingId,

    #[error(transparent)]
    Transport(#[from] TransportError),
}
