use std::time::Duration;

use crate::models::request::{GenerationRequest, ImageSamplers, TextSamplers};
use crate::models::status::{ImagePayload, JobStatus, Payload, TextPayload};
use crate::services::client::JobClient;
use crate::services::transport::Transport;

/// Tunable acceptance thresholds and wait budgets for the fallback ladder.
///
/// The short-output thresholds and refusal phrases are heuristics, not a
/// contract; the defaults here are the documented starting point.
#[derive(Debug, Clone)]
pub struct FallbackPolicy {
    /// Output shorter than this is suspect...
    pub min_output_chars: usize,
    /// ...unless it at least grew this much relative to the input.
    pub min_growth_ratio: f64,
    /// Case-insensitive substrings that mark a refusal or placeholder reply.
    pub refusal_phrases: Vec<String>,
    /// Wait budget per text attempt.
    pub text_wait: Duration,
    /// Wait budget per image attempt.
    pub image_wait: Duration,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            min_output_chars: 500,
            min_growth_ratio: 1.5,
            refusal_phrases: default_refusal_phrases(),
            text_wait: Duration::from_secs(120),
            image_wait: Duration::from_secs(450),
        }
    }
}

pub fn default_refusal_phrases() -> Vec<String> {
    [
        "i apologize",
        "as an ai",
        "i cannot",
        "since there is no",
        "placeholder article",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Why a completed text generation was rejected by the acceptance heuristic.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    TooShort { got: usize, reference: usize },
    Refusal(String),
}

impl FallbackPolicy {
    /// Check a candidate against the refusal list and the short-output
    /// heuristic. `reference_len` is the input length the output is expected
    /// to grow from; pass 0 to disable the length check.
    pub fn rejection(&self, candidate: &str, reference_len: usize) -> Option<Rejection> {
        let lowered = candidate.to_lowercase();
        for phrase in &self.refusal_phrases {
            if lowered.contains(phrase.as_str()) {
                return Some(Rejection::Refusal(phrase.clone()));
            }
        }

        let len = candidate.len();
        let too_small_absolute = len < self.min_output_chars;
        let too_small_relative = (len as f64) < (reference_len as f64) * self.min_growth_ratio;
        if too_small_absolute && too_small_relative {
            return Some(Rejection::TooShort {
                got: len,
                reference: reference_len,
            });
        }

        None
    }
}

/// Plan for one logical text generation: the prompt ladder plus the canned
/// floor returned when every rung fails.
#[derive(Debug, Clone)]
pub struct TextPlan {
    pub primary_prompt: String,
    pub forceful_prompt: String,
    /// Deterministic template returned verbatim when the ladder is exhausted.
    pub fallback_text: String,
    pub models: Vec<String>,
    pub samplers: TextSamplers,
    /// Input length the output is measured against; 0 disables the check.
    pub reference_len: usize,
}

/// Plan for one logical image generation.
#[derive(Debug, Clone)]
pub struct ImagePlan {
    pub prompt: String,
    pub models: Vec<String>,
    pub samplers: ImageSamplers,
}

/// Runs a descending ladder of generation strategies until one produces
/// acceptable output.
///
/// Rungs are strictly sequential and each submits a fresh request with its
/// own handle. Submission errors, faults, timeouts, and empty results all
/// advance the ladder the same way. The first acceptable result wins and
/// lower rungs are never tried after a success.
pub struct Orchestrator<T> {
    text: JobClient<T>,
    image: JobClient<T>,
    policy: FallbackPolicy,
}

impl<T: Transport> Orchestrator<T> {
    pub fn new(text: JobClient<T>, image: JobClient<T>, policy: FallbackPolicy) -> Self {
        Self {
            text,
            image,
            policy,
        }
    }

    pub fn policy(&self) -> &FallbackPolicy {
        &self.policy
    }

    /// Text ladder: preferred models, then any model, then a forceful prompt,
    /// then the canned template. Never returns an empty string.
    pub async fn run_text(&self, plan: &TextPlan) -> String {
        let rungs = [
            (1u8, plan.primary_prompt.as_str(), plan.models.clone()),
            (2, plan.primary_prompt.as_str(), Vec::new()),
            (3, plan.forceful_prompt.as_str(), Vec::new()),
        ];

        for (rung, prompt, models) in rungs {
            let Some(payload) = self.text_attempt(rung, prompt, models, plan).await else {
                continue;
            };

            match self.policy.rejection(&payload.text, plan.reference_len) {
                None => {
                    tracing::info!(
                        rung,
                        model = %payload.model,
                        chars = payload.text.len(),
                        "Accepted text generation"
                    );
                    return payload.text;
                }
                Some(rejection) => {
                    tracing::warn!(
                        rung,
                        model = %payload.model,
                        ?rejection,
                        "Rejected text generation, advancing ladder"
                    );
                }
            }
        }

        tracing::warn!("Text ladder exhausted, using canned template");
        plan.fallback_text.clone()
    }

    /// Image ladder: preferred models, then any model. Returns `None` when
    /// the ladder is exhausted; callers must tolerate a missing image.
    pub async fn run_image(&self, plan: &ImagePlan) -> Option<ImagePayload> {
        let rungs = [(1u8, plan.models.clone()), (2, Vec::new())];

        for (rung, models) in rungs {
            let request =
                GenerationRequest::image(plan.prompt.as_str(), models, plan.samplers.clone());
            let handle = match self.image.submit(&request).await {
                Ok(handle) => handle,
                Err(e) => {
                    tracing::warn!(rung, error = %e, "Image submission failed, advancing ladder");
                    continue;
                }
            };

            match self.image.poll(&handle, self.policy.image_wait).await {
                JobStatus::Done(Payload::Image(payload)) => {
                    tracing::info!(rung, durable_ref = %payload.durable_ref(), "Accepted image generation");
                    return Some(payload);
                }
                status => {
                    tracing::warn!(rung, ?status, "Image attempt did not complete, advancing ladder");
                }
            }
        }

        tracing::warn!("Image ladder exhausted, yielding no image");
        None
    }

    async fn text_attempt(
        &self,
        rung: u8,
        prompt: &str,
        models: Vec<String>,
        plan: &TextPlan,
    ) -> Option<TextPayload> {
        let request = GenerationRequest::text(prompt, models, plan.samplers.clone());
        let handle = match self.text.submit(&request).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(rung, error = %e, "Text submission failed, advancing ladder");
                return None;
            }
        };

        match self.text.poll(&handle, self.policy.text_wait).await {
            JobStatus::Done(Payload::Text(payload)) => Some(payload),
            status => {
                tracing::warn!(rung, ?status, "Text attempt did not complete, advancing ladder");
                None
            }
        }
    }
}
