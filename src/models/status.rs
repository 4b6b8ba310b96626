use serde::Deserialize;

use crate::models::request::JobKind;

/// Useful text extracted from a completed text job.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPayload {
    pub text: String,
    pub model: String,
}

/// Useful image reference extracted from a completed image job.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    /// Ephemeral download URL returned by the server.
    pub url: String,
    /// Server-assigned generation id, when present.
    pub raw_id: Option<String>,
}

impl ImagePayload {
    /// Stable, cacheable reference for callers that need a durable link.
    ///
    /// Built from the generation id plus the Horde's fixed file extension;
    /// falls back to the tail of the ephemeral URL when no id was returned.
    pub fn durable_ref(&self) -> String {
        match &self.raw_id {
            Some(id) => format!("{id}.webp"),
            None => self
                .url
                .rsplit('/')
                .next()
                .unwrap_or(self.url.as_str())
                .to_string(),
        }
    }
}

/// Payload of a completed job.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(TextPayload),
    Image(ImagePayload),
}

/// Client-side view of one job, replaced on every status check.
///
/// A job moves Pending -> Done/Faulted at most once server-side; the client
/// additionally imposes `PollTimeout` when its wait budget runs out.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Pending,
    Done(Payload),
    Faulted(String),
    PollTimeout,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// Response body of a job submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReply {
    #[serde(default)]
    pub id: Option<String>,
}

/// One generation entry in a status reply.
///
/// Text jobs carry `text`/`model`, image jobs carry `img` and sometimes `id`;
/// everything is optional on the wire and resolved by [`StatusReply::classify`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireGeneration {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Response body of a job status check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub faulted: bool,
    #[serde(default)]
    pub faulted_message: Option<String>,
    #[serde(default)]
    pub generations: Option<Vec<WireGeneration>>,
    #[serde(default)]
    pub waiting: u32,
    #[serde(default)]
    pub processing: u32,
    #[serde(default)]
    pub finished: u32,
}

/// Outcome of classifying one status reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Pending { waiting: u32, processing: u32 },
    Done(Payload),
    Faulted(String),
}

impl StatusReply {
    /// Resolve the duck-typed wire shape into a tagged outcome.
    ///
    /// A reply that claims `done` but carries no usable generation (no entry,
    /// empty text, missing image URL) classifies as a fault, never as done.
    pub fn classify(&self, kind: JobKind) -> Classified {
        if self.faulted {
            let message = self
                .faulted_message
                .clone()
                .unwrap_or_else(|| "job faulted without a message".to_string());
            return Classified::Faulted(message);
        }

        if !self.done {
            return Classified::Pending {
                waiting: self.waiting,
                processing: self.processing,
            };
        }

        let first = self.generations.as_ref().and_then(|g| g.first());
        let payload = match (kind, first) {
            (JobKind::Text, Some(generation)) => generation
                .text
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .map(|t| {
                    Payload::Text(TextPayload {
                        text: t.to_string(),
                        model: generation.model.clone().unwrap_or_default(),
                    })
                }),
            (JobKind::Image, Some(generation)) => generation
                .img
                .as_deref()
                .filter(|u| !u.is_empty())
                .map(|u| {
                    Payload::Image(ImagePayload {
                        url: u.to_string(),
                        raw_id: generation.id.clone(),
                    })
                }),
            (_, None) => None,
        };

        match payload {
            Some(p) => Classified::Done(p),
            None => Classified::Faulted(format!(
                "{kind} job reported done without a usable generation"
            )),
        }
    }
}
