use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which of the two Horde job families a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Text,
    Image,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Text => "text",
            JobKind::Image => "image",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampler knobs for a text generation job.
#[derive(Debug, Clone, Serialize)]
pub struct TextSamplers {
    pub max_length: u32,
    pub max_context_length: u32,
    pub temperature: f64,
    pub rep_pen: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub stop_sequence: Vec<String>,
}

impl Default for TextSamplers {
    fn default() -> Self {
        Self {
            max_length: 512,
            max_context_length: 2048,
            temperature: 0.7,
            rep_pen: 1.1,
            top_p: 0.9,
            top_k: 100,
            stop_sequence: vec!["###".to_string()],
        }
    }
}

/// Sampler knobs for an image generation job.
#[derive(Debug, Clone, Serialize)]
pub struct ImageSamplers {
    pub sampler_name: String,
    pub cfg_scale: f64,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub karras: bool,
}

impl Default for ImageSamplers {
    fn default() -> Self {
        Self {
            sampler_name: "k_euler_a".to_string(),
            cfg_scale: 7.5,
            width: 512,
            height: 512,
            steps: 30,
            karras: true,
        }
    }
}

/// Parameter set for one generation job, tagged by job family.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SamplerParams {
    Text(TextSamplers),
    Image(ImageSamplers),
}

/// One generation request, immutable once submitted.
///
/// An empty `models` list is legal and means the server picks any worker.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub models: Vec<String>,
    pub params: SamplerParams,
    #[serde(skip)]
    pub kind: JobKind,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>, models: Vec<String>, samplers: TextSamplers) -> Self {
        Self {
            prompt: prompt.into(),
            models,
            params: SamplerParams::Text(samplers),
            kind: JobKind::Text,
        }
    }

    pub fn image(prompt: impl Into<String>, models: Vec<String>, samplers: ImageSamplers) -> Self {
        Self {
            prompt: prompt.into(),
            models,
            params: SamplerParams::Image(samplers),
            kind: JobKind::Image,
        }
    }
}

/// Handle for one in-flight Horde job.
///
/// Owned by the client that submitted it; never reused across attempts.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub id: String,
    pub kind: JobKind,
    pub submitted_at: DateTime<Utc>,
}

impl JobHandle {
    pub fn new(id: String, kind: JobKind) -> Self {
        Self {
            id,
            kind,
            submitted_at: Utc::now(),
        }
    }
}
