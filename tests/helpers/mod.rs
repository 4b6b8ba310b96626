//! Test helpers: a scripted in-memory transport standing in for the Horde API.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hordecast::models::request::JobKind;
use hordecast::models::status::{StatusReply, SubmitReply, WireGeneration};
use hordecast::services::client::JobClient;
use hordecast::services::fallback::{FallbackPolicy, Orchestrator};
use hordecast::services::pipeline::{ContentPipeline, PipelineConfig};
use hordecast::services::transport::{Transport, TransportError};

/// Scripted outcome for one submission.
pub enum SubmitScript {
    Accept(&'static str),
    Fail,
}

/// Scripted outcome for one status check.
#[derive(Clone)]
pub enum StatusScript {
    Reply(StatusReply),
    Error,
}

/// In-memory transport with per-call submit scripts and per-job status
/// scripts. The last status entry for a job repeats forever, matching the
/// server's behavior of holding a terminal state.
#[derive(Default)]
pub struct FakeTransport {
    submit_script: Mutex<VecDeque<SubmitScript>>,
    status_script: Mutex<HashMap<String, VecDeque<StatusScript>>>,
    submitted: Mutex<Vec<(JobKind, serde_json::Value)>>,
    status_calls: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script_submit(&self, script: SubmitScript) {
        self.submit_script.lock().unwrap().push_back(script);
    }

    pub fn script_status(&self, id: &str, replies: Vec<StatusScript>) {
        self.status_script
            .lock()
            .unwrap()
            .insert(id.to_string(), replies.into());
    }

    pub fn submit_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn status_count(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn submitted_prompt(&self, index: usize) -> String {
        let submitted = self.submitted.lock().unwrap();
        submitted[index].1["prompt"].as_str().unwrap_or("").to_string()
    }

    pub fn submitted_models(&self, index: usize) -> Vec<String> {
        let submitted = self.submitted.lock().unwrap();
        submitted[index].1["models"]
            .as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn submit(
        &self,
        kind: JobKind,
        body: &serde_json::Value,
    ) -> Result<SubmitReply, TransportError> {
        self.submitted.lock().unwrap().push((kind, body.clone()));
        let script = self.submit_script.lock().unwrap().pop_front();
        match script {
            Some(SubmitScript::Accept(id)) => Ok(SubmitReply {
                id: Some(id.to_string()),
            }),
            Some(SubmitScript::Fail) | None => Err(TransportError::Status {
                code: 503,
                body: "scripted submit failure".to_string(),
            }),
        }
    }

    async fn status(&self, _kind: JobKind, id: &str) -> Result<StatusReply, TransportError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut scripts = self.status_script.lock().unwrap();
        let script = match scripts.get_mut(id) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match script {
            Some(StatusScript::Reply(reply)) => Ok(reply),
            Some(StatusScript::Error) => Err(TransportError::Status {
                code: 502,
                body: "scripted status failure".to_string(),
            }),
            None => Ok(pending()),
        }
    }
}

// ---- Status reply builders ------------------------------------------------

pub fn pending() -> StatusReply {
    StatusReply {
        waiting: 1,
        ..Default::default()
    }
}

pub fn done_text(text: &str, model: &str) -> StatusReply {
    StatusReply {
        done: true,
        finished: 1,
        generations: Some(vec![WireGeneration {
            text: Some(text.to_string()),
            model: Some(model.to_string()),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

pub fn done_image(url: &str, id: Option<&str>) -> StatusReply {
    StatusReply {
        done: true,
        finished: 1,
        generations: Some(vec![WireGeneration {
            img: Some(url.to_string()),
            id: id.map(str::to_string),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

pub fn done_empty() -> StatusReply {
    StatusReply {
        done: true,
        generations: Some(vec![]),
        ..Default::default()
    }
}

pub fn faulted(message: &str) -> StatusReply {
    StatusReply {
        faulted: true,
        faulted_message: Some(message.to_string()),
        ..Default::default()
    }
}

// ---- Component builders ---------------------------------------------------

pub fn text_client(transport: Arc<FakeTransport>) -> JobClient<Arc<FakeTransport>> {
    JobClient::new(transport, JobKind::Text, Duration::from_secs(5))
}

pub fn image_client(transport: Arc<FakeTransport>) -> JobClient<Arc<FakeTransport>> {
    JobClient::new(transport, JobKind::Image, Duration::from_secs(15))
}

pub fn test_orchestrator(transport: Arc<FakeTransport>) -> Orchestrator<Arc<FakeTransport>> {
    Orchestrator::new(
        text_client(transport.clone()),
        image_client(transport),
        FallbackPolicy::default(),
    )
}

pub fn test_pipeline(transport: Arc<FakeTransport>) -> ContentPipeline<Arc<FakeTransport>> {
    ContentPipeline::new(
        test_orchestrator(transport),
        PipelineConfig {
            text_models: vec!["preferred/text-model".to_string()],
            image_models: vec!["preferred_image_model".to_string()],
            ..Default::default()
        },
    )
}
