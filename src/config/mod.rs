use serde::Deserialize;

/// Bot configuration, read from the environment.
///
/// Every field has a default; an empty environment targets the public
/// AI Horde API with the anonymous key. Model lists are comma-separated in
/// the environment; empty means the server picks any worker.
#[derive(Debug, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_text_submit_url")]
    pub text_submit_url: String,

    #[serde(default = "default_text_status_url")]
    pub text_status_url: String,

    #[serde(default = "default_image_submit_url")]
    pub image_submit_url: String,

    #[serde(default = "default_image_status_url")]
    pub image_status_url: String,

    /// Horde API key ("0000000000" is the anonymous key).
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Preferred text models, tried before letting the server choose.
    #[serde(default)]
    pub text_models: Vec<String>,

    /// Preferred image models, tried before letting the server choose.
    #[serde(default)]
    pub image_models: Vec<String>,

    /// Status-check interval for text jobs, in seconds.
    #[serde(default = "default_text_poll_secs")]
    pub text_poll_secs: u64,

    /// Status-check interval for image jobs, in seconds.
    #[serde(default = "default_image_poll_secs")]
    pub image_poll_secs: u64,

    /// Wait budget per text attempt, in seconds.
    #[serde(default = "default_text_wait_secs")]
    pub text_wait_secs: u64,

    /// Wait budget per image attempt, in seconds.
    #[serde(default = "default_image_wait_secs")]
    pub image_wait_secs: u64,

    /// Absolute minimum length for accepted text output.
    #[serde(default = "default_min_output_chars")]
    pub min_output_chars: usize,

    /// Required growth of accepted output relative to the input summary.
    #[serde(default = "default_min_growth_ratio")]
    pub min_growth_ratio: f64,

    /// Summaries shorter than this are echoed without enhancement.
    #[serde(default = "default_min_input_chars")]
    pub min_input_chars: usize,

    /// Case-insensitive substrings that mark a refusal or placeholder reply,
    /// comma-separated in the environment.
    #[serde(default = "crate::services::fallback::default_refusal_phrases")]
    pub refusal_phrases: Vec<String>,
}

fn default_text_submit_url() -> String {
    "https://aihorde.net/api/v2/generate/text/async".to_string()
}

fn default_text_status_url() -> String {
    "https://aihorde.net/api/v2/generate/text/status".to_string()
}

fn default_image_submit_url() -> String {
    "https://aihorde.net/api/v2/generate/async".to_string()
}

fn default_image_status_url() -> String {
    "https://aihorde.net/api/v2/generate/status".to_string()
}

fn default_api_key() -> String {
    "0000000000".to_string()
}

fn default_text_poll_secs() -> u64 {
    5
}

fn default_image_poll_secs() -> u64 {
    15
}

fn default_text_wait_secs() -> u64 {
    120
}

fn default_image_wait_secs() -> u64 {
    450
}

fn default_min_output_chars() -> usize {
    500
}

fn default_min_growth_ratio() -> f64 {
    1.5
}

fn default_min_input_chars() -> usize {
    100
}

impl BotConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
