use crate::models::request::{ImageSamplers, TextSamplers};
use crate::services::fallback::{ImagePlan, Orchestrator, TextPlan};
use crate::services::normalize::normalize;
use crate::services::transport::Transport;

/// Result of enhancing one article. Always populated.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedArticle {
    pub title: String,
    pub article: String,
}

/// A recently posted article, used as grounding context for answers.
#[derive(Debug, Clone)]
pub struct RecentArticle {
    pub headline: String,
    pub excerpt: String,
}

/// Pipeline tunables: input cutoff plus per-family model lists and samplers.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Summaries shorter than this are echoed back without any remote call.
    pub min_input_chars: usize,
    pub text_models: Vec<String>,
    pub image_models: Vec<String>,
    pub text_samplers: TextSamplers,
    pub image_samplers: ImageSamplers,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_input_chars: 100,
            text_models: Vec::new(),
            image_models: Vec::new(),
            text_samplers: TextSamplers::default(),
            image_samplers: ImageSamplers::default(),
        }
    }
}

/// Composes the normalizer and the fallback orchestrator into the operations
/// the bot's callers use. Every public operation returns a usable value;
/// degraded output is preferred over failure.
pub struct ContentPipeline<T> {
    orchestrator: Orchestrator<T>,
    config: PipelineConfig,
}

impl<T: Transport> ContentPipeline<T> {
    pub fn new(orchestrator: Orchestrator<T>, config: PipelineConfig) -> Self {
        Self {
            orchestrator,
            config,
        }
    }

    /// Rewrite a headline/summary pair into a full article.
    ///
    /// Minimal input is echoed back unchanged rather than spent on a
    /// generation call: an empty summary echoes the headline as the body.
    pub async fn enhance_article(&self, headline: &str, summary: &str) -> EnhancedArticle {
        let summary = summary.trim();
        if summary.len() < self.config.min_input_chars {
            tracing::info!(
                headline,
                summary_chars = summary.len(),
                "Summary below input cutoff, echoing without enhancement"
            );
            let article = if summary.is_empty() {
                headline.to_string()
            } else {
                summary.to_string()
            };
            return EnhancedArticle {
                title: headline.to_string(),
                article,
            };
        }

        let plan = TextPlan {
            primary_prompt: enhance_prompt(headline, summary),
            forceful_prompt: enhance_forceful_prompt(headline, summary),
            fallback_text: canned_article(headline, summary),
            models: self.config.text_models.clone(),
            samplers: self.config.text_samplers.clone(),
            reference_len: summary.len(),
        };

        let raw = self.orchestrator.run_text(&plan).await;
        let mut cleaned = strip_preamble(&normalize(&raw));
        if cleaned.is_empty() {
            // Accepted output can still be all preamble; keep the floor.
            tracing::warn!(headline, "Output reduced to nothing, using canned template");
            cleaned = canned_article(headline, summary);
        }
        let (split_title, article) = split_leading_title(&cleaned);

        EnhancedArticle {
            title: split_title.unwrap_or_else(|| headline.to_string()),
            article,
        }
    }

    /// Derive a concise, non-literal image prompt from a headline and an
    /// article excerpt. Falls back to a deterministic template on any
    /// failure, so it can never block image generation.
    pub async fn generate_image_prompt(&self, headline: &str, excerpt: &str) -> String {
        let excerpt: String = excerpt.chars().take(600).collect();
        let mut samplers = self.config.text_samplers.clone();
        samplers.max_length = 120;

        let plan = TextPlan {
            primary_prompt: image_prompt_prompt(headline, &excerpt),
            forceful_prompt: image_prompt_forceful_prompt(headline),
            fallback_text: canned_image_prompt(headline),
            models: self.config.text_models.clone(),
            samplers,
            reference_len: 0,
        };

        let raw = self.orchestrator.run_text(&plan).await;
        let first_line = normalize(&raw)
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(|l| l.trim_matches('"').to_string())
            .filter(|l| !l.is_empty());

        match first_line {
            Some(line) => line.chars().take(300).collect(),
            None => canned_image_prompt(headline),
        }
    }

    /// Generate an illustrative image for a headline. `None` means the whole
    /// ladder failed and the caller should post text-only.
    pub async fn generate_image(&self, headline: &str, prompt: &str) -> Option<String> {
        let plan = ImagePlan {
            prompt: prompt.to_string(),
            models: self.config.image_models.clone(),
            samplers: self.config.image_samplers.clone(),
        };

        match self.orchestrator.run_image(&plan).await {
            Some(payload) => {
                tracing::info!(
                    headline,
                    durable_ref = %payload.durable_ref(),
                    "Generated image"
                );
                Some(payload.url)
            }
            None => {
                tracing::warn!(headline, "No image produced, caller posts text-only");
                None
            }
        }
    }

    /// Answer a user question grounded in recently posted articles.
    ///
    /// Total failure degrades to a canned apology referencing the most
    /// recent headline when one exists.
    pub async fn answer_question(&self, question: &str, recent: &[RecentArticle]) -> String {
        let plan = TextPlan {
            primary_prompt: answer_prompt(question, recent),
            forceful_prompt: answer_forceful_prompt(question, recent),
            fallback_text: canned_apology(recent),
            models: self.config.text_models.clone(),
            samplers: self.config.text_samplers.clone(),
            reference_len: 0,
        };

        let raw = self.orchestrator.run_text(&plan).await;
        let cleaned = strip_preamble(&normalize(&raw));
        if cleaned.is_empty() {
            canned_apology(recent)
        } else {
            cleaned
        }
    }
}

impl ContentPipeline<crate::services::transport::HttpTransport> {
    /// Wire the whole stack (transport, clients, orchestrator, pipeline)
    /// from environment configuration.
    pub fn from_config(cfg: &crate::config::BotConfig) -> Self {
        use crate::models::request::JobKind;
        use crate::services::client::JobClient;
        use crate::services::fallback::FallbackPolicy;
        use crate::services::transport::{Endpoints, HttpTransport};
        use std::time::Duration;

        let transport = HttpTransport::new(
            Endpoints {
                text_submit_url: cfg.text_submit_url.clone(),
                text_status_url: cfg.text_status_url.clone(),
                image_submit_url: cfg.image_submit_url.clone(),
                image_status_url: cfg.image_status_url.clone(),
            },
            cfg.api_key.clone(),
        );

        let text = JobClient::new(
            transport.clone(),
            JobKind::Text,
            Duration::from_secs(cfg.text_poll_secs),
        );
        let image = JobClient::new(
            transport,
            JobKind::Image,
            Duration::from_secs(cfg.image_poll_secs),
        );

        let policy = FallbackPolicy {
            min_output_chars: cfg.min_output_chars,
            min_growth_ratio: cfg.min_growth_ratio,
            refusal_phrases: cfg.refusal_phrases.clone(),
            text_wait: Duration::from_secs(cfg.text_wait_secs),
            image_wait: Duration::from_secs(cfg.image_wait_secs),
        };

        let config = PipelineConfig {
            min_input_chars: cfg.min_input_chars,
            text_models: cfg.text_models.clone(),
            image_models: cfg.image_models.clone(),
            ..PipelineConfig::default()
        };

        Self::new(Orchestrator::new(text, image, policy), config)
    }
}

// ---- Post-processing ------------------------------------------------------

const PREAMBLE_MARKERS: &[&str] = &[
    "here's an enhanced",
    "here is an enhanced",
    "here's the enhanced",
    "here is the enhanced",
    "here's a rewritten",
    "here is a rewritten",
    "here's the article",
    "here is the article",
    "as requested",
    "sure, here",
    "certainly! here",
    "enhanced version:",
];

/// Drop leading meta-commentary lines the model sometimes prepends.
pub fn strip_preamble(text: &str) -> String {
    let mut rest = text;
    loop {
        let Some(first_line) = rest.lines().next() else {
            break;
        };
        let lowered = first_line.trim().to_lowercase();
        let is_preamble = !lowered.is_empty()
            && first_line.len() <= 120
            && PREAMBLE_MARKERS.iter().any(|m| lowered.contains(m));
        if !is_preamble {
            break;
        }
        rest = match rest.split_once('\n') {
            Some((_, tail)) => tail,
            None => "",
        };
        rest = rest.trim_start_matches('\n');
    }
    rest.trim().to_string()
}

/// Split off a leading `# heading` or `Title:` line when it is followed by a
/// paragraph break. Returns `(title, body)`; no split leaves the body whole.
pub fn split_leading_title(text: &str) -> (Option<String>, String) {
    let Some((head, body)) = text.split_once("\n\n") else {
        return (None, text.to_string());
    };
    if head.lines().count() != 1 {
        return (None, text.to_string());
    }

    let head = head.trim();
    let lowered = head.to_lowercase();
    let title = if head.starts_with('#') {
        Some(head.trim_start_matches('#').trim().to_string())
    } else if lowered.starts_with("title:") {
        Some(head["title:".len()..].trim().to_string())
    } else {
        None
    };

    match title.filter(|t| !t.is_empty()) {
        Some(t) if !body.trim().is_empty() => (Some(t), body.trim().to_string()),
        _ => (None, text.to_string()),
    }
}

// ---- Prompt templates -----------------------------------------------------

fn enhance_prompt(headline: &str, summary: &str) -> String {
    format!(
        "You are a news writer. Expand the following wire summary into a \
         complete, factual news article of several paragraphs. Keep every \
         fact from the summary, do not invent quotes, and write in a neutral \
         tone.\n\nHeadline: {headline}\n\nSummary:\n{summary}\n\nArticle:"
    )
}

fn enhance_forceful_prompt(headline: &str, summary: &str) -> String {
    format!(
        "Write the full body of a news article for the headline below. Begin \
         with the first sentence of the article immediately. Do not explain \
         what you are doing, do not apologize, do not mention being an AI, \
         and do not add any commentary before or after the article.\n\n\
         Headline: {headline}\n\nSource material:\n{summary}\n\nArticle body:"
    )
}

fn canned_article(headline: &str, summary: &str) -> String {
    format!(
        "{headline}\n\n{summary}\n\n(Full coverage of this story is still in \
         progress; the original wire summary appears above.)"
    )
}

fn image_prompt_prompt(headline: &str, excerpt: &str) -> String {
    format!(
        "Suggest a single concise prompt for an image generator to \
         illustrate this news story. Describe a scene, mood, and style; do \
         not depict text, logos, or real people's faces; do not restate the \
         headline literally. Reply with the prompt only.\n\n\
         Headline: {headline}\n\nExcerpt:\n{excerpt}"
    )
}

fn image_prompt_forceful_prompt(headline: &str) -> String {
    format!(
        "Reply with one line only: an image-generation prompt illustrating \
         the news story \"{headline}\" as a scene with a mood and an art \
         style. No commentary, no quotation marks, no refusals."
    )
}

fn canned_image_prompt(headline: &str) -> String {
    format!(
        "editorial illustration for a news story about {headline}, dramatic \
         lighting, muted palette, digital painting"
    )
}

fn answer_prompt(question: &str, recent: &[RecentArticle]) -> String {
    let mut context = String::new();
    for (i, article) in recent.iter().take(5).enumerate() {
        context.push_str(&format!(
            "[{n}] {headline}\n{excerpt}\n\n",
            n = i + 1,
            headline = article.headline,
            excerpt = article.excerpt
        ));
    }
    format!(
        "Answer the reader's question using only the recent articles below. \
         If the articles do not cover it, say so briefly.\n\n\
         Recent articles:\n{context}Question: {question}\n\nAnswer:"
    )
}

fn answer_forceful_prompt(question: &str, recent: &[RecentArticle]) -> String {
    let headlines: Vec<&str> = recent
        .iter()
        .take(5)
        .map(|a| a.headline.as_str())
        .collect();
    format!(
        "Give a direct, factual answer to the question below, based on these \
         recent headlines: {}. Start with the answer itself; no preamble, no \
         apologies.\n\nQuestion: {question}\n\nAnswer:",
        headlines.join("; ")
    )
}

fn canned_apology(recent: &[RecentArticle]) -> String {
    match recent.first() {
        Some(article) => format!(
            "Sorry, I couldn't put together an answer just now. The most \
             recent story I posted was \"{}\" if that helps.",
            article.headline
        ),
        None => "Sorry, I couldn't put together an answer just now. Please \
                 try again in a little while."
            .to_string(),
    }
}
