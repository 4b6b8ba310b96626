use tracing_subscriber::EnvFilter;

use hordecast::config::BotConfig;
use hordecast::services::pipeline::ContentPipeline;

/// One-shot runner: enhance a headline/summary pair and illustrate it.
///
/// Usage: `hordecast <headline> [summary]`
#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = BotConfig::from_env().expect("Failed to load configuration from environment");

    let mut args = std::env::args().skip(1);
    let headline = args.next().unwrap_or_else(|| {
        eprintln!("usage: hordecast <headline> [summary]");
        std::process::exit(2);
    });
    let summary = args.next().unwrap_or_default();

    tracing::info!(headline = %headline, "Initializing hordecast pipeline");
    let pipeline = ContentPipeline::from_config(&config);

    let enhanced = pipeline.enhance_article(&headline, &summary).await;
    tracing::info!(
        title = %enhanced.title,
        article_chars = enhanced.article.len(),
        "Enhancement complete"
    );

    let image_prompt = pipeline
        .generate_image_prompt(&headline, &enhanced.article)
        .await;
    tracing::info!(image_prompt = %image_prompt, "Image prompt ready");

    let image_url = pipeline.generate_image(&headline, &image_prompt).await;
    match &image_url {
        Some(url) => tracing::info!(url = %url, "Image generated"),
        None => tracing::warn!("No image generated, posting text-only"),
    }

    println!("== {} ==\n", enhanced.title);
    println!("{}\n", enhanced.article);
    if let Some(url) = image_url {
        println!("[image] {url}");
    }
}
