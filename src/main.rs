use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use arabic_tts_relay::controllers::tts::TtsController;
use arabic_tts_relay::domain::tts::TtsService;
use arabic_tts_relay::infrastructure::config::{Config, LogFormat};
use arabic_tts_relay::infrastructure::http::start_http_server;
use arabic_tts_relay::infrastructure::repositories::HttpTtsRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration; a missing credential stops startup here
    let config = Config::from_env()?;

    init_logging(&config);

    if config.is_development() {
        tracing::debug!(config = ?config, "Loaded configuration");
    }

    tracing::info!(
        port = config.port,
        upstream = %config.upstream_url,
        upstream_timeout_secs = config.upstream_timeout.as_secs(),
        static_dir = %config.static_dir.display(),
        "Starting Arabic TTS relay"
    );

    let tts_repo = Arc::new(HttpTtsRepository::new(
        config.upstream_url.clone(),
        config.upstream_timeout,
    )?);
    let tts_service = Arc::new(TtsService::new(tts_repo, config.api_key.clone()));
    let tts_controller = Arc::new(TtsController::new(tts_service));

    start_http_server(Arc::new(config), tts_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "arabic_tts_relay=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
