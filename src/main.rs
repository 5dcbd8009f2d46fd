use std::sync::Arc;
use tts_maker::controllers::synthesize::SynthesizeController;
use tts_maker::domain::tts::TtsService;
use tts_maker::infrastructure::config::Config;
use tts_maker::infrastructure::http::start_http_server;
use tts_maker::infrastructure::logging::init_logging;
use tts_maker::infrastructure::repositories::SiliconFlowTtsRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config.log_format, None);

    tracing::info!("Starting TTS Maker proxy on {}:{}", config.host, config.port);

    // Never log the key itself
    tracing::info!(
        environment = ?config.environment,
        endpoint = %config.tts_api_endpoint,
        api_key_configured = config.tts_api_key.is_some(),
        use_real_api = config.use_real_api,
        mode = ?config.synthesis_mode(),
        "TTS configuration loaded"
    );

    if config.tts_api_key.is_none() {
        tracing::warn!("TTS_API_KEY is not set; synthesis requests will be rejected");
    }

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    let tts_repo = Arc::new(SiliconFlowTtsRepository::new(
        config.tts_api_endpoint.clone(),
        config.tts_api_key.clone(),
    ));
    let tts_service = Arc::new(TtsService::new(tts_repo, config.synthesis_mode()));
    let synthesize_controller = Arc::new(SynthesizeController::new(tts_service));

    start_http_server(config, synthesize_controller).await?;

    Ok(())
}
