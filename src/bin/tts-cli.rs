use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use tts_maker::client::{ClientStrategy, SynthesisClient};
use tts_maker::domain::catalog::{self, AudioFormat, Language, MAX_TEXT_LENGTH};
use tts_maker::domain::form::{SpeechForm, SubmitOutcome};
use tts_maker::domain::playback::{format_duration, AudioSource, ObjectUrlStore, PlaybackError};
use tts_maker::infrastructure::config::LogFormat;
use tts_maker::infrastructure::logging::init_logging;
use tts_maker::infrastructure::repositories::siliconflow_tts_repository::DEFAULT_ENDPOINT;

#[derive(Parser)]
#[command(name = "tts-cli", version, about = "Convert text to speech through the TTS Maker proxy or the vendor API")]
struct Cli {
    /// Log output format: pretty or json
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty", global = true)]
    log_format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesize text and save the audio
    Speak(SpeakArgs),
    /// List the available voices
    Voices {
        /// Language code (en, zh)
        #[arg(long, default_value = "en")]
        language: String,
    },
}

#[derive(Args)]
struct SpeakArgs {
    /// Text to speak; read from --file when omitted
    text: Option<String>,

    /// Read the text from a file
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Base URL of the proxy
    #[arg(long, env = "TTS_PROXY_URL", default_value = "http://127.0.0.1:8080")]
    proxy_url: String,

    /// Call the vendor API directly instead of the proxy
    #[arg(long)]
    direct: bool,

    /// Vendor endpoint used with --direct
    #[arg(long, env = "TTS_API_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Vendor API key used with --direct
    #[arg(long, env = "TTS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Language code (en, zh); selects the default voice
    #[arg(long, default_value = "en")]
    language: String,

    /// Voice id (anna_en) or vendor voice value
    #[arg(long)]
    voice: Option<String>,

    #[arg(long, default_value_t = catalog::DEFAULT_SPEED)]
    speed: f32,

    #[arg(long, default_value_t = catalog::DEFAULT_GAIN, allow_negative_numbers = true)]
    gain: f32,

    /// mp3, wav, opus or pcm
    #[arg(long, default_value = "mp3")]
    format: String,

    #[arg(long)]
    sample_rate: Option<u32>,

    /// Directory the audio is saved to
    #[arg(long, short, default_value = ".")]
    output_dir: PathBuf,

    /// File name; defaults to tts-audio-<timestamp>.<ext>
    #[arg(long)]
    file_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_format = if cli.log_format == "json" {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging(&log_format, Some("tts_maker=info"));

    match cli.command {
        Command::Voices { language } => list_voices(&language),
        Command::Speak(args) => speak(args).await,
    }
}

fn parse_language(code: &str) -> Result<Language> {
    Language::from_code(code).with_context(|| format!("unsupported language '{}'", code))
}

fn list_voices(language: &str) -> Result<()> {
    let language = parse_language(language)?;
    println!("Voices for {}:", language.display_name());
    for voice in catalog::voices_for(language) {
        println!("  {:<14} {:<10} {:?}  {}", voice.id, voice.name, voice.gender, voice.value);
    }
    Ok(())
}

async fn speak(args: SpeakArgs) -> Result<()> {
    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("provide the text to speak or --file"),
    };

    let strategy = if args.direct {
        let api_key = args
            .api_key
            .clone()
            .context("--direct requires --api-key or TTS_API_KEY")?;
        ClientStrategy::direct(args.endpoint.clone(), api_key)?
    } else {
        ClientStrategy::proxy(&args.proxy_url)?
    };
    let client = Arc::new(SynthesisClient::new(strategy));

    let form = SpeechForm::new(client.clone(), ObjectUrlStore::new());
    form.set_language(parse_language(&args.language)?);
    if let Some(voice) = &args.voice {
        let voice = catalog::find_voice(voice)
            .map(|v| v.value.clone())
            .unwrap_or_else(|| voice.clone());
        form.set_voice(voice);
    }
    form.set_speed(args.speed);
    form.set_gain(args.gain);
    form.set_format(AudioFormat::from_str_or_default(&args.format));
    if let Some(rate) = args.sample_rate {
        form.set_sample_rate(rate);
    }
    form.set_text(text);

    eprintln!(
        "Synthesizing {} characters (limit {})...",
        form.text().chars().count(),
        MAX_TEXT_LENGTH
    );

    match form.submit().await {
        SubmitOutcome::Completed => {}
        SubmitOutcome::Failed(message) => bail!("speech synthesis failed: {}", message),
        SubmitOutcome::Ignored => bail!("a synthesis request is already running"),
    }

    // The terminal has no media engine; report an unknown duration
    form.with_player(|player| player.metadata_loaded(0.0));

    let file_name = args.file_name.as_deref();
    let download = match form.with_player(|player| player.download(file_name)) {
        Err(PlaybackError::RemoteSource(url)) => {
            eprintln!("Fetching audio from {}", url);
            let (bytes, mime_type) = client.fetch_audio(&url).await?;
            form.with_player(|player| {
                player.load(AudioSource::Bytes { bytes, mime_type })?;
                player.metadata_loaded(0.0);
                Ok::<_, anyhow::Error>(player.download(file_name)?)
            })?
        }
        other => other?,
    };

    let path = download.save_to(&args.output_dir).await?;
    let duration = form.with_player(|player| player.duration());
    println!("{}", path.display());
    eprintln!(
        "Saved {} bytes ({})",
        download.bytes().len(),
        format_duration((duration > 0.0).then_some(duration))
    );

    Ok(())
}
