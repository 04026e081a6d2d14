use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};

use tts_speak::{
    config::Config,
    errors::{constants::DEFAULT_CONFIG_PATH, validation::validate_tts_text, TTSError},
    trace::init_tracing_subscriber,
    tts::synthesizer::SpeechSynthesizer,
};

/// Speak text through Google Cloud Text-to-Speech.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Config file; environment variables are used when it does not exist
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Return as soon as playback has started
    #[arg(long)]
    no_wait: bool,

    /// Log at debug level and dump metrics to stdout
    #[arg(short, long)]
    verbose: bool,

    /// Text to speak
    #[arg(required = true)]
    text: Vec<String>,
}

async fn run(text: &str, no_wait: bool, config: &Config) -> anyhow::Result<()> {
    let synthesizer = SpeechSynthesizer::from_config(config).await?;
    let result = synthesizer.try_synthesize_and_play(text).await?;

    if !no_wait {
        result.playback.wait().await;
        info!("Speech playback complete");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load config
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Cannot load config file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let _guard = match init_tracing_subscriber(&config.otel_http_url, level) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Cannot initialize tracing: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Refuse empty or oversized input before the synthesizer sees it.
    let text = cli.text.join(" ");
    if let Err(e) = validate_tts_text(&text) {
        match e {
            TTSError::InvalidInput(message) => eprintln!("{}", message),
            e => eprintln!("{}", e),
        }
        return ExitCode::from(2);
    }

    if let Err(e) = run(&text, cli.no_wait, &config).await {
        error!(error = %e, "Error using Google TTS API");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
