use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use parley_gateway::translator::TranslationBackend;
use parley_gateway::{ApiServer, ApiState, Config, SpeechToText, TextToSpeech, Translator};

/// Parley - voice translation gateway
#[derive(Parser)]
#[command(name = "parley", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "PARLEY_PORT")]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable the voice endpoints (translation only); the
    /// `PARLEY_DISABLE_VOICE` env toggle is read by the config layer
    #[arg(long)]
    disable_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a piece of text and print the result
    Translate {
        /// Text to translate
        text: String,
        /// Target language code (forwarded verbatim)
        #[arg(short, long, default_value = "es")]
        to: String,
    },
    /// List the languages offered by the picker surfaces
    Languages,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,parley_gateway=info",
        1 => "info,parley_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(Command::Languages) = cli.command {
        for lang in &parley_gateway::languages::LANGUAGES {
            println!("{}  {}", lang.code, lang.label);
        }
        return Ok(());
    }

    // Credential is validated here, at startup
    let config = Config::load()?;
    tracing::debug!(model = %config.model, "loaded configuration");

    let translator = Arc::new(Translator::new(
        config.api_key.clone(),
        config.model.clone(),
        config.request_timeout,
    )?);

    if let Some(Command::Translate { text, to }) = cli.command {
        if !parley_gateway::languages::is_listed(&to) {
            tracing::debug!(code = %to, "language not in the built-in list, forwarding verbatim");
        }
        let translation = translator.translate(&text, &to).await?;
        println!("{translation}");
        return Ok(());
    }

    let voice_enabled = config.voice.enabled && !cli.disable_voice;
    let (stt, tts) = if voice_enabled {
        (
            Some(Arc::new(SpeechToText::new(
                config.api_key.clone(),
                config.voice.stt_model.clone(),
            )?)),
            Some(Arc::new(TextToSpeech::new(
                config.api_key.clone(),
                config.voice.tts_model.clone(),
                config.voice.tts_voice.clone(),
                config.voice.tts_speed,
            )?)),
        )
    } else {
        (None, None)
    };

    let state = Arc::new(ApiState {
        translator,
        model: config.model.clone(),
        stt,
        tts,
    });

    let port = cli.port.unwrap_or(config.port);
    if voice_enabled {
        tracing::info!(port, "parley gateway ready");
    } else {
        tracing::info!(port, "parley gateway ready (translation only, voice disabled)");
    }

    ApiServer::new(state, port).run().await?;

    Ok(())
}
