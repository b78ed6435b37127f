//! gemini-caption - caption images in a chosen tone with Google Gemini.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gemini_caption::config::{self, ConfigOverrides};
use gemini_caption::server::{self, AppState};
use gemini_caption::{CaptionError, GeminiCaptionConfig, Tone};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML secrets file (default: .streamlit/secrets.toml if present)
    #[arg(long, global = true)]
    secrets: Option<PathBuf>,

    /// Gemini API key
    #[arg(long, env = config::API_KEY_VAR, global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini API host
    #[arg(long, env = config::BASE_URL_VAR, global = true)]
    endpoint: Option<String>,

    /// Model name
    #[arg(long, env = config::MODEL_VAR, global = true)]
    model: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = config::TIMEOUT_VAR, global = true)]
    timeout_secs: Option<u64>,

    /// Log at info level instead of warn
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Caption a single JPEG or PNG file
    Caption {
        /// Image to caption
        image: PathBuf,

        /// Caption style: default, funny, emotional, professional, short
        #[arg(short, long, default_value_t = Tone::Default)]
        tone: Tone,
    },
    /// Serve the upload page
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(short, long, default_value_t = 8501)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (before clap reads the environment)
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(args.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let overrides = ConfigOverrides {
        api_key: args.api_key,
        endpoint: args.endpoint,
        model: args.model,
        timeout_secs: args.timeout_secs,
    };
    let config = config::load_config(args.secrets.as_deref(), overrides)?;
    let client = reqwest::Client::new();

    match args.command {
        Command::Caption { image, tone } => Ok(caption_once(&client, &config, &image, tone).await),
        Command::Serve { host, port } => {
            server::serve(AppState::new(client, config), &host, port).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Log filter used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "gemini_caption=info"
    } else {
        "gemini_caption=warn"
    }
}

async fn caption_once(
    client: &reqwest::Client,
    config: &GeminiCaptionConfig,
    image: &Path,
    tone: Tone,
) -> ExitCode {
    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("✨ Generating caption...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = match tokio::fs::read(image).await {
        Ok(bytes) => {
            gemini_caption::caption_image_bytes_cancellable(client, config, &bytes, tone, &cancel)
                .await
        }
        Err(e) => Err(CaptionError::ImageRead(format!("{}: {}", image.display(), e))),
    };

    spinner.finish_and_clear();

    match result {
        Ok(caption) => {
            println!("{}", caption);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.display_message());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_unless_verbose() {
        assert_eq!(default_filter(false), "gemini_caption=warn");
        assert_eq!(default_filter(true), "gemini_caption=info");
    }

    #[test]
    fn tone_defaults_to_standard() {
        let args = Args::try_parse_from(["gemini-caption", "caption", "cat.png"]).unwrap();
        assert!(!args.verbose);
        assert!(matches!(
            args.command,
            Command::Caption { tone: Tone::Default, .. }
        ));
    }
}
