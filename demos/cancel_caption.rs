use gemini_caption::{ConfigOverrides, Tone};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Demonstrates abandoning a caption request after a deadline.
///
/// The request timeout bounds a single HTTP call; the cancellation token lets
/// the caller give up earlier, for example when the user navigates away.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let image_path = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cancel_caption <image_path> [deadline_ms]");
        std::process::exit(1);
    });

    let deadline_ms: u64 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(500);

    let config = gemini_caption::load_config(None, ConfigOverrides::from_env()?)?;
    let client = reqwest::Client::new();
    let image = std::fs::read(&image_path)?;

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(deadline_ms)).await;
        trigger.cancel();
    });

    println!("Captioning {} (giving up after {}ms)...", image_path, deadline_ms);

    match gemini_caption::caption_image_bytes_cancellable(
        &client,
        &config,
        &image,
        Tone::Short,
        &token,
    )
    .await
    {
        Ok(caption) => println!("Caption: {}", caption),
        Err(e) => println!("{} ({:?})", e.display_message(), e.kind()),
    }

    Ok(())
}
