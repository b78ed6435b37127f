use gemini_caption::{ConfigOverrides, Tone};
use std::path::Path;

/// Caption one image in every tone.
///
/// Reads `GEMINI_API_KEY` (and the other `GEMINI_*` variables) from the
/// environment or a `.env` file.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let image_path = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: caption_file <image_path>");
        std::process::exit(1);
    });

    let config = gemini_caption::load_config(None, ConfigOverrides::from_env()?)?;
    let client = reqwest::Client::new();

    println!("Captioning {} with model '{}'...", image_path, config.model);

    for tone in Tone::ALL {
        let result =
            gemini_caption::caption_image(&client, &config, Path::new(&image_path), tone).await;
        match result {
            Ok(caption) => println!("  {:<12} {}", tone.label(), caption),
            Err(e) => println!("  {:<12} [{:?}] {}", tone.label(), e.kind(), e.display_message()),
        }
    }

    Ok(())
}
