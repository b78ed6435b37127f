//! # gemini-caption
//!
//! Tone-aware image captioning with Google Gemini vision models.
//!
//! ## Features
//!
//! - **Five caption tones** (default, funny, emotional, professional, short),
//!   each mapped to one fixed instruction prompt
//! - **JPEG/PNG uploads** flattened to RGB and re-encoded as JPEG before
//!   being sent as inline base64 data
//! - **Typed outcomes**: a caption or a [`CaptionError`] with an [`ErrorKind`],
//!   plus [`CaptionError::display_message`] for user-facing text
//! - **Explicit timeout** on every request and optional cancellation through a
//!   [`CancellationToken`](tokio_util::sync::CancellationToken)
//! - **Web shell** ([`server`]) with an upload page and a JSON endpoint
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gemini_caption::{GeminiCaptionConfig, Tone};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeminiCaptionConfig::with_api_key("your-api-key");
//!     let client = reqwest::Client::new();
//!
//!     let caption = gemini_caption::caption_image(
//!         &client, &config,
//!         Path::new("photo.jpg"),
//!         Tone::Funny,
//!     ).await?;
//!     println!("Caption: {}", caption);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Tones
//!
//! ```rust
//! use gemini_caption::Tone;
//!
//! assert_eq!(Tone::from_label("short"), Tone::Short);
//! // Unknown labels fall back to the default prompt
//! assert_eq!(Tone::from_label("sarcastic"), Tone::Default);
//! ```

pub mod captioner;
pub mod config;
pub mod encode;
pub mod parser;
pub mod payload;
pub mod server;
pub mod tone;
pub mod types;

// Re-export main types at crate root
pub use captioner::{
    caption_image, caption_image_base64, caption_image_base64_cancellable, caption_image_bytes,
    caption_image_bytes_cancellable, caption_text, CaptionError, ErrorKind,
};
pub use config::{load_config, ConfigError, ConfigOverrides};
pub use encode::{decode_base64_image, encode_jpeg_base64, EncodeError};
pub use parser::extract_caption;
pub use tone::{Tone, UnknownTone};
pub use types::{GeminiCaptionConfig, GenerationConfig};
