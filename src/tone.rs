//! Caption tones and their fixed instruction prompts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Style of caption requested from the model.
///
/// Each tone maps to exactly one instruction prompt. The set is closed: free-form
/// labels go through [`Tone::from_label`], which falls back to [`Tone::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Default,
    Funny,
    Emotional,
    Professional,
    Short,
}

impl Tone {
    /// All tones, in the order they are offered to the user.
    pub const ALL: [Tone; 5] = [
        Tone::Default,
        Tone::Funny,
        Tone::Emotional,
        Tone::Professional,
        Tone::Short,
    ];

    /// Instruction sent to the model alongside the image.
    pub fn prompt(self) -> &'static str {
        match self {
            Tone::Default => {
                "Generate a concise and descriptive caption for this image in 1-2 sentences."
            }
            Tone::Funny => "Generate a humorous and witty caption for this image.",
            Tone::Emotional => "Generate an emotional and touching caption for this image.",
            Tone::Professional => "Generate a professional and formal caption for this image.",
            Tone::Short => "Generate a very short caption for this image (10 words max).",
        }
    }

    /// Machine key used in forms, flags and JSON.
    pub fn key(self) -> &'static str {
        match self {
            Tone::Default => "default",
            Tone::Funny => "funny",
            Tone::Emotional => "emotional",
            Tone::Professional => "professional",
            Tone::Short => "short",
        }
    }

    /// Human-facing label shown in the style selector.
    pub fn label(self) -> &'static str {
        match self {
            Tone::Default => "Standard",
            Tone::Funny => "Humorous",
            Tone::Emotional => "Emotional",
            Tone::Professional => "Professional",
            Tone::Short => "Short",
        }
    }

    /// Resolve a free-form key, case-sensitively.
    ///
    /// Unrecognized keys resolve to [`Tone::Default`].
    pub fn from_label(label: &str) -> Tone {
        label.parse().unwrap_or_default()
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A tone key that is not one of the five known keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tone '{0}' (expected one of: default, funny, emotional, professional, short)")]
pub struct UnknownTone(pub String);

impl FromStr for Tone {
    type Err = UnknownTone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|tone| tone.key() == s)
            .ok_or_else(|| UnknownTone(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_match_fixed_instructions() {
        assert_eq!(
            Tone::Default.prompt(),
            "Generate a concise and descriptive caption for this image in 1-2 sentences."
        );
        assert_eq!(
            Tone::Funny.prompt(),
            "Generate a humorous and witty caption for this image."
        );
        assert_eq!(
            Tone::Emotional.prompt(),
            "Generate an emotional and touching caption for this image."
        );
        assert_eq!(
            Tone::Professional.prompt(),
            "Generate a professional and formal caption for this image."
        );
        assert_eq!(
            Tone::Short.prompt(),
            "Generate a very short caption for this image (10 words max)."
        );
    }

    #[test]
    fn known_keys_resolve() {
        for tone in Tone::ALL {
            assert_eq!(Tone::from_label(tone.key()), tone);
        }
    }

    #[test]
    fn unknown_label_falls_back_to_default() {
        assert_eq!(Tone::from_label("sarcastic"), Tone::Default);
        assert_eq!(Tone::from_label(""), Tone::Default);
        assert_eq!(Tone::from_label("sarcastic").prompt(), Tone::Default.prompt());
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(Tone::from_label("Funny"), Tone::Default);
        assert!("SHORT".parse::<Tone>().is_err());
    }

    #[test]
    fn strict_parse_reports_unknown() {
        let err = "humorous".parse::<Tone>().unwrap_err();
        assert_eq!(err, UnknownTone("humorous".to_string()));
        assert!(err.to_string().contains("humorous"));
    }

    #[test]
    fn serde_uses_keys() {
        let json = serde_json::to_string(&Tone::Professional).unwrap();
        assert_eq!(json, "\"professional\"");
        let tone: Tone = serde_json::from_str("\"short\"").unwrap();
        assert_eq!(tone, Tone::Short);
    }
}
