//! TOML deck files.
//!
//! ```toml
//! media_base = "https://cdn.example/videos"
//!
//! [[pair]]
//! left = { uri = "IA-1.mp4", ai_generated = true }
//! right = { uri = "Reel-1.mp4", ai_generated = false }
//! ```
//!
//! Relative URIs are joined onto `media_base`; absolute ones (with a scheme or
//! a leading `/`) are kept as written.

use serde::Deserialize;
use spotai_core::config::GameConfig;
use spotai_core::deck::{RoundDeck, VideoClip, VideoPair};
use spotai_core::error::{Result, SpotaiError};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct DeckFile {
    #[serde(default)]
    media_base: Option<String>,
    #[serde(rename = "pair", default)]
    pairs: Vec<VideoPair>,
}

/// Parses a deck from TOML text.
pub fn parse_deck(content: &str) -> Result<RoundDeck> {
    let file: DeckFile = toml::from_str(content)?;
    let base = file.media_base.as_deref().map(|b| b.trim_end_matches('/'));

    let pairs = file
        .pairs
        .into_iter()
        .map(|pair| VideoPair::new(resolve(pair.left, base), resolve(pair.right, base)))
        .collect();
    RoundDeck::new(pairs)
}

/// Reads and parses a deck file.
pub async fn load_deck(path: &Path) -> Result<RoundDeck> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        SpotaiError::invalid_deck(format!("cannot read {}: {}", path.display(), e))
    })?;
    let deck = parse_deck(&content)?;
    tracing::info!(
        "[DeckFile] Loaded {} pairs from {}",
        deck.len(),
        path.display()
    );
    Ok(deck)
}

/// The deck the game config asks for: its deck file, or the built-in one.
pub async fn deck_for(config: &GameConfig) -> Result<RoundDeck> {
    match &config.deck_file {
        Some(path) => load_deck(path).await,
        None => Ok(RoundDeck::builtin(&config.media_base)),
    }
}

fn resolve(clip: VideoClip, base: Option<&str>) -> VideoClip {
    match base {
        Some(base) if !is_absolute(&clip.uri) => {
            VideoClip::new(format!("{base}/{}", clip.uri), clip.is_ai_generated)
        }
        _ => clip,
    }
}

fn is_absolute(uri: &str) -> bool {
    uri.starts_with('/') || uri.contains("://")
}
