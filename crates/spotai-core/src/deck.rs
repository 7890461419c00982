//! Video clips, pairs and the round deck.
//!
//! The deck is the canonical, ordered list of pairs. A session never reorders
//! it; shuffling produces a separate [`PlayOrder`] of indices into the deck so
//! that statistics can always be keyed by the canonical round number.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpotaiError};

/// Number of pairs in the built-in deck.
pub const DEFAULT_DECK_SIZE: usize = 10;

/// A single playable clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoClip {
    /// Playback locator. Opaque to the game.
    pub uri: String,
    /// Pre-labeled ground truth for this clip.
    #[serde(rename = "ai_generated")]
    pub is_ai_generated: bool,
}

impl VideoClip {
    pub fn new(uri: impl Into<String>, is_ai_generated: bool) -> Self {
        Self {
            uri: uri.into(),
            is_ai_generated,
        }
    }
}

/// Which of the two clips the player picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// The two candidate clips of one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoPair {
    pub left: VideoClip,
    pub right: VideoClip,
}

impl VideoPair {
    pub fn new(left: VideoClip, right: VideoClip) -> Self {
        Self { left, right }
    }

    pub fn clip(&self, side: Side) -> &VideoClip {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Returns the side holding the AI-generated clip.
    ///
    /// Falls back to the left side when the pair is mislabeled (no AI clip);
    /// when both are flagged the left one wins as well.
    pub fn ai_side(&self) -> Side {
        if !self.left.is_ai_generated && self.right.is_ai_generated {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// True when exactly one clip is flagged as AI-generated.
    pub fn is_well_formed(&self) -> bool {
        self.left.is_ai_generated != self.right.is_ai_generated
    }
}

/// The fixed, canonical sequence of pairs for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundDeck {
    pairs: Vec<VideoPair>,
}

impl RoundDeck {
    /// Builds a deck, rejecting an empty pair list.
    ///
    /// Pairs that do not hold exactly one AI clip are accepted but logged.
    pub fn new(pairs: Vec<VideoPair>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(SpotaiError::invalid_deck("deck must contain at least one pair"));
        }

        for (index, pair) in pairs.iter().enumerate() {
            if !pair.is_well_formed() {
                tracing::warn!(
                    "[Deck] Round {} does not have exactly one AI-generated clip ({} / {})",
                    index + 1,
                    pair.left.uri,
                    pair.right.uri
                );
            }
        }

        Ok(Self { pairs })
    }

    /// The ten built-in rounds: AI clip on the left, real footage on the right.
    pub fn builtin(media_base: &str) -> Self {
        let base = media_base.trim_end_matches('/');
        let pairs = (1..=DEFAULT_DECK_SIZE)
            .map(|n| {
                VideoPair::new(
                    VideoClip::new(format!("{base}/IA-{n}.mp4"), true),
                    VideoClip::new(format!("{base}/Reel-{n}.mp4"), false),
                )
            })
            .collect();
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[VideoPair] {
        &self.pairs
    }

    /// Gets the pair at a canonical 0-based index.
    pub fn get(&self, index: usize) -> Option<&VideoPair> {
        self.pairs.get(index)
    }
}

/// Presentation order for one session: a permutation of deck indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOrder {
    indices: Vec<usize>,
}

impl PlayOrder {
    /// Canonical order, 0..len.
    pub fn identity(len: usize) -> Self {
        Self {
            indices: (0..len).collect(),
        }
    }

    pub fn shuffled<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(rng);
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Maps a play position to its canonical deck index.
    pub fn deck_index(&self, position: usize) -> Option<usize> {
        self.indices.get(position).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pair(n: usize) -> VideoPair {
        VideoPair::new(
            VideoClip::new(format!("ai-{n}"), true),
            VideoClip::new(format!("real-{n}"), false),
        )
    }

    #[test]
    fn test_empty_deck_rejected() {
        let err = RoundDeck::new(Vec::new()).unwrap_err();
        assert!(matches!(err, SpotaiError::InvalidDeck(_)));
    }

    #[test]
    fn test_mislabeled_pair_is_accepted() {
        let both_real = VideoPair::new(VideoClip::new("a", false), VideoClip::new("b", false));
        assert!(!both_real.is_well_formed());
        let deck = RoundDeck::new(vec![both_real]).unwrap();
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_builtin_deck() {
        let deck = RoundDeck::builtin("/videos/");
        assert_eq!(deck.len(), DEFAULT_DECK_SIZE);
        let first = deck.get(0).unwrap();
        assert_eq!(first.left.uri, "/videos/IA-1.mp4");
        assert_eq!(first.right.uri, "/videos/Reel-1.mp4");
        assert!(deck.pairs().iter().all(VideoPair::is_well_formed));
        assert_eq!(deck.get(9).unwrap().ai_side(), Side::Left);
    }

    #[test]
    fn test_ai_side() {
        let swapped = VideoPair::new(VideoClip::new("real", false), VideoClip::new("ai", true));
        assert_eq!(swapped.ai_side(), Side::Right);
        assert_eq!(swapped.clip(Side::Right).uri, "ai");
    }

    #[test]
    fn test_shuffled_order_is_permutation() {
        let deck = RoundDeck::new((0..8).map(pair).collect()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let order = PlayOrder::shuffled(deck.len(), &mut rng);

        let mut seen: Vec<usize> = (0..order.len())
            .map(|p| order.deck_index(p).unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
        assert_eq!(order.deck_index(8), None);
        // canonical deck untouched
        assert_eq!(deck.get(0).unwrap().left.uri, "ai-0");
    }

    #[test]
    fn test_deck_deserializes_with_flag_rename() {
        let json = r#"{"pairs":[{"left":{"uri":"a","ai_generated":true},"right":{"uri":"b","ai_generated":false}}]}"#;
        let deck: RoundDeck = serde_json::from_str(json).unwrap();
        assert!(deck.get(0).unwrap().left.is_ai_generated);
    }
}
