//! Built-in phrase-lexicon entity extractor
//!
//! Matches known phrases (game names, sides, body parts, pose/gesture
//! vocabulary, in-game actions) against word tokens. Longer spans win over
//! shorter ones, spans never overlap, and when the same phrase is known under
//! several labels the higher-priority label is kept.

use crate::entities::{Entity, EntityExtractor, EntityLabel};
use crate::{ControlCatalog, MapperError, Result};
use phrase_encoder::normalize_phrase;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

const ORIENTATIONS: &[&str] = &["left", "right"];

const LANDMARKS: &[&str] = &[
    "hand", "hands", "arm", "arms", "body", "head", "foot", "feet", "leg", "legs", "finger",
    "fingers",
];

const EXTRA_POSES: &[&str] = &["thumb down", "thumbs up", "thumbs down"];

// Common verbs that do not appear in any game's own action list
const EXTRA_ACTIONS: &[&str] = &[
    "destroy", "attack", "shoot", "pass", "boost", "interact", "move", "rotate", "drop", "throw",
    "cast", "dig", "build", "dodge", "fire",
];

const GAME_ALIASES: &[(&str, &str)] = &[
    ("batman", "Batman (Arkham Series)"),
    ("arkham", "Batman (Arkham Series)"),
    ("batman arkham", "Batman (Arkham Series)"),
    ("subway surfers", "Subway Surfer"),
    ("horizon", "Horizon Zero Dawn"),
];

#[derive(Debug, Clone)]
struct LexEntry {
    label: EntityLabel,
    /// Text emitted instead of the surface span (game aliases)
    canonical: Option<String>,
}

#[derive(Debug, Clone)]
struct Candidate {
    first: usize,
    last: usize,
    label: EntityLabel,
    canonical: Option<String>,
}

impl Candidate {
    fn len(&self) -> usize {
        self.last - self.first + 1
    }
}

#[derive(Debug, Clone, Default)]
pub struct LexiconExtractor {
    phrases: HashMap<String, LexEntry>,
    max_words: usize,
}

impl LexiconExtractor {
    /// Empty lexicon
    pub fn new() -> Self {
        Self::default()
    }

    /// Lexicon seeded from a control catalog plus the built-in word lists
    pub fn from_catalog(catalog: &ControlCatalog) -> Self {
        let mut lex = Self::new();
        for name in catalog.game_names() {
            lex.add_alias(EntityLabel::Game, name, name);
        }
        for (alias, game) in GAME_ALIASES {
            if catalog.game(game).is_some() {
                lex.add_alias(EntityLabel::Game, alias, game);
            }
        }
        for side in ORIENTATIONS {
            lex.add_phrase(EntityLabel::Orientation, side);
        }
        for part in LANDMARKS {
            lex.add_phrase(EntityLabel::Landmark, part);
        }
        for pose in catalog.poses.iter().map(String::as_str).chain(EXTRA_POSES.iter().copied()) {
            lex.add_phrase(EntityLabel::Pose, pose);
        }
        for gesture in &catalog.gestures {
            lex.add_phrase(EntityLabel::Gesture, gesture);
        }
        for controls in catalog.games.values() {
            for action in &controls.actions {
                lex.add_phrase(EntityLabel::Action, action);
            }
        }
        for action in EXTRA_ACTIONS {
            lex.add_phrase(EntityLabel::Action, action);
        }
        debug!("lexicon built with {} phrases", lex.len());
        lex
    }

    /// Register a phrase; matched spans keep their surface text
    pub fn add_phrase(&mut self, label: EntityLabel, phrase: &str) {
        self.insert(label, phrase, None);
    }

    /// Register a phrase that is emitted as `canonical` when matched
    pub fn add_alias(&mut self, label: EntityLabel, phrase: &str, canonical: &str) {
        self.insert(label, phrase, Some(canonical.to_string()));
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    fn insert(&mut self, label: EntityLabel, phrase: &str, canonical: Option<String>) {
        let key = normalize_phrase(phrase);
        if key.is_empty() {
            return;
        }
        if let Some(existing) = self.phrases.get(&key) {
            if existing.label.priority() <= label.priority() {
                return;
            }
        }
        self.max_words = self.max_words.max(key.split(' ').count());
        self.phrases.insert(key, LexEntry { label, canonical });
    }

    fn candidates(&self, words: &[&str]) -> Vec<Candidate> {
        let mut found = Vec::new();
        for first in 0..words.len() {
            let longest = self.max_words.min(words.len() - first);
            for n in 1..=longest {
                let key = words[first..first + n].join(" ");
                if let Some(entry) = self.phrases.get(&key) {
                    found.push(Candidate {
                        first,
                        last: first + n - 1,
                        label: entry.label,
                        canonical: entry.canonical.clone(),
                    });
                }
            }
        }
        found
    }
}

fn word_regex() -> Result<&'static Regex> {
    static WORD_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    WORD_REGEX
        .get_or_init(|| Regex::new(r"[\p{L}\p{N}]+").ok())
        .as_ref()
        .ok_or_else(|| MapperError::Extraction("word pattern failed to compile".into()))
}

impl EntityExtractor for LexiconExtractor {
    fn extract(&self, clause: &str) -> Result<Vec<Entity>> {
        let tokens: Vec<(usize, usize, String)> = word_regex()?
            .find_iter(clause)
            .map(|m| (m.start(), m.end(), m.as_str().to_lowercase()))
            .collect();
        let words: Vec<&str> = tokens.iter().map(|(_, _, w)| w.as_str()).collect();

        let mut candidates = self.candidates(&words);
        candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.first.cmp(&b.first)));

        let mut taken = vec![false; words.len()];
        let mut kept = Vec::new();
        for cand in candidates {
            if taken[cand.first..=cand.last].iter().any(|t| *t) {
                continue;
            }
            taken[cand.first..=cand.last].fill(true);
            kept.push(cand);
        }
        kept.sort_by_key(|c| c.first);

        Ok(kept
            .into_iter()
            .map(|c| {
                let start = tokens[c.first].0;
                let end = tokens[c.last].1;
                let text = c.canonical.unwrap_or_else(|| clause[start..end].to_string());
                Entity::new(c.label, text, start, end)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> LexiconExtractor {
        LexiconExtractor::from_catalog(&ControlCatalog::default())
    }

    fn labelled(entities: &[Entity]) -> Vec<(EntityLabel, &str)> {
        entities.iter().map(|e| (e.label, e.text.as_str())).collect()
    }

    #[test]
    fn test_extracts_example_sentence() {
        let text = "I want to play Minecraft with my right arm. To jump I will do a thumb down, \
                    index pinch to place down a block and three fingers to destroy.";
        let entities = lexicon().extract(text).unwrap();
        assert_eq!(
            labelled(&entities),
            [
                (EntityLabel::Game, "Minecraft"),
                (EntityLabel::Orientation, "right"),
                (EntityLabel::Landmark, "arm"),
                (EntityLabel::Action, "jump"),
                (EntityLabel::Pose, "thumb down"),
                (EntityLabel::Pose, "index pinch"),
                (EntityLabel::Action, "place"),
                (EntityLabel::Pose, "three fingers"),
                (EntityLabel::Action, "destroy"),
            ]
        );
    }

    #[test]
    fn test_offsets_point_at_surface_text() {
        let text = "Jump with a Fist";
        let entities = lexicon().extract(text).unwrap();
        for e in &entities {
            assert_eq!(text[e.start..e.end].to_lowercase(), e.text.to_lowercase());
        }
        assert_eq!(entities[1].text, "Fist");
    }

    #[test]
    fn test_longest_span_wins() {
        let entities = lexicon().extract("three fingers pinch").unwrap();
        assert_eq!(labelled(&entities), [(EntityLabel::Pose, "three fingers pinch")]);
    }

    #[test]
    fn test_pose_beats_gesture_for_same_phrase() {
        let entities = lexicon().extract("index pinch").unwrap();
        assert_eq!(entities[0].label, EntityLabel::Pose);
    }

    #[test]
    fn test_game_alias_emits_catalog_name() {
        let entities = lexicon().extract("let's play subway surfers").unwrap();
        assert_eq!(labelled(&entities), [(EntityLabel::Game, "Subway Surfer")]);

        let entities = lexicon().extract("Lego Batman please").unwrap();
        assert_eq!(labelled(&entities), [(EntityLabel::Game, "Lego Batman")]);
    }

    #[test]
    fn test_priority_is_order_independent() {
        let mut lex = LexiconExtractor::new();
        lex.add_phrase(EntityLabel::Action, "kick");
        lex.add_phrase(EntityLabel::Gesture, "kick");
        let mut other = LexiconExtractor::new();
        other.add_phrase(EntityLabel::Gesture, "kick");
        other.add_phrase(EntityLabel::Action, "kick");
        assert_eq!(lex.extract("kick").unwrap()[0].label, EntityLabel::Gesture);
        assert_eq!(other.extract("kick").unwrap()[0].label, EntityLabel::Gesture);
    }

    #[test]
    fn test_nothing_known() {
        assert!(lexicon().extract("hello there").unwrap().is_empty());
        assert!(LexiconExtractor::new().extract("jump").unwrap().is_empty());
    }
}
