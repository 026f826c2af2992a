//! Static control configuration: per-game action vocabularies and key tables,
//! plus the pose and gesture vocabularies (recorded motion file keys).

use crate::{MapperError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Controls for a single game
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameControls {
    /// Candidate in-game actions, in resolution order
    pub actions: Vec<String>,
    /// Action -> physical key
    #[serde(default)]
    pub keys: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlCatalog {
    pub games: BTreeMap<String, GameControls>,
    pub poses: Vec<String>,
    pub gestures: Vec<String>,
}

const POSES: &[&str] = &[
    "fist",
    "fist2",
    "five_fingers_pinch",
    "four_fingers_pinch",
    "full_pinch",
    "gun_click",
    "gun_click2",
    "gun_click3",
    "hand_backward",
    "hand_forward",
    "index_pinch",
    "index",
    "palm_stop",
    "peace",
    "pinky_2_up",
    "pinky_3_up",
    "pinky_up_education",
    "pinky_up",
    "punch_heavy",
    "punch_light",
    "shoot",
    "three_fingers_pinch_hand_closed",
    "three_fingers_pinch",
    "three_fingers_release_hand_closed",
    "three_fingers",
    "thumb_index_pinch_hand_closed",
    "thumb_index_pinch",
    "thumb_index_release_hand_closed",
    "thumb_index_release",
    "thumb_middle_pinch",
    "thumb_middle_release",
    "thumb_pinky_pinch",
    "thumb_pinky_release",
    "thumb_ring_pinch",
    "thumb_ring_release",
    "thumb_up",
];

const GESTURES: &[&str] = &[
    "bow_arrow",
    "fighting_stance",
    "front_kick",
    "hadouken",
    "helicopter",
    "index_pinch",
    "kick",
    "left_hook",
    "left_kick",
    "left_punch",
    "mine",
    "punch",
    "push_back",
    "right_clockwise_circle",
    "right_hook",
    "right_kick",
    "right_punch",
    "uppercut",
    "walk_left",
    "walk_right",
];

type GameTable = (&'static str, &'static [(&'static str, &'static str)]);

// Roblox controls vary per experience; these are only the common ones.
const GAMES: &[GameTable] = &[
    (
        "Minecraft",
        &[
            ("place", "right"),
            ("mine", "left"),
            ("break", "left"),
            ("inventory", "e"),
            ("punch", "left"),
            ("jump", "space"),
            ("crouch", "shift"),
            ("walk", "w"),
            ("run", "w"),
            ("sprint", "ctrl+w"),
        ],
    ),
    (
        "Roblox",
        &[
            ("jump", "space"),
            ("move", "wasd"),
            ("interact", "e"),
        ],
    ),
    (
        "Tetris",
        &[
            ("rotate", "up"),
            ("drop", "down"),
            ("switch", "c"),
            ("left", "left"),
            ("right", "right"),
            ("store", "c"),
        ],
    ),
    (
        "Lego Batman",
        &[
            ("attack", "space"),
            ("jump", "space"),
            ("special", "e"),
            ("switch", "q"),
            ("move", "wasd"),
        ],
    ),
    (
        "Batman (Arkham Series)",
        &[
            ("attack", "left"),
            ("counter", "right"),
            ("gadget", "e"),
            ("crouch", "ctrl"),
            ("run", "shift"),
        ],
    ),
    (
        "Subway Surfer",
        &[
            ("jump", "space"),
            ("left", "left"),
            ("right", "right"),
            ("roll", "down"),
        ],
    ),
    (
        "Rocket League",
        &[
            ("accelerate", "w"),
            ("brake", "s"),
            ("left", "a"),
            ("right", "d"),
            ("boost", "shift"),
            ("jump", "space"),
            ("power slide", "ctrl"),
        ],
    ),
    (
        "Horizon Zero Dawn",
        &[
            ("attack", "left"),
            ("aim", "right"),
            ("crouch", "ctrl"),
            ("jump", "space"),
            ("roll", "shift"),
        ],
    ),
    (
        "FIFA",
        &[
            ("pass", "a"),
            ("shoot", "s"),
            ("sprint", "shift"),
            ("tackle", "d"),
            ("change player", "q"),
        ],
    ),
];

impl Default for ControlCatalog {
    fn default() -> Self {
        let games = GAMES
            .iter()
            .map(|(name, table)| {
                let controls = GameControls {
                    actions: table.iter().map(|(a, _)| a.to_string()).collect(),
                    keys: table
                        .iter()
                        .map(|(a, k)| (a.to_string(), k.to_string()))
                        .collect(),
                };
                (name.to_string(), controls)
            })
            .collect();
        Self {
            games,
            poses: POSES.iter().map(|s| s.to_string()).collect(),
            gestures: GESTURES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ControlCatalog {
    /// Look up a game by name. Names compare ASCII case-insensitively so a
    /// typed "fifa" finds "FIFA"; the stored name is returned alongside.
    pub fn game(&self, name: &str) -> Option<(&str, &GameControls)> {
        if let Some((k, v)) = self.games.get_key_value(name) {
            return Some((k.as_str(), v));
        }
        self.games
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Ordered action vocabulary for a game, if the game is known
    pub fn actions_for(&self, game: &str) -> Option<&[String]> {
        self.game(game).map(|(_, c)| c.actions.as_slice())
    }

    pub fn game_names(&self) -> impl Iterator<Item = &str> {
        self.games.keys().map(String::as_str)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, controls) in &self.games {
            if name.trim().is_empty() {
                return Err(MapperError::Catalog("game with empty name".into()));
            }
            if controls.actions.iter().any(|a| a.trim().is_empty()) {
                return Err(MapperError::Catalog(format!(
                    "game '{}' has an empty action",
                    name
                )));
            }
        }
        if self.poses.iter().chain(&self.gestures).any(|v| v.trim().is_empty()) {
            return Err(MapperError::Catalog(
                "empty pose or gesture vocabulary entry".into(),
            ));
        }
        Ok(())
    }
}

pub fn load_catalog_file(path: impl AsRef<Path>) -> anyhow::Result<ControlCatalog> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading catalog: {}", path.display()))?;
    let catalog: ControlCatalog =
        serde_yaml::from_str(&raw).with_context(|| format!("parsing yaml: {}", path.display()))?;
    catalog
        .validate()
        .with_context(|| format!("validating catalog: {}", path.display()))?;
    tracing::info!(
        "loaded control catalog with {} games from {}",
        catalog.games.len(),
        path.display()
    );
    Ok(catalog)
}
