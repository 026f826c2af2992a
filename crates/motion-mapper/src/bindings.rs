//! Two-level (game, action) -> physical key lookup

use crate::ControlCatalog;
use std::collections::HashMap;

pub const ACTION_NOT_FOUND: &str = "Action not found";

/// Exact lookup of the key bound to an in-game action. Game names compare
/// ASCII case-insensitively; action names must match exactly.
#[derive(Debug, Clone, Default)]
pub struct ActionBindingResolver {
    tables: HashMap<String, HashMap<String, String>>,
}

impl ActionBindingResolver {
    pub fn from_catalog(catalog: &ControlCatalog) -> Self {
        let tables = catalog
            .games
            .iter()
            .map(|(game, controls)| (game.to_ascii_lowercase(), controls.keys.clone()))
            .collect();
        Self { tables }
    }

    pub fn key_for(&self, action: &str, game: &str) -> Option<&str> {
        self.tables
            .get(&game.to_ascii_lowercase())
            .and_then(|keys| keys.get(action))
            .map(String::as_str)
    }

    /// Key for `action` in `game`, or `"Action not found"`
    pub fn lookup(&self, action: &str, game: &str) -> String {
        self.key_for(action, game)
            .unwrap_or(ACTION_NOT_FOUND)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ActionBindingResolver {
        ActionBindingResolver::from_catalog(&ControlCatalog::default())
    }

    #[test]
    fn test_lookup_known_action() {
        let r = resolver();
        assert_eq!(r.lookup("place", "Minecraft"), "right");
        assert_eq!(r.lookup("jump", "Minecraft"), "space");
        assert_eq!(r.lookup("change player", "FIFA"), "q");
    }

    #[test]
    fn test_lookup_missing_action() {
        assert_eq!(resolver().lookup("nonexistent", "Minecraft"), ACTION_NOT_FOUND);
    }

    #[test]
    fn test_lookup_missing_game() {
        assert_eq!(resolver().lookup("jump", "Pokemon"), ACTION_NOT_FOUND);
    }

    #[test]
    fn test_sentinels_are_not_actions() {
        let r = resolver();
        assert_eq!(r.lookup("none", "Minecraft"), ACTION_NOT_FOUND);
        assert_eq!(r.lookup("Game not found", "Minecraft"), ACTION_NOT_FOUND);
    }

    #[test]
    fn test_action_match_is_exact() {
        let r = resolver();
        assert!(r.key_for("Jump", "Minecraft").is_none());
        assert_eq!(r.key_for("jump", "minecraft"), Some("space"));
    }
}
