//! Typed entity spans and the extractor seam

use crate::{MapperError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Entity categories produced by the tagger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntityLabel {
    Game,
    Orientation,
    Landmark,
    Action,
    Pose,
    Gesture,
}

impl EntityLabel {
    /// Tag name used by the trained tagger and in precomputed entity files
    pub fn tag(&self) -> &'static str {
        match self {
            EntityLabel::Game => "GAME",
            EntityLabel::Orientation => "ORI",
            EntityLabel::Landmark => "LANDMARK",
            EntityLabel::Action => "ACTION-O",
            EntityLabel::Pose => "POSES",
            EntityLabel::Gesture => "GESTURE",
        }
    }

    /// Rank used to settle equal-length lexicon conflicts (lower wins)
    pub(crate) fn priority(&self) -> u8 {
        match self {
            EntityLabel::Game => 0,
            EntityLabel::Orientation => 1,
            EntityLabel::Landmark => 2,
            EntityLabel::Pose => 3,
            EntityLabel::Gesture => 4,
            EntityLabel::Action => 5,
        }
    }
}

impl FromStr for EntityLabel {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "GAME" => Ok(EntityLabel::Game),
            "ORI" | "ORIENTATION" => Ok(EntityLabel::Orientation),
            "LANDMARK" => Ok(EntityLabel::Landmark),
            "POSES" | "POSE" => Ok(EntityLabel::Pose),
            "GESTURE" | "GESTURES" => Ok(EntityLabel::Gesture),
            other if other.starts_with("ACTION") => Ok(EntityLabel::Action),
            _ => Err(MapperError::UnknownLabel(s.to_string())),
        }
    }
}

impl TryFrom<String> for EntityLabel {
    type Error = MapperError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.tag().to_string()
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A labelled span of a clause. `start`/`end` are byte offsets, end exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Entity {
    pub fn new(label: EntityLabel, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            label,
            text: text.into(),
            start,
            end,
        }
    }
}

/// Source of entities for a clause.
///
/// Implementations return non-overlapping spans ordered by position.
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, clause: &str) -> Result<Vec<Entity>>;

    /// Same as `extract`, for a clause known to start at byte `offset` of
    /// the full input. Extractors tied to the full input override this.
    fn extract_at(&self, clause: &str, _offset: usize) -> Result<Vec<Entity>> {
        self.extract(clause)
    }
}

/// Entities produced ahead of time by an external tagger for one input string.
///
/// `extract` locates the requested clause inside the original text and returns
/// the entities falling inside it, with offsets rebased onto the clause.
#[derive(Debug, Clone)]
pub struct PrecomputedEntities {
    source: String,
    entities: Vec<Entity>,
}

impl PrecomputedEntities {
    pub fn new(source: impl Into<String>, mut entities: Vec<Entity>) -> Self {
        entities.sort_by_key(|e| e.start);
        Self {
            source: source.into(),
            entities,
        }
    }

    /// Parse a JSON array of `{label, text, start, end}` records
    pub fn from_json(source: impl Into<String>, json: &str) -> Result<Self> {
        let entities: Vec<Entity> = serde_json::from_str(json)?;
        Ok(Self::new(source, entities))
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

pub fn load_entities_file(
    source: &str,
    path: impl AsRef<Path>,
) -> anyhow::Result<PrecomputedEntities> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading entities: {}", path.display()))?;
    PrecomputedEntities::from_json(source, &raw)
        .with_context(|| format!("decoding entities: {}", path.display()))
}

impl PrecomputedEntities {
    fn within(&self, offset: usize, len: usize) -> Vec<Entity> {
        let end = offset + len;
        self.entities
            .iter()
            .filter(|e| e.start >= offset && e.end <= end)
            .map(|e| Entity::new(e.label, e.text.clone(), e.start - offset, e.end - offset))
            .collect()
    }
}

impl EntityExtractor for PrecomputedEntities {
    /// Uses the first occurrence of `clause` in the source
    fn extract(&self, clause: &str) -> Result<Vec<Entity>> {
        let offset = self.source.find(clause).ok_or_else(|| {
            MapperError::Extraction(format!("clause not found in source text: '{}'", clause))
        })?;
        Ok(self.within(offset, clause.len()))
    }

    fn extract_at(&self, clause: &str, offset: usize) -> Result<Vec<Entity>> {
        match self.source.get(offset..offset + clause.len()) {
            Some(found) if found == clause => Ok(self.within(offset, clause.len())),
            _ => self.extract(clause),
        }
    }
}
