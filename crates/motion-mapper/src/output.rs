//! Control-binding document and its builder

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

pub const NO_GAME_SELECTED: &str = "No Game Selected";

/// How the bound key is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Key held for as long as a pose is held
    Hold,
    /// Key tapped once per gesture
    Click,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingAction {
    /// Action phrase as written by the user
    pub tmpt: String,
    /// Resolved in-game action (or sentinel)
    pub class: String,
    pub method: Method,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Resolved pose/gesture vocabulary key, or "none"
    pub files: String,
    pub action: BindingAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub mode: String,
    pub orientation: String,
    pub landmark: String,
    pub poses: Vec<Binding>,
    pub gestures: Vec<Binding>,
}

impl OutputDocument {
    /// Pretty JSON with 4-space indentation
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the whole document in one go
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json_pretty()?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Which output list a binding lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Poses,
    Gestures,
}

/// Per-request conditions absorbed into the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    NoGameSelected,
    UnknownGame { game: String },
    LowConfidenceMatch { target: String, best: String, score: f32 },
    NoCandidates { target: String },
    ProviderFailure { target: String, reason: String },
    UnboundAction { action: String, game: String },
    AmbiguousPair { first: String, second: String },
    DanglingEntity { text: String },
    UnpairedModality { text: String },
    ClauseBeforeGame { clause: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoGameSelected => write!(f, "no game mentioned; pairing skipped"),
            Diagnostic::UnknownGame { game } => write!(f, "game '{}' has no known controls", game),
            Diagnostic::LowConfidenceMatch {
                target,
                best,
                score,
            } => write!(
                f,
                "'{}' best matched '{}' at {:.3}, below threshold",
                target, best, score
            ),
            Diagnostic::NoCandidates { target } => {
                write!(f, "no vocabulary to resolve '{}' against", target)
            }
            Diagnostic::ProviderFailure { target, reason } => {
                write!(f, "could not process '{}': {}", target, reason)
            }
            Diagnostic::UnboundAction { action, game } => {
                write!(f, "action '{}' has no key in {}", action, game)
            }
            Diagnostic::AmbiguousPair { first, second } => write!(
                f,
                "'{}' / '{}' is not one action plus one motion; dropped",
                first, second
            ),
            Diagnostic::DanglingEntity { text } => {
                write!(f, "'{}' has no partner; dropped", text)
            }
            Diagnostic::UnpairedModality { text } => {
                write!(f, "motion '{}' has no action in its clause; dropped", text)
            }
            Diagnostic::ClauseBeforeGame { clause } => {
                write!(f, "clause '{}' precedes any game; not paired", clause)
            }
        }
    }
}

/// Result of one mapping call. Only `document` is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingReport {
    pub document: OutputDocument,
    pub diagnostics: Vec<Diagnostic>,
}

/// Accumulates scalar fields, bindings and diagnostics in discovery order.
#[derive(Debug, Default)]
pub struct OutputBuilder {
    document: OutputDocument,
    diagnostics: Vec<Diagnostic>,
}

impl OutputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&mut self, mode: &str) {
        self.document.mode = mode.to_string();
    }

    pub fn set_orientation(&mut self, orientation: &str) {
        self.document.orientation = orientation.to_string();
    }

    pub fn set_landmark(&mut self, landmark: &str) {
        self.document.landmark = landmark.to_string();
    }

    /// Mark the document as having no game; bindings stay empty
    pub fn mark_no_game(&mut self) {
        self.document.mode = NO_GAME_SELECTED.to_string();
        self.document.poses.clear();
        self.document.gestures.clear();
        self.note(Diagnostic::NoGameSelected);
    }

    pub fn push(&mut self, bucket: Bucket, binding: Binding) {
        match bucket {
            Bucket::Poses => self.document.poses.push(binding),
            Bucket::Gestures => self.document.gestures.push(binding),
        }
    }

    /// Record a diagnostic once
    pub fn note(&mut self, diagnostic: Diagnostic) {
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    pub fn document(&self) -> &OutputDocument {
        &self.document
    }

    pub fn finish(self) -> MappingReport {
        MappingReport {
            document: self.document,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(files: &str, method: Method) -> Binding {
        Binding {
            files: files.into(),
            action: BindingAction {
                tmpt: "jump".into(),
                class: "jump".into(),
                method,
                args: vec!["space".into()],
            },
        }
    }

    #[test]
    fn test_empty_document_json_shape() {
        let json = OutputDocument::default().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, ["gestures", "landmark", "mode", "orientation", "poses"]);
        assert!(json.contains("\n    \"mode\": \"\""));
    }

    #[test]
    fn test_binding_json_fields() {
        let value = serde_json::to_value(binding("fist", Method::Hold)).unwrap();
        assert_eq!(value["files"], "fist");
        assert_eq!(value["action"]["method"], "hold");
        assert_eq!(value["action"]["args"][0], "space");
        let click = serde_json::to_value(Method::Click).unwrap();
        assert_eq!(click, "click");
    }

    #[test]
    fn test_buckets_preserve_order() {
        let mut out = OutputBuilder::new();
        out.push(Bucket::Poses, binding("fist", Method::Hold));
        out.push(Bucket::Gestures, binding("kick", Method::Click));
        out.push(Bucket::Poses, binding("peace", Method::Hold));
        let report = out.finish();
        let poses: Vec<&str> = report.document.poses.iter().map(|b| b.files.as_str()).collect();
        assert_eq!(poses, ["fist", "peace"]);
        assert_eq!(report.document.gestures.len(), 1);
    }

    #[test]
    fn test_scalars_last_write_wins() {
        let mut out = OutputBuilder::new();
        out.set_orientation("left");
        out.set_orientation("right");
        out.set_landmark("hand");
        assert_eq!(out.document().orientation, "right");
        assert_eq!(out.document().landmark, "hand");
    }

    #[test]
    fn test_mark_no_game() {
        let mut out = OutputBuilder::new();
        out.push(Bucket::Poses, binding("fist", Method::Hold));
        out.mark_no_game();
        let report = out.finish();
        assert_eq!(report.document.mode, NO_GAME_SELECTED);
        assert!(report.document.poses.is_empty());
        assert_eq!(report.diagnostics, vec![Diagnostic::NoGameSelected]);
    }

    #[test]
    fn test_diagnostics_deduplicated() {
        let mut out = OutputBuilder::new();
        let d = Diagnostic::UnknownGame {
            game: "Pokemon".into(),
        };
        out.note(d.clone());
        out.note(d.clone());
        assert_eq!(out.finish().diagnostics, vec![d]);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prediction_output.json");
        let doc = OutputDocument {
            mode: "Minecraft".into(),
            ..OutputDocument::default()
        };
        doc.write_json(&path).unwrap();
        let back: OutputDocument =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, doc);
    }
}
