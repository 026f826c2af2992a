//! Splits raw input into processing units

use crate::MapperError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentMode {
    /// Whole input is one clause; actions pair with adjacent modalities
    #[default]
    WholeInput,
    /// Split on `.` and `;`; the last action of a clause wins
    Delimited,
}

impl FromStr for SegmentMode {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "whole_input" | "whole" => Ok(SegmentMode::WholeInput),
            "delimited" | "delimiter" => Ok(SegmentMode::Delimited),
            other => Err(MapperError::Config(format!("unknown segment mode: {}", other))),
        }
    }
}

impl fmt::Display for SegmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentMode::WholeInput => f.write_str("whole-input"),
            SegmentMode::Delimited => f.write_str("delimited"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClauseSegmenter {
    mode: SegmentMode,
}

impl ClauseSegmenter {
    pub fn new(mode: SegmentMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> SegmentMode {
        self.mode
    }

    /// Ordered clauses; always exactly one in whole-input mode.
    /// Commas and "and" never split.
    pub fn segment(&self, text: &str) -> Vec<String> {
        self.segment_spans(text)
            .into_iter()
            .map(|(_, clause)| clause.to_string())
            .collect()
    }

    /// Like `segment`, paired with each clause's byte offset in `text`
    pub fn segment_spans<'t>(&self, text: &'t str) -> Vec<(usize, &'t str)> {
        match self.mode {
            SegmentMode::WholeInput => vec![trimmed_span(text, 0)],
            SegmentMode::Delimited => {
                let mut spans = Vec::new();
                let mut pos = 0;
                for piece in text.split(['.', ';']) {
                    let span = trimmed_span(piece, pos);
                    // delimiters are one byte each
                    pos += piece.len() + 1;
                    if !span.1.is_empty() {
                        spans.push(span);
                    }
                }
                spans
            }
        }
    }
}

fn trimmed_span(piece: &str, base: usize) -> (usize, &str) {
    let lead = piece.len() - piece.trim_start().len();
    (base + lead, piece.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_input_single_clause() {
        let seg = ClauseSegmenter::new(SegmentMode::WholeInput);
        let clauses = seg.segment("  play Minecraft. jump with a fist; ");
        assert_eq!(clauses, vec!["play Minecraft. jump with a fist;"]);
        assert_eq!(seg.segment("").len(), 1);
    }

    #[test]
    fn test_delimited_split() {
        let seg = ClauseSegmenter::new(SegmentMode::Delimited);
        let clauses = seg.segment("I want to play Tetris. Rotate using hadouken;; drop with a fist, and kick.");
        assert_eq!(
            clauses,
            vec![
                "I want to play Tetris",
                "Rotate using hadouken",
                "drop with a fist, and kick"
            ]
        );
    }

    #[test]
    fn test_spans_locate_repeated_clauses() {
        let text = "play Minecraft and jump with a fist; jump";
        let seg = ClauseSegmenter::new(SegmentMode::Delimited);
        let spans = seg.segment_spans(text);
        assert_eq!(spans, vec![(0, "play Minecraft and jump with a fist"), (37, "jump")]);
        for (offset, clause) in spans {
            assert_eq!(&text[offset..offset + clause.len()], clause);
        }

        let whole = ClauseSegmenter::new(SegmentMode::WholeInput);
        assert_eq!(whole.segment_spans("  jump "), vec![(2, "jump")]);
    }

    #[test]
    fn test_delimited_empty_input() {
        let seg = ClauseSegmenter::new(SegmentMode::Delimited);
        assert!(seg.segment(" . ; ").is_empty());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("whole-input".parse::<SegmentMode>().unwrap(), SegmentMode::WholeInput);
        assert_eq!("Delimited".parse::<SegmentMode>().unwrap(), SegmentMode::Delimited);
        assert!("commas".parse::<SegmentMode>().is_err());
        assert_eq!(SegmentMode::default(), SegmentMode::WholeInput);
    }
}
