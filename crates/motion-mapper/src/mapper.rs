//! End-to-end facade: text -> entities -> bindings -> output document

use crate::entities::EntityExtractor;
use crate::output::{Diagnostic, MappingReport, OutputBuilder};
use crate::{
    load_catalog_file, ClauseSegmenter, ControlCatalog, Entity, EntityPairer, LexiconExtractor,
    MapperConfig, Result, SegmentMode, SimilarityResolver,
};
use anyhow::Context;
use phrase_encoder::{new_encoder_backend, PhraseEncoder};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct MotionGameMapper {
    config: MapperConfig,
    segmenter: ClauseSegmenter,
    extractor: Box<dyn EntityExtractor>,
    pairer: EntityPairer,
}

impl MotionGameMapper {
    pub fn new(
        config: MapperConfig,
        catalog: ControlCatalog,
        encoder: Arc<dyn PhraseEncoder>,
        extractor: Box<dyn EntityExtractor>,
    ) -> Result<Self> {
        config.validate()?;
        catalog.validate()?;
        let resolver = SimilarityResolver::new(encoder, config.similarity_threshold);
        let pairer = EntityPairer::new(resolver, Arc::new(catalog));
        Ok(Self {
            segmenter: ClauseSegmenter::new(config.segment_mode),
            config,
            extractor,
            pairer,
        })
    }

    /// Build everything the config names. Any failure here is a startup
    /// failure: no output is produced.
    pub fn from_config(config: MapperConfig) -> anyhow::Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => load_catalog_file(path)?,
            None => ControlCatalog::default(),
        };
        let encoder =
            new_encoder_backend(&config.encoder).context("initializing phrase encoder")?;
        let extractor = Box::new(LexiconExtractor::from_catalog(&catalog));
        info!(
            "mapper ready: encoder={}, segment_mode={}, threshold={}",
            encoder.name(),
            config.segment_mode,
            config.similarity_threshold
        );
        Ok(Self::new(config, catalog, encoder, extractor)?)
    }

    /// Swap the entity extractor (e.g. for precomputed tagger output)
    pub fn with_extractor(mut self, extractor: Box<dyn EntityExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ControlCatalog {
        self.pairer.catalog()
    }

    /// Map free text to an output document. Never fails: problems surface as
    /// sentinels in the document and entries in `diagnostics`.
    pub fn map_text(&self, text: &str) -> MappingReport {
        let mut out = OutputBuilder::new();
        let clauses: Vec<(String, Vec<Entity>)> = self
            .segmenter
            .segment_spans(text)
            .into_iter()
            .map(|(offset, clause)| {
                let entities = self.extract(clause, offset, &mut out);
                (clause.to_string(), entities)
            })
            .collect();

        match self.segmenter.mode() {
            SegmentMode::WholeInput => {
                let entities: Vec<Entity> =
                    clauses.into_iter().flat_map(|(_, entities)| entities).collect();
                self.pairer.pair_adjacent(&entities, &mut out);
            }
            SegmentMode::Delimited => self.pairer.pair_clauses(&clauses, &mut out),
        }

        let report = out.finish();
        debug!(
            "mapped {} poses, {} gestures, {} diagnostics",
            report.document.poses.len(),
            report.document.gestures.len(),
            report.diagnostics.len()
        );
        report
    }

    fn extract(&self, clause: &str, offset: usize, out: &mut OutputBuilder) -> Vec<Entity> {
        match self.extractor.extract_at(clause, offset) {
            Ok(mut entities) => {
                entities.sort_by_key(|e| e.start);
                entities
            }
            Err(e) => {
                warn!("entity extraction failed for '{}': {}", clause, e);
                out.note(Diagnostic::ProviderFailure {
                    target: clause.to_string(),
                    reason: e.to_string(),
                });
                Vec::new()
            }
        }
    }

    /// Map `text` and write the document to `path`, replacing any previous
    /// file. Exactly one write per call.
    pub fn predict_to_json(&self, text: &str, path: impl AsRef<Path>) -> Result<MappingReport> {
        let path = path.as_ref();
        let report = self.map_text(text);
        report.document.write_json(path)?;
        info!("wrote mapping document to {}", path.display());
        Ok(report)
    }

    /// `predict_to_json` to the configured output path
    pub fn predict(&self, text: &str) -> Result<MappingReport> {
        self.predict_to_json(text, &self.config.output_path)
    }

    pub fn motion_to_action(&self, motion: &str, game: &str) -> String {
        self.pairer.motion_to_action(motion, game)
    }

    pub fn action_to_key(&self, action: &str, game: &str) -> String {
        self.pairer.bindings().lookup(action, game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityLabel, MapperError, PrecomputedEntities};
    use phrase_encoder::{EncoderBackendKind, MockEncoder};

    struct FailingExtractor;

    impl EntityExtractor for FailingExtractor {
        fn extract(&self, _clause: &str) -> Result<Vec<Entity>> {
            Err(MapperError::Extraction("tagger offline".into()))
        }
    }

    fn mapper() -> MotionGameMapper {
        MotionGameMapper::from_config(MapperConfig::default()).unwrap()
    }

    #[test]
    fn test_from_default_config() {
        let m = mapper();
        assert_eq!(m.catalog().games.len(), 9);
        assert_eq!(m.config().segment_mode, SegmentMode::WholeInput);
    }

    #[test]
    fn test_from_config_missing_catalog_fails() {
        let config = MapperConfig {
            catalog_path: Some("/nonexistent/controls.yaml".into()),
            ..Default::default()
        };
        assert!(MotionGameMapper::from_config(config).is_err());
    }

    #[cfg(not(feature = "http-encoder"))]
    #[test]
    fn test_from_config_unavailable_backend_fails() {
        let mut config = MapperConfig::default();
        config.encoder.backend = EncoderBackendKind::Http;
        let err = MotionGameMapper::from_config(config).err().unwrap();
        assert!(err.to_string().contains("initializing phrase encoder"));
    }

    #[test]
    fn test_new_rejects_bad_threshold() {
        let config = MapperConfig {
            similarity_threshold: -2.0,
            ..Default::default()
        };
        let res = MotionGameMapper::new(
            config,
            ControlCatalog::default(),
            Arc::new(MockEncoder::new(32).unwrap()),
            Box::new(LexiconExtractor::new()),
        );
        assert!(matches!(res, Err(MapperError::Config(_))));
    }

    #[test]
    fn test_extraction_failure_degrades() {
        let m = mapper().with_extractor(Box::new(FailingExtractor));
        let report = m.map_text("play Minecraft and jump with a fist");
        assert_eq!(report.document.mode, crate::NO_GAME_SELECTED);
        assert!(report
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::ProviderFailure { reason, .. } if reason.contains("tagger offline"))));
    }

    #[test]
    fn test_precomputed_entities_are_used() {
        let text = "Minecraft: jump on a fist";
        let entities = vec![
            Entity::new(EntityLabel::Game, "Minecraft", 0, 9),
            Entity::new(EntityLabel::Pose, "fist", 21, 25),
            Entity::new(EntityLabel::Action, "jump", 11, 15),
        ];
        let m = mapper().with_extractor(Box::new(PrecomputedEntities::new(text, entities)));
        let doc = m.map_text(text).document;
        assert_eq!(doc.poses.len(), 1);
        assert_eq!(doc.poses[0].files, "fist");
        assert_eq!(doc.poses[0].action.args, vec!["space"]);
    }

    #[test]
    fn test_lookups() {
        let m = mapper();
        assert_eq!(m.action_to_key("place", "Minecraft"), "right");
        assert_eq!(m.action_to_key("fly", "Minecraft"), crate::ACTION_NOT_FOUND);
        assert_eq!(m.motion_to_action("fly", "UnknownGame"), crate::GAME_NOT_FOUND);
        assert_eq!(m.motion_to_action("jump", "Minecraft"), "jump");
    }
}
