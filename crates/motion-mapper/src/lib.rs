//! Motion-game control mapper
//!
//! Turns a natural-language description of motion controls ("to jump I
//! will do a thumb down") into a control-mapping document: for each
//! pose or gesture, the recorded motion it refers to, the in-game action it
//! triggers and the physical key that action is bound to.
//!
//! Pipeline: `ClauseSegmenter` -> `EntityExtractor` -> `EntityPairer`
//! (using `SimilarityResolver` and `ActionBindingResolver`) -> `OutputBuilder`.

mod bindings;
mod catalog;
mod config;
mod entities;
mod error;
mod lexicon;
mod mapper;
mod output;
mod pairer;
mod segment;
mod similarity;

pub use bindings::{ActionBindingResolver, ACTION_NOT_FOUND};
pub use catalog::{load_catalog_file, ControlCatalog, GameControls};
pub use config::{load_config_file, MapperConfig, DEFAULT_OUTPUT_PATH};
pub use entities::{load_entities_file, Entity, EntityExtractor, EntityLabel, PrecomputedEntities};
pub use error::{MapperError, Result};
pub use lexicon::LexiconExtractor;
pub use mapper::MotionGameMapper;
pub use output::{
    Binding, BindingAction, Bucket, Diagnostic, MappingReport, Method, OutputBuilder,
    OutputDocument, NO_GAME_SELECTED,
};
pub use pairer::{EntityPairer, Modality, GAME_NOT_FOUND};
pub use segment::{ClauseSegmenter, SegmentMode};
pub use similarity::{cosine_similarity, Resolution, SimilarityResolver, DEFAULT_THRESHOLD, NO_MATCH};

/// Initialize the motion mapper system
pub fn init() -> Result<()> {
    tracing::info!("Initializing motion mapper system");
    phrase_encoder::init()?;
    Ok(())
}

/// Create a mapper with the default configuration and built-in catalog
pub fn create_mapper() -> anyhow::Result<MotionGameMapper> {
    MotionGameMapper::from_config(MapperConfig::default())
}

/// Map one description with the default mapper
pub fn map_text(text: &str) -> anyhow::Result<MappingReport> {
    let mapper = create_mapper()?;
    Ok(mapper.map_text(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert!(init().is_ok());
    }

    #[test]
    fn test_map_text_without_game() {
        let report = map_text("jump with a fist").unwrap();
        assert_eq!(report.document.mode, NO_GAME_SELECTED);
        assert!(report.document.poses.is_empty());
        assert_eq!(report.diagnostics, vec![Diagnostic::NoGameSelected]);
    }
}
