use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use motion_mapper as mm;

#[derive(Parser, Debug)]
#[command(
    name = "motion-map",
    version,
    about = "Map a spoken description of motion controls to a key-binding document"
)]
struct Cli {
    /// Description, e.g. "I want to play Minecraft. To jump I will do a thumb down"
    text: String,

    /// Mapper config YAML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Control catalog YAML (overrides the config)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output JSON path (overrides the config)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Clause handling: whole-input or delimited
    #[arg(long)]
    segment: Option<mm::SegmentMode>,

    /// Precomputed tagger entities for TEXT, as a JSON array
    #[arg(long)]
    entities: Option<PathBuf>,

    /// Also print the document to stdout
    #[arg(long, action = ArgAction::SetTrue)]
    print: bool,
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();
    let start = Instant::now();

    let mut config = match &cli.config {
        Some(path) => mm::load_config_file(path)?,
        None => mm::MapperConfig::default(),
    };
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path);
    }
    if let Some(path) = cli.output {
        config.output_path = path;
    }
    if let Some(mode) = cli.segment {
        config.segment_mode = mode;
    }

    mm::init()?;
    let mut mapper = mm::MotionGameMapper::from_config(config)?;
    if let Some(path) = &cli.entities {
        let tagged = mm::load_entities_file(&cli.text, path)?;
        info!("using {} precomputed entities", tagged.entities().len());
        mapper = mapper.with_extractor(Box::new(tagged));
    }

    let report = mapper.predict(&cli.text)?;
    for diagnostic in &report.diagnostics {
        warn!("{}", diagnostic);
    }
    if cli.print {
        println!("{}", report.document.to_json_pretty()?);
    }

    info!(
        "mode={} poses={} gestures={} -> {} in {:.3}s",
        report.document.mode,
        report.document.poses.len(),
        report.document.gestures.len(),
        mapper.config().output_path.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn setup_tracing() {
    // Best-effort; avoid panics if already set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "motion-map",
            "play Tetris. rotate with a fist",
            "--segment",
            "delimited",
            "--output",
            "out.json",
            "--print",
        ])
        .unwrap();
        assert_eq!(cli.segment, Some(mm::SegmentMode::Delimited));
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert!(cli.print);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_rejects_unknown_segment() {
        assert!(Cli::try_parse_from(["motion-map", "text", "--segment", "sideways"]).is_err());
    }

    #[test]
    fn test_cli_requires_text() {
        assert!(Cli::try_parse_from(["motion-map"]).is_err());
    }
}
