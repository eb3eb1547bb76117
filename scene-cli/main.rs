use clap::Parser;
use scene_cli::{load_config, DetectionReport, ExclusionPolicy, SceneMatcher, SceneResult};
use scene_match::MatcherConfig;
use std::path::PathBuf;
use std::time::Instant;

/// Decide whether a reference object appears in a query scene from two
/// extracted descriptor collections.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Reference descriptor collection (JSON)
    reference: PathBuf,

    /// Query descriptor collection (JSON)
    query: PathBuf,

    /// Matcher configuration file (.json or .toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Nearest / second-nearest ratio threshold, in (0, 1]
    #[arg(long)]
    ratio: Option<f32>,

    /// Minimum correspondences for a positive verdict
    #[arg(long)]
    min_matches: Option<usize>,

    /// Query index withdrawn after each match: winner or last-visited
    #[arg(long)]
    exclusion: Option<ExclusionPolicy>,

    /// Print a JSON report with pixel-coordinate correspondences
    #[arg(long)]
    json: bool,
}

fn run(args: Args) -> SceneResult<()> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => MatcherConfig::new(),
    };
    if let Some(ratio) = args.ratio {
        cfg.core.ratio_threshold = ratio;
    }
    if let Some(min_matches) = args.min_matches {
        cfg.core.count_threshold = min_matches;
    }
    if let Some(exclusion) = args.exclusion {
        cfg.exclusion = exclusion;
    }

    let scene = SceneMatcher::new(cfg)?;
    log::info!("{}", scene.config_summary());

    let t0 = Instant::now();
    let detection = scene.detect_files(&args.reference, &args.query)?;
    log::info!("matching took {:.2?}", t0.elapsed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&DetectionReport::from(&detection))?);
    } else {
        println!("{}", detection.verdict);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
