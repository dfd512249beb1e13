use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use unit_select::{
    FeatureMatrix, Normalization, SelectionConfig, SelectionMethod, UnitSelectionError,
    UnitSelectorBuilder,
};

#[derive(Debug, Parser)]
#[command(name = "unit_select")]
#[command(about = "Select corpus frames for a target feature sequence")]
struct Args {
    /// Target frames as a JSON array of equal-length number arrays.
    #[arg(long, env = "UNIT_SELECT_TARGET")]
    target: PathBuf,
    /// Corpus frames, same layout as the target.
    #[arg(long, env = "UNIT_SELECT_CORPUS")]
    corpus: PathBuf,
    /// JSON selection config; flags below override its fields.
    #[arg(long, env = "UNIT_SELECT_CONFIG")]
    config: Option<PathBuf>,
    /// Selection method, e.g. `nearest_neighbor_tree`, `linearSearch`, `viterbi`.
    #[arg(long, env = "UNIT_SELECT_METHOD", value_parser = parse_method)]
    method: Option<SelectionMethod>,
    /// Feature scaling, e.g. `min_max`, `SD`, `none`.
    #[arg(long, env = "UNIT_SELECT_NORMALIZATION", value_parser = parse_normalization)]
    normalization: Option<Normalization>,
    /// Write the report here instead of stdout.
    #[arg(long, env = "UNIT_SELECT_OUT")]
    out: Option<PathBuf>,
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct SelectionReport {
    method: SelectionMethod,
    normalization: Normalization,
    target_frames: usize,
    corpus_frames: usize,
    indices: Vec<usize>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match args.config.as_ref() {
        Some(path) => SelectionConfig::load(path).map_err(|err| err.to_string())?,
        None => SelectionConfig::default(),
    };
    if let Some(method) = args.method {
        config.method = method;
    }
    if let Some(normalization) = args.normalization {
        config.normalization = normalization;
    }

    let target = load_features(&args.target, "target")?;
    let corpus = load_features(&args.corpus, "corpus")?;
    tracing::info!(
        method = config.method.as_str(),
        normalization = config.normalization.as_str(),
        target_frames = target.len(),
        corpus_frames = corpus.len(),
        "running unit selection"
    );

    let selector = UnitSelectorBuilder::new(config).build();
    let indices = selector
        .select(&target, &corpus)
        .map_err(|err| format!("unit selection failed: {err}"))?;

    let report = SelectionReport {
        method: config.method,
        normalization: config.normalization,
        target_frames: target.len(),
        corpus_frames: corpus.len(),
        indices,
    };
    let mut json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("cannot encode selection report: {err}"))?;
    json.push('\n');
    match args.out.as_ref() {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|err| format!("cannot create '{}': {err}", parent.display()))?;
            }
            fs::write(path, json)
                .map_err(|err| format!("cannot write report '{}': {err}", path.display()))
        }
        None => {
            print!("{json}");
            Ok(())
        }
    }
}

fn parse_method(value: &str) -> Result<SelectionMethod, String> {
    value.parse().map_err(|err: UnitSelectionError| err.to_string())
}

fn parse_normalization(value: &str) -> Result<Normalization, String> {
    value.parse().map_err(|err: UnitSelectionError| err.to_string())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_features(path: &Path, label: &str) -> Result<FeatureMatrix, String> {
    let data = fs::read_to_string(path)
        .map_err(|err| format!("cannot read {label} features '{}': {err}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|err| format!("cannot parse {label} features '{}': {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["unit_select", "--target", "t.json", "--corpus", "c.json"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn flags_accept_config_file_selector_names() {
        let args = parse(&["--method", "Markov", "--normalization", "SD"]);
        assert_eq!(args.method, Some(SelectionMethod::ViterbiMarkov));
        assert_eq!(args.normalization, Some(Normalization::StandardScore));

        let args = parse(&["--method", "nearest_neighbor_brute_force", "--normalization", "none"]);
        assert_eq!(args.method, Some(SelectionMethod::NearestNeighborBruteForce));
        assert_eq!(args.normalization, Some(Normalization::None));
    }

    #[test]
    fn flags_reject_unknown_selectors() {
        let argv = ["unit_select", "--target", "t.json", "--corpus", "c.json", "--method", "beam"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn report_has_only_deterministic_fields() {
        let report = SelectionReport {
            method: SelectionMethod::ViterbiMarkov,
            normalization: Normalization::MinMax,
            target_frames: 2,
            corpus_frames: 3,
            indices: vec![0, 1],
        };
        let value = serde_json::to_value(&report).expect("serializable report");
        assert_eq!(
            value,
            serde_json::json!({
                "method": "viterbi_markov",
                "normalization": "min_max",
                "target_frames": 2,
                "corpus_frames": 3,
                "indices": [0, 1],
            })
        );
    }
}
