use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use log::LevelFilter;
use phishlens::config::toml_config::{load_config, validate};
use phishlens::config::{Config, ScoringMode};
use phishlens::scoring::scorer_from_config;
use phishlens::training::{build_training_rows, feature_order, Label};
use phishlens::{SchemaPolicy, UrlAnalyzer};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

fn cli() -> Command {
    Command::new("phishlens")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Offline phishing-risk scoring for URLs")
        .long_about(
            "Turns each URL into a fixed 14-column feature vector and scores it, either with \
             the built-in heuristic or with a trained classifier loaded from disk. No network \
             access is performed.",
        )
        .arg(
            Arg::new("urls")
                .value_name("URL")
                .help("URLs to analyze")
                .num_args(0..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Read URLs from a file, one per line ('-' for stdin)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML configuration file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .value_name("FILE")
                .help("Logistic model artefact (JSON); enables model scoring")
                .requires("features")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("features")
                .long("features")
                .value_name("FILE")
                .help("Training-time feature order (JSON array of names)")
                .requires("model")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("heuristic")
                .long("heuristic")
                .help("Force the heuristic scorer")
                .conflicts_with("model")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict-schema")
                .long("strict-schema")
                .help("Fail when the feature order names features this build does not know")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("training-label")
                .long("training-label")
                .value_name("0|1")
                .help("Emit training rows with this label instead of predictions")
                .value_parser(value_parser!(u8).range(0..=1)),
        )
        .arg(
            Arg::new("emit-feature-order")
                .long("emit-feature-order")
                .help("Print the feature schema as a JSON array and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
}

fn read_urls(path: &str) -> Result<Vec<String>> {
    let lines: Vec<String> = if path == "-" {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<_>>()
            .context("Failed to read URLs from stdin")?
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read URL file: {}", path))?
            .lines()
            .map(str::to_string)
            .collect()
    };

    Ok(lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

fn apply_overrides(config: &mut Config, matches: &clap::ArgMatches) {
    if let (Some(model), Some(features)) = (
        matches.get_one::<PathBuf>("model"),
        matches.get_one::<PathBuf>("features"),
    ) {
        config.scoring.mode = ScoringMode::Model;
        config.scoring.model_path = Some(model.clone());
        config.scoring.feature_order_path = Some(features.clone());
    }
    if matches.get_flag("heuristic") {
        config.scoring.mode = ScoringMode::Heuristic;
    }
    if matches.get_flag("strict-schema") {
        config.scoring.schema_policy = SchemaPolicy::Strict;
    }
}

/// Filter for the logger, plus the configured level name if it was not
/// recognised. The warning has to wait until the logger exists.
fn resolve_log_level(config: &Config, verbose: bool) -> (LevelFilter, Option<&str>) {
    if verbose {
        return (LevelFilter::Debug, None);
    }
    match config.log_level() {
        Some(level) => (level, None),
        None => (LevelFilter::Info, Some(config.logging.level.as_str())),
    }
}

fn run(matches: &clap::ArgMatches) -> Result<bool> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let (log_level, unknown_level) = resolve_log_level(&config, matches.get_flag("verbose"));
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();
    if let Some(level) = unknown_level {
        log::warn!("Unknown log level '{}', using info", level);
    }

    apply_overrides(&mut config, matches);
    validate(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if matches.get_flag("emit-feature-order") {
        writeln!(out, "{}", serde_json::to_string(&feature_order())?)?;
        return Ok(true);
    }

    let mut urls: Vec<String> = matches
        .get_many::<String>("urls")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if let Some(input) = matches.get_one::<String>("input") {
        urls.extend(read_urls(input)?);
    }
    if urls.is_empty() {
        bail!("No URL provided");
    }

    if let Some(&label) = matches.get_one::<u8>("training-label") {
        let label = Label::try_from(label).map_err(anyhow::Error::msg)?;
        for row in build_training_rows(&urls, label) {
            writeln!(out, "{}", serde_json::to_string(&row)?)?;
        }
        return Ok(true);
    }

    let analyzer = UrlAnalyzer::new(scorer_from_config(&config)?);
    log::info!("Scoring {} URL(s) with {}", urls.len(), analyzer.scorer_name());
    let mut all_ok = true;

    for (url, result) in urls.iter().zip(analyzer.analyze_batch(&urls)) {
        let line = match result {
            Ok(report) => serde_json::to_string(&report)?,
            Err(e) => {
                all_ok = false;
                serde_json::json!({ "url": url, "error": e.to_string() }).to_string()
            }
        };
        writeln!(out, "{}", line)?;
    }

    Ok(all_ok)
}

fn main() {
    let matches = cli().get_matches();

    match run(&matches) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}
