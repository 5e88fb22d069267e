//! gaff CLI
//!
//! Usage:
//!   gaff demos/three_scatter.json                    # 1 search, seed 1
//!   gaff demos/three_scatter.json --parallel 4       # seeds 1..=4 in parallel
//!   gaff demos/three_scatter.json --describe         # print the built rules
//!   RUST_LOG=gaff_core=debug gaff ...                # attempt / step logs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use gaff_core::impls::{ReelEngineConfig, ReelStripEngine};
use gaff_core::{GaffError, GaffReport, GaffSearch, GaffSequence, SequenceBuilder, SequenceSpec};

#[derive(Parser, Debug)]
#[command(
    name = "gaff",
    version,
    about = "Search a reel engine for cycles that satisfy a gaff sequence"
)]
struct Args {
    /// Sequence file (JSON)
    sequence: PathBuf,

    /// Reel engine config (JSON). Defaults to the built-in demo reels.
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Seed of the first search; search N uses seed + N (wrapping)
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of searches to run concurrently
    #[arg(long, default_value_t = 1)]
    parallel: u64,

    /// Override the sequence's attempt budget
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Print the sequence's rules (script-line form) and exit
    #[arg(long)]
    describe: bool,
}

#[derive(Serialize)]
struct SearchSummary {
    seed: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<GaffReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Seeds of the `count` searches, starting at `first`. Never empty.
fn seeds(first: u64, count: u64) -> impl Iterator<Item = u64> {
    (0..count.max(1)).map(move |n| first.wrapping_add(n))
}

fn describe(sequence: &GaffSequence) -> Result<()> {
    println!("sequence {}", sequence.name());
    if let Some(description) = sequence.description() {
        println!("  # {description}");
    }
    for step in sequence.steps() {
        println!("step {}", step.name);
        for rule in &step.result_conditions {
            println!("  accept {}", rule.rule.format_with("SL")?);
        }
        for rule in &step.step_conditions {
            println!("  until  {}", rule.rule.format_with("SL")?);
        }
        for rule in &step.decision_makers {
            println!("  force  {}", rule.rule.format_with("SL")?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // (A) sequence を読み込んで組み立てる（設定ミスはここで落ちる）
    let mut spec: SequenceSpec = read_json(&args.sequence)?;
    if let Some(max_attempts) = args.max_attempts {
        spec.budget.max_attempts = max_attempts;
    }
    let sequence = SequenceBuilder::new()
        .build(&spec)
        .with_context(|| format!("invalid sequence {}", args.sequence.display()))?;

    if args.describe {
        return describe(&sequence);
    }

    let config = match &args.engine {
        Some(path) => read_json(path)?,
        None => ReelEngineConfig::default(),
    };
    config.validate()?;

    // (B) seed ごとに engine を作り、blocking pool で並行に探索
    let sequence = Arc::new(sequence);
    let mut handles = Vec::with_capacity(args.parallel as usize);
    for seed in seeds(args.seed, args.parallel) {
        let search = GaffSearch::new(Arc::clone(&sequence));
        let config = config.clone();
        handles.push((
            seed,
            tokio::task::spawn_blocking(move || -> Result<GaffReport, GaffError> {
                let mut engine = ReelStripEngine::new(config, seed)?;
                search.run(&mut engine)
            }),
        ));
    }

    // (C) 結果を JSON で出力
    let mut summaries = Vec::with_capacity(handles.len());
    for (seed, handle) in handles {
        let summary = match handle.await? {
            Ok(report) => SearchSummary {
                seed,
                report: Some(report),
                error: None,
            },
            Err(e) => SearchSummary {
                seed,
                report: None,
                error: Some(e.to_string()),
            },
        };
        summaries.push(summary);
    }
    println!("{}", serde_json::to_string_pretty(&summaries)?);

    if summaries.iter().all(|s| s.report.is_none()) {
        bail!("no search satisfied '{}'", sequence.name());
    }
    Ok(())
}
