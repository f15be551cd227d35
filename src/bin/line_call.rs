//! line_call - evaluate a detection burst and print the verdict as JSON.
//!
//! Input is one burst request document:
//!
//! ```json
//! { "frames": [{ "timestamp": 0.0, "detections": [{ "label": "ball", "bbox": [..], "score": 0.9 }] }],
//!   "court_polygon": [[0.1, 0.2], [0.9, 0.2], [0.95, 0.95], [0.05, 0.95]],
//!   "midline_x": 0.5 }
//! ```
//!
//! With `--lines`, input is JSON lines (one request per line) and output is one
//! verdict per line, in input order.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use line_call::{BurstRequest, EngineConfig, LineCallEngine, Verdict};

#[derive(Parser, Debug)]
#[command(
    name = "line_call",
    version,
    about = "Infer an in/out/net line call from a burst of ball and net detections"
)]
struct Args {
    /// Burst request file ("-" reads stdin).
    #[arg(long, value_name = "PATH", default_value = "-")]
    burst: String,

    /// Treat input as JSON lines, one burst request per line.
    #[arg(long)]
    lines: bool,

    /// Engine config file (JSON, or TOML by extension).
    #[arg(long, env = "LINE_CALL_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Reject malformed geometry instead of degrading to inconclusive.
    #[arg(long)]
    strict: bool,

    /// Override the request's midline x.
    #[arg(long, value_name = "X")]
    midline_x: Option<f64>,

    /// Pretty-print the verdict (single request only).
    #[arg(long, conflicts_with = "lines")]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = EngineConfig::load_from(args.config.as_deref())?;
    log::debug!(
        "engine config: selection={} net_overlap>{} bounce_min_drop>{}",
        config.selection.as_str(),
        config.thresholds.net_overlap,
        config.thresholds.bounce_min_drop
    );
    let engine = LineCallEngine::new(config);

    let input = open_input(&args.burst)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.lines {
        let mut evaluated = 0usize;
        for (idx, line) in input.lines().enumerate() {
            let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
            if line.trim().is_empty() {
                continue;
            }
            let request = BurstRequest::from_json(&line)
                .with_context(|| format!("line {}", idx + 1))?;
            let verdict = run(&engine, request, &args)
                .with_context(|| format!("line {}", idx + 1))?;
            serde_json::to_writer(&mut out, &verdict)?;
            writeln!(out)?;
            evaluated += 1;
        }
        log::info!("evaluated {} bursts", evaluated);
    } else {
        let mut raw = String::new();
        let mut input = input;
        input
            .read_to_string(&mut raw)
            .map_err(|e| anyhow!("failed to read {}: {}", args.burst, e))?;
        let request = BurstRequest::from_json(&raw)?;
        let verdict = run(&engine, request, &args)?;
        if args.pretty {
            serde_json::to_writer_pretty(&mut out, &verdict)?;
        } else {
            serde_json::to_writer(&mut out, &verdict)?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }
    let file = std::fs::File::open(path)
        .map_err(|e| anyhow!("failed to open burst file {}: {}", path, e))?;
    Ok(Box::new(BufReader::new(file)))
}

fn run(engine: &LineCallEngine, request: BurstRequest, args: &Args) -> Result<Verdict> {
    let request = request.with_midline_override(args.midline_x);
    if args.strict {
        request.validate()?;
    }
    let verdict = request.evaluate_with(engine);
    log::info!(
        "verdict={} confidence={:.2} frames={}",
        verdict.recommendation,
        verdict.confidence,
        request.frames.len()
    );
    Ok(verdict)
}
