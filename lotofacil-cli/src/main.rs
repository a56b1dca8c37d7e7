mod display;
mod import;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::display::{display_candidates, display_import_summary, display_recommendation, display_stats};
use crate::import::{InputFormat, load_history};
use lotofacil_core::analysis::{HistoricalMetrics, analyze_history_ordered};
use lotofacil_core::config::SelectionConfig;
use lotofacil_core::models::{DrawOrder, MAX_GAME_SIZE, MIN_GAME_SIZE};
use lotofacil_core::selection::{best_candidate, generate_candidates, pick_best_with_config};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OrderArg {
    #[default]
    OldestFirst,
    NewestFirst,
}

impl From<OrderArg> for DrawOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::OldestFirst => DrawOrder::OldestFirst,
            OrderArg::NewestFirst => DrawOrder::NewestFirst,
        }
    }
}

#[derive(Parser)]
#[command(name = "lotofacil", about = "Lotofácil game recommender based on draw history")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct HistoryArgs {
    /// Results file (CSV `concurso;data;b1..b15` or API-shaped JSON)
    #[arg(short, long)]
    file: PathBuf,

    /// File format, inferred from the extension when omitted
    #[arg(long)]
    format: Option<InputFormat>,

    /// Chronological order of the draws in the file
    #[arg(long, default_value = "oldest-first")]
    order: OrderArg,

    /// Skip malformed draws instead of aborting
    #[arg(long)]
    skip_invalid: bool,
}

#[derive(Args)]
struct SelectionArgs {
    /// Numbers per game (15 to 20); prompted for when omitted
    #[arg(short, long)]
    size: Option<usize>,

    /// Candidates generated before picking the best
    #[arg(short, long)]
    batch: Option<usize>,

    /// Seed for reproducibility (default: today's date YYYYMMDD)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON selection config; flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate candidates on a single thread
    #[arg(long)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Recommend the best-scoring game of a batch
    Recommend {
        #[command(flatten)]
        history: HistoryArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show frequency, delay, sequences and parity statistics
    Stats {
        #[command(flatten)]
        history: HistoryArgs,
    },

    /// List every generated candidate with its score
    Candidates {
        #[command(flatten)]
        history: HistoryArgs,

        #[command(flatten)]
        selection: SelectionArgs,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Recommend { history, selection, json } => cmd_recommend(&history, &selection, json),
        Command::Stats { history } => cmd_stats(&history),
        Command::Candidates { history, selection } => cmd_candidates(&history, &selection),
    }
}

fn load_metrics(args: &HistoryArgs, verbose: bool) -> Result<HistoricalMetrics> {
    let loaded = load_history(&args.file, args.format, args.skip_invalid)?;
    if verbose {
        display_import_summary(&loaded.summary);
    }
    let metrics = analyze_history_ordered(&loaded.draws, args.order.into())
        .with_context(|| format!("Cannot analyze history from {:?}", args.file))?;
    Ok(metrics)
}

/// `ask` supplies the game size when neither `--size` nor the config file sets it.
fn resolve_config<F>(args: &SelectionArgs, ask: F) -> Result<SelectionConfig>
where
    F: FnOnce() -> Result<usize>,
{
    let (mut config, file_sets_size) = match &args.config {
        Some(path) => read_config(path)?,
        None => (SelectionConfig::default(), false),
    };
    if let Some(batch) = args.batch {
        config.batch_count = batch;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.sequential {
        config.parallel = false;
    }
    config.game_size = match args.size {
        Some(size) => size,
        None if file_sets_size => config.game_size,
        None => ask()?,
    };
    config.validate().context("Invalid selection settings")?;
    Ok(config)
}

/// Reads a config file and reports whether it sets `game_size` itself.
fn read_config(path: &Path) -> Result<(SelectionConfig, bool)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {:?}", path))?;
    let value: serde_json::Value = serde_json::from_str(&json)
        .with_context(|| format!("Invalid JSON in {:?}", path))?;
    let sets_size = value.get("game_size").is_some();
    let config: SelectionConfig = serde_json::from_value(value)
        .with_context(|| format!("Invalid selection config in {:?}", path))?;
    Ok((config, sets_size))
}

fn cmd_recommend(history: &HistoryArgs, selection: &SelectionArgs, json: bool) -> Result<()> {
    let metrics = load_metrics(history, !json)?;
    // Keep stdout clean for the JSON document.
    let config = resolve_config(selection, || ask_on_terminal(json))?;
    let best = pick_best_with_config(&metrics, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&best)?);
    } else {
        display_recommendation(&best);
    }
    Ok(())
}

fn cmd_stats(history: &HistoryArgs) -> Result<()> {
    let metrics = load_metrics(history, true)?;
    display_stats(&metrics);
    Ok(())
}

fn cmd_candidates(history: &HistoryArgs, selection: &SelectionArgs) -> Result<()> {
    let metrics = load_metrics(history, true)?;
    let config = resolve_config(selection, || ask_on_terminal(false))?;
    let candidates = generate_candidates(
        &metrics,
        config.game_size,
        config.batch_count,
        config.resolved_seed(),
        config.parallel,
    )?;
    display_candidates(&candidates);
    if let Some(best) = best_candidate(&candidates) {
        display_recommendation(best);
    }
    Ok(())
}

fn ask_on_terminal(to_stderr: bool) -> Result<usize> {
    let mut input = io::stdin().lock();
    if to_stderr {
        ask_game_size(&mut input, &mut io::stderr())
    } else {
        ask_game_size(&mut input, &mut io::stdout())
    }
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, msg: &str) -> Result<String> {
    write!(out, "{}", msg)?;
    out.flush()?;
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Failed to read input")?;
    if read == 0 {
        bail!("No game size given (end of input)");
    }
    Ok(line.trim().to_string())
}

fn ask_game_size<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<usize> {
    loop {
        let answer = prompt(
            input,
            out,
            &format!("How many numbers in the game? ({MIN_GAME_SIZE} to {MAX_GAME_SIZE}): "),
        )?;
        match parse_game_size(&answer) {
            Some(size) => return Ok(size),
            None => writeln!(out, "Please enter a number between {MIN_GAME_SIZE} and {MAX_GAME_SIZE}.")?,
        }
    }
}

fn parse_game_size(input: &str) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|size| (MIN_GAME_SIZE..=MAX_GAME_SIZE).contains(size))
}
