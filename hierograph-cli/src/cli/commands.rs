//! Command implementations and argument parsing for the hierograph CLI.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand, ValueEnum};
use hierograph_core::{
    AgonyError, AgonySearch, AgonySearchParams, DEFAULT_MAX_ATTEMPTS, GenerationError, Graph,
    PriceModel, PriceModelParams, Ranking,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_NODES: usize = 12;
const DEFAULT_MEAN_OUT_DEGREE: usize = 2;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "hierograph",
    about = "Grow Price's model graphs and rank them by minimum agony."
)]
pub struct Cli {
    /// Enable debug logging regardless of `RUST_LOG`.
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate graphs and search each for a low-agony ranking.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Number of nodes per generated graph.
    #[arg(short = 'n', long, default_value_t = DEFAULT_NODES)]
    pub nodes: usize,

    /// Mean out-degree `m`; also the number of seed nodes.
    #[arg(short = 'm', long = "mean-out-degree", default_value_t = DEFAULT_MEAN_OUT_DEGREE)]
    pub mean_out_degree: usize,

    /// Number of independent trials.
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    pub trials: u32,

    /// Base seed; trials are reproducible when set.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ranking samples drawn per trial before giving up on zero agony.
    #[arg(long = "max-attempts", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Layout hint forwarded to DOT consumers.
    #[arg(long, value_enum, default_value_t = Layout::Circular)]
    pub layout: Layout,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the summary to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Graph layouts a renderer may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Force-directed spring layout.
    Spring,
    /// Kamada-Kawai energy layout.
    KamadaKawai,
    /// Nodes on a circle.
    Circular,
    /// Concentric shells.
    Shell,
}

impl Layout {
    /// Stable name used in rendered output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::KamadaKawai => "kamada_kawai",
            Self::Circular => "circular",
            Self::Shell => "shell",
        }
    }
}

/// Summary output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing of ranks and edges.
    Text,
    /// Graphviz DOT, one digraph per trial.
    Dot,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing the summary file failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Graph generation failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// Ranking search failed.
    #[error(transparent)]
    Agony(#[from] AgonyError),
}

impl CliError {
    /// Stable code of the underlying core error, if any.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Io { .. } => None,
            Self::Generation(err) => Some(err.code().as_str()),
            Self::Agony(err) => Some(err.code().as_str()),
        }
    }
}

/// Outcome of a single trial.
#[derive(Debug, Clone)]
pub struct TrialSummary {
    /// Zero-based trial index.
    pub trial: u32,
    /// Seed the graph was grown from.
    pub generation_seed: u64,
    /// Seed the ranking search used.
    pub search_seed: u64,
    /// The generated graph.
    pub graph: Graph,
    /// Best ranking found.
    pub ranking: Ranking,
    /// Agony of [`Self::ranking`].
    pub agony: u64,
    /// Rankings sampled.
    pub attempts: usize,
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
}

impl TrialSummary {
    /// Returns `true` when the search reached zero agony.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.agony == 0
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Per-trial results in execution order.
    pub trials: Vec<TrialSummary>,
    /// Requested output format.
    pub format: OutputFormat,
    /// Requested layout hint.
    pub layout: Layout,
    /// Destination file, or `None` for the caller's writer.
    pub output: Option<PathBuf>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when generation or ranking fails.
///
/// # Examples
/// ```
/// # use hierograph_cli::cli::{Cli, Command, Layout, OutputFormat, RunCommand, run_cli};
/// let cli = Cli {
///     debug: false,
///     command: Command::Run(RunCommand {
///         nodes: 5,
///         mean_out_degree: 1,
///         trials: 2,
///         seed: Some(7),
///         max_attempts: 100_000,
///         layout: Layout::Circular,
///         format: OutputFormat::Text,
///         output: None,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.trials.len(), 2);
/// assert!(summary.trials.iter().all(|trial| trial.graph.node_count() == 5));
/// # Ok::<(), hierograph_cli::cli::CliError>(())
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip_all,
    fields(
        nodes = command.nodes,
        mean_out_degree = command.mean_out_degree,
        trials = command.trials,
    ),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let params = PriceModelParams::new(command.nodes, command.mean_out_degree)?;
    let base_seed = command.seed.unwrap_or_else(rand::random);

    let trials = (0..command.trials)
        .map(|trial| run_trial(&params, command.max_attempts, base_seed, trial))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        trials = trials.len(),
        converged = trials.iter().filter(|trial| trial.converged()).count(),
        base_seed,
        "command completed"
    );
    Ok(ExecutionSummary {
        trials,
        format: command.format,
        layout: command.layout,
        output: command.output,
    })
}

#[instrument(
    name = "cli.trial",
    err,
    skip_all,
    fields(trial = trial, agony = field::Empty),
)]
pub(super) fn run_trial(
    params: &PriceModelParams,
    max_attempts: usize,
    base_seed: u64,
    trial: u32,
) -> Result<TrialSummary, CliError> {
    let generation_seed = base_seed.wrapping_add(u64::from(trial));
    let search_seed = derive_search_seed(base_seed, trial);

    let graph = PriceModel::new(params.clone().with_rng_seed(generation_seed)).generate()?;
    let search = AgonySearch::new(
        AgonySearchParams::default()
            .with_max_attempts(max_attempts)
            .with_rng_seed(search_seed),
    );

    let start = Instant::now();
    let outcome = search.run(&graph)?;
    let elapsed = start.elapsed();

    Span::current().record("agony", outcome.agony());
    info!(
        agony = outcome.agony(),
        attempts = outcome.attempts(),
        elapsed = ?elapsed,
        "trial completed"
    );
    let attempts = outcome.attempts();
    let (ranking, agony) = outcome.into_parts();
    Ok(TrialSummary {
        trial,
        generation_seed,
        search_seed,
        graph,
        ranking,
        agony,
        attempts,
        elapsed,
    })
}

/// SplitMix64 increment (the 64-bit golden ratio).
const SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

/// Derives a search seed decorrelated from the trial's generation seed.
pub(super) fn derive_search_seed(base_seed: u64, trial: u32) -> u64 {
    splitmix64(base_seed ^ (u64::from(trial) + 1).wrapping_mul(SEED_SPACING))
}

fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}
