//! Text and DOT rendering of trial results.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use hierograph_core::{EdgeDirection, Graph, NodeId};
use tracing::{debug, instrument};

use super::commands::{CliError, ExecutionSummary, Layout, OutputFormat, TrialSummary};

/// Writes `summary` to its configured output file, or to `writer` when no file
/// was requested.
///
/// # Errors
/// Returns [`CliError::Io`] when the output file cannot be created or written.
/// Failures writing to `writer` are reported against the path `<stdout>`.
#[instrument(name = "cli.emit", err, skip_all, fields(format = ?summary.format))]
pub fn emit_summary(summary: &ExecutionSummary, writer: impl Write) -> Result<(), CliError> {
    match &summary.output {
        Some(path) => {
            let io_error = |source| CliError::Io {
                path: path.clone(),
                source,
            };
            let file = File::create(path).map_err(io_error)?;
            let mut buffered = BufWriter::new(file);
            render_summary(summary, &mut buffered).map_err(io_error)?;
            buffered.flush().map_err(io_error)?;
            debug!(path = %path.display(), "summary written");
            Ok(())
        }
        None => render_summary(summary, writer).map_err(|source| CliError::Io {
            path: "<stdout>".into(),
            source,
        }),
    }
}

/// Renders `summary` to `writer` in its requested format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails, or an
/// [`io::ErrorKind::InvalidData`] error when an edge endpoint has no rank.
///
/// # Examples
/// ```
/// # use std::time::Duration;
/// # use hierograph_cli::cli::{ExecutionSummary, Layout, OutputFormat, TrialSummary, render_summary};
/// # use hierograph_core::{Graph, NodeId, Ranking};
/// let mut graph = Graph::with_nodes(2)?;
/// graph.add_edge(NodeId::new(0), NodeId::new(1))?;
/// let summary = ExecutionSummary {
///     trials: vec![TrialSummary {
///         trial: 0,
///         generation_seed: 1,
///         search_seed: 2,
///         ranking: Ranking::identity(&graph),
///         graph,
///         agony: 0,
///         attempts: 3,
///         elapsed: Duration::from_millis(1),
///     }],
///     format: OutputFormat::Dot,
///     layout: Layout::Shell,
///     output: None,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.contains("0 -> 1 [style=solid, color=black];"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    for trial in &summary.trials {
        match summary.format {
            OutputFormat::Text => render_text(trial, &mut writer)?,
            OutputFormat::Dot => render_dot(trial, summary.layout, &mut writer)?,
        }
    }
    Ok(())
}

fn render_text(trial: &TrialSummary, writer: &mut impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "trial {}: nodes={} edges={} agony={} attempts={} converged={} elapsed={:?}",
        trial.trial,
        trial.graph.node_count(),
        trial.graph.edge_count(),
        trial.agony,
        trial.attempts,
        trial.converged(),
        trial.elapsed,
    )?;
    writeln!(
        writer,
        "seeds: generation={} search={}",
        trial.generation_seed, trial.search_seed
    )?;
    for node in trial.graph.nodes() {
        writeln!(
            writer,
            "  {}\trank {}",
            label(&trial.graph, node),
            rank_text(trial, node)
        )?;
    }
    for (edge, direction) in classified_edges(trial)? {
        writeln!(
            writer,
            "  {} -> {}\t{}",
            label(&trial.graph, edge.source),
            label(&trial.graph, edge.target),
            if direction.is_forward() {
                "forward"
            } else {
                "backward"
            }
        )?;
    }
    Ok(())
}

fn render_dot(trial: &TrialSummary, layout: Layout, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "digraph trial_{} {{", trial.trial)?;
    writeln!(writer, "  layout_hint=\"{}\";", layout.as_str())?;
    writeln!(writer, "  label=\"agony {}\";", trial.agony)?;
    writeln!(writer, "  node [shape=square];")?;
    for node in trial.graph.nodes() {
        writeln!(
            writer,
            "  {} [label=\"{}\\nRank:{}\"];",
            node,
            label(&trial.graph, node),
            rank_text(trial, node)
        )?;
    }
    for (edge, direction) in classified_edges(trial)? {
        let style = if direction.is_forward() {
            "style=solid, color=black"
        } else {
            "style=dashed, color=orange"
        };
        writeln!(writer, "  {} -> {} [{style}];", edge.source, edge.target)?;
    }
    writeln!(writer, "}}")
}

fn classified_edges(
    trial: &TrialSummary,
) -> io::Result<Vec<(hierograph_core::Edge, EdgeDirection)>> {
    trial
        .ranking
        .classify(&trial.graph)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

fn label(graph: &Graph, node: NodeId) -> char {
    graph.label(node).unwrap_or('?')
}

fn rank_text(trial: &TrialSummary, node: NodeId) -> String {
    trial
        .ranking
        .rank(node)
        .map_or_else(|| "-".to_owned(), |rank| rank.to_string())
}
