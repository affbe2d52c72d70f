//! Unit tests for argument parsing, trial execution, and rendering.

use super::commands::{derive_search_seed, run_command};
use super::{
    Cli, CliError, Command, ExecutionSummary, Layout, OutputFormat, RunCommand, TrialSummary,
    emit_summary, render_summary, run_cli,
};

use std::fs;

use clap::Parser;
use hierograph_core::{GenerationError, Graph, NodeId, ParameterConstraint, Ranking};
use rstest::{fixture, rstest};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use hierograph_test_support::tracing::RecordingLayer;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[fixture]
fn small_run() -> RunCommand {
    RunCommand {
        nodes: 5,
        mean_out_degree: 1,
        trials: 2,
        seed: Some(11),
        max_attempts: 100_000,
        layout: Layout::Circular,
        format: OutputFormat::Text,
        output: None,
    }
}

fn execute(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    run_cli(Cli {
        debug: false,
        command: Command::Run(command),
    })
}

fn render_to_string(summary: &ExecutionSummary) -> Result<String, Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    render_summary(summary, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[rstest]
fn parses_defaults() -> TestResult {
    let cli = Cli::try_parse_from(["hierograph", "run"])?;
    assert!(!cli.debug);
    let Command::Run(run) = cli.command;
    assert_eq!(run.nodes, 12);
    assert_eq!(run.mean_out_degree, 2);
    assert_eq!(run.trials, 1);
    assert_eq!(run.seed, None);
    assert_eq!(run.max_attempts, hierograph_core::DEFAULT_MAX_ATTEMPTS);
    assert_eq!(run.layout, Layout::Circular);
    assert_eq!(run.format, OutputFormat::Text);
    assert_eq!(run.output, None);
    Ok(())
}

#[rstest]
fn parses_explicit_options() -> TestResult {
    let cli = Cli::try_parse_from([
        "hierograph",
        "run",
        "-n",
        "8",
        "-m",
        "3",
        "--trials",
        "4",
        "--seed",
        "9",
        "--layout",
        "kamada-kawai",
        "--format",
        "dot",
        "-o",
        "out.dot",
        "--debug",
    ])?;
    assert!(cli.debug);
    let Command::Run(run) = cli.command;
    assert_eq!((run.nodes, run.mean_out_degree, run.trials), (8, 3, 4));
    assert_eq!(run.seed, Some(9));
    assert_eq!(run.layout, Layout::KamadaKawai);
    assert_eq!(run.format, OutputFormat::Dot);
    assert_eq!(run.output.as_deref(), Some(std::path::Path::new("out.dot")));
    Ok(())
}

#[rstest]
#[case::zero_trials(&["hierograph", "run", "--trials", "0"])]
#[case::unknown_layout(&["hierograph", "run", "--layout", "spiral"])]
#[case::unknown_format(&["hierograph", "run", "--format", "svg"])]
#[case::negative_nodes(&["hierograph", "run", "-n", "-3"])]
fn rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
fn run_produces_one_summary_per_trial(small_run: RunCommand) -> TestResult {
    let summary = execute(small_run)?;
    assert_eq!(summary.trials.len(), 2);
    for (index, trial) in summary.trials.iter().enumerate() {
        assert_eq!(trial.trial as usize, index);
        assert_eq!(trial.graph.node_count(), 5);
        assert_eq!(trial.generation_seed, 11 + index as u64);
        assert_eq!(trial.search_seed, derive_search_seed(11, trial.trial));
        assert_eq!(trial.ranking.len(), 5);
        assert!(trial.attempts >= 1);
        assert_eq!(
            hierograph_core::compute_agony(&trial.graph, &trial.ranking),
            Ok(trial.agony)
        );
    }
    Ok(())
}

#[rstest]
fn seeded_runs_are_reproducible(small_run: RunCommand) -> TestResult {
    let first = execute(small_run.clone())?;
    let second = execute(small_run)?;
    for (left, right) in first.trials.iter().zip(&second.trials) {
        assert_eq!(left.graph, right.graph);
        assert_eq!(left.ranking, right.ranking);
        assert_eq!(left.agony, right.agony);
        assert_eq!(left.attempts, right.attempts);
    }
    Ok(())
}

#[rstest]
#[case::degree_zero(5, 0, ParameterConstraint::MeanOutDegreeZero)]
#[case::degree_equals_nodes(3, 3, ParameterConstraint::MeanOutDegreeNotBelowNodes)]
#[case::too_many_nodes(27, 2, ParameterConstraint::ExceedsLabelAlphabet)]
fn run_rejects_invalid_parameters(
    small_run: RunCommand,
    #[case] nodes: usize,
    #[case] mean_out_degree: usize,
    #[case] expected: ParameterConstraint,
) {
    let err = execute(RunCommand {
        nodes,
        mean_out_degree,
        ..small_run
    })
    .expect_err("parameters must be rejected");
    match &err {
        CliError::Generation(inner @ GenerationError::InvalidParameter { .. }) => {
            assert_eq!(inner.constraint(), Some(expected));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.code(), Some("GENERATION_INVALID_PARAMETER"));
}

#[rstest]
fn search_seed_is_stable_and_distinct_per_trial() {
    assert_eq!(derive_search_seed(5, 0), derive_search_seed(5, 0));
    assert_ne!(derive_search_seed(5, 0), derive_search_seed(5, 1));
    assert_ne!(derive_search_seed(5, 0), derive_search_seed(6, 0));
    assert_ne!(derive_search_seed(5, 0), 5);
}

#[rstest]
fn text_rendering_lists_ranks_and_edge_directions(small_run: RunCommand) -> TestResult {
    let summary = execute(RunCommand {
        trials: 1,
        ..small_run
    })?;
    let text = render_to_string(&summary)?;
    let trial = &summary.trials[0];

    assert!(text.starts_with("trial 0: nodes=5"));
    assert!(text.contains(&format!("agony={}", trial.agony)));
    assert!(text.contains("seeds: generation=11"));
    for (node, rank) in trial.ranking.iter() {
        let label = trial.graph.label(node).expect("ranked nodes exist");
        assert!(text.contains(&format!("  {label}\trank {rank}")));
    }
    let edge_lines = text
        .lines()
        .filter(|line| line.contains(" -> "))
        .count();
    assert_eq!(edge_lines, trial.graph.edge_count());
    Ok(())
}

#[rstest]
fn dot_rendering_styles_edges_by_direction(small_run: RunCommand) -> TestResult {
    let summary = execute(RunCommand {
        trials: 1,
        format: OutputFormat::Dot,
        layout: Layout::Spring,
        ..small_run
    })?;
    let dot = render_to_string(&summary)?;
    let trial = &summary.trials[0];

    assert!(dot.starts_with("digraph trial_0 {"));
    assert!(dot.contains("layout_hint=\"spring\";"));
    assert!(dot.trim_end().ends_with('}'));
    for (node, rank) in trial.ranking.iter() {
        let label = trial.graph.label(node).expect("ranked nodes exist");
        assert!(dot.contains(&format!("{node} [label=\"{label}\\nRank:{rank}\"];")));
    }
    let classified = trial.ranking.classify(&trial.graph)?;
    for (edge, direction) in classified {
        let style = if direction.is_forward() {
            "style=solid, color=black"
        } else {
            "style=dashed, color=orange"
        };
        assert!(dot.contains(&format!("{} -> {} [{style}];", edge.source, edge.target)));
    }
    Ok(())
}

#[rstest]
fn emit_writes_to_requested_file(small_run: RunCommand) -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("summary.dot");
    let summary = execute(RunCommand {
        format: OutputFormat::Dot,
        output: Some(path.clone()),
        ..small_run
    })?;

    let mut stdout = Vec::new();
    emit_summary(&summary, &mut stdout)?;
    assert!(stdout.is_empty());

    let written = fs::read_to_string(&path)?;
    assert_eq!(written, render_to_string(&summary)?);
    assert_eq!(written.matches("digraph").count(), 2);
    Ok(())
}

#[rstest]
fn emit_reports_unwritable_paths(small_run: RunCommand) -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("missing").join("summary.txt");
    let summary = execute(RunCommand {
        output: Some(path.clone()),
        ..small_run
    })?;

    let err = emit_summary(&summary, Vec::new()).expect_err("parent directory is absent");
    match err {
        CliError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[rstest]
fn run_command_records_spans_and_events(small_run: RunCommand) -> TestResult {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let summary = tracing::subscriber::with_default(subscriber, || run_command(small_run))?;

    let execute_span = layer.span("cli.execute").expect("execute span recorded");
    assert_eq!(execute_span.field("nodes"), Some("5"));
    assert_eq!(execute_span.field("mean_out_degree"), Some("1"));
    assert_eq!(execute_span.field("trials"), Some("2"));

    let trial_spans: Vec<_> = layer
        .spans()
        .into_iter()
        .filter(|span| span.name == "cli.trial")
        .collect();
    assert_eq!(trial_spans.len(), 2);
    for (span, trial) in trial_spans.iter().zip(&summary.trials) {
        assert_eq!(span.field("agony"), Some(trial.agony.to_string().as_str()));
    }
    assert!(layer.span("core.generate").is_some());
    assert!(layer.span("core.min_agony").is_some());

    let completed = layer.events_with_message("trial completed");
    assert_eq!(completed.len(), 2);
    assert!(completed.iter().all(|event| event.level == Level::INFO));
    let command = layer.events_with_message("command completed");
    assert_eq!(command.len(), 1);
    assert_eq!(command[0].field("base_seed"), Some("11"));
    Ok(())
}

#[rstest]
fn run_cli_records_command_name(small_run: RunCommand) -> TestResult {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || execute(small_run))?;

    let run = layer.span("cli.run").expect("run span recorded");
    assert_eq!(run.field("command"), Some("run"));
    Ok(())
}

#[rstest]
#[case::text(OutputFormat::Text)]
#[case::dot(OutputFormat::Dot)]
fn rendering_rejects_rankings_missing_an_endpoint(
    small_run: RunCommand,
    #[case] format: OutputFormat,
) -> TestResult {
    let mut summary = execute(RunCommand {
        trials: 1,
        format,
        ..small_run
    })?;
    let trial = &mut summary.trials[0];
    let edge = trial.graph.edges().next().expect("generated graphs have edges");
    let mut partial = Ranking::new();
    for (node, rank) in trial.ranking.iter().filter(|(node, _)| *node != edge.target) {
        assert_eq!(partial.insert(node, rank), None);
    }
    trial.ranking = partial;

    let err = render_summary(&summary, Vec::new()).expect_err("unranked endpoint must fail");
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    assert!(err.to_string().contains(&format!("node {}", edge.target)));
    Ok(())
}

#[rstest]
fn rendering_follows_ranking_classification() -> TestResult {
    let mut graph = Graph::with_nodes(3)?;
    graph.add_edge(NodeId::new(0), NodeId::new(1))?;
    graph.add_edge(NodeId::new(1), NodeId::new(2))?;
    let mut ranking = Ranking::identity(&graph);
    assert_eq!(ranking.insert(NodeId::new(2), 1), Some(2));
    let summary = ExecutionSummary {
        trials: vec![TrialSummary {
            trial: 0,
            generation_seed: 0,
            search_seed: 0,
            agony: hierograph_core::compute_agony(&graph, &ranking)?,
            graph,
            ranking,
            attempts: 1,
            elapsed: std::time::Duration::ZERO,
        }],
        format: OutputFormat::Text,
        layout: Layout::Circular,
        output: None,
    };

    let text = render_to_string(&summary)?;
    assert!(text.contains("  A -> B\tforward"));
    assert!(text.contains("  B -> C\tbackward"));
    assert!(text.contains("  C\trank 1"));
    assert!(text.contains("agony=1"));
    Ok(())
}
