//! Command-line interface orchestration for hierograph.
//!
//! The `run` command grows Price's model graphs, searches each for a low-agony
//! ranking, and renders the results as text or Graphviz DOT.

mod commands;
mod render;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, Layout, OutputFormat, RunCommand, TrialSummary,
    run_cli,
};
pub use render::{emit_summary, render_summary};

#[cfg(test)]
mod tests;
