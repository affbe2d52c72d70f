//! End-to-end checks of the run pipeline through the library API.

use hierograph_cli::cli::{Cli, CliError, emit_summary, run_cli};

use clap::Parser;
use rstest::rstest;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn run(args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
    let cli = Cli::try_parse_from(args)?;
    let summary = run_cli(cli)?;
    let mut buffer = Vec::new();
    emit_summary(&summary, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[rstest]
fn seeded_text_runs_are_identical() -> TestResult {
    let args = ["hierograph", "run", "-n", "6", "-m", "2", "--seed", "3"];
    let first = run(&args)?;
    let second = run(&args)?;
    // The header carries wall-clock timing, so compare everything after it.
    let body = |text: &str| text.lines().skip(1).map(str::to_owned).collect::<Vec<_>>();
    assert_eq!(body(&first), body(&second));
    let classified = first
        .lines()
        .filter(|line| line.ends_with("\tforward") || line.ends_with("\tbackward"))
        .count();
    assert_eq!(classified, first.matches(" -> ").count());
    Ok(())
}

#[rstest]
#[case::three_trials(3)]
#[case::single_trial(1)]
fn dot_output_has_one_digraph_per_trial(#[case] trials: u32) -> TestResult {
    let trials_arg = trials.to_string();
    let dot = run(&[
        "hierograph",
        "run",
        "-n",
        "5",
        "-m",
        "1",
        "--seed",
        "8",
        "--trials",
        &trials_arg,
        "--format",
        "dot",
        "--layout",
        "shell",
    ])?;
    assert_eq!(dot.matches("digraph trial_").count(), trials as usize);
    assert_eq!(dot.matches("layout_hint=\"shell\";").count(), trials as usize);
    Ok(())
}

#[rstest]
fn invalid_parameters_carry_a_stable_code() -> TestResult {
    let cli = Cli::try_parse_from(["hierograph", "run", "-n", "2", "-m", "2"])?;
    let err = run_cli(cli).expect_err("m must be below n");
    assert!(matches!(err, CliError::Generation(_)));
    assert_eq!(err.code(), Some("GENERATION_INVALID_PARAMETER"));
    Ok(())
}
