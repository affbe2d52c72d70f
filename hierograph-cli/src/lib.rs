//! Support library for the hierograph CLI binary.
//!
//! Exposes argument parsing, the trial loop, and summary rendering so tests can
//! drive the command pipeline without spawning a subprocess.

pub mod cli;
pub mod logging;
