//! Shared test utilities used across hierograph crates.

pub mod proptest_profile;
pub mod tracing;
