//! CLI subcommand implementations.

pub mod chart;
