// src/cli.rs

//! Command-line surface for the `chronodagd` demo binary.
//!
//! This crate's persistence engine and HTTP/SSE surface are out of scope
//! (§ non-goals); `chronodagd` exists only to exercise the in-memory
//! repositories end to end — seed a demo container DAG, then either run it
//! once or hand it to the cron scheduler.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "chronodagd", about = "Single-node DAG job scheduler demo")]
pub struct CliArgs {
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Seed a demo container and run its DAG once, printing each stage as it
    /// executes, then exit.
    RunOnce,
    /// Seed a demo container, register it with the cron scheduler, and block
    /// until Ctrl-C.
    Serve,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
