//! CLI module - Command-line interface for quizsource
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::constants;

/// quizsource - Technical quiz question sourcing
/// Fetches quiz questions from a remote provider with caching and fallbacks
#[derive(Parser)]
#[command(name = "quizsource")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (defaults to the standard search locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch quiz questions for one or more technologies
    #[command(alias = "q")]
    Questions {
        /// Technology identifiers (e.g. react python)
        #[arg(required = true)]
        technologies: Vec<String>,

        /// Questions per technology
        #[arg(short, long, default_value_t = constants::limits::DEFAULT_QUESTION_COUNT)]
        count: usize,

        /// Print JSON instead of a readable listing
        #[arg(long)]
        json: bool,
    },

    /// Warm the cache for the given technologies and show what got cached
    Preload {
        #[arg(required = true)]
        technologies: Vec<String>,
    },

    /// Show curated questions from the built-in bank
    Bank {
        technology: String,

        #[arg(short, long, default_value_t = constants::limits::DEFAULT_QUESTION_COUNT)]
        count: usize,
    },

    /// Keep a warmed cache alive with periodic eviction until Ctrl+C
    Daemon {
        /// Technologies to preload on start
        preload: Vec<String>,
    },

    /// Create default config file
    Init,
}

pub use commands::*;
