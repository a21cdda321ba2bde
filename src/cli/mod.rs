//! CLI module - Command-line interface for Marquee
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Marquee - Movie catalog enrichment
/// Looks movies up at OMDb and TMDB and keeps a local catalog with artwork
#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the REST API server
    #[command(alias = "daemon", alias = "web")]
    Serve,

    /// Look a movie up and add it to the catalog
    #[command(alias = "a")]
    Add {
        /// Movie title
        #[arg(required = true)]
        title: Vec<String>,
    },

    /// List catalogued movies
    #[command(alias = "ls", alias = "l")]
    List {
        /// Zero-based page number
        #[arg(long, default_value = "0")]
        page: u64,
        /// Page size (1-100)
        #[arg(long, default_value = "20")]
        size: u64,
        /// Only watched movies
        #[arg(long, conflicts_with = "unwatched")]
        watched: bool,
        /// Only unwatched movies
        #[arg(long)]
        unwatched: bool,
        /// Filter by director (case-insensitive)
        #[arg(long)]
        director: Option<String>,
        /// Filter by release year
        #[arg(long)]
        year: Option<String>,
    },

    /// List catalogued titles only
    Titles {
        #[arg(long, default_value = "0")]
        page: u64,
        #[arg(long, default_value = "20")]
        size: u64,
    },

    /// Show details about a catalogued movie
    #[command(alias = "i")]
    Info {
        /// Movie ID
        id: String,
    },

    /// Mark a movie as watched
    #[command(alias = "w")]
    Watched {
        /// Movie ID
        id: String,
        /// Mark as unwatched instead
        #[arg(long)]
        unset: bool,
    },

    /// Remove a movie and its artwork from the catalog
    #[command(alias = "rm", alias = "r")]
    Remove {
        /// Movie ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
