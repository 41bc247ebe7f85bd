//! Command-line argument parsing for coach-rag
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::rag::retrieval::client::FALLBACK_TOP_K;
use crate::types::RetrievalRequest;

/// coach-rag - Retrieval-augmented coaching feedback for conversation transcripts
#[derive(Parser, Debug)]
#[command(name = "coach-rag")]
#[command(version)]
#[command(about = "Coaching feedback for leadership conversations, enriched with knowledge-base snippets", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate coaching feedback for a transcript
    Analyze(AnalyzeArgs),

    /// Run a single knowledge-base search (smoke test)
    Search(SearchArgs),

    /// Display current configuration
    Config,
}

/// Arguments of `analyze`
#[derive(ClapArgs, Debug)]
pub struct AnalyzeArgs {
    /// Conversation type (e.g. feedback, interview)
    #[arg(long = "type", value_name = "TYPE")]
    pub conversation_type: String,

    /// Conversation subtype (e.g. kritisch)
    #[arg(long)]
    pub subtype: Option<String>,

    /// Goal of the conversation
    #[arg(long)]
    pub goal: Option<String>,

    /// Transcript file (reads stdin when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub transcript: Option<PathBuf>,

    /// Language code (e.g. de)
    #[arg(long)]
    pub lang: Option<String>,

    /// Jurisdiction code (e.g. de_eu)
    #[arg(long)]
    pub jurisdiction: Option<String>,

    /// Speaker label of the leader (e.g. FK)
    #[arg(long)]
    pub leader_label: Option<String>,

    /// Speaker label of the employee (e.g. MA)
    #[arg(long)]
    pub employee_label: Option<String>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

impl AnalyzeArgs {
    /// Build the request once the transcript has been read
    pub fn to_request(&self, transcript_text: String) -> RetrievalRequest {
        RetrievalRequest {
            conversation_type: self.conversation_type.clone(),
            conversation_sub_type: self.subtype.clone(),
            goal: self.goal.clone(),
            transcript_text,
            lang: self.lang.clone(),
            jurisdiction: self.jurisdiction.clone(),
            leader_label: self.leader_label.clone(),
            employee_label: self.employee_label.clone(),
        }
    }
}

/// Arguments of `search`
#[derive(ClapArgs, Debug)]
pub struct SearchArgs {
    /// Search text
    #[arg(long)]
    pub text: String,

    /// Language code added to the filter
    #[arg(long)]
    pub lang: Option<String>,

    /// Number of hits (non-positive values fall back to 5)
    #[arg(long = "top-k", default_value_t = FALLBACK_TOP_K as i64, allow_negative_numbers = true)]
    pub top_k: i64,

    /// Print the raw hits as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    pub fn top_k(&self) -> usize {
        coerce_top_k(self.top_k)
    }
}

/// Non-positive values become [`FALLBACK_TOP_K`]
pub fn coerce_top_k(value: i64) -> usize {
    if value <= 0 {
        FALLBACK_TOP_K
    } else {
        value as usize
    }
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Verbosity {
    /// Log filter for this verbosity; `Normal` keeps the configured level
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => configured,
            Verbosity::Verbose => "debug",
            Verbosity::VeryVerbose => "trace",
        }
    }
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}
