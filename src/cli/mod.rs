//! CLI module for coach-rag
//!
//! Handles command-line argument parsing and result display.

pub mod args;
pub mod display;

pub use args::{coerce_top_k, AnalyzeArgs, Args, Commands, SearchArgs, Verbosity};
