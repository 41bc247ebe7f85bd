//! Terminal rendering of coaching results and raw search hits

use colored::*;

use crate::rag::retrieval::{payload, RawSearchResult};
use crate::rag::ComposedResult;

/// Human-readable feedback. Retrieved card text is not shown, only counts.
pub fn render_feedback(result: &ComposedResult) -> String {
    let feedback = &result.feedback;
    let mut out = String::new();

    out.push_str(&format!("{}\n{}\n", "Summary".bold().cyan(), feedback.summary));

    let sections = [
        ("Strengths", &feedback.strengths),
        ("Improvements", &feedback.improvements),
        ("Rewrites", &feedback.rewrites),
        ("Risk flags", &feedback.risk_flags),
    ];
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}\n", title.bold().cyan()));
        for item in items {
            out.push_str(&format!("  {} {}\n", "•".green(), item));
        }
    }

    let scores = &feedback.scores;
    if scores.overall.is_some() || !scores.dimensions.is_empty() {
        out.push_str(&format!("\n{}\n", "Scores".bold().cyan()));
        if let Some(overall) = scores.overall {
            out.push_str(&format!("  overall: {}\n", format!("{:.1}", overall).bold()));
        }
        for (name, value) in &scores.dimensions {
            out.push_str(&format!("  {}: {:.1}\n", name, value));
        }
    }

    let rag_line = match &result.rag_error {
        Some(error) => format!("{} {}", "Knowledge base unavailable:".yellow(), error.yellow()),
        None => format!("{} snippet(s) used", result.rag_context_count),
    };
    out.push_str(&format!("\n{}\n", rag_line.dimmed()));
    out
}

/// One line per hit: rank, id, score, title
pub fn render_hits(result: &RawSearchResult) -> String {
    if result.hits.is_empty() {
        return format!("{}\n", "No hits".yellow());
    }

    let mut out = format!("{} hit(s)\n", result.count);
    for (rank, hit) in result.hits.iter().enumerate() {
        let title = payload::title(&hit.fields).unwrap_or_default();
        out.push_str(&format!(
            "{:>3}. {} {} {}\n",
            rank + 1,
            hit.id.green(),
            format!("score={:.3}", hit.finite_score()).dimmed(),
            title
        ));
    }
    out
}
