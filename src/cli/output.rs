//! Terminal rendering for envelopes, reports and settings

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::config::Settings;
use crate::eval::EvalReport;
use crate::types::{Citation, ResponseEnvelope, Source};

/// Spinner shown while a query is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// One citation as a single display line
pub fn format_citation(citation: &Citation) -> String {
    match citation {
        Citation::Web { document, url } => format!("{} <{}>", document, url),
        Citation::Document {
            document,
            relevance,
            page,
        } => {
            let mut line = document.clone();
            if let Some(page) = page {
                line.push_str(&format!(", page {}", page));
            }
            if let Some(score) = relevance {
                line.push_str(&format!(" (relevance {:.3})", score));
            }
            line
        }
    }
}

/// Print an envelope for humans
pub fn print_envelope(envelope: &ResponseEnvelope) {
    let label = match envelope.source {
        Source::Rag => "[rag]".cyan(),
        Source::Web => "[web]".blue(),
        Source::Action => "[action]".magenta(),
        Source::Error => "[error]".red(),
    };

    println!("{} {}", label.bold(), envelope.response);

    if !envelope.citations.is_empty() {
        println!("\n{}", "Sources:".bold());
        for (i, citation) in envelope.citations.iter().enumerate() {
            println!("  {}. {}", i + 1, format_citation(citation));
        }
    }
}

/// Print an evaluation report
pub fn print_eval_report(report: &EvalReport) {
    println!("\n{}", "--- EVALUATION REPORT ---".bold());
    println!("Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "Accuracy Score: {}/{} ({:.0}%)",
        report.hits(),
        report.total(),
        report.accuracy() * 100.0
    );
    println!("Avg Latency: {:.2}s", report.average_latency_secs());
    if report.misrouted() > 0 {
        println!("{}", format!("Misrouted: {}", report.misrouted()).yellow());
    }
    println!();

    for r in &report.results {
        let status = if r.hit { "PASS".green() } else { "FAIL".red() };
        println!(
            "{} | {} ({:.1}s, {}, routed {})",
            status, r.query, r.latency_secs, r.source, r.routed_category
        );
        println!("     {}", r.response_snippet.dimmed());
    }
}

/// Print effective settings; secrets appear only as set/unset
pub fn print_settings(settings: &Settings) -> anyhow::Result<()> {
    println!("{}", settings.to_toml()?);

    println!("{}", "# credentials (environment only)".dimmed());
    for (name, present) in [
        ("GROQ_API_KEY", settings.llm.api_key.is_some()),
        ("COHERE_API_KEY", settings.rerank.api_key.is_some()),
        ("TAVILY_API_KEY", settings.web.api_key.is_some()),
        ("QDRANT_API_KEY", settings.vector.api_key.is_some()),
    ] {
        let state = if present { "set".green() } else { "unset".yellow() };
        println!("# {} = {}", name, state);
    }
    Ok(())
}
