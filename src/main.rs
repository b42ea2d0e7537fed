//! Hieren - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::time::Duration;
use tracing::info;

use hieren::{
    cli::{output, require_query_text, Args, Commands},
    config::Settings,
    doctor::Doctor,
    eval,
    pipeline::Pipeline,
    telemetry, PipelineError, Query,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_tracing(args.verbosity());

    let settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;

    match &args.command {
        Commands::Ask {
            query,
            user,
            json,
            timeout,
        } => {
            run_ask(&args, &settings, query, user.as_deref(), *json, *timeout).await?;
        }
        Commands::Doctor { live } => {
            run_doctor(settings, *live).await;
        }
        Commands::Eval { cases } => {
            run_eval(&args, &settings, cases.as_deref()).await?;
        }
        Commands::Config { write } => {
            output::print_settings(&settings)?;
            if *write {
                let path = match &args.config {
                    Some(path) => path.clone(),
                    None => Settings::default_path()?,
                };
                settings.save(&path)?;
                println!("{} {}", "Wrote".green(), path.display());
            }
        }
    }

    Ok(())
}

async fn build_pipeline(args: &Args, settings: &Settings) -> Result<Pipeline> {
    let pb = args
        .verbosity()
        .show_progress()
        .then(|| output::spinner("Connecting to manual index..."));

    let pipeline = Pipeline::from_settings(settings).await;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    pipeline.context("Failed to initialize query pipeline")
}

async fn run_ask(
    args: &Args,
    settings: &Settings,
    text: &str,
    user: Option<&str>,
    json: bool,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let text = require_query_text(text)?;
    let pipeline = build_pipeline(args, settings).await?;

    let user = user.unwrap_or(settings.serving.default_user.as_str());
    let query = Query::new(text).with_user(user);
    let limit = Duration::from_secs(timeout_secs.unwrap_or(settings.serving.request_timeout_secs));

    let pb = (!json && args.verbosity().show_progress()).then(|| output::spinner("Thinking..."));
    let result = tokio::time::timeout(limit, pipeline.process_query(&query)).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let envelope = result
        .map_err(|_| PipelineError::Timeout {
            duration_ms: limit.as_millis() as u64,
        })
        .with_context(|| format!("Query {} abandoned", query.id()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        output::print_envelope(&envelope);
    }

    Ok(())
}

async fn run_doctor(settings: Settings, live: bool) {
    let doctor = Doctor::new(settings);

    let checks = if live {
        doctor.run_live_diagnostics().await
    } else {
        doctor.run_diagnostics()
    };
    Doctor::display_results(&checks);

    if Doctor::is_ready(&checks) {
        println!("{}", "Ready to serve queries.".green());
    } else {
        println!("{}", "Not ready: fix the failing checks above.".red());
        std::process::exit(1);
    }
}

async fn run_eval(args: &Args, settings: &Settings, cases: Option<&std::path::Path>) -> Result<()> {
    let cases = match cases {
        Some(path) => eval::load_cases(path)?,
        None => eval::builtin_cases(),
    };
    info!(cases = cases.len(), "starting evaluation");

    let pipeline = build_pipeline(args, settings).await?;
    let report = eval::run_evaluation(&pipeline, &cases).await;
    output::print_eval_report(&report);

    Ok(())
}
