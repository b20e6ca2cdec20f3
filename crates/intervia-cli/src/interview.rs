//! Interactive interview loop.
//!
//! Drives a single session end to end: optional resume ingestion,
//! chat-based info collection, six timed questions with a live countdown
//! in the prompt and a spinner while answers are scored, then the final
//! report. Input lines and countdown expiries are multiplexed with
//! `tokio::select!`; `Lines::next_line` is cancellation safe, so a timer
//! firing mid-wait does not lose typed input.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use intervia_core::oracle::EvaluationOracle;
use intervia_core::session::service::InterviewService;
use intervia_core::timer::TimerExpired;
use intervia_infra::oracle::{HeuristicOracle, LlmOracle};
use intervia_infra::resume;
use intervia_types::candidate::CandidateInfo;
use intervia_types::chat::{ChatEntry, ChatRole};
use intervia_types::config::InterviewConfig;
use intervia_types::session::SessionStatus;

use crate::report;

pub async fn run(
    resume_path: Option<&Path>,
    offline: bool,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let api_key = std::env::var("ANTHROPIC_API_KEY")
        .ok()
        .filter(|key| !key.is_empty());

    match api_key {
        Some(key) if !offline => {
            let oracle = LlmOracle::new(SecretString::from(key), &config);
            let (service, expiries) = InterviewService::new(oracle);
            drive(service, expiries, resume_path).await
        }
        _ => {
            if !offline {
                println!(
                    "  {} ANTHROPIC_API_KEY not set; using the offline oracle.",
                    style("!").yellow().bold()
                );
            }
            let oracle = HeuristicOracle::new(&config);
            let (service, expiries) = InterviewService::new(oracle);
            drive(service, expiries, resume_path).await
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<InterviewConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file {}", path.display()))
        }
        None => Ok(InterviewConfig::default()),
    }
}

async fn drive<O: EvaluationOracle>(
    service: InterviewService<O>,
    mut expiries: mpsc::Receiver<TimerExpired>,
    resume_path: Option<&Path>,
) -> anyhow::Result<()> {
    print_banner();
    service.start_session().await;

    let partial = match resume_path {
        Some(path) => match resume::extract_candidate(path) {
            Ok(info) => {
                println!(
                    "  {} Resume ingested from {}",
                    style("*").cyan().bold(),
                    style(path.display()).dim()
                );
                info
            }
            Err(err) => {
                println!(
                    "  {} Could not read resume: {err}",
                    style("!").yellow().bold()
                );
                CandidateInfo::default()
            }
        },
        None => CandidateInfo::default(),
    };
    let entries = service.ingest_resume(partial).await?;
    render_entries(&entries);

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_prompt(&service).await?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!("\n  {}", style("Session ended.").dim());
                    service.discard().await;
                    return Ok(());
                };
                if line.trim().is_empty() {
                    continue;
                }
                let scoring = matches!(
                    service.active_session().await.map(|s| s.status),
                    Some(SessionStatus::InProgress)
                );
                let entries = if scoring {
                    let spinner = thinking_spinner("scoring...");
                    let result = service.handle_message(&line).await;
                    spinner.finish_and_clear();
                    result?
                } else {
                    service.handle_message(&line).await?
                };
                render_entries(&entries);
            }
            Some(event) = expiries.recv() => {
                println!();
                let spinner = thinking_spinner("time's up, scoring...");
                let result = service.handle_timeout(event).await;
                spinner.finish_and_clear();
                render_entries(&result?);
            }
        }

        if service.active_session().await.is_none() {
            if let Some(session) = service.completed_sessions().await.last() {
                report::print_report(session);
            }
            return Ok(());
        }
    }
}

fn print_banner() {
    println!();
    println!("  {} {}", style("*").cyan().bold(), style("Intervia").cyan().bold());
    println!(
        "  {}",
        style("Six timed questions: two easy, two medium, two hard.").dim()
    );
    println!("  {}", style("Press Ctrl+D to quit at any time.").dim());
    println!();
}

async fn print_prompt<O: EvaluationOracle>(service: &InterviewService<O>) -> anyhow::Result<()> {
    let prompt = match service.remaining_secs().await {
        Some(secs) => format!(
            "  {} {} ",
            style(format!("[{secs}s]")).yellow(),
            style("You >").green().bold()
        ),
        None => format!("  {} ", style("You >").green().bold()),
    };
    print!("{prompt}");
    std::io::stdout().flush()?;
    Ok(())
}

fn render_entries(entries: &[ChatEntry]) {
    for entry in entries {
        match entry.role {
            ChatRole::Ai => println!(
                "  {} {}",
                style("Interviewer >").cyan().bold(),
                entry.content
            ),
            ChatRole::System => println!("  {}", style(&entry.content).dim()),
            // The user just typed it; echoing would duplicate the line.
            ChatRole::User => {}
        }
    }
}

fn thinking_spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}
