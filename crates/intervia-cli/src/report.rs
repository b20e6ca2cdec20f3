//! Final interview report rendering.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use intervia_types::session::InterviewSession;

/// Print the per-question score table and the aggregate summary for a
/// completed session.
pub fn print_report(session: &InterviewSession) {
    println!();
    println!("  {}", style("Interview report").cyan().bold());

    let candidate = &session.candidate;
    if let Some(name) = &candidate.name {
        let contact = [candidate.email.as_deref(), candidate.phone.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" · ");
        println!("  {} {}", style(name).bold(), style(contact).dim());
    }
    if let (Some(started), Some(ended)) = (session.started_at, session.ended_at) {
        let secs = (ended - started).num_seconds().max(0);
        println!("  {}", style(format!("Duration: {secs}s")).dim());
    }
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Difficulty").fg(Color::White),
        Cell::new("Question").fg(Color::White),
        Cell::new("Time").fg(Color::White),
        Cell::new("Score").fg(Color::White),
    ]);

    for (index, (question, answer)) in session
        .questions
        .iter()
        .zip(&session.answers)
        .enumerate()
    {
        let score_cell = match answer.score {
            80.. => Cell::new(format!("{}/100", answer.score)).fg(Color::Green),
            60..=79 => Cell::new(format!("{}/100", answer.score)).fg(Color::Yellow),
            _ => Cell::new(format!("{}/100", answer.score)).fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(question.difficulty.to_string()),
            Cell::new(truncate(&question.prompt, 60)),
            Cell::new(format!("{}s / {}s", answer.elapsed_secs, question.time_limit_secs)),
            score_cell,
        ]);
    }

    println!("{table}");
    println!();

    if let Some(score) = session.final_score {
        println!(
            "  {} {}",
            style("Final score:").bold(),
            style(format!("{score}/100")).cyan().bold()
        );
    }
    if let Some(summary) = &session.summary {
        println!("  {summary}");
    }
    println!();
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{head}...")
}
