use console::style;
use study_aid_core::stats::ScheduleProgress;

use crate::{
    commands::common::{short_date, sort_newest_first},
    error::AppError,
    state::AppState,
};

const RECENT: usize = 3;

pub async fn execute(state: &mut AppState) -> Result<(), AppError> {
    let user_key = state.user_key();
    let mut data = state.store.refresh(&user_key).await;
    sort_newest_first(&mut data.summaries);
    data.quiz_history
        .sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let progress = ScheduleProgress::from_tasks(&data.schedule);

    println!("{} {}\n", style("Dashboard for").bold(), style(&user_key).bold().cyan());
    println!("Summaries:      {}", data.summaries.len());
    println!(
        "Schedule:       {}/{} tasks done ({}%)",
        progress.completed_tasks, progress.total_tasks, progress.completion_percentage
    );
    if let Some(hours) = progress.total_study_hours {
        println!("Hours studied:  {}", hours);
    }
    println!("Quizzes taken:  {}", data.quiz_history.len());

    if !data.summaries.is_empty() {
        println!("\n{}", style("Recent summaries").bold());
        for summary in data.summaries.iter().take(RECENT) {
            println!("  {}  {}", summary.title, style(short_date(summary)).dim());
        }
    }
    if !data.quiz_history.is_empty() {
        println!("\n{}", style("Recent quizzes").bold());
        for entry in data.quiz_history.iter().take(RECENT) {
            println!(
                "  {}  {}/{} ({}%)",
                entry.summary_title, entry.score, entry.total_questions, entry.percentage
            );
        }
    }
    Ok(())
}
