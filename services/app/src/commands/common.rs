//! Lookups shared by the commands that refer to stored items on the command line.

use study_aid_core::domain::{StudyTask, Summary};

use crate::{error::AppError, state::AppState};

/// The user's summaries, newest first. List positions on the command line refer to
/// this order.
pub async fn summaries_newest_first(state: &AppState) -> Vec<Summary> {
    let mut summaries = state.store.list_summaries(&state.user_key()).await;
    sort_newest_first(&mut summaries);
    summaries
}

pub fn sort_newest_first(summaries: &mut [Summary]) {
    summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Finds a summary by id, by 1-based position in the list, or by title
/// (case-insensitive), in that order.
pub fn pick_summary<'a>(summaries: &'a [Summary], selector: &str) -> Result<&'a Summary, AppError> {
    summaries
        .iter()
        .find(|summary| summary.id == selector)
        .or_else(|| by_position(summaries, selector))
        .or_else(|| {
            summaries
                .iter()
                .find(|summary| summary.title.eq_ignore_ascii_case(selector.trim()))
        })
        .ok_or_else(|| AppError::Internal(format!("No summary matches '{}'.", selector)))
}

/// Resolves a task id, or a 1-based position in the schedule, to the task's id.
pub fn pick_task_id(tasks: &[StudyTask], selector: &str) -> Result<String, AppError> {
    tasks
        .iter()
        .find(|task| task.id == selector)
        .or_else(|| by_position(tasks, selector))
        .map(|task| task.id.clone())
        .ok_or_else(|| AppError::Internal(format!("No study task matches '{}'.", selector)))
}

fn by_position<'a, T>(items: &'a [T], selector: &str) -> Option<&'a T> {
    let position: usize = selector.trim().parse().ok()?;
    position.checked_sub(1).and_then(|index| items.get(index))
}

pub fn short_date(summary: &Summary) -> String {
    summary.created_at.format("%Y-%m-%d").to_string()
}
