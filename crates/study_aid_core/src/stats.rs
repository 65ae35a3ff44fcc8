//! crates/study_aid_core/src/stats.rs
//!
//! Aggregates shown on the dashboard and the performance view.

use chrono::NaiveDate;

use crate::domain::{QuizHistoryEntry, StudyTask};

/// Progress through the study schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleProgress {
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub completion_percentage: u32,
    /// Only known once every task is done.
    pub total_study_hours: Option<f64>,
}

impl ScheduleProgress {
    pub fn from_tasks(tasks: &[StudyTask]) -> Self {
        let completed_tasks = tasks.iter().filter(|task| task.is_completed).count();
        let total_tasks = tasks.len();
        let all_done = total_tasks > 0 && completed_tasks == total_tasks;

        Self {
            completed_tasks,
            total_tasks,
            completion_percentage: crate::domain::percentage(completed_tasks as u32, total_tasks as u32),
            total_study_hours: all_done.then(|| tasks.iter().map(|task| task.hours).sum()),
        }
    }
}

/// Completed study hours per summary title, in the order titles first appear.
pub fn study_hours_by_title(tasks: &[StudyTask]) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for task in tasks.iter().filter(|task| task.is_completed) {
        match totals.iter_mut().find(|(title, _)| *title == task.summary_title) {
            Some((_, hours)) => *hours += task.hours,
            None => totals.push((task.summary_title.clone(), task.hours)),
        }
    }
    totals
}

/// One bar of the quiz performance chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizScorePoint {
    pub date: NaiveDate,
    pub summary_title: String,
    pub percentage: u32,
}

pub fn quiz_score_series(history: &[QuizHistoryEntry]) -> Vec<QuizScorePoint> {
    history
        .iter()
        .map(|entry| QuizScorePoint {
            date: entry.created_at.date_naive(),
            summary_title: entry.summary_title.clone(),
            percentage: entry.percentage,
        })
        .collect()
}
