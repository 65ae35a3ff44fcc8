use console::style;
use study_aid_core::stats::{quiz_score_series, study_hours_by_title};

use crate::{error::AppError, state::AppState};

const BAR_WIDTH: usize = 30;

pub async fn execute(state: &mut AppState) -> Result<(), AppError> {
    let data = state.store.refresh(&state.user_key()).await;

    println!("{}", style("Quiz scores").bold().underlined());
    let series = quiz_score_series(&data.quiz_history);
    if series.is_empty() {
        println!("No quizzes taken yet.");
    }
    for point in &series {
        println!(
            "{}  {:>3}% {}  {}",
            point.date,
            point.percentage,
            bar(f64::from(point.percentage), 100.0),
            point.summary_title
        );
    }

    println!("\n{}", style("Completed study hours").bold().underlined());
    let hours = study_hours_by_title(&data.schedule);
    if hours.is_empty() {
        println!("No study tasks completed yet.");
    }
    let most = hours.iter().map(|(_, h)| *h).fold(0.0, f64::max);
    for (title, total) in &hours {
        println!("{:>6.1}h {}  {}", total, bar(*total, most), title);
    }
    Ok(())
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round() as usize;
    style("█".repeat(filled.min(BAR_WIDTH))).cyan().to_string()
}
