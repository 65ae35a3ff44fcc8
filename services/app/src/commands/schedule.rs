use clap::{Args as ClapArgs, Subcommand};
use console::style;
use study_aid_core::{domain::StudyTask, stats::ScheduleProgress};

use crate::{
    commands::common::{pick_summary, pick_task_id, summaries_newest_first},
    error::AppError,
    state::AppState,
};

#[derive(ClapArgs)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<ScheduleCommand>,
}

#[derive(Subcommand)]
pub enum ScheduleCommand {
    /// Show the schedule (the default)
    List,

    /// Plan study hours for a summary (id, list position or title)
    Add { summary: String, hours: f64 },

    /// Mark a task (id or position) as done
    Done { task: String },

    /// Mark a task (id or position) as not done
    Undo { task: String },
}

pub async fn execute(state: &mut AppState, args: Args) -> Result<(), AppError> {
    let user_key = state.user_key();
    let tasks = state.store.list_schedule(&user_key).await;

    let tasks = match args.command.unwrap_or(ScheduleCommand::List) {
        ScheduleCommand::List => tasks,
        ScheduleCommand::Add { summary, hours } => {
            let summaries = summaries_newest_first(state).await;
            let summary = pick_summary(&summaries, &summary)?;
            state
                .store
                .add_study_task(&user_key, &tasks, summary, hours)
                .await?
        }
        ScheduleCommand::Done { task } => {
            let task_id = pick_task_id(&tasks, &task)?;
            state
                .store
                .set_task_completion(&user_key, &tasks, &task_id, true)
                .await?
        }
        ScheduleCommand::Undo { task } => {
            let task_id = pick_task_id(&tasks, &task)?;
            state
                .store
                .set_task_completion(&user_key, &tasks, &task_id, false)
                .await?
        }
    };

    print_schedule(&tasks);
    Ok(())
}

fn print_schedule(tasks: &[StudyTask]) {
    if tasks.is_empty() {
        println!("Nothing scheduled yet.");
        return;
    }
    for (position, task) in tasks.iter().enumerate() {
        let mark = if task.is_completed {
            style("[x]").green()
        } else {
            style("[ ]").dim()
        };
        println!(
            "{:>3}. {} {}  {}h",
            position + 1,
            mark,
            task.summary_title,
            task.hours
        );
    }

    let progress = ScheduleProgress::from_tasks(tasks);
    println!(
        "\n{}/{} done ({}%)",
        progress.completed_tasks, progress.total_tasks, progress.completion_percentage
    );
}
