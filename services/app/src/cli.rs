use clap::{Parser, Subcommand};

use crate::commands::{ask, auth, quiz, render, schedule, summaries, upload};

#[derive(Parser)]
#[command(name = "study-aid")]
#[command(about = "Study aid - summarize lecture documents, quiz yourself and plan study time")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register, log in or out, and show who is logged in
    Auth(auth::Args),

    /// Summarize a document (.txt, .pdf, .xlsx, .pptx) and store the summary
    Upload(upload::Args),

    /// List or show stored summaries
    Summaries(summaries::Args),

    /// Ask a question about a summary's notes, or chat without one
    Ask(ask::Args),

    /// Take a generated multiple-choice quiz on a summary
    Quiz(quiz::Args),

    /// Plan and track study time
    Schedule(schedule::Args),

    /// Quiz scores and completed study hours
    Performance,

    /// Overview of summaries, schedule progress and recent quizzes
    Dashboard,

    /// Format a local markdown file without contacting any service
    Render(render::Args),
}
