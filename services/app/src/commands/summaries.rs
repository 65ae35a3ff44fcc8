use clap::{Args as ClapArgs, Subcommand};
use console::style;

use crate::{
    commands::common::{pick_summary, short_date, summaries_newest_first},
    error::AppError,
    render::render_content,
    state::AppState,
};

#[derive(ClapArgs)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<SummariesCommand>,
}

#[derive(Subcommand)]
pub enum SummariesCommand {
    /// List summaries (the default)
    List,

    /// Show one summary, by id, list position or title
    Show {
        summary: String,
        /// Print the stored text without formatting
        #[arg(long)]
        raw: bool,
        /// Also print the extracted source text
        #[arg(long)]
        original: bool,
    },
}

pub async fn execute(state: &mut AppState, args: Args) -> Result<(), AppError> {
    let summaries = summaries_newest_first(state).await;

    match args.command.unwrap_or(SummariesCommand::List) {
        SummariesCommand::List => {
            if summaries.is_empty() {
                println!("No summaries yet. Upload a document to create one.");
            }
            for (position, summary) in summaries.iter().enumerate() {
                println!(
                    "{:>3}. {}  {}",
                    position + 1,
                    style(&summary.title).bold(),
                    style(short_date(summary)).dim()
                );
            }
        }
        SummariesCommand::Show {
            summary,
            raw,
            original,
        } => {
            let summary = pick_summary(&summaries, &summary)?;
            println!("{}  {}\n", style(&summary.title).bold(), style(short_date(summary)).dim());
            if raw {
                println!("{}", summary.summary_content);
            } else {
                println!("{}", render_content(&summary.summary_content));
            }
            if original {
                println!("\n{}\n", style("Original content").bold().underlined());
                println!("{}", summary.original_content);
            }
        }
    }
    Ok(())
}
