use clap::Args as ClapArgs;
use console::style;

use crate::{
    commands::common::{pick_summary, summaries_newest_first},
    error::AppError,
    render::render_content,
    state::AppState,
};

#[derive(ClapArgs)]
pub struct Args {
    pub question: String,

    /// Answer only from this summary's notes (id, list position or title)
    #[arg(long, short)]
    pub summary: Option<String>,
}

pub async fn execute(state: &mut AppState, args: Args) -> Result<(), AppError> {
    let completion = state.completion()?;

    let answer = match args.summary {
        Some(selector) => {
            let summaries = summaries_newest_first(state).await;
            let summary = pick_summary(&summaries, &selector)?;
            println!("{}", style(format!("Answering from \"{}\"", summary.title)).dim());
            completion
                .answer_from_notes(&args.question, &summary.summary_content, &summary.original_content)
                .await?
        }
        None => completion.chat(&args.question).await?,
    };

    println!("{}", render_content(&answer));
    Ok(())
}
