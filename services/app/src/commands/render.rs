use std::path::PathBuf;

use clap::Args as ClapArgs;
use study_aid_core::formatter::{format_content, to_markup};

use crate::{error::AppError, render::render_content};

#[derive(ClapArgs)]
pub struct Args {
    /// Markdown-style text file (`##`, `###`, `*`/`-` items, `**bold**`)
    pub path: PathBuf,

    /// Print the normalized markup instead of styled text
    #[arg(long)]
    pub markup: bool,
}

pub async fn execute(args: Args) -> Result<(), AppError> {
    let content = tokio::fs::read_to_string(&args.path).await?;
    if args.markup {
        match format_content(&content) {
            Some(nodes) => println!("{}", to_markup(&nodes)),
            None => print!("{}", content),
        }
    } else {
        println!("{}", render_content(&content));
    }
    Ok(())
}
