use std::path::PathBuf;

use clap::Args as ClapArgs;
use console::style;
use study_aid_core::domain::{DocumentMeta, Summary, UploadedFile};
use tracing::info;

use crate::{error::AppError, render::render_content, state::AppState};

#[derive(ClapArgs)]
pub struct Args {
    /// Document to summarize
    pub path: PathBuf,

    /// Summary title (defaults to the file name without extension)
    #[arg(long)]
    pub title: Option<String>,

    /// Also store the source document together with its summary
    #[arg(long)]
    pub save: bool,
}

pub async fn execute(state: &mut AppState, args: Args) -> Result<(), AppError> {
    let completion = state.completion()?;
    let bytes = tokio::fs::read(&args.path).await?;
    let file_name = args
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = UploadedFile {
        file_name: file_name.clone(),
        content_type: None,
        bytes,
    };

    let text = state.extractor.extract_text(&file).await?;
    if text.trim().is_empty() {
        return Err(AppError::Internal(format!("No text found in {}.", file_name)));
    }
    info!("Extracted {} characters from {}.", text.len(), file_name);

    println!("{}", style("Summarizing...").dim());
    let summary_text = completion.generate_summary(&text).await?;
    let title = args.title.unwrap_or_else(|| {
        args.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone())
    });

    let user_key = state.user_key();
    let summary = Summary::new(title.clone(), text.clone(), summary_text.clone());
    let summaries = state.store.add_summary(&user_key, &summary).await?;

    if args.save {
        let document = DocumentMeta {
            filename: Some(file_name.clone()),
            mimetype: file.kind().map(|kind| kind.content_type().to_string()),
            size: Some(file.bytes.len() as u64),
            text,
        };
        let saved = state
            .store
            .save_summary_artifact(&user_key, &document, &title, &summary_text)
            .await?;
        println!(
            "{} Saved document {} with note {}.",
            style("✓").green(),
            saved.document_id,
            saved.note_id
        );
    }

    println!("{}\n", style(&title).bold());
    println!("{}", render_content(&summary_text));
    println!(
        "\n{} Summary stored ({} in total).",
        style("✓").green(),
        summaries.len()
    );
    Ok(())
}
