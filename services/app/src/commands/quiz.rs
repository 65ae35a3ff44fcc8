use clap::Args as ClapArgs;
use console::style;
use dialoguer::Select;
use study_aid_core::{
    domain::QuizHistoryEntry,
    quiz::{score, QuizQuestion},
};

use crate::{
    commands::common::{pick_summary, summaries_newest_first},
    error::AppError,
    state::AppState,
};

#[derive(ClapArgs)]
pub struct Args {
    /// Summary to be quizzed on (id, list position or title)
    pub summary: String,
}

pub async fn execute(state: &mut AppState, args: Args) -> Result<(), AppError> {
    let completion = state.completion()?;
    let user_key = state.user_key();
    let summaries = summaries_newest_first(state).await;
    let summary = pick_summary(&summaries, &args.summary)?;

    println!("{}", style("Generating quiz...").dim());
    let questions = completion
        .generate_quiz(&summary.summary_content, &summary.original_content)
        .await?;

    let answers = ask_all(&questions)?;
    let correct = score(&questions, &answers);
    let entry = QuizHistoryEntry::from_attempt(&summary.title, correct, questions.len() as u32)?;

    println!(
        "\n{} {}/{} ({}%)",
        style("Score:").bold(),
        correct,
        questions.len(),
        entry.percentage
    );
    let history = state.store.add_quiz_history(&user_key, &entry).await?;
    println!("{}", style(format!("{} quiz results on record.", history.len())).dim());
    Ok(())
}

/// Asks every question in turn and shows the explanation after each answer.
fn ask_all(questions: &[QuizQuestion]) -> Result<Vec<Option<String>>, AppError> {
    let mut answers = Vec::with_capacity(questions.len());
    for (number, question) in questions.iter().enumerate() {
        println!();
        let choice = Select::new()
            .with_prompt(format!("{}. {}", number + 1, question.question))
            .items(&question.options)
            .default(0)
            .interact_opt()?;
        let answer = choice.and_then(|index| question.options.get(index).cloned());

        if answer.as_deref() == Some(question.correct_answer.as_str()) {
            println!("{}", style("Correct!").green().bold());
        } else {
            println!(
                "{} The answer is: {}",
                style("Incorrect.").red().bold(),
                question.correct_answer
            );
        }
        println!("{}", style(&question.explanation).dim());
        answers.push(answer);
    }
    Ok(answers)
}
