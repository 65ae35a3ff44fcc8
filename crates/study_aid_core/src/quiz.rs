//! crates/study_aid_core/src/quiz.rs
//!
//! Quiz questions as produced by the AI collaborator, and the scoring of an attempt.

use serde::{Deserialize, Serialize};

use crate::ports::{PortError, PortResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

/// Parses the model's quiz output.
///
/// The output must be a JSON array of questions, optionally wrapped in a markdown code
/// fence. An empty array is rejected: nothing generated must never look like success.
pub fn parse_quiz(raw: &str) -> PortResult<Vec<QuizQuestion>> {
    let json = strip_code_fence(raw.trim());
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        PortError::MalformedResponse(format!("the AI returned invalid JSON: {}", e))
    })?;
    if !value.is_array() {
        return Err(PortError::MalformedResponse(
            "the AI returned data in an unexpected format".to_string(),
        ));
    }
    let questions: Vec<QuizQuestion> = serde_json::from_value(value).map_err(|e| {
        PortError::MalformedResponse(format!("a quiz question is incomplete: {}", e))
    })?;
    if questions.is_empty() {
        return Err(PortError::MalformedResponse(
            "the AI could not generate a quiz from this content".to_string(),
        ));
    }
    Ok(questions)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (`json`) on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Counts the answers that match the correct option. Unanswered questions score nothing.
pub fn score(questions: &[QuizQuestion], answers: &[Option<String>]) -> u32 {
    questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| answer.as_deref() == Some(question.correct_answer.as_str()))
        .count() as u32
}
