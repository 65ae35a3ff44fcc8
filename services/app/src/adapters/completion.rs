//! services/app/src/adapters/completion.rs
//!
//! This module contains the adapter for the study-assistant LLM.
//! It implements the `CompletionService` port from the `core` crate against any
//! OpenAI-compatible chat endpoint (Gemini's, by default).

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use study_aid_core::{
    ports::{CompletionService, PortError, PortResult},
    quiz::{parse_quiz, QuizQuestion},
};
use tracing::{error, info};

const SUMMARY_TEMPERATURE: f32 = 0.3;
const QUIZ_TEMPERATURE: f32 = 0.4;
const ANSWER_TEMPERATURE: f32 = 0.1;
const CHAT_TEMPERATURE: f32 = 0.6;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiCompletionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompletionAdapter {
    /// Creates a new `OpenAiCompletionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Sends one system + user exchange and returns the text of the first choice.
    async fn complete(&self, system: &str, user: String, temperature: f32) -> PortResult<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(temperature)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| {
                error!("Completion request failed: {}", e);
                PortError::RemoteUnavailable(e.to_string())
            })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(PortError::MalformedResponse(
                "The assistant returned no text content.".to_string(),
            ));
        }
        Ok(content)
    }
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for OpenAiCompletionAdapter {
    async fn generate_summary(&self, text: &str) -> PortResult<String> {
        info!("Generating a summary of {} characters.", text.len());
        self.complete(
            "You summarize study material. Provide a comprehensive yet concise summary that captures the key points, main arguments and any important conclusions. Format it with '##' for main headings, '###' for subheadings and '*' for bullet points, with proper paragraphs. Use '**' only to mark bold words.",
            format!("Text to summarize:\n\n---\n\n{}", text),
            SUMMARY_TEMPERATURE,
        )
        .await
    }

    async fn generate_quiz(
        &self,
        summary_content: &str,
        original_content: &str,
    ) -> PortResult<Vec<QuizQuestion>> {
        let raw = self
            .complete(
                "You write multiple-choice quizzes. Respond with a JSON array only, no prose. Each element is an object with the keys \"question\" (string), \"options\" (array of exactly 4 strings), \"correctAnswer\" (one of the options, verbatim) and \"explanation\" (a brief reason the answer is correct).",
                format!(
                    "Based on the following summary and original text, generate a 5-question multiple-choice quiz to test understanding.\n\nSummary:\n---\n{}\n---\n\nOriginal Content (for context):\n---\n{}\n---",
                    summary_content, original_content
                ),
                QUIZ_TEMPERATURE,
            )
            .await?;
        parse_quiz(&raw)
    }

    async fn answer_from_notes(
        &self,
        question: &str,
        summary_content: &str,
        original_content: &str,
    ) -> PortResult<String> {
        self.complete(
            "You are a helpful study assistant. Answer the user's question based ONLY on the provided \"Summary\" and \"Original Notes\". Do not use any external knowledge. If the answer cannot be found in the provided texts, say \"I cannot find the answer in the provided notes.\" Be brief and to the point.",
            format!(
                "User's Question:\n---\n{}\n---\n\nSummary:\n---\n{}\n---\n\nOriginal Notes:\n---\n{}\n---",
                question, summary_content, original_content
            ),
            ANSWER_TEMPERATURE,
        )
        .await
    }

    async fn chat(&self, question: &str) -> PortResult<String> {
        self.complete(
            "You are a helpful assistant. Answer the user's question conversationally and concisely. Do not hallucinate facts; if unknown, say you don't know.",
            format!("User's Question:\n---\n{}\n---", question),
            CHAT_TEMPERATURE,
        )
        .await
    }
}
