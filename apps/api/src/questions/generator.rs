//! Question Generator: builds role- or resume-based prompts and turns the model's
//! line-oriented reply into a clean, deduplicated list of at most 5 questions.
//!
//! Fewer than 5 questions is accepted silently. Transport failures propagate;
//! a reply with no usable lines simply yields an empty list.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::extraction::chunker::{chunk_words, DEFAULT_CHUNK_WORDS};
use crate::extraction::ResumeFormat;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{CompletionModel, LlmError};
use crate::questions::prompts::{
    RESUME_CHUNK_PROMPT, RESUME_QUESTIONS_PROMPT, ROLE_QUESTIONS_PROMPT,
};

pub const MAX_QUESTIONS: usize = 5;
/// Only the leading chunks of a long resume are used.
pub const MAX_RESUME_CHUNKS: usize = 3;
/// Trimmed resume text shorter than this is treated as unreadable.
pub const MIN_RESUME_CHARS: usize = 20;

pub const UNREADABLE_RESUME_MESSAGE: &str =
    "Could not read enough text from the resume. Please upload a clearer image or a text-based PDF.";
pub const UNSUPPORTED_FORMAT_MESSAGE: &str =
    "Unsupported resume format. Please upload a PDF or an image (JPG, PNG, TIFF, BMP).";

/// Interview category shaping question style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewRound {
    #[default]
    Technical,
    Behavioral,
    Hr,
}

impl fmt::Display for InterviewRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InterviewRound::Technical => "Technical",
            InterviewRound::Behavioral => "Behavioral",
            InterviewRound::Hr => "HR",
        };
        f.write_str(label)
    }
}

/// How resume text is turned into prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeStrategy {
    /// The whole text in a single prompt.
    Whole,
    /// Up to `MAX_RESUME_CHUNKS` word chunks, one prompt each, stopping at 5 unique questions.
    #[default]
    Chunked,
}

/// Result of resume-based generation. The non-`Generated` variants carry a fixed
/// user-facing message instead of raising.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeQuestions {
    Generated(Vec<String>),
    Unreadable,
    UnsupportedFormat,
}

impl ResumeQuestions {
    pub fn sentinel(&self) -> Option<&'static str> {
        match self {
            ResumeQuestions::Generated(_) => None,
            ResumeQuestions::Unreadable => Some(UNREADABLE_RESUME_MESSAGE),
            ResumeQuestions::UnsupportedFormat => Some(UNSUPPORTED_FORMAT_MESSAGE),
        }
    }
}

/// Generates up to 5 questions for a role and round.
pub async fn generate_role_questions(
    model: &dyn CompletionModel,
    role: &str,
    round: InterviewRound,
) -> Result<Vec<String>, LlmError> {
    let round_label = round.to_string();
    let prompt = fill_template(
        ROLE_QUESTIONS_PROMPT,
        &[("round", round_label.as_str()), ("role", role.trim())],
    );

    let reply = model.complete(&prompt).await?;
    let questions: Vec<String> = parse_question_lines(&reply)
        .into_iter()
        .take(MAX_QUESTIONS)
        .collect();

    info!(
        "Generated {} {} questions for role '{}'",
        questions.len(),
        round,
        role.trim()
    );
    Ok(questions)
}

/// Generates up to 5 questions grounded in a resume's extracted text.
///
/// Unsupported formats and unreadable text short-circuit before any model call.
pub async fn generate_resume_questions(
    model: &dyn CompletionModel,
    format: ResumeFormat,
    resume_text: &str,
    strategy: ResumeStrategy,
) -> Result<ResumeQuestions, LlmError> {
    if format == ResumeFormat::Unsupported {
        return Ok(ResumeQuestions::UnsupportedFormat);
    }

    let text = resume_text.trim();
    if text.chars().count() < MIN_RESUME_CHARS {
        info!(
            "Resume text too short ({} chars), skipping generation",
            text.chars().count()
        );
        return Ok(ResumeQuestions::Unreadable);
    }

    let questions = match strategy {
        ResumeStrategy::Whole => {
            let prompt = fill_template(RESUME_QUESTIONS_PROMPT, &[("resume_text", text)]);
            let reply = model.complete(&prompt).await?;
            dedup_capped(parse_question_lines(&reply))
        }
        ResumeStrategy::Chunked => generate_from_chunks(model, text).await?,
    };

    info!("Generated {} resume questions ({:?})", questions.len(), strategy);
    Ok(ResumeQuestions::Generated(questions))
}

async fn generate_from_chunks(
    model: &dyn CompletionModel,
    text: &str,
) -> Result<Vec<String>, LlmError> {
    let mut seen = HashSet::new();
    let mut questions = Vec::new();

    for (i, chunk) in chunk_words(text, DEFAULT_CHUNK_WORDS)
        .iter()
        .take(MAX_RESUME_CHUNKS)
        .enumerate()
    {
        let prompt = fill_template(RESUME_CHUNK_PROMPT, &[("chunk", chunk)]);
        let reply = model.complete(&prompt).await?;

        for question in parse_question_lines(&reply) {
            if seen.insert(question.clone()) {
                questions.push(question);
            }
            if questions.len() >= MAX_QUESTIONS {
                debug!("Collected {MAX_QUESTIONS} questions after chunk {}", i + 1);
                return Ok(questions);
            }
        }
    }

    Ok(questions)
}

fn dedup_capped(lines: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .filter(|q| seen.insert(q.clone()))
        .take(MAX_QUESTIONS)
        .collect()
}

/// Splits a model reply into question lines: trimmed, list markers removed, blanks dropped.
pub fn parse_question_lines(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Removes a leading list marker the model added despite being told not to:
/// `-`, `*`, `•`, `1.`, `2)`, `3:`, `Q4.`, `Question 5:`.
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();

    for bullet in ['-', '*', '•'] {
        if let Some(rest) = line.strip_prefix(bullet) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }

    let numbered = line
        .strip_prefix("Question ")
        .or_else(|| line.strip_prefix('Q'))
        .unwrap_or(line);
    let digits = numbered.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = numbered[digits..].strip_prefix(['.', ')', ':']) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    const RESUME: &str = "Backend engineer with six years building payment APIs in Rust and Go. \
        Led migration from a monolith to microservices on Kubernetes.";

    #[test]
    fn test_parse_drops_blank_lines_and_trims() {
        let reply = "\n  What is a mutex?  \n\n\nExplain CAP theorem.\n   \n";
        assert_eq!(
            parse_question_lines(reply),
            vec!["What is a mutex?", "Explain CAP theorem."]
        );
    }

    #[test]
    fn test_parse_strips_list_markers() {
        let reply = "1. What is Rust?\n2) Why async?\n- Explain ownership.\n* What is a trait?\n• Describe lifetimes.\nQ6: What is Send?\nQuestion 7. What is Sync?";
        assert_eq!(
            parse_question_lines(reply),
            vec![
                "What is Rust?",
                "Why async?",
                "Explain ownership.",
                "What is a trait?",
                "Describe lifetimes.",
                "What is Send?",
                "What is Sync?",
            ]
        );
    }

    #[test]
    fn test_parse_keeps_leading_numbers_that_are_content() {
        let reply = "3.5 years of Go: what did you build?\n2024 goals?\nQuantify your impact.";
        assert_eq!(
            parse_question_lines(reply),
            vec![
                "3.5 years of Go: what did you build?",
                "2024 goals?",
                "Quantify your impact."
            ]
        );
    }

    #[test]
    fn test_parse_drops_marker_only_lines() {
        assert_eq!(parse_question_lines("1.\n-\nWhat next?"), vec!["What next?"]);
    }

    #[test]
    fn test_round_display_labels() {
        assert_eq!(InterviewRound::Technical.to_string(), "Technical");
        assert_eq!(InterviewRound::Behavioral.to_string(), "Behavioral");
        assert_eq!(InterviewRound::Hr.to_string(), "HR");
    }

    #[test]
    fn test_round_serde_snake_case() {
        let round: InterviewRound = serde_json::from_str(r#""hr""#).unwrap();
        assert_eq!(round, InterviewRound::Hr);
    }

    #[tokio::test]
    async fn test_role_questions_capped_at_five() {
        let model = ScriptedModel::new(["Q a?\nQ b?\nQ c?\nQ d?\nQ e?\nQ f?\nQ g?"]);
        let questions = generate_role_questions(&model, "Backend Engineer", InterviewRound::Technical)
            .await
            .unwrap();
        assert_eq!(questions.len(), MAX_QUESTIONS);
        assert_eq!(questions[0], "Q a?");
    }

    #[tokio::test]
    async fn test_role_questions_fewer_than_five_accepted() {
        let model = ScriptedModel::new(["Only one question?\n\n"]);
        let questions = generate_role_questions(&model, "Designer", InterviewRound::Hr)
            .await
            .unwrap();
        assert_eq!(questions, vec!["Only one question?"]);
    }

    #[tokio::test]
    async fn test_role_prompt_names_round_and_role() {
        let model = ScriptedModel::new(["Why?"]);
        generate_role_questions(&model, "  Data Scientist ", InterviewRound::Behavioral)
            .await
            .unwrap();
        let prompt = &model.prompts()[0];
        assert!(prompt.contains("5 Behavioral interview questions"));
        assert!(prompt.contains("for the role of Data Scientist."));
    }

    #[tokio::test]
    async fn test_role_questions_propagate_transport_error() {
        let model = ScriptedModel::failing();
        let result = generate_role_questions(&model, "SRE", InterviewRound::Technical).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_short_resume_is_unreadable_without_model_call() {
        let model = ScriptedModel::new(["should not be used"]);
        let outcome = generate_resume_questions(
            &model,
            ResumeFormat::Pdf,
            "   John Doe  \n ",
            ResumeStrategy::Chunked,
        )
        .await
        .unwrap();

        assert_eq!(outcome, ResumeQuestions::Unreadable);
        assert_eq!(outcome.sentinel(), Some(UNREADABLE_RESUME_MESSAGE));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_resume_threshold_counts_characters_not_bytes() {
        // 19 characters, 38 bytes.
        let accented = "é".repeat(MIN_RESUME_CHARS - 1);
        let model = ScriptedModel::new(["Tell me about your accents?"]);
        let outcome = generate_resume_questions(&model, ResumeFormat::Image, &accented, ResumeStrategy::Whole)
            .await
            .unwrap();
        assert_eq!(outcome, ResumeQuestions::Unreadable);
        assert_eq!(model.call_count(), 0);

        let enough = "é".repeat(MIN_RESUME_CHARS);
        let outcome = generate_resume_questions(&model, ResumeFormat::Image, &enough, ResumeStrategy::Whole)
            .await
            .unwrap();
        assert!(matches!(outcome, ResumeQuestions::Generated(ref q) if q.len() == 1));
    }

    #[tokio::test]
    async fn test_unsupported_format_sentinel_without_model_call() {
        let model = ScriptedModel::new(["should not be used"]);
        let outcome = generate_resume_questions(
            &model,
            ResumeFormat::Unsupported,
            RESUME,
            ResumeStrategy::Whole,
        )
        .await
        .unwrap();

        assert_eq!(outcome.sentinel(), Some(UNSUPPORTED_FORMAT_MESSAGE));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_whole_resume_single_prompt_deduplicated() {
        let model = ScriptedModel::new(["Tell me about the migration.\nTell me about the migration.\nWhy Rust?"]);
        let outcome =
            generate_resume_questions(&model, ResumeFormat::Image, RESUME, ResumeStrategy::Whole)
                .await
                .unwrap();

        assert_eq!(
            outcome,
            ResumeQuestions::Generated(vec![
                "Tell me about the migration.".to_string(),
                "Why Rust?".to_string()
            ])
        );
        assert_eq!(model.call_count(), 1);
        assert!(model.prompts()[0].contains("payment APIs"));
    }

    #[tokio::test]
    async fn test_chunked_stops_early_at_five_unique() {
        // 450 words → 3 chunks of 200/200/50; the second reply completes the set.
        let long_resume = vec!["kubernetes"; 450].join(" ");
        let model = ScriptedModel::new([
            "A?\nB?\nC?",
            "B?\nD?\nE?\nF?",
            "never requested",
        ]);

        let outcome = generate_resume_questions(
            &model,
            ResumeFormat::Pdf,
            &long_resume,
            ResumeStrategy::Chunked,
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            ResumeQuestions::Generated(
                ["A?", "B?", "C?", "D?", "E?"].iter().map(|s| s.to_string()).collect()
            )
        );
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_chunked_uses_at_most_three_chunks() {
        let long_resume = vec!["rust"; 1000].join(" "); // 5 chunks
        let model = ScriptedModel::new(["A?", "A?", "B?", "C?", "D?"]);

        let outcome = generate_resume_questions(
            &model,
            ResumeFormat::Pdf,
            &long_resume,
            ResumeStrategy::Chunked,
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            ResumeQuestions::Generated(vec!["A?".to_string(), "B?".to_string()])
        );
        assert_eq!(model.call_count(), MAX_RESUME_CHUNKS);
        assert!(model.prompts().iter().all(|p| p.contains("RESUME SECTION:")));
    }
}
