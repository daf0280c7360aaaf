//! Interview report: every question with its answer, score and feedback, plus the summary.
//! Built on demand from a session and never stored.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::session::aggregator::SessionSummary;
use crate::session::models::{InterviewSession, QuestionSource};

pub const REPORT_FILE_NAME: &str = "Interview_Report.txt";

const NOT_ANSWERED: &str = "(not answered)";

#[derive(Debug, Clone, Serialize)]
pub struct ReportItem {
    pub index: usize,
    pub question: String,
    pub answer: Option<String>,
    pub score: Option<u8>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewReport {
    pub session_id: Uuid,
    pub role: String,
    pub round: String,
    pub source: QuestionSource,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<ReportItem>,
    pub summary: Option<SessionSummary>,
    pub final_feedback: String,
}

impl InterviewReport {
    pub fn from_session(session: &InterviewSession) -> Self {
        let (role, round) = match &session.source {
            QuestionSource::Role { role, round } => (role.clone(), round.to_string()),
            QuestionSource::Resume { file_name, .. } => {
                (format!("Resume: {file_name}"), "Resume-based".to_string())
            }
        };

        let items = session
            .questions()
            .iter()
            .zip(session.answers())
            .zip(session.evaluations())
            .enumerate()
            .map(|(i, ((question, answer), evaluation))| ReportItem {
                index: i + 1,
                question: question.clone(),
                answer: answer.clone(),
                score: evaluation.as_ref().map(|e| e.score),
                feedback: evaluation.as_ref().map(|e| e.render()),
            })
            .collect();

        let aggregator = session.aggregator();
        InterviewReport {
            session_id: session.id,
            role,
            round,
            source: session.source.clone(),
            generated_at: Utc::now(),
            items,
            summary: aggregator.summary(),
            final_feedback: aggregator.final_feedback(),
        }
    }

    /// Plain-text document for download.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "INTERVIEW REPORT\n\
             ================\n\
             Role: {}\n\
             Round: {}\n\
             Generated: {}\n",
            self.role,
            self.round,
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        );

        for item in &self.items {
            let outcome = match (item.score, &item.feedback) {
                (Some(_), Some(feedback)) => feedback.as_str(),
                _ => "Score: -",
            };
            out.push_str(&format!(
                "\nQ{}: {}\nAnswer: {}\n{}\n",
                item.index,
                item.question,
                item.answer.as_deref().unwrap_or(NOT_ANSWERED),
                outcome
            ));
        }

        out.push_str("\nSUMMARY\n-------\n");
        out.push_str(&self.final_feedback);
        out.push('\n');
        out
    }
}
