//! Axum route handlers for the Sessions API.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::tokens::caller;
use crate::errors::AppError;
use crate::evaluation::evaluator::{evaluate_answer, Evaluation};
use crate::questions::generator::{
    generate_resume_questions, generate_role_questions, InterviewRound, ResumeQuestions,
    ResumeStrategy,
};
use crate::session::aggregator::SessionSummary;
use crate::session::models::{InterviewSession, QuestionSource, SessionError, SessionView};
use crate::session::report::{InterviewReport, REPORT_FILE_NAME};
use crate::state::AppState;

const NO_QUESTIONS_MESSAGE: &str =
    "The model did not return any questions. Please try starting the interview again.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum StartSource {
    Role {
        role: String,
        #[serde(default)]
        round: InterviewRound,
    },
    Resume {
        resume_id: Uuid,
        #[serde(default)]
        strategy: ResumeStrategy,
    },
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub evaluation: Evaluation,
    pub feedback_text: String,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub session_id: Uuid,
    pub final_feedback: String,
    pub summary: Option<SessionSummary>,
    pub scores: Vec<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub format: ReportFormat,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Generates questions (role-based or from an uploaded resume) and opens a new session.
/// With a bearer token the session is owned by the logged-in user; without one it is anonymous.
pub async fn handle_start_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<StartSource>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let owner = caller(&state.tokens, &headers).await?;

    let (source, questions) = match request {
        StartSource::Role { role, round } => {
            let role = role.trim().to_string();
            if role.is_empty() {
                return Err(AppError::Validation("Please enter a job role".to_string()));
            }
            let questions = generate_role_questions(state.llm.as_ref(), &role, round)
                .await
                .map_err(|e| AppError::Llm(format!("Question generation failed: {e}")))?;
            (QuestionSource::Role { role, round }, questions)
        }
        StartSource::Resume {
            resume_id,
            strategy,
        } => {
            let document = state
                .resumes
                .get(resume_id)
                .await
                .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

            let outcome = generate_resume_questions(
                state.llm.as_ref(),
                document.format,
                &document.text,
                strategy,
            )
            .await
            .map_err(|e| AppError::Llm(format!("Resume question generation failed: {e}")))?;

            // The document is consumed once generation has produced a definite answer.
            state.resumes.remove(resume_id).await;

            let questions = match outcome {
                ResumeQuestions::Generated(questions) => questions,
                other => {
                    let message = other.sentinel().unwrap_or(NO_QUESTIONS_MESSAGE);
                    return Err(AppError::UnprocessableEntity(message.to_string()));
                }
            };
            (
                QuestionSource::Resume {
                    resume_id,
                    file_name: document.file_name,
                },
                questions,
            )
        }
    };

    if questions.is_empty() {
        return Err(AppError::UnprocessableEntity(NO_QUESTIONS_MESSAGE.to_string()));
    }

    let session = InterviewSession::new(owner, source, questions);
    let view = session.view();
    state.sessions.insert(session).await;

    info!(
        "Started session {} with {} questions",
        view.id, view.total_questions
    );
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = load_session(&state, id).await?;
    Ok(Json(session.view()))
}

/// POST /api/v1/sessions/:id/answers
///
/// Evaluates the answer to the current question, records the score and advances.
/// A model transport failure leaves the session untouched so the user can resubmit.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    if request.answer.trim().is_empty() {
        return Err(AppError::Validation("Please type your answer".to_string()));
    }

    let session = load_session(&state, id).await?;
    let index = session.cursor();
    let question = session
        .current_question()
        .map(String::from)
        .ok_or_else(|| AppError::Conflict(SessionError::Completed.to_string()))?;

    let evaluation = evaluate_answer(state.llm.as_ref(), &question, &request.answer)
        .await
        .map_err(|e| AppError::Llm(format!("Answer evaluation failed: {e}")))?;

    let view = state
        .sessions
        .update(id, |s| {
            s.record_answer(index, request.answer, evaluation.clone())
                .map(|_| s.view())
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    info!(
        "Session {} question {} scored {}/10 ({:?})",
        id,
        index + 1,
        evaluation.score,
        evaluation.outcome
    );

    Ok(Json(SubmitAnswerResponse {
        feedback_text: evaluation.render(),
        evaluation,
        session: view,
    }))
}

/// POST /api/v1/sessions/:id/restart
pub async fn handle_restart_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(id, |s| {
            s.restart();
            s.view()
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/:id/summary
pub async fn handle_session_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>, AppError> {
    let session = load_session(&state, id).await?;
    let aggregator = session.aggregator();
    Ok(Json(SummaryResponse {
        session_id: id,
        final_feedback: aggregator.final_feedback(),
        summary: aggregator.summary(),
        scores: aggregator.scores().to_vec(),
    }))
}

/// GET /api/v1/sessions/:id/report?format=json|text
pub async fn handle_session_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let session = load_session(&state, id).await?;
    let report = InterviewReport::from_session(&session);

    let response = match query.format {
        ReportFormat::Json => Json(report).into_response(),
        ReportFormat::Text => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{REPORT_FILE_NAME}\""),
                ),
            ],
            report.render_text(),
        )
            .into_response(),
    };
    Ok(response)
}

async fn load_session(state: &AppState, id: Uuid) -> Result<InterviewSession, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}
