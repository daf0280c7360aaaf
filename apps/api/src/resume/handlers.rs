//! Axum route handlers for the Resume API.

use std::io::Write;
use std::path::Path;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::skills::detect_skills;
use crate::extraction::{ResumeFormat, TextExtractor};
use crate::questions::generator::{
    MIN_RESUME_CHARS, UNREADABLE_RESUME_MESSAGE, UNSUPPORTED_FORMAT_MESSAGE,
};
use crate::resume::ResumeDocument;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub resume_id: Uuid,
    pub file_name: String,
    pub format: ResumeFormat,
    pub characters: usize,
    pub words: usize,
    /// Presentation only. Never used in scoring.
    pub skills: Vec<&'static str>,
    /// Set when too little text was recovered to generate questions.
    pub warning: Option<&'static str>,
}

/// POST /api/v1/resumes (multipart, field `file`)
///
/// Extracts the resume's text and keeps it in memory for a later
/// `POST /api/v1/sessions` with `"source": "resume"`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let (file_name, data) = read_file_field(&mut multipart).await?;

    let format = ResumeFormat::from_file_name(&file_name);
    if format == ResumeFormat::Unsupported {
        info!("Rejected resume upload with unsupported type: {file_name}");
        return Err(AppError::UnprocessableEntity(
            UNSUPPORTED_FORMAT_MESSAGE.to_string(),
        ));
    }

    let extractor = state.extractor.clone();
    let suffix = Path::new(&file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    // Temp-file write and OCR are blocking.
    let text = tokio::task::spawn_blocking(move || extract_upload(&extractor, &suffix, format, &data))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in resume extraction: {e}"))
        })??;

    let trimmed = text.trim();
    let characters = trimmed.chars().count();
    let words = trimmed.split_whitespace().count();
    let skills = detect_skills(trimmed);
    let warning = (characters < MIN_RESUME_CHARS).then_some(UNREADABLE_RESUME_MESSAGE);

    let document = ResumeDocument::new(file_name.clone(), format, text);
    let resume_id = state.resumes.insert(document).await;

    info!(
        "Stored resume {resume_id} ({:?}, {characters} chars, {} skills)",
        format,
        skills.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            resume_id,
            file_name,
            format,
            characters,
            words,
            skills,
            warning,
        }),
    ))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::Validation("Uploaded file has no file name".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        return Ok((file_name, data));
    }

    Err(AppError::Validation(format!(
        "Multipart field '{FILE_FIELD}' is required"
    )))
}

/// Writes the upload to a temp file carrying the original extension, then extracts.
/// The temp file is deleted when this returns.
fn extract_upload(
    extractor: &TextExtractor,
    suffix: &str,
    format: ResumeFormat,
    data: &Bytes,
) -> anyhow::Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(suffix)
        .tempfile()?;
    file.write_all(data)?;
    file.flush()?;
    Ok(extractor.extract(file.path(), format))
}
