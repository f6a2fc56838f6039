use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{FileLoader, LlmClient, TextSplitter};
use crate::application::services::{SummaryOutcome, SummaryRequest, UploadedFile};
use crate::domain::{Conciseness, ContentType, Document, PromptStyle, SummaryStrategy};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

pub const FILE_FIELD: &str = "file";
pub const TEXT_FIELD: &str = "text";
pub const CONCISENESS_FIELD: &str = "conciseness";

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub strategy: Option<SummaryStrategy>,
    pub style: Option<PromptStyle>,
    pub chunk_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Rejection produced while reading the submitted form.
#[derive(Debug)]
struct FormError {
    status: StatusCode,
    message: String,
}

impl FormError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn multipart(e: MultipartError) -> Self {
        Self {
            status: e.status(),
            message: format!("Failed to read multipart: {}", e.body_text()),
        }
    }
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[tracing::instrument(skip(state, multipart))]
pub async fn summarize_handler<F, L, T>(
    State(state): State<AppState<F, L, T>>,
    multipart: Multipart,
) -> Response
where
    F: FileLoader + 'static,
    L: LlmClient + 'static,
    T: TextSplitter + 'static + ?Sized,
{
    let request = match read_form(multipart).await {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(status = %e.status, error = %e.message, "Rejected summarize form");
            return e.into_response();
        }
    };

    match state.summarization_service.summarize(request).await {
        Ok(SummaryOutcome::Summarized(summary)) => {
            tracing::info!(
                strategy = summary.strategy.as_str(),
                style = summary.style.as_str(),
                chunk_count = summary.chunk_count,
                summary_chars = summary.text.chars().count(),
                "Summary generated"
            );
            (
                StatusCode::OK,
                Json(SummarizeResponse {
                    summary: summary.text,
                    strategy: Some(summary.strategy),
                    style: Some(summary.style),
                    chunk_count: summary.chunk_count,
                }),
            )
                .into_response()
        }
        Ok(outcome @ SummaryOutcome::MissingInput) => (
            StatusCode::OK,
            Json(SummarizeResponse {
                summary: outcome.text().to_string(),
                strategy: None,
                style: None,
                chunk_count: 0,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Summarization failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Summarization failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}

async fn read_form(mut multipart: Multipart) -> Result<SummaryRequest, FormError> {
    let mut request = SummaryRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(FormError::multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => request.file = read_file(field).await?,
            Some(TEXT_FIELD) => {
                let text = field.text().await.map_err(FormError::multipart)?;
                tracing::debug!(text = %sanitize_prompt(&text), "Text field received");
                request.text = Some(text);
            }
            Some(CONCISENESS_FIELD) => {
                let raw = field.text().await.map_err(FormError::multipart)?;
                request.conciseness = parse_conciseness(&raw)?;
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown form field");
            }
        }
    }

    Ok(request)
}

/// An empty file part is what browsers send when nothing was selected.
async fn read_file(field: Field<'_>) -> Result<Option<UploadedFile>, FormError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let mime = field.content_type().map(str::to_string);
    let data = field.bytes().await.map_err(FormError::multipart)?;

    if data.is_empty() && filename.is_empty() {
        return Ok(None);
    }

    let content_type = ContentType::from_upload(mime.as_deref(), &filename).ok_or_else(|| {
        FormError {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: format!(
                "Unsupported content type: {}",
                mime.as_deref().unwrap_or("unknown")
            ),
        }
    })?;

    tracing::debug!(filename = %filename, bytes = data.len(), "File data received");

    let document = Document::new(filename, content_type, data.len() as u64);
    Ok(Some(UploadedFile {
        document,
        data: data.to_vec(),
    }))
}

fn parse_conciseness(raw: &str) -> Result<Conciseness, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Conciseness::default());
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| FormError::bad_request(format!("Invalid conciseness: {trimmed}")))?;

    Conciseness::new(value).map_err(|e| FormError::bad_request(e.to_string()))
}
