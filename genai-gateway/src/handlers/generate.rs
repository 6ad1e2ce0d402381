use crate::dtos::{GenerateResponse, GenerateTextRequest};
use crate::models::GenerationRequest;
use crate::services::{extract, payload};
use crate::startup::AppState;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use metrics::counter;
use service_core::error::AppError;

/// Which binary input an upload endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Document,
    Audio,
}

impl UploadKind {
    /// Multipart field carrying the file.
    pub fn field_name(self) -> &'static str {
        match self {
            UploadKind::Image => "image",
            UploadKind::Document => "document",
            UploadKind::Audio => "audio",
        }
    }

    fn missing_message(self) -> &'static str {
        match self {
            UploadKind::Image => "Image file is required.",
            UploadKind::Document => "Document file is required.",
            UploadKind::Audio => "Audio file is required.",
        }
    }

    fn endpoint(self) -> &'static str {
        match self {
            UploadKind::Image => "generate-from-image",
            UploadKind::Document => "generate-from-document",
            UploadKind::Audio => "generate-from-audio",
        }
    }
}

/// A file read from a multipart body.
struct Upload {
    data: Vec<u8>,
    mime_type: String,
    file_name: String,
}

/// File and optional prompt collected from one multipart body.
#[derive(Default)]
struct UploadForm {
    upload: Option<Upload>,
    prompt: Option<String>,
}

pub async fn generate_text(
    State(state): State<AppState>,
    payload: Result<Json<GenerateTextRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    const ENDPOINT: &str = "generate-text";

    // Malformed or non-JSON bodies carry no prompt either.
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            counter!("genai_requests_total", "endpoint" => ENDPOINT, "outcome" => "invalid")
                .increment(1);
            return Err(AppError::PayloadTooLarge(anyhow::anyhow!(rejection.body_text())));
        }
        Err(_) => GenerateTextRequest::default(),
    };
    let Some(prompt) = body.prompt() else {
        return Err(invalid(ENDPOINT, "Prompt is required."));
    };

    run_generation(&state, ENDPOINT, GenerationRequest::from_prompt(prompt)).await
}

pub async fn generate_from_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    generate_from_upload(&state, multipart, UploadKind::Image).await
}

pub async fn generate_from_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    generate_from_upload(&state, multipart, UploadKind::Document).await
}

pub async fn generate_from_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    generate_from_upload(&state, multipart, UploadKind::Audio).await
}

async fn generate_from_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    kind: UploadKind,
) -> Result<Json<GenerateResponse>, AppError> {
    let endpoint = kind.endpoint();

    // A body that is not multipart at all simply carries no file.
    let form = match multipart {
        Ok(multipart) => read_upload_form(multipart, kind.field_name())
            .await
            .map_err(|e| {
                counter!("genai_requests_total", "endpoint" => endpoint, "outcome" => "invalid")
                    .increment(1);
                e
            })?,
        Err(_) => UploadForm::default(),
    };

    let Some(upload) = form.upload else {
        return Err(invalid(endpoint, kind.missing_message()));
    };

    tracing::info!(
        endpoint,
        file_name = %upload.file_name,
        mime_type = %upload.mime_type,
        size = upload.data.len(),
        has_prompt = form.prompt.as_deref().is_some_and(|p| !p.is_empty()),
        "Received upload"
    );

    let binary = payload::build(&upload.data, &upload.mime_type);
    let request = payload::compose(form.prompt.as_deref(), binary);

    run_generation(state, endpoint, request).await
}

/// One upstream call, then text extraction.
async fn run_generation(
    state: &AppState,
    endpoint: &'static str,
    request: GenerationRequest,
) -> Result<Json<GenerateResponse>, AppError> {
    let response = state.provider.generate(&request).await.map_err(|e| {
        tracing::error!(
            endpoint,
            model = %state.provider.model(),
            kind = e.kind(),
            error = %e,
            "AI generation failed"
        );
        counter!("genai_requests_total", "endpoint" => endpoint, "outcome" => "upstream_error")
            .increment(1);
        AppError::UpstreamError(e.to_string())
    })?;

    let generated_text = extract(&response).into_text();

    counter!("genai_requests_total", "endpoint" => endpoint, "outcome" => "success").increment(1);

    Ok(Json(GenerateResponse { generated_text }))
}

fn invalid(endpoint: &'static str, message: &'static str) -> AppError {
    tracing::debug!(endpoint, message, "Rejected request");
    counter!("genai_requests_total", "endpoint" => endpoint, "outcome" => "invalid").increment(1);
    AppError::BadRequest(anyhow::anyhow!(message))
}

/// Read every field of the form. Only `file_field` may carry a file, and only once;
/// text fields other than `prompt` are ignored.
async fn read_upload_form(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                if name != file_field || form.upload.is_some() {
                    return Err(AppError::BadRequest(anyhow::anyhow!(
                        "Unexpected file field: {}",
                        name
                    )));
                }

                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?.to_vec();

                form.upload = Some(Upload {
                    data,
                    mime_type,
                    file_name,
                });
            }
            None if name == "prompt" => {
                form.prompt = Some(field.text().await.map_err(multipart_error)?);
            }
            None => {}
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(anyhow::anyhow!(err.body_text()))
    } else {
        AppError::BadRequest(anyhow::anyhow!(
            "Failed to read multipart body: {}",
            err.body_text()
        ))
    }
}
