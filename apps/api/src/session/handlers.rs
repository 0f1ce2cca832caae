//! Axum route handlers for sessions and document uploads.

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentKind, MAX_UPLOAD_BYTES};
use crate::session::SessionContext;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub context: SessionContext,
}

/// Reports what was stored. `extracted: false` means the document could not
/// be read and empty text was stored in its place.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub kind: DocumentKind,
    pub chars: usize,
    pub extracted: bool,
    pub reason: Option<String>,
}

struct Upload {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create();
    info!("Session {session_id} created");
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let context = load_session(&state, id)?;
    Ok(Json(SessionSnapshot {
        session_id: id,
        context,
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id) {
        return Err(session_not_found(id));
    }
    info!("Session {id} ended");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/cv
///
/// Multipart field `file`: the CV as PDF.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    load_session(&state, id)?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => upload = Some(read_upload(field).await?),
            _ => drain(field).await?,
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("Missing multipart field 'file'".to_string()))?;
    let kind = detect_kind(&upload, &[DocumentKind::Pdf])?;

    let (text, response) = extract_for_session(kind, upload.data).await;
    store(&state, id, |ctx| ctx.set_cv_text(text))?;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/jd
///
/// Multipart field `file` (TXT or DOCX) and/or `text` (pasted). A file takes
/// precedence over pasted text sent in the same request.
pub async fn handle_upload_jd(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    load_session(&state, id)?;

    let mut upload = None;
    let mut pasted = None;
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let candidate = read_upload(field).await?;
                // Browsers send an empty part when no file was chosen.
                if !candidate.data.is_empty() {
                    upload = Some(candidate);
                }
            }
            "text" => pasted = Some(field.text().await?),
            _ => drain(field).await?,
        }
    }

    let (text, response) = match (upload, pasted) {
        (Some(upload), _) => {
            let kind = detect_kind(&upload, &[DocumentKind::Text, DocumentKind::Docx])?;
            extract_for_session(kind, upload.data).await
        }
        (None, Some(pasted)) if !pasted.trim().is_empty() => {
            let response = UploadResponse {
                kind: DocumentKind::Text,
                chars: pasted.chars().count(),
                extracted: true,
                reason: None,
            };
            (pasted, response)
        }
        _ => {
            return Err(AppError::Validation(
                "Provide a job description file or paste its text".to_string(),
            ))
        }
    };

    store(&state, id, |ctx| ctx.set_jd_text(text))?;
    Ok(Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn load_session(state: &AppState, id: Uuid) -> Result<SessionContext, AppError> {
    state.sessions.get(id).ok_or_else(|| session_not_found(id))
}

pub(crate) fn store<F, T>(state: &AppState, id: Uuid, f: F) -> Result<T, AppError>
where
    F: FnOnce(&mut SessionContext) -> T,
{
    state
        .sessions
        .update(id, f)
        .ok_or_else(|| session_not_found(id))
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found or expired"))
}

async fn read_upload(field: Field<'_>) -> Result<Upload, AppError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let data = field.bytes().await?;

    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large. Maximum size is {} MiB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    Ok(Upload {
        file_name,
        content_type,
        data,
    })
}

async fn drain(field: Field<'_>) -> Result<(), AppError> {
    field.bytes().await?;
    Ok(())
}

fn detect_kind(upload: &Upload, allowed: &[DocumentKind]) -> Result<DocumentKind, AppError> {
    DocumentKind::detect(upload.file_name.as_deref(), upload.content_type.as_deref())
        .filter(|kind| allowed.contains(kind))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Unsupported file type for '{}'. Allowed: {}",
                upload.file_name.as_deref().unwrap_or("upload"),
                allowed
                    .iter()
                    .map(|k| format!("{k:?}").to_uppercase())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
}

/// Extraction failures are not errors here: the session gets empty text and
/// the response says why.
async fn extract_for_session(kind: DocumentKind, data: Bytes) -> (String, UploadResponse) {
    match extract_text(kind, data).await {
        Ok(text) => {
            let response = UploadResponse {
                kind,
                chars: text.chars().count(),
                extracted: true,
                reason: None,
            };
            (text, response)
        }
        Err(e) => {
            warn!("{kind:?} extraction failed, storing empty text: {e}");
            let response = UploadResponse {
                kind,
                chars: 0,
                extracted: false,
                reason: Some(e.to_string()),
            };
            (String::new(), response)
        }
    }
}
