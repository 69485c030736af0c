//! Upload routes.
//!
//! Both endpoints accept `multipart/form-data` with a `file` part and a few
//! text fields that name the destination folders. They differ only in the
//! upload profile they pass to the orchestrator.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use stowage_core::credential::SessionProvider;
use stowage_core::upload::{UploadError, UploadRequest, UploadResult};

use crate::{AppState, error::ApiError};

const UPLOAD_FIELDS: &[&str] = &["file", "company", "employee_id", "date"];
const EXTRAS_FIELDS: &[&str] = &["file", "folder_name", "employee_name"];

/// Creates the upload routes.
pub fn routes<P: SessionProvider + 'static>() -> Router<AppState<P>> {
    Router::new()
        .route("/api/upload", post(upload::<P>))
        .route("/api/upload_extras", post(upload_extras::<P>))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Successful upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Fixed confirmation message.
    pub message: &'static str,
    /// Shareable link to the stored file.
    pub data: String,
}

#[derive(Debug)]
struct FilePart {
    file_name: Option<String>,
    content_type: Option<String>,
    content: Bytes,
}

/// Parsed multipart form.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<FilePart>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == "file" {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let content = field.bytes().await?;
                form.file = Some(FilePart {
                    file_name,
                    content_type,
                    content,
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Trimmed text field value, or `None` when absent or blank.
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Names from `required` that are absent or blank.
    fn missing(&self, required: &[&'static str]) -> Vec<&'static str> {
        required
            .iter()
            .copied()
            .filter(|name| match *name {
                "file" => self.file.is_none(),
                other => self.field(other).is_none(),
            })
            .collect()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Upload into `{company}/{employee_id}/{date}` under the `upload` profile.
async fn upload<P: SessionProvider + 'static>(
    State(state): State<AppState<P>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let form = match read_form(multipart, UPLOAD_FIELDS).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let missing = form.missing(UPLOAD_FIELDS);
    if !missing.is_empty() {
        return missing_fields(&missing);
    }

    let path = ["company", "employee_id", "date"]
        .iter()
        .filter_map(|name| form.field(name))
        .map(str::to_string)
        .collect();
    let filename = form.field("filename").map(str::to_string);
    let Some(file) = form.file else {
        return missing_fields(&["file"]);
    };

    let request = UploadRequest {
        path,
        filename: filename.or(file.file_name).unwrap_or_default(),
        identifier: None,
        content_type: file.content_type,
        content: file.content,
    };

    respond(state.uploads.upload(&state.upload_profile, request).await)
}

/// Upload into `{folder_name}/{employee_name}` under the `extras` profile.
async fn upload_extras<P: SessionProvider + 'static>(
    State(state): State<AppState<P>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let form = match read_form(multipart, EXTRAS_FIELDS).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let missing = form.missing(EXTRAS_FIELDS);
    if !missing.is_empty() {
        return missing_fields(&missing);
    }

    let folder_name = form.field("folder_name").unwrap_or_default().to_string();
    let employee_name = form.field("employee_name").unwrap_or_default().to_string();
    let Some(file) = form.file else {
        return missing_fields(&["file"]);
    };

    let request = UploadRequest {
        path: vec![folder_name, employee_name.clone()],
        filename: file.file_name.unwrap_or_default(),
        identifier: Some(employee_name),
        content_type: file.content_type,
        content: file.content,
    };

    respond(state.uploads.upload(&state.extras_profile, request).await)
}

// ============================================================================
// Helpers
// ============================================================================

/// A body that is not a multipart form carries none of the required fields.
async fn read_form(
    multipart: Result<Multipart, MultipartRejection>,
    required: &[&str],
) -> Result<UploadForm, Response> {
    let multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Request body is not a multipart form");
        missing_fields(required)
    })?;

    UploadForm::read(multipart)
        .await
        .map_err(|e| multipart_rejection(&e))
}

fn respond(result: Result<UploadResult, UploadError>) -> Response {
    match result {
        Ok(stored) => (
            StatusCode::OK,
            Json(UploadResponse {
                message: "File uploaded successfully",
                data: stored.link,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(reason = %e.reason, error = %e.message, "Upload failed");
            ApiError::from(e).into_response()
        }
    }
}

fn missing_fields(missing: &[&str]) -> Response {
    ApiError::bad_request(format!("Missing required fields: {}", missing.join(", "))).into_response()
}

fn multipart_rejection(err: &MultipartError) -> Response {
    error!(error = %err.body_text(), "Failed to read multipart body");
    (err.status(), Json(json!({ "error": err.body_text() }))).into_response()
}
