//! Patient report endpoints.
//!
//! `POST /api/reports` — Protected, patient only: submit a health report
//! `GET /api/reports` — Protected, patient only: list own submissions

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth::SessionUser;
use crate::db::repository;
use crate::models::{HealthReport, Role};
use crate::triage::IntakeFields;
use crate::uploads::store_attachment;

#[derive(Serialize)]
pub struct ReportsResponse {
    pub reports: Vec<HealthReport>,
}

/// `POST /api/reports` — submit a health report as multipart form data.
///
/// Recognized text fields: `age`, `gender`, `symptoms`, `medical_history`,
/// `current_medications`; all optional. An optional `medical_file` part
/// attaches a document. Unknown parts are ignored.
///
/// Triage always completes: if the completion service is missing or fails,
/// the stored report carries a fixed manual-review result instead. A
/// disallowed attachment extension rejects the whole submission before
/// any model call is made.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionUser>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    if session.role != Role::Patient {
        return Err(ApiError::Forbidden);
    }

    let mut fields = IntakeFields::default();
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "age" => fields.age = Some(read_text(field).await?),
            "gender" => fields.gender = Some(read_text(field).await?),
            "symptoms" => fields.symptoms = Some(read_text(field).await?),
            "medical_history" => fields.medical_history = Some(read_text(field).await?),
            "current_medications" => fields.current_medications = Some(read_text(field).await?),
            "medical_file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                if file_name.is_empty() {
                    // Browsers send an empty part when no file was chosen
                    continue;
                }
                let bytes = field.bytes().await.map_err(multipart_error)?;
                upload = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let normalized = fields.normalize();
    let state = ctx.state.clone();
    let patient_id = session.user_id;

    // The triage client is blocking and the model call can take seconds;
    // keep the whole submission pipeline off the async runtime.
    let report = tokio::task::spawn_blocking(move || -> Result<HealthReport, ApiError> {
        // Attachment first: a rejected extension must fail the
        // submission before any model call.
        let stored = match upload {
            Some((name, bytes)) => Some(store_attachment(
                &state.config.upload_dir(),
                &patient_id,
                &name,
                &bytes,
            )?),
            None => None,
        };

        let triage = state.triage.run(&normalized);

        let report = HealthReport {
            id: Uuid::new_v4(),
            patient_id,
            age: fields.age,
            gender: fields.gender,
            symptoms: fields.symptoms,
            medical_history: fields.medical_history,
            current_medications: fields.current_medications,
            file_path: stored.as_ref().map(|s| s.file_path.clone()),
            file_name: stored.map(|s| s.file_name),
            triage,
            submitted_at: Utc::now(),
        };

        let conn = state.open_db()?;
        repository::insert_report(&conn, &report)?;
        Ok(report)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Task failed: {e}")))??;

    tracing::info!(
        report_id = %report.id,
        priority = %report.triage.priority,
        "Report submitted"
    );

    Ok((StatusCode::CREATED, Json(report)).into_response())
}

/// `GET /api/reports` — the calling patient's own reports, newest first.
pub async fn list_mine(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionUser>,
) -> Result<Json<ReportsResponse>, ApiError> {
    if session.role != Role::Patient {
        return Err(ApiError::Forbidden);
    }

    let conn = ctx.open_db()?;
    let reports = repository::list_reports_for_patient(&conn, &session.user_id)?;
    Ok(Json(ReportsResponse { reports }))
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(multipart_error)
}

/// Oversized bodies surface through the multipart reader once the axum
/// body limit trips; keep the 413 instead of flattening it into a 400.
fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::BadRequest(format!("Malformed multipart body: {}", err.body_text()))
    }
}
