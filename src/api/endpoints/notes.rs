//! Doctor note endpoints.
//!
//! `POST /api/reports/:id/notes` — Protected, doctor only: attach a note
//! `GET /api/reports/:id/notes` — Protected, doctor only: list a report's notes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth::SessionUser;
use crate::db::repository;
use crate::models::{DoctorNote, NoteWithDoctor, Role};

#[derive(Deserialize)]
pub struct AddNoteRequest {
    pub notes: String,
}

#[derive(Serialize)]
pub struct NotesResponse {
    pub notes: Vec<NoteWithDoctor>,
}

/// `POST /api/reports/:id/notes` — attach a note to a patient report.
///
/// Blank note text is rejected; a note on a nonexistent report is a 404.
pub async fn add(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionUser>,
    Path(report_id): Path<Uuid>,
    Json(request): Json<AddNoteRequest>,
) -> Result<Response, ApiError> {
    if session.role != Role::Doctor {
        return Err(ApiError::Forbidden);
    }
    if request.notes.trim().is_empty() {
        return Err(ApiError::BadRequest("Note text is required".into()));
    }

    let conn = ctx.open_db()?;
    if repository::get_report(&conn, &report_id)?.is_none() {
        return Err(ApiError::NotFound("Report not found".into()));
    }

    let note = DoctorNote {
        id: Uuid::new_v4(),
        report_id,
        doctor_id: session.user_id,
        notes: request.notes,
        created_at: Utc::now(),
    };
    repository::insert_note(&conn, &note)?;

    tracing::info!(report_id = %report_id, "Doctor note added");

    let body = NoteWithDoctor {
        note,
        doctor_name: session.full_name,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// `GET /api/reports/:id/notes` — a report's notes, newest first.
pub async fn list_for_report(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionUser>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<NotesResponse>, ApiError> {
    if session.role != Role::Doctor {
        return Err(ApiError::Forbidden);
    }

    let conn = ctx.open_db()?;
    if repository::get_report(&conn, &report_id)?.is_none() {
        return Err(ApiError::NotFound("Report not found".into()));
    }

    let notes = repository::list_notes_for_report(&conn, &report_id)?;
    Ok(Json(NotesResponse { notes }))
}
