//! Doctor dashboard endpoint.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth::SessionUser;
use crate::db::repository;
use crate::models::{ReportWithPatient, Role};

#[derive(Serialize)]
pub struct DashboardResponse {
    pub reports: Vec<ReportWithPatient>,
}

/// `GET /api/dashboard/reports` — every patient submission, newest first,
/// with the submitting patient's name and email joined in. Doctor only.
pub async fn list_all(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionUser>,
) -> Result<Json<DashboardResponse>, ApiError> {
    if session.role != Role::Doctor {
        return Err(ApiError::Forbidden);
    }

    let conn = ctx.open_db()?;
    let reports = repository::list_reports_with_patients(&conn)?;
    Ok(Json(DashboardResponse { reports }))
}
