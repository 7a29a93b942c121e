use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rota_core::types::RosterKind;
use rota_core::RotaError;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct StudentsBody {
    #[serde(default)]
    pub students: Option<Vec<String>>,
}

#[derive(serde::Deserialize)]
pub struct AreasBody {
    #[serde(default)]
    pub areas: Option<Vec<String>>,
}

/// POST /students — replace the whole roster.
pub async fn replace_students(
    State(app): State<AppState>,
    body: Result<Json<StudentsBody>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let body = parse_body(body, RosterKind::Students)?;
    replace(app, RosterKind::Students, body.students.unwrap_or_default()).await
}

/// POST /areas — replace the whole area catalog.
pub async fn replace_areas(
    State(app): State<AppState>,
    body: Result<Json<AreasBody>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let body = parse_body(body, RosterKind::Areas)?;
    replace(app, RosterKind::Areas, body.areas.unwrap_or_default()).await
}

/// Well-formed JSON of the wrong shape (a string or numbers where the name
/// list belongs) gets the same validation message as a wrong count. Syntax
/// errors and a missing content type keep the extractor's own reason.
fn parse_body<T>(body: Result<Json<T>, JsonRejection>, kind: RosterKind) -> Result<T, AppError> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::JsonDataError(_)) => Err(RotaError::InvalidCount(kind).into()),
        Err(rejection) => Err(AppError::bad_request(rejection.body_text())),
    }
}

async fn replace(app: AppState, kind: RosterKind, names: Vec<String>) -> Result<StatusCode, AppError> {
    let rotator = app.rotator.clone();
    let count = names.len();
    tokio::task::spawn_blocking(move || rotator.store().replace(kind, &names))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    // Current assignments still point at the old ids until the next rotation.
    tracing::warn!(table = %kind, rows = count, "replaced; schedule is stale until next rotation");
    Ok(StatusCode::OK)
}
