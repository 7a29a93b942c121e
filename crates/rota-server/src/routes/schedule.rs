use axum::extract::State;
use axum::Json;
use rota_core::types::ScheduleEntry;

use crate::error::AppError;
use crate::state::AppState;

/// GET /schedule — current assignments with student and area names.
pub async fn get_schedule(
    State(app): State<AppState>,
) -> Result<Json<Vec<ScheduleEntry>>, AppError> {
    let rotator = app.rotator.clone();
    let entries = tokio::task::spawn_blocking(move || rotator.store().schedule())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(entries))
}
