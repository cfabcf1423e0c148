use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::device::models::device::DeviceId;
use crate::domain::device::ports::DeviceService;
use crate::inbound::http::AppState;
use crate::inbound::http::handlers::DevicePath;
use crate::inbound::http::responses::ApiError;

/// Responds `204 No Content` with an empty body on success.
pub async fn delete_device<DS: DeviceService>(
    DevicePath(id): DevicePath<i64>,
    State(state): State<AppState<DS>>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("deleting device {}", id);

    state
        .device_service
        .delete_device(&DeviceId::new(id))
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
