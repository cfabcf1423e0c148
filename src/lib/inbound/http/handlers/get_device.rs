use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::device::models::device::DeviceId;
use crate::domain::device::ports::DeviceService;
use crate::inbound::http::AppState;
use crate::inbound::http::handlers::DevicePath;
use crate::inbound::http::responses::{ApiError, ApiSuccess, DeviceResponseData};

pub async fn get_device<DS: DeviceService>(
    DevicePath(id): DevicePath<i64>,
    State(state): State<AppState<DS>>,
) -> Result<ApiSuccess<DeviceResponseData>, ApiError> {
    tracing::debug!("fetching device {}", id);

    state
        .device_service
        .get_device(&DeviceId::new(id))
        .await
        .map_err(ApiError::from)
        .map(|ref device| ApiSuccess::new(StatusCode::OK, device.into()))
}
