use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::device::models::device::{DeviceId, UpdateDeviceRequest};
use crate::domain::device::ports::DeviceService;
use crate::inbound::http::AppState;
use crate::inbound::http::handlers::{
    DeviceHttpRequestBody, DeviceJson, DevicePath, InvalidDeviceRequest,
};
use crate::inbound::http::responses::{ApiError, ApiSuccess, DeviceResponseData};

impl DeviceHttpRequestBody {
    fn try_into_update_domain(
        self,
        route_id: i64,
    ) -> Result<UpdateDeviceRequest, InvalidDeviceRequest> {
        let mut errors = Vec::new();
        if self.id != Some(route_id) {
            errors.push("Route Id and Body Id must be the same".to_string());
        }

        let (name, brand, state) = self.parse_fields(errors)?;

        Ok(UpdateDeviceRequest::new(name, brand, state))
    }
}

pub async fn update_device<DS: DeviceService>(
    DevicePath(id): DevicePath<i64>,
    State(state): State<AppState<DS>>,
    DeviceJson(body): DeviceJson<DeviceHttpRequestBody>,
) -> Result<ApiSuccess<DeviceResponseData>, ApiError> {
    tracing::debug!("updating device {}", id);

    let domain_req = body.try_into_update_domain(id)?;
    state
        .device_service
        .update_device(&DeviceId::new(id), &domain_req)
        .await
        .map_err(ApiError::from)
        .map(|ref device| ApiSuccess::new(StatusCode::OK, device.into()))
}
