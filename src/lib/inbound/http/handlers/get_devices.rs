use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::device::models::device::{Device, DeviceFilters};
use crate::domain::device::ports::DeviceService;
use crate::inbound::http::AppState;
use crate::inbound::http::handlers::DeviceQuery;
use crate::inbound::http::responses::{ApiError, ApiSuccess, DeviceResponseData};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeviceQueryParams {
    brand: Option<String>,
    state: Option<String>,
}

impl From<&DeviceQueryParams> for DeviceFilters {
    fn from(params: &DeviceQueryParams) -> Self {
        DeviceFilters::new(params.brand.as_deref(), params.state.as_deref())
    }
}

fn to_response_data(devices: &[Device]) -> Vec<DeviceResponseData> {
    devices.iter().map(DeviceResponseData::from).collect()
}

pub async fn get_devices<DS: DeviceService>(
    DeviceQuery(params): DeviceQuery<DeviceQueryParams>,
    State(state): State<AppState<DS>>,
) -> Result<ApiSuccess<Vec<DeviceResponseData>>, ApiError> {
    tracing::debug!("fetching devices with {:?}", params);

    state
        .device_service
        .get_devices(&(&params).into())
        .await
        .map_err(ApiError::from)
        .map(|ref devices| ApiSuccess::new(StatusCode::OK, to_response_data(devices)))
}
