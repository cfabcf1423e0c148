use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::device::models::device::CreateDeviceRequest;
use crate::domain::device::ports::DeviceService;
use crate::inbound::http::AppState;
use crate::inbound::http::handlers::{DeviceHttpRequestBody, DeviceJson, InvalidDeviceRequest};
use crate::inbound::http::responses::{ApiError, ApiSuccess, DeviceResponseData};

impl DeviceHttpRequestBody {
    fn try_into_create_domain(self) -> Result<CreateDeviceRequest, InvalidDeviceRequest> {
        let mut errors = Vec::new();
        if self.id.is_some() {
            errors.push(
                "To create a new device Id must be null. To update a device, use PUT instead."
                    .to_string(),
            );
        }

        let (name, brand, state) = self.parse_fields(errors)?;

        Ok(CreateDeviceRequest::new(name, brand, state))
    }
}

pub async fn create_device<DS: DeviceService>(
    State(state): State<AppState<DS>>,
    DeviceJson(body): DeviceJson<DeviceHttpRequestBody>,
) -> Result<ApiSuccess<DeviceResponseData>, ApiError> {
    tracing::debug!("creating device");

    let domain_req = body.try_into_create_domain()?;
    state
        .device_service
        .add_device(&domain_req)
        .await
        .map_err(ApiError::from)
        .map(|ref device| ApiSuccess::new(StatusCode::CREATED, device.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::models::device::{DeviceBrand, DeviceName, DeviceState};

    #[test]
    fn test_id_must_be_absent() {
        let body = DeviceHttpRequestBody {
            id: Some(3),
            name: "iPhone".to_string(),
            brand: "Apple".to_string(),
            state: "available".to_string(),
        };

        let result = body.try_into_create_domain();

        assert_eq!(
            result,
            Err(InvalidDeviceRequest(vec![
                "To create a new device Id must be null. To update a device, use PUT instead."
                    .to_string()
            ]))
        );
    }

    #[test]
    fn test_valid_body() {
        let body = DeviceHttpRequestBody {
            id: None,
            name: "Galaxy S21".to_string(),
            brand: "Samsung".to_string(),
            state: "Inactive".to_string(),
        };

        let result = body.try_into_create_domain();

        assert_eq!(
            result,
            Ok(CreateDeviceRequest::new(
                DeviceName::new("Galaxy S21").unwrap(),
                DeviceBrand::new("Samsung").unwrap(),
                DeviceState::Inactive,
            ))
        );
    }
}
