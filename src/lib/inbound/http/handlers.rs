use axum::extract::{FromRequest, FromRequestParts};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::device::models::device::{
    DeviceBrand, DeviceName, DeviceState, DeviceTextError, MAX_FIELD_LENGTH,
};
use crate::inbound::http::responses::ApiError;

pub mod create_device;
pub mod delete_device;
pub mod get_device;
pub mod get_devices;
pub mod update_device;

/// `axum::Json` that reports malformed bodies inside the response envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct DeviceJson<T>(pub T);

/// `axum::extract::Path` that reports malformed ids inside the response envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct DevicePath<T>(pub T);

/// `axum::extract::Query` that reports malformed query strings inside the response envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct DeviceQuery<T>(pub T);

/// Body accepted by the create and update endpoints. Missing fields deserialize to empty values
/// so that they are reported together with every other validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceHttpRequestBody {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    brand: String,
    #[serde(default)]
    state: String,
}

/// Every validation failure found in a request, in the order they were detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid device request: {}", .0.join(" "))]
pub struct InvalidDeviceRequest(Vec<String>);

impl From<InvalidDeviceRequest> for ApiError {
    fn from(e: InvalidDeviceRequest) -> Self {
        Self::BadRequest(e.0)
    }
}

fn text_error_message(e: &DeviceTextError) -> String {
    match e {
        DeviceTextError::Empty { field } => format!("Please inform a valid {}.", field),
        DeviceTextError::TooLong { field } => {
            format!("Please inform a {} of at most {} characters.", field, MAX_FIELD_LENGTH)
        }
    }
}

impl DeviceHttpRequestBody {
    /// Validates name, brand and state, appending failures to `errors`.
    fn parse_fields(
        &self,
        mut errors: Vec<String>,
    ) -> Result<(DeviceName, DeviceBrand, DeviceState), InvalidDeviceRequest> {
        let name = DeviceName::new(&self.name)
            .map_err(|e| errors.push(text_error_message(&e)))
            .ok();
        let brand = DeviceBrand::new(&self.brand)
            .map_err(|e| errors.push(text_error_message(&e)))
            .ok();
        let state = self
            .state
            .parse::<DeviceState>()
            .map_err(|_| {
                errors.push("Invalid state, please use available, inUse or inactive.".to_string())
            })
            .ok();

        match (name, brand, state) {
            (Some(name), Some(brand), Some(state)) if errors.is_empty() => Ok((name, brand, state)),
            _ => Err(InvalidDeviceRequest(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: Option<i64>, name: &str, brand: &str, state: &str) -> DeviceHttpRequestBody {
        DeviceHttpRequestBody {
            id,
            name: name.to_string(),
            brand: brand.to_string(),
            state: state.to_string(),
        }
    }

    #[test]
    fn test_valid_fields() {
        let result = body(None, "iPhone", "Apple", "inuse").parse_fields(Vec::new());

        assert_eq!(
            result,
            Ok((
                DeviceName::new("iPhone").unwrap(),
                DeviceBrand::new("Apple").unwrap(),
                DeviceState::InUse
            ))
        );
    }

    #[test]
    fn test_all_failures_are_collected() {
        let result = body(None, " ", "", "broken").parse_fields(Vec::new());

        assert_eq!(
            result,
            Err(InvalidDeviceRequest(vec![
                "Please inform a valid name.".to_string(),
                "Please inform a valid brand.".to_string(),
                "Invalid state, please use available, inUse or inactive.".to_string(),
            ]))
        );
    }

    #[test]
    fn test_earlier_failures_are_kept() {
        let earlier = vec!["Route Id and Body Id must be the same".to_string()];
        let result = body(Some(2), "iPhone", "Apple", "available").parse_fields(earlier.clone());

        assert_eq!(result, Err(InvalidDeviceRequest(earlier)));
    }

    #[test]
    fn test_too_long_name() {
        let long_name = "n".repeat(MAX_FIELD_LENGTH + 1);
        let result = body(None, &long_name, "Apple", "available").parse_fields(Vec::new());

        assert_eq!(
            result,
            Err(InvalidDeviceRequest(vec![
                "Please inform a name of at most 50 characters.".to_string()
            ]))
        );
    }
}
