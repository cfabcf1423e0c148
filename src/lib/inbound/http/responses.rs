use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::device::models::device::{
    CreateDeviceError, DeleteDeviceError, Device, GetDeviceError, GetDevicesError,
    UpdateDeviceError,
};

const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong, please try again";

/// Envelope shared by every response: `{"statusCode": .., "data": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody<T: Serialize> {
    status_code: u16,
    data: T,
}

impl<T: Serialize> ResponseBody<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1.0 == other.1.0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(Vec<String>),
    NotFound(Vec<String>),
    Conflict(Vec<String>),
    UnprocessableEntity(Vec<String>),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(format!("{:?}", e))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(vec![rejection.body_text()])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(vec![rejection.body_text()])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(vec![rejection.body_text()])
    }
}

impl From<CreateDeviceError> for ApiError {
    fn from(e: CreateDeviceError) -> Self {
        match e {
            CreateDeviceError::Persistence(cause) => cause.into(),
        }
    }
}

impl From<GetDevicesError> for ApiError {
    fn from(e: GetDevicesError) -> Self {
        match e {
            GetDevicesError::Persistence(cause) => cause.into(),
        }
    }
}

impl From<GetDeviceError> for ApiError {
    fn from(e: GetDeviceError) -> Self {
        match e {
            GetDeviceError::NotFound { .. } => Self::NotFound(vec![e.to_string()]),
            GetDeviceError::Persistence(cause) => cause.into(),
        }
    }
}

impl From<UpdateDeviceError> for ApiError {
    fn from(e: UpdateDeviceError) -> Self {
        match e {
            UpdateDeviceError::NotFound { .. } => Self::NotFound(vec![e.to_string()]),
            UpdateDeviceError::InUse { .. } => Self::Conflict(vec![e.to_string()]),
            UpdateDeviceError::NoChanges { .. } => Self::UnprocessableEntity(vec![e.to_string()]),
            UpdateDeviceError::Persistence(cause) => cause.into(),
        }
    }
}

impl From<DeleteDeviceError> for ApiError {
    fn from(e: DeleteDeviceError) -> Self {
        match e {
            DeleteDeviceError::NotFound { .. } => Self::NotFound(vec![e.to_string()]),
            DeleteDeviceError::InUse { .. } => Self::Conflict(vec![e.to_string()]),
            DeleteDeviceError::Persistence(cause) => cause.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        let (status, errors) = match self {
            InternalServerError(cause) => {
                tracing::error!("{}", cause);
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                return (
                    status,
                    Json(ResponseBody::new(status, INTERNAL_ERROR_MESSAGE)),
                )
                    .into_response();
            }
            BadRequest(errors) => (StatusCode::BAD_REQUEST, errors),
            NotFound(errors) => (StatusCode::NOT_FOUND, errors),
            Conflict(errors) => (StatusCode::CONFLICT, errors),
            UnprocessableEntity(errors) => (StatusCode::UNPROCESSABLE_ENTITY, errors),
        };

        (status, Json(ResponseBody::new(status, errors))).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponseData {
    id: Option<i64>,
    name: String,
    brand: String,
    state: String,
    creation_time: String,
}

impl From<&Device> for DeviceResponseData {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id().map(|id| id.into_inner()),
            name: device.name().to_string(),
            brand: device.brand().to_string(),
            state: device.state().to_string(),
            creation_time: device.creation_time().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;
    use crate::domain::device::models::device::DeviceId;

    #[test]
    fn test_business_errors_map_to_client_statuses() {
        let id = DeviceId::new(1);

        assert_eq!(
            ApiError::from(UpdateDeviceError::InUse { id }),
            ApiError::Conflict(vec![
                "Cannot update name or brand while device is in use".to_string()
            ])
        );
        assert_eq!(
            ApiError::from(UpdateDeviceError::NoChanges { id }),
            ApiError::UnprocessableEntity(vec!["No field to update".to_string()])
        );
        assert_eq!(
            ApiError::from(DeleteDeviceError::InUse { id }),
            ApiError::Conflict(vec!["In use devices cannot be deleted".to_string()])
        );
        assert_eq!(
            ApiError::from(GetDeviceError::NotFound { id }),
            ApiError::NotFound(vec!["Device not found".to_string()])
        );
    }

    #[test]
    fn test_persistence_errors_map_to_internal_error() {
        let err = ApiError::from(DeleteDeviceError::Persistence(anyhow!("disk full")));

        assert!(matches!(err, ApiError::InternalServerError(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
