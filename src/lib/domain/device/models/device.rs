use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use thiserror::Error;

/// Maximum number of characters allowed in a device name or brand.
pub const MAX_FIELD_LENGTH: usize = 50;

/// Identity assigned to a [Device] by the repository when it is first stored.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(i64);

impl DeviceId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> i64 {
        self.0
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeviceTextError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {} characters", MAX_FIELD_LENGTH)]
    TooLong { field: &'static str },
}

/// Rejects blank text and text longer than [MAX_FIELD_LENGTH]. Accepted text is kept as given.
fn validate_text(field: &'static str, raw: &str) -> Result<String, DeviceTextError> {
    if raw.trim().is_empty() {
        Err(DeviceTextError::Empty { field })
    } else if raw.chars().count() > MAX_FIELD_LENGTH {
        Err(DeviceTextError::TooLong { field })
    } else {
        Ok(raw.to_string())
    }
}

/// Case-folded form of a brand, used for case-insensitive lookups.
fn brand_key(brand: &str) -> String {
    brand.to_lowercase()
}

/// Represents always valid device name.
#[derive(Display, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeviceName(String);

impl DeviceName {
    pub fn new(raw_name: &str) -> Result<Self, DeviceTextError> {
        validate_text("name", raw_name).map(Self)
    }
}

/// Represents always valid device brand.
#[derive(Display, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeviceBrand(String);

impl DeviceBrand {
    pub fn new(raw_brand: &str) -> Result<Self, DeviceTextError> {
        validate_text("brand", raw_brand).map(Self)
    }

    /// Key under which this brand is matched by [DeviceFilters], ignoring case in any script.
    pub fn key(&self) -> String {
        brand_key(&self.0)
    }
}

/// Lifecycle state of a [Device].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceState {
    Available,
    InUse,
    Inactive,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0} is not a valid device state")]
pub struct DeviceStateError(String);

impl DeviceState {
    /// Numeric code used by the storage layer.
    pub fn code(self) -> i64 {
        match self {
            DeviceState::Available => 1,
            DeviceState::InUse => 2,
            DeviceState::Inactive => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, DeviceStateError> {
        match code {
            1 => Ok(DeviceState::Available),
            2 => Ok(DeviceState::InUse),
            3 => Ok(DeviceState::Inactive),
            other => Err(DeviceStateError(other.to_string())),
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceState::Available => "available",
            DeviceState::InUse => "inUse",
            DeviceState::Inactive => "inactive",
        };
        f.write_str(name)
    }
}

/// Parses a state name, ignoring case.
impl FromStr for DeviceState {
    type Err = DeviceStateError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(DeviceState::Available),
            "inuse" => Ok(DeviceState::InUse),
            "inactive" => Ok(DeviceState::Inactive),
            _ => Err(DeviceStateError(raw.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    id: Option<DeviceId>,
    name: DeviceName,
    brand: DeviceBrand,
    state: DeviceState,
    creation_time: DateTime<Utc>,
}

impl Device {
    pub fn new(
        id: Option<DeviceId>,
        name: DeviceName,
        brand: DeviceBrand,
        state: DeviceState,
        creation_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            brand,
            state,
            creation_time,
        }
    }

    /// Returns the same device carrying the identity assigned by storage.
    pub fn with_id(self, id: DeviceId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    pub fn id(&self) -> Option<DeviceId> {
        self.id
    }

    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    pub fn brand(&self) -> &DeviceBrand {
        &self.brand
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn creation_time(&self) -> &DateTime<Utc> {
        &self.creation_time
    }
}

/// Data required by the domain to create a [Device].
#[derive(Clone, Debug, PartialEq, Eq, From)]
pub struct CreateDeviceRequest {
    name: DeviceName,
    brand: DeviceBrand,
    state: DeviceState,
}

impl CreateDeviceRequest {
    pub fn new(name: DeviceName, brand: DeviceBrand, state: DeviceState) -> Self {
        Self { name, brand, state }
    }

    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    pub fn brand(&self) -> &DeviceBrand {
        &self.brand
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }
}

/// Desired field values for an existing [Device].
#[derive(Clone, Debug, PartialEq, Eq, From)]
pub struct UpdateDeviceRequest {
    name: DeviceName,
    brand: DeviceBrand,
    state: DeviceState,
}

impl UpdateDeviceRequest {
    pub fn new(name: DeviceName, brand: DeviceBrand, state: DeviceState) -> Self {
        Self { name, brand, state }
    }

    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    pub fn brand(&self) -> &DeviceBrand {
        &self.brand
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// True when applying this request would change the name or brand of `device`.
    pub fn changes_identity_of(&self, device: &Device) -> bool {
        self.name != device.name || self.brand != device.brand
    }

    /// True when every field already matches `device`.
    pub fn is_noop_for(&self, device: &Device) -> bool {
        !self.changes_identity_of(device) && self.state == device.state
    }
}

/// Optional criteria narrowing a device listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceFilters {
    brand_key: Option<String>,
    state: Option<DeviceState>,
}

impl DeviceFilters {
    /// Builds filters from raw query values. Blank brands and unknown states are dropped
    /// rather than rejected.
    pub fn new(raw_brand: Option<&str>, raw_state: Option<&str>) -> Self {
        let brand_key = raw_brand
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(brand_key);
        let state = raw_state.and_then(|s| s.parse().ok());

        Self { brand_key, state }
    }

    /// Requested brand, case-folded the same way as [DeviceBrand::key].
    pub fn brand_key(&self) -> Option<&str> {
        self.brand_key.as_deref()
    }

    pub fn state(&self) -> Option<DeviceState> {
        self.state
    }
}

#[derive(Debug, Error)]
pub enum CreateDeviceError {
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum GetDevicesError {
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum GetDeviceError {
    #[error("Device not found")]
    NotFound { id: DeviceId },
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum UpdateDeviceError {
    #[error("Device not found")]
    NotFound { id: DeviceId },
    #[error("Cannot update name or brand while device is in use")]
    InUse { id: DeviceId },
    #[error("No field to update")]
    NoChanges { id: DeviceId },
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl From<GetDeviceError> for UpdateDeviceError {
    fn from(e: GetDeviceError) -> Self {
        match e {
            GetDeviceError::NotFound { id } => Self::NotFound { id },
            GetDeviceError::Persistence(cause) => Self::Persistence(cause),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeleteDeviceError {
    #[error("Device not found")]
    NotFound { id: DeviceId },
    #[error("In use devices cannot be deleted")]
    InUse { id: DeviceId },
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl From<GetDeviceError> for DeleteDeviceError {
    fn from(e: GetDeviceError) -> Self {
        match e {
            GetDeviceError::NotFound { id } => Self::NotFound { id },
            GetDeviceError::Persistence(cause) => Self::Persistence(cause),
        }
    }
}
