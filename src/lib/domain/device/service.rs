use chrono::Utc;

use crate::domain::device::models::device::{
    CreateDeviceError, DeleteDeviceError, GetDeviceError, GetDevicesError, UpdateDeviceError,
};
use crate::domain::device::models::device::{
    CreateDeviceRequest, Device, DeviceFilters, DeviceId, DeviceState, UpdateDeviceRequest,
};
use crate::domain::device::ports::{DeviceRepository, DeviceService};

/// Canonical implementation of the [DeviceService] port, through which the device domain API is
/// consumed.
///
/// Reads and writes are not wrapped in a transaction. Two concurrent updates of the same device
/// can both pass the checks below, and the later write wins.
#[derive(Debug, Clone)]
pub struct Service<R: DeviceRepository> {
    repo: R,
}

impl<R: DeviceRepository> Service<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

impl<R: DeviceRepository> DeviceService for Service<R> {
    async fn add_device(&self, req: &CreateDeviceRequest) -> Result<Device, CreateDeviceError> {
        let device = Device::new(
            None,
            req.name().clone(),
            req.brand().clone(),
            req.state(),
            Utc::now(),
        );

        Ok(self.repo.create_device(&device).await?)
    }

    async fn get_devices(&self, filters: &DeviceFilters) -> Result<Vec<Device>, GetDevicesError> {
        Ok(self.repo.get_devices(filters).await?)
    }

    async fn get_device(&self, id: &DeviceId) -> Result<Device, GetDeviceError> {
        self.repo
            .get_device_by_id(id)
            .await?
            .ok_or(GetDeviceError::NotFound { id: *id })
    }

    async fn update_device(
        &self,
        id: &DeviceId,
        req: &UpdateDeviceRequest,
    ) -> Result<Device, UpdateDeviceError> {
        let current = self.get_device(id).await?;

        // Moving into or out of InUse is always allowed; only a device that stays in use keeps
        // its name and brand.
        if current.state() == DeviceState::InUse
            && req.state() == DeviceState::InUse
            && req.changes_identity_of(&current)
        {
            return Err(UpdateDeviceError::InUse { id: *id });
        }

        if req.is_noop_for(&current) {
            return Err(UpdateDeviceError::NoChanges { id: *id });
        }

        let updated = Device::new(
            Some(*id),
            req.name().clone(),
            req.brand().clone(),
            req.state(),
            *current.creation_time(),
        );

        Ok(self.repo.update_device(id, &updated).await?)
    }

    async fn delete_device(&self, id: &DeviceId) -> Result<(), DeleteDeviceError> {
        let current = self.get_device(id).await?;

        if current.state() == DeviceState::InUse {
            return Err(DeleteDeviceError::InUse { id: *id });
        }

        Ok(self.repo.delete_device(id).await?)
    }
}
