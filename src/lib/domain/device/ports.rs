use std::future::Future;

use crate::domain::device::models::device::{
    CreateDeviceError, DeleteDeviceError, GetDeviceError, GetDevicesError, UpdateDeviceError,
};
use crate::domain::device::models::device::{
    CreateDeviceRequest, Device, DeviceFilters, DeviceId, UpdateDeviceRequest,
};

/// `DeviceService` is the public API for the device domain.
pub trait DeviceService: Clone + Send + Sync + 'static {
    fn add_device(
        &self,
        req: &CreateDeviceRequest,
    ) -> impl Future<Output = Result<Device, CreateDeviceError>> + Send;

    fn get_devices(
        &self,
        filters: &DeviceFilters,
    ) -> impl Future<Output = Result<Vec<Device>, GetDevicesError>> + Send;

    fn get_device(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Device, GetDeviceError>> + Send;

    fn update_device(
        &self,
        id: &DeviceId,
        req: &UpdateDeviceRequest,
    ) -> impl Future<Output = Result<Device, UpdateDeviceError>> + Send;

    fn delete_device(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<(), DeleteDeviceError>> + Send;
}

/// `DeviceRepository` represents a store of device data. It applies no business rules.
///
/// A missing device is reported as `Ok(None)` by [DeviceRepository::get_device_by_id];
/// `Err` is reserved for storage failures.
pub trait DeviceRepository: Send + Sync + Clone + 'static {
    /// Stores a device that has no id yet and returns it with its assigned id.
    fn create_device(
        &self,
        device: &Device,
    ) -> impl Future<Output = Result<Device, anyhow::Error>> + Send;

    fn get_devices(
        &self,
        filters: &DeviceFilters,
    ) -> impl Future<Output = Result<Vec<Device>, anyhow::Error>> + Send;

    fn get_device_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, anyhow::Error>> + Send;

    /// Overwrites every field of the device stored under `id`.
    fn update_device(
        &self,
        id: &DeviceId,
        device: &Device,
    ) -> impl Future<Output = Result<Device, anyhow::Error>> + Send;

    fn delete_device(&self, id: &DeviceId)
    -> impl Future<Output = Result<(), anyhow::Error>> + Send;
}
