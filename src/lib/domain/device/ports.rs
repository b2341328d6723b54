use std::future::Future;

use crate::domain::device::models::device::{
    CreateDeviceError, DeleteDeviceError, GetAllDevicesError, GetDeviceError,
    UpdateDeviceStatusError,
};
use crate::domain::device::models::device::{
    CreateDeviceRequest, Device, DeviceId, DeviceStatus,
};

/// `DeviceService` is the public API for the device domain.
pub trait DeviceService: Clone + Send + Sync + 'static {
    fn create_device(
        &self,
        req: &CreateDeviceRequest,
    ) -> impl Future<Output = Result<Device, CreateDeviceError>> + Send;

    fn get_all_devices(&self) -> impl Future<Output = Result<Vec<Device>, GetAllDevicesError>> + Send;

    fn get_device_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Device, GetDeviceError>> + Send;

    /// Overrides the status of a device without touching its loans.
    fn update_device_status(
        &self,
        id: &DeviceId,
        status: DeviceStatus,
    ) -> impl Future<Output = Result<Device, UpdateDeviceStatusError>> + Send;

    /// Removes a device. Fails with [DeleteDeviceError::ActiveLoans] while any unreturned loan
    /// references it.
    fn delete_device(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<(), DeleteDeviceError>> + Send;
}

/// `DeviceRepository` represents a store of device data.
pub trait DeviceRepository: Send + Sync + Clone + 'static {
    fn create_device(
        &self,
        device: &Device,
    ) -> impl Future<Output = Result<(), CreateDeviceError>> + Send;

    fn find_device_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, anyhow::Error>> + Send;

    fn list_devices(&self) -> impl Future<Output = Result<Vec<Device>, GetAllDevicesError>> + Send;

    fn update_device_status(
        &self,
        id: &DeviceId,
        status: DeviceStatus,
    ) -> impl Future<Output = Result<Device, UpdateDeviceStatusError>> + Send;

    /// Checks for active loans and deletes the device as a single unit of work.
    fn delete_device(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<(), DeleteDeviceError>> + Send;
}
