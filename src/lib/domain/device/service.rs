use chrono::Utc;

use crate::domain::device::models::device::{
    CreateDeviceError, DeleteDeviceError, GetAllDevicesError, GetDeviceError,
    UpdateDeviceStatusError,
};
use crate::domain::device::models::device::{
    CreateDeviceRequest, Device, DeviceId, DeviceStatus,
};
use crate::domain::device::ports::{DeviceRepository, DeviceService};

/// Canonical implementation of the [DeviceService] port, through which the device domain API is
/// consumed.
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
    async fn create_device(&self, req: &CreateDeviceRequest) -> Result<Device, CreateDeviceError> {
        let device = Device::new(
            DeviceId::generate(),
            req.name().clone(),
            req.device_type().map(str::to_string),
            req.location().map(str::to_string),
            DeviceStatus::Available,
            Utc::now(),
        );

        self.repo.create_device(&device).await?;

        tracing::info!(device_id = %device.id(), name = %device.name(), "device registered");
        Ok(device)
    }

    async fn get_all_devices(&self) -> Result<Vec<Device>, GetAllDevicesError> {
        self.repo.list_devices().await
    }

    async fn get_device_by_id(&self, id: &DeviceId) -> Result<Device, GetDeviceError> {
        self.repo
            .find_device_by_id(id)
            .await?
            .ok_or(GetDeviceError::NotFound { id: *id })
    }

    async fn update_device_status(
        &self,
        id: &DeviceId,
        status: DeviceStatus,
    ) -> Result<Device, UpdateDeviceStatusError> {
        let device = self.repo.update_device_status(id, status).await?;

        tracing::warn!(device_id = %id, %status, "device status overridden");
        Ok(device)
    }

    async fn delete_device(&self, id: &DeviceId) -> Result<(), DeleteDeviceError> {
        self.repo.delete_device(id).await?;

        tracing::info!(device_id = %id, "device deleted");
        Ok(())
    }
}
