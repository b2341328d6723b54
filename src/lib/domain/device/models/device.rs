use std::str::FromStr;

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use thiserror::Error;
use uuid::Uuid;

/// Represents always valid device identifier.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, From)]
pub struct DeviceId(Uuid);

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0} is not a valid device id")]
pub struct DeviceIdError(String);
impl DeviceId {
    pub fn new(raw_id: &str) -> Result<Self, DeviceIdError> {
        match Uuid::try_parse(raw_id) {
            Ok(uuid) if !uuid.is_nil() => Ok(DeviceId(uuid)),
            _ => Err(DeviceIdError(raw_id.to_string())),
        }
    }

    pub fn generate() -> Self {
        DeviceId(Uuid::new_v4())
    }
}

/// Represents always valid device name.
#[derive(Display, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceName(String);

#[derive(Clone, Debug, Error, PartialEq)]
#[error("device name cannot be empty")]
pub struct DeviceNameEmptyError;
impl DeviceName {
    pub fn new(raw_name: &str) -> Result<Self, DeviceNameEmptyError> {
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            Err(DeviceNameEmptyError)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

/// Lifecycle status of a device. A device is [DeviceStatus::Loaned] while it has an unreturned
/// loan referencing it.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceStatus {
    #[display("AVAILABLE")]
    Available,
    #[display("LOANED")]
    Loaned,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0} is not a valid device status")]
pub struct DeviceStatusError(String);
impl FromStr for DeviceStatus {
    type Err = DeviceStatusError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(Self::Available),
            "LOANED" => Ok(Self::Loaned),
            _ => Err(DeviceStatusError(raw.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    id: DeviceId,
    name: DeviceName,
    device_type: Option<String>,
    location: Option<String>,
    status: DeviceStatus,
    created_at: DateTime<Utc>,
}

impl Device {
    pub fn new(
        id: DeviceId,
        name: DeviceName,
        device_type: Option<String>,
        location: Option<String>,
        status: DeviceStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            device_type,
            location,
            status,
            created_at,
        }
    }

    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    pub fn device_type(&self) -> Option<&str> {
        self.device_type.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn is_available(&self) -> bool {
        self.status == DeviceStatus::Available
    }

    pub fn set_status(&mut self, status: DeviceStatus) {
        self.status = status;
    }
}

/// Data required by the domain to create a [Device].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateDeviceRequest {
    name: DeviceName,
    device_type: Option<String>,
    location: Option<String>,
}

impl CreateDeviceRequest {
    pub fn new(name: DeviceName, device_type: Option<String>, location: Option<String>) -> Self {
        Self {
            name,
            device_type,
            location,
        }
    }

    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    pub fn device_type(&self) -> Option<&str> {
        self.device_type.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

#[derive(Debug, Error)]
pub enum CreateDeviceError {
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum GetDeviceError {
    #[error("Device not found")]
    NotFound { id: DeviceId },
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum GetAllDevicesError {
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum UpdateDeviceStatusError {
    #[error("Device not found")]
    NotFound { id: DeviceId },
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum DeleteDeviceError {
    #[error("Device not found")]
    NotFound { id: DeviceId },
    #[error("Device has active loans")]
    ActiveLoans { id: DeviceId },
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}
