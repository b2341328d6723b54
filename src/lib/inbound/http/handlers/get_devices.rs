use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::domain::device::models::device::{GetAllDevicesError, GetDeviceError};
use crate::domain::device::ports::DeviceService;
use crate::domain::loan::ports::LoanService;
use crate::inbound::http::AppState;
use crate::inbound::http::handlers::device_id_from_path;
use crate::inbound::http::responses::{ApiError, ApiSuccess, DeviceResponseData};

impl From<GetAllDevicesError> for ApiError {
    fn from(e: GetAllDevicesError) -> Self {
        match e {
            GetAllDevicesError::Unknown(cause) => ApiError::internal(cause),
        }
    }
}

impl From<GetDeviceError> for ApiError {
    fn from(e: GetDeviceError) -> Self {
        match e {
            GetDeviceError::NotFound { .. } => Self::NotFound(e.to_string()),
            GetDeviceError::Unknown(cause) => ApiError::internal(cause),
        }
    }
}

pub async fn get_devices<DS: DeviceService, LS: LoanService>(
    State(state): State<AppState<DS, LS>>,
) -> Result<ApiSuccess<Vec<DeviceResponseData>>, ApiError> {
    state
        .device_service
        .get_all_devices()
        .await
        .map_err(ApiError::from)
        .map(|devices| {
            let data = devices.iter().map(DeviceResponseData::from).collect();
            ApiSuccess::new(StatusCode::OK, data)
        })
}

pub async fn get_device<DS: DeviceService, LS: LoanService>(
    State(state): State<AppState<DS, LS>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<ApiSuccess<DeviceResponseData>, ApiError> {
    let Path(id) = id?;
    let id = device_id_from_path(&id)?;

    state
        .device_service
        .get_device_by_id(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref device| ApiSuccess::new(StatusCode::OK, device.into()))
}
