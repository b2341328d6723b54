use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::device::models::device::{
    DeviceStatus, DeviceStatusError, UpdateDeviceStatusError,
};
use crate::domain::device::ports::DeviceService;
use crate::domain::loan::ports::LoanService;
use crate::inbound::http::AppState;
use crate::inbound::http::handlers::device_id_from_path;
use crate::inbound::http::responses::{ApiError, ApiSuccess, DeviceResponseData};

impl From<UpdateDeviceStatusError> for ApiError {
    fn from(e: UpdateDeviceStatusError) -> Self {
        match e {
            UpdateDeviceStatusError::NotFound { .. } => Self::NotFound(e.to_string()),
            UpdateDeviceStatusError::Unknown(cause) => ApiError::internal(cause),
        }
    }
}

impl From<DeviceStatusError> for ApiError {
    fn from(e: DeviceStatusError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateDeviceStatusParams {
    status: String,
}

pub async fn update_device_status<DS: DeviceService, LS: LoanService>(
    State(state): State<AppState<DS, LS>>,
    id: Result<Path<String>, PathRejection>,
    params: Result<Query<UpdateDeviceStatusParams>, QueryRejection>,
) -> Result<ApiSuccess<DeviceResponseData>, ApiError> {
    let Path(id) = id?;
    let id = device_id_from_path(&id)?;
    let Query(params) = params?;
    let status: DeviceStatus = params.status.parse()?;

    state
        .device_service
        .update_device_status(&id, status)
        .await
        .map_err(ApiError::from)
        .map(|ref device| ApiSuccess::new(StatusCode::OK, device.into()))
}
