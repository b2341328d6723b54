use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::domain::device::models::device::DeleteDeviceError;
use crate::domain::device::ports::DeviceService;
use crate::domain::loan::ports::LoanService;
use crate::inbound::http::AppState;
use crate::inbound::http::handlers::device_id_from_path;
use crate::inbound::http::responses::ApiError;

impl From<DeleteDeviceError> for ApiError {
    fn from(e: DeleteDeviceError) -> Self {
        match e {
            DeleteDeviceError::NotFound { .. } => Self::NotFound(e.to_string()),
            DeleteDeviceError::ActiveLoans { .. } => Self::Conflict(e.to_string()),
            DeleteDeviceError::Unknown(cause) => ApiError::internal(cause),
        }
    }
}

pub async fn delete_device<DS: DeviceService, LS: LoanService>(
    State(state): State<AppState<DS, LS>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let id = device_id_from_path(&id)?;

    state
        .device_service
        .delete_device(&id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
