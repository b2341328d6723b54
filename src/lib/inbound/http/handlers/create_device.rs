use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::device::models::device::{
    CreateDeviceError, CreateDeviceRequest, DeviceName, DeviceNameEmptyError,
};
use crate::domain::device::ports::DeviceService;
use crate::domain::loan::ports::LoanService;
use crate::inbound::http::AppState;
use crate::inbound::http::responses::{ApiError, ApiSuccess, DeviceResponseData};

impl From<CreateDeviceError> for ApiError {
    fn from(e: CreateDeviceError) -> Self {
        match e {
            CreateDeviceError::Unknown(cause) => ApiError::internal(cause),
        }
    }
}

impl From<ParseCreateDeviceHttpRequestError> for ApiError {
    fn from(e: ParseCreateDeviceHttpRequestError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

/// Client-supplied `id`, `status` and `createdAt` are ignored: the server assigns them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateDeviceHttpRequestBody {
    name: Option<String>,
    #[serde(rename = "type")]
    device_type: Option<String>,
    location: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateDeviceHttpRequestError {
    #[error(transparent)]
    Name(#[from] DeviceNameEmptyError),
}

impl CreateDeviceHttpRequestBody {
    fn try_into_domain(self) -> Result<CreateDeviceRequest, ParseCreateDeviceHttpRequestError> {
        let name = DeviceName::new(self.name.as_deref().unwrap_or_default())?;

        Ok(CreateDeviceRequest::new(name, self.device_type, self.location))
    }
}

pub async fn create_device<DS: DeviceService, LS: LoanService>(
    State(state): State<AppState<DS, LS>>,
    payload: Result<Json<CreateDeviceHttpRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<DeviceResponseData>, ApiError> {
    let Json(body) = payload?;
    let domain_req = body.try_into_domain()?;

    state
        .device_service
        .create_device(&domain_req)
        .await
        .map_err(ApiError::from)
        .map(|ref device| ApiSuccess::new(StatusCode::CREATED, device.into()))
}
