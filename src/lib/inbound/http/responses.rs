use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::device::models::device::Device;
use crate::domain::loan::models::loan::Loan;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1.0 == other.1.0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
}

impl ApiError {
    /// Logs an unexpected failure with its full chain and hides it from the client.
    pub fn internal(cause: anyhow::Error) -> Self {
        tracing::error!("{:?}", cause);
        Self::InternalServerError("Internal server error".to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::BadRequest(e.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        Self::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::BadRequest(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        match self {
            InternalServerError(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorData::new(message)),
            )
                .into_response(),
            BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ApiErrorData::new(message))).into_response()
            }
            NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ApiErrorData::new(message))).into_response()
            }
            Conflict(message) => {
                (StatusCode::CONFLICT, Json(ApiErrorData::new(message))).into_response()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

impl ApiErrorData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponseData {
    id: String,
    name: String,
    #[serde(rename = "type")]
    device_type: Option<String>,
    location: Option<String>,
    status: String,
    created_at: i64,
}

impl From<&Device> for DeviceResponseData {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id().to_string(),
            name: device.name().to_string(),
            device_type: device.device_type().map(str::to_string),
            location: device.location().map(str::to_string),
            status: device.status().to_string(),
            created_at: device.created_at().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResponseData {
    id: String,
    device_id: String,
    borrowed_by: String,
    start_date: i64,
    end_date: Option<i64>,
    returned: bool,
}

impl From<&Loan> for LoanResponseData {
    fn from(loan: &Loan) -> Self {
        Self {
            id: loan.id().to_string(),
            device_id: loan.device_id().to_string(),
            borrowed_by: loan.borrowed_by().to_string(),
            start_date: loan.start_date().timestamp_millis(),
            end_date: loan.end_date().map(|date| date.timestamp_millis()),
            returned: loan.is_returned(),
        }
    }
}
