use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use chrono::DateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::device::models::device::{DeviceId, DeviceIdError};
use crate::domain::device::ports::DeviceService;
use crate::domain::loan::models::loan::{RegisterLoanError, RegisterLoanRequest};
use crate::domain::loan::ports::LoanService;
use crate::inbound::http::AppState;
use crate::inbound::http::responses::{ApiError, ApiSuccess, LoanResponseData};

// A missing device is reported as 400 here (it is a bad reference in the request body), unlike
// the 404 returned by the lookup endpoints.
impl From<RegisterLoanError> for ApiError {
    fn from(e: RegisterLoanError) -> Self {
        match e {
            RegisterLoanError::DeviceNotFound { .. } => Self::BadRequest(e.to_string()),
            RegisterLoanError::DeviceNotAvailable { .. } => Self::Conflict(e.to_string()),
            RegisterLoanError::Unknown(cause) => ApiError::internal(cause),
        }
    }
}

impl From<ParseCreateLoanHttpRequestError> for ApiError {
    fn from(e: ParseCreateLoanHttpRequestError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

/// Client-supplied `id`, `startDate` and `returned` are ignored: a new loan always starts now
/// and unreturned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanHttpRequestBody {
    device_id: Option<String>,
    #[serde(default)]
    borrowed_by: String,
    end_date: Option<i64>,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateLoanHttpRequestError {
    #[error("device id is required")]
    MissingDeviceId,
    #[error(transparent)]
    DeviceId(#[from] DeviceIdError),
    #[error("end date {0} is out of range")]
    EndDate(i64),
}

impl CreateLoanHttpRequestBody {
    fn try_into_domain(self) -> Result<RegisterLoanRequest, ParseCreateLoanHttpRequestError> {
        let raw_device_id = self
            .device_id
            .ok_or(ParseCreateLoanHttpRequestError::MissingDeviceId)?;
        let device_id = DeviceId::new(&raw_device_id)?;
        let end_date = self
            .end_date
            .map(|millis| {
                DateTime::from_timestamp_millis(millis)
                    .ok_or(ParseCreateLoanHttpRequestError::EndDate(millis))
            })
            .transpose()?;

        Ok(RegisterLoanRequest::new(
            device_id,
            self.borrowed_by,
            end_date,
        ))
    }
}

pub async fn create_loan<DS: DeviceService, LS: LoanService>(
    State(state): State<AppState<DS, LS>>,
    payload: Result<Json<CreateLoanHttpRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<LoanResponseData>, ApiError> {
    let Json(body) = payload?;
    let domain_req = body.try_into_domain()?;

    state
        .loan_service
        .register_loan(&domain_req)
        .await
        .map_err(ApiError::from)
        .map(|ref loan| ApiSuccess::new(StatusCode::CREATED, loan.into()))
}
