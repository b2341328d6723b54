use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::domain::device::ports::DeviceService;
use crate::domain::loan::models::loan::MarkAsReturnedError;
use crate::domain::loan::ports::LoanService;
use crate::inbound::http::AppState;
use crate::inbound::http::handlers::loan_id_from_path;
use crate::inbound::http::responses::{ApiError, ApiSuccess, LoanResponseData};

impl From<MarkAsReturnedError> for ApiError {
    fn from(e: MarkAsReturnedError) -> Self {
        match e {
            MarkAsReturnedError::LoanNotFound { .. }
            | MarkAsReturnedError::DeviceNotFound { .. } => Self::NotFound(e.to_string()),
            MarkAsReturnedError::AlreadyReturned { .. } => Self::Conflict(e.to_string()),
            MarkAsReturnedError::Unknown(cause) => ApiError::internal(cause),
        }
    }
}

pub async fn return_loan<DS: DeviceService, LS: LoanService>(
    State(state): State<AppState<DS, LS>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<ApiSuccess<LoanResponseData>, ApiError> {
    let Path(id) = id?;
    let id = loan_id_from_path(&id)?;

    state
        .loan_service
        .mark_as_returned(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref loan| ApiSuccess::new(StatusCode::OK, loan.into()))
}
