use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::domain::device::models::device::DeviceId;
use crate::domain::device::ports::DeviceService;
use crate::domain::loan::models::loan::{GetLoansError, Loan};
use crate::domain::loan::ports::LoanService;
use crate::inbound::http::AppState;
use crate::inbound::http::handlers::loan_id_from_path;
use crate::inbound::http::responses::{ApiError, ApiSuccess, LoanResponseData};

impl From<GetLoansError> for ApiError {
    fn from(e: GetLoansError) -> Self {
        match e {
            GetLoansError::Unknown(cause) => ApiError::internal(cause),
        }
    }
}

fn loans_response(loans: Vec<Loan>) -> ApiSuccess<Vec<LoanResponseData>> {
    let data = loans.iter().map(LoanResponseData::from).collect();
    ApiSuccess::new(StatusCode::OK, data)
}

pub async fn get_loans<DS: DeviceService, LS: LoanService>(
    State(state): State<AppState<DS, LS>>,
) -> Result<ApiSuccess<Vec<LoanResponseData>>, ApiError> {
    state
        .loan_service
        .get_all_loans()
        .await
        .map_err(ApiError::from)
        .map(loans_response)
}

pub async fn get_loan<DS: DeviceService, LS: LoanService>(
    State(state): State<AppState<DS, LS>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<ApiSuccess<LoanResponseData>, ApiError> {
    let Path(id) = id?;
    let id = loan_id_from_path(&id)?;

    let loan = state
        .loan_service
        .get_loan_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Loan not found".to_string()))?;

    Ok(ApiSuccess::new(StatusCode::OK, (&loan).into()))
}

pub async fn get_loans_by_device<DS: DeviceService, LS: LoanService>(
    State(state): State<AppState<DS, LS>>,
    device_id: Result<Path<String>, PathRejection>,
) -> Result<ApiSuccess<Vec<LoanResponseData>>, ApiError> {
    let Path(device_id) = device_id?;
    // No loan can reference an id that does not parse.
    let Ok(device_id) = DeviceId::new(&device_id) else {
        return Ok(loans_response(Vec::new()));
    };

    state
        .loan_service
        .get_loans_by_device_id(&device_id)
        .await
        .map_err(ApiError::from)
        .map(loans_response)
}
