use crate::domain::device::models::device::DeviceId;
use crate::domain::loan::models::loan::LoanId;
use crate::inbound::http::responses::ApiError;

pub mod create_device;
pub mod create_loan;
pub mod delete_device;
pub mod get_devices;
pub mod get_loans;
pub mod return_loan;
pub mod update_device_status;

/// A path id that does not parse cannot name a stored device.
fn device_id_from_path(raw: &str) -> Result<DeviceId, ApiError> {
    DeviceId::new(raw).map_err(|_| ApiError::NotFound("Device not found".to_string()))
}

/// A path id that does not parse cannot name a stored loan.
fn loan_id_from_path(raw: &str) -> Result<LoanId, ApiError> {
    LoanId::new(raw).map_err(|_| ApiError::NotFound("Loan not found".to_string()))
}
