use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::device::models::device::DeviceId;

/// Represents always valid loan identifier.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, From)]
pub struct LoanId(Uuid);

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0} is not a valid loan id")]
pub struct LoanIdError(String);
impl LoanId {
    pub fn new(raw_id: &str) -> Result<Self, LoanIdError> {
        match Uuid::try_parse(raw_id) {
            Ok(uuid) if !uuid.is_nil() => Ok(LoanId(uuid)),
            _ => Err(LoanIdError(raw_id.to_string())),
        }
    }

    pub fn generate() -> Self {
        LoanId(Uuid::new_v4())
    }
}

/// A borrower holding a device for an interval.
///
/// `end_date` starts out as the expected return date supplied by the borrower and is overwritten
/// with the actual return time once the loan is closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loan {
    id: LoanId,
    device_id: DeviceId,
    borrowed_by: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    returned: bool,
}

impl Loan {
    pub fn new(
        id: LoanId,
        device_id: DeviceId,
        borrowed_by: String,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
        returned: bool,
    ) -> Self {
        Self {
            id,
            device_id,
            borrowed_by,
            start_date,
            end_date,
            returned,
        }
    }

    /// Opens a fresh, unreturned loan starting at `now`.
    pub fn open(req: &RegisterLoanRequest, now: DateTime<Utc>) -> Self {
        Self::new(
            LoanId::generate(),
            *req.device_id(),
            req.borrowed_by().to_string(),
            now,
            req.end_date().copied(),
            false,
        )
    }

    pub fn id(&self) -> &LoanId {
        &self.id
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn borrowed_by(&self) -> &str {
        &self.borrowed_by
    }

    pub fn start_date(&self) -> &DateTime<Utc> {
        &self.start_date
    }

    pub fn end_date(&self) -> Option<&DateTime<Utc>> {
        self.end_date.as_ref()
    }

    pub fn is_returned(&self) -> bool {
        self.returned
    }

    pub fn mark_returned(&mut self, at: DateTime<Utc>) {
        self.returned = true;
        self.end_date = Some(at);
    }
}

/// Data required by the domain to register a [Loan].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterLoanRequest {
    device_id: DeviceId,
    borrowed_by: String,
    end_date: Option<DateTime<Utc>>,
}

impl RegisterLoanRequest {
    pub fn new(device_id: DeviceId, borrowed_by: String, end_date: Option<DateTime<Utc>>) -> Self {
        Self {
            device_id,
            borrowed_by,
            end_date,
        }
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn borrowed_by(&self) -> &str {
        &self.borrowed_by
    }

    pub fn end_date(&self) -> Option<&DateTime<Utc>> {
        self.end_date.as_ref()
    }
}

#[derive(Debug, Error)]
pub enum RegisterLoanError {
    #[error("Device not found")]
    DeviceNotFound { device_id: DeviceId },
    #[error("Device is not available for loan")]
    DeviceNotAvailable { device_id: DeviceId },
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum MarkAsReturnedError {
    #[error("Loan not found")]
    LoanNotFound { id: LoanId },
    #[error("Loan is already marked as returned")]
    AlreadyReturned { id: LoanId },
    #[error("Device not found")]
    DeviceNotFound { device_id: DeviceId },
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum GetLoansError {
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}
