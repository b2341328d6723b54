use std::future::Future;

use crate::domain::device::models::device::DeviceId;
use crate::domain::loan::models::loan::{GetLoansError, MarkAsReturnedError, RegisterLoanError};
use crate::domain::loan::models::loan::{Loan, LoanId, RegisterLoanRequest};

/// `LoanService` is the public API for the loan domain and the only way to open or close a loan.
pub trait LoanService: Clone + Send + Sync + 'static {
    fn register_loan(
        &self,
        req: &RegisterLoanRequest,
    ) -> impl Future<Output = Result<Loan, RegisterLoanError>> + Send;

    fn mark_as_returned(
        &self,
        id: &LoanId,
    ) -> impl Future<Output = Result<Loan, MarkAsReturnedError>> + Send;

    fn get_all_loans(&self) -> impl Future<Output = Result<Vec<Loan>, GetLoansError>> + Send;

    fn get_loan_by_id(
        &self,
        id: &LoanId,
    ) -> impl Future<Output = Result<Option<Loan>, GetLoansError>> + Send;

    fn get_loans_by_device_id(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Vec<Loan>, GetLoansError>> + Send;
}

/// `LoanRepository` represents a store of loan data.
///
/// Writes that touch a loan also move the status of its device, and both happen atomically.
pub trait LoanRepository: Send + Sync + Clone + 'static {
    fn find_loan_by_id(
        &self,
        id: &LoanId,
    ) -> impl Future<Output = Result<Option<Loan>, anyhow::Error>> + Send;

    fn list_loans(&self) -> impl Future<Output = Result<Vec<Loan>, anyhow::Error>> + Send;

    fn list_loans_by_device_id(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Vec<Loan>, anyhow::Error>> + Send;

    /// Persists a new loan and moves its device from AVAILABLE to LOANED. Fails with
    /// [RegisterLoanError::DeviceNotAvailable] without writing anything if the device is no
    /// longer available when the write happens.
    fn save_new_loan(
        &self,
        loan: &Loan,
    ) -> impl Future<Output = Result<(), RegisterLoanError>> + Send;

    /// Persists a loan that has just been returned and moves its device back to AVAILABLE. Fails
    /// with [MarkAsReturnedError::AlreadyReturned] if the stored loan was closed concurrently.
    fn save_returned_loan(
        &self,
        loan: &Loan,
    ) -> impl Future<Output = Result<(), MarkAsReturnedError>> + Send;
}
