use chrono::Utc;

use crate::domain::device::models::device::DeviceId;
use crate::domain::device::ports::DeviceRepository;
use crate::domain::loan::models::loan::{
    GetLoansError, Loan, LoanId, MarkAsReturnedError, RegisterLoanError, RegisterLoanRequest,
};
use crate::domain::loan::ports::{LoanRepository, LoanService};

/// Canonical implementation of the [LoanService] port.
///
/// Every precondition is checked before the first write, so a failed call leaves both stores
/// untouched.
#[derive(Debug, Clone)]
pub struct Service<D: DeviceRepository, L: LoanRepository> {
    devices: D,
    loans: L,
}

impl<D: DeviceRepository, L: LoanRepository> Service<D, L> {
    pub fn new(devices: D, loans: L) -> Self {
        Self { devices, loans }
    }
}

impl<D: DeviceRepository, L: LoanRepository> LoanService for Service<D, L> {
    async fn register_loan(&self, req: &RegisterLoanRequest) -> Result<Loan, RegisterLoanError> {
        let device_id = *req.device_id();
        let device = self
            .devices
            .find_device_by_id(&device_id)
            .await?
            .ok_or(RegisterLoanError::DeviceNotFound { device_id })?;

        if !device.is_available() {
            return Err(RegisterLoanError::DeviceNotAvailable { device_id });
        }

        let loan = Loan::open(req, Utc::now());
        self.loans.save_new_loan(&loan).await?;

        tracing::info!(loan_id = %loan.id(), %device_id, "device loaned");
        Ok(loan)
    }

    async fn mark_as_returned(&self, id: &LoanId) -> Result<Loan, MarkAsReturnedError> {
        let mut loan = self
            .loans
            .find_loan_by_id(id)
            .await?
            .ok_or(MarkAsReturnedError::LoanNotFound { id: *id })?;

        if loan.is_returned() {
            return Err(MarkAsReturnedError::AlreadyReturned { id: *id });
        }

        let device_id = *loan.device_id();
        if self.devices.find_device_by_id(&device_id).await?.is_none() {
            return Err(MarkAsReturnedError::DeviceNotFound { device_id });
        }

        loan.mark_returned(Utc::now());
        self.loans.save_returned_loan(&loan).await?;

        tracing::info!(loan_id = %id, %device_id, "loan returned");
        Ok(loan)
    }

    async fn get_all_loans(&self) -> Result<Vec<Loan>, GetLoansError> {
        Ok(self.loans.list_loans().await?)
    }

    async fn get_loan_by_id(&self, id: &LoanId) -> Result<Option<Loan>, GetLoansError> {
        Ok(self.loans.find_loan_by_id(id).await?)
    }

    async fn get_loans_by_device_id(
        &self,
        device_id: &DeviceId,
    ) -> Result<Vec<Loan>, GetLoansError> {
        Ok(self.loans.list_loans_by_device_id(device_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeDelta;

    use super::*;
    use crate::domain::device::models::device::DeviceStatus;
    use crate::domain::fakes::{InMemoryRepository, device_with_status};

    fn make_service(repo: &InMemoryRepository) -> Service<InMemoryRepository, InMemoryRepository> {
        Service::new(repo.clone(), repo.clone())
    }

    fn loan_request(device_id: DeviceId) -> RegisterLoanRequest {
        RegisterLoanRequest::new(
            device_id,
            "Laura Gomez".to_string(),
            Some(Utc::now() + TimeDelta::days(7)),
        )
    }

    fn stored_loan(device_id: DeviceId, returned: bool) -> Loan {
        let mut loan = Loan::open(&loan_request(device_id), Utc::now());
        if returned {
            loan.mark_returned(Utc::now());
        }
        loan
    }

    #[tokio::test]
    async fn test_register_loan_ok() {
        let repo = InMemoryRepository::default();
        let device = device_with_status(DeviceStatus::Available);
        repo.insert_device(device.clone());
        let svc = make_service(&repo);

        let loan = svc.register_loan(&loan_request(*device.id())).await.unwrap();

        assert!(!loan.is_returned());
        assert_eq!(loan.device_id(), device.id());
        assert_eq!(repo.device(device.id()).unwrap().status(), DeviceStatus::Loaned);
        assert_eq!(repo.loan(loan.id()), Some(loan));
        assert_eq!(repo.loan_writes(), 1);
        assert_eq!(repo.device_writes(), 1);
    }

    #[tokio::test]
    async fn test_register_loan_device_not_found() {
        let repo = InMemoryRepository::default();
        let svc = make_service(&repo);

        let err = svc
            .register_loan(&loan_request(DeviceId::generate()))
            .await
            .unwrap_err();

        assert!(matches!(err, RegisterLoanError::DeviceNotFound { .. }));
        assert_eq!(err.to_string(), "Device not found");
        assert_eq!(repo.loan_writes(), 0);
        assert_eq!(repo.device_writes(), 0);
    }

    #[tokio::test]
    async fn test_register_loan_device_busy() {
        let repo = InMemoryRepository::default();
        let device = device_with_status(DeviceStatus::Loaned);
        repo.insert_device(device.clone());
        let svc = make_service(&repo);

        let err = svc
            .register_loan(&loan_request(*device.id()))
            .await
            .unwrap_err();

        assert!(matches!(err, RegisterLoanError::DeviceNotAvailable { .. }));
        assert_eq!(err.to_string(), "Device is not available for loan");
        assert_eq!(repo.loan_writes(), 0);
        assert_eq!(repo.device_writes(), 0);
    }

    #[tokio::test]
    async fn test_second_loan_on_same_device_is_rejected() {
        let repo = InMemoryRepository::default();
        let device = device_with_status(DeviceStatus::Available);
        repo.insert_device(device.clone());
        let svc = make_service(&repo);

        svc.register_loan(&loan_request(*device.id())).await.unwrap();
        let err = svc
            .register_loan(&loan_request(*device.id()))
            .await
            .unwrap_err();

        assert!(matches!(err, RegisterLoanError::DeviceNotAvailable { .. }));
        assert_eq!(repo.loan_writes(), 1);
    }

    #[tokio::test]
    async fn test_mark_as_returned_ok() {
        let repo = InMemoryRepository::default();
        let device = device_with_status(DeviceStatus::Loaned);
        let loan = stored_loan(*device.id(), false);
        repo.insert_device(device.clone());
        repo.insert_loan(loan.clone());
        let svc = make_service(&repo);

        let returned = svc.mark_as_returned(loan.id()).await.unwrap();

        assert!(returned.is_returned());
        assert!(returned.end_date().is_some());
        assert_ne!(returned.end_date(), loan.end_date());
        assert_eq!(repo.device(device.id()).unwrap().status(), DeviceStatus::Available);
        assert_eq!(repo.loan(loan.id()), Some(returned));
        assert_eq!(repo.loan_writes(), 1);
        assert_eq!(repo.device_writes(), 1);
    }

    #[tokio::test]
    async fn test_mark_as_returned_loan_not_found() {
        let repo = InMemoryRepository::default();
        let svc = make_service(&repo);

        let err = svc
            .mark_as_returned(&LoanId::generate())
            .await
            .unwrap_err();

        assert!(matches!(err, MarkAsReturnedError::LoanNotFound { .. }));
        assert_eq!(err.to_string(), "Loan not found");
        assert_eq!(repo.loan_writes(), 0);
    }

    #[tokio::test]
    async fn test_mark_as_returned_twice_reports_conflict() {
        let repo = InMemoryRepository::default();
        let device = device_with_status(DeviceStatus::Loaned);
        let loan = stored_loan(*device.id(), false);
        repo.insert_device(device.clone());
        repo.insert_loan(loan.clone());
        let svc = make_service(&repo);

        svc.mark_as_returned(loan.id()).await.unwrap();
        let first_return = repo.loan(loan.id());

        for _ in 0..2 {
            let err = svc.mark_as_returned(loan.id()).await.unwrap_err();
            assert!(matches!(err, MarkAsReturnedError::AlreadyReturned { .. }));
            assert_eq!(err.to_string(), "Loan is already marked as returned");
        }

        assert_eq!(repo.loan(loan.id()), first_return);
        assert_eq!(repo.loan_writes(), 1);
        assert_eq!(repo.device_writes(), 1);
    }

    #[tokio::test]
    async fn test_mark_as_returned_already_returned_checked_before_device() {
        let repo = InMemoryRepository::default();
        let loan = stored_loan(DeviceId::generate(), true);
        repo.insert_loan(loan.clone());
        let svc = make_service(&repo);

        let err = svc.mark_as_returned(loan.id()).await.unwrap_err();

        assert!(matches!(err, MarkAsReturnedError::AlreadyReturned { .. }));
        assert_eq!(repo.loan_writes(), 0);
    }

    #[tokio::test]
    async fn test_mark_as_returned_device_not_found() {
        let repo = InMemoryRepository::default();
        let loan = stored_loan(DeviceId::generate(), false);
        repo.insert_loan(loan.clone());
        let svc = make_service(&repo);

        let err = svc.mark_as_returned(loan.id()).await.unwrap_err();

        assert!(matches!(err, MarkAsReturnedError::DeviceNotFound { .. }));
        assert_eq!(err.to_string(), "Device not found");
        assert_eq!(repo.loan(loan.id()), Some(loan));
        assert_eq!(repo.loan_writes(), 0);
        assert_eq!(repo.device_writes(), 0);
    }

    #[tokio::test]
    async fn test_get_all_loans() {
        let repo = InMemoryRepository::default();
        repo.insert_loan(stored_loan(DeviceId::generate(), false));
        repo.insert_loan(stored_loan(DeviceId::generate(), true));
        let svc = make_service(&repo);

        let loans = svc.get_all_loans().await.unwrap();

        assert_eq!(loans.len(), 2);
    }

    #[tokio::test]
    async fn test_get_loan_by_id() {
        let repo = InMemoryRepository::default();
        let loan = stored_loan(DeviceId::generate(), false);
        repo.insert_loan(loan.clone());
        let svc = make_service(&repo);

        assert_eq!(svc.get_loan_by_id(loan.id()).await.unwrap(), Some(loan));
        assert_eq!(
            svc.get_loan_by_id(&LoanId::generate()).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_get_loans_by_device_id() {
        let repo = InMemoryRepository::default();
        let device_id = DeviceId::generate();
        let first = stored_loan(device_id, true);
        let second = stored_loan(device_id, false);
        repo.insert_loan(first.clone());
        repo.insert_loan(second.clone());
        repo.insert_loan(stored_loan(DeviceId::generate(), false));
        let svc = make_service(&repo);

        let loans = svc.get_loans_by_device_id(&device_id).await.unwrap();

        let ids: HashSet<LoanId> = loans.iter().map(|loan| *loan.id()).collect();
        assert_eq!(ids, HashSet::from([*first.id(), *second.id()]));
        assert!(
            svc.get_loans_by_device_id(&DeviceId::generate())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_full_lifecycle_restores_availability() {
        let repo = InMemoryRepository::default();
        let device = device_with_status(DeviceStatus::Available);
        repo.insert_device(device.clone());
        let svc = make_service(&repo);

        let loan = svc.register_loan(&loan_request(*device.id())).await.unwrap();
        assert_eq!(repo.device(device.id()).unwrap().status(), DeviceStatus::Loaned);

        svc.mark_as_returned(loan.id()).await.unwrap();
        assert_eq!(repo.device(device.id()).unwrap().status(), DeviceStatus::Available);

        svc.register_loan(&loan_request(*device.id())).await.unwrap();
        assert_eq!(repo.device(device.id()).unwrap().status(), DeviceStatus::Loaned);
    }
}
