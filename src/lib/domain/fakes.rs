//! In-memory implementations of the repository ports used by the service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::device::models::device::{
    CreateDeviceError, DeleteDeviceError, Device, DeviceId, DeviceName, DeviceStatus,
    GetAllDevicesError, UpdateDeviceStatusError,
};
use crate::domain::device::ports::DeviceRepository;
use crate::domain::loan::models::loan::{Loan, LoanId, MarkAsReturnedError, RegisterLoanError};
use crate::domain::loan::ports::LoanRepository;

#[derive(Debug, Default)]
struct Store {
    devices: HashMap<DeviceId, Device>,
    loans: HashMap<LoanId, Loan>,
    device_writes: usize,
    loan_writes: usize,
}

/// Backs both repository ports with one store so that loan writes can move device status the
/// way the SQLite adapter does. Seeding through `insert_*` is not counted as a write.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    store: Arc<Mutex<Store>>,
}

impl InMemoryRepository {
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    pub fn insert_device(&self, device: Device) {
        self.lock().devices.insert(*device.id(), device);
    }

    pub fn insert_loan(&self, loan: Loan) {
        self.lock().loans.insert(*loan.id(), loan);
    }

    pub fn device(&self, id: &DeviceId) -> Option<Device> {
        self.lock().devices.get(id).cloned()
    }

    pub fn loan(&self, id: &LoanId) -> Option<Loan> {
        self.lock().loans.get(id).cloned()
    }

    pub fn device_writes(&self) -> usize {
        self.lock().device_writes
    }

    pub fn loan_writes(&self) -> usize {
        self.lock().loan_writes
    }
}

pub fn device_with_status(status: DeviceStatus) -> Device {
    Device::new(
        DeviceId::generate(),
        DeviceName::new("Smartphone").unwrap(),
        Some("Mobile Devices".to_string()),
        Some("Tech Storage".to_string()),
        status,
        Utc::now(),
    )
}

impl DeviceRepository for InMemoryRepository {
    async fn create_device(&self, device: &Device) -> Result<(), CreateDeviceError> {
        let mut store = self.lock();
        store.devices.insert(*device.id(), device.clone());
        store.device_writes += 1;
        Ok(())
    }

    async fn find_device_by_id(&self, id: &DeviceId) -> Result<Option<Device>, anyhow::Error> {
        Ok(self.device(id))
    }

    async fn list_devices(&self) -> Result<Vec<Device>, GetAllDevicesError> {
        Ok(self.lock().devices.values().cloned().collect())
    }

    async fn update_device_status(
        &self,
        id: &DeviceId,
        status: DeviceStatus,
    ) -> Result<Device, UpdateDeviceStatusError> {
        let mut store = self.lock();
        let device = store
            .devices
            .get_mut(id)
            .ok_or(UpdateDeviceStatusError::NotFound { id: *id })?;
        device.set_status(status);
        let updated = device.clone();
        store.device_writes += 1;
        Ok(updated)
    }

    async fn delete_device(&self, id: &DeviceId) -> Result<(), DeleteDeviceError> {
        let mut store = self.lock();
        if !store.devices.contains_key(id) {
            return Err(DeleteDeviceError::NotFound { id: *id });
        }
        if store
            .loans
            .values()
            .any(|loan| loan.device_id() == id && !loan.is_returned())
        {
            return Err(DeleteDeviceError::ActiveLoans { id: *id });
        }
        store.devices.remove(id);
        store.device_writes += 1;
        Ok(())
    }
}

impl LoanRepository for InMemoryRepository {
    async fn find_loan_by_id(&self, id: &LoanId) -> Result<Option<Loan>, anyhow::Error> {
        Ok(self.loan(id))
    }

    async fn list_loans(&self) -> Result<Vec<Loan>, anyhow::Error> {
        Ok(self.lock().loans.values().cloned().collect())
    }

    async fn list_loans_by_device_id(&self, device_id: &DeviceId) -> Result<Vec<Loan>, anyhow::Error> {
        Ok(self
            .lock()
            .loans
            .values()
            .filter(|loan| loan.device_id() == device_id)
            .cloned()
            .collect())
    }

    async fn save_new_loan(&self, loan: &Loan) -> Result<(), RegisterLoanError> {
        let mut store = self.lock();
        let device_id = *loan.device_id();
        let device = store
            .devices
            .get_mut(&device_id)
            .ok_or(RegisterLoanError::DeviceNotFound { device_id })?;
        if !device.is_available() {
            return Err(RegisterLoanError::DeviceNotAvailable { device_id });
        }
        device.set_status(DeviceStatus::Loaned);
        store.loans.insert(*loan.id(), loan.clone());
        store.loan_writes += 1;
        store.device_writes += 1;
        Ok(())
    }

    async fn save_returned_loan(&self, loan: &Loan) -> Result<(), MarkAsReturnedError> {
        let mut store = self.lock();
        let id = *loan.id();
        let device_id = *loan.device_id();
        match store.loans.get(&id) {
            None => return Err(MarkAsReturnedError::LoanNotFound { id }),
            Some(stored) if stored.is_returned() => {
                return Err(MarkAsReturnedError::AlreadyReturned { id });
            }
            Some(_) => {}
        }
        let device = store
            .devices
            .get_mut(&device_id)
            .ok_or(MarkAsReturnedError::DeviceNotFound { device_id })?;
        device.set_status(DeviceStatus::Available);
        store.loans.insert(id, loan.clone());
        store.loan_writes += 1;
        store.device_writes += 1;
        Ok(())
    }
}
