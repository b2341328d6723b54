use std::str::FromStr;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool, Transaction};
use uuid::Uuid;

use crate::domain::device::models::device::{
    CreateDeviceError, DeleteDeviceError, GetAllDevicesError, UpdateDeviceStatusError,
};
use crate::domain::device::models::device::{Device, DeviceId, DeviceName, DeviceStatus};
use crate::domain::device::ports::DeviceRepository;
use crate::domain::loan::models::loan::{Loan, LoanId, MarkAsReturnedError, RegisterLoanError};
use crate::domain::loan::ports::LoanRepository;

#[derive(Debug, Clone)]
pub struct Sqlite {
    pool: SqlitePool,
}

impl Sqlite {
    pub async fn new(path: &str) -> Result<Sqlite, anyhow::Error> {
        let pool = SqlitePool::connect_with(
            SqliteConnectOptions::from_str(path)
                .with_context(|| format!("invalid database path {}", path))?
                .pragma("foreign_keys", "ON")
                .create_if_missing(true),
        )
        .await
        .with_context(|| format!("failed to open database at {}", path))?;

        Self::migrate(pool).await
    }

    /// Opens a private in-memory database. The pool is pinned to one connection that never
    /// expires, since the database lives only as long as that connection.
    pub async fn in_memory() -> Result<Sqlite, anyhow::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await
            .context("failed to open in-memory database")?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Sqlite, anyhow::Error> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        Ok(Sqlite { pool })
    }

    async fn begin(&self) -> Result<Transaction<'_, sqlx::Sqlite>, anyhow::Error> {
        self.pool
            .begin()
            .await
            .context("failed to start SQLite transaction")
    }

    async fn device_status(
        tx: &mut Transaction<'_, sqlx::Sqlite>,
        id: &DeviceId,
    ) -> Result<Option<DeviceStatus>, anyhow::Error> {
        let status: Option<String> = sqlx::query_scalar(SELECT_DEVICE_STATUS)
            .bind(id.to_string())
            .fetch_optional(&mut **tx)
            .await
            .with_context(|| format!("failed to read status of device {}", id))?;

        status
            .map(|raw| DeviceStatus::from_str(&raw))
            .transpose()
            .map_err(|e| anyhow!(e))
    }
}

/// Converts database rows into domain types without leaking sqlx into the domain.
struct DeviceRow(Device);

impl<'r> FromRow<'r, SqliteRow> for DeviceRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let device_type: Option<String> = row.try_get("type")?;
        let location: Option<String> = row.try_get("location")?;
        let status: String = row.try_get("status")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        let id = Uuid::try_parse(&id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let name = DeviceName::new(&name).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let status =
            DeviceStatus::from_str(&status).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Self(Device::new(
            DeviceId::from(id),
            name,
            device_type,
            location,
            status,
            created_at,
        )))
    }
}

struct LoanRow(Loan);

impl<'r> FromRow<'r, SqliteRow> for LoanRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let device_id: String = row.try_get("device_id")?;
        let borrowed_by: String = row.try_get("borrowed_by")?;
        let start_date: DateTime<Utc> = row.try_get("start_date")?;
        let end_date: Option<DateTime<Utc>> = row.try_get("end_date")?;
        let returned: bool = row.try_get("returned")?;

        let id = Uuid::try_parse(&id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let device_id =
            Uuid::try_parse(&device_id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Self(Loan::new(
            LoanId::from(id),
            DeviceId::from(device_id),
            borrowed_by,
            start_date,
            end_date,
            returned,
        )))
    }
}

const INSERT_DEVICE: &str = r"
    INSERT INTO devices (id, name, type, location, status, created_at)
    VALUES ($1, $2, $3, $4, $5, $6)
";
const SELECT_DEVICE_BY_ID: &str = "SELECT * FROM devices WHERE id = $1";
const SELECT_ALL_DEVICES: &str = "SELECT * FROM devices ORDER BY created_at";
const SELECT_DEVICE_STATUS: &str = "SELECT status FROM devices WHERE id = $1";
const UPDATE_DEVICE_STATUS: &str = "UPDATE devices SET status = $1 WHERE id = $2";
const LOAN_DEVICE: &str =
    "UPDATE devices SET status = 'LOANED' WHERE id = $1 AND status = 'AVAILABLE'";
const DELETE_DEVICE: &str = "DELETE FROM devices WHERE id = $1";

const INSERT_LOAN: &str = r"
    INSERT INTO loans (id, device_id, borrowed_by, start_date, end_date, returned)
    VALUES ($1, $2, $3, $4, $5, $6)
";
const SELECT_LOAN_BY_ID: &str = "SELECT * FROM loans WHERE id = $1";
const SELECT_ALL_LOANS: &str = "SELECT * FROM loans ORDER BY start_date";
const SELECT_LOANS_BY_DEVICE: &str =
    "SELECT * FROM loans WHERE device_id = $1 ORDER BY start_date";
const COUNT_ACTIVE_LOANS: &str =
    "SELECT COUNT(*) FROM loans WHERE device_id = $1 AND returned = FALSE";
const SELECT_LOAN_RETURNED: &str = "SELECT returned FROM loans WHERE id = $1";
const RETURN_LOAN: &str =
    "UPDATE loans SET returned = TRUE, end_date = $1 WHERE id = $2 AND returned = FALSE";

impl DeviceRepository for Sqlite {
    async fn create_device(&self, device: &Device) -> Result<(), CreateDeviceError> {
        sqlx::query(INSERT_DEVICE)
            .bind(device.id().to_string())
            .bind(device.name().to_string())
            .bind(device.device_type())
            .bind(device.location())
            .bind(device.status().to_string())
            .bind(device.created_at())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to save device {}", device.id()))?;

        Ok(())
    }

    async fn find_device_by_id(&self, id: &DeviceId) -> Result<Option<Device>, anyhow::Error> {
        let row: Option<DeviceRow> = sqlx::query_as(SELECT_DEVICE_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to fetch device {}", id))?;

        Ok(row.map(|r| r.0))
    }

    async fn list_devices(&self) -> Result<Vec<Device>, GetAllDevicesError> {
        let rows: Vec<DeviceRow> = sqlx::query_as(SELECT_ALL_DEVICES)
            .fetch_all(&self.pool)
            .await
            .context("failed to fetch devices")?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn update_device_status(
        &self,
        id: &DeviceId,
        status: DeviceStatus,
    ) -> Result<Device, UpdateDeviceStatusError> {
        let mut tx = self.begin().await?;

        let updated = sqlx::query(UPDATE_DEVICE_STATUS)
            .bind(status.to_string())
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to update status of device {}", id))?;

        if updated.rows_affected() == 0 {
            return Err(UpdateDeviceStatusError::NotFound { id: *id });
        }

        let row: DeviceRow = sqlx::query_as(SELECT_DEVICE_BY_ID)
            .bind(id.to_string())
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("failed to fetch device {}", id))?;

        tx.commit()
            .await
            .context("failed to commit SQLite transaction")?;

        Ok(row.0)
    }

    async fn delete_device(&self, id: &DeviceId) -> Result<(), DeleteDeviceError> {
        let mut tx = self.begin().await?;

        let active_loans: i64 = sqlx::query_scalar(COUNT_ACTIVE_LOANS)
            .bind(id.to_string())
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("failed to count active loans of device {}", id))?;

        if active_loans > 0 {
            return Err(DeleteDeviceError::ActiveLoans { id: *id });
        }

        let deleted = sqlx::query(DELETE_DEVICE)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to delete device {}", id))?;

        if deleted.rows_affected() == 0 {
            return Err(DeleteDeviceError::NotFound { id: *id });
        }

        tx.commit()
            .await
            .context("failed to commit SQLite transaction")?;

        Ok(())
    }
}

impl LoanRepository for Sqlite {
    async fn find_loan_by_id(&self, id: &LoanId) -> Result<Option<Loan>, anyhow::Error> {
        let row: Option<LoanRow> = sqlx::query_as(SELECT_LOAN_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to fetch loan {}", id))?;

        Ok(row.map(|r| r.0))
    }

    async fn list_loans(&self) -> Result<Vec<Loan>, anyhow::Error> {
        let rows: Vec<LoanRow> = sqlx::query_as(SELECT_ALL_LOANS)
            .fetch_all(&self.pool)
            .await
            .context("failed to fetch loans")?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn list_loans_by_device_id(
        &self,
        device_id: &DeviceId,
    ) -> Result<Vec<Loan>, anyhow::Error> {
        let rows: Vec<LoanRow> = sqlx::query_as(SELECT_LOANS_BY_DEVICE)
            .bind(device_id.to_string())
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to fetch loans of device {}", device_id))?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn save_new_loan(&self, loan: &Loan) -> Result<(), RegisterLoanError> {
        let device_id = *loan.device_id();
        let mut tx = self.begin().await?;

        sqlx::query(INSERT_LOAN)
            .bind(loan.id().to_string())
            .bind(device_id.to_string())
            .bind(loan.borrowed_by())
            .bind(loan.start_date())
            .bind(loan.end_date())
            .bind(loan.is_returned())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to save loan {}", loan.id()))?;

        // Only an AVAILABLE device may move to LOANED; anything else rolls the insert back.
        let loaned = sqlx::query(LOAN_DEVICE)
            .bind(device_id.to_string())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to update status of device {}", device_id))?;

        if loaned.rows_affected() == 0 {
            return match Self::device_status(&mut tx, &device_id).await? {
                None => Err(RegisterLoanError::DeviceNotFound { device_id }),
                Some(_) => Err(RegisterLoanError::DeviceNotAvailable { device_id }),
            };
        }

        tx.commit()
            .await
            .context("failed to commit SQLite transaction")?;

        Ok(())
    }

    async fn save_returned_loan(&self, loan: &Loan) -> Result<(), MarkAsReturnedError> {
        let id = *loan.id();
        let device_id = *loan.device_id();
        let returned_at = loan
            .end_date()
            .copied()
            .ok_or_else(|| anyhow!("returned loan {} has no end date", id))?;
        let mut tx = self.begin().await?;

        let closed = sqlx::query(RETURN_LOAN)
            .bind(returned_at)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to update loan {}", id))?;

        if closed.rows_affected() == 0 {
            let returned: Option<bool> = sqlx::query_scalar(SELECT_LOAN_RETURNED)
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .with_context(|| format!("failed to fetch loan {}", id))?;

            return match returned {
                None => Err(MarkAsReturnedError::LoanNotFound { id }),
                Some(_) => Err(MarkAsReturnedError::AlreadyReturned { id }),
            };
        }

        let released = sqlx::query(UPDATE_DEVICE_STATUS)
            .bind(DeviceStatus::Available.to_string())
            .bind(device_id.to_string())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to update status of device {}", device_id))?;

        if released.rows_affected() == 0 {
            return Err(MarkAsReturnedError::DeviceNotFound { device_id });
        }

        tx.commit()
            .await
            .context("failed to commit SQLite transaction")?;

        Ok(())
    }
}
