use crate::domain::device::PaymentDevice;
use crate::domain::ports::{PaymentDeviceRepository, TransferInfoRepository};
use crate::domain::transfer_information::TransferInformation;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for transfer information, keyed by order transaction id.
pub const CF_TRANSFER_INFO: &str = "transfer_info";
/// Column Family for vaulted payment devices, keyed by provider type id.
pub const CF_PAYMENT_DEVICES: &str = "payment_devices";

/// A persistent store implementation using RocksDB.
///
/// Backs both the transfer-info and the payment-device repositories, each in
/// its own Column Family. `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at `path`, creating missing column families.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_transfer_info = ColumnFamilyDescriptor::new(CF_TRANSFER_INFO, Options::default());
        let cf_devices = ColumnFamilyDescriptor::new(CF_PAYMENT_DEVICES, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_transfer_info, cf_devices])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn column_family(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| BridgeError::Storage(format!("Column family '{}' not found", name)))
    }
}

#[async_trait]
impl TransferInfoRepository for RocksDBStore {
    async fn create(&self, transaction_id: &str, info: TransferInformation) -> Result<()> {
        let cf = self.column_family(CF_TRANSFER_INFO)?;
        let value = serde_json::to_vec(&info)?;
        self.db.put_cf(cf, transaction_id.as_bytes(), value)?;
        Ok(())
    }

    async fn get(&self, transaction_id: &str) -> Result<Option<TransferInformation>> {
        let cf = self.column_family(CF_TRANSFER_INFO)?;
        match self.db.get_cf(cf, transaction_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PaymentDeviceRepository for RocksDBStore {
    async fn create(&self, device: PaymentDevice) -> Result<()> {
        let cf = self.column_family(CF_PAYMENT_DEVICES)?;
        let value = serde_json::to_vec(&device)?;
        self.db.put_cf(cf, device.type_id.as_bytes(), value)?;
        Ok(())
    }

    async fn exists(&self, type_id: &str) -> Result<bool> {
        let cf = self.column_family(CF_PAYMENT_DEVICES)?;
        Ok(self.db.get_pinned_cf(cf, type_id.as_bytes())?.is_some())
    }

    async fn get_by_customer(&self, customer_id: &str) -> Result<Vec<PaymentDevice>> {
        let cf = self.column_family(CF_PAYMENT_DEVICES)?;

        let mut devices = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let device: PaymentDevice = serde_json::from_slice(&value)?;
            if device.customer_id == customer_id {
                devices.push(device);
            }
        }

        Ok(devices)
    }
}
