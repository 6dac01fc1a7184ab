use crate::domain::checkout::TransactionState;
use crate::domain::configuration::Configuration;
use crate::domain::device::PaymentDevice;
use crate::domain::ports::{
    ConfigReader, PaymentDeviceRepository, TransactionStateHandler, TransferInfoRepository,
};
use crate::domain::transfer_information::TransferInformation;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for transfer information, keyed by order transaction id.
#[derive(Default, Clone)]
pub struct InMemoryTransferInfoRepository {
    entries: Arc<RwLock<HashMap<String, TransferInformation>>>,
}

impl InMemoryTransferInfoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransferInfoRepository for InMemoryTransferInfoRepository {
    async fn create(&self, transaction_id: &str, info: TransferInformation) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(transaction_id.to_string(), info);
        Ok(())
    }

    async fn get(&self, transaction_id: &str) -> Result<Option<TransferInformation>> {
        let entries = self.entries.read().await;
        Ok(entries.get(transaction_id).cloned())
    }
}

/// A thread-safe in-memory vault of payment devices, keyed by provider type id.
#[derive(Default, Clone)]
pub struct InMemoryPaymentDeviceRepository {
    devices: Arc<RwLock<HashMap<String, PaymentDevice>>>,
}

impl InMemoryPaymentDeviceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentDeviceRepository for InMemoryPaymentDeviceRepository {
    async fn create(&self, device: PaymentDevice) -> Result<()> {
        let mut devices = self.devices.write().await;
        devices.insert(device.type_id.clone(), device);
        Ok(())
    }

    async fn exists(&self, type_id: &str) -> Result<bool> {
        let devices = self.devices.read().await;
        Ok(devices.contains_key(type_id))
    }

    async fn get_by_customer(&self, customer_id: &str) -> Result<Vec<PaymentDevice>> {
        let devices = self.devices.read().await;
        Ok(devices
            .values()
            .filter(|device| device.customer_id == customer_id)
            .cloned()
            .collect())
    }
}

/// Stand-in for the host's state machine that remembers every transition.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStateHandler {
    states: Arc<RwLock<HashMap<String, TransactionState>>>,
    transitions: Arc<RwLock<Vec<(String, TransactionState)>>>,
}

impl InMemoryTransactionStateHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every transition requested so far, in call order.
    pub async fn transitions(&self) -> Vec<(String, TransactionState)> {
        self.transitions.read().await.clone()
    }
}

#[async_trait]
impl TransactionStateHandler for InMemoryTransactionStateHandler {
    async fn current_state(&self, order_transaction_id: &str) -> Result<Option<TransactionState>> {
        let states = self.states.read().await;
        Ok(states.get(order_transaction_id).copied())
    }

    async fn transition(&self, order_transaction_id: &str, state: TransactionState) -> Result<()> {
        self.states
            .write()
            .await
            .insert(order_transaction_id.to_string(), state);
        self.transitions
            .write()
            .await
            .push((order_transaction_id.to_string(), state));
        Ok(())
    }
}

/// Configuration per sales channel with an optional default for channels
/// that have no entry of their own.
#[derive(Default, Clone, Debug)]
pub struct InMemoryConfigReader {
    default: Option<Configuration>,
    channels: HashMap<String, Configuration>,
}

impl InMemoryConfigReader {
    pub fn new(default: Option<Configuration>, channels: HashMap<String, Configuration>) -> Self {
        Self { default, channels }
    }

    pub fn with_default(configuration: Configuration) -> Self {
        Self::new(Some(configuration), HashMap::new())
    }

    /// Every configuration this reader can hand out.
    pub fn configurations(&self) -> impl Iterator<Item = &Configuration> {
        self.default.iter().chain(self.channels.values())
    }
}

#[async_trait]
impl ConfigReader for InMemoryConfigReader {
    async fn read(&self, sales_channel_id: &str) -> Result<Configuration> {
        self.channels
            .get(sales_channel_id)
            .or(self.default.as_ref())
            .cloned()
            .ok_or_else(|| {
                BridgeError::Configuration(format!(
                    "No configuration found for sales channel '{}'",
                    sales_channel_id
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::DeviceType;
    use crate::domain::payment::Charge;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_in_memory_transfer_info_repository() {
        let repository = InMemoryTransferInfoRepository::new();
        let info = TransferInformation::from_charge(&Charge {
            id: "s-chg-1".to_string(),
            amount: dec!(10.0),
            ..Charge::default()
        });

        repository.create("tx-1", info.clone()).await.unwrap();
        assert_eq!(repository.get("tx-1").await.unwrap(), Some(info));
        assert!(repository.get("tx-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_device_repository() {
        let repository = InMemoryPaymentDeviceRepository::new();
        repository
            .create(PaymentDevice::new("cust-1", DeviceType::CreditCard, "s-crd-1"))
            .await
            .unwrap();
        repository
            .create(PaymentDevice::new("cust-2", DeviceType::PaypalAccount, "s-ppl-1"))
            .await
            .unwrap();

        assert!(repository.exists("s-crd-1").await.unwrap());
        assert!(!repository.exists("s-crd-2").await.unwrap());
        assert_eq!(repository.get_by_customer("cust-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_config_reader_falls_back_to_default() {
        let channel = Configuration::new("pub-b2b", "priv-b2b");
        let reader = InMemoryConfigReader::new(
            Some(Configuration::new("pub-default", "priv-default")),
            HashMap::from([("b2b".to_string(), channel.clone())]),
        );

        assert_eq!(reader.read("b2b").await.unwrap(), channel);
        assert_eq!(reader.read("other").await.unwrap().public_key, "pub-default");

        let empty = InMemoryConfigReader::default();
        assert!(matches!(
            empty.read("other").await,
            Err(BridgeError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_state_handler_records_transitions() {
        let handler = InMemoryTransactionStateHandler::new();
        handler.transition("tx-1", TransactionState::Paid).await.unwrap();
        handler.fail("tx-2").await.unwrap();

        assert_eq!(
            handler.current_state("tx-2").await.unwrap(),
            Some(TransactionState::Failed)
        );
        assert_eq!(handler.transitions().await.len(), 2);
    }
}
