use crate::domain::checkout::Customer;
use crate::domain::device::{DeviceType, PaymentDevice};
use crate::domain::payment::{PaymentType, RecurrenceType};
use crate::domain::ports::PaymentDeviceRepository;
use crate::error::Result;
use tracing::debug;

/// Only registered customers may keep an instrument in the vault.
pub fn can_save_to_device_vault(remember_requested: bool, customer: Option<&Customer>) -> bool {
    remember_requested && customer.is_some_and(|customer| !customer.guest)
}

/// The provider must treat the transaction as one-click when the instrument
/// is already vaulted or is about to be.
pub fn recurrence_type(already_vaulted: bool, saving_to_vault: bool) -> Option<RecurrenceType> {
    (already_vaulted || saving_to_vault).then_some(RecurrenceType::OneClick)
}

/// Stores the instrument for the customer unless it is vaulted already.
pub async fn save_to_device_vault(
    repository: &dyn PaymentDeviceRepository,
    customer: &Customer,
    device_type: DeviceType,
    payment_type: &PaymentType,
) -> Result<()> {
    if repository.exists(&payment_type.id).await? {
        debug!(
            target: "checkout_bridge::vault",
            type_id = %payment_type.id,
            "Payment instrument is already vaulted"
        );
        return Ok(());
    }

    repository
        .create(PaymentDevice::new(
            customer.id.clone(),
            device_type,
            payment_type.id.clone(),
        ))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::InMemoryPaymentDeviceRepository;

    fn customer(guest: bool) -> Customer {
        Customer {
            id: "cust-1".to_string(),
            guest,
        }
    }

    #[test]
    fn test_vault_eligibility() {
        assert!(can_save_to_device_vault(true, Some(&customer(false))));
        assert!(!can_save_to_device_vault(true, Some(&customer(true))));
        assert!(!can_save_to_device_vault(true, None));
        assert!(!can_save_to_device_vault(false, Some(&customer(false))));
    }

    #[test]
    fn test_recurrence_type_truth_table() {
        for already_vaulted in [false, true] {
            for remember in [false, true] {
                for guest in [false, true] {
                    let saving = can_save_to_device_vault(remember, Some(&customer(guest)));
                    let expected = already_vaulted || (remember && !guest);
                    assert_eq!(
                        recurrence_type(already_vaulted, saving).is_some(),
                        expected,
                        "vaulted={already_vaulted} remember={remember} guest={guest}"
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn test_save_is_idempotent() {
        let repository = InMemoryPaymentDeviceRepository::new();
        let payment_type = PaymentType::new("s-crd-1");

        for _ in 0..2 {
            save_to_device_vault(&repository, &customer(false), DeviceType::CreditCard, &payment_type)
                .await
                .unwrap();
        }

        let devices = repository.get_by_customer("cust-1").await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].type_id, "s-crd-1");
    }
}
