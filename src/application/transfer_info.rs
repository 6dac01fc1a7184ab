use crate::domain::payment::{Charge, Payment};
use crate::domain::ports::TransferInfoRepository;
use crate::domain::transfer_information::TransferInformation;
use crate::error::{BridgeError, Result};

/// Extracts the transfer details from `charge` and stores them for the transaction.
pub async fn save_transfer_info(
    repository: &dyn TransferInfoRepository,
    transaction_id: &str,
    charge: &Charge,
) -> Result<TransferInformation> {
    let info = TransferInformation::from_charge(charge);
    repository.create(transaction_id, info.clone()).await?;
    Ok(info)
}

/// Same as [`save_transfer_info`] for the first charge booked on `payment`.
pub async fn save_transfer_info_from_payment(
    repository: &dyn TransferInfoRepository,
    transaction_id: &str,
    payment: &Payment,
) -> Result<TransferInformation> {
    let charge = payment.first_charge().ok_or_else(|| {
        BridgeError::Validation(format!("Payment {} has not been charged", payment.id))
    })?;

    save_transfer_info(repository, transaction_id, charge).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentState;
    use crate::infrastructure::in_memory::InMemoryTransferInfoRepository;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_uncharged_payment_is_rejected() {
        let repository = InMemoryTransferInfoRepository::new();
        let payment = Payment {
            id: "s-pay-1".to_string(),
            order_id: "tx-1".to_string(),
            state: PaymentState::Pending,
            authorization: None,
            charges: vec![],
        };

        let result = save_transfer_info_from_payment(&repository, "tx-1", &payment).await;
        assert!(matches!(result, Err(BridgeError::Validation(_))));
        assert!(repository.get("tx-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_first_charge_is_persisted() {
        let repository = InMemoryTransferInfoRepository::new();
        let payment = Payment {
            id: "s-pay-1".to_string(),
            order_id: "tx-1".to_string(),
            state: PaymentState::Pending,
            authorization: None,
            charges: vec![Charge {
                id: "s-chg-1".to_string(),
                amount: dec!(19.999),
                iban: Some("DE89370400440532013000".to_string()),
                ..Charge::default()
            }],
        };

        let info = save_transfer_info_from_payment(&repository, "tx-1", &payment)
            .await
            .unwrap();
        assert_eq!(info.amount(), dec!(20.00));
        assert_eq!(repository.get("tx-1").await.unwrap(), Some(info));
    }
}
