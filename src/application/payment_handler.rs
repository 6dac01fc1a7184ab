use super::device_vault::{can_save_to_device_vault, recurrence_type, save_to_device_vault};
use super::payment_methods::{PaymentMethod, Vaulting};
use super::transfer_info::save_transfer_info;
use crate::domain::checkout::{CheckoutData, PaymentTransaction, SalesChannelContext};
use crate::domain::configuration::{BookingMode, Configuration};
use crate::domain::payment::{PaymentType, TransactionRequest};
use crate::domain::ports::{
    SharedClientFactory, SharedPaymentDeviceRepository, SharedStateHandler,
    SharedTransferInfoRepository,
};
use crate::error::{BridgeError, PaymentProcessError, Result};
use tracing::{error, info};

/// Where the customer is sent to complete or confirm the payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub url: String,
}

/// Collaborators shared by every payment handler.
#[derive(Clone)]
pub struct PaymentServices {
    pub client_factory: SharedClientFactory,
    pub state_handler: SharedStateHandler,
    pub device_repository: SharedPaymentDeviceRepository,
    pub transfer_info_repository: SharedTransferInfoRepository,
}

/// Runs the checkout payment for one payment method.
///
/// The method decides booking mode, vaulting and transfer-info capture; the
/// handler owns the provider calls and the failure handling around them.
pub struct PaymentHandler<M: PaymentMethod> {
    method: M,
    services: PaymentServices,
}

impl<M: PaymentMethod> PaymentHandler<M> {
    pub fn new(method: M, services: PaymentServices) -> Self {
        Self { method, services }
    }

    pub fn method(&self) -> &M {
        &self.method
    }

    /// Charges or authorizes the checkout and returns the redirect target.
    ///
    /// # Errors
    ///
    /// * [`PaymentProcessError::ProviderProcess`] if the provider rejected a
    ///   call. The order transaction has been moved to the failed state.
    /// * [`PaymentProcessError::AsyncProcessInterrupted`] for a missing payment
    ///   resource or any other failure. The transaction state is left untouched.
    pub async fn pay(
        &self,
        transaction: &PaymentTransaction,
        checkout: &CheckoutData,
        sales_channel: &SalesChannelContext,
        configuration: &Configuration,
    ) -> std::result::Result<RedirectTarget, PaymentProcessError> {
        let Some(payment_type) = checkout.payment_type.as_ref() else {
            return Err(PaymentProcessError::AsyncProcessInterrupted {
                order_transaction_id: transaction.order_transaction_id.clone(),
                message: "Can not process payment without a valid payment resource.".to_string(),
            });
        };

        let booking_mode = self.method.booking_mode(configuration);
        let vaulting = self.vaulting_for(checkout, sales_channel);

        match self
            .book(
                transaction,
                checkout,
                sales_channel,
                configuration,
                payment_type,
                booking_mode,
                vaulting,
            )
            .await
        {
            Ok(url) => {
                info!(
                    target: "checkout_bridge::payment",
                    method = self.method.name(),
                    order_id = %transaction.order_id,
                    order_transaction_id = %transaction.order_transaction_id,
                    booking_mode = ?booking_mode,
                    "Payment booked at the provider"
                );
                Ok(RedirectTarget { url })
            }
            Err(BridgeError::Provider(api_error)) => {
                error!(
                    target: "checkout_bridge::payment",
                    kind = "api_exception",
                    method = self.method.name(),
                    order_id = %transaction.order_id,
                    order_transaction_id = %transaction.order_transaction_id,
                    return_url = %transaction.return_url,
                    payment_type_id = %payment_type.id,
                    booking_mode = ?booking_mode,
                    save_to_vault = vaulting.is_some(),
                    error = %api_error,
                    client_message = %api_error.client_message,
                    "Caught an API exception while processing the payment"
                );

                if let Err(e) = self
                    .services
                    .state_handler
                    .fail(&transaction.order_transaction_id)
                    .await
                {
                    error!(
                        target: "checkout_bridge::payment",
                        order_transaction_id = %transaction.order_transaction_id,
                        error = %e,
                        "Could not move the order transaction to the failed state"
                    );
                }

                Err(PaymentProcessError::ProviderProcess {
                    order_id: transaction.order_id.clone(),
                    order_transaction_id: transaction.order_transaction_id.clone(),
                    source: api_error,
                })
            }
            Err(e) => {
                error!(
                    target: "checkout_bridge::payment",
                    kind = "generic_exception",
                    method = self.method.name(),
                    order_id = %transaction.order_id,
                    order_transaction_id = %transaction.order_transaction_id,
                    return_url = %transaction.return_url,
                    payment_type_id = %payment_type.id,
                    error = %e,
                    details = ?e,
                    "Caught a generic exception while processing the payment"
                );

                Err(PaymentProcessError::AsyncProcessInterrupted {
                    order_transaction_id: transaction.order_transaction_id.clone(),
                    message: e.to_string(),
                })
            }
        }
    }

    fn vaulting_for(
        &self,
        checkout: &CheckoutData,
        sales_channel: &SalesChannelContext,
    ) -> Option<Vaulting> {
        self.method.vaulting().filter(|vaulting| {
            can_save_to_device_vault(
                checkout.has(vaulting.remember_key),
                sales_channel.customer.as_ref(),
            )
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn book(
        &self,
        transaction: &PaymentTransaction,
        checkout: &CheckoutData,
        sales_channel: &SalesChannelContext,
        configuration: &Configuration,
        payment_type: &PaymentType,
        booking_mode: BookingMode,
        vaulting: Option<Vaulting>,
    ) -> Result<String> {
        let client = self
            .services
            .client_factory
            .create_client(&configuration.private_key)?;

        let already_vaulted = self
            .services
            .device_repository
            .exists(&payment_type.id)
            .await?;

        let request = TransactionRequest {
            amount: checkout.basket.total_value_gross,
            currency: checkout.basket.currency.clone(),
            return_url: transaction.return_url.clone(),
            payment_type_id: payment_type.id.clone(),
            order_id: transaction.order_transaction_id.clone(),
            recurrence_type: recurrence_type(already_vaulted, vaulting.is_some()),
        };

        let redirect_url = match booking_mode {
            BookingMode::Charge => {
                let charge = client.charge(request).await?;
                if self.method.captures_transfer_info() {
                    save_transfer_info(
                        self.services.transfer_info_repository.as_ref(),
                        &transaction.order_transaction_id,
                        &charge,
                    )
                    .await?;
                }
                charge.redirect_url
            }
            BookingMode::Authorize => client.authorize(request).await?.redirect_url,
        };

        if let (Some(vaulting), Some(customer)) = (vaulting, sales_channel.customer.as_ref()) {
            save_to_device_vault(
                self.services.device_repository.as_ref(),
                customer,
                vaulting.device_type,
                payment_type,
            )
            .await?;
        }

        Ok(redirect_url.unwrap_or_else(|| transaction.return_url.clone()))
    }
}
