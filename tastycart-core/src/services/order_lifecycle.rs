use super::{PaymentError, finish};
use crate::entities::orders::{NewOrder, OrderRecord};
use crate::entities::users::UserRecord;
use crate::gateway::{PaymentGateway, RemoteOrderRequest};
use crate::identity::CallerIdentity;
use crate::store::{OrderStore, StoreTransaction};
use kanau::processor::Processor;
use std::collections::BTreeMap;
use std::sync::Arc;
use tastycart_sdk::objects::{CreateOrderRequest, GatewayOrder};
use tracing::{info, warn};
use validator::Validate;

/// Creates local orders paired with a remote gateway order.
#[derive(Clone)]
pub struct OrderLifecycleManager<S> {
    store: S,
    gateway: Arc<dyn PaymentGateway>,
}

impl<S: OrderStore> OrderLifecycleManager<S> {
    pub fn new(store: S, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { store, gateway }
    }
}

#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub request: CreateOrderRequest,
    pub caller: CallerIdentity,
}

#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub gateway_order: GatewayOrder,
    pub user: UserRecord,
    pub order: OrderRecord,
}

impl<S: OrderStore> OrderLifecycleManager<S> {
    async fn create_in_tx(
        &self,
        tx: &mut S::Tx,
        request: CreateOrderRequest,
        caller: &CallerIdentity,
    ) -> Result<CreatedOrder, PaymentError> {
        let user = tx
            .get_or_create_user(&caller.uid, caller.phone.as_deref())
            .await?;

        let gateway_order = self
            .gateway
            .create_remote_order(RemoteOrderRequest {
                amount: request.amount,
                currency: request.currency.clone(),
                receipt: request.receipt.clone(),
                notes: BTreeMap::from([("user_id".to_string(), user.uid.clone())]),
            })
            .await?;

        let new_order = NewOrder {
            gateway_order_id: gateway_order.id.clone(),
            user_id: user.uid.clone(),
            amount: request.amount,
            currency: request.currency,
            receipt: request.receipt,
            items: request.items,
            address: request.address,
        };
        let order = match tx.insert_order(new_order).await {
            Ok(order) => order,
            Err(e) => {
                // The remote order stays behind with no local row.
                warn!(
                    gateway_order_id = %gateway_order.id,
                    error = %e,
                    "Remote order created but local insert failed"
                );
                return Err(e.into());
            }
        };

        Ok(CreatedOrder {
            gateway_order,
            user,
            order,
        })
    }
}

impl<S: OrderStore> Processor<CreateOrder> for OrderLifecycleManager<S> {
    type Output = CreatedOrder;
    type Error = PaymentError;

    #[tracing::instrument(skip_all, err, fields(uid = %cmd.caller.uid, receipt = %cmd.request.receipt))]
    async fn process(&self, cmd: CreateOrder) -> Result<CreatedOrder, PaymentError> {
        cmd.request.validate().map_err(|e| PaymentError::validation(&e))?;

        let mut tx = self.store.begin().await?;
        let result = self.create_in_tx(&mut tx, cmd.request, &cmd.caller).await;
        let created = finish(tx, result).await?;

        info!(
            order_id = created.order.id,
            gateway_order_id = %created.gateway_order.id,
            amount = created.order.amount,
            "Order created"
        );
        Ok(created)
    }
}
