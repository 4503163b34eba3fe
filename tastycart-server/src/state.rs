//! Application state shared across all request handlers.

use crate::config::runtime::SharedConfig;
use sqlx::PgPool;
use std::sync::Arc;
use tastycart_core::framework::DatabaseProcessor;
use tastycart_core::gateway::{PaymentGateway, RazorpayClient};
use tastycart_core::identity::{FirebaseVerifier, IdentityVerifier};
use tastycart_core::notify::{HttpMailer, Notifier};
use tastycart_core::services::{OrderLifecycleManager, PaymentVerifier, WebhookReconciler};
use tastycart_core::store::PgStore;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
    pub lifecycle: OrderLifecycleManager<PgStore>,
    pub verifier: PaymentVerifier<PgStore>,
    pub reconciler: WebhookReconciler<PgStore>,
    /// Customer bearer token verification.
    pub identity: Arc<dyn IdentityVerifier>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Wire the production collaborators around `db` and `config`.
    pub fn new(db: PgPool, config: SharedConfig) -> Self {
        let gateway: Arc<dyn PaymentGateway> =
            Arc::new(RazorpayClient::new(config.gateway.clone()));
        let identity: Arc<dyn IdentityVerifier> =
            Arc::new(FirebaseVerifier::new(config.identity.clone()));
        let notifier: Arc<dyn Notifier> = Arc::new(HttpMailer::new(config.mail.clone()));
        Self::with_collaborators(db, config, gateway, identity, notifier)
    }

    pub fn with_collaborators(
        db: PgPool,
        config: SharedConfig,
        gateway: Arc<dyn PaymentGateway>,
        identity: Arc<dyn IdentityVerifier>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let store = PgStore::new(db.clone());
        Self {
            lifecycle: OrderLifecycleManager::new(store.clone(), gateway.clone()),
            verifier: PaymentVerifier::new(store.clone(), gateway, notifier.clone()),
            reconciler: WebhookReconciler::new(store, config.gateway.clone()),
            db,
            config,
            identity,
            notifier,
        }
    }

    /// Processor for the plain CRUD queries.
    pub fn db(&self) -> DatabaseProcessor {
        DatabaseProcessor {
            pool: self.db.clone(),
        }
    }
}
