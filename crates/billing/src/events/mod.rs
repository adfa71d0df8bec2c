//! Billing events and the observer registry.
//!
//! Replaces implicit global signal dispatch with an explicit registry:
//! the caller that observes a domain occurrence (a new user identity, a
//! gateway payment notification) hands a [`BillingEvent`] to an
//! [`EventBus`], which invokes its registered handlers synchronously, in
//! registration order.
//!
//! [`CustomerProvisioner`] is the one built-in handler: it upserts the
//! Customer row when a user identity is created. Payment notifications
//! are extension points and have no default handlers.

use std::sync::Arc;

use async_trait::async_trait;

use samplestore_core::UserId;

use crate::db::CustomerStore;
use crate::error::Result;

/// A domain occurrence the billing module reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEvent {
    /// A user identity was created in the host application.
    UserCreated {
        /// The new user's identity.
        user_id: UserId,
    },
    /// The gateway reported a successful payment.
    PaymentCaptured {
        /// Gateway transaction identifier.
        transaction_id: String,
    },
    /// The gateway flagged a payment for review or failure.
    PaymentFlagged {
        /// Gateway transaction identifier.
        transaction_id: String,
        /// Gateway-provided reason.
        reason: String,
    },
}

/// A synchronous billing event observer.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// React to an event. Errors abort dispatch of the current event.
    async fn handle(&self, event: &BillingEvent) -> Result<()>;
}

/// Explicit observer registry.
///
/// Handlers run synchronously at the dispatch site, in registration
/// order. The first handler error aborts dispatch and is returned to the
/// caller.
#[derive(Default, Clone)]
pub struct EventBus {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bus with the built-in customer provisioning handler
    /// registered.
    #[must_use]
    pub fn with_customer_provisioning(customers: Arc<dyn CustomerStore>) -> Self {
        let mut bus = Self::new();
        bus.register(Arc::new(CustomerProvisioner::new(customers)));
        bus
    }

    /// Register a handler.
    pub fn register(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Dispatch an event to every registered handler.
    ///
    /// # Errors
    ///
    /// Returns the first handler error; later handlers are not invoked
    /// for this event.
    pub async fn dispatch(&self, event: &BillingEvent) -> Result<()> {
        for handler in &self.handlers {
            handler.handle(event).await?;
        }
        Ok(())
    }
}

/// Upserts the Customer row when a user identity is created.
///
/// Idempotent: repeated `UserCreated` events for the same user resolve to
/// the same row. Ignores all other events.
pub struct CustomerProvisioner {
    customers: Arc<dyn CustomerStore>,
}

impl CustomerProvisioner {
    /// Create a provisioner over a customer store.
    #[must_use]
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self { customers }
    }
}

#[async_trait]
impl EventHandler for CustomerProvisioner {
    async fn handle(&self, event: &BillingEvent) -> Result<()> {
        if let BillingEvent::UserCreated { user_id } = event {
            let customer = self.customers.ensure_customer(*user_id).await?;
            tracing::debug!(%user_id, customer_id = %customer.id, "customer provisioned");
        }
        Ok(())
    }
}
