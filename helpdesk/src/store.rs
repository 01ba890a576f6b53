//! The `TicketStore` handle views talk to.
//!
//! Wraps the runtime [`Store`] with one async method per operation. Every
//! mutation goes through the reducer under the store's write lock; reads
//! take the read lock and clone out what they return.

use crate::config::DeskConfig;
use crate::reducer::{DeskEnvironment, DeskReducer};
use crate::types::{
    Agent, AgentId, Customer, CustomerDraft, CustomerId, CustomerPatch, DeskAction, DeskState,
    Stats, Ticket, TicketDraft, TicketId, TicketPatch,
};
use helpdesk_core::environment::Clock;
use helpdesk_runtime::{Store, StoreConfig, StoreError};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Runtime store specialised to the helpdesk
pub type DeskStore = Store<DeskState, DeskAction, DeskEnvironment, DeskReducer>;

/// Shared handle to the helpdesk state
///
/// Cheap to clone; every clone sees the same tickets and customers.
///
/// Mutators return `Err` only when the store is shutting down. Commands the
/// reducer refuses (blank title, blocked delete, illegal status move) are
/// recorded in [`TicketStore::last_error`] instead.
#[derive(Clone)]
pub struct TicketStore {
    store: DeskStore,
}

impl TicketStore {
    /// Builds a store from configuration, seeding it at the clock's current time
    #[must_use]
    pub fn new(config: &DeskConfig, clock: Arc<dyn Clock>) -> Self {
        let state = config.seed.state(clock.now());
        let env = DeskEnvironment::new(clock)
            .with_transitions(config.transitions.policy())
            .with_customer_delete(config.customer_delete);

        tracing::info!(
            seed = %config.seed,
            customer_delete = %config.customer_delete,
            transitions = %config.transitions,
            "Helpdesk store ready"
        );

        Self::from_parts(state, env, config.store_config())
    }

    /// Builds a store from an explicit state and environment
    #[must_use]
    pub fn from_parts(state: DeskState, env: DeskEnvironment, config: StoreConfig) -> Self {
        Self {
            store: Store::with_config(state, DeskReducer::new(), env, config),
        }
    }

    /// The underlying runtime store
    #[must_use]
    pub const fn inner(&self) -> &DeskStore {
        &self.store
    }

    // ========== Tickets ==========

    /// Creates a ticket and returns its id
    ///
    /// Returns `Ok(None)` if the draft was rejected; the reason is in
    /// [`TicketStore::last_error`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip(self, draft), fields(customer_id = %draft.customer_id))]
    pub async fn add_ticket(&self, draft: TicketDraft) -> Result<Option<TicketId>, StoreError> {
        let (_, id) = self
            .store
            .send_and_inspect(DeskAction::AddTicket { draft }, |state| {
                if state.last_error.is_some() {
                    None
                } else {
                    state.tickets.last().map(|t| t.id.clone())
                }
            })
            .await?;

        if let Some(id) = &id {
            tracing::info!(ticket_id = %id, "Ticket created");
        }
        Ok(id)
    }

    /// Merges `patch` into a ticket; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip(self, id, patch), fields(ticket_id = %id))]
    pub async fn update_ticket(&self, id: TicketId, patch: TicketPatch) -> Result<(), StoreError> {
        self.store
            .send(DeskAction::UpdateTicket { id, patch })
            .await
            .map(drop)
    }

    /// Removes a ticket; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip(self, id), fields(ticket_id = %id))]
    pub async fn delete_ticket(&self, id: TicketId) -> Result<(), StoreError> {
        self.store
            .send(DeskAction::DeleteTicket { id })
            .await
            .map(drop)
    }

    // ========== Customers ==========

    /// Creates a customer and returns its id
    ///
    /// Returns `Ok(None)` if the draft was rejected.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip(self, draft))]
    pub async fn add_customer(
        &self,
        draft: CustomerDraft,
    ) -> Result<Option<CustomerId>, StoreError> {
        let (_, id) = self
            .store
            .send_and_inspect(DeskAction::AddCustomer { draft }, |state| {
                if state.last_error.is_some() {
                    None
                } else {
                    state.customers.last().map(|c| c.id.clone())
                }
            })
            .await?;

        if let Some(id) = &id {
            tracing::info!(customer_id = %id, "Customer created");
        }
        Ok(id)
    }

    /// Merges `patch` into a customer; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip(self, id, patch), fields(customer_id = %id))]
    pub async fn update_customer(
        &self,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<(), StoreError> {
        self.store
            .send(DeskAction::UpdateCustomer { id, patch })
            .await
            .map(drop)
    }

    /// Removes a customer; what happens to its tickets depends on the
    /// configured delete policy
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip(self, id), fields(customer_id = %id))]
    pub async fn delete_customer(&self, id: CustomerId) -> Result<(), StoreError> {
        self.store
            .send(DeskAction::DeleteCustomer { id })
            .await
            .map(drop)
    }

    // ========== Reads ==========

    /// All tickets in collection order
    pub async fn tickets(&self) -> Vec<Ticket> {
        self.store.state(|s| s.tickets.clone()).await
    }

    /// All customers in collection order
    pub async fn customers(&self) -> Vec<Customer> {
        self.store.state(|s| s.customers.clone()).await
    }

    /// All agents
    pub async fn agents(&self) -> Vec<Agent> {
        self.store.state(|s| s.agents.clone()).await
    }

    /// Dashboard headline numbers
    pub async fn stats(&self) -> Stats {
        self.store.state(|s| s.stats.clone()).await
    }

    /// A ticket by id
    pub async fn get_ticket_by_id(&self, id: &TicketId) -> Option<Ticket> {
        self.store.state(|s| s.ticket(id).cloned()).await
    }

    /// A customer by id
    pub async fn get_customer_by_id(&self, id: &CustomerId) -> Option<Customer> {
        self.store.state(|s| s.customer(id).cloned()).await
    }

    /// An agent by id
    pub async fn get_agent_by_id(&self, id: &AgentId) -> Option<Agent> {
        self.store.state(|s| s.agent(id).cloned()).await
    }

    /// Tickets filed by a customer, in collection order
    ///
    /// Works for deleted customers too, as long as their tickets remain.
    pub async fn get_tickets_by_customer_id(&self, id: &CustomerId) -> Vec<Ticket> {
        self.store
            .state(|s| s.tickets_for_customer(id).cloned().collect())
            .await
    }

    /// Every ticket, most recently updated first
    pub async fn get_recent_activity(&self) -> Vec<Ticket> {
        self.store.state(DeskState::recent_activity).await
    }

    /// Why the most recent command was refused, if it was
    pub async fn last_error(&self) -> Option<String> {
        self.store.state(|s| s.last_error.clone()).await
    }

    /// A copy of the whole state
    pub async fn snapshot(&self) -> DeskState {
        self.store.state(Clone::clone).await
    }

    /// Runs a read-only computation against the current state
    ///
    /// ```ignore
    /// let workload = store.read(|s| queries::agent_workload(s, &agent)).await;
    /// ```
    pub async fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&DeskState) -> T,
    {
        self.store.state(f).await
    }

    /// Receives every action the store applies, from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeskAction> {
        self.store.subscribe_actions()
    }

    /// Stops accepting commands
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when the configured timeout expires.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.store.shutdown_default().await
    }
}
