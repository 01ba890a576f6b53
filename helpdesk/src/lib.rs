//! In-memory helpdesk store: tickets, customers, agents and dashboard stats.
//!
//! A single [`TicketStore`] owns the data. Views call its async methods to
//! create, update and delete tickets and customers, and read lookups, the
//! recent activity feed and the [`queries`] built on top of the state.
//!
//! - Identifiers come from monotonic sequences and are never reused
//! - `Stats::open_tickets` and each customer's ticket counter are kept in
//!   step by the reducer
//! - Refused commands are recorded as `last_error`, never panics
//! - Status moves and customer deletes follow pluggable policies
//!
//! # Quick Start
//!
//! ```no_run
//! use helpdesk::{CustomerId, DeskConfig, TicketDraft, TicketPatch, TicketStatus, TicketStore};
//! use helpdesk_core::environment::SystemClock;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = TicketStore::new(&DeskConfig::default(), Arc::new(SystemClock));
//!
//! let id = store
//!     .add_ticket(TicketDraft::new("Printer on fire", CustomerId::new("CUST-001")))
//!     .await?
//!     .ok_or("ticket rejected")?;
//!
//! store.update_ticket(id, TicketPatch::status(TicketStatus::Resolved)).await?;
//!
//! for ticket in store.get_recent_activity().await {
//!     println!("{} {}", ticket.id, ticket.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod policy;
pub mod queries;
pub mod reducer;
pub mod seed;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigError, DeskConfig};
pub use policy::{
    CustomerDeletePolicy, GuardedTransitions, PermissiveTransitions, TransitionPolicy,
    TransitionRules,
};
pub use reducer::{DeskEnvironment, DeskReducer};
pub use seed::Seed;
pub use store::TicketStore;
pub use types::{
    Agent, AgentId, Customer, CustomerDraft, CustomerId, CustomerPatch, CustomerStatus,
    DeskAction, DeskState, ParseEnumError, Stats, Ticket, TicketDraft, TicketId, TicketPatch,
    TicketPriority, TicketStatus, TicketType,
};
