//! Reducer for the helpdesk.
//!
//! Commands are validated, turned into events and applied. Every counter
//! the store maintains (`Stats::open_tickets` and `Customer::tickets`) is
//! adjusted only in [`DeskReducer::apply_event`], so replayed events keep
//! them consistent too.

use crate::policy::{CustomerDeletePolicy, PermissiveTransitions, TransitionPolicy};
use crate::types::{
    Customer, CustomerDraft, CustomerId, CustomerPatch, DeskAction, DeskState, Ticket,
    TicketDraft, TicketId, TicketPatch,
};
use chrono::Duration;
use helpdesk_core::{effect::Effect, environment::Clock, reducer::Reducer, SmallVec};
use std::sync::Arc;

/// Environment dependencies for the helpdesk reducer
#[derive(Clone)]
pub struct DeskEnvironment {
    /// Clock for timestamps and join dates
    pub clock: Arc<dyn Clock>,
    /// Which status moves are accepted
    pub transitions: Arc<dyn TransitionPolicy>,
    /// What deleting a customer does to its tickets
    pub customer_delete: CustomerDeletePolicy,
}

impl DeskEnvironment {
    /// Permissive transitions and orphaning deletes
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            transitions: Arc::new(PermissiveTransitions),
            customer_delete: CustomerDeletePolicy::default(),
        }
    }

    /// Replace the transition policy
    #[must_use]
    pub fn with_transitions(mut self, transitions: Arc<dyn TransitionPolicy>) -> Self {
        self.transitions = transitions;
        self
    }

    /// Replace the customer delete policy
    #[must_use]
    pub const fn with_customer_delete(mut self, policy: CustomerDeletePolicy) -> Self {
        self.customer_delete = policy;
        self
    }
}

/// Reducer for tickets and customers
#[derive(Clone, Debug, Default)]
pub struct DeskReducer;

impl DeskReducer {
    /// Creates a new `DeskReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_add_ticket(draft: &TicketDraft) -> Result<(), String> {
        if draft.title.trim().is_empty() {
            return Err("Ticket title is required".to_string());
        }
        Ok(())
    }

    fn validate_update_ticket(
        ticket: &Ticket,
        patch: &TicketPatch,
        transitions: &dyn TransitionPolicy,
    ) -> Result<(), String> {
        if patch.title.as_ref().is_some_and(|t| t.trim().is_empty()) {
            return Err("Ticket title is required".to_string());
        }

        if let Some(to) = patch.status {
            let from = ticket.status;
            if from != to && !transitions.allows(from, to) {
                return Err(format!(
                    "Cannot move ticket {} from {from} to {to}",
                    ticket.id
                ));
            }
        }

        Ok(())
    }

    fn validate_add_customer(draft: &CustomerDraft) -> Result<(), String> {
        if draft.name.trim().is_empty() {
            return Err("Customer name is required".to_string());
        }
        Ok(())
    }

    fn validate_update_customer(patch: &CustomerPatch) -> Result<(), String> {
        if patch.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err("Customer name is required".to_string());
        }
        Ok(())
    }

    /// Decides which tickets go with the customer, or refuses the delete
    fn tickets_to_cascade(
        state: &DeskState,
        id: &CustomerId,
        policy: CustomerDeletePolicy,
    ) -> Result<Vec<TicketId>, String> {
        match policy {
            CustomerDeletePolicy::Orphan => Ok(Vec::new()),
            CustomerDeletePolicy::Cascade => Ok(state
                .tickets_for_customer(id)
                .map(|t| t.id.clone())
                .collect()),
            CustomerDeletePolicy::Block => {
                let remaining = state.tickets_for_customer(id).count();
                if remaining > 0 {
                    Err(format!("Customer {id} still has {remaining} ticket(s)"))
                } else {
                    Ok(Vec::new())
                }
            },
        }
    }

    fn reject(state: &mut DeskState, reason: String) -> SmallVec<[Effect<DeskAction>; 4]> {
        tracing::warn!(%reason, "Command rejected");
        Self::apply_event(state, &DeskAction::CommandRejected { reason });
        SmallVec::new()
    }

    fn commit(state: &mut DeskState, event: &DeskAction) -> SmallVec<[Effect<DeskAction>; 4]> {
        tracing::debug!(event = event.event_type(), "Applying event");
        Self::apply_event(state, event);
        SmallVec::new()
    }

    /// Applies an event to state
    fn apply_event(state: &mut DeskState, action: &DeskAction) {
        match action {
            DeskAction::TicketCreated { ticket } => {
                if state.ticket(&ticket.id).is_some() {
                    tracing::debug!(ticket_id = %ticket.id, "Create ignored: duplicate ticket id");
                    return;
                }
                if let Some(seq) = ticket.id.sequence() {
                    state.next_ticket_seq = state.next_ticket_seq.max(seq + 1);
                }
                if ticket.is_open() {
                    state.stats.open_tickets += 1;
                }
                adjust_customer_tickets(state, &ticket.customer_id, 1);
                state.tickets.push(ticket.clone());
                state.last_error = None;
            },
            DeskAction::TicketUpdated {
                id,
                patch,
                updated_at,
            } => {
                let Some(ticket) = state.tickets.iter_mut().find(|t| &t.id == id) else {
                    return;
                };
                let was_open = ticket.is_open();
                let old_customer = ticket.customer_id.clone();

                ticket.apply(patch, *updated_at);

                let is_open = ticket.is_open();
                let new_customer = ticket.customer_id.clone();

                match (was_open, is_open) {
                    (false, true) => state.stats.open_tickets += 1,
                    (true, false) => {
                        state.stats.open_tickets = state.stats.open_tickets.saturating_sub(1);
                    },
                    _ => {},
                }
                if old_customer != new_customer {
                    adjust_customer_tickets(state, &old_customer, -1);
                    adjust_customer_tickets(state, &new_customer, 1);
                }
                state.last_error = None;
            },
            DeskAction::TicketDeleted { id } => {
                remove_ticket(state, id);
                state.last_error = None;
            },
            DeskAction::CustomerCreated { customer } => {
                if state.customer(&customer.id).is_some() {
                    tracing::debug!(
                        customer_id = %customer.id,
                        "Create ignored: duplicate customer id"
                    );
                    return;
                }
                if let Some(seq) = customer.id.sequence() {
                    state.next_customer_seq = state.next_customer_seq.max(seq + 1);
                }
                // Tickets filed against the id before the customer existed
                let existing = state.tickets_for_customer(&customer.id).count();
                let mut customer = customer.clone();
                customer.tickets = u32::try_from(existing).unwrap_or(u32::MAX);
                state.customers.push(customer);
                state.last_error = None;
            },
            DeskAction::CustomerUpdated { id, patch } => {
                if let Some(customer) = state.customers.iter_mut().find(|c| &c.id == id) {
                    customer.apply(patch);
                }
                state.last_error = None;
            },
            DeskAction::CustomerDeleted { id, cascaded } => {
                for ticket_id in cascaded {
                    remove_ticket(state, ticket_id);
                }
                state.customers.retain(|c| &c.id != id);
                state.last_error = None;
            },
            DeskAction::CommandRejected { reason } => {
                state.last_error = Some(reason.clone());
            },
            // Commands are not applied to state
            DeskAction::AddTicket { .. }
            | DeskAction::UpdateTicket { .. }
            | DeskAction::DeleteTicket { .. }
            | DeskAction::AddCustomer { .. }
            | DeskAction::UpdateCustomer { .. }
            | DeskAction::DeleteCustomer { .. } => {},
        }
    }
}

/// Removes a ticket and undoes its contribution to both counters
fn remove_ticket(state: &mut DeskState, id: &TicketId) {
    let Some(index) = state.tickets.iter().position(|t| &t.id == id) else {
        return;
    };
    let ticket = state.tickets.remove(index);
    if ticket.is_open() {
        state.stats.open_tickets = state.stats.open_tickets.saturating_sub(1);
    }
    adjust_customer_tickets(state, &ticket.customer_id, -1);
}

/// Moves a customer's ticket counter by one; unknown customers are ignored
fn adjust_customer_tickets(state: &mut DeskState, id: &CustomerId, delta: i8) {
    let Some(customer) = state.customers.iter_mut().find(|c| &c.id == id) else {
        return;
    };
    customer.tickets = if delta >= 0 {
        customer.tickets.saturating_add(delta.unsigned_abs().into())
    } else {
        customer.tickets.saturating_sub(delta.unsigned_abs().into())
    };
}

impl Reducer for DeskReducer {
    type State = DeskState;
    type Action = DeskAction;
    type Environment = DeskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            DeskAction::AddTicket { draft } => {
                if let Err(reason) = Self::validate_add_ticket(&draft) {
                    return Self::reject(state, reason);
                }

                let id = TicketId::from_sequence(state.next_ticket_seq);
                let ticket = Ticket::from_draft(id, draft, env.clock.now());
                Self::commit(state, &DeskAction::TicketCreated { ticket })
            },

            DeskAction::UpdateTicket { id, patch } => {
                let Some(ticket) = state.ticket(&id) else {
                    tracing::debug!(ticket_id = %id, "Update ignored: unknown ticket");
                    return SmallVec::new();
                };
                if let Err(reason) =
                    Self::validate_update_ticket(ticket, &patch, env.transitions.as_ref())
                {
                    return Self::reject(state, reason);
                }

                // Strictly after the previous stamp, even if the clock steps back
                let updated_at = env
                    .clock
                    .now()
                    .max(ticket.updated_at + Duration::microseconds(1));
                let event = DeskAction::TicketUpdated {
                    id,
                    patch,
                    updated_at,
                };
                Self::commit(state, &event)
            },

            DeskAction::DeleteTicket { id } => {
                if state.ticket(&id).is_none() {
                    tracing::debug!(ticket_id = %id, "Delete ignored: unknown ticket");
                    return SmallVec::new();
                }
                Self::commit(state, &DeskAction::TicketDeleted { id })
            },

            DeskAction::AddCustomer { draft } => {
                if let Err(reason) = Self::validate_add_customer(&draft) {
                    return Self::reject(state, reason);
                }

                let id = CustomerId::from_sequence(state.next_customer_seq);
                let customer = Customer::from_draft(id, draft, env.clock.now());
                Self::commit(state, &DeskAction::CustomerCreated { customer })
            },

            DeskAction::UpdateCustomer { id, patch } => {
                if state.customer(&id).is_none() {
                    tracing::debug!(customer_id = %id, "Update ignored: unknown customer");
                    return SmallVec::new();
                }
                if let Err(reason) = Self::validate_update_customer(&patch) {
                    return Self::reject(state, reason);
                }
                Self::commit(state, &DeskAction::CustomerUpdated { id, patch })
            },

            DeskAction::DeleteCustomer { id } => {
                if state.customer(&id).is_none() {
                    tracing::debug!(customer_id = %id, "Delete ignored: unknown customer");
                    return SmallVec::new();
                }
                match Self::tickets_to_cascade(state, &id, env.customer_delete) {
                    Ok(cascaded) => Self::commit(state, &DeskAction::CustomerDeleted { id, cascaded }),
                    Err(reason) => Self::reject(state, reason),
                }
            },

            // ========== Events ==========
            DeskAction::TicketCreated { .. }
            | DeskAction::TicketUpdated { .. }
            | DeskAction::TicketDeleted { .. }
            | DeskAction::CustomerCreated { .. }
            | DeskAction::CustomerUpdated { .. }
            | DeskAction::CustomerDeleted { .. }
            | DeskAction::CommandRejected { .. } => {
                // Replayed as-is, without validation
                Self::apply_event(state, &action);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::policy::GuardedTransitions;
    use crate::seed::sample_state;
    use crate::types::{TicketStatus, TicketType};
    use helpdesk_testing::mocks::FixedClock;
    use helpdesk_testing::{assertions, stepping_clock, test_clock, ReducerTest};

    fn test_env() -> DeskEnvironment {
        DeskEnvironment::new(Arc::new(test_clock()))
    }

    fn seeded() -> DeskState {
        sample_state(test_clock().now())
    }

    fn tkt(id: &str) -> TicketId {
        TicketId::new(id)
    }

    fn cust(id: &str) -> CustomerId {
        CustomerId::new(id)
    }

    #[test]
    fn add_ticket_assigns_next_id_and_counts() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::AddTicket {
                draft: TicketDraft::new("VPN drops every hour", cust("CUST-006")),
            })
            .then_state(|state| {
                let ticket = state.tickets.last().unwrap();
                assert_eq!(ticket.id.as_str(), "TKT-006");
                assert_eq!(ticket.created_at, test_clock().now());
                assert_eq!(ticket.updated_at, ticket.created_at);
                assert_eq!(state.stats.open_tickets, 128);
                assert_eq!(state.customer(&cust("CUST-006")).unwrap().tickets, 3);
                assert_eq!(state.next_ticket_seq, 7);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn add_ticket_with_non_open_status_leaves_open_count() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::AddTicket {
                draft: TicketDraft::new("Imported", cust("CUST-002"))
                    .with_status(TicketStatus::Closed),
            })
            .then_state(|state| {
                assert_eq!(state.stats.open_tickets, 127);
                assert_eq!(state.customer(&cust("CUST-002")).unwrap().tickets, 2);
            })
            .run();
    }

    #[test]
    fn add_ticket_for_unknown_customer_still_succeeds() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::AddTicket {
                draft: TicketDraft::new("Walk-in", cust("CUST-999")),
            })
            .then_state(|state| {
                assert_eq!(state.tickets.len(), 6);
                assert!(state.last_error.is_none());
            })
            .run();
    }

    #[test]
    fn blank_title_is_rejected() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::AddTicket {
                draft: TicketDraft::new("   ", cust("CUST-001")),
            })
            .then_state(|state| {
                assert_eq!(state.tickets.len(), 5);
                assert_eq!(state.stats.open_tickets, 127);
                assert_eq!(state.last_error.as_deref(), Some("Ticket title is required"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn success_clears_previous_error() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::AddTicket {
                draft: TicketDraft::new("", cust("CUST-001")),
            })
            .when_action(DeskAction::AddTicket {
                draft: TicketDraft::new("Real title", cust("CUST-001")),
            })
            .then_state(|state| assert!(state.last_error.is_none()))
            .run();
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::DeleteTicket { id: tkt("TKT-005") })
            .when_action(DeskAction::AddTicket {
                draft: TicketDraft::new("After delete", cust("CUST-001")),
            })
            .then_state(|state| {
                assert_eq!(state.tickets.len(), 5);
                assert_eq!(state.tickets.last().unwrap().id.as_str(), "TKT-006");
            })
            .run();
    }

    #[test]
    fn update_ticket_stamps_updated_at_with_stepping_clock() {
        let env = DeskEnvironment::new(Arc::new(stepping_clock()));
        let before = seeded().ticket(&tkt("TKT-001")).unwrap().updated_at;

        ReducerTest::new(DeskReducer::new())
            .with_env(env)
            .given_state(seeded())
            .when_action(DeskAction::UpdateTicket {
                id: tkt("TKT-001"),
                patch: TicketPatch::status(TicketStatus::Resolved),
            })
            .when_action(DeskAction::UpdateTicket {
                id: tkt("TKT-001"),
                patch: TicketPatch::default().with_title("Login broken on Safari"),
            })
            .then_state(move |state| {
                let ticket = state.ticket(&tkt("TKT-001")).unwrap();
                assert_eq!(ticket.status, TicketStatus::Resolved);
                assert_eq!(ticket.title, "Login broken on Safari");
                assert!(ticket.updated_at > before);
                assert_eq!(state.stats.open_tickets, 126);
            })
            .run();
    }

    #[test]
    fn reopening_increments_open_count() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::UpdateTicket {
                id: tkt("TKT-005"),
                patch: TicketPatch::status(TicketStatus::Open),
            })
            .then_state(|state| assert_eq!(state.stats.open_tickets, 128))
            .run();
    }

    #[test]
    fn non_status_update_leaves_open_count() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::UpdateTicket {
                id: tkt("TKT-003"),
                patch: TicketPatch::default().with_type(TicketType::Technical),
            })
            .then_state(|state| {
                assert_eq!(state.stats.open_tickets, 127);
                assert_eq!(
                    state.ticket(&tkt("TKT-003")).unwrap().ticket_type,
                    TicketType::Technical
                );
            })
            .run();
    }

    #[test]
    fn moving_ticket_moves_customer_counter() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::UpdateTicket {
                id: tkt("TKT-001"),
                patch: TicketPatch::default().with_customer(cust("CUST-006")),
            })
            .then_state(|state| {
                assert_eq!(state.customer(&cust("CUST-001")).unwrap().tickets, 2);
                assert_eq!(state.customer(&cust("CUST-006")).unwrap().tickets, 3);
            })
            .run();
    }

    #[test]
    fn update_unknown_ticket_changes_nothing() {
        let expected = seeded();
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::UpdateTicket {
                id: tkt("TKT-404"),
                patch: TicketPatch::status(TicketStatus::Closed),
            })
            .then_state(move |state| assert_eq!(state, &expected))
            .run();
    }

    #[test]
    fn guarded_transitions_reject_backward_move() {
        let env = test_env().with_transitions(Arc::new(GuardedTransitions));
        ReducerTest::new(DeskReducer::new())
            .with_env(env)
            .given_state(seeded())
            .when_action(DeskAction::UpdateTicket {
                id: tkt("TKT-004"),
                patch: TicketPatch::status(TicketStatus::InProgress)
                    .with_title("Should not land"),
            })
            .then_state(|state| {
                let ticket = state.ticket(&tkt("TKT-004")).unwrap();
                assert_eq!(ticket.status, TicketStatus::Waiting);
                assert_eq!(ticket.title, "Cannot export data to CSV");
                assert_eq!(
                    state.last_error.as_deref(),
                    Some("Cannot move ticket TKT-004 from Waiting to In Progress")
                );
            })
            .run();
    }

    #[test]
    fn delete_open_ticket_decrements_once() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::DeleteTicket { id: tkt("TKT-001") })
            .when_action(DeskAction::DeleteTicket { id: tkt("TKT-001") })
            .then_state(|state| {
                assert_eq!(state.stats.open_tickets, 126);
                assert_eq!(state.customer(&cust("CUST-001")).unwrap().tickets, 2);
                assert!(state.ticket(&tkt("TKT-001")).is_none());
            })
            .run();
    }

    #[test]
    fn delete_non_open_ticket_keeps_open_count() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::DeleteTicket { id: tkt("TKT-004") })
            .then_state(|state| assert_eq!(state.stats.open_tickets, 127))
            .run();
    }

    #[test]
    fn add_customer_assigns_id_and_join_date() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::AddCustomer {
                draft: CustomerDraft::new("Ada Lovelace", "ada@example.com"),
            })
            .then_state(|state| {
                let customer = state.customers.last().unwrap();
                assert_eq!(customer.id.as_str(), "CUST-007");
                assert_eq!(customer.join_date, "Jan 1, 2025");
                assert_eq!(customer.tickets, 0);
            })
            .run();
    }

    #[test]
    fn blank_customer_name_is_rejected() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::UpdateCustomer {
                id: cust("CUST-002"),
                patch: CustomerPatch::default().with_name(" "),
            })
            .then_state(|state| {
                assert_eq!(state.customer(&cust("CUST-002")).unwrap().name, "Emma Wilson");
                assert_eq!(state.last_error.as_deref(), Some("Customer name is required"));
            })
            .run();
    }

    #[test]
    fn orphan_delete_keeps_tickets() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::DeleteCustomer { id: cust("CUST-001") })
            .then_state(|state| {
                assert!(state.customer(&cust("CUST-001")).is_none());
                assert_eq!(state.tickets_for_customer(&cust("CUST-001")).count(), 1);
                assert_eq!(state.stats.open_tickets, 127);
            })
            .run();
    }

    #[test]
    fn cascade_delete_removes_tickets_with_counters() {
        let env = test_env().with_customer_delete(CustomerDeletePolicy::Cascade);
        ReducerTest::new(DeskReducer::new())
            .with_env(env)
            .given_state(seeded())
            .when_action(DeskAction::DeleteCustomer { id: cust("CUST-001") })
            .then_state(|state| {
                assert!(state.customer(&cust("CUST-001")).is_none());
                assert!(state.ticket(&tkt("TKT-001")).is_none());
                assert_eq!(state.tickets.len(), 4);
                assert_eq!(state.stats.open_tickets, 126);
            })
            .run();
    }

    #[test]
    fn block_delete_refuses_while_tickets_remain() {
        let env = test_env().with_customer_delete(CustomerDeletePolicy::Block);
        ReducerTest::new(DeskReducer::new())
            .with_env(env)
            .given_state(seeded())
            .when_action(DeskAction::DeleteCustomer { id: cust("CUST-001") })
            .when_action(DeskAction::DeleteCustomer { id: cust("CUST-006") })
            .then_state(|state| {
                assert!(state.customer(&cust("CUST-001")).is_some());
                assert!(state.customer(&cust("CUST-006")).is_none());
                assert!(state.last_error.is_none());
            })
            .run();
    }

    #[test]
    fn block_delete_records_reason() {
        let env = test_env().with_customer_delete(CustomerDeletePolicy::Block);
        ReducerTest::new(DeskReducer::new())
            .with_env(env)
            .given_state(seeded())
            .when_action(DeskAction::DeleteCustomer { id: cust("CUST-005") })
            .then_state(|state| {
                assert_eq!(
                    state.last_error.as_deref(),
                    Some("Customer CUST-005 still has 1 ticket(s)")
                );
            })
            .run();
    }

    #[test]
    fn replayed_events_apply_without_validation() {
        let ticket = Ticket::from_draft(
            TicketId::from_sequence(42),
            TicketDraft::new("Replayed", cust("CUST-003")),
            test_clock().now(),
        );
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::TicketCreated { ticket })
            .then_state(|state| {
                assert_eq!(state.next_ticket_seq, 43);
                assert_eq!(state.stats.open_tickets, 128);
                assert_eq!(state.customer(&cust("CUST-003")).unwrap().tickets, 3);
            })
            .run();
    }

    #[test]
    fn new_customer_counts_tickets_filed_before_it_existed() {
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::AddTicket {
                draft: TicketDraft::new("Filed early", cust("CUST-007")),
            })
            .when_action(DeskAction::AddCustomer {
                draft: CustomerDraft::new("Late Arrival", "late@example.com"),
            })
            .then_state(|state| {
                let customer = state.customer(&cust("CUST-007")).unwrap();
                assert_eq!(customer.tickets, 1);
                assert!(crate::queries::counter_drift(state)
                    .iter()
                    .all(|drift| drift.customer_id != cust("CUST-007")));
            })
            .run();
    }

    #[test]
    fn replayed_create_with_existing_ids_is_ignored() {
        let duplicate_ticket = Ticket::from_draft(
            tkt("TKT-001"),
            TicketDraft::new("Duplicate", cust("CUST-002")),
            test_clock().now(),
        );
        let duplicate_customer = Customer::from_draft(
            cust("CUST-001"),
            CustomerDraft::new("Duplicate", "dup@example.com"),
            test_clock().now(),
        );
        let expected = seeded();
        ReducerTest::new(DeskReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(DeskAction::TicketCreated {
                ticket: duplicate_ticket,
            })
            .when_action(DeskAction::CustomerCreated {
                customer: duplicate_customer,
            })
            .then_state(move |state| {
                assert_eq!(state, &expected);
                assert_eq!(state.tickets.iter().filter(|t| t.id == tkt("TKT-001")).count(), 1);
            })
            .run();
    }

    #[test]
    fn updated_at_advances_when_clock_steps_back() {
        let earlier = test_clock().now() - chrono::Duration::days(1);
        let env = DeskEnvironment::new(Arc::new(FixedClock::new(earlier)));
        let before = seeded().ticket(&tkt("TKT-001")).unwrap().updated_at;

        ReducerTest::new(DeskReducer::new())
            .with_env(env)
            .given_state(seeded())
            .when_action(DeskAction::UpdateTicket {
                id: tkt("TKT-001"),
                patch: TicketPatch::status(TicketStatus::InProgress),
            })
            .when_action(DeskAction::UpdateTicket {
                id: tkt("TKT-001"),
                patch: TicketPatch::status(TicketStatus::Waiting),
            })
            .then_state(move |state| {
                let ticket = state.ticket(&tkt("TKT-001")).unwrap();
                assert_eq!(ticket.updated_at, before + chrono::Duration::microseconds(2));
            })
            .run();
    }

    #[test]
    fn action_kinds_are_classified() {
        let command = DeskAction::DeleteTicket { id: tkt("TKT-001") };
        let event = DeskAction::TicketDeleted { id: tkt("TKT-001") };
        assert!(command.is_command());
        assert!(!command.is_event());
        assert!(event.is_event());
        assert_eq!(event.event_type(), "TicketDeleted.v1");
    }
}
