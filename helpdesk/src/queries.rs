//! Derived views over [`DeskState`].
//!
//! Pure functions; run them through [`TicketStore::read`](crate::TicketStore::read)
//! to get a consistent answer against the live store.

use crate::types::{
    Agent, AgentId, Customer, CustomerId, DeskState, Ticket, TicketPriority, TicketStatus,
    TicketType,
};
use serde::{Deserialize, Serialize};

/// Tickets of one type and their share of the whole
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeShare {
    /// Ticket type
    pub ticket_type: TicketType,
    /// Number of tickets of this type
    pub count: usize,
    /// Rounded percentage of all tickets (0 when there are none)
    pub percentage: u32,
}

/// An agent's ticket figures
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentWorkload {
    /// Tickets assigned to the agent
    pub total: usize,
    /// Resolved or closed
    pub resolved: usize,
    /// Open or in progress
    pub active: usize,
    /// `resolved / total` as a rounded percentage, 0 with no tickets
    pub resolution_rate: u32,
}

/// A customer whose ticket counter disagrees with the ticket collection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterDrift {
    /// Customer
    pub customer_id: CustomerId,
    /// Value of `Customer::tickets`
    pub recorded: u32,
    /// Tickets actually referencing the customer
    pub actual: usize,
}

/// Criteria for [`filter_tickets`]; unset fields match everything
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    /// Only this status
    pub status: Option<TicketStatus>,
    /// Only this priority
    pub priority: Option<TicketPriority>,
    /// Only this type
    pub ticket_type: Option<TicketType>,
    /// Only this customer's tickets
    pub customer_id: Option<CustomerId>,
    /// Only this agent's tickets
    pub agent_id: Option<AgentId>,
    /// Case-insensitive text matched against title, description and tags
    pub text: Option<String>,
}

impl TicketFilter {
    /// Matches everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a status
    #[must_use]
    pub const fn status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to a priority
    #[must_use]
    pub const fn priority(mut self, priority: TicketPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restrict to a type
    #[must_use]
    pub const fn ticket_type(mut self, ticket_type: TicketType) -> Self {
        self.ticket_type = Some(ticket_type);
        self
    }

    /// Restrict to a customer
    #[must_use]
    pub fn customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Restrict to an agent
    #[must_use]
    pub fn agent(mut self, agent_id: AgentId) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    /// Restrict to tickets mentioning `text`
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// True if the ticket satisfies every set criterion
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.status.is_some_and(|s| s != ticket.status)
            || self.priority.is_some_and(|p| p != ticket.priority)
            || self.ticket_type.is_some_and(|t| t != ticket.ticket_type)
        {
            return false;
        }
        if self.customer_id.as_ref().is_some_and(|c| c != &ticket.customer_id) {
            return false;
        }
        if self
            .agent_id
            .as_ref()
            .is_some_and(|a| ticket.agent_id.as_ref() != Some(a))
        {
            return false;
        }
        match self.text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(text) => {
                let needle = text.to_lowercase();
                contains_ci(&ticket.title, &needle)
                    || contains_ci(&ticket.description, &needle)
                    || ticket.tags.iter().any(|tag| contains_ci(tag, &needle))
            },
        }
    }
}

/// `needle` must already be lowercase
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Rounded `part / whole` percentage; 0 when `whole` is 0
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Count and share of each ticket type, in [`TicketType::ALL`] order
#[must_use]
pub fn type_distribution(state: &DeskState) -> Vec<TypeShare> {
    let total = state.tickets.len();
    TicketType::ALL
        .into_iter()
        .map(|ticket_type| {
            let count = state
                .tickets
                .iter()
                .filter(|t| t.ticket_type == ticket_type)
                .count();
            TypeShare {
                ticket_type,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect()
}

/// Ticket count per priority, lowest first
#[must_use]
pub fn priority_distribution(state: &DeskState) -> Vec<(TicketPriority, usize)> {
    TicketPriority::ALL
        .into_iter()
        .map(|priority| {
            let count = state.tickets.iter().filter(|t| t.priority == priority).count();
            (priority, count)
        })
        .collect()
}

/// Ticket count per status, in lifecycle order
#[must_use]
pub fn status_counts(state: &DeskState) -> Vec<(TicketStatus, usize)> {
    TicketStatus::ALL
        .into_iter()
        .map(|status| {
            let count = state.tickets.iter().filter(|t| t.status == status).count();
            (status, count)
        })
        .collect()
}

/// Ticket figures for one agent
#[must_use]
pub fn agent_workload(state: &DeskState, agent_id: &AgentId) -> AgentWorkload {
    let assigned: Vec<&Ticket> = state
        .tickets
        .iter()
        .filter(|t| t.agent_id.as_ref() == Some(agent_id))
        .collect();

    let total = assigned.len();
    let resolved = assigned.iter().filter(|t| t.status.is_finished()).count();
    let active = assigned.iter().filter(|t| t.status.is_active()).count();

    AgentWorkload {
        total,
        resolved,
        active,
        resolution_rate: percentage(resolved, total),
    }
}

/// Tickets that have an agent
#[must_use]
pub fn assigned_ticket_count(state: &DeskState) -> usize {
    state.tickets.iter().filter(|t| t.agent_id.is_some()).count()
}

/// Agents whose name contains `query`, ignoring case
#[must_use]
pub fn search_agents<'a>(state: &'a DeskState, query: &str) -> Vec<&'a Agent> {
    let needle = query.trim().to_lowercase();
    state
        .agents
        .iter()
        .filter(|a| contains_ci(&a.name, &needle))
        .collect()
}

/// Customers whose name, email or company contains `query`, ignoring case
#[must_use]
pub fn search_customers<'a>(state: &'a DeskState, query: &str) -> Vec<&'a Customer> {
    let needle = query.trim().to_lowercase();
    state
        .customers
        .iter()
        .filter(|c| {
            contains_ci(&c.name, &needle)
                || contains_ci(&c.email, &needle)
                || c.company.as_deref().is_some_and(|co| contains_ci(co, &needle))
        })
        .collect()
}

/// Tickets matching `filter`, in collection order
#[must_use]
pub fn filter_tickets<'a>(state: &'a DeskState, filter: &TicketFilter) -> Vec<&'a Ticket> {
    state.tickets.iter().filter(|t| filter.matches(t)).collect()
}

/// Sum of every customer's displayed spend
#[must_use]
pub fn total_spent(state: &DeskState) -> f64 {
    state.customers.iter().map(Customer::spent_amount).sum()
}

/// Tickets whose customer no longer exists
#[must_use]
pub fn orphaned_tickets(state: &DeskState) -> Vec<&Ticket> {
    state
        .tickets
        .iter()
        .filter(|t| state.customer(&t.customer_id).is_none())
        .collect()
}

/// Customers whose counter disagrees with the ticket collection
#[must_use]
pub fn counter_drift(state: &DeskState) -> Vec<CounterDrift> {
    state
        .customers
        .iter()
        .filter_map(|c| {
            let actual = state.tickets_for_customer(&c.id).count();
            (usize::try_from(c.tickets).ok() != Some(actual)).then(|| CounterDrift {
                customer_id: c.id.clone(),
                recorded: c.tickets,
                actual,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::seed::sample_state;
    use helpdesk_core::environment::Clock;
    use helpdesk_testing::test_clock;

    fn seeded() -> DeskState {
        sample_state(test_clock().now())
    }

    #[test]
    fn type_distribution_counts_and_rounds() {
        let shares = type_distribution(&seeded());
        let technical = shares
            .iter()
            .find(|s| s.ticket_type == TicketType::Technical)
            .unwrap();
        assert_eq!(technical.count, 2);
        assert_eq!(technical.percentage, 40);
        assert_eq!(shares.iter().map(|s| s.count).sum::<usize>(), 5);
    }

    #[test]
    fn type_distribution_of_nothing_is_zero_percent() {
        let shares = type_distribution(&DeskState::default());
        assert!(shares.iter().all(|s| s.count == 0 && s.percentage == 0));
    }

    #[test]
    fn status_and_priority_counts() {
        let state = seeded();
        assert_eq!(
            status_counts(&state),
            vec![
                (TicketStatus::Open, 2),
                (TicketStatus::InProgress, 1),
                (TicketStatus::Waiting, 1),
                (TicketStatus::Resolved, 1),
                (TicketStatus::Closed, 0),
            ]
        );
        assert_eq!(
            priority_distribution(&state),
            vec![
                (TicketPriority::Low, 1),
                (TicketPriority::Medium, 2),
                (TicketPriority::High, 2),
                (TicketPriority::Urgent, 0),
            ]
        );
    }

    #[test]
    fn workload_of_busy_agent() {
        let workload = agent_workload(&seeded(), &AgentId::new("AGENT-001"));
        assert_eq!(
            workload,
            AgentWorkload {
                total: 2,
                resolved: 0,
                active: 1,
                resolution_rate: 0,
            }
        );
    }

    #[test]
    fn workload_rates_resolved_tickets() {
        let workload = agent_workload(&seeded(), &AgentId::new("AGENT-003"));
        assert_eq!(workload.total, 1);
        assert_eq!(workload.resolution_rate, 100);

        let idle = agent_workload(&seeded(), &AgentId::new("AGENT-004"));
        assert_eq!(idle, AgentWorkload::default());
    }

    #[test]
    fn counts_assigned_tickets() {
        assert_eq!(assigned_ticket_count(&seeded()), 4);
    }

    #[test]
    fn searches_ignore_case() {
        let state = seeded();
        let agents = search_agents(&state, "WILSON");
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].id.as_str(), "AGENT-002");

        let customers = search_customers(&state, "stark");
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name, "Robert Garcia");

        assert_eq!(search_customers(&state, "@example.com").len(), 6);
        assert_eq!(search_agents(&state, "").len(), 4);
    }

    #[test]
    fn filter_combines_criteria() {
        let state = seeded();

        let high_technical = filter_tickets(
            &state,
            &TicketFilter::new()
                .priority(TicketPriority::High)
                .ticket_type(TicketType::Technical),
        );
        assert_eq!(high_technical.len(), 2);

        let open_for_alex = filter_tickets(
            &state,
            &TicketFilter::new()
                .status(TicketStatus::Open)
                .agent(AgentId::new("AGENT-001")),
        );
        assert_eq!(open_for_alex.len(), 1);
        assert_eq!(open_for_alex[0].id.as_str(), "TKT-001");
    }

    #[test]
    fn filter_text_searches_tags_and_description() {
        let state = seeded();
        let by_tag = filter_tickets(&state, &TicketFilter::new().text("SLACK"));
        assert_eq!(by_tag.len(), 1);
        let by_description = filter_tickets(&state, &TicketFilter::new().text("charged twice"));
        assert_eq!(by_description[0].id.as_str(), "TKT-002");
        let by_customer = filter_tickets(
            &state,
            &TicketFilter::new().customer(CustomerId::new("CUST-003")).text("  "),
        );
        assert_eq!(by_customer.len(), 1);
    }

    #[test]
    fn total_spent_sums_display_strings() {
        let total = total_spent(&seeded());
        assert!((total - 13_530.0).abs() < f64::EPSILON);
    }

    #[test]
    fn orphans_appear_after_customer_removal() {
        let mut state = seeded();
        assert!(orphaned_tickets(&state).is_empty());
        state.customers.retain(|c| c.id.as_str() != "CUST-001");
        let orphans = orphaned_tickets(&state);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id.as_str(), "TKT-001");
    }

    #[test]
    fn seeded_counters_drift_from_tickets() {
        let drift = counter_drift(&seeded());
        let john = drift
            .iter()
            .find(|d| d.customer_id.as_str() == "CUST-001")
            .unwrap();
        assert_eq!(john.recorded, 3);
        assert_eq!(john.actual, 1);
        // CUST-002 has one ticket and a counter of one
        assert!(drift.iter().all(|d| d.customer_id.as_str() != "CUST-002"));
    }
}
