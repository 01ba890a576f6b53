//! Initial store contents.
//!
//! The sample data set is what the dashboard shows on first load. Ticket
//! timestamps are relative to the moment the store is built so the
//! activity feed always reads "today", "yesterday", and so on.

use crate::types::{
    Agent, AgentId, Customer, CustomerId, CustomerStatus, DeskState, ParseEnumError, Stats,
    Ticket, TicketId, TicketPriority, TicketStatus, TicketType,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which data set a new store starts with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seed {
    /// Five tickets, six customers, four agents
    #[default]
    Sample,
    /// Nothing at all
    Empty,
}

impl Seed {
    /// Builds the initial state
    #[must_use]
    pub fn state(self, now: DateTime<Utc>) -> DeskState {
        match self {
            Self::Sample => sample_state(now),
            Self::Empty => DeskState::default(),
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Sample => "sample",
            Self::Empty => "empty",
        })
    }
}

impl FromStr for Seed {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sample" => Ok(Self::Sample),
            "empty" => Ok(Self::Empty),
            _ => Err(ParseEnumError::new("seed", s)),
        }
    }
}

/// The sample data set, with ticket timestamps relative to `now`
///
/// Customer ticket counters are the displayed figures, not a count of the
/// seeded tickets; `queries::counter_drift` reports the difference.
#[must_use]
pub fn sample_state(now: DateTime<Utc>) -> DeskState {
    DeskState::new(
        sample_tickets(now),
        sample_customers(),
        sample_agents(),
        sample_stats(),
    )
}

/// Headline numbers shown on the dashboard
#[must_use]
pub fn sample_stats() -> Stats {
    Stats {
        open_tickets: 127,
        resolved_today: 42,
        customer_satisfaction: "94%".to_string(),
        response_time: "24m".to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn ticket(
    id: &str,
    title: &str,
    description: &str,
    (customer, agent): (&str, Option<&str>),
    status: TicketStatus,
    priority: TicketPriority,
    ticket_type: TicketType,
    (created_at, updated_at): (DateTime<Utc>, DateTime<Utc>),
    tags: &[&str],
) -> Ticket {
    Ticket {
        id: TicketId::new(id),
        title: title.to_string(),
        description: description.to_string(),
        customer_id: CustomerId::new(customer),
        agent_id: agent.map(AgentId::new),
        status,
        priority,
        ticket_type,
        created_at,
        updated_at,
        due_date: None,
        tags: tags.iter().map(ToString::to_string).collect(),
    }
}

fn sample_tickets(now: DateTime<Utc>) -> Vec<Ticket> {
    let days_ago = |days: i64| now - Duration::days(days);

    vec![
        ticket(
            "TKT-001",
            "Website login not working",
            "Customer cannot log in to their account on the website",
            ("CUST-001", Some("AGENT-001")),
            TicketStatus::Open,
            TicketPriority::High,
            TicketType::Technical,
            (days_ago(1), now),
            &["login", "website"],
        ),
        ticket(
            "TKT-002",
            "Billing discrepancy in April invoice",
            "Customer reports being charged twice for the same service in April",
            ("CUST-002", Some("AGENT-002")),
            TicketStatus::InProgress,
            TicketPriority::Medium,
            TicketType::Billing,
            (days_ago(2), now - Duration::hours(12)),
            &["billing", "invoice"],
        ),
        ticket(
            "TKT-003",
            "Feature request: Dark mode",
            "Customer requests dark mode option for the dashboard",
            ("CUST-003", None),
            TicketStatus::Open,
            TicketPriority::Low,
            TicketType::FeatureRequest,
            (days_ago(3), days_ago(3)),
            &["feature", "ui"],
        ),
        ticket(
            "TKT-004",
            "Cannot export data to CSV",
            "Export functionality is failing when trying to download CSV reports",
            ("CUST-005", Some("AGENT-001")),
            TicketStatus::Waiting,
            TicketPriority::High,
            TicketType::Technical,
            (days_ago(4), days_ago(2)),
            &["export", "reports"],
        ),
        ticket(
            "TKT-005",
            "How to integrate with Slack?",
            "Customer needs help setting up Slack integration",
            ("CUST-004", Some("AGENT-003")),
            TicketStatus::Resolved,
            TicketPriority::Medium,
            TicketType::General,
            (days_ago(5), days_ago(1)),
            &["integration", "slack"],
        ),
    ]
}

fn customer(
    id: &str,
    name: &str,
    company: &str,
    status: CustomerStatus,
    tickets: u32,
    spent: &str,
    join_date: &str,
) -> Customer {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    Customer {
        id: CustomerId::new(id),
        name: name.to_string(),
        email,
        company: Some(company.to_string()),
        status,
        phone: None,
        tickets,
        spent: spent.to_string(),
        join_date: join_date.to_string(),
    }
}

fn sample_customers() -> Vec<Customer> {
    use CustomerStatus::{Active, Inactive};

    vec![
        customer("CUST-001", "John Doe", "Acme Inc.", Active, 3, "$2,450", "Oct 12, 2023"),
        customer("CUST-002", "Emma Wilson", "Globex Corp", Active, 1, "$890", "Jan 5, 2024"),
        customer("CUST-003", "Michael Brown", "Initech", Active, 2, "$3,200", "Mar 18, 2023"),
        customer("CUST-004", "Sarah Johnson", "Umbrella Corp", Inactive, 0, "$0", "Feb 22, 2024"),
        customer("CUST-005", "Robert Garcia", "Stark Industries", Active, 5, "$5,670", "Nov 30, 2023"),
        customer("CUST-006", "David Kim", "Wayne Enterprises", Active, 2, "$1,320", "Dec 15, 2023"),
    ]
}

fn sample_agents() -> Vec<Agent> {
    [
        ("AGENT-001", "Alex Morgan", "AM", "32", "98%"),
        ("AGENT-002", "Jamie Wilson", "JW", "29", "96%"),
        ("AGENT-003", "Sam Rodriguez", "SR", "27", "94%"),
        ("AGENT-004", "Taylor Chen", "TC", "24", "92%"),
    ]
    .into_iter()
    .map(|(id, name, avatar, tickets, satisfaction)| Agent {
        id: AgentId::new(id),
        name: name.to_string(),
        avatar: avatar.to_string(),
        tickets: tickets.to_string(),
        satisfaction: satisfaction.to_string(),
    })
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use helpdesk_testing::test_clock;
    use helpdesk_core::environment::Clock;

    #[test]
    fn sample_has_expected_shape() {
        let state = sample_state(test_clock().now());

        assert_eq!(state.tickets.len(), 5);
        assert_eq!(state.customers.len(), 6);
        assert_eq!(state.agents.len(), 4);
        assert_eq!(state.stats.open_tickets, 127);
        assert_eq!(state.stats.customer_satisfaction, "94%");
        assert_eq!(state.next_ticket_seq, 6);
        assert_eq!(state.next_customer_seq, 7);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn sample_timestamps_are_relative_to_now() {
        let now = test_clock().now();
        let state = sample_state(now);

        let first = state.ticket(&TicketId::new("TKT-001")).unwrap();
        assert_eq!(first.updated_at, now);
        assert_eq!(first.created_at, now - Duration::days(1));

        let third = state.ticket(&TicketId::new("TKT-003")).unwrap();
        assert_eq!(third.created_at, third.updated_at);
        assert!(third.agent_id.is_none());
    }

    #[test]
    fn sample_emails_follow_names() {
        let state = sample_state(test_clock().now());
        let emma = state.customer(&CustomerId::new("CUST-002")).unwrap();
        assert_eq!(emma.email, "emma.wilson@example.com");
        assert_eq!(emma.company.as_deref(), Some("Globex Corp"));
    }

    #[test]
    fn empty_seed_has_nothing() {
        let state = Seed::Empty.state(test_clock().now());
        assert!(state.tickets.is_empty());
        assert!(state.customers.is_empty());
        assert!(state.agents.is_empty());
        assert_eq!(state.stats.open_tickets, 0);
        assert_eq!(state.next_ticket_seq, 1);
    }

    #[test]
    fn seed_parses_from_config_values() {
        assert_eq!("Sample".parse(), Ok(Seed::Sample));
        assert_eq!("empty".parse(), Ok(Seed::Empty));
        assert!("demo".parse::<Seed>().is_err());
    }
}
