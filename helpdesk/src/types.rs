//! Domain types for the helpdesk store.
//!
//! Tickets, customers and agents as the dashboard sees them, the drafts and
//! patches the views send in, and [`DeskState`], the value the reducer owns.

use chrono::{DateTime, Utc};
use helpdesk_macros::Action;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

/// Error returned when a string does not name a known enum value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct ParseEnumError {
    /// What was being parsed (e.g. "ticket status")
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Splits `PREFIX-NNN` into its number
fn sequence_of(id: &str, prefix: &str) -> Option<u32> {
    id.strip_prefix(prefix)?.strip_prefix('-')?.parse().ok()
}

/// Ticket identifier, `TKT-NNN`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    const PREFIX: &'static str = "TKT";

    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Formats the identifier for sequence number `n` (`TKT-006`)
    #[must_use]
    pub fn from_sequence(n: u32) -> Self {
        Self(format!("{}-{n:03}", Self::PREFIX))
    }

    /// The numeric part, if the identifier has the standard shape
    #[must_use]
    pub fn sequence(&self) -> Option<u32> {
        sequence_of(&self.0, Self::PREFIX)
    }

    /// Borrow as `&str`
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TicketId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Customer identifier, `CUST-NNN`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    const PREFIX: &'static str = "CUST";

    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Formats the identifier for sequence number `n` (`CUST-007`)
    #[must_use]
    pub fn from_sequence(n: u32) -> Self {
        Self(format!("{}-{n:03}", Self::PREFIX))
    }

    /// The numeric part, if the identifier has the standard shape
    #[must_use]
    pub fn sequence(&self) -> Option<u32> {
        sequence_of(&self.0, Self::PREFIX)
    }

    /// Borrow as `&str`
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for CustomerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Agent identifier, `AGENT-NNN`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as `&str`
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Where a ticket is in its lifecycle
///
/// Forward path: open → in progress → waiting → resolved → closed, with
/// reopen from resolved or closed. Which moves are accepted is decided by
/// the store's [`TransitionPolicy`](crate::policy::TransitionPolicy).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// New and unhandled
    Open,
    /// An agent is working on it
    InProgress,
    /// Waiting on the customer or a third party
    Waiting,
    /// Fixed, pending confirmation
    Resolved,
    /// Done
    Closed,
}

impl TicketStatus {
    /// Every status in lifecycle order
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::InProgress,
        Self::Waiting,
        Self::Resolved,
        Self::Closed,
    ];

    /// Wire name (`in_progress`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Waiting => "waiting",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Position along the forward path
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::InProgress => 1,
            Self::Waiting => 2,
            Self::Resolved => 3,
            Self::Closed => 4,
        }
    }

    /// Resolved or closed
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }

    /// Open or in progress
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Waiting => "Waiting",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        })
    }
}

impl FromStr for TicketStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("ticket status", s))
    }
}

/// How urgent a ticket is
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
    /// Urgent
    Urgent,
}

impl TicketPriority {
    /// Every priority, lowest first
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        })
    }
}

impl FromStr for TicketPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("ticket priority", s))
    }
}

/// What a ticket is about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    /// Something is broken
    Technical,
    /// Invoices and charges
    Billing,
    /// Asking for something new
    FeatureRequest,
    /// Everything else
    General,
}

impl TicketType {
    /// Every ticket type
    pub const ALL: [Self; 4] = [
        Self::Technical,
        Self::Billing,
        Self::FeatureRequest,
        Self::General,
    ];

    /// Wire name (`feature_request`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Billing => "billing",
            Self::FeatureRequest => "feature_request",
            Self::General => "general",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Technical => "Technical",
            Self::Billing => "Billing",
            Self::FeatureRequest => "Feature Request",
            Self::General => "General Inquiry",
        })
    }
}

impl FromStr for TicketType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("ticket type", s))
    }
}

/// Whether a customer account is in use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    /// Active account
    #[default]
    Active,
    /// Dormant account
    Inactive,
}

impl CustomerStatus {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        })
    }
}

impl FromStr for CustomerStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(ParseEnumError::new("customer status", other)),
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A customer support request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Unique identifier
    pub id: TicketId,
    /// Short summary, never blank
    pub title: String,
    /// Free text, may be empty
    pub description: String,
    /// Owning customer (may dangle after the customer is deleted)
    pub customer_id: CustomerId,
    /// Assigned agent
    pub agent_id: Option<AgentId>,
    /// Lifecycle status
    pub status: TicketStatus,
    /// Urgency
    pub priority: TicketPriority,
    /// Category
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    /// When the ticket was created
    pub created_at: DateTime<Utc>,
    /// Last write through the store
    pub updated_at: DateTime<Utc>,
    /// Optional deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Labels in insertion order; duplicates are kept
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Ticket {
    /// Builds a ticket from a draft, stamping both timestamps with `now`
    #[must_use]
    pub fn from_draft(id: TicketId, draft: TicketDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            customer_id: draft.customer_id,
            agent_id: draft.agent_id,
            status: draft.status,
            priority: draft.priority,
            ticket_type: draft.ticket_type,
            created_at: now,
            updated_at: now,
            due_date: draft.due_date,
            tags: draft.tags,
        }
    }

    /// Merges every field the patch sets and stamps `updated_at`
    pub fn apply(&mut self, patch: &TicketPatch, updated_at: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(customer_id) = &patch.customer_id {
            self.customer_id = customer_id.clone();
        }
        if let Some(agent_id) = &patch.agent_id {
            self.agent_id.clone_from(agent_id);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(ticket_type) = patch.ticket_type {
            self.ticket_type = ticket_type;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(tags) = &patch.tags {
            self.tags.clone_from(tags);
        }
        self.updated_at = updated_at;
    }

    /// True when the ticket is in the `open` status
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == TicketStatus::Open
    }
}

/// A customer account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier
    pub id: CustomerId,
    /// Display name
    pub name: String,
    /// Contact address
    pub email: String,
    /// Company name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Account status
    pub status: CustomerStatus,
    /// Contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Tickets filed by this customer, maintained by the store
    pub tickets: u32,
    /// Lifetime spend as displayed (`"$2,450"`)
    pub spent: String,
    /// Join date as displayed (`"Oct 12, 2023"`)
    pub join_date: String,
}

impl Customer {
    /// Display format used for `join_date`
    pub const JOIN_DATE_FORMAT: &'static str = "%b %-d, %Y";

    /// Builds a customer from a draft; the ticket counter starts at zero
    #[must_use]
    pub fn from_draft(id: CustomerId, draft: CustomerDraft, joined: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            company: draft.company,
            status: draft.status,
            phone: draft.phone,
            tickets: 0,
            spent: draft.spent,
            join_date: joined.format(Self::JOIN_DATE_FORMAT).to_string(),
        }
    }

    /// Merges every field the patch sets
    pub fn apply(&mut self, patch: &CustomerPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &patch.email {
            self.email.clone_from(email);
        }
        if let Some(company) = &patch.company {
            self.company.clone_from(company);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(phone) = &patch.phone {
            self.phone.clone_from(phone);
        }
        if let Some(spent) = &patch.spent {
            self.spent.clone_from(spent);
        }
    }

    /// Numeric value of `spent`, ignoring currency symbols and separators
    ///
    /// `"$2,450"` → `2450.0`. Strings with no digits count as zero.
    #[must_use]
    pub fn spent_amount(&self) -> f64 {
        let digits: String = self
            .spent
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        digits.parse().unwrap_or(0.0)
    }
}

/// A support agent (seeded, read-only)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Unique identifier
    pub id: AgentId,
    /// Display name
    pub name: String,
    /// Initials shown in the avatar bubble
    pub avatar: String,
    /// Handled ticket count as displayed
    pub tickets: String,
    /// Satisfaction percentage as displayed
    pub satisfaction: String,
}

/// Dashboard headline numbers
///
/// Only `open_tickets` is maintained by the store; the rest are seeded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Tickets currently open
    pub open_tickets: u32,
    /// Tickets resolved today
    pub resolved_today: u32,
    /// Satisfaction as displayed (`"94%"`)
    pub customer_satisfaction: String,
    /// Median first response as displayed (`"24m"`)
    pub response_time: String,
}

// ============================================================================
// Drafts and patches
// ============================================================================

/// Everything needed to create a ticket; the store assigns id and timestamps
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDraft {
    /// Short summary
    pub title: String,
    /// Free text
    pub description: String,
    /// Owning customer
    pub customer_id: CustomerId,
    /// Assigned agent
    pub agent_id: Option<AgentId>,
    /// Initial status
    pub status: TicketStatus,
    /// Urgency
    pub priority: TicketPriority,
    /// Category
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    /// Optional deadline
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Labels
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TicketDraft {
    /// An open, unassigned, medium priority technical ticket, as the new-ticket form starts out
    #[must_use]
    pub fn new(title: impl Into<String>, customer_id: CustomerId) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            customer_id,
            agent_id: None,
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            ticket_type: TicketType::Technical,
            due_date: None,
            tags: Vec::new(),
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Assign an agent
    #[must_use]
    pub fn with_agent(mut self, agent_id: AgentId) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    /// Set the initial status
    #[must_use]
    pub const fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the category
    #[must_use]
    pub const fn with_type(mut self, ticket_type: TicketType) -> Self {
        self.ticket_type = ticket_type;
        self
    }

    /// Set the deadline
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Append a tag
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Partial ticket update; `None` leaves a field untouched
///
/// Optional fields use `Option<Option<_>>` so a patch can clear them.
/// Identifier and timestamps are owned by the store and cannot be patched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// Move to another customer
    pub customer_id: Option<CustomerId>,
    /// Assign (`Some(Some(_))`) or unassign (`Some(None)`)
    pub agent_id: Option<Option<AgentId>>,
    /// New status
    pub status: Option<TicketStatus>,
    /// New priority
    pub priority: Option<TicketPriority>,
    /// New category
    #[serde(rename = "type")]
    pub ticket_type: Option<TicketType>,
    /// Set or clear the deadline
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Replace the tag list
    pub tags: Option<Vec<String>>,
}

impl TicketPatch {
    /// Patch that only changes the status
    #[must_use]
    pub fn status(status: TicketStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Move to another customer
    #[must_use]
    pub fn with_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Assign or unassign an agent
    #[must_use]
    pub fn with_agent(mut self, agent_id: Option<AgentId>) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    /// Set the status
    #[must_use]
    pub const fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the category
    #[must_use]
    pub const fn with_type(mut self, ticket_type: TicketType) -> Self {
        self.ticket_type = Some(ticket_type);
        self
    }

    /// Set or clear the deadline
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Replace the tags
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Everything needed to create a customer; the store assigns id and join date
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    /// Display name
    pub name: String,
    /// Contact address
    pub email: String,
    /// Company name
    #[serde(default)]
    pub company: Option<String>,
    /// Account status
    #[serde(default)]
    pub status: CustomerStatus,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Lifetime spend as displayed
    pub spent: String,
}

impl CustomerDraft {
    /// An active customer with nothing spent yet
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            company: None,
            status: CustomerStatus::Active,
            phone: None,
            spent: "$0".to_string(),
        }
    }

    /// Set the company
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Set the phone number
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the account status
    #[must_use]
    pub const fn with_status(mut self, status: CustomerStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the displayed spend
    #[must_use]
    pub fn with_spent(mut self, spent: impl Into<String>) -> Self {
        self.spent = spent.into();
        self
    }
}

/// Partial customer update; `None` leaves a field untouched
///
/// The ticket counter is not patchable: it is kept in step with the ticket
/// collection by the store alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    /// New name
    pub name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// Set or clear the company
    pub company: Option<Option<String>>,
    /// New account status
    pub status: Option<CustomerStatus>,
    /// Set or clear the phone
    pub phone: Option<Option<String>>,
    /// New displayed spend
    pub spent: Option<String>,
}

impl CustomerPatch {
    /// Patch that only changes the account status
    #[must_use]
    pub fn status(status: CustomerStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Set the name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set or clear the company
    #[must_use]
    pub fn with_company(mut self, company: Option<String>) -> Self {
        self.company = Some(company);
        self
    }

    /// Set or clear the phone
    #[must_use]
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = Some(phone);
        self
    }

    /// Set the displayed spend
    #[must_use]
    pub fn with_spent(mut self, spent: impl Into<String>) -> Self {
        self.spent = Some(spent.into());
        self
    }
}

// ============================================================================
// State
// ============================================================================

/// Everything the store holds
///
/// Collections keep insertion order. Identifier sequences only move
/// forward, so an id is never handed out twice even after deletions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskState {
    /// All tickets, oldest first
    pub tickets: Vec<Ticket>,
    /// All customers, oldest first
    pub customers: Vec<Customer>,
    /// All agents
    pub agents: Vec<Agent>,
    /// Dashboard headline numbers
    pub stats: Stats,
    /// Next ticket sequence number to assign
    pub next_ticket_seq: u32,
    /// Next customer sequence number to assign
    pub next_customer_seq: u32,
    /// Reason the most recent command was rejected, cleared by the next change
    pub last_error: Option<String>,
}

impl DeskState {
    /// Builds a state from existing collections
    ///
    /// Sequences start after the highest numbered id present (or at 1).
    #[must_use]
    pub fn new(
        tickets: Vec<Ticket>,
        customers: Vec<Customer>,
        agents: Vec<Agent>,
        stats: Stats,
    ) -> Self {
        let next_ticket_seq = tickets
            .iter()
            .filter_map(|t| t.id.sequence())
            .max()
            .map_or(1, |n| n + 1);
        let next_customer_seq = customers
            .iter()
            .filter_map(|c| c.id.sequence())
            .max()
            .map_or(1, |n| n + 1);

        Self {
            tickets,
            customers,
            agents,
            stats,
            next_ticket_seq,
            next_customer_seq,
            last_error: None,
        }
    }

    /// Looks up a ticket
    #[must_use]
    pub fn ticket(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| &t.id == id)
    }

    /// Looks up a customer
    #[must_use]
    pub fn customer(&self, id: &CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| &c.id == id)
    }

    /// Looks up an agent
    #[must_use]
    pub fn agent(&self, id: &AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| &a.id == id)
    }

    /// Tickets filed by `customer_id`, in collection order
    pub fn tickets_for_customer<'a>(
        &'a self,
        customer_id: &'a CustomerId,
    ) -> impl Iterator<Item = &'a Ticket> + 'a {
        self.tickets.iter().filter(move |t| &t.customer_id == customer_id)
    }

    /// Tickets sorted by `updated_at`, newest first; ties keep collection order
    #[must_use]
    pub fn recent_activity(&self) -> Vec<Ticket> {
        let mut tickets = self.tickets.clone();
        tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        tickets
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Everything the store can be asked to do, and the facts it records
///
/// Commands are validated by the reducer, which turns them into events and
/// applies those. Sending an event directly replays it without validation.
#[derive(Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(clippy::large_enum_variant)]
pub enum DeskAction {
    // ========== Commands ==========
    /// Create a ticket from a draft
    #[command]
    AddTicket {
        /// Ticket contents
        draft: TicketDraft,
    },

    /// Merge a patch into an existing ticket
    #[command]
    UpdateTicket {
        /// Target ticket
        id: TicketId,
        /// Fields to change
        patch: TicketPatch,
    },

    /// Remove a ticket
    #[command]
    DeleteTicket {
        /// Target ticket
        id: TicketId,
    },

    /// Create a customer from a draft
    #[command]
    AddCustomer {
        /// Customer details
        draft: CustomerDraft,
    },

    /// Merge a patch into an existing customer
    #[command]
    UpdateCustomer {
        /// Target customer
        id: CustomerId,
        /// Fields to change
        patch: CustomerPatch,
    },

    /// Remove a customer, handling its tickets per the delete policy
    #[command]
    DeleteCustomer {
        /// Target customer
        id: CustomerId,
    },

    // ========== Events ==========
    /// A ticket was created
    #[event]
    TicketCreated {
        /// The new ticket, id and timestamps assigned
        ticket: Ticket,
    },

    /// A ticket was changed
    #[event]
    TicketUpdated {
        /// Changed ticket
        id: TicketId,
        /// Fields that changed
        patch: TicketPatch,
        /// Time of the change
        updated_at: DateTime<Utc>,
    },

    /// A ticket was removed
    #[event]
    TicketDeleted {
        /// Removed ticket
        id: TicketId,
    },

    /// A customer was created
    #[event]
    CustomerCreated {
        /// The new customer, id and join date assigned
        customer: Customer,
    },

    /// A customer was changed
    #[event]
    CustomerUpdated {
        /// Changed customer
        id: CustomerId,
        /// Fields that changed
        patch: CustomerPatch,
    },

    /// A customer was removed
    #[event]
    CustomerDeleted {
        /// Removed customer
        id: CustomerId,
        /// Tickets removed along with it (empty unless cascading)
        cascaded: Vec<TicketId>,
    },

    /// A command was refused
    #[event]
    CommandRejected {
        /// Human readable reason, shown as a notification
        reason: String,
    },
}

impl Default for DeskState {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Stats::default())
    }
}
