//! Walkthrough of the helpdesk store.
//!
//! Seeds a store from the environment (see [`helpdesk::config`]), runs the
//! operations a dashboard session would, and prints what the views would
//! render.

use helpdesk::queries::{self, TicketFilter};
use helpdesk::{
    AgentId, CustomerDraft, CustomerId, CustomerPatch, DeskConfig, TicketDraft, TicketPatch,
    TicketPriority, TicketStatus, TicketStore, TicketType,
};
use helpdesk_core::environment::SystemClock;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = DeskConfig::try_from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| "helpdesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(?config, "Starting helpdesk walkthrough");

    let store = TicketStore::new(&config, Arc::new(SystemClock));
    let mut feed = store.subscribe();

    println!("=== Helpdesk ===\n");
    let stats = store.stats().await;
    println!(
        "Open tickets: {} | Resolved today: {} | Satisfaction: {} | Response: {}",
        stats.open_tickets, stats.resolved_today, stats.customer_satisfaction, stats.response_time
    );

    // New customer and a ticket for them
    let Some(customer_id) = store
        .add_customer(
            CustomerDraft::new("Ada Lovelace", "ada.lovelace@example.com")
                .with_company("Analytical Engines")
                .with_spent("$1,815"),
        )
        .await?
    else {
        return Err("customer was rejected".into());
    };
    println!("\nAdded customer {customer_id}");

    let draft = TicketDraft::new("Invoice PDF is blank", customer_id.clone())
        .with_description("Downloaded invoices open as empty pages")
        .with_type(TicketType::Billing)
        .with_priority(TicketPriority::Urgent)
        .with_agent(AgentId::new("AGENT-002"))
        .with_tag("invoice");
    let Some(ticket_id) = store.add_ticket(draft).await? else {
        return Err("ticket was rejected".into());
    };
    println!("Filed ticket {ticket_id}");

    // A form submitted without a title is refused, not fatal
    let rejected = store
        .add_ticket(TicketDraft::new("  ", customer_id.clone()))
        .await?;
    println!(
        "Blank ticket accepted: {} ({})",
        rejected.is_some(),
        store.last_error().await.unwrap_or_default()
    );

    // Work the ticket
    store
        .update_ticket(ticket_id.clone(), TicketPatch::status(TicketStatus::InProgress))
        .await?;
    store
        .update_ticket(ticket_id.clone(), TicketPatch::status(TicketStatus::Resolved))
        .await?;
    store
        .update_customer(
            customer_id.clone(),
            CustomerPatch::default().with_phone(Some("+44 20 7946 0000".into())),
        )
        .await?;

    println!("\nRecent activity:");
    for ticket in store.get_recent_activity().await.iter().take(3) {
        println!(
            "  {} [{}] {} (updated {})",
            ticket.id,
            ticket.status,
            ticket.title,
            ticket.updated_at.format("%Y-%m-%d %H:%M")
        );
    }

    println!("\nTickets for {customer_id}:");
    for ticket in store.get_tickets_by_customer_id(&customer_id).await {
        println!("  {} {} ({})", ticket.id, ticket.title, ticket.priority);
    }

    let (shares, workload, high) = store
        .read(|s| {
            (
                queries::type_distribution(s),
                queries::agent_workload(s, &AgentId::new("AGENT-001")),
                queries::filter_tickets(s, &TicketFilter::new().priority(TicketPriority::High))
                    .len(),
            )
        })
        .await;

    println!("\nTicket types:");
    for share in &shares {
        println!("  {:<16} {:>2} ({}%)", share.ticket_type, share.count, share.percentage);
    }
    println!(
        "\nAGENT-001: {} tickets, {} active, {}% resolved",
        workload.total, workload.active, workload.resolution_rate
    );
    println!("High priority tickets: {high}");

    // Deleting a customer follows the configured policy
    store.delete_customer(CustomerId::new("CUST-001")).await?;
    let orphans = store.read(|s| queries::orphaned_tickets(s).len()).await;
    println!(
        "\nDeleted CUST-001 ({} policy): {} orphaned ticket(s){}",
        config.customer_delete,
        orphans,
        store
            .last_error()
            .await
            .map(|e| format!(", refused: {e}"))
            .unwrap_or_default()
    );

    let mut applied = 0;
    while feed.try_recv().is_ok() {
        applied += 1;
    }
    println!("Actions applied this session: {applied}");

    if let Some(ticket) = store.get_ticket_by_id(&ticket_id).await {
        println!("\n{}", serde_json::to_string_pretty(&ticket)?);
    }

    store.shutdown().await?;
    println!("\n=== Walkthrough Complete ===");
    Ok(())
}
