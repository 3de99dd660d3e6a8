use std::path::Path;

use chrono::{DateTime, Duration, Local, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{GraphQlClient, JobResult, TIMESTAMP_FORMAT, log_sink::append_lines};

pub const REMINDERS_LOG: &str = "order_reminders_log.txt";
pub const REMINDER_WINDOW_DAYS: i64 = 7;

const RECENT_ORDERS_QUERY: &str = r#"
query RecentOrders($since: DateTime!, $after: String) {
  allOrders(first: 100, after: $after, filter: { orderDateGte: $since }) {
    pageInfo { hasNextPage endCursor }
    edges {
      node {
        id
        orderDate
        customer { name email }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentOrdersData {
    all_orders: OrderPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderPage {
    page_info: PageInfo,
    edges: Vec<OrderEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderEdge {
    node: ReminderOrder,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderOrder {
    pub id: String,
    pub order_date: DateTime<Utc>,
    pub customer: Option<ReminderCustomer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReminderCustomer {
    pub name: String,
    pub email: String,
}

async fn fetch_recent_orders(
    client: &GraphQlClient,
    since: DateTime<Utc>,
) -> JobResult<Vec<ReminderOrder>> {
    let mut orders = Vec::new();
    let mut after: Option<String> = None;
    loop {
        let data: RecentOrdersData = client
            .execute(
                RECENT_ORDERS_QUERY,
                json!({ "since": since.to_rfc3339(), "after": after }),
            )
            .await?;
        let page = data.all_orders;
        orders.extend(page.edges.into_iter().map(|edge| edge.node));
        match page.page_info.end_cursor {
            Some(cursor) if page.page_info.has_next_page => after = Some(cursor),
            _ => break,
        }
    }
    Ok(orders)
}

pub fn reminder_lines(timestamp: &str, orders: &[ReminderOrder]) -> Vec<String> {
    let mut lines = vec![format!("{timestamp} - Processing order reminders:")];
    if orders.is_empty() {
        lines.push(format!(
            "{timestamp} - No orders found in the last {REMINDER_WINDOW_DAYS} days"
        ));
        return lines;
    }
    for order in orders {
        let (name, email) = order
            .customer
            .as_ref()
            .map(|c| (c.name.as_str(), c.email.as_str()))
            .unwrap_or(("unknown", "unknown"));
        lines.push(format!(
            "{timestamp} - Order ID: {}, Customer: {name} ({email}), Order Date: {}",
            order.id,
            order.order_date.to_rfc3339()
        ));
    }
    lines.push(format!(
        "{timestamp} - Total reminders processed: {}",
        orders.len()
    ));
    lines
}

/// Logs a reminder for every order placed in the last seven days.
/// Failures are logged to the file and returned so the caller can exit non-zero.
pub async fn run(client: &GraphQlClient, log_dir: &Path, now: DateTime<Local>) -> JobResult<usize> {
    let path = log_dir.join(REMINDERS_LOG);
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    let since = now.with_timezone(&Utc) - Duration::days(REMINDER_WINDOW_DAYS);

    match fetch_recent_orders(client, since).await {
        Ok(orders) => {
            append_lines(&path, &reminder_lines(&timestamp, &orders)).await?;
            tracing::info!(count = orders.len(), "order reminders processed");
            Ok(orders.len())
        }
        Err(err) => {
            append_lines(
                &path,
                &[format!("{timestamp} - Error processing order reminders: {err}")],
            )
            .await?;
            Err(err)
        }
    }
}
