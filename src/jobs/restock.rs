use std::path::Path;

use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::json;

use super::{GraphQlClient, JobResult, TIMESTAMP_FORMAT, log_sink::append_lines};

pub const RESTOCK_LOG: &str = "low_stock_updates_log.txt";

const RESTOCK_MUTATION: &str = r#"
mutation Restock($increment: Int!) {
  updateLowStockProducts(increment: $increment) {
    success
    updatedProducts { name stock }
  }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestockData {
    update_low_stock_products: RestockPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestockPayload {
    success: String,
    updated_products: Vec<RestockedProduct>,
}

#[derive(Debug, Deserialize)]
struct RestockedProduct {
    name: String,
    stock: i32,
}

/// Asks the API to restock low-stock products and logs each update.
/// Returns how many products were restocked.
pub async fn run(
    client: &GraphQlClient,
    log_dir: &Path,
    now: DateTime<Local>,
    increment: i32,
) -> JobResult<usize> {
    let path = log_dir.join(RESTOCK_LOG);
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

    let data = match client
        .execute::<RestockData>(RESTOCK_MUTATION, json!({ "increment": increment }))
        .await
    {
        Ok(data) => data,
        Err(err) => {
            append_lines(
                &path,
                &[format!("{timestamp} - Error restocking products: {err}")],
            )
            .await?;
            return Err(err);
        }
    };

    let payload = data.update_low_stock_products;
    let mut lines: Vec<String> = payload
        .updated_products
        .iter()
        .map(|p| format!("{timestamp} - {}: stock updated to {}", p.name, p.stock))
        .collect();
    lines.push(format!("{timestamp} - {}", payload.success));
    append_lines(&path, &lines).await?;

    tracing::info!(count = payload.updated_products.len(), "restock job finished");
    Ok(payload.updated_products.len())
}
