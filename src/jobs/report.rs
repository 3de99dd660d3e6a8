use std::path::Path;

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, de::IgnoredAny};
use serde_json::json;

use super::{GraphQlClient, JobResult, TIMESTAMP_FORMAT, log_sink::append_lines};

pub const REPORT_LOG: &str = "crm_report_log.txt";

const REPORT_QUERY: &str = r#"
query CRMReport {
  customers { id }
  orders { id totalAmount }
}
"#;

#[derive(Debug, Deserialize)]
struct ReportData {
    customers: Vec<IgnoredAny>,
    orders: Vec<ReportOrder>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportOrder {
    total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrmReport {
    pub customers: usize,
    pub orders: usize,
    pub revenue: Decimal,
}

impl CrmReport {
    pub fn line(&self, timestamp: &str) -> String {
        format!(
            "{timestamp} - Report: {} customers, {} orders, {} revenue",
            self.customers, self.orders, self.revenue
        )
    }
}

/// Summarises customers, orders and revenue into the weekly report log.
pub async fn run(client: &GraphQlClient, log_dir: &Path, now: DateTime<Local>) -> JobResult<CrmReport> {
    let path = log_dir.join(REPORT_LOG);
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

    let data = match client.execute::<ReportData>(REPORT_QUERY, json!({})).await {
        Ok(data) => data,
        Err(err) => {
            append_lines(
                &path,
                &[format!("{timestamp} - Error generating CRM report: {err}")],
            )
            .await?;
            return Err(err);
        }
    };

    let report = CrmReport {
        customers: data.customers.len(),
        orders: data.orders.len(),
        revenue: data.orders.iter().map(|o| o.total_amount).sum(),
    };
    append_lines(&path, &[report.line(&timestamp)]).await?;

    tracing::info!(
        customers = report.customers,
        orders = report.orders,
        revenue = %report.revenue,
        "CRM report generated"
    );
    Ok(report)
}
