use std::path::Path;

use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::json;

use super::{GraphQlClient, JobResult, log_sink::append_lines};

pub const HEARTBEAT_LOG: &str = "crm_heartbeat_log.txt";

#[derive(Debug, Deserialize)]
struct HelloData {
    hello: String,
}

pub fn heartbeat_line(now: DateTime<Local>) -> String {
    format!("{} CRM is alive", now.format("%d/%m/%Y-%H:%M:%S"))
}

/// Records that the job ran, then probes the endpoint with `hello`.
/// Returns whether the endpoint answered; an unreachable endpoint is only
/// reported.
pub async fn run(client: &GraphQlClient, log_dir: &Path, now: DateTime<Local>) -> JobResult<bool> {
    append_lines(&log_dir.join(HEARTBEAT_LOG), &[heartbeat_line(now)]).await?;

    match client.execute::<HelloData>("query { hello }", json!({})).await {
        Ok(data) => {
            tracing::info!(hello = %data.hello, "GraphQL endpoint responded");
            Ok(true)
        }
        Err(err) => {
            tracing::warn!(endpoint = %client.endpoint(), error = %err, "GraphQL endpoint check failed");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn heartbeat_uses_day_first_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(heartbeat_line(now), "07/03/2024-09:05:00 CRM is alive");
    }
}
