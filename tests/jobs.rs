use chrono::{Local, TimeZone};
use crm_graphql_api::jobs::{
    GraphQlClient, JobError, heartbeat, reminders, report, restock,
};
use httpmock::prelude::*;
use rust_decimal::Decimal;
use tempfile::TempDir;

fn fixed_now() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2024, 5, 1, 13, 45, 0).unwrap()
}

fn read_log(dir: &TempDir, name: &str) -> String {
    std::fs::read_to_string(dir.path().join(name)).unwrap()
}

#[tokio::test]
async fn heartbeat_logs_even_when_endpoint_is_down() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/graphql");
            then.status(502).body("bad gateway");
        })
        .await;

    let client = GraphQlClient::new(server.url("/graphql")).unwrap();
    let reachable = heartbeat::run(&client, dir.path(), fixed_now()).await.unwrap();

    assert!(!reachable);
    mock.assert_async().await;
    assert_eq!(
        read_log(&dir, heartbeat::HEARTBEAT_LOG),
        "01/05/2024-13:45:00 CRM is alive\n"
    );
}

#[tokio::test]
async fn heartbeat_probes_hello() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/graphql").body_contains("hello");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({ "data": { "hello": "Hello, GraphQL!" } }));
        })
        .await;

    let client = GraphQlClient::new(server.url("/graphql")).unwrap();
    assert!(heartbeat::run(&client, dir.path(), fixed_now()).await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn restock_logs_each_updated_product() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/graphql")
                .body_contains("updateLowStockProducts")
                .body_contains("\"increment\":10");
            then.status(200).json_body(serde_json::json!({
                "data": {
                    "updateLowStockProducts": {
                        "success": "Restocked 2 products.",
                        "updatedProducts": [
                            { "name": "Cable", "stock": 19 },
                            { "name": "Laptop", "stock": 13 }
                        ]
                    }
                }
            }));
        })
        .await;

    let client = GraphQlClient::new(server.url("/graphql")).unwrap();
    let count = restock::run(&client, dir.path(), fixed_now(), 10).await.unwrap();

    assert_eq!(count, 2);
    mock.assert_async().await;
    assert_eq!(
        read_log(&dir, restock::RESTOCK_LOG),
        "2024-05-01 13:45:00 - Cable: stock updated to 19\n\
         2024-05-01 13:45:00 - Laptop: stock updated to 13\n\
         2024-05-01 13:45:00 - Restocked 2 products.\n"
    );
}

#[tokio::test]
async fn reminders_follow_pages_and_log_orders() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    let second_page = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/graphql")
                .body_contains("\"after\":\"0\"");
            then.status(200).json_body(serde_json::json!({
                "data": { "allOrders": {
                    "pageInfo": { "hasNextPage": false, "endCursor": "1" },
                    "edges": [{ "node": {
                        "id": "order-2",
                        "orderDate": "2024-04-29T08:00:00+00:00",
                        "customer": { "name": "Bob", "email": "bob@example.com" }
                    }}]
                }}
            }));
        })
        .await;
    let first_page = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/graphql")
                .body_contains("\"after\":null");
            then.status(200).json_body(serde_json::json!({
                "data": { "allOrders": {
                    "pageInfo": { "hasNextPage": true, "endCursor": "0" },
                    "edges": [{ "node": {
                        "id": "order-1",
                        "orderDate": "2024-04-30T10:00:00+00:00",
                        "customer": { "name": "John", "email": "john@example.com" }
                    }}]
                }}
            }));
        })
        .await;

    let client = GraphQlClient::new(server.url("/graphql")).unwrap();
    let count = reminders::run(&client, dir.path(), fixed_now()).await.unwrap();

    assert_eq!(count, 2);
    first_page.assert_async().await;
    second_page.assert_async().await;
    let log = read_log(&dir, reminders::REMINDERS_LOG);
    assert!(log.contains("Order ID: order-1, Customer: John (john@example.com)"));
    assert!(log.contains("Order ID: order-2, Customer: Bob (bob@example.com)"));
    assert!(log.ends_with("Total reminders processed: 2\n"));
}

#[tokio::test]
async fn reminders_surface_graphql_errors() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200).json_body(serde_json::json!({
                "data": null,
                "errors": [{ "message": "database unavailable" }]
            }));
        })
        .await;

    let client = GraphQlClient::new(server.url("/graphql")).unwrap();
    let err = reminders::run(&client, dir.path(), fixed_now())
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::GraphQl(ref msg) if msg == "database unavailable"));
    assert_eq!(
        read_log(&dir, reminders::REMINDERS_LOG),
        "2024-05-01 13:45:00 - Error processing order reminders: GraphQL errors: database unavailable\n"
    );
}

#[tokio::test]
async fn report_sums_revenue() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/graphql").body_contains("CRMReport");
            then.status(200).json_body(serde_json::json!({
                "data": {
                    "customers": [{ "id": "a" }, { "id": "b" }, { "id": "c" }],
                    "orders": [
                        { "id": "o1", "totalAmount": "1025.49" },
                        { "id": "o2", "totalAmount": "75.00" }
                    ]
                }
            }));
        })
        .await;

    let client = GraphQlClient::new(server.url("/graphql")).unwrap();
    let summary = report::run(&client, dir.path(), fixed_now()).await.unwrap();

    assert_eq!(summary.customers, 3);
    assert_eq!(summary.orders, 2);
    assert_eq!(summary.revenue, Decimal::new(110049, 2));
    assert_eq!(
        read_log(&dir, report::REPORT_LOG),
        "2024-05-01 13:45:00 - Report: 3 customers, 2 orders, 1100.49 revenue\n"
    );
}
