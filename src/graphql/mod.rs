use async_graphql::{EmptySubscription, Schema, extensions::Tracing};
use sea_orm::DatabaseConnection;

pub mod mutation;
pub mod pagination;
pub mod query;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type CrmSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(db: DatabaseConnection) -> CrmSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .extension(Tracing)
        .limit_depth(10)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    // A disconnected handle is enough for anything that never reaches the database.
    fn offline_schema() -> CrmSchema {
        build_schema(DatabaseConnection::Disconnected)
    }

    // The first query sent to this connection fails.
    fn failing_schema() -> CrmSchema {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();
        build_schema(db)
    }

    fn type_block<'a>(sdl: &'a str, name: &str) -> &'a str {
        let start = sdl
            .find(&format!("type {name} {{"))
            .unwrap_or_else(|| panic!("type {name} missing"));
        let end = sdl[start..].find('}').unwrap();
        &sdl[start..start + end]
    }

    #[tokio::test]
    async fn hello_answers_without_database() {
        let response = offline_schema().execute("{ hello }").await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            serde_json::json!({ "hello": "Hello, GraphQL!" })
        );
    }

    #[tokio::test]
    async fn invalid_product_is_rejected_before_persistence() {
        let response = offline_schema()
            .execute(
                r#"mutation {
                    createProduct(input: { name: "Broken", price: "0", stock: -3 }) {
                        success
                        message
                        errors
                        product { id }
                    }
                }"#,
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        let payload = &data["createProduct"];
        assert_eq!(payload["success"], false);
        assert_eq!(payload["message"], "Validation failed");
        assert_eq!(
            payload["errors"],
            serde_json::json!(["Price must be positive", "Stock cannot be negative"])
        );
        assert!(payload["product"].is_null());
    }

    #[tokio::test]
    async fn negative_restock_increment_is_an_error() {
        let response = offline_schema()
            .execute("mutation { updateLowStockProducts(increment: -1) { success } }")
            .await;
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Increment cannot be negative");
    }

    #[test]
    fn schema_exposes_connection_queries() {
        let sdl = offline_schema().sdl();
        for field in ["allCustomers", "allProducts", "allOrders", "bulkCreateCustomers"] {
            assert!(sdl.contains(field), "missing {field}");
        }
        assert!(sdl.contains("totalCount"));
    }

    #[test]
    fn customers_and_products_expose_their_orders() {
        let sdl = offline_schema().sdl();
        assert!(type_block(&sdl, "Customer").contains("orders: [Order!]!"));
        assert!(type_block(&sdl, "Product").contains("orders: [Order!]!"));
        assert!(type_block(&sdl, "Order").contains("products: [Product!]!"));
    }

    #[tokio::test]
    async fn bulk_create_reports_rolled_back_batch() {
        let response = offline_schema()
            .execute(
                r#"mutation {
                    bulkCreateCustomers(input: [{ name: "Dana", email: "dana@example.com" }]) {
                        customers { id }
                        errors
                        successCount
                        errorCount
                    }
                }"#,
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        let payload = &data["bulkCreateCustomers"];
        assert_eq!(payload["customers"], serde_json::json!([]));
        assert_eq!(payload["successCount"], 0);
        assert_eq!(payload["errorCount"], 1);
        assert_eq!(payload["errors"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn create_customer_folds_database_errors_into_payload() {
        let response = failing_schema()
            .execute(
                r#"mutation {
                    createCustomer(input: { name: "Dana", email: "dana@example.com" }) {
                        success
                        message
                        errors
                        customer { id }
                    }
                }"#,
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        let payload = &data["createCustomer"];
        assert_eq!(payload["success"], false);
        assert_eq!(payload["message"], "Failed to create customer");
        assert!(
            payload["errors"][0]
                .as_str()
                .is_some_and(|e| e.contains("connection reset")),
            "{payload}"
        );
        assert!(payload["customer"].is_null());
    }

    #[tokio::test]
    async fn create_order_folds_database_errors_into_payload() {
        let response = failing_schema()
            .execute(
                r#"mutation {
                    createOrder(input: {
                        customerId: "0b6f6c1e-2f4a-4b8e-9d1c-3a5e7f9b1d2c",
                        productIds: ["6f1c2a4e-8d3b-4c5f-9a7e-1b2c3d4e5f60"]
                    }) {
                        success
                        message
                        errors
                        order { id }
                    }
                }"#,
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        let payload = &data["createOrder"];
        assert_eq!(payload["success"], false);
        assert_eq!(payload["message"], "Failed to create order");
        assert!(
            payload["errors"][0]
                .as_str()
                .is_some_and(|e| e.contains("connection reset")),
            "{payload}"
        );
        assert!(payload["order"].is_null());
    }

    #[tokio::test]
    async fn malformed_order_ids_are_reported() {
        let response = offline_schema()
            .execute(
                r#"mutation {
                    createOrder(input: { customerId: "nope", productIds: ["x"] }) {
                        success
                        message
                        errors
                    }
                }"#,
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        let payload = &data["createOrder"];
        assert_eq!(payload["success"], false);
        assert_eq!(payload["message"], "Validation failed");
        assert_eq!(
            payload["errors"],
            serde_json::json!(["Customer not found", "Invalid product ID: x"])
        );
    }
}
