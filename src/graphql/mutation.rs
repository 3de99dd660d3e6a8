use async_graphql::{Context, Object, Result as GqlResult};
use sea_orm::DatabaseConnection;

use crate::{
    dto::{
        customers::{BulkCreateCustomersPayload, CreateCustomerPayload, CustomerInput},
        orders::{CreateOrderPayload, OrderInput},
        products::{CreateProductPayload, ProductInput, UpdateLowStockProductsPayload},
    },
    services::{customer_service, order_service, product_service},
};

/// Mutations never surface service failures as GraphQL errors; they are
/// folded into a `success = false` payload carrying the error text.
#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_customer(
        &self,
        ctx: &Context<'_>,
        input: CustomerInput,
    ) -> GqlResult<CreateCustomerPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        let payload = match customer_service::create_customer(db, input).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = %err, "create customer failed");
                CreateCustomerPayload::failed(err)
            }
        };
        Ok(payload)
    }

    async fn bulk_create_customers(
        &self,
        ctx: &Context<'_>,
        input: Vec<CustomerInput>,
    ) -> GqlResult<BulkCreateCustomersPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        let payload = match customer_service::bulk_create_customers(db, input).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = %err, "bulk customer import rolled back");
                BulkCreateCustomersPayload::failed(err)
            }
        };
        Ok(payload)
    }

    async fn create_product(
        &self,
        ctx: &Context<'_>,
        input: ProductInput,
    ) -> GqlResult<CreateProductPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        let payload = match product_service::create_product(db, input).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = %err, "create product failed");
                CreateProductPayload::failed(err)
            }
        };
        Ok(payload)
    }

    async fn create_order(
        &self,
        ctx: &Context<'_>,
        input: OrderInput,
    ) -> GqlResult<CreateOrderPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        let payload = match order_service::create_order(db, input).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = %err, "create order failed");
                CreateOrderPayload::failed(err)
            }
        };
        Ok(payload)
    }

    /// Adds `increment` to every product whose stock is below 10.
    async fn update_low_stock_products(
        &self,
        ctx: &Context<'_>,
        increment: i32,
    ) -> GqlResult<UpdateLowStockProductsPayload> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(product_service::restock_low_stock(db, increment).await?)
    }
}
