use async_graphql::connection::query;
use async_graphql::{Context, ID, Object, Result as GqlResult};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    filters::{CustomerFilter, OrderFilter, ProductFilter},
    graphql::pagination::{CrmConnection, PageWindow},
    models::{Customer, Order, Product},
    services::{customer_service, order_service, product_service},
};

/// Single-item lookups treat a malformed id like a missing row.
fn parse_id(id: &ID) -> Option<Uuid> {
    Uuid::parse_str(id.as_str()).ok()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn hello(&self) -> String {
        "Hello, GraphQL!".to_string()
    }

    async fn customers(&self, ctx: &Context<'_>) -> GqlResult<Vec<Customer>> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(customer_service::list_customers(db).await?)
    }

    async fn products(&self, ctx: &Context<'_>) -> GqlResult<Vec<Product>> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(product_service::list_products(db).await?)
    }

    async fn orders(&self, ctx: &Context<'_>) -> GqlResult<Vec<Order>> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(order_service::list_orders(db).await?)
    }

    async fn customer(&self, ctx: &Context<'_>, id: ID) -> GqlResult<Option<Customer>> {
        let db = ctx.data::<DatabaseConnection>()?;
        match parse_id(&id) {
            Some(id) => Ok(customer_service::get_customer(db, id).await?),
            None => Ok(None),
        }
    }

    async fn product(&self, ctx: &Context<'_>, id: ID) -> GqlResult<Option<Product>> {
        let db = ctx.data::<DatabaseConnection>()?;
        match parse_id(&id) {
            Some(id) => Ok(product_service::get_product(db, id).await?),
            None => Ok(None),
        }
    }

    async fn order(&self, ctx: &Context<'_>, id: ID) -> GqlResult<Option<Order>> {
        let db = ctx.data::<DatabaseConnection>()?;
        match parse_id(&id) {
            Some(id) => Ok(order_service::get_order(db, id).await?),
            None => Ok(None),
        }
    }

    /// Customers ordered by name, filtered and paginated.
    async fn all_customers(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
        filter: Option<CustomerFilter>,
    ) -> GqlResult<CrmConnection<Customer>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let filter = filter.unwrap_or_default();
        let filter = &filter;
        query(
            after,
            before,
            first,
            last,
            |after: Option<usize>, before: Option<usize>, first, last| async move {
                let total = customer_service::count_customers(db, filter).await?;
                let window = PageWindow::resolve(total as usize, after, before, first, last);
                let items =
                    customer_service::page_customers(db, filter, window.offset(), window.limit())
                        .await?;
                Ok::<_, async_graphql::Error>(window.into_connection(items))
            },
        )
        .await
    }

    /// Products ordered by name, filtered and paginated.
    async fn all_products(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
        filter: Option<ProductFilter>,
    ) -> GqlResult<CrmConnection<Product>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let filter = filter.unwrap_or_default();
        let filter = &filter;
        query(
            after,
            before,
            first,
            last,
            |after: Option<usize>, before: Option<usize>, first, last| async move {
                let total = product_service::count_products(db, filter).await?;
                let window = PageWindow::resolve(total as usize, after, before, first, last);
                let items =
                    product_service::page_products(db, filter, window.offset(), window.limit())
                        .await?;
                Ok::<_, async_graphql::Error>(window.into_connection(items))
            },
        )
        .await
    }

    /// Orders, newest first, filtered and paginated.
    async fn all_orders(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
        filter: Option<OrderFilter>,
    ) -> GqlResult<CrmConnection<Order>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let filter = filter.unwrap_or_default();
        let filter = &filter;
        query(
            after,
            before,
            first,
            last,
            |after: Option<usize>, before: Option<usize>, first, last| async move {
                let total = order_service::count_orders(db, filter).await?;
                let window = PageWindow::resolve(total as usize, after, before, first, last);
                let items =
                    order_service::page_orders(db, filter, window.offset(), window.limit())
                        .await?;
                Ok::<_, async_graphql::Error>(window.into_connection(items))
            },
        )
        .await
    }
}
