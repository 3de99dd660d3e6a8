use async_graphql::{ComplexObject, Context, Result as GqlResult, SimpleObject};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    entity::{
        customers::{Entity as Customers, Model as CustomerModel},
        orders::Model as OrderModel,
        products::Model as ProductModel,
    },
    services::order_service,
};

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[graphql(complex)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[graphql(complex)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[graphql(complex)]
pub struct Order {
    pub id: Uuid,
    #[graphql(skip)]
    pub customer_id: Uuid,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[ComplexObject]
impl Customer {
    /// Orders placed by this customer, newest first.
    async fn orders(&self, ctx: &Context<'_>) -> GqlResult<Vec<Order>> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(order_service::orders_for_customer(db, self.id).await?)
    }
}

#[ComplexObject]
impl Product {
    /// Orders that include this product, newest first.
    async fn orders(&self, ctx: &Context<'_>) -> GqlResult<Vec<Order>> {
        let db = ctx.data::<DatabaseConnection>()?;
        Ok(order_service::orders_for_product(db, self.id).await?)
    }
}

#[ComplexObject]
impl Order {
    /// The customer who placed the order.
    async fn customer(&self, ctx: &Context<'_>) -> GqlResult<Option<Customer>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let customer = Customers::find_by_id(self.customer_id)
            .one(db)
            .await?
            .map(Customer::from);
        Ok(customer)
    }

    /// Products attached to the order.
    async fn products(&self, ctx: &Context<'_>) -> GqlResult<Vec<Product>> {
        let db = ctx.data::<DatabaseConnection>()?;
        let products = order_service::products_for_order(db, self.id)
            .await?
            .into_iter()
            .map(Product::from)
            .collect();
        Ok(products)
    }
}

impl From<CustomerModel> for Customer {
    fn from(model: CustomerModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<ProductModel> for Product {
    fn from(model: ProductModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            stock: model.stock,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<OrderModel> for Order {
    fn from(model: OrderModel) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            total_amount: model.total_amount,
            order_date: model.order_date.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
