use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderPayload, OrderInput},
    entity::{
        customers::Entity as Customers,
        order_products::{
            ActiveModel as OrderProductActive, Column as OrderProductCol,
            Entity as OrderProducts,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    filters::OrderFilter,
    models::Order,
};

pub async fn list_orders(db: &DatabaseConnection) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .order_by_desc(OrderCol::OrderDate)
        .order_by_asc(OrderCol::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();
    Ok(orders)
}

pub async fn get_order(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<Order>> {
    let order = Orders::find_by_id(id).one(db).await?.map(Order::from);
    Ok(order)
}

pub async fn count_orders(db: &DatabaseConnection, filter: &OrderFilter) -> AppResult<u64> {
    let total = Orders::find().filter(filter.condition()).count(db).await?;
    Ok(total)
}

pub async fn page_orders(
    db: &DatabaseConnection,
    filter: &OrderFilter,
    offset: u64,
    limit: u64,
) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .filter(filter.condition())
        .order_by_desc(OrderCol::OrderDate)
        .order_by_asc(OrderCol::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();
    Ok(orders)
}

pub async fn orders_for_customer<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .filter(OrderCol::CustomerId.eq(customer_id))
        .order_by_desc(OrderCol::OrderDate)
        .order_by_asc(OrderCol::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();
    Ok(orders)
}

pub async fn orders_for_product<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .inner_join(OrderProducts)
        .filter(OrderProductCol::ProductId.eq(product_id))
        .order_by_desc(OrderCol::OrderDate)
        .order_by_asc(OrderCol::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();
    Ok(orders)
}

pub async fn customer_has_orders<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
) -> AppResult<bool> {
    let count = Orders::find()
        .filter(OrderCol::CustomerId.eq(customer_id))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub async fn products_for_order<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> AppResult<Vec<ProductModel>> {
    let products = Products::find()
        .inner_join(OrderProducts)
        .filter(OrderProductCol::OrderId.eq(order_id))
        .order_by_asc(ProdCol::Name)
        .all(conn)
        .await?;
    Ok(products)
}

/// Sets `total_amount` to the sum of the current prices of the order's
/// products. An order without products keeps its stored total.
pub async fn recalculate_total<C: ConnectionTrait>(
    conn: &C,
    order: OrderModel,
) -> AppResult<OrderModel> {
    let products = order.find_related(Products).all(conn).await?;
    if products.is_empty() {
        return Ok(order);
    }

    let total: Decimal = products.iter().map(|p| p.price).sum();
    let mut active: OrderActive = order.into();
    active.total_amount = Set(total);
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(conn).await?)
}

pub async fn create_order(
    db: &DatabaseConnection,
    input: OrderInput,
) -> AppResult<CreateOrderPayload> {
    let mut errors = Vec::new();

    let customer = match Uuid::parse_str(input.customer_id.as_str()) {
        Ok(id) => Customers::find_by_id(id).one(db).await?,
        Err(_) => None,
    };
    if customer.is_none() {
        errors.push("Customer not found".to_string());
    }

    let mut product_ids: Vec<Uuid> = Vec::new();
    if input.product_ids.is_empty() {
        errors.push("At least one product must be selected".to_string());
    } else {
        let mut invalid = Vec::new();
        for raw in &input.product_ids {
            match Uuid::parse_str(raw.as_str()) {
                // An order holds each product at most once.
                Ok(id) if !product_ids.contains(&id) => product_ids.push(id),
                Ok(_) => {}
                Err(_) => invalid.push(raw.to_string()),
            }
        }
        if !invalid.is_empty() {
            errors.push(format!("Invalid product ID: {}", invalid.join(", ")));
        }

        if !product_ids.is_empty() {
            let found: Vec<Uuid> = Products::find()
                .filter(ProdCol::Id.is_in(product_ids.clone()))
                .all(db)
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect();
            let missing: Vec<String> = product_ids
                .iter()
                .filter(|id| !found.contains(id))
                .map(Uuid::to_string)
                .collect();
            if !missing.is_empty() {
                errors.push(format!("Products not found: [{}]", missing.join(", ")));
            }
        }
    }

    if !errors.is_empty() {
        tracing::debug!(?errors, "order rejected");
        return Ok(CreateOrderPayload::invalid(errors));
    }
    let customer = customer.ok_or(AppError::NotFound)?;

    let txn = db.begin().await?;

    if input.order_date.is_some() {
        tracing::debug!("supplied orderDate ignored; orders are stamped at creation");
    }
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer.id),
        total_amount: Set(Decimal::ZERO),
        order_date: Set(Utc::now().into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let links = product_ids.iter().map(|product_id| OrderProductActive {
        order_id: Set(order.id),
        product_id: Set(*product_id),
    });
    OrderProducts::insert_many(links)
        .exec_without_returning(&txn)
        .await?;

    let order = recalculate_total(&txn, order).await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        customer_id = %customer.id,
        total = %order.total_amount,
        "order created"
    );
    Ok(CreateOrderPayload::created(Order::from(order)))
}
