use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductPayload, ProductInput, UpdateLowStockProductsPayload},
    entity::products::{ActiveModel, Column, Entity as Products},
    error::{AppError, AppResult},
    filters::ProductFilter,
    models::Product,
    validation::{LOW_STOCK_THRESHOLD, product_field_errors},
};

pub async fn list_products(db: &DatabaseConnection) -> AppResult<Vec<Product>> {
    let products = Products::find()
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok(products)
}

pub async fn get_product(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<Product>> {
    let product = Products::find_by_id(id).one(db).await?.map(Product::from);
    Ok(product)
}

pub async fn count_products(db: &DatabaseConnection, filter: &ProductFilter) -> AppResult<u64> {
    let total = Products::find()
        .filter(filter.condition())
        .count(db)
        .await?;
    Ok(total)
}

pub async fn page_products(
    db: &DatabaseConnection,
    filter: &ProductFilter,
    offset: u64,
    limit: u64,
) -> AppResult<Vec<Product>> {
    let products = Products::find()
        .filter(filter.condition())
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok(products)
}

pub async fn create_product(
    db: &DatabaseConnection,
    input: ProductInput,
) -> AppResult<CreateProductPayload> {
    let stock = input.stock.unwrap_or(0);
    let errors = product_field_errors(&input.name, input.price, stock);
    if !errors.is_empty() {
        tracing::debug!(name = %input.name, ?errors, "product rejected");
        return Ok(CreateProductPayload::invalid(errors));
    }

    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        price: Set(input.price),
        stock: Set(stock),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(db)
    .await?;

    tracing::info!(product_id = %product.id, "product created");
    Ok(CreateProductPayload::created(Product::from(product)))
}

/// Adds `increment` to the stock of every product below the low-stock
/// threshold. Products are saved one at a time, outside any transaction.
pub async fn restock_low_stock(
    db: &DatabaseConnection,
    increment: i32,
) -> AppResult<UpdateLowStockProductsPayload> {
    if increment < 0 {
        return Err(AppError::BadRequest("Increment cannot be negative".into()));
    }

    let low_stock = Products::find()
        .filter(Column::Stock.lt(LOW_STOCK_THRESHOLD))
        .order_by_asc(Column::Name)
        .all(db)
        .await?;

    let mut updated = Vec::with_capacity(low_stock.len());
    for product in low_stock {
        let new_stock = product
            .stock
            .checked_add(increment)
            .ok_or_else(|| AppError::BadRequest(format!("Stock overflow for {}", product.name)))?;

        let mut active: ActiveModel = product.into();
        active.stock = Set(new_stock);
        active.updated_at = Set(Utc::now().into());
        let product = active.update(db).await?;

        tracing::debug!(product_id = %product.id, stock = product.stock, "product restocked");
        updated.push(Product::from(product));
    }

    tracing::info!(count = updated.len(), increment, "low-stock products restocked");
    Ok(UpdateLowStockProductsPayload::new(updated))
}
