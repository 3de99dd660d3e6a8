use async_graphql::{InputObject, SimpleObject};
use rust_decimal::Decimal;

use crate::models::Product;

#[derive(Debug, Clone, InputObject)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    /// Defaults to 0.
    pub stock: Option<i32>,
}

#[derive(Debug, SimpleObject)]
pub struct CreateProductPayload {
    pub product: Option<Product>,
    pub message: String,
    pub success: bool,
    pub errors: Vec<String>,
}

impl CreateProductPayload {
    pub fn created(product: Product) -> Self {
        Self {
            product: Some(product),
            message: "Product created successfully".into(),
            success: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            product: None,
            message: "Validation failed".into(),
            success: false,
            errors,
        }
    }

    pub fn failed(err: impl std::fmt::Display) -> Self {
        Self {
            product: None,
            message: "Failed to create product".into(),
            success: false,
            errors: vec![err.to_string()],
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct UpdateLowStockProductsPayload {
    /// Summary such as `Restocked 3 products.`
    pub success: String,
    pub updated_products: Vec<Product>,
}

impl UpdateLowStockProductsPayload {
    pub fn new(updated_products: Vec<Product>) -> Self {
        Self {
            success: format!("Restocked {} products.", updated_products.len()),
            updated_products,
        }
    }
}
