use async_graphql::{ID, InputObject, SimpleObject};
use chrono::{DateTime, Utc};

use crate::models::Order;

#[derive(Debug, Clone, InputObject)]
pub struct OrderInput {
    pub customer_id: ID,
    pub product_ids: Vec<ID>,
    /// Accepted but not stored: an order is always dated when it is created.
    pub order_date: Option<DateTime<Utc>>,
}

#[derive(Debug, SimpleObject)]
pub struct CreateOrderPayload {
    pub order: Option<Order>,
    pub message: String,
    pub success: bool,
    pub errors: Vec<String>,
}

impl CreateOrderPayload {
    pub fn created(order: Order) -> Self {
        Self {
            order: Some(order),
            message: "Order created successfully".into(),
            success: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            order: None,
            message: "Validation failed".into(),
            success: false,
            errors,
        }
    }

    pub fn failed(err: impl std::fmt::Display) -> Self {
        Self {
            order: None,
            message: "Failed to create order".into(),
            success: false,
            errors: vec![err.to_string()],
        }
    }
}
