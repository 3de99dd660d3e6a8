use async_graphql::{InputObject, SimpleObject};

use crate::models::Customer;

#[derive(Debug, Clone, InputObject)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, SimpleObject)]
pub struct CreateCustomerPayload {
    pub customer: Option<Customer>,
    pub message: String,
    pub success: bool,
    pub errors: Vec<String>,
}

impl CreateCustomerPayload {
    pub fn created(customer: Customer) -> Self {
        Self {
            customer: Some(customer),
            message: "Customer created successfully".into(),
            success: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            customer: None,
            message: "Validation failed".into(),
            success: false,
            errors,
        }
    }

    pub fn failed(err: impl std::fmt::Display) -> Self {
        Self {
            customer: None,
            message: "Failed to create customer".into(),
            success: false,
            errors: vec![err.to_string()],
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct BulkCreateCustomersPayload {
    pub customers: Vec<Customer>,
    pub errors: Vec<String>,
    pub success_count: i32,
    pub error_count: i32,
}

impl BulkCreateCustomersPayload {
    pub fn new(customers: Vec<Customer>, errors: Vec<String>) -> Self {
        Self {
            success_count: customers.len() as i32,
            error_count: errors.len() as i32,
            customers,
            errors,
        }
    }

    /// The whole batch was rolled back.
    pub fn failed(err: impl std::fmt::Display) -> Self {
        Self::new(Vec::new(), vec![err.to_string()])
    }
}
