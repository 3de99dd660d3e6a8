use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::customers::{BulkCreateCustomersPayload, CreateCustomerPayload, CustomerInput},
    entity::customers::{ActiveModel, Column, Entity as Customers},
    error::AppResult,
    filters::CustomerFilter,
    models::Customer,
    validation::{
        EMAIL_EXISTS_MESSAGE, PHONE_FORMAT_MESSAGE, customer_field_errors, normalize_phone,
    },
};

pub async fn list_customers(db: &DatabaseConnection) -> AppResult<Vec<Customer>> {
    let customers = Customers::find()
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Customer::from)
        .collect();
    Ok(customers)
}

pub async fn get_customer(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<Customer>> {
    let customer = Customers::find_by_id(id).one(db).await?.map(Customer::from);
    Ok(customer)
}

pub async fn count_customers(db: &DatabaseConnection, filter: &CustomerFilter) -> AppResult<u64> {
    let total = Customers::find()
        .filter(filter.condition())
        .count(db)
        .await?;
    Ok(total)
}

pub async fn page_customers(
    db: &DatabaseConnection,
    filter: &CustomerFilter,
    offset: u64,
    limit: u64,
) -> AppResult<Vec<Customer>> {
    let customers = Customers::find()
        .filter(filter.condition())
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(Customer::from)
        .collect();
    Ok(customers)
}

pub async fn email_exists<C: ConnectionTrait>(conn: &C, email: &str) -> AppResult<bool> {
    let count = Customers::find()
        .filter(Column::Email.eq(email))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub async fn create_customer(
    db: &DatabaseConnection,
    input: CustomerInput,
) -> AppResult<CreateCustomerPayload> {
    let email = input.email.trim().to_string();
    let phone = normalize_phone(input.phone);

    let mut errors = Vec::new();
    if email_exists(db, &email).await? {
        errors.push(EMAIL_EXISTS_MESSAGE.to_string());
    }
    errors.extend(customer_field_errors(&input.name, &email, phone.as_deref()));

    if !errors.is_empty() {
        tracing::debug!(%email, ?errors, "customer rejected");
        return Ok(CreateCustomerPayload::invalid(errors));
    }

    let customer = insert_customer(db, input.name.trim(), &email, phone).await?;
    tracing::info!(customer_id = %customer.id, "customer created");
    Ok(CreateCustomerPayload::created(customer))
}

/// Creates every valid row inside one transaction. Each row gets its own
/// savepoint, so a failing row is rolled back alone and reported by its
/// 1-based position while the rest of the batch still commits.
pub async fn bulk_create_customers(
    db: &DatabaseConnection,
    inputs: Vec<CustomerInput>,
) -> AppResult<BulkCreateCustomersPayload> {
    let txn = db.begin().await?;
    let mut created = Vec::new();
    let mut errors = Vec::new();

    for (index, input) in inputs.into_iter().enumerate() {
        let row = index + 1;
        let email = input.email.trim().to_string();
        let phone = normalize_phone(input.phone);

        if email_exists(&txn, &email).await? {
            errors.push(format!("Row {row}: Email {email} already exists"));
            continue;
        }
        let field_errors = customer_field_errors(&input.name, &email, phone.as_deref());
        if field_errors.iter().any(|e| e == PHONE_FORMAT_MESSAGE) {
            errors.push(format!("Row {row}: Invalid phone format for {email}"));
            continue;
        }
        if !field_errors.is_empty() {
            errors.push(format!("Row {row}: {}", field_errors.join("; ")));
            continue;
        }

        let savepoint = txn.begin().await?;
        match insert_customer(&savepoint, input.name.trim(), &email, phone).await {
            Ok(customer) => {
                savepoint.commit().await?;
                created.push(customer);
            }
            Err(err) => {
                savepoint.rollback().await?;
                tracing::warn!(row, error = %err, "bulk customer row failed");
                errors.push(format!("Row {row}: {err}"));
            }
        }
    }

    txn.commit().await?;
    tracing::info!(
        created = created.len(),
        failed = errors.len(),
        "bulk customer import finished"
    );
    Ok(BulkCreateCustomersPayload::new(created, errors))
}

async fn insert_customer<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    email: &str,
    phone: Option<String>,
) -> AppResult<Customer> {
    let model = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        phone: Set(phone),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(conn)
    .await?;
    Ok(Customer::from(model))
}
