use async_graphql::ID;
use crm_graphql_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{customers::CustomerInput, orders::OrderInput, products::ProductInput},
    entity::{
        customers::{Column as CustomerCol, Entity as Customers},
        products::{Column as ProdCol, Entity as Products},
    },
    services::{customer_service, order_service, product_service},
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let john = ensure_customer(&orm, "John", "john@example.com", Some("+1234867890")).await?;
    let bob = ensure_customer(&orm, "Bob", "bob@example.com", Some("123-456-7890")).await?;
    ensure_customer(&orm, "Carol", "carol@example.com", None).await?;

    let laptop = ensure_product(&orm, "Laptop", Decimal::new(99999, 2), 10).await?;
    let mouse = ensure_product(&orm, "Mouse", Decimal::new(2550, 2), 50).await?;
    let keyboard = ensure_product(&orm, "Keyboard", Decimal::new(7500, 2), 30).await?;

    seed_order(&orm, john, &[laptop, mouse]).await?;
    seed_order(&orm, bob, &[keyboard]).await?;

    println!("Database seeded successfully!");
    Ok(())
}

async fn ensure_customer(
    orm: &DatabaseConnection,
    name: &str,
    email: &str,
    phone: Option<&str>,
) -> anyhow::Result<Uuid> {
    let payload = customer_service::create_customer(
        orm,
        CustomerInput {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
        },
    )
    .await?;

    // Re-running the seed keeps the customers created the first time.
    let id = match payload.customer {
        Some(customer) => customer.id,
        None => {
            let existing = Customers::find()
                .filter(CustomerCol::Email.eq(email))
                .one(orm)
                .await?
                .ok_or_else(|| anyhow::anyhow!("{email}: {}", payload.errors.join(", ")))?;
            existing.id
        }
    };

    println!("Ensured customer {email}");
    Ok(id)
}

async fn ensure_product(
    orm: &DatabaseConnection,
    name: &str,
    price: Decimal,
    stock: i32,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Products::find()
        .filter(ProdCol::Name.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let payload = product_service::create_product(
        orm,
        ProductInput {
            name: name.to_string(),
            price,
            stock: Some(stock),
        },
    )
    .await?;
    let product = payload
        .product
        .ok_or_else(|| anyhow::anyhow!("{name}: {}", payload.errors.join(", ")))?;

    println!("Ensured product {name}");
    Ok(product.id)
}

async fn seed_order(
    orm: &DatabaseConnection,
    customer_id: Uuid,
    product_ids: &[Uuid],
) -> anyhow::Result<()> {
    if order_service::customer_has_orders(orm, customer_id).await? {
        println!("Customer {customer_id} already has orders, skipping");
        return Ok(());
    }

    let payload = order_service::create_order(
        orm,
        OrderInput {
            customer_id: ID::from(customer_id.to_string()),
            product_ids: product_ids.iter().map(|id| ID::from(id.to_string())).collect(),
            order_date: None,
        },
    )
    .await?;

    match payload.order {
        Some(order) => println!("Seeded order {} totalling {}", order.id, order.total_amount),
        None => anyhow::bail!("order seed failed: {}", payload.errors.join(", ")),
    }
    Ok(())
}
