//! Filter inputs for the connection queries and their translation into
//! sea-orm conditions. Empty strings are ignored, matching how the list
//! endpoints treat blank query parameters.

use async_graphql::InputObject;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use crate::{
    entity::{customers, order_products, orders, products},
    validation::LOW_STOCK_THRESHOLD,
};

fn contains_pattern(value: &str) -> String {
    format!("%{value}%")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Default, Clone, InputObject)]
pub struct CustomerFilter {
    /// Case-insensitive substring of the customer name.
    pub name: Option<String>,
    /// Case-insensitive substring of the email address.
    pub email: Option<String>,
    pub created_at_gte: Option<DateTime<Utc>>,
    pub created_at_lte: Option<DateTime<Utc>>,
    /// Prefix of the phone number, e.g. `+1`.
    pub phone_pattern: Option<String>,
}

impl CustomerFilter {
    pub fn condition(&self) -> Condition {
        use customers::Column;

        let mut condition = Condition::all();
        if let Some(name) = non_empty(&self.name) {
            condition = condition.add(Expr::col(Column::Name).ilike(contains_pattern(name)));
        }
        if let Some(email) = non_empty(&self.email) {
            condition = condition.add(Expr::col(Column::Email).ilike(contains_pattern(email)));
        }
        if let Some(from) = self.created_at_gte {
            condition = condition.add(Column::CreatedAt.gte(from));
        }
        if let Some(to) = self.created_at_lte {
            condition = condition.add(Column::CreatedAt.lte(to));
        }
        if let Some(prefix) = non_empty(&self.phone_pattern) {
            condition = condition.add(Column::Phone.starts_with(prefix));
        }
        condition
    }
}

#[derive(Debug, Default, Clone, InputObject)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
    /// When true, only products with stock below the restock threshold.
    pub low_stock: Option<bool>,
}

impl ProductFilter {
    pub fn condition(&self) -> Condition {
        use products::Column;

        let mut condition = Condition::all();
        if let Some(name) = non_empty(&self.name) {
            condition = condition.add(Expr::col(Column::Name).ilike(contains_pattern(name)));
        }
        if let Some(min_price) = self.price_gte {
            condition = condition.add(Column::Price.gte(min_price));
        }
        if let Some(max_price) = self.price_lte {
            condition = condition.add(Column::Price.lte(max_price));
        }
        if let Some(min_stock) = self.stock_gte {
            condition = condition.add(Column::Stock.gte(min_stock));
        }
        if let Some(max_stock) = self.stock_lte {
            condition = condition.add(Column::Stock.lte(max_stock));
        }
        if self.low_stock == Some(true) {
            condition = condition.add(Column::Stock.lt(LOW_STOCK_THRESHOLD));
        }
        condition
    }
}

#[derive(Debug, Default, Clone, InputObject)]
pub struct OrderFilter {
    pub total_amount_gte: Option<Decimal>,
    pub total_amount_lte: Option<Decimal>,
    pub order_date_gte: Option<DateTime<Utc>>,
    pub order_date_lte: Option<DateTime<Utc>>,
    /// Case-insensitive substring of the ordering customer's name.
    pub customer_name: Option<String>,
    /// Matches orders containing at least one product whose name contains this.
    pub product_name: Option<String>,
    /// Matches orders containing this product.
    pub product_id: Option<Uuid>,
}

impl OrderFilter {
    pub fn condition(&self) -> Condition {
        use orders::Column;

        let mut condition = Condition::all();
        if let Some(min_total) = self.total_amount_gte {
            condition = condition.add(Column::TotalAmount.gte(min_total));
        }
        if let Some(max_total) = self.total_amount_lte {
            condition = condition.add(Column::TotalAmount.lte(max_total));
        }
        if let Some(from) = self.order_date_gte {
            condition = condition.add(Column::OrderDate.gte(from));
        }
        if let Some(to) = self.order_date_lte {
            condition = condition.add(Column::OrderDate.lte(to));
        }
        if let Some(customer_name) = non_empty(&self.customer_name) {
            let customer_ids = Query::select()
                .column(customers::Column::Id)
                .from(customers::Entity)
                .and_where(
                    Expr::col((customers::Entity, customers::Column::Name))
                        .ilike(contains_pattern(customer_name)),
                )
                .to_owned();
            condition = condition.add(Column::CustomerId.in_subquery(customer_ids));
        }
        // Related product lookups go through subqueries so an order matching
        // several products is still returned once.
        if let Some(product_name) = non_empty(&self.product_name) {
            let order_ids = Query::select()
                .column((order_products::Entity, order_products::Column::OrderId))
                .from(order_products::Entity)
                .inner_join(
                    products::Entity,
                    Expr::col((products::Entity, products::Column::Id))
                        .equals((order_products::Entity, order_products::Column::ProductId)),
                )
                .and_where(
                    Expr::col((products::Entity, products::Column::Name))
                        .ilike(contains_pattern(product_name)),
                )
                .to_owned();
            condition = condition.add(Column::Id.in_subquery(order_ids));
        }
        if let Some(product_id) = self.product_id {
            let order_ids = Query::select()
                .column(order_products::Column::OrderId)
                .from(order_products::Entity)
                .and_where(order_products::Column::ProductId.eq(product_id))
                .to_owned();
            condition = condition.add(Column::Id.in_subquery(order_ids));
        }
        condition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    use crate::entity::{Customers, Orders, Products};

    #[test]
    fn empty_filters_add_no_predicates() {
        assert!(CustomerFilter::default().condition().is_empty());
        assert!(ProductFilter::default().condition().is_empty());
        assert!(OrderFilter::default().condition().is_empty());
    }

    #[test]
    fn customer_filter_uses_case_insensitive_substring_and_prefix() {
        let filter = CustomerFilter {
            name: Some("ali".into()),
            phone_pattern: Some("+1".into()),
            ..Default::default()
        };
        let sql = Customers::find()
            .filter(filter.condition())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""name" ILIKE '%ali%'"#), "{sql}");
        assert!(sql.contains(r#""phone" LIKE '+1%'"#), "{sql}");
    }

    #[test]
    fn blank_strings_are_ignored() {
        let filter = CustomerFilter {
            name: Some("   ".into()),
            email: Some(String::new()),
            ..Default::default()
        };
        let sql = Customers::find()
            .filter(filter.condition())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(!sql.contains("ILIKE"), "{sql}");
    }

    #[test]
    fn low_stock_filter_uses_strict_threshold() {
        let filter = ProductFilter {
            low_stock: Some(true),
            ..Default::default()
        };
        let sql = Products::find()
            .filter(filter.condition())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""stock" < 10"#), "{sql}");

        let off = ProductFilter {
            low_stock: Some(false),
            ..Default::default()
        };
        assert!(off.condition().is_empty());
    }

    #[test]
    fn product_ranges_are_inclusive() {
        let filter = ProductFilter {
            price_gte: Some(Decimal::new(1000, 2)),
            stock_lte: Some(5),
            ..Default::default()
        };
        let sql = Products::find()
            .filter(filter.condition())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""price" >= 10.00"#), "{sql}");
        assert!(sql.contains(r#""stock" <= 5"#), "{sql}");
    }

    #[test]
    fn order_related_filters_use_subqueries() {
        let filter = OrderFilter {
            customer_name: Some("bob".into()),
            product_name: Some("mouse".into()),
            ..Default::default()
        };
        let sql = Orders::find()
            .filter(filter.condition())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""customer_id" IN (SELECT"#), "{sql}");
        assert!(sql.contains(r#""id" IN (SELECT"#), "{sql}");
        assert!(sql.contains("'%bob%'"), "{sql}");
        assert!(sql.contains("'%mouse%'"), "{sql}");
        assert!(sql.contains(r#"INNER JOIN "products""#), "{sql}");
    }

    #[test]
    fn customer_created_range_is_inclusive() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let filter = CustomerFilter {
            created_at_gte: Some(from),
            created_at_lte: Some(to),
            ..Default::default()
        };
        let sql = Customers::find()
            .filter(filter.condition())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""created_at" >= '2024-01-01 00:00:00"#), "{sql}");
        assert!(sql.contains(r#""created_at" <= '2024-01-31 23:59:59"#), "{sql}");
    }

    #[test]
    fn order_date_range_is_inclusive() {
        let from = Utc.with_ymd_and_hms(2024, 4, 24, 13, 45, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 5, 1, 13, 45, 0).unwrap();
        let filter = OrderFilter {
            order_date_gte: Some(from),
            order_date_lte: Some(to),
            ..Default::default()
        };
        let sql = Orders::find()
            .filter(filter.condition())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""order_date" >= '2024-04-24 13:45:00"#), "{sql}");
        assert!(sql.contains(r#""order_date" <= '2024-05-01 13:45:00"#), "{sql}");
    }

    #[test]
    fn product_id_filter_matches_through_junction() {
        let product_id = Uuid::parse_str("6f1c2a4e-8d3b-4c5f-9a7e-1b2c3d4e5f60").unwrap();
        let filter = OrderFilter {
            product_id: Some(product_id),
            ..Default::default()
        };
        let sql = Orders::find()
            .filter(filter.condition())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(
            sql.contains(r#""id" IN (SELECT "order_id" FROM "order_products""#),
            "{sql}"
        );
        assert!(
            sql.contains(r#""product_id" = '6f1c2a4e-8d3b-4c5f-9a7e-1b2c3d4e5f60'"#),
            "{sql}"
        );
    }
}
