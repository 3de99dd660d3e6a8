use sea_orm::DatabaseConnection;

use crate::graphql::CrmSchema;

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub schema: CrmSchema,
}

impl AppState {
    pub fn new(orm: DatabaseConnection) -> Self {
        let schema = crate::graphql::build_schema(orm.clone());
        Self { orm, schema }
    }
}
