use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    response::ApiResponse,
    routes::{graphql, health},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        graphql::graphql_handler,
        graphql::graphiql,
    ),
    components(
        schemas(
            health::HealthData,
            graphql::GraphQlRequestBody,
            ApiResponse<health::HealthData>,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "GraphQL", description = "CRM GraphQL endpoint: customers, products and orders"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
