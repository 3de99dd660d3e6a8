use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);
        Ok(Self {
            port,
            database_url,
            host,
        })
    }
}

/// Settings for the out-of-process jobs that talk to the GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub graphql_endpoint: String,
    pub log_dir: PathBuf,
    pub restock_increment: i32,
}

impl JobConfig {
    pub fn from_env() -> Self {
        let graphql_endpoint = env::var("CRM_GRAPHQL_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:8000/graphql".to_string());
        let log_dir = env::var("CRM_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir());
        let restock_increment = env::var("CRM_RESTOCK_INCREMENT")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(10);
        Self {
            graphql_endpoint,
            log_dir,
            restock_increment,
        }
    }
}
