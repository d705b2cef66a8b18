use std::env;

/// Database settings, read from the environment with the same defaults the
/// deployment scripts assume. Call `dotenvy::dotenv()` before this if a
/// `.env` file should be honored.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        DatabaseConfig {
            host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("DB_PORT")
                .unwrap_or_else(|_| "5432".to_string())
                .parse()
                .unwrap_or(5432),
            dbname: env::var("DB_NAME").unwrap_or_else(|_| "discassess_db".to_string()),
            user: env::var("DB_USER").unwrap_or_else(|_| "discassess_user".to_string()),
            password: env::var("DB_PASSWORD").unwrap_or_else(|_| "".to_string()),
        }
    }
}
