use crate::errors::AppError;
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub db_max_connections: u32,
    pub server_port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let db_url = env::var("DATABASE_URL").unwrap_or("sqlite:./tasks.db".to_string());

        let db_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => parse_max_connections(&raw)?,
            Err(_) => 5,
        };

        let server_port = match env::var("SERVER_PORT") {
            Ok(port_str) => parse_port(&port_str)?,
            Err(_) => 8080, // Default
        };

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            db_url,
            db_max_connections,
            server_port,
            rust_log,
        })
    }

    pub fn server_address(&self) -> String {
        format!("0.0.0.0:{}", self.server_port)
    }
}

fn parse_port(raw: &str) -> Result<u16, AppError> {
    raw.parse::<u16>().map_err(|_| {
        AppError::Config(format!("SERVER_PORT '{}' is not a valid port number", raw))
    })
}

fn parse_max_connections(raw: &str) -> Result<u32, AppError> {
    match raw.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(AppError::Config(format!(
            "DATABASE_MAX_CONNECTIONS '{}' must be a positive integer",
            raw
        ))),
    }
}
