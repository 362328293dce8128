use std::env;
use std::io;

/// Runtime settings read from the environment (after `.env` is loaded).
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    /// Upper bound of the Postgres pool.
    pub max_connections: u32,
}

fn invalid(name: &str, value: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{} must be a number, got {:?}", name, value),
    )
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> io::Result<T> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| invalid(name, &value)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> io::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "DATABASE_URL must be set"))?;

        Ok(Self {
            database_url,
            server_port: parse_var("SERVER_PORT", 3000)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations don't race with each other.
    #[test]
    fn test_config_from_env() {
        env::remove_var("DATABASE_URL");
        assert!(Config::from_env().is_err());

        env::set_var("DATABASE_URL", "postgres://test");
        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");
        env::remove_var("DATABASE_MAX_CONNECTIONS");

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.server_url(), "http://127.0.0.1:3000");

        env::set_var("SERVER_PORT", "8080");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("DATABASE_MAX_CONNECTIONS", "20");

        let config = Config::from_env().unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.max_connections, 20);

        env::set_var("SERVER_PORT", "eighty");
        assert!(Config::from_env().is_err());
        env::remove_var("SERVER_PORT");
    }
}
