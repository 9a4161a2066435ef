use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub auto_migrate: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Super admin created at startup when no account with that name exists.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

fn parse_bool(var: &'static str) -> Result<bool, ConfigError> {
    match env::var(var) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" | "" => Ok(false),
            _ => Err(ConfigError::InvalidValue(var.to_string())),
        },
        Err(_) => Ok(false),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bootstrap_admin = match (
            env::var("ADMIN_BOOTSTRAP_USERNAME"),
            env::var("ADMIN_BOOTSTRAP_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) => Some(BootstrapAdmin { username, password }),
            (Ok(_), Err(_)) => return Err(ConfigError::MissingVar("ADMIN_BOOTSTRAP_PASSWORD")),
            _ => None,
        };

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
            auto_migrate: parse_bool("AUTO_MIGRATE")?,
            bootstrap_admin,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVar(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
        }
    }
}

impl std::error::Error for ConfigError {}
