//! Configuration module for tastycart-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables. Also produces argon2 hashes for admin rows.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{
    AdminConfig, DEFAULT_GATEWAY_API_BASE, GatewayConfig, IdentityConfig, MailConfig,
    ServerConfig, SharedConfig,
};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid URL in config: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("password hashing error: {0}")]
    HashError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub gateway: GatewayConfig,
    pub identity: IdentityConfig,
    pub mail: MailConfig,
}

impl LoadedConfig {
    /// Convert into a SharedConfig with Arc<RwLock<T>> wrappers.
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig::new(
            self.server,
            self.admin,
            self.gateway,
            self.identity,
            self.mail,
        )
    }

    /// Swap every section of `shared` for the freshly loaded one.
    pub async fn apply_to(self, shared: &SharedConfig) {
        *shared.server.write().await = self.server;
        *shared.admin.write().await = self.admin;
        *shared.gateway.write().await = self.gateway;
        *shared.identity.write().await = self.identity;
        *shared.mail.write().await = self.mail;
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    /// 4. Build the loaded configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        self.validate(&file_config)?;
        self.build_loaded_config(file_config)
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let required = [
            ("admin.jwt_secret", config.admin.jwt_secret.as_str()),
            ("gateway.key_id", config.gateway.key_id.as_str()),
            ("gateway.key_secret", config.gateway.key_secret.as_str()),
            ("gateway.webhook_secret", config.gateway.webhook_secret.as_str()),
            ("identity.project_id", config.identity.project_id.as_str()),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{name} must not be empty")));
            }
        }
        if config.admin.token_ttl_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "admin.token_ttl_secs must be positive".into(),
            ));
        }
        if config.mail.endpoint.is_some() && config.mail.from.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "mail.from is required when mail.endpoint is set".into(),
            ));
        }
        Ok(())
    }

    fn build_loaded_config(&self, file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
        let mut admin = AdminConfig::new(file_config.admin.jwt_secret.into_bytes());
        if let Some(ttl) = file_config.admin.token_ttl_secs {
            admin.token_ttl = Duration::from_secs(ttl);
        }

        let api_base = match file_config.gateway.api_base {
            Some(url) => url,
            None => Url::parse(DEFAULT_GATEWAY_API_BASE)?,
        };

        Ok(LoadedConfig {
            server: ServerConfig {
                listen: file_config.server.listen,
                environment: file_config.server.environment,
            },
            admin,
            gateway: GatewayConfig {
                key_id: file_config.gateway.key_id,
                key_secret: file_config.gateway.key_secret,
                webhook_secret: file_config.gateway.webhook_secret.into_bytes().into_boxed_slice(),
                api_base,
            },
            identity: IdentityConfig {
                project_id: file_config.identity.project_id,
            },
            mail: MailConfig {
                endpoint: file_config.mail.endpoint,
                api_key: file_config.mail.api_key,
                from: file_config.mail.from,
            },
        })
    }
}

/// Hash an admin password for storage in the `admins` table.
pub fn hash_password(plaintext: &str) -> Result<String, ConfigError> {
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ConfigError::HashError(e.to_string()))
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}
