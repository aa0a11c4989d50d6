// Start of file: /src/config/environment.rs

// * Environment configuration with a singleton pattern
// * and zero-copy defaults.

use std::{borrow::Cow, collections::HashMap};
// * anyhow for convenient error handling
use anyhow::{bail, Context, Result};
// * once_cell for lazy static initialization
use once_cell::sync::Lazy;
use tracing::warn;

// ! Default values for environment variables (used if variables aren't set):
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PROTOCOL: &str = "http";
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_PASSWORD: &str = "postgres";
const DEFAULT_DB_NAME: &str = "health";
const DEFAULT_ENTITY_MOUNT_PATH: &str = "/api";
const DEFAULT_CLIENT_APP_NAME: &str = "healthApp";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BODY_SIZE: usize = 2_097_152; // 2MB
const DEFAULT_TIMEOUT: u64 = 3; // 3 seconds
const DEFAULT_DB_PORT: u16 = 5432; // Default Postgres port

/// Where blood pressure readings are persisted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => bail!("Invalid STORAGE_BACKEND value: {other}"),
        }
    }
}

// * A struct containing all environment variables used by the app
#[derive(Clone, Debug)]
pub struct EnvironmentVariables {
    pub environment: Cow<'static, str>,
    pub host: Cow<'static, str>,
    pub port: u16,
    pub protocol: Cow<'static, str>,
    pub max_request_body_size: usize,
    pub default_timeout_seconds: u64,
    pub db_host: Cow<'static, str>,
    pub db_port: u16,
    pub db_user: Cow<'static, str>,
    pub db_password: Cow<'static, str>,
    pub db_name: Cow<'static, str>,
    pub storage_backend: StorageBackend,
    pub entity_mount_path: Cow<'static, str>,
    pub client_app_name: Cow<'static, str>,
}

impl Default for EnvironmentVariables {
    fn default() -> Self {
        Self {
            environment: Cow::Borrowed(DEFAULT_ENVIRONMENT),
            host: Cow::Borrowed(DEFAULT_HOST),
            port: DEFAULT_PORT,
            protocol: Cow::Borrowed(DEFAULT_PROTOCOL),
            max_request_body_size: DEFAULT_MAX_BODY_SIZE,
            default_timeout_seconds: DEFAULT_TIMEOUT,
            db_host: Cow::Borrowed(DEFAULT_DB_HOST),
            db_port: DEFAULT_DB_PORT,
            db_user: Cow::Borrowed(DEFAULT_DB_USER),
            db_password: Cow::Borrowed(DEFAULT_DB_PASSWORD),
            db_name: Cow::Borrowed(DEFAULT_DB_NAME),
            storage_backend: StorageBackend::Memory,
            entity_mount_path: Cow::Borrowed(DEFAULT_ENTITY_MOUNT_PATH),
            client_app_name: Cow::Borrowed(DEFAULT_CLIENT_APP_NAME),
        }
    }
}

impl EnvironmentVariables {
    // * Loads environment variables from the process and, outside production, from .env
    pub fn load() -> Result<Self> {
        // ? In non-production environments, attempt to load .env
        if std::env::var("ENVIRONMENT").unwrap_or_default() != "production" {
            dotenv::dotenv().ok();
        }

        // * Collect all environment vars from the system and .env
        let vars: HashMap<String, String> = std::env::vars()
            .chain(dotenv::vars())
            .collect();

        Self::from_vars(&vars)
    }

    // * Builds the configuration from an explicit key/value map, providing defaults if missing
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let defaults: EnvironmentVariables = EnvironmentVariables::default();

        // * A small helper closure to fetch a variable by key
        let get_var = |key: &str| vars.get(key).map(String::as_str);

        Ok(Self {
            environment: get_var("ENVIRONMENT")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing ENVIRONMENT, defaulting to '{DEFAULT_ENVIRONMENT}'");
                    defaults.environment
                }),

            host: get_var("HOST")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(defaults.host),

            port: get_var("PORT")
                .map(|s| s.parse().context("Invalid PORT value"))
                .transpose()?
                .unwrap_or(defaults.port),

            protocol: get_var("PROTOCOL")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(defaults.protocol),

            max_request_body_size: get_var("MAX_REQUEST_BODY_SIZE")
                .map(|s| s.parse().context("Invalid MAX_REQUEST_BODY_SIZE"))
                .transpose()?
                .unwrap_or(defaults.max_request_body_size),

            default_timeout_seconds: get_var("DEFAULT_TIMEOUT_SECONDS")
                .map(|s| s.parse().context("Invalid DEFAULT_TIMEOUT_SECONDS"))
                .transpose()?
                .unwrap_or(defaults.default_timeout_seconds),

            db_host: get_var("DB_HOST")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(defaults.db_host),

            db_port: get_var("DB_PORT")
                .map(|s| s.parse().context("Invalid DB_PORT"))
                .transpose()?
                .unwrap_or(defaults.db_port),

            db_user: get_var("DB_USER")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(defaults.db_user),

            db_password: get_var("DB_PASSWORD")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(defaults.db_password),

            db_name: get_var("DB_NAME")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(defaults.db_name),

            storage_backend: get_var("STORAGE_BACKEND")
                .map(StorageBackend::parse)
                .transpose()?
                .unwrap_or_else(|| {
                    warn!("Missing STORAGE_BACKEND, defaulting to in-memory storage");
                    defaults.storage_backend
                }),

            entity_mount_path: get_var("ENTITY_MOUNT_PATH")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(defaults.entity_mount_path),

            client_app_name: get_var("CLIENT_APP_NAME")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(defaults.client_app_name),
        })
    }

    // * Returns a reference to the lazily-initialized environment configuration
    pub fn instance() -> &'static Self {
        static INSTANCE: Lazy<Result<EnvironmentVariables, anyhow::Error>> = Lazy::new(|| {
            let config: EnvironmentVariables = EnvironmentVariables::load()?;

            if cfg!(debug_assertions) {
                tracing::debug!("Loaded environment configuration: {:#?}", config);
            }

            Ok(config)
        });

        // ! Panics if loading fails
        INSTANCE.as_ref().expect("Failed to load environment configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let env: EnvironmentVariables = EnvironmentVariables::from_vars(&HashMap::new()).unwrap();
        assert_eq!(env.port, DEFAULT_PORT);
        assert_eq!(env.entity_mount_path, DEFAULT_ENTITY_MOUNT_PATH);
        assert_eq!(env.storage_backend, StorageBackend::Memory);
        assert_eq!(env.client_app_name, DEFAULT_CLIENT_APP_NAME);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let env: EnvironmentVariables = EnvironmentVariables::from_vars(&vars(&[
            ("PORT", "8081"),
            ("STORAGE_BACKEND", "Postgres"),
            ("ENTITY_MOUNT_PATH", "/entity"),
        ]))
        .unwrap();
        assert_eq!(env.port, 8081);
        assert_eq!(env.storage_backend, StorageBackend::Postgres);
        assert_eq!(env.entity_mount_path, "/entity");
    }

    #[test]
    fn invalid_numbers_and_backends_are_errors() {
        assert!(EnvironmentVariables::from_vars(&vars(&[("PORT", "eighty")])).is_err());
        assert!(EnvironmentVariables::from_vars(&vars(&[("STORAGE_BACKEND", "redis")])).is_err());
    }
}

// End of file: /src/config/environment.rs
