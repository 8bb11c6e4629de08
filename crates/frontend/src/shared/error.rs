//! Типы ошибок клиента каталога.

use thiserror::Error;

/// Ошибки локального хранилища
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage is unavailable: {0}")]
    Unavailable(String),

    #[error("Storage rejected write of '{key}': {reason}")]
    WriteRejected { key: String, reason: String },

    #[error("Storage read of '{key}' failed: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("Failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Ошибки загрузки начальных данных
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// Ошибки конфигурации
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}
