use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub session: SessionConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub rust_log: String,
}

// Настройки удалённого API кинотеатра
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

// Где хранится сессия (токен + пользователь)
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub storage_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
#[error("{var} has invalid value '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            app: AppConfig {
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "cinema_client=info,cinema=info".to_string()),
            },
            api: ApiConfig {
                base_url: env::var("CINEMA_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8081".to_string()),
                timeout_seconds: parse_var("CINEMA_API_TIMEOUT_SECONDS", 30)?,
            },
            session: SessionConfig {
                storage_path: env::var("CINEMA_SESSION_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(".cinema_session.json")),
            },
        })
    }

    /// Конфигурация для заданного адреса API, остальное по умолчанию.
    pub fn for_api(base_url: impl Into<String>, storage_path: impl Into<PathBuf>) -> Self {
        Config {
            app: AppConfig {
                environment: "development".to_string(),
                rust_log: "cinema_client=debug".to_string(),
            },
            api: ApiConfig {
                base_url: base_url.into(),
                timeout_seconds: 30,
            },
            session: SessionConfig {
                storage_path: storage_path.into(),
            },
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError { var, value }),
        Err(_) => Ok(default),
    }
}
