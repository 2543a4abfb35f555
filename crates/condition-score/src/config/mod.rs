use crate::workflows::inspection::catalog::{CatalogError, DefectCatalog};
use crate::workflows::inspection::sampling::{SampleSizeTable, SampleTableError};
use crate::workflows::inspection::scoring::ScoringPolicy;
use rust_decimal::Decimal;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Thresholds, sample table, and catalog source for the scoring engine.
#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    pub policy: ScoringPolicy,
    pub sample_table: SampleSizeTable,
    pub catalog_path: Option<PathBuf>,
}

impl ScoringConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = ScoringPolicy::default();

        let minimum_passing_score = match env::var("APP_MIN_PASSING_SCORE") {
            Ok(value) => parse_decimal("APP_MIN_PASSING_SCORE", &value)?,
            Err(_) => defaults.minimum_passing_score,
        };
        let interior_deduction_limit = optional_limit(
            "APP_INTERIOR_DEDUCTION_LIMIT",
            defaults.interior_deduction_limit,
        )?;
        let common_deduction_limit =
            optional_limit("APP_COMMON_DEDUCTION_LIMIT", defaults.common_deduction_limit)?;
        let display_decimals = match env::var("APP_SCORE_DECIMALS") {
            Ok(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|decimals| *decimals <= 10)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    var: "APP_SCORE_DECIMALS",
                    value: value.clone(),
                })?,
            Err(_) => defaults.display_decimals,
        };

        let sample_table = match env::var("APP_SAMPLE_TABLE") {
            Ok(value) => value
                .parse::<SampleSizeTable>()
                .map_err(|source| ConfigError::InvalidSampleTable { value, source })?,
            Err(_) => SampleSizeTable::standard(),
        };

        let catalog_path = env::var("APP_CATALOG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            policy: ScoringPolicy {
                minimum_passing_score,
                interior_deduction_limit,
                common_deduction_limit,
                display_decimals,
            },
            sample_table,
            catalog_path,
        })
    }

    /// Load the configured catalog, falling back to the built-in one.
    pub fn load_catalog(&self) -> Result<DefectCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => DefectCatalog::from_path(path),
            None => Ok(DefectCatalog::standard()),
        }
    }
}

fn parse_decimal(var: &'static str, value: &str) -> Result<Decimal, ConfigError> {
    value
        .trim()
        .parse::<Decimal>()
        .ok()
        .filter(|parsed| *parsed >= Decimal::ZERO)
        .ok_or_else(|| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}

fn optional_limit(
    var: &'static str,
    default: Option<Decimal>,
) -> Result<Option<Decimal>, ConfigError> {
    match env::var(var) {
        Ok(value) if matches!(value.trim().to_ascii_lowercase().as_str(), "off" | "none") => {
            Ok(None)
        }
        Ok(value) => parse_decimal(var, &value).map(Some),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidNumber {
        var: &'static str,
        value: String,
    },
    InvalidSampleTable {
        value: String,
        source: SampleTableError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{var} must be a non-negative number (got '{value}')")
            }
            ConfigError::InvalidSampleTable { value, .. } => {
                write!(f, "APP_SAMPLE_TABLE '{value}' is not a valid sample table")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidSampleTable { source, .. } => Some(source),
        }
    }
}
