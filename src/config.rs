use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use thiserror::Error;
use tracing::{error, info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

const CONFIG_DIR: &str = "config";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Hotel details printed on receipts
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(default)]
pub struct HotelConfig {
    #[validate(length(min = 1))]
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl Default for HotelConfig {
    fn default() -> Self {
        Self {
            name: "Hotel POS".to_string(),
            address: String::new(),
            phone: String::new(),
        }
    }
}

/// M-Pesa Daraja credentials. STK push stays disabled until every
/// credential is present.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MpesaConfig {
    pub base_url: String,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub shortcode: Option<String>,
    pub passkey: Option<String>,
    pub callback_url: Option<String>,
}

impl Default for MpesaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sandbox.safaricom.co.ke".to_string(),
            consumer_key: None,
            consumer_secret: None,
            shortcode: None,
            passkey: None,
            callback_url: None,
        }
    }
}

impl MpesaConfig {
    pub fn is_configured(&self) -> bool {
        let filled = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        filled(&self.consumer_key)
            && filled(&self.consumer_secret)
            && filled(&self.shortcode)
            && filled(&self.passkey)
            && filled(&self.callback_url)
    }
}

/// Property-management system used by room sync
#[derive(Clone, Debug, Deserialize, Default)]
#[serde(default)]
pub struct PmsConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
}

/// Runtime settings. Every key is optional in the sources; missing keys fall
/// back to [`AppConfig::default`].
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "cors_is_decided"))]
#[validate(schema(function = "pool_bounds_are_ordered"))]
pub struct AppConfig {
    #[validate(length(min = 1))]
    pub database_url: String,
    pub host: String,
    pub port: u16,
    #[validate(length(min = 1))]
    pub environment: String,

    #[validate(custom = "known_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Apply embedded migrations on startup
    pub auto_migrate: bool,

    /// Comma-separated origins
    pub cors_allowed_origins: Option<String>,
    pub cors_allow_any_origin: bool,

    #[validate(range(min = 1))]
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_connect_timeout_secs: u64,
    pub db_idle_timeout_secs: u64,
    pub db_acquire_timeout_secs: u64,

    /// VAT on purchase-order subtotals, as a fraction
    #[validate(range(min = 0.0, max = 1.0, message = "vat_rate must be between 0.0 and 1.0"))]
    pub vat_rate: f64,

    #[validate]
    pub hotel: HotelConfig,
    pub mpesa: MpesaConfig,
    pub pms: PmsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://hotel_pos.db?mode=rwc".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            auto_migrate: true,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            db_max_connections: 10,
            db_min_connections: 1,
            db_connect_timeout_secs: 30,
            db_idle_timeout_secs: 600,
            db_acquire_timeout_secs: 8,
            vat_rate: 0.16,
            hotel: HotelConfig::default(),
            mpesa: MpesaConfig::default(),
            pms: PmsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults pointed at `database_url` for the named environment.
    pub fn new(database_url: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            environment: environment.into(),
            ..Self::default()
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Whether CORS may fall back to allowing every origin
    pub fn should_allow_permissive_cors(&self) -> bool {
        self.is_development() || self.cors_allow_any_origin
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

fn known_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        return Ok(());
    }
    let mut err = ValidationError::new("log_level");
    err.message = Some(format!("log_level must be one of {}", LOG_LEVELS.join(", ")).into());
    Err(err)
}

fn cors_is_decided(cfg: &AppConfig) -> Result<(), ValidationError> {
    let has_origins = cfg
        .cors_allowed_origins
        .as_deref()
        .is_some_and(|raw| raw.split(',').any(|o| !o.trim().is_empty()));
    if has_origins || cfg.should_allow_permissive_cors() {
        return Ok(());
    }
    let mut err = ValidationError::new("cors_allowed_origins");
    err.message = Some(
        "outside development set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true".into(),
    );
    Err(err)
}

fn pool_bounds_are_ordered(cfg: &AppConfig) -> Result<(), ValidationError> {
    if cfg.db_min_connections <= cfg.db_max_connections {
        return Ok(());
    }
    let mut err = ValidationError::new("db_min_connections");
    err.message = Some("db_min_connections cannot exceed db_max_connections".into());
    Err(err)
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Installs the global subscriber. `RUST_LOG` wins over `level`.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(format!(
            "hotel_pos_api={level},hotel_pos_cli={level},tower_http=debug,sea_orm=warn"
        )),
    };

    let subscriber = fmt().with_env_filter(filter).with_target(true);
    let installed = if json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
    if installed.is_err() {
        warn!("tracing subscriber already installed");
    }
}

/// Reads settings from, in increasing priority: built-in defaults,
/// `config/default.toml`, `config/{RUN_ENV}.toml` and `APP__*` variables
/// (`__` separates nested keys, e.g. `APP__MPESA__PASSKEY`).
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string());

    let app_config: AppConfig = Config::builder()
        .set_default("environment", run_env.as_str())?
        .add_source(File::with_name(&format!("{CONFIG_DIR}/default")).required(false))
        .add_source(File::with_name(&format!("{CONFIG_DIR}/{run_env}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()?;

    if let Err(errors) = app_config.validate() {
        error!(?errors, environment = %run_env, "invalid configuration");
        return Err(errors.into());
    }

    info!(
        environment = %app_config.environment,
        mpesa = app_config.mpesa.is_configured(),
        pms = app_config.pms.api_url.is_some(),
        "configuration loaded"
    );
    Ok(app_config)
}
