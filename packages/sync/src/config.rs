use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Variables that must be present for a full sync run.
pub const REQUIRED_VARS: &[&str] = &[
    "DB_HOST",
    "DB_PORT",
    "DB_NAME",
    "DB_USER",
    "DB_PASSWORD",
    "SHEETS_ID",
    "SHOPIFY_SHOP_URL",
    "SHOPIFY_ACCESS_TOKEN",
];

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub ssl_mode: String,
    /// Takes precedence over the individual `DB_*` parts when set.
    pub url_override: Option<String>,
}

impl DatabaseConfig {
    fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            host: get("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: get("DB_PORT")
                .unwrap_or_else(|| "5432".to_string())
                .parse()
                .context("DB_PORT must be a valid port number")?,
            database: get("DB_NAME").unwrap_or_else(|| "postgres".to_string()),
            user: get("DB_USER").unwrap_or_else(|| "postgres".to_string()),
            password: get("DB_PASSWORD").unwrap_or_default(),
            ssl_mode: get("DB_SSL_MODE").unwrap_or_else(|| "require".to_string()),
            url_override: get("DATABASE_URL"),
        })
    }

    /// PostgreSQL connection string.
    pub fn connection_string(&self) -> String {
        if let Some(url) = &self.url_override {
            return url.clone();
        }
        format!(
            "postgresql://{}:{}@{}:{}/{}?sslmode={}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            self.database,
            self.ssl_mode
        )
    }
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub credentials_path: PathBuf,
    pub sheet_id: String,
    pub worksheet: String,
}

#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    pub shop_url: String,
    pub access_token: String,
    pub api_version: String,
    pub vendor: String,
}

#[derive(Debug, Clone)]
pub struct VendorConfig {
    pub base_url: String,
    pub request_delay: Duration,
}

impl VendorConfig {
    /// Vendor settings alone; the lookup needs no Sheets, Shopify or database.
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();
        Self::from_lookup(&|key: &str| env::var(key).ok().filter(|v| !v.is_empty()))
    }

    pub fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let delay_ms: u64 = get("VENDOR_DELAY_MS")
            .unwrap_or_else(|| "2000".to_string())
            .parse()
            .context("VENDOR_DELAY_MS must be a number of milliseconds")?;

        Ok(Self {
            base_url: get("VENDOR_URL").unwrap_or_else(|| "https://www.voipsupply.com".to_string()),
            request_delay: Duration::from_millis(delay_ms),
        })
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub debug: bool,
    pub log_level: String,
    pub sync_interval: Duration,
    pub database: DatabaseConfig,
    pub sheets: SheetsConfig,
    pub shopify: ShopifyConfig,
    pub vendor: VendorConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok().filter(|v| !v.is_empty()))
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let sheet_id = get("SHEETS_ID").context("SHEETS_ID must be set")?;
        let shop_url = get("SHOPIFY_SHOP_URL").context("SHOPIFY_SHOP_URL must be set")?;
        let access_token =
            get("SHOPIFY_ACCESS_TOKEN").context("SHOPIFY_ACCESS_TOKEN must be set")?;

        let sync_interval: u64 = get("SYNC_INTERVAL")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("SYNC_INTERVAL must be a number of seconds")?;
        if sync_interval == 0 {
            bail!("SYNC_INTERVAL must be greater than zero");
        }

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            debug: get("DEBUG")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "INFO".to_string()),
            sync_interval: Duration::from_secs(sync_interval),
            database: DatabaseConfig::from_lookup(&get)?,
            sheets: SheetsConfig {
                credentials_path: get("GOOGLE_CREDENTIALS_PATH")
                    .unwrap_or_else(|| "excel_credentials.json".to_string())
                    .into(),
                sheet_id,
                worksheet: get("SHEETS_WORKSHEET").unwrap_or_else(|| "VOIP".to_string()),
            },
            shopify: ShopifyConfig {
                shop_url,
                access_token,
                api_version: get("SHOPIFY_API_VERSION")
                    .unwrap_or_else(|| "2024-01".to_string()),
                vendor: get("SHOPIFY_VENDOR").unwrap_or_else(|| "YourBrandName".to_string()),
            },
            vendor: VendorConfig::from_lookup(&get)?,
        })
    }

    /// Default tracing filter derived from `LOG_LEVEL`.
    pub fn log_filter(&self) -> String {
        log_filter_for(&self.log_level)
    }
}

/// Map a `LOG_LEVEL` name (DEBUG, INFO, WARNING, ERROR, CRITICAL) to a
/// tracing filter directive.
pub fn log_filter_for(log_level: &str) -> String {
    let level = match log_level.trim().to_ascii_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        "TRACE" => "trace",
        _ => "info",
    };
    format!("{level},sync_core={level},sqlx=warn")
}

/// Names of required variables that are missing, in declaration order.
///
/// `DB_*` parts are not needed once `DATABASE_URL` is set.
pub fn missing_vars(get: impl Fn(&str) -> Option<String>) -> Vec<&'static str> {
    let has_database_url = get("DATABASE_URL").is_some();
    REQUIRED_VARS
        .iter()
        .copied()
        .filter(|var| !(has_database_url && var.starts_with("DB_")))
        .filter(|var| get(*var).is_none())
        .collect()
}

/// Check all required variables at once so the operator sees every gap.
pub fn validate_env() -> Result<()> {
    let _ = dotenv();
    let missing = missing_vars(|key| env::var(key).ok().filter(|v| !v.is_empty()));
    if !missing.is_empty() {
        bail!("Missing environment variables: {}", missing.join(", "));
    }
    tracing::info!("Configuration valid");
    Ok(())
}
