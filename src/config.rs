/*
 * Responsibility
 * - 環境変数や設定の読み込み (AUTH0_DOMAIN, API_AUDIENCE, DATABASE_URL, CORS 許可など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Testing,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // identity provider (e.g. "casting.us.auth0.com")
    pub auth0_domain: String,
    pub api_audience: String,
    pub access_token_leeway_seconds: u64,
    pub jwks_cache_ttl_seconds: u64,
    pub jwks_fetch_timeout_seconds: u64,

    pub request_timeout_seconds: u64,
    pub body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => database_url_from_parts(app_env)?,
        };

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth0_domain = normalize_domain(
            &std::env::var("AUTH0_DOMAIN").map_err(|_| ConfigError::Missing("AUTH0_DOMAIN"))?,
        );
        if auth0_domain.is_empty() {
            return Err(ConfigError::Invalid("AUTH0_DOMAIN"));
        }

        let api_audience =
            std::env::var("API_AUDIENCE").map_err(|_| ConfigError::Missing("API_AUDIENCE"))?;

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            auth0_domain,
            api_audience,
            access_token_leeway_seconds: env_or("ACCESS_TOKEN_LEEWAY_SECONDS", 60),
            jwks_cache_ttl_seconds: env_or("JWKS_CACHE_TTL_SECONDS", 3600),
            jwks_fetch_timeout_seconds: env_or("JWKS_FETCH_TIMEOUT_SECONDS", 5),
            request_timeout_seconds: env_or("REQUEST_TIMEOUT_SECONDS", 30),
            body_limit_bytes: env_or("BODY_LIMIT_BYTES", 1024 * 1024),
        })
    }

    /// Expected `iss` claim.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.auth0_domain)
    }

    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.auth0_domain)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Accepts "tenant.auth0.com", "https://tenant.auth0.com/" and the like.
fn normalize_domain(raw: &str) -> String {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .unwrap_or(raw);
    raw.trim_end_matches('/').to_string()
}

/// DB_USER / DB_PASSWORD / DB_HOST / DB_NAME (TEST_DB_NAME when testing).
fn database_url_from_parts(app_env: AppEnv) -> Result<String, ConfigError> {
    let var = |key: &'static str| std::env::var(key).map_err(|_| ConfigError::Missing(key));

    let user = var("DB_USER")?;
    let password = var("DB_PASSWORD")?;
    let host = var("DB_HOST")?;
    let name = if app_env == AppEnv::Testing {
        var("TEST_DB_NAME")?
    } else {
        var("DB_NAME")?
    };

    Ok(postgres_url(&user, &password, &host, &name))
}

fn postgres_url(user: &str, password: &str, host: &str, name: &str) -> String {
    format!("postgres://{user}:{password}@{host}/{name}")
}
