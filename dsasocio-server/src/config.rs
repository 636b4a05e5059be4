//! Relay configuration, loaded from environment variables
//!
//! - `PORT` / `BACKEND_PORT`: listen port (default 5000, all interfaces)
//! - `PUSHER_APP_ID`, `PUSHER_KEY`, `PUSHER_SECRET`: broker credentials
//! - `PUSHER_CLUSTER` (default `mt1`), `PUSHER_USE_TLS`, `PUSHER_HOST`
//! - `DATABASE_URL` / `SUPABASE_DB_URL`: Postgres for message rows (optional)
//! - `FRONTEND_URL`, `FRONTEND_URLS`: extra CORS origins

use std::net::SocketAddr;

/// Origins every deployment allows (local dev servers)
const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:8081", "http://localhost:5173"];

const DEFAULT_PORT: u16 = 5000;

/// JSON body limit (10 MiB)
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {var}")]
    Missing { var: &'static str },

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Broker credentials and endpoint
#[derive(Debug, Clone)]
pub struct PusherConfig {
    pub app_id: String,
    pub key: String,
    pub secret: String,
    pub cluster: String,
    pub use_tls: bool,
    /// Full base URL override, e.g. `http://127.0.0.1:9999` in tests
    pub host: Option<String>,
}

impl PusherConfig {
    /// Base URL of the broker's HTTP API, without trailing slash.
    pub fn base_url(&self) -> String {
        if let Some(host) = &self.host {
            return host.trim_end_matches('/').to_string();
        }
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{}://api-{}.pusher.com", scheme, self.cluster)
    }
}

/// Browser origins allowed to call the relay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsOrigins {
    origins: Vec<String>,
    /// Raw `FRONTEND_URLS`, echoed by `/debug-cors`
    pub frontend_urls: Option<String>,
}

impl CorsOrigins {
    /// Defaults plus `FRONTEND_URL` and comma-separated `FRONTEND_URLS`.
    /// Trailing slashes are stripped; blanks and duplicates dropped.
    pub fn new(frontend_url: Option<&str>, frontend_urls: Option<&str>) -> Self {
        let mut origins: Vec<String> = DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect();

        let extra = frontend_url
            .into_iter()
            .chain(frontend_urls.into_iter().flat_map(|list| list.split(',')));
        for url in extra {
            let url = normalize(url);
            if !url.is_empty() && !origins.iter().any(|o| *o == url) {
                origins.push(url);
            }
        }

        Self {
            origins,
            frontend_urls: frontend_urls.map(str::to_owned),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.origins
    }

    /// Whether a request `Origin` is allowed. A missing origin (same-site
    /// or non-browser caller) is always allowed.
    pub fn allows(&self, origin: Option<&str>) -> bool {
        match origin.map(normalize) {
            None => true,
            Some(o) if o.is_empty() => true,
            Some(o) => self.origins.iter().any(|allowed| *allowed == o),
        }
    }
}

fn normalize(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Full relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    /// Mirror any origin (development only)
    pub cors_permissive: bool,
    pub cors_origins: CorsOrigins,
    pub pusher: PusherConfig,
    pub database_url: Option<String>,
    pub body_limit: usize,
}

impl RelayConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` for each variable; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |var: &'static str| get(var).ok_or(ConfigError::Missing { var });

        let port = match get("PORT").or_else(|| get("BACKEND_PORT")) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let use_tls = match get("PUSHER_USE_TLS") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "PUSHER_USE_TLS",
                reason: format!("expected true/false, got '{}'", raw),
            })?,
            None => true,
        };

        // Key and secret are checked first: without them nothing can be signed.
        let key = require("PUSHER_KEY")?;
        let secret = require("PUSHER_SECRET")?;

        let pusher = PusherConfig {
            app_id: require("PUSHER_APP_ID")?,
            key,
            secret,
            cluster: get("PUSHER_CLUSTER").unwrap_or_else(|| "mt1".to_string()),
            use_tls,
            host: get("PUSHER_HOST"),
        };

        Ok(Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            cors_permissive: false,
            cors_origins: CorsOrigins::new(
                get("FRONTEND_URL").as_deref(),
                get("FRONTEND_URLS").as_deref(),
            ),
            pusher,
            database_url: get("DATABASE_URL").or_else(|| get("SUPABASE_DB_URL")),
            body_limit: DEFAULT_BODY_LIMIT,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
