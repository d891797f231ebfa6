//! Server configuration from environment variables.
//!
//! Everything the server reads from the environment is collected here once, at
//! startup. Missing required variables are reported together so a deployment can
//! be fixed in one pass.

use std::env;
use std::fmt;
use std::path::PathBuf;

use edusync_core::SchemeRule;
use rand::RngCore;

/// Required environment variables.
pub const REQUIRED_VARS: [&str; 4] = [
    "GITHUB_CLIENT_ID",
    "GITHUB_CLIENT_SECRET",
    "CALLBACK_URL",
    "PORT",
];

/// Upper bound for session and token lifetimes (100 years).
pub const MAX_LIFETIME_HOURS: u64 = 100 * 365 * 24;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// GitHub OAuth application credentials.
#[derive(Clone)]
pub struct GithubCredentials {
    pub client_id: String,
    pub client_secret: String,
    /// Absolute URL of `/github/callback` as registered with GitHub.
    pub callback_url: String,
}

impl fmt::Debug for GithubCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    pub log_format: LogFormat,
    pub github: GithubCredentials,
    /// Generated description document served under `/api-docs`.
    pub docs_path: PathBuf,
    /// HMAC secret for bearer tokens.
    pub session_secret: String,
    /// `SESSION_SECRET` was absent and a random secret was generated.
    pub session_secret_generated: bool,
    pub session_ttl_hours: u64,
    pub token_expiry_hours: u64,
    /// Scheme overrides appended after the built-in hosting rules.
    pub scheme_rules: Vec<SchemeRule>,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("github", &self.github)
            .field("docs_path", &self.docs_path)
            .field("session_secret", &"<redacted>")
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("token_expiry_hours", &self.token_expiry_hours)
            .field("scheme_rules", &self.scheme_rules)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET`: GitHub OAuth app credentials
    /// - `CALLBACK_URL`: OAuth callback URL registered with GitHub
    /// - `PORT`: Server port
    ///
    /// Optional:
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `LOG_FORMAT`: "text" or "json" (default: "text")
    /// - `DOCS_PATH`: Description document file (default: "swagger.json")
    /// - `SESSION_SECRET`: Token signing secret (default: random per process)
    /// - `SESSION_TTL_HOURS`: Session lifetime, 1 to [`MAX_LIFETIME_HOURS`] (default: 24)
    /// - `TOKEN_EXPIRY_HOURS`: Bearer token lifetime, same range (default: 24)
    /// - `SCHEME_RULES`: Extra `pattern:protocol_in:forced` rules, comma-separated;
    ///   the pattern may include a port (`localhost:8080:http:https`)
    /// - `MAX_BODY_BYTES`: Request body limit (default: 1 MiB)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|&&name| get(name).is_none())
            .map(|&name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingEnvVars(missing));
        }

        let port = parse_var("PORT", get("PORT"))?.unwrap_or_default();

        let github = GithubCredentials {
            client_id: get("GITHUB_CLIENT_ID").unwrap_or_default(),
            client_secret: get("GITHUB_CLIENT_SECRET").unwrap_or_default(),
            callback_url: get("CALLBACK_URL").unwrap_or_default(),
        };

        let log_level = get("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match get("LOG_FORMAT").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "LOG_FORMAT".to_string(),
                    reason: format!("expected text or json, got {other:?}"),
                });
            }
        };

        let docs_path = get("DOCS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("swagger.json"));

        let (session_secret, session_secret_generated) = match get("SESSION_SECRET") {
            Some(secret) => (secret, false),
            None => (random_secret(), true),
        };

        let session_ttl_hours = parse_lifetime_hours("SESSION_TTL_HOURS", get("SESSION_TTL_HOURS"))?;
        let token_expiry_hours =
            parse_lifetime_hours("TOKEN_EXPIRY_HOURS", get("TOKEN_EXPIRY_HOURS"))?;
        let max_body_bytes =
            parse_var("MAX_BODY_BYTES", get("MAX_BODY_BYTES"))?.unwrap_or(1024 * 1024);

        let scheme_rules = get("SCHEME_RULES")
            .map(|rules| {
                rules
                    .split(',')
                    .filter(|r| !r.trim().is_empty())
                    .map(|r| {
                        r.parse::<SchemeRule>().map_err(|e| ConfigError::InvalidValue {
                            name: "SCHEME_RULES".to_string(),
                            reason: e.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            port,
            log_level,
            log_format,
            github,
            docs_path,
            session_secret,
            session_secret_generated,
            session_ttl_hours,
            token_expiry_hours,
            scheme_rules,
            max_body_bytes,
        })
    }

    /// Session lifetime as a chrono duration.
    pub fn session_ttl(&self) -> chrono::Duration {
        lifetime(self.session_ttl_hours)
    }

    /// Bearer token lifetime as a chrono duration.
    pub fn token_expiry(&self) -> chrono::Duration {
        lifetime(self.token_expiry_hours)
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_var<T>(name: &str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .map(|v| {
            v.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                name: name.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn parse_lifetime_hours(name: &str, value: Option<String>) -> Result<u64, ConfigError> {
    let hours = parse_var::<u64>(name, value)?.unwrap_or(24);
    if !(1..=MAX_LIFETIME_HOURS).contains(&hours) {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("expected 1 to {MAX_LIFETIME_HOURS} hours, got {hours}"),
        });
    }
    Ok(hours)
}

fn lifetime(hours: u64) -> chrono::Duration {
    i64::try_from(hours.min(MAX_LIFETIME_HOURS))
        .ok()
        .and_then(chrono::Duration::try_hours)
        .unwrap_or(chrono::Duration::MAX)
}

fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variables are missing.
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),

    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
