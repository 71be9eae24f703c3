//! Listener and CORS configuration parsing.
//!
//! Raw environment access goes through [`mockable::Env`] so the parsing rules
//! can be tested without touching the process environment.

use std::net::{IpAddr, SocketAddr};

use actix_cors::Cors;
use actix_web::http::{Method, header};
use mockable::Env;

use crate::domain::TRACE_ID_HEADER;

const PORT_ENV: &str = "PORT";
const HOST_ENV: &str = "HOST";
const CORS_ENV: &str = "CORS_ALLOWED_ORIGINS";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HOST: IpAddr = IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED);
const CORS_MAX_AGE_SECS: usize = 3600;

/// Origins allowed to call the relay from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// Any origin.
    Any,
    /// Only these exact origins, e.g. `https://example.com`.
    List(Vec<String>),
}

/// Socket and browser-access settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenSettings {
    /// Address the server binds to.
    pub bind_addr: SocketAddr,
    /// CORS origin policy.
    pub allowed_origins: AllowedOrigins,
}

/// Errors raised while validating listener configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ListenConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Accepted shape.
        expected: &'static str,
    },
}

/// Build listener settings from `PORT`, `HOST` and `CORS_ALLOWED_ORIGINS`.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use portfolio_backend::inbound::http::listen_config::{
///     AllowedOrigins, listen_settings_from_env,
/// };
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "PORT" => Some("8080".to_owned()),
///     _ => None,
/// });
///
/// let settings = listen_settings_from_env(&env).expect("valid settings");
/// assert_eq!(settings.bind_addr.port(), 8080);
/// assert_eq!(settings.allowed_origins, AllowedOrigins::Any);
/// ```
///
/// # Errors
///
/// Returns [`ListenConfigError::InvalidEnv`] for an unparsable port, host or
/// origin.
pub fn listen_settings_from_env<E: Env>(env: &E) -> Result<ListenSettings, ListenConfigError> {
    let port = match non_blank(env.string(PORT_ENV)) {
        Some(value) => value
            .trim()
            .parse::<u16>()
            .map_err(|_| ListenConfigError::InvalidEnv {
                name: PORT_ENV,
                value,
                expected: "a TCP port number",
            })?,
        None => DEFAULT_PORT,
    };
    let host = match non_blank(env.string(HOST_ENV)) {
        Some(value) => value
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| ListenConfigError::InvalidEnv {
                name: HOST_ENV,
                value,
                expected: "an IPv4 or IPv6 address",
            })?,
        None => DEFAULT_HOST,
    };
    let allowed_origins = match non_blank(env.string(CORS_ENV)) {
        Some(value) => parse_origins(&value)?,
        None => AllowedOrigins::Any,
    };

    Ok(ListenSettings {
        bind_addr: SocketAddr::new(host, port),
        allowed_origins,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_origins(raw: &str) -> Result<AllowedOrigins, ListenConfigError> {
    let mut origins = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        if entry == "*" {
            return Ok(AllowedOrigins::Any);
        }
        let origin = entry.trim_end_matches('/');
        let has_scheme = origin
            .strip_prefix("https://")
            .or_else(|| origin.strip_prefix("http://"))
            .is_some_and(|host| !host.is_empty() && !host.contains('/'));
        if !has_scheme {
            return Err(ListenConfigError::InvalidEnv {
                name: CORS_ENV,
                value: entry.to_owned(),
                expected: "comma separated origins like https://example.com, or *",
            });
        }
        origins.push(origin.to_owned());
    }
    Ok(AllowedOrigins::List(origins))
}

/// CORS middleware for the relay routes.
///
/// Allows `GET`, `POST` and preflight requests with JSON or form bodies and
/// exposes the `trace-id` header to browser scripts.
pub fn cors(origins: &AllowedOrigins) -> Cors {
    let base = Cors::default()
        .allowed_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([TRACE_ID_HEADER])
        .max_age(CORS_MAX_AGE_SECS);
    match origins {
        AllowedOrigins::Any => base.allow_any_origin(),
        AllowedOrigins::List(list) => list
            .iter()
            .fold(base, |cors, origin| cors.allowed_origin(origin)),
    }
}
