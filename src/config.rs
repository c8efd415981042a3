use axum::http::Uri;
use log::warn;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::env;
use std::error::Error;
use std::net::{AddrParseError, SocketAddr};

use crate::url;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Bytes `http::Uri` refuses outright. Non-ASCII is always encoded.
const LOCATION_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

#[derive(Debug)]
pub enum ConfigError {
    InvalidListenAddr(String, AddrParseError),
}

impl Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigError::InvalidListenAddr(addr, e) => {
                write!(f, "LISTEN_ADDR '{addr}' is not a socket address: {e}")
            }
        }
    }
}

/// Where `GET /` redirects to, already in the form sent as `Location`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginTarget(pub String);

impl LoginTarget {
    /// Never fails. A target that is still not a URI after percent-encoding
    /// is dropped and the base is treated as missing.
    pub fn from_base_url(base_url: &str) -> Self {
        let target = url::login_target(base_url);
        match to_location(&target) {
            Some(location) => LoginTarget(location),
            None => {
                warn!(
                    "Redirect target '{}' is not a valid URI, redirecting to / instead",
                    target
                );
                LoginTarget(url::login_target(""))
            }
        }
    }
}

fn to_location(target: &str) -> Option<String> {
    let uri = match target.parse::<Uri>() {
        Ok(uri) => uri,
        Err(_) => utf8_percent_encode(target, LOCATION_ENCODE_SET)
            .to_string()
            .parse::<Uri>()
            .ok()?,
    };
    Some(uri.to_string())
}

#[derive(Debug)]
pub struct Config {
    pub base_url: String,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// `API_URL` wins over `NEXT_PUBLIC_API_URL`; `LISTEN_ADDR` falls back to
    /// [`DEFAULT_LISTEN_ADDR`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_base = lookup("API_URL").or_else(|| lookup("NEXT_PUBLIC_API_URL"));
        let base_url = url::normalize_base_url(raw_base.as_deref());

        let addr = lookup("LISTEN_ADDR").unwrap_or_else(|| String::from(DEFAULT_LISTEN_ADDR));
        let listen_addr = addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidListenAddr(addr.clone(), e))?;

        Ok(Config {
            base_url,
            listen_addr,
        })
    }

    pub fn login_target(&self) -> LoginTarget {
        LoginTarget::from_base_url(&self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.base_url, "");
        assert_eq!(config.listen_addr, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(config.login_target().0, "/");
    }

    #[test]
    fn api_url_is_normalized() {
        let config = config_from(&[("API_URL", " api.example.com/ ")]).unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(
            config.login_target().0,
            "https://api.example.com/login/"
        );
    }

    #[test]
    fn api_url_wins_over_next_public_api_url() {
        let config = config_from(&[
            ("API_URL", "https://primary.example.com"),
            ("NEXT_PUBLIC_API_URL", "https://fallback.example.com"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "https://primary.example.com");

        let config = config_from(&[("NEXT_PUBLIC_API_URL", "fallback.example.com")]).unwrap();
        assert_eq!(config.base_url, "https://fallback.example.com");
    }

    #[test]
    fn listen_addr_is_parsed() {
        let config = config_from(&[("LISTEN_ADDR", "127.0.0.1:3000")]).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:3000".parse().unwrap());
    }

    #[test]
    fn bad_listen_addr_is_rejected() {
        let err = config_from(&[("LISTEN_ADDR", "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidListenAddr(ref addr, _) if addr == "localhost"));
    }

    #[test]
    fn unrepresentable_host_falls_back_to_root() {
        assert_eq!(LoginTarget::from_base_url("https://exa mple.com").0, "/");
        assert_eq!(LoginTarget::from_base_url("https://ünïcödé.example").0, "/");
    }

    #[test]
    fn scheme_only_base_falls_back_to_root() {
        for raw in ["/", "https:///", "  http://  "] {
            let config = config_from(&[("API_URL", raw)]).unwrap();
            assert_eq!(config.login_target().0, "/", "input {raw:?}");
        }
    }

    #[test]
    fn odd_path_characters_are_percent_encoded() {
        assert_eq!(
            LoginTarget::from_base_url("https://example.com/ü").0,
            "https://example.com/%C3%BC/login/"
        );
        assert_eq!(
            LoginTarget::from_base_url("https://example.com/a b\"c").0,
            "https://example.com/a%20b%22c/login/"
        );
    }

    #[test]
    fn scheme_is_written_in_lower_case() {
        assert_eq!(
            LoginTarget::from_base_url("HTTP://Example.com").0,
            "http://Example.com/login/"
        );
    }
}
