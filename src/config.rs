use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::qr::compose::DEFAULT_MAX_CANVAS_PX;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub bind_addr: String,
    pub api_base: String,
    pub redirect_base: Option<String>,
    pub login_path: String,
    pub cors_origins: Vec<String>,
    pub upstream_timeout: Duration,
    pub max_canvas_px: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = get("PORT")
            .context("PORT not set")?
            .parse::<u16>()
            .context("PORT must be a port number")?;
        let api_base = get("API_BASE")
            .context("API_BASE not set")?
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&api_base).with_context(|| format!("API_BASE `{}` is not a URL", api_base))?;

        let timeout_secs = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            None => 10,
        };

        let max_canvas_px = match get("MAX_CANVAS_PX") {
            Some(raw) => raw
                .parse::<u32>()
                .context("MAX_CANVAS_PX must be a whole number of pixels")?,
            None => DEFAULT_MAX_CANVAS_PX,
        };
        if max_canvas_px == 0 {
            bail!("MAX_CANVAS_PX must be greater than zero");
        }

        Ok(Self {
            port,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string()),
            api_base,
            redirect_base: get("REDIRECT_BASE").map(|b| b.trim_end_matches('/').to_string()),
            login_path: get("LOGIN_PATH").unwrap_or_else(|| "/login".to_string()),
            cors_origins: get("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_else(|| vec!["http://localhost:5173".to_string()]),
            upstream_timeout: Duration::from_secs(timeout_secs),
            max_canvas_px,
        })
    }

    /// Settings for tests and embedding, with every optional value at its default.
    pub fn local(api_base: &str, redirect_base: Option<&str>) -> Self {
        Self {
            port: 8080,
            bind_addr: "127.0.0.1".to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            redirect_base: redirect_base.map(|b| b.trim_end_matches('/').to_string()),
            login_path: "/login".to_string(),
            cors_origins: vec!["http://localhost:5173".to_string()],
            upstream_timeout: Duration::from_secs(10),
            max_canvas_px: DEFAULT_MAX_CANVAS_PX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_fill_optional_settings() {
        let config = load(&[("PORT", "8080"), ("API_BASE", "https://api.example.com/")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_base, "https://api.example.com");
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.login_path, "/login");
        assert!(config.redirect_base.is_none());
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.max_canvas_px, DEFAULT_MAX_CANVAS_PX);
    }

    #[test]
    fn reads_every_setting() {
        let config = load(&[
            ("PORT", "9000"),
            ("BIND_ADDR", "0.0.0.0"),
            ("API_BASE", "https://api.example.com"),
            ("REDIRECT_BASE", "https://oilqr.com/"),
            ("LOGIN_PATH", "/auth/login"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("MAX_CANVAS_PX", "4096"),
        ])
        .unwrap();
        assert_eq!(config.redirect_base.as_deref(), Some("https://oilqr.com"));
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
        assert_eq!(config.login_path, "/auth/login");
        assert_eq!(config.max_canvas_px, 4096);
    }

    #[test]
    fn missing_or_bad_required_settings_fail() {
        assert!(load(&[("API_BASE", "https://api.example.com")]).is_err());
        assert!(load(&[("PORT", "8080")]).is_err());
        assert!(load(&[("PORT", "eighty"), ("API_BASE", "https://api.example.com")]).is_err());
        assert!(load(&[("PORT", "8080"), ("API_BASE", "not a url")]).is_err());
        let base = ("API_BASE", "https://api.example.com");
        assert!(load(&[("PORT", "8080"), base, ("MAX_CANVAS_PX", "0")]).is_err());
        assert!(load(&[("PORT", "8080"), base, ("MAX_CANVAS_PX", "big")]).is_err());
    }
}
