use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::seen::CookieConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub quotes: QuotesConfig,
    #[serde(default)]
    pub cookies: CookieConfig,
    #[serde(default)]
    pub weather: Option<WeatherConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub quotes_path: PathBuf,
    pub images_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuotesConfig {
    #[serde(default = "default_language")]
    pub default_language: String,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    /// In-memory config used by tests and by commands that only need
    /// database paths.
    pub fn with_paths(quotes_path: PathBuf, images_path: PathBuf) -> Self {
        Self {
            db: DbConfig {
                quotes_path,
                images_path,
            },
            server: ServerConfig {
                bind: default_bind(),
            },
            quotes: QuotesConfig::default(),
            cookies: CookieConfig::default(),
            weather: None,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;

    Ok(config)
}

/// Applies `QUOTES_DB_PATH`, `IMAGES_DB_PATH`, `SERVER_PORT` and
/// `WEATHER_API_KEY` on top of the file values.
pub fn apply_env_overrides(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(path) = lookup("QUOTES_DB_PATH") {
        config.db.quotes_path = PathBuf::from(path);
    }
    if let Some(path) = lookup("IMAGES_DB_PATH") {
        config.db.images_path = PathBuf::from(path);
    }
    if let Some(port) = lookup("SERVER_PORT") {
        let port: u16 = port
            .parse()
            .with_context(|| format!("SERVER_PORT is not a valid port: {}", port))?;
        let host = match config.server.bind.rsplit_once(':') {
            Some((host, _)) => host.to_string(),
            None => config.server.bind.clone(),
        };
        config.server.bind = format!("{}:{}", host, port);
    }
    if let Some(api_key) = lookup("WEATHER_API_KEY") {
        match config.weather.as_mut() {
            Some(weather) => weather.api_key = api_key,
            None => {
                config.weather = Some(WeatherConfig {
                    api_key,
                    base_url: default_weather_url(),
                    timeout_secs: default_timeout_secs(),
                })
            }
        }
    }
    Ok(())
}

fn validate(config: &Config) -> Result<()> {
    if config.db.quotes_path.as_os_str().is_empty() {
        anyhow::bail!("db.quotes_path must not be empty");
    }
    if config.db.images_path.as_os_str().is_empty() {
        anyhow::bail!("db.images_path must not be empty");
    }
    if config.quotes.default_language.trim().is_empty() {
        anyhow::bail!("quotes.default_language must not be empty");
    }
    if config.cookies.max_age_secs < 0 {
        anyhow::bail!("cookies.max_age_secs must be >= 0");
    }
    if config.cookies.seen_quotes.is_empty() || config.cookies.seen_images.is_empty() {
        anyhow::bail!("cookie names must not be empty");
    }
    if let Some(weather) = &config.weather {
        if weather.api_key.is_empty() {
            anyhow::bail!("weather.api_key must not be empty when [weather] is present");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[db]
quotes_path = "data/quotes.sqlite"
images_path = "data/images.sqlite"

[server]
bind = "0.0.0.0:8080"
"#;

    fn parse(s: &str) -> Config {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = parse(MINIMAL);
        assert_eq!(cfg.quotes.default_language, "en");
        assert_eq!(cfg.cookies.path, "/");
        assert_eq!(cfg.cookies.max_age_secs, 0);
        assert_eq!(cfg.cookies.seen_quotes, "seen_quotes");
        assert_eq!(cfg.cookies.seen_images, "seen_images");
        assert!(cfg.weather.is_none());
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = parse(MINIMAL);
        apply_env_overrides(&mut cfg, |key| match key {
            "QUOTES_DB_PATH" => Some("/tmp/q.sqlite".to_string()),
            "SERVER_PORT" => Some("9090".to_string()),
            "WEATHER_API_KEY" => Some("secret".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.db.quotes_path, PathBuf::from("/tmp/q.sqlite"));
        assert_eq!(cfg.db.images_path, PathBuf::from("data/images.sqlite"));
        assert_eq!(cfg.server.bind, "0.0.0.0:9090");
        assert_eq!(cfg.weather.unwrap().api_key, "secret");
    }

    #[test]
    fn test_bad_port_rejected() {
        let mut cfg = parse(MINIMAL);
        let res = apply_env_overrides(&mut cfg, |key| {
            (key == "SERVER_PORT").then(|| "eighty".to_string())
        });
        assert!(res.is_err());
    }

    #[test]
    fn test_negative_max_age_rejected() {
        let cfg = parse(&format!("{}\n[cookies]\nmax_age_secs = -1\n", MINIMAL));
        assert!(validate(&cfg).is_err());
    }
}
