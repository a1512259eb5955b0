use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use log::LevelFilter;

pub const DEFAULT_API_URL: &str = "http://localhost:3333";
pub const DEFAULT_BIND: &str = "127.0.0.1:7878";
pub const DEFAULT_STORAGE: &str = "./gobarber.sqlite3";
pub const DEFAULT_TOAST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{var} is not a valid socket address: {source}")]
    Bind {
        var: &'static str,
        source: std::net::AddrParseError,
    },
    #[error("{var} is not a valid duration: {source}")]
    Duration {
        var: &'static str,
        source: humantime::DurationError,
    },
    #[error("{var} is not a valid log level: {value}")]
    LogLevel { var: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Base url of the GoBarber HTTP API.
    pub api_url: String,
    /// Address the browser pages are served on.
    pub bind: SocketAddr,
    /// SQLite file holding the persisted session.
    pub storage_path: PathBuf,
    pub toast_timeout: Duration,
    /// Glob handed to tera.
    pub templates: String,
    /// Directory served under `/static`.
    pub public_dir: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            bind: SocketAddr::from(([127, 0, 0, 1], 7878)),
            storage_path: PathBuf::from(DEFAULT_STORAGE),
            toast_timeout: DEFAULT_TOAST_TIMEOUT,
            templates: concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*").to_string(),
            public_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/public")),
            log_level: LevelFilter::Debug,
        }
    }
}

impl Config {
    /// Build the config from `GOBARBER_*` environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Result<Config, Error> {
        Config::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, Error> {
        let mut config = Config::default();

        if let Some(url) = lookup("GOBARBER_API_URL") {
            config.api_url = url;
        }

        if let Some(bind) = lookup("GOBARBER_BIND") {
            config.bind = bind.parse().map_err(|source| Error::Bind {
                var: "GOBARBER_BIND",
                source,
            })?;
        }

        if let Some(path) = lookup("GOBARBER_STORAGE") {
            config.storage_path = PathBuf::from(path);
        }

        if let Some(timeout) = lookup("GOBARBER_TOAST_TIMEOUT") {
            config.toast_timeout =
                humantime::parse_duration(&timeout).map_err(|source| Error::Duration {
                    var: "GOBARBER_TOAST_TIMEOUT",
                    source,
                })?;
        }

        if let Some(templates) = lookup("GOBARBER_TEMPLATES") {
            config.templates = templates;
        }

        if let Some(public_dir) = lookup("GOBARBER_PUBLIC") {
            config.public_dir = PathBuf::from(public_dir);
        }

        if let Some(level) = lookup("GOBARBER_LOG") {
            config.log_level = LevelFilter::from_str(&level).map_err(|_| Error::LogLevel {
                var: "GOBARBER_LOG",
                value: level,
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.toast_timeout, Duration::from_secs(3));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn overrides_from_environment() {
        let config = Config::from_lookup(lookup(&[
            ("GOBARBER_API_URL", "http://api.test"),
            ("GOBARBER_BIND", "0.0.0.0:8080"),
            ("GOBARBER_TOAST_TIMEOUT", "1500ms"),
            ("GOBARBER_LOG", "warn"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://api.test");
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.toast_timeout, Duration::from_millis(1500));
        assert_eq!(config.log_level, LevelFilter::Warn);
    }

    #[test]
    fn rejects_bad_values() {
        let err = Config::from_lookup(lookup(&[("GOBARBER_TOAST_TIMEOUT", "soon")])).unwrap_err();
        assert!(matches!(err, Error::Duration { .. }));

        let err = Config::from_lookup(lookup(&[("GOBARBER_BIND", "nowhere")])).unwrap_err();
        assert!(matches!(err, Error::Bind { .. }));
    }
}
